//! Turret Calibration - staged calibration runs for ship turrets
//!
//! Clients stage rotation settings for one turret, then trigger a run. The run reports the
//! total angular distance travelled and bumps a persisted per-turret test counter.
//!
//! # Architecture
//!
//! - **Models**: Turret identity, counters, settings requests and validation
//! - **Pending**: Single-slot holder for the staged setting
//! - **Storage**: Counter store trait with RocksDB and in-memory backends
//! - **Service**: Configure/run orchestration
//! - **API**: HTTP endpoints for clients
//!
//! # Example
//!
//! ```no_run
//! use turret_calibration::{CalibrationConfig, CalibrationNode};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = CalibrationConfig::from_env()?;
//!     let node = CalibrationNode::new(config)?;
//!     node.run().await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod error;
pub mod models;
pub mod node;
pub mod pending;
pub mod service;
pub mod storage;

pub use error::{Error, Result};
pub use models::{
    CalibrationCounter, RunResponse, SettingsRequest, TurretLocation, TurretSettings,
    ValidationErrors,
};
pub use node::{CalibrationConfig, CalibrationNode};
pub use pending::{PendingConfiguration, PendingSetting};
pub use service::CalibrationService;
pub use storage::{CalibrationStore, MemoryStore, RocksDbStore};
