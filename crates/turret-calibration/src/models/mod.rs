//! Data model for turret calibration.
//!
//! # Core Types
//!
//! - [`TurretLocation`] - Identity of a physical turret mount, the key for counters
//! - [`CalibrationCounter`] - Persisted number of completed runs for one turret
//! - [`RunResponse`] - Result returned to the caller after a run
//!
//! # Requests
//!
//! - [`SettingsRequest`] - Raw settings as submitted by a client
//! - [`TurretSettings`] - Settings that passed validation
//! - [`ValidationErrors`] - Field-keyed validation messages

mod counter;
mod request;
mod run;
mod turret;

pub use counter::CalibrationCounter;
pub use request::{SettingsRequest, TurretSettings, ValidationErrors};
pub use run::RunResponse;
pub use turret::TurretLocation;
