//! Error types for turret calibration.

use thiserror::Error;

use crate::models::ValidationErrors;

/// Result type for calibration operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in calibration operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A run was triggered with no staged settings.
    #[error("Calibration Settings do not exist. Please set it before running a test.")]
    NotConfigured,

    /// Counter store failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Settings request rejected by validation
    #[error("Invalid settings: {0}")]
    Validation(#[from] ValidationErrors),

    /// Bad configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<rocksdb::Error> for Error {
    fn from(e: rocksdb::Error) -> Self {
        Error::Storage(e.to_string())
    }
}
