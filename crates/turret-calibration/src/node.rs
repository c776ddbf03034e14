//! Calibration node - the application entry point.
//!
//! Architecture:
//! - Single process holding one pending turret setting
//! - RocksDB counter store shared by all requests
//! - HTTP API for staging settings and triggering runs

use crate::api;
use crate::error::{Error, Result};
use crate::service::CalibrationService;
use crate::storage::RocksDbStore;
use axum::http::HeaderValue;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

const DEFAULT_DATA_DIR: &str = "./calibration-data";
const DEFAULT_API_ADDR: &str = "0.0.0.0:8080";

/// Configuration for a calibration node.
#[derive(Debug, Clone)]
pub struct CalibrationConfig {
    /// Data directory for the counter store
    pub data_dir: PathBuf,

    /// HTTP API listen address
    pub api_addr: SocketAddr,

    /// Origin allowed by CORS; `*` allows any
    pub cors_origin: String,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            api_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            cors_origin: "*".to_string(),
        }
    }
}

impl CalibrationConfig {
    /// Create config from environment variables with sensible defaults.
    pub fn from_env() -> Result<Self> {
        let data_dir = PathBuf::from(
            std::env::var("CALIBRATION_DATA_DIR").unwrap_or_else(|_| DEFAULT_DATA_DIR.to_string()),
        );

        let api_addr = std::env::var("CALIBRATION_API_ADDR")
            .unwrap_or_else(|_| DEFAULT_API_ADDR.to_string());
        let api_addr = api_addr.parse().map_err(|e| {
            Error::Config(format!("invalid CALIBRATION_API_ADDR {:?}: {}", api_addr, e))
        })?;

        let cors_origin =
            std::env::var("CALIBRATION_CORS_ORIGIN").unwrap_or_else(|_| "*".to_string());
        if cors_origin != "*" {
            HeaderValue::from_str(&cors_origin).map_err(|e| {
                Error::Config(format!("invalid CALIBRATION_CORS_ORIGIN {:?}: {}", cors_origin, e))
            })?;
        }

        Ok(Self {
            data_dir,
            api_addr,
            cors_origin,
        })
    }
}

/// Shared state for API handlers.
pub struct CalibrationState {
    pub service: CalibrationService,
    pub config: CalibrationConfig,
}

/// A calibration node instance.
pub struct CalibrationNode {
    state: Arc<CalibrationState>,
}

impl CalibrationNode {
    /// Open the counter store and build the service.
    pub fn new(config: CalibrationConfig) -> Result<Self> {
        std::fs::create_dir_all(&config.data_dir)?;

        let store = Arc::new(RocksDbStore::open(&config.data_dir)?);
        let service = CalibrationService::new(store);

        Ok(Self {
            state: Arc::new(CalibrationState { service, config }),
        })
    }

    /// Get the shared state (for API handlers).
    pub fn state(&self) -> Arc<CalibrationState> {
        Arc::clone(&self.state)
    }

    /// Serve the HTTP API until the listener fails.
    pub async fn run(self) -> Result<()> {
        let config = &self.state.config;
        tracing::info!("Calibration node starting");
        tracing::info!("  API: http://{}", config.api_addr);
        tracing::info!("  Data: {:?}", config.data_dir);
        tracing::info!("  CORS origin: {}", config.cors_origin);

        let listener = tokio::net::TcpListener::bind(config.api_addr).await?;
        tracing::info!("HTTP server listening on {}", config.api_addr);

        let app = api::build_router(self.state());
        axum::serve(listener, app).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn default_config() {
        let config = CalibrationConfig::default();
        assert_eq!(config.api_addr.port(), 8080);
        assert_eq!(config.cors_origin, "*");
        assert_eq!(config.data_dir, PathBuf::from(DEFAULT_DATA_DIR));
    }

    #[tokio::test]
    async fn node_creates_data_dir() {
        let dir = tempdir().unwrap();
        let data_dir = dir.path().join("nested").join("store");
        let config = CalibrationConfig {
            data_dir: data_dir.clone(),
            ..CalibrationConfig::default()
        };

        let node = CalibrationNode::new(config).unwrap();
        assert!(data_dir.is_dir());
        assert!(node.state().service.pending().await.is_none());
    }
}
