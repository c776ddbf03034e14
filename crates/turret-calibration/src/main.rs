//! Calibration node binary
//!
//! Serves the turret calibration HTTP API.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use turret_calibration::{CalibrationConfig, CalibrationNode};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "calibration_node=info,turret_calibration=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Calibration Node");

    let config = CalibrationConfig::from_env()?;

    let node = CalibrationNode::new(config)?;
    node.run().await?;

    Ok(())
}
