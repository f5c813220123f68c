//! Fuel Estimator - Main Entry Point

use api::{init_logging, run_server, AppConfig};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_logging(&config.logging)?;

    info!("=== Fuel Estimator v{} ===", env!("CARGO_PKG_VERSION"));
    info!(
        "Model: {}, scaler: {}",
        config.artifacts.model_path.display(),
        config.artifacts.scaler_path.display()
    );

    run_server(config).await?;

    Ok(())
}
