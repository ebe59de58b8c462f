//! Folio Analytics server binary.
//!
//! Usage: `folio-analytics-server [config.toml]`. The config path may also
//! come from `FOLIO_CONFIG`.

use folio_server::{AnalyticsServer, AppConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("FOLIO_CONFIG").ok());
    let config = AppConfig::load(path.as_deref())?;

    // Initialize tracing; RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Some(path) = &path {
        tracing::info!(%path, "Loaded configuration file");
    }

    // Create and run server
    AnalyticsServer::new(config).run().await?;

    Ok(())
}
