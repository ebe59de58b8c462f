//! # Folio Analytics Server
//!
//! Standalone HTTP server exposing the analytics endpoints for a Google
//! Analytics property.

mod config;

pub use config::{AppConfig, ConfigError, ServerConfig, load_config, parse_config};

use folio_analytics::AnalyticsRouter;
use folio_axum::analytics_routes;
use folio_core::{AnalyticsError, ReportProvider, UnconfiguredProvider};
use folio_provider_google::{GoogleAnalyticsClient, GoogleAnalyticsConfig};
use std::sync::Arc;

/// Server startup error.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Analytics(#[from] AnalyticsError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Builds the report provider for `config`.
///
/// Missing credentials are not fatal: the provider then fails every call,
/// which the routes surface like any other upstream failure.
pub fn build_provider(
    config: &GoogleAnalyticsConfig,
) -> Result<Arc<dyn ReportProvider>, AnalyticsError> {
    if let Some(missing) = config.missing_setting() {
        tracing::warn!(
            setting = missing,
            "Google Analytics credentials are incomplete; analytics requests will fail"
        );
        return Ok(Arc::new(UnconfiguredProvider::new(missing)));
    }

    let client = GoogleAnalyticsClient::new(config.clone())?;
    tracing::info!(property = %config.property_id, "Google Analytics provider configured");
    Ok(Arc::new(client))
}

/// Builds the HTTP application.
pub fn app(provider: Arc<dyn ReportProvider>) -> axum::Router {
    analytics_routes(AnalyticsRouter::from_provider(provider))
}

/// The analytics server.
pub struct AnalyticsServer {
    /// Server configuration.
    pub config: AppConfig,
}

impl AnalyticsServer {
    /// Creates a new analytics server.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Binds and serves until the process exits.
    pub async fn run(&self) -> Result<(), ServerError> {
        let provider = build_provider(&self.config.google)?;
        let address = self.config.server.bind_address();
        let listener = tokio::net::TcpListener::bind(&address).await?;

        tracing::info!(
            %address,
            provider = provider.name(),
            "Starting Folio Analytics server"
        );

        axum::serve(listener, app(provider)).await?;
        Ok(())
    }
}

impl Default for AnalyticsServer {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}
