//! # Folio Google Analytics Provider
//!
//! Report provider for the Google Analytics Data API (GA4).
//!
//! ## Usage
//!
//! ```rust,ignore
//! use folio_provider_google::{GoogleAnalyticsClient, GoogleAnalyticsConfig};
//!
//! let config = GoogleAnalyticsConfig::new(client_email, private_key, property_id);
//! let provider = GoogleAnalyticsClient::new(config)?;
//! let rows = provider.run_report(&query).await?;
//! ```

mod client;
mod config;
mod wire;

pub use client::GoogleAnalyticsClient;
pub use config::{DEFAULT_API_BASE_URL, DEFAULT_TOKEN_URL, GoogleAnalyticsConfig};
pub use wire::JWT_BEARER_GRANT;
