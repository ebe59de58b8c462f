//! Error types for Folio Analytics.
//!
//! This module defines the `AnalyticsError` enum which represents every
//! failure the aggregation adapter can surface: bad client input, missing
//! configuration, and upstream provider failures.

use thiserror::Error;

/// The main error type for analytics operations.
///
/// Upstream errors are never classified as transient or permanent; every
/// one of them is terminal for the request that produced it.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    // ==================== Client Input Errors ====================
    /// The `type` discriminator did not match any known query.
    #[error("Invalid analytics type requested: '{kind}'")]
    UnknownQueryType { kind: String },

    /// A query parameter could not be interpreted.
    #[error("Invalid value for parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    /// A date range whose start falls after its end.
    #[error("Invalid date range: {start} is after {end}")]
    InvalidDateRange { start: String, end: String },

    // ==================== Configuration Errors ====================
    /// A required configuration value is missing.
    #[error("Missing configuration: {key}")]
    MissingConfiguration { key: String },

    /// The configuration is invalid.
    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },

    // ==================== Upstream Errors ====================
    /// The service-account assertion could not be signed.
    #[error("Failed to sign assertion: {message}")]
    Signing { message: String },

    /// The token endpoint refused the assertion.
    #[error("Token exchange failed: {message}")]
    TokenExchange { message: String },

    /// The report endpoint answered with a non-success status.
    #[error("Analytics API error ({status}): {body}")]
    Upstream { status: u16, body: String },

    /// The request never produced a response.
    #[error("HTTP error: {message}")]
    Http { message: String },

    /// The provider answered with a body we could not decode.
    #[error("Failed to decode provider response: {message}")]
    Decode { message: String },
}

impl AnalyticsError {
    /// Creates a new unknown query type error.
    pub fn unknown_type(kind: impl Into<String>) -> Self {
        Self::UnknownQueryType { kind: kind.into() }
    }

    /// Creates a new invalid parameter error.
    pub fn invalid_parameter(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Creates a new missing configuration error.
    pub fn missing_config(key: impl Into<String>) -> Self {
        Self::MissingConfiguration { key: key.into() }
    }

    /// Creates a new configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigurationError {
            message: message.into(),
        }
    }

    /// Creates a new upstream error.
    pub fn upstream(status: u16, body: impl Into<String>) -> Self {
        Self::Upstream {
            status,
            body: body.into(),
        }
    }

    /// Creates a new token exchange error.
    pub fn token_exchange(message: impl Into<String>) -> Self {
        Self::TokenExchange {
            message: message.into(),
        }
    }

    /// Returns true if the caller sent something we cannot serve.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownQueryType { .. }
                | Self::InvalidParameter { .. }
                | Self::InvalidDateRange { .. }
        )
    }

    /// Returns an HTTP status code appropriate for this error.
    pub fn status_code(&self) -> u16 {
        if self.is_client_error() { 400 } else { 500 }
    }
}

/// A Result type alias using AnalyticsError.
pub type AnalyticsResult<T> = Result<T, AnalyticsError>;

impl From<serde_json::Error> for AnalyticsError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode {
            message: err.to_string(),
        }
    }
}
