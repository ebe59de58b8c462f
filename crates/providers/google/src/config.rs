//! Google Analytics provider configuration.

use folio_core::{AnalyticsError, AnalyticsResult};
use serde::{Deserialize, Serialize};

/// Google's OAuth token endpoint.
pub const DEFAULT_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Base URL of the Analytics Data API.
pub const DEFAULT_API_BASE_URL: &str = "https://analyticsdata.googleapis.com/v1beta";

/// Service-account credentials and the property to report on.
#[derive(Clone, Serialize, Deserialize)]
pub struct GoogleAnalyticsConfig {
    /// Service account email; issuer and subject of the assertion.
    #[serde(default)]
    pub client_email: String,
    /// PEM-encoded RSA private key of the service account.
    #[serde(default)]
    pub private_key: String,
    /// Optional private key ID, sent as the assertion's `kid`.
    #[serde(default)]
    pub private_key_id: Option<String>,
    /// Numeric GA4 property ID.
    #[serde(default)]
    pub property_id: String,
    /// Token endpoint; also the assertion audience.
    #[serde(default = "default_token_url")]
    pub token_url: String,
    /// Analytics Data API base URL.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
}

fn default_token_url() -> String {
    DEFAULT_TOKEN_URL.to_string()
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

impl Default for GoogleAnalyticsConfig {
    fn default() -> Self {
        Self {
            client_email: String::new(),
            private_key: String::new(),
            private_key_id: None,
            property_id: String::new(),
            token_url: default_token_url(),
            api_base_url: default_api_base_url(),
        }
    }
}

impl std::fmt::Debug for GoogleAnalyticsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleAnalyticsConfig")
            .field("client_email", &self.client_email)
            .field("private_key", &"<redacted>")
            .field("property_id", &self.property_id)
            .field("token_url", &self.token_url)
            .field("api_base_url", &self.api_base_url)
            .finish()
    }
}

impl GoogleAnalyticsConfig {
    /// Creates a config pointing at Google's production endpoints.
    pub fn new(
        client_email: impl Into<String>,
        private_key: impl Into<String>,
        property_id: impl Into<String>,
    ) -> Self {
        Self {
            client_email: client_email.into(),
            private_key: private_key.into(),
            property_id: property_id.into(),
            ..Self::default()
        }
    }

    /// Sets the private key ID.
    pub fn with_private_key_id(mut self, key_id: impl Into<String>) -> Self {
        self.private_key_id = Some(key_id.into());
        self
    }

    /// Overrides the token endpoint.
    pub fn with_token_url(mut self, url: impl Into<String>) -> Self {
        self.token_url = url.into();
        self
    }

    /// Overrides the API base URL.
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Returns the name of the first required setting that is empty.
    pub fn missing_setting(&self) -> Option<&'static str> {
        if self.client_email.trim().is_empty() {
            Some("GOOGLE_CLIENT_EMAIL")
        } else if self.private_key.trim().is_empty() {
            Some("GOOGLE_PRIVATE_KEY")
        } else if self.property_id.trim().is_empty() {
            Some("GA_PROPERTY_ID")
        } else {
            None
        }
    }

    /// Fails with `MissingConfiguration` if a required setting is empty.
    pub fn validate(&self) -> AnalyticsResult<()> {
        match self.missing_setting() {
            Some(key) => Err(AnalyticsError::missing_config(key)),
            None => Ok(()),
        }
    }

    /// URL of a report method, e.g. `runReport`.
    pub fn report_url(&self, method: &str) -> String {
        format!(
            "{}/properties/{}:{}",
            self.api_base_url.trim_end_matches('/'),
            self.property_id,
            method
        )
    }
}
