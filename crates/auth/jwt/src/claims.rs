//! JWT claims structures.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Scope granting read-only access to analytics reports.
pub const ANALYTICS_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/analytics.readonly";

/// Lifetime of a service-account assertion.
pub const ASSERTION_TTL: Duration = Duration::hours(1);

/// Claims of a service-account assertion exchanged for a bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssertionClaims {
    /// Issuer (the service identity).
    pub iss: String,

    /// Subject (the service identity).
    pub sub: String,

    /// Audience (the token endpoint).
    pub aud: String,

    /// Issued at (Unix timestamp).
    pub iat: i64,

    /// Expiration time (Unix timestamp).
    pub exp: i64,

    /// Space-separated scopes requested.
    pub scope: String,
}

impl AssertionClaims {
    /// Creates claims for `service_email` addressed to `token_url`.
    pub fn new(service_email: impl Into<String>, token_url: impl Into<String>, ttl: Duration) -> Self {
        let service_email = service_email.into();
        let now = Utc::now();
        Self {
            iss: service_email.clone(),
            sub: service_email,
            aud: token_url.into(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            scope: ANALYTICS_READONLY_SCOPE.to_string(),
        }
    }

    /// Replaces the requested scope.
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }

    /// Checks if the assertion has expired.
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }

    /// Gets the expiration time as a DateTime.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    /// Gets the issued at time as a DateTime.
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.iat, 0)
    }
}
