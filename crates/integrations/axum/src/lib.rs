//! # Folio Analytics Axum Integration
//!
//! Mounts the analytics endpoints on an Axum router and maps
//! `AnalyticsError` to JSON error responses.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use folio_analytics::AnalyticsRouter;
//! use folio_axum::analytics_routes;
//!
//! let app = axum::Router::new().merge(analytics_routes(AnalyticsRouter::from_provider(provider)));
//! axum::serve(listener, app).await?;
//! ```

mod routes;

pub use routes::analytics_routes;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use folio_core::AnalyticsError;

/// Wrapper for AnalyticsError that implements IntoResponse.
///
/// The body is `{"error": message, "code": status}`.
#[derive(Debug)]
pub struct AnalyticsErrorResponse(pub AnalyticsError);

impl IntoResponse for AnalyticsErrorResponse {
    fn into_response(self) -> Response {
        let code = self.0.status_code();
        let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = serde_json::json!({
            "error": self.0.to_string(),
            "code": code
        });

        (status, axum::Json(body)).into_response()
    }
}

impl From<AnalyticsError> for AnalyticsErrorResponse {
    fn from(err: AnalyticsError) -> Self {
        AnalyticsErrorResponse(err)
    }
}
