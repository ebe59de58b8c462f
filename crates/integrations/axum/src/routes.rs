//! Route mounting for the analytics endpoints.

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use folio_analytics::{AnalyticsRouter, DeviceCount, QueryParams};
use serde::Deserialize;
use serde_json::Value;

use crate::AnalyticsErrorResponse;

/// Creates an Axum router with the analytics endpoints.
///
/// - `GET /analytics/realtime?type=&limit=`
/// - `GET /analytics/devices`
/// - `GET /analytics?type=&days=&limit=`
///
/// # Example
///
/// ```rust,ignore
/// let app = Router::new().merge(analytics_routes(router));
/// ```
pub fn analytics_routes<S>(router: AnalyticsRouter) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/analytics", get(dashboard_handler))
        .route("/analytics/realtime", get(realtime_handler))
        .route("/analytics/devices", get(devices_handler))
        .with_state(AnalyticsState { router })
}

/// Shared state for analytics routes.
#[derive(Clone)]
struct AnalyticsState {
    router: AnalyticsRouter,
}

/// Raw query string; values are validated by `QueryParams::parse`.
#[derive(Debug, Default, Deserialize)]
struct RawParams {
    #[serde(rename = "type")]
    kind: Option<String>,
    limit: Option<String>,
    days: Option<String>,
}

impl RawParams {
    fn parse(&self) -> Result<QueryParams, AnalyticsErrorResponse> {
        Ok(QueryParams::parse(
            self.limit.as_deref(),
            self.days.as_deref(),
        )?)
    }
}

async fn realtime_handler(
    State(state): State<AnalyticsState>,
    Query(raw): Query<RawParams>,
) -> Result<Json<Value>, AnalyticsErrorResponse> {
    let params = raw.parse()?;
    let body = state.router.handle(raw.kind.as_deref(), &params).await?;
    Ok(Json(body))
}

async fn dashboard_handler(
    State(state): State<AnalyticsState>,
    Query(raw): Query<RawParams>,
) -> Result<Json<Value>, AnalyticsErrorResponse> {
    let params = raw.parse()?;
    let body = state
        .router
        .handle_dashboard(raw.kind.as_deref(), &params)
        .await?;
    Ok(Json(body))
}

async fn devices_handler(State(state): State<AnalyticsState>) -> Json<[DeviceCount; 3]> {
    Json(state.router.devices_or_fallback().await)
}
