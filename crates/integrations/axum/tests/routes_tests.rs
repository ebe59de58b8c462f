//! HTTP-level tests for the analytics routes.

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode},
    response::IntoResponse,
};
use folio_analytics::AnalyticsRouter;
use folio_axum::{AnalyticsErrorResponse, analytics_routes};
use folio_core::{AnalyticsError, Dimension, Metric, RawReportRow};
use folio_provider_memory::{MemoryProvider, ReportKey};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

fn test_app(provider: MemoryProvider) -> Router {
    analytics_routes(AnalyticsRouter::from_provider(Arc::new(provider)))
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn zero_devices() -> Value {
    json!([
        {"name": "Desktop", "value": 0, "device": "desktop"},
        {"name": "Mobile", "value": 0, "device": "mobile"},
        {"name": "Tablet", "value": 0, "device": "tablet"}
    ])
}

mod realtime_route_tests {
    use super::*;

    #[tokio::test]
    async fn test_unknown_type_is_bad_request() {
        let (status, body) = get(test_app(MemoryProvider::new()), "/analytics/realtime?type=bogus").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], 400);
        assert!(body["error"].as_str().unwrap().contains("bogus"));
    }

    #[tokio::test]
    async fn test_missing_type_is_bad_request() {
        let (status, _) = get(test_app(MemoryProvider::new()), "/analytics/realtime").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_non_numeric_limit_is_bad_request() {
        let (status, body) = get(
            test_app(MemoryProvider::new()),
            "/analytics/realtime?type=countries&limit=abc",
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("limit"));
    }

    #[tokio::test]
    async fn test_cities_with_limit() {
        let provider = MemoryProvider::new().with_rows(
            ReportKey::core(Metric::ActiveUsers).dimension(Dimension::City),
            vec![
                RawReportRow::new(["Berlin"], ["9"]),
                RawReportRow::new(["Paris"], ["4"]),
                RawReportRow::new(["Rome"], ["2"]),
            ],
        );

        let (status, body) = get(test_app(provider), "/analytics/realtime?type=cities&limit=2").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!([{"city": "Berlin", "users": 9}, {"city": "Paris", "users": 4}])
        );
    }

    #[tokio::test]
    async fn test_provider_failure_is_server_error() {
        let (status, body) = get(
            test_app(MemoryProvider::failing()),
            "/analytics/realtime?type=activeUsers",
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], 500);
    }

    #[tokio::test]
    async fn test_active_users_shape() {
        let (status, body) = get(
            test_app(MemoryProvider::new()),
            "/analytics/realtime?type=activeUsers",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        for field in ["activeUsers", "newUsers", "timeline", "last30Min", "last5Min"] {
            assert!(body.get(field).is_some(), "missing {field}");
        }
    }
}

mod devices_route_tests {
    use super::*;

    #[tokio::test]
    async fn test_devices_fallback_is_ok() {
        let (status, body) = get(test_app(MemoryProvider::failing()), "/analytics/devices").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, zero_devices());
    }

    #[tokio::test]
    async fn test_devices_report() {
        let provider = MemoryProvider::new().with_rows(
            ReportKey::core(Metric::ActiveUsers).dimension(Dimension::DeviceCategory),
            vec![RawReportRow::new(["desktop"], ["17"])],
        );
        let (status, body) = get(test_app(provider), "/analytics/devices").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0], json!({"name": "Desktop", "value": 17, "device": "desktop"}));
        assert_eq!(body.as_array().map(Vec::len), Some(3));
    }
}

mod dashboard_route_tests {
    use super::*;

    #[tokio::test]
    async fn test_overview() {
        let (status, body) = get(test_app(MemoryProvider::new()), "/analytics?type=overview").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["avgSessionDuration"]["description"], "Average time on site");
    }

    #[tokio::test]
    async fn test_bad_days_is_bad_request() {
        let (status, _) =
            get(test_app(MemoryProvider::new()), "/analytics?type=pageViews&days=week").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_dashboard_type() {
        let (status, body) = get(test_app(MemoryProvider::new()), "/analytics?type=activeUsers").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], 400);
    }
}

#[test]
fn test_error_response_body() {
    let response =
        AnalyticsErrorResponse::from(AnalyticsError::missing_config("GA_PROPERTY_ID")).into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
