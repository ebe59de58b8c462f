//! End-to-end tests of the assembled application without credentials.

use axum::{
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use folio_provider_google::GoogleAnalyticsConfig;
use folio_server::{app, build_provider};
use serde_json::Value;
use tower::ServiceExt;

async fn get(uri: &str) -> (StatusCode, Value) {
    let provider = build_provider(&GoogleAnalyticsConfig::default()).unwrap();
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();

    let response = app(provider).oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_unconfigured_realtime_reports_missing_setting() {
    let (status, body) = get("/analytics/realtime?type=events").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], 500);
    assert_eq!(body["error"], "Missing configuration: GOOGLE_CLIENT_EMAIL");
}

#[tokio::test]
async fn test_unconfigured_devices_still_answer() {
    let (status, body) = get("/analytics/devices").await;

    assert_eq!(status, StatusCode::OK);
    let values: Vec<u64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["value"].as_u64().unwrap())
        .collect();
    assert_eq!(values, [0, 0, 0]);
}

#[tokio::test]
async fn test_unknown_type_is_checked_before_provider() {
    let (status, _) = get("/analytics?type=nope").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
