//! Integration tests for office endpoints, the official directory, health
//! checks and the metrics exporter.

mod common;

use axum::http::StatusCode;
use common::{
    create_test_app, get_request, get_request_with_auth, parse_response_body, response_text,
    test_config, TestApp,
};
use domain::models::{ApplicationRecord, ApplicationStatus, OfficeAccount, OfficeLevel};
use office_monitor_api::middleware::init_metrics;
use serde_json::json;
use tower::ServiceExt;

fn setup() -> (TestApp, OfficeAccount) {
    let kaski = OfficeAccount::official(OfficeLevel::District, "Kaski");
    let syangja = OfficeAccount::official(OfficeLevel::District, "Syangja");
    let monitor = OfficeAccount::monitor(OfficeLevel::Province, "Gandaki Test Monitor", [OfficeLevel::District]);

    let applications = vec![
        ApplicationRecord::new("k1", OfficeLevel::District, "Kaski", "2024-01-01")
            .with_service_type("national-id")
            .completed_on("2024-01-03"),
        ApplicationRecord::new("k2", OfficeLevel::District, "Kaski", "2024-01-02")
            .with_status(ApplicationStatus::InProgress),
        ApplicationRecord::new("s1", OfficeLevel::District, "Syangja", "2024-01-02"),
    ];

    let test = create_test_app(test_config(), vec![kaski.clone(), syangja, monitor], applications);
    (test, kaski)
}

// ============================================================================
// Office endpoints
// ============================================================================

#[tokio::test]
async fn test_office_stats_for_own_office() {
    let (test, kaski) = setup();
    let token = test.token_for(&kaski);

    let response = test
        .app
        .oneshot(get_request_with_auth("/api/office/stats", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let stats = parse_response_body(response).await;

    assert_eq!(stats["office_id"], "district:Kaski");
    assert_eq!(stats["total_applications"], 2);
    assert_eq!(stats["completed"], 1);
    assert_eq!(stats["pending"], 1);
    assert_eq!(stats["in_progress"], 1);
    assert_eq!(stats["efficiency"].as_f64(), Some(50.0));
    assert_eq!(stats["avg_processing_time"].as_f64(), Some(2.0));
    assert_eq!(
        stats["applications_by_type"],
        json!({"national-id": 1, "unknown": 1})
    );
}

#[tokio::test]
async fn test_office_stats_requires_token() {
    let (test, _) = setup();

    let response = test.app.oneshot(get_request("/api/office/stats")).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_office_applications_scoped_to_office() {
    let (test, kaski) = setup();
    let token = test.token_for(&kaski);

    let response = test
        .app
        .oneshot(get_request_with_auth("/api/office/applications", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;

    let records = body.as_array().unwrap();
    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|r| r["target_office_name"] == "Kaski"));
    assert!(records.iter().all(|r| r["target_office_level"] == "district"));
}

#[tokio::test]
async fn test_list_officials_returns_whole_directory() {
    let (test, kaski) = setup();
    let token = test.token_for(&kaski);

    let response = test
        .app
        .oneshot(get_request_with_auth("/api/officials", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;

    let officials = body.as_array().unwrap();
    assert_eq!(officials.len(), 3);
    assert!(officials.iter().any(|o| o["id"] == kaski.id.to_string()));
    assert!(officials
        .iter()
        .any(|o| o["office_name"] == "Gandaki Test Monitor" && o["is_monitor"] == true));
}

// ============================================================================
// Health checks
// ============================================================================

#[tokio::test]
async fn test_health_check_healthy() {
    let (test, _) = setup();

    let response = test.app.oneshot(get_request("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;

    assert_eq!(body["status"], "healthy");
    assert_eq!(body["store"]["connected"], true);
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_health_check_store_down() {
    let (test, _) = setup();
    test.store.set_unavailable(true);

    let response = test.app.oneshot(get_request("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = parse_response_body(response).await;

    assert_eq!(body["status"], "unhealthy");
    assert_eq!(body["store"]["connected"], false);
}

#[tokio::test]
async fn test_liveness_and_readiness() {
    let (test, _) = setup();

    let live = test.app.clone().oneshot(get_request("/api/health/live")).await.unwrap();
    assert_eq!(live.status(), StatusCode::OK);
    assert_eq!(parse_response_body(live).await["status"], "alive");

    let ready = test.app.clone().oneshot(get_request("/api/health/ready")).await.unwrap();
    assert_eq!(ready.status(), StatusCode::OK);

    test.store.set_unavailable(true);
    let not_ready = test.app.oneshot(get_request("/api/health/ready")).await.unwrap();
    assert_eq!(not_ready.status(), StatusCode::SERVICE_UNAVAILABLE);
}

// ============================================================================
// Metrics and fallback
// ============================================================================

#[tokio::test]
async fn test_metrics_endpoint_exports_request_counters() {
    init_metrics().expect("Failed to install recorder");
    let (test, _) = setup();

    let response = test.app.clone().oneshot(get_request("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = test.app.oneshot(get_request("/metrics")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let text = response_text(response).await;
    assert!(text.contains("http_requests_total"));
}

#[tokio::test]
async fn test_unknown_route_returns_json_404() {
    let (test, _) = setup();

    let response = test.app.oneshot(get_request("/api/does-not-exist")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = parse_response_body(response).await;
    assert_eq!(body["error"], "not_found");
}
