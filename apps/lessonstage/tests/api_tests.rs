//! Integration tests for the lessonstage HTTP API.
//!
//! Uses axum-test to test the API handlers without starting a real server.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use axum::http::HeaderValue;
use axum_test::TestServer;
use lessonstage::agents::Agents;
use lessonstage::api::{AppState, ErrorResponse, HealthResponse, SecuritySettings, create_router};
use lessonstage_core::{PipelineResult, StepOutput};
use serde_json::json;

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Offline agents, no auth, no rate limiting.
fn create_test_server() -> TestServer {
    create_test_server_with(SecuritySettings::default())
}

fn create_test_server_with(security: SecuritySettings) -> TestServer {
    let state = AppState::new(Agents::offline());
    TestServer::new(create_router(state, &security)).unwrap()
}

fn create_auth_test_server(api_key: &str) -> TestServer {
    create_test_server_with(SecuritySettings {
        api_key: Some(api_key.to_string()),
        ..SecuritySettings::default()
    })
}

fn bearer(key: &str) -> HeaderValue {
    format!("Bearer {}", key).parse::<HeaderValue>().unwrap()
}

// =============================================================================
// HEALTH ENDPOINT TESTS
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let server = create_test_server();

    let response = server.get("/health").await;

    response.assert_status_ok();
    let health: HealthResponse = response.json();
    assert_eq!(health.status, "ok");
    assert_eq!(health.agents, "offline");
    assert!(!health.version.is_empty());
}

// =============================================================================
// GENERATE ASSESSMENT TESTS
// =============================================================================

#[tokio::test]
async fn test_generate_assessment_returns_full_record() {
    let server = create_test_server();

    let response = server
        .post("/generate-assessment")
        .json(&json!({"grade": 3, "topic": "Types of Angles"}))
        .await;

    response.assert_status_ok();
    let result: PipelineResult = response.json();
    assert_eq!(result.grade, Some(3));
    assert_eq!(result.topic.as_deref(), Some("Types of Angles"));
    assert!(result.refined);
    assert_eq!(result.steps.len(), 3);
    assert_eq!(result.steps[0].agent, "Generator Agent");
    assert_eq!(result.steps[1].agent, "Reviewer Agent");
    assert_eq!(result.steps[2].action, "Refined Generation");

    let review = result.steps[1].output.as_review().unwrap();
    assert!(review.is_fail());

    match &result.steps[2].output {
        StepOutput::Generation { output: refined, .. } => assert_eq!(refined, &result.final_content),
        other => panic!("expected refined generation, got {:?}", other),
    }
}

#[tokio::test]
async fn test_generate_assessment_steps_are_tagged() {
    let server = create_test_server();

    let response = server
        .post("/generate-assessment")
        .json(&json!({"grade": 9, "topic": "Angles"}))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["steps"][0]["output"]["kind"], "generation");
    assert_eq!(body["steps"][1]["output"]["kind"], "review");
    assert_eq!(body["final_content"]["mcqs"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_generate_assessment_rejects_grade_out_of_range() {
    let server = create_test_server();

    for grade in [0, 13] {
        let response = server
            .post("/generate-assessment")
            .json(&json!({"grade": grade, "topic": "Angles"}))
            .await;

        response.assert_status_bad_request();
        let error: ErrorResponse = response.json();
        assert!(error.error.contains("grade"), "grade {}: {}", grade, error.error);
    }
}

#[tokio::test]
async fn test_generate_assessment_rejects_empty_topic() {
    let server = create_test_server();

    let response = server
        .post("/generate-assessment")
        .json(&json!({"grade": 4, "topic": "   "}))
        .await;

    response.assert_status_bad_request();
    let error: ErrorResponse = response.json();
    assert!(error.error.contains("topic is empty"));
}

#[tokio::test]
async fn test_generate_assessment_rejects_long_topic() {
    let server = create_test_server();

    let response = server
        .post("/generate-assessment")
        .json(&json!({"grade": 4, "topic": "a".repeat(201)}))
        .await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_generate_assessment_missing_field() {
    let server = create_test_server();

    let response = server
        .post("/generate-assessment")
        .json(&json!({"grade": 4}))
        .await;

    assert_eq!(
        response.status_code().as_u16(),
        422,
        "Missing topic should be rejected by the JSON extractor"
    );
}

#[tokio::test]
async fn test_generate_assessment_wrong_method() {
    let server = create_test_server();

    let response = server.get("/generate-assessment").await;

    assert_eq!(response.status_code().as_u16(), 405);
}

// =============================================================================
// AUTHENTICATION TESTS
// =============================================================================

#[tokio::test]
async fn test_auth_valid_bearer_token() {
    let api_key = "test-secret-key-12345";
    let server = create_auth_test_server(api_key);

    let response = server
        .post("/generate-assessment")
        .add_header(axum::http::header::AUTHORIZATION, bearer(api_key))
        .json(&json!({"grade": 5, "topic": "Fractions"}))
        .await;

    response.assert_status_ok();
    let result: PipelineResult = response.json();
    assert_eq!(result.steps.len(), result.expected_steps());
}

#[tokio::test]
async fn test_auth_invalid_token_rejected() {
    let server = create_auth_test_server("correct-key");

    let response = server
        .post("/generate-assessment")
        .add_header(axum::http::header::AUTHORIZATION, bearer("wrong-key"))
        .json(&json!({"grade": 5, "topic": "Fractions"}))
        .await;

    assert_eq!(
        response.status_code().as_u16(),
        401,
        "Invalid token should return 401 Unauthorized"
    );
}

#[tokio::test]
async fn test_auth_missing_header_rejected() {
    let server = create_auth_test_server("required-key");

    let response = server
        .post("/generate-assessment")
        .json(&json!({"grade": 5, "topic": "Fractions"}))
        .await;

    assert_eq!(
        response.status_code().as_u16(),
        401,
        "Missing Authorization header should return 401 Unauthorized"
    );
}

#[tokio::test]
async fn test_auth_health_endpoint_bypasses_auth() {
    let server = create_auth_test_server("secret-key-for-bypass-test");

    let response = server.get("/health").await;

    response.assert_status_ok();
}

// =============================================================================
// RATE LIMITING TESTS
// =============================================================================

#[tokio::test]
async fn test_rate_limit_exceeded() {
    let server = create_test_server_with(SecuritySettings {
        rate_limit: 1,
        ..SecuritySettings::default()
    });

    server.get("/health").await.assert_status_ok();
    let response = server.get("/health").await;

    assert_eq!(
        response.status_code().as_u16(),
        429,
        "Second request within the same second should be limited"
    );
}
