//! Model-backed pipeline runs against a local stand-in for the Gemini API.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use lessonstage::agents::{AgentBackend, Agents, GeminiClient};
use lessonstage_core::{AssessmentRequest, StepOutput};
use serde_json::{Value, json};
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

const API_KEY: &str = "test-key";

/// Scripted replies, one per call, in call order.
#[derive(Clone)]
struct Script {
    replies: Arc<Vec<String>>,
    calls: Arc<AtomicUsize>,
}

async fn generate_content(
    State(script): State<Script>,
    uri: Uri,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if headers.get("x-goog-api-key").and_then(|v| v.to_str().ok()) != Some(API_KEY) {
        return StatusCode::FORBIDDEN.into_response();
    }
    if !uri.path().ends_with("/models/test-model:generateContent") {
        return StatusCode::NOT_FOUND.into_response();
    }
    if body["contents"][0]["parts"][0]["text"].as_str().is_none() {
        return StatusCode::BAD_REQUEST.into_response();
    }

    let call = script.calls.fetch_add(1, Ordering::SeqCst);
    match script.replies.get(call) {
        Some(text) => Json(json!({
            "candidates": [{"content": {"parts": [{"text": text}]}}]
        }))
        .into_response(),
        None => (StatusCode::SERVICE_UNAVAILABLE, "script exhausted").into_response(),
    }
}

/// Serve `replies` on an ephemeral port and return a client pointed at it.
async fn spawn_model(replies: Vec<String>) -> (GeminiClient, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let script = Script {
        replies: Arc::new(replies),
        calls: Arc::clone(&calls),
    };
    let app = Router::new()
        .fallback(generate_content)
        .with_state(script);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let client = GeminiClient::new(format!("http://{}", addr), "test-model", API_KEY).unwrap();
    (client, calls)
}

fn generation_reply(explanation: &str) -> String {
    let body = json!({
        "explanation": explanation,
        "mcqs": [{
            "question": "What does a protractor measure?",
            "options": ["Angles", "Mass", "Time", "Heat"],
            "answer": "Angles"
        }]
    });
    format!("```json\n{}\n```", body)
}

fn review_reply(status: &str, feedback: &str) -> String {
    json!({"status": status, "feedback": [feedback]}).to_string()
}

#[tokio::test]
async fn test_passing_review_skips_refinement() {
    let (client, calls) = spawn_model(vec![
        generation_reply("A protractor measures angles in degrees."),
        review_reply("pass", "Clear and correct."),
    ])
    .await;
    let agents = Agents::new(AgentBackend::Gemini(client));

    let result = agents
        .run(AssessmentRequest::new(5, "Measuring Angles"))
        .await
        .unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert!(!result.refined);
    assert_eq!(result.steps.len(), 2);
    assert_eq!(
        result.final_content.explanation,
        "A protractor measures angles in degrees."
    );
}

#[tokio::test]
async fn test_failing_review_triggers_one_refinement() {
    let (client, calls) = spawn_model(vec![
        generation_reply("Angles."),
        review_reply("FAIL", "Explain what a degree is."),
        generation_reply("A degree is one of 360 equal parts of a full turn."),
    ])
    .await;
    let agents = Agents::new(AgentBackend::Gemini(client));

    let result = agents
        .run(AssessmentRequest::new(5, "Measuring Angles"))
        .await
        .unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert!(result.refined);
    let review = result.steps[1].output.as_review().unwrap();
    assert_eq!(review.status_label(), "FAIL");
    match &result.steps[2].output {
        StepOutput::Generation { output: refined, .. } => {
            assert!(refined.explanation.starts_with("A degree"));
        }
        other => panic!("expected generation, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unparseable_reply_becomes_apology() {
    let (client, _calls) = spawn_model(vec![
        "this is not json".to_string(),
        review_reply("pass", "Fine."),
    ])
    .await;
    let agents = Agents::new(AgentBackend::Gemini(client));

    let result = agents
        .run(AssessmentRequest::new(2, "Shapes"))
        .await
        .unwrap();

    assert!(!result.refined);
    assert!(result.final_content.explanation.starts_with("Oh no!"));
    assert!(result.final_content.mcqs.is_empty());
}

#[tokio::test]
async fn test_mcq_with_three_options_becomes_apology() {
    let short = json!({
        "explanation": "Triangles have three sides.",
        "mcqs": [{
            "question": "How many sides does a triangle have?",
            "options": ["Three", "Four", "Five"],
            "answer": "Three"
        }]
    });
    let (client, _calls) = spawn_model(vec![
        short.to_string(),
        review_reply("pass", "Fine."),
    ])
    .await;
    let agents = Agents::new(AgentBackend::Gemini(client));

    let result = agents
        .run(AssessmentRequest::new(2, "Shapes"))
        .await
        .unwrap();

    assert!(result.final_content.explanation.starts_with("Oh no!"));
    assert!(result.final_content.mcqs.is_empty());
}

#[tokio::test]
async fn test_complete_reports_status_errors() {
    let (client, _calls) = spawn_model(Vec::new()).await;

    let err = client.complete("hello").await.unwrap_err();

    assert!(err.to_string().contains("503"), "{}", err);
}
