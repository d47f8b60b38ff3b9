//! # lessonstage HTTP Client
//!
//! Wrapper around the backend's `POST /generate-assessment` for use by the
//! presenter.

use lessonstage_core::{AssessmentRequest, PipelineResult};
use std::future::Future;
use thiserror::Error;

/// Errors from the HTTP client layer.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Cannot reach the backend.
    #[error("Cannot connect to lessonstage at {0}")]
    ConnectionFailed(String),

    /// 401 Unauthorized - invalid or missing API key.
    #[error("Unauthorized: invalid or missing API key")]
    Unauthorized,

    /// 429 Too Many Requests.
    #[error("Rate limited: too many requests")]
    RateLimited,

    /// Any other non-2xx status.
    #[error("Server returned {0}: {1}")]
    Status(u16, String),

    /// Response body is not a pipeline result.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Anything that can produce a pipeline result for a request.
pub trait PipelineSource {
    fn fetch(
        &self,
        request: &AssessmentRequest,
    ) -> impl Future<Output = Result<PipelineResult, ClientError>> + Send;
}

/// HTTP client for one lessonstage backend.
#[derive(Clone)]
pub struct LessonClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl LessonClient {
    /// Create a client pointing at the given backend URL.
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        }
    }

    /// Check status codes and parse the pipeline result.
    async fn handle_response(resp: reqwest::Response) -> Result<PipelineResult, ClientError> {
        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ClientError::Unauthorized);
        }
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ClientError::RateLimited);
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::Status(status.as_u16(), body));
        }
        resp.json::<PipelineResult>()
            .await
            .map_err(|e| ClientError::Parse(e.to_string()))
    }
}

impl PipelineSource for LessonClient {
    /// POST /generate-assessment
    async fn fetch(&self, request: &AssessmentRequest) -> Result<PipelineResult, ClientError> {
        let url = format!("{}/generate-assessment", self.base_url);
        let mut req = self.http.post(&url).json(request);
        if let Some(ref key) = self.api_key {
            req = req.bearer_auth(key);
        }
        tracing::debug!(grade = request.grade, topic = %request.topic, "Requesting pipeline run");

        let resp = req
            .send()
            .await
            .map_err(|e| ClientError::ConnectionFailed(format!("{}: {e}", self.base_url)))?;
        Self::handle_response(resp).await
    }
}

// =============================================================================
// TESTS
// =============================================================================
