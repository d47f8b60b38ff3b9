//! # API Endpoint Handlers
//!
//! This module implements the actual HTTP endpoint handlers.

use super::{
    AppState,
    types::{ErrorResponse, HealthResponse},
};
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use lessonstage_core::{AssessmentRequest, LessonError};

// =============================================================================
// HEALTH HANDLER
// =============================================================================

/// Health check endpoint.
pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse::new(state.agents.backend().name()))
}

// =============================================================================
// GENERATE ASSESSMENT HANDLER
// =============================================================================

/// Run the full pipeline for one request and return its record.
pub async fn generate_assessment_handler(
    State(state): State<AppState>,
    Json(request): Json<AssessmentRequest>,
) -> Response {
    if let Err(e) = request.validate() {
        return (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(e.to_string()))).into_response();
    }

    match state.agents.run(request).await {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(e @ LessonError::InvalidRequest(_)) => {
            (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(e.to_string()))).into_response()
        }
        Err(e) => {
            tracing::error!("Pipeline run failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(format!("Pipeline failed: {}", e))),
            )
                .into_response()
        }
    }
}
