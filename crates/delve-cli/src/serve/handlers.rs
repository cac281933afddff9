//! HTTP route handlers for the research server.
//!
//! Handlers are kept thin, delegating to the pipeline.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};

use delve_core::PipelineError;

use super::models::{ErrorBody, ResearchRequest, ResearchResponse};
use super::AppState;

/// A failed request, rendered as `{"detail": ...}`.
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        let status = match err {
            PipelineError::EmptyPrompt => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            detail: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody { detail: self.detail })).into_response()
    }
}

/// GET `/health`
pub async fn health() -> Json<Value> {
    Json(json!({ "ok": true }))
}

/// POST `/research` - Runs the full pipeline for `prompt`.
///
/// A blocked run is a successful response carrying `safety`.
pub async fn research(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ResearchRequest>,
) -> Result<Json<ResearchResponse>, ApiError> {
    let prompt = request.prompt.trim();
    if prompt.is_empty() {
        return Err(PipelineError::EmptyPrompt.into());
    }

    match state.pipeline.run(prompt).await {
        Ok(run) => Ok(Json(run.into())),
        Err(err) => {
            tracing::error!(error = %err, "research request failed");
            Err(err.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_prompt_is_bad_request() {
        let err = ApiError::from(PipelineError::EmptyPrompt);
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.detail, "prompt is required");
    }

    #[test]
    fn test_upstream_failure_is_server_error() {
        let err = ApiError::from(PipelineError::Search(delve_core::UpstreamError::Timeout));
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_health() {
        let Json(body) = health().await;
        assert_eq!(body, json!({ "ok": true }));
    }
}
