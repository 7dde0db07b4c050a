//! REST API endpoint handlers.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use promptlens::analysis::{AnalysisHandler, AnalysisInput, AnalysisResult};
use promptlens::error::AnalysisError;
use serde::Serialize;
use tracing::warn;

/// Shared application state passed to all handlers via axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    pub handler: Arc<AnalysisHandler>,
}

/// Body of every non-2xx response: `{"error": "<message>"}`.
#[derive(Serialize, Debug)]
pub struct ErrorBody {
    pub error: String,
}

/// An error mapped to an HTTP status and an [`ErrorBody`].
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl From<AnalysisError> for ApiError {
    fn from(e: AnalysisError) -> Self {
        let status = StatusCode::from_u16(e.class().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        Self::new(status, e.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        warn!("rejected request body: {}", rejection.body_text());
        Self::new(
            StatusCode::BAD_REQUEST,
            format!("Invalid request body: {}", rejection.body_text()),
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                error: self.message,
            }),
        )
            .into_response()
    }
}

/// POST /api/analyze: run one analysis.
///
/// Body: `{"type": "url" | "description", "value": "..."}`. Returns the
/// [`AnalysisResult`] on success; otherwise 400, 502, or 500 with an
/// [`ErrorBody`].
pub async fn post_analyze(
    State(app): State<AppState>,
    body: Result<Json<AnalysisInput>, JsonRejection>,
) -> Result<Json<AnalysisResult>, ApiError> {
    let Json(input) = body?;
    let result = app.handler.analyze(input).await?;
    Ok(Json(result))
}

/// GET /api/health: liveness plus the configured model.
pub async fn get_health(State(app): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "model": app.handler.config().model,
    }))
}
