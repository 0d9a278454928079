use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// A third-party provider call that did not produce a usable payload.
#[derive(Debug, Error)]
#[error("{provider} request failed: {cause}")]
pub struct UpstreamError {
    pub provider: &'static str,
    #[source]
    pub cause: anyhow::Error,
}

impl UpstreamError {
    pub fn new(provider: &'static str, cause: impl Into<anyhow::Error>) -> Self {
        Self {
            provider,
            cause: cause.into(),
        }
    }
}

/// Everything that can go wrong between sending the prompt and holding a
/// validated plan. The `raw` fields are kept for operator debugging and are
/// deliberately not part of the Display output.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("model returned an empty reply")]
    EmptyResponse,
    #[error("no JSON object found in model reply")]
    NoStructuredOutput { raw: String },
    #[error("model reply is not valid JSON: {cause}")]
    MalformedOutput {
        raw: String,
        #[source]
        cause: serde_json::Error,
    },
    #[error("model reply does not match the meal plan shape: {cause}")]
    SchemaMismatch {
        #[source]
        cause: serde_json::Error,
    },
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

/// Terminal failure of one plan request, tagged with the stage that stopped it.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("weather lookup failed: {0}")]
    Weather(#[source] UpstreamError),
    #[error("meal plan generation failed: {0}")]
    Generation(#[from] GenerationError),
}

/// HTTP-facing error. Serializes as `{"detail": "..."}` on the wire.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    UpstreamFailed(String),
    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::UpstreamFailed(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}
