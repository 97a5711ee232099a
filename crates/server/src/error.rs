//! Request-boundary error mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use zepp_store::StoreError;

/// Errors a read endpoint can surface.
///
/// Each store failure kind maps to its own status and payload, rather than
/// collapsing everything into one generic message.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("malformed job id")]
    MalformedId,
    #[error("job not found")]
    JobNotFound,
    #[error("store unavailable")]
    StoreUnavailable,
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::InvalidId(_) => ApiError::MalformedId,
            StoreError::NotFound => ApiError::JobNotFound,
            StoreError::Unavailable(_) | StoreError::Serialization(_) => {
                ApiError::StoreUnavailable
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::MalformedId => StatusCode::BAD_REQUEST,
            ApiError::JobNotFound => StatusCode::NOT_FOUND,
            ApiError::StoreUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
