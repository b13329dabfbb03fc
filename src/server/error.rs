//! Server error type
//!
//! Handlers return `Result<T, ServerError>`; the error renders as a JSON
//! body with a matching status code.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use crate::convert::ConversionError;

#[derive(Debug, Error)]
pub enum ServerError {
    /// The request was unusable (no file, bad multipart, unknown field)
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The upload exceeded the configured limit
    #[error("upload exceeds the {limit} byte limit")]
    PayloadTooLarge { limit: usize },

    /// The uploaded playlist could not be converted
    #[error(transparent)]
    Conversion(#[from] ConversionError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        match self {
            ServerError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
            }
            ServerError::PayloadTooLarge { limit } => (
                StatusCode::PAYLOAD_TOO_LARGE,
                Json(json!({ "error": format!("upload exceeds the {} byte limit", limit) })),
            )
                .into_response(),
            ServerError::Conversion(err) => {
                warn!(
                    stage = %err.stage(),
                    track = ?err.track_index(),
                    "Conversion failed: {}",
                    err
                );
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(json!({
                        "error": err.to_string(),
                        "stage": err.stage(),
                        "track": err.track_index(),
                    })),
                )
                    .into_response()
            }
            ServerError::Internal(message) => {
                error!(message = %message, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "internal server error" })),
                )
                    .into_response()
            }
        }
    }
}
