//! Error handling
//!
//! Every error leaves the service as the standard failure envelope.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::logic::response::{Failure, FailureKind, InferenceResult};

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Body is not parseable JSON
    #[error("Malformed request body: {0}")]
    MalformedBody(String),

    /// Pipeline produced a failure envelope
    #[error("{}", .0.error)]
    Inference(Failure),
}

/// Status code for a pipeline failure
pub fn status_for(kind: FailureKind) -> StatusCode {
    match kind {
        FailureKind::Validation => StatusCode::UNPROCESSABLE_ENTITY,
        FailureKind::ResourceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        FailureKind::UnrecognizedClass => StatusCode::INTERNAL_SERVER_ERROR,
        FailureKind::Unexpected => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, result) = match self {
            AppError::MalformedBody(msg) => {
                tracing::debug!("Malformed request body: {}", msg);
                (
                    StatusCode::BAD_REQUEST,
                    InferenceResult::failure(FailureKind::Validation, "Malformed request body")
                        .with_details(msg),
                )
            }
            AppError::Inference(failure) => {
                let status = status_for(failure.kind);
                if status.is_server_error() {
                    tracing::error!("Inference error ({}): {}", status.as_u16(), failure.error);
                }
                (status, InferenceResult::Failure(failure))
            }
        };

        (status, Json(result)).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::MalformedBody(rejection.body_text())
    }
}
