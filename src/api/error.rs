//! Request-level errors and their HTTP rendering.

use serde_json::json;
use tracing::{debug, error};

use crate::response::{IntoResponse, Response};
use crate::status::Status;
use crate::validation::{RecordError, ValidationReport};

/// Everything a handler can fail with.
///
/// Validation failures and unknown identifiers are routine and go back to
/// the caller as-is. The last two variants are server bugs and are logged.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request validation failed: {0}")]
    Validation(#[from] ValidationReport),

    #[error("{0}")]
    NotFound(String),

    #[error("response serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Record(#[from] RecordError),
}

impl ApiError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Validation(report) => {
                debug!(failures = report.len(), "request rejected");
                Response::builder()
                    .status(Status::UnprocessableContent)
                    .json(&report)
            }
            Self::NotFound(message) => Response::builder()
                .status(Status::NotFound)
                .json(&json!({ "detail": message })),
            e @ (Self::Serialization(_) | Self::Record(_)) => {
                error!("{e}");
                Response::builder()
                    .status(Status::InternalServerError)
                    .json(&json!({ "detail": "Internal Server Error" }))
            }
        }
    }
}
