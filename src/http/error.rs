//! Mapping of request failures onto HTTP responses.
//!
//! Client-facing bodies are fixed plain-text strings; details stay in the
//! server log.

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::FormRejection,
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::submission::services::SubmissionServiceError;

/// Body returned when validation fails.
pub const VALIDATION_MESSAGE: &str = "Please fill required fields and give consent.";
/// Body returned when the submission could not be saved.
pub const SERVER_ERROR_MESSAGE: &str = "Server error saving submission.";
/// Body returned when a file arrives in a field other than `attachment`.
pub const UNEXPECTED_FILE_MESSAGE: &str = "Unexpected file field.";

/// Errors surfaced by request handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request was understood but rejected; the message is sent as-is.
    #[error("bad request: {0}")]
    BadRequest(&'static str),

    /// The request is not a readable multipart body.
    #[error(transparent)]
    MultipartRejected(#[from] MultipartRejection),

    /// The multipart body could not be read.
    #[error(transparent)]
    Multipart(#[from] MultipartError),

    /// The URL-encoded body could not be read.
    #[error(transparent)]
    Form(#[from] FormRejection),

    /// The server failed to complete the request.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<SubmissionServiceError> for ApiError {
    fn from(err: SubmissionServiceError) -> Self {
        match err {
            SubmissionServiceError::Validation(_) => Self::BadRequest(VALIDATION_MESSAGE),
            other @ (SubmissionServiceError::Attachment(_)
            | SubmissionServiceError::Persistence { .. }) => Self::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, message.to_owned()),
            Self::MultipartRejected(rejection) => (rejection.status(), rejection.body_text()),
            Self::Multipart(err) => (err.status(), err.body_text()),
            Self::Form(rejection) => (rejection.status(), rejection.body_text()),
            Self::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                SERVER_ERROR_MESSAGE.to_owned(),
            ),
        };

        (
            status,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            body,
        )
            .into_response()
    }
}
