//! Decoding of URL-encoded contact forms.
//!
//! Plain HTML forms without a file input post
//! `application/x-www-form-urlencoded`. Repeated keys are kept in arrival
//! order, as for multipart text parts.

use axum::{
    Form,
    extract::{FromRequest, Request},
    http::header,
};

use super::{error::ApiError, multipart::SubmissionRequest};

const URLENCODED: &str = "application/x-www-form-urlencoded";

/// Returns `true` when the request declares a URL-encoded body.
#[must_use]
pub fn is_urlencoded(request: &Request) -> bool {
    request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .is_some_and(|essence| essence.trim().eq_ignore_ascii_case(URLENCODED))
}

/// Reads a URL-encoded contact form. Such requests never carry a file.
///
/// # Errors
///
/// Returns [`ApiError::Form`] when the body is too large or cannot be
/// decoded.
pub async fn read_urlencoded(request: Request) -> Result<SubmissionRequest, ApiError> {
    let Form(pairs) = Form::<Vec<(String, String)>>::from_request(request, &()).await?;
    Ok(SubmissionRequest {
        fields: pairs.into_iter().collect(),
        upload: None,
    })
}
