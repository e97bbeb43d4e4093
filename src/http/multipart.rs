//! Multipart decoding of the contact form.
//!
//! Text parts become [`FormFields`]; the `attachment` file part is written
//! to the upload directory as it is read, before validation runs.

use axum::extract::Multipart;
use tracing::{debug, error};

use super::error::{ApiError, UNEXPECTED_FILE_MESSAGE};
use crate::submission::{
    adapters::uploads::UploadDirectory,
    domain::{ATTACHMENT_FIELD, FormFields, UploadedFile},
};

/// Decoded contact-form request.
#[derive(Debug, Default)]
pub struct SubmissionRequest {
    /// Text fields in arrival order per key.
    pub fields: FormFields,
    /// The stored attachment, if one was sent.
    pub upload: Option<UploadedFile>,
}

/// Reads every part of a contact-form request.
///
/// A file part with an empty file name is what browsers send when no file
/// was chosen; it is ignored whatever its content.
///
/// # Errors
///
/// Returns [`ApiError::Multipart`] when the body is malformed or too large,
/// [`ApiError::BadRequest`] when a file arrives in any field other than a
/// single `attachment`, and [`ApiError::Internal`] when the upload cannot be
/// written.
pub async fn read_submission(
    mut multipart: Multipart,
    uploads: &UploadDirectory,
) -> Result<SubmissionRequest, ApiError> {
    let mut request = SubmissionRequest::default();

    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };

        let Some(file_name) = field.file_name().map(str::to_owned) else {
            let value = field.text().await?;
            request.fields.push(name, value);
            continue;
        };

        if name != ATTACHMENT_FIELD || request.upload.is_some() {
            debug!(field = %name, "rejecting unexpected file field");
            return Err(ApiError::BadRequest(UNEXPECTED_FILE_MESSAGE));
        }

        // Browsers send a nameless part when no file was chosen.
        if file_name.is_empty() {
            continue;
        }

        let mime_type = field.content_type().map(str::to_owned);
        let contents = field.bytes().await?;

        let stored = uploads
            .store(file_name, mime_type.as_deref(), contents)
            .await
            .map_err(|err| {
                error!(error = %err, "failed to store uploaded attachment");
                ApiError::Internal(err.to_string())
            })?;
        request.upload = Some(stored);
    }

    Ok(request)
}
