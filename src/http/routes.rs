//! Request handlers.

use axum::{
    extract::{FromRequest, Multipart, Request, State},
    response::Redirect,
};
use mockable::Clock;
use tracing::info;

use super::{
    AppState,
    error::ApiError,
    form::{is_urlencoded, read_urlencoded},
    multipart::read_submission,
};
use crate::submission::{ports::SubmissionStore, services::SubmissionServiceError};

/// Handles `POST /submit`.
///
/// Accepts `multipart/form-data` and `application/x-www-form-urlencoded`
/// bodies. Responds `303 See Other` to the landing page on success.
///
/// # Errors
///
/// Returns `400` for malformed forms or missing fields and consent, and
/// `500` when the submission could not be saved.
pub async fn submit<S, C>(
    State(state): State<AppState<S, C>>,
    request: Request,
) -> Result<Redirect, ApiError>
where
    S: SubmissionStore + 'static,
    C: Clock + Send + Sync + 'static,
{
    let submission = if is_urlencoded(&request) {
        read_urlencoded(request).await?
    } else {
        let multipart = Multipart::from_request(request, &()).await?;
        read_submission(multipart, &state.uploads).await?
    };
    let target = state
        .service
        .handle(&submission.fields, submission.upload)
        .await
        .inspect_err(|err| {
            if let SubmissionServiceError::Validation(reason) = err {
                info!(%reason, "rejected contact submission");
            }
        })?;
    Ok(Redirect::to(target.as_str()))
}

/// Handles `GET /health`.
#[expect(
    clippy::unused_async,
    reason = "axum handlers must be async functions"
)]
pub async fn health() -> &'static str {
    "ok"
}
