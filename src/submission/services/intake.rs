//! Service layer for contact-form submissions.
//!
//! Provides [`SubmissionService`], which validates decoded form fields,
//! attaches upload metadata, builds the [`Submission`] record and hands it
//! to the configured [`SubmissionStore`].

use crate::submission::{
    domain::{
        Attachment, AttachmentPathError, ContactForm, FormFields, Submission, SubmissionId,
        SubmissionValidationError, UploadedFile,
    },
    ports::{StoreKind, SubmissionStore, SubmissionStoreError},
};
use camino::Utf8PathBuf;
use mockable::Clock;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

/// Landing page shown after a successful submission.
pub const DEFAULT_REDIRECT: &str = "/contact_details.html?submitted=1";

/// Location the client is sent to after a successful submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectTarget(String);

impl RedirectTarget {
    /// Creates a redirect target.
    #[must_use]
    pub fn new(location: impl Into<String>) -> Self {
        Self(location.into())
    }

    /// Returns the target as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RedirectTarget {
    fn default() -> Self {
        Self::new(DEFAULT_REDIRECT)
    }
}

impl fmt::Display for RedirectTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Service-level errors for submission handling.
#[derive(Debug, Error)]
pub enum SubmissionServiceError {
    /// The form failed validation; nothing was persisted.
    #[error(transparent)]
    Validation(#[from] SubmissionValidationError),

    /// Attachment metadata could not be derived from the stored upload.
    #[error(transparent)]
    Attachment(#[from] AttachmentPathError),

    /// The active backend rejected the write.
    #[error("failed to save submission {id} to {backend} store: {source}")]
    Persistence {
        /// Identifier of the record that was not saved.
        id: SubmissionId,
        /// Backend the write was attempted against.
        backend: StoreKind,
        /// Underlying store failure.
        #[source]
        source: SubmissionStoreError,
    },
}

/// Result type for submission service operations.
pub type SubmissionServiceResult<T> = Result<T, SubmissionServiceError>;

/// Contact-form intake orchestration service.
pub struct SubmissionService<S, C>
where
    S: SubmissionStore,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    clock: Arc<C>,
    app_root: Utf8PathBuf,
    redirect: RedirectTarget,
}

impl<S, C> SubmissionService<S, C>
where
    S: SubmissionStore,
    C: Clock + Send + Sync,
{
    /// Creates a service writing to `store`.
    ///
    /// `app_root` is the directory attachment paths are made relative to.
    #[must_use]
    pub fn new(store: Arc<S>, clock: Arc<C>, app_root: impl Into<Utf8PathBuf>) -> Self {
        Self {
            store,
            clock,
            app_root: app_root.into(),
            redirect: RedirectTarget::default(),
        }
    }

    /// Overrides the redirect target returned on success.
    #[must_use]
    pub fn with_redirect(mut self, redirect: RedirectTarget) -> Self {
        self.redirect = redirect;
        self
    }

    /// Returns the backend this service writes to.
    #[must_use]
    pub fn backend(&self) -> StoreKind {
        self.store.kind()
    }

    /// Validates a submission and persists it to the active backend.
    ///
    /// The upload, when present, has already been written to disk; it stays
    /// there even when persistence fails.
    ///
    /// # Errors
    ///
    /// Returns [`SubmissionServiceError::Validation`] when a required field
    /// or consent is missing (no write is attempted),
    /// [`SubmissionServiceError::Attachment`] when the upload lies outside
    /// the application root, or [`SubmissionServiceError::Persistence`] when
    /// the store rejects the record.
    pub async fn handle(
        &self,
        fields: &FormFields,
        upload: Option<UploadedFile>,
    ) -> SubmissionServiceResult<RedirectTarget> {
        let form = ContactForm::from_fields(fields)?;
        let attachment = upload
            .map(|file| Attachment::from_upload(file, &self.app_root))
            .transpose()
            .inspect_err(|err| error!(error = %err, "failed to record attachment metadata"))?;

        let submission = Submission::new(form, attachment, &*self.clock);
        let id = submission.id();
        let backend = self.store.kind();

        if let Err(source) = self.store.save(&submission).await {
            error!(submission_id = %id, %backend, error = %source, "error saving submission");
            return Err(SubmissionServiceError::Persistence {
                id,
                backend,
                source,
            });
        }

        info!(submission_id = %id, %backend, "saved contact submission");
        Ok(self.redirect.clone())
    }
}
