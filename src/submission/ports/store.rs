//! Persistence port for contact-form submissions.

use crate::submission::domain::{Submission, SubmissionId};
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Result type for submission store operations.
pub type SubmissionStoreResult<T> = Result<T, SubmissionStoreError>;

/// Identifies which persistence backend handled a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKind {
    /// Managed document database reached over the network.
    Remote,
    /// JSON files on local disk, used when the remote store is unavailable.
    LocalFallback,
    /// Process-local map, used in tests.
    Memory,
}

impl StoreKind {
    /// Returns the stable label used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Remote => "cosmos",
            Self::LocalFallback => "local_file",
            Self::Memory => "memory",
        }
    }
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Submission persistence contract.
///
/// Implementations must be safe to share between concurrent requests; the
/// handle is created once at startup and never locked by callers.
#[async_trait]
pub trait SubmissionStore: Send + Sync {
    /// Reports which backend this store writes to.
    fn kind(&self) -> StoreKind;

    /// Persists a new submission keyed by its identifier.
    ///
    /// # Errors
    ///
    /// Returns [`SubmissionStoreError::Duplicate`] when a record with the
    /// same identifier already exists, or another variant when the backend
    /// cannot accept the write.
    async fn save(&self, submission: &Submission) -> SubmissionStoreResult<()>;
}

/// Errors returned by submission store implementations.
#[derive(Debug, Clone, Error)]
pub enum SubmissionStoreError {
    /// A record with the same identifier already exists.
    #[error("duplicate submission identifier: {0}")]
    Duplicate(SubmissionId),

    /// The remote store could not be reached or was misconfigured.
    #[error("remote store unavailable: {0}")]
    Unavailable(Arc<dyn std::error::Error + Send + Sync>),

    /// The remote store answered with a non-success status.
    #[error("remote store rejected request with status {status}: {message}")]
    Rejected {
        /// HTTP status returned by the store.
        status: u16,
        /// Response body, as returned by the store.
        message: String,
    },

    /// Local file I/O failed.
    #[error("i/o error: {0}")]
    Io(Arc<dyn std::error::Error + Send + Sync>),

    /// The submission could not be encoded.
    #[error("serialization error: {0}")]
    Serialization(Arc<dyn std::error::Error + Send + Sync>),
}

impl SubmissionStoreError {
    /// Wraps a connectivity or configuration error for the remote store.
    pub fn unavailable(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Unavailable(Arc::new(err))
    }

    /// Wraps a local I/O error.
    pub fn io(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Io(Arc::new(err))
    }

    /// Wraps an encoding error.
    pub fn serialization(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Serialization(Arc::new(err))
    }
}
