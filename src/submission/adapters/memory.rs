//! In-memory submission store for tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::submission::{
    domain::{Submission, SubmissionId},
    ports::{StoreKind, SubmissionStore, SubmissionStoreError, SubmissionStoreResult},
};

/// Thread-safe in-memory submission store.
#[derive(Debug, Clone, Default)]
pub struct InMemorySubmissionStore {
    submissions: Arc<RwLock<HashMap<SubmissionId, Submission>>>,
}

impl InMemorySubmissionStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Finds a stored submission by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`SubmissionStoreError::Io`] when the lock is poisoned.
    pub fn find(&self, id: SubmissionId) -> SubmissionStoreResult<Option<Submission>> {
        let submissions = self.submissions.read().map_err(|err| {
            SubmissionStoreError::io(std::io::Error::other(err.to_string()))
        })?;
        Ok(submissions.get(&id).cloned())
    }

    /// Returns every stored submission in unspecified order.
    ///
    /// # Errors
    ///
    /// Returns [`SubmissionStoreError::Io`] when the lock is poisoned.
    pub fn all(&self) -> SubmissionStoreResult<Vec<Submission>> {
        let submissions = self.submissions.read().map_err(|err| {
            SubmissionStoreError::io(std::io::Error::other(err.to_string()))
        })?;
        Ok(submissions.values().cloned().collect())
    }
}

#[async_trait]
impl SubmissionStore for InMemorySubmissionStore {
    fn kind(&self) -> StoreKind {
        StoreKind::Memory
    }

    async fn save(&self, submission: &Submission) -> SubmissionStoreResult<()> {
        let mut submissions = self.submissions.write().map_err(|err| {
            SubmissionStoreError::io(std::io::Error::other(err.to_string()))
        })?;

        if submissions.contains_key(&submission.id()) {
            return Err(SubmissionStoreError::Duplicate(submission.id()));
        }

        submissions.insert(submission.id(), submission.clone());
        Ok(())
    }
}
