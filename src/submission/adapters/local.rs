//! Local-disk fallback store.
//!
//! Each submission becomes `<id>.json` in the data directory, written as
//! two-space pretty JSON. Files are opened with create-new semantics so an
//! existing record is reported as a duplicate and never overwritten.

use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::fs::OpenOptions;
use cap_std::fs_utf8::Dir;
use std::io::{ErrorKind, Write};
use std::sync::Arc;
use tracing::info;

use crate::submission::{
    domain::{Submission, SubmissionId},
    ports::{StoreKind, SubmissionStore, SubmissionStoreError, SubmissionStoreResult},
};

/// Submission store writing JSON documents to a local directory.
#[derive(Debug, Clone)]
pub struct LocalFileStore {
    dir: Arc<Dir>,
    location: Utf8PathBuf,
}

impl LocalFileStore {
    /// Creates a store over an opened data directory.
    ///
    /// `location` is only used for log output.
    #[must_use]
    pub fn new(dir: Dir, location: impl Into<Utf8PathBuf>) -> Self {
        Self {
            dir: Arc::new(dir),
            location: location.into(),
        }
    }

    /// Returns the directory the store writes into.
    #[must_use]
    pub fn location(&self) -> &Utf8Path {
        &self.location
    }

    /// Returns the file name used for a submission.
    #[must_use]
    pub fn file_name(id: SubmissionId) -> String {
        format!("{id}.json")
    }
}

#[async_trait]
impl SubmissionStore for LocalFileStore {
    fn kind(&self) -> StoreKind {
        StoreKind::LocalFallback
    }

    async fn save(&self, submission: &Submission) -> SubmissionStoreResult<()> {
        let id = submission.id();
        let file_name = Self::file_name(id);
        let document =
            serde_json::to_vec_pretty(submission).map_err(SubmissionStoreError::serialization)?;

        let dir = Arc::clone(&self.dir);
        let target = file_name.clone();
        tokio::task::spawn_blocking(move || write_new_file(&dir, &target, &document, id))
            .await
            .map_err(SubmissionStoreError::io)??;

        info!(
            submission_id = %id,
            path = %self.location.join(&file_name),
            "saved submission to local fallback store"
        );
        Ok(())
    }
}

fn write_new_file(
    dir: &Dir,
    file_name: &str,
    contents: &[u8],
    id: SubmissionId,
) -> SubmissionStoreResult<()> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);

    let mut file = dir.open_with(file_name, &options).map_err(|err| {
        if err.kind() == ErrorKind::AlreadyExists {
            SubmissionStoreError::Duplicate(id)
        } else {
            SubmissionStoreError::io(err)
        }
    })?;
    file.write_all(contents).map_err(SubmissionStoreError::io)?;
    file.sync_all().map_err(SubmissionStoreError::io)
}
