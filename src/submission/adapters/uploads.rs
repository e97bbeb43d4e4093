//! Attachment capture to the uploads directory.

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::fs::OpenOptions;
use cap_std::fs_utf8::Dir;
use std::io::{self, Write};
use std::sync::Arc;
use uuid::Uuid;

use crate::submission::domain::UploadedFile;

/// MIME type recorded when the client does not declare one.
pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// Directory receiving uploaded attachments under server-assigned names.
#[derive(Debug, Clone)]
pub struct UploadDirectory {
    dir: Arc<Dir>,
    location: Utf8PathBuf,
}

impl UploadDirectory {
    /// Creates an upload directory over an opened handle.
    ///
    /// `location` must be the absolute path of `dir`; it is used to report
    /// where each upload was stored.
    #[must_use]
    pub fn new(dir: Dir, location: impl Into<Utf8PathBuf>) -> Self {
        Self {
            dir: Arc::new(dir),
            location: location.into(),
        }
    }

    /// Returns the absolute path of the directory.
    #[must_use]
    pub fn location(&self) -> &Utf8Path {
        &self.location
    }

    /// Writes `contents` under a fresh 32-hex-character name.
    ///
    /// The client-supplied name is recorded but never used on disk.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error when the file cannot be created or
    /// written.
    pub async fn store(
        &self,
        original_name: impl Into<String>,
        mime_type: Option<&str>,
        contents: impl AsRef<[u8]> + Send + 'static,
    ) -> io::Result<UploadedFile> {
        let filename = Uuid::new_v4().simple().to_string();
        let size = u64::try_from(contents.as_ref().len()).map_err(io::Error::other)?;

        let dir = Arc::clone(&self.dir);
        let target = filename.clone();
        tokio::task::spawn_blocking(move || write_upload(&dir, &target, contents.as_ref()))
            .await
            .map_err(io::Error::other)??;

        Ok(UploadedFile::new(
            filename.clone(),
            original_name,
            mime_type.unwrap_or(DEFAULT_MIME_TYPE),
            size,
            self.location.join(&filename),
        ))
    }
}

fn write_upload(dir: &Dir, file_name: &str, contents: &[u8]) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    let mut file = dir.open_with(file_name, &options)?;
    file.write_all(contents)?;
    file.sync_all()
}
