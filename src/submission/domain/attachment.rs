//! Uploaded file descriptors and persisted attachment metadata.

use super::AttachmentPathError;
use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use serde::Serialize;

/// A file the server has already written to durable storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    filename: String,
    original_name: String,
    mime_type: String,
    size: u64,
    path: Utf8PathBuf,
}

impl UploadedFile {
    /// Describes a stored upload.
    ///
    /// `filename` is the server-assigned name and `path` its absolute
    /// location on disk.
    #[must_use]
    pub fn new(
        filename: impl Into<String>,
        original_name: impl Into<String>,
        mime_type: impl Into<String>,
        size: u64,
        path: impl Into<Utf8PathBuf>,
    ) -> Self {
        Self {
            filename: filename.into(),
            original_name: original_name.into(),
            mime_type: mime_type.into(),
            size,
            path: path.into(),
        }
    }

    /// Returns the server-assigned file name.
    #[must_use]
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Returns the file name supplied by the client.
    #[must_use]
    pub fn original_name(&self) -> &str {
        &self.original_name
    }

    /// Returns the declared MIME type.
    #[must_use]
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Returns the stored size in bytes.
    #[must_use]
    pub const fn size(&self) -> u64 {
        self.size
    }

    /// Returns the absolute storage location.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }
}

/// Attachment metadata persisted alongside a submission.
///
/// All five fields are populated together; there is no partial form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    filename: String,
    original_name: String,
    mime_type: String,
    size: u64,
    path: String,
}

impl Attachment {
    /// Builds attachment metadata from a stored upload.
    ///
    /// The persisted `path` is relative to `app_root` and always uses `/`
    /// as separator, whatever the host convention.
    ///
    /// # Errors
    ///
    /// Returns [`AttachmentPathError::OutsideRoot`] when the upload is not
    /// stored beneath `app_root`, or [`AttachmentPathError::NotAFile`] when
    /// the upload path is the root itself.
    pub fn from_upload(
        upload: UploadedFile,
        app_root: &Utf8Path,
    ) -> Result<Self, AttachmentPathError> {
        let path = relative_slash_path(&upload.path, app_root)?;
        Ok(Self {
            filename: upload.filename,
            original_name: upload.original_name,
            mime_type: upload.mime_type,
            size: upload.size,
            path,
        })
    }

    /// Returns the server-assigned file name.
    #[must_use]
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Returns the file name supplied by the client.
    #[must_use]
    pub fn original_name(&self) -> &str {
        &self.original_name
    }

    /// Returns the declared MIME type.
    #[must_use]
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Returns the stored size in bytes.
    #[must_use]
    pub const fn size(&self) -> u64 {
        self.size
    }

    /// Returns the storage path relative to the application root.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }
}

fn relative_slash_path(path: &Utf8Path, root: &Utf8Path) -> Result<String, AttachmentPathError> {
    let relative = path
        .strip_prefix(root)
        .map_err(|_| AttachmentPathError::OutsideRoot {
            path: path.to_owned(),
            root: root.to_owned(),
        })?;

    let mut segments = Vec::new();
    for component in relative.components() {
        match component {
            Utf8Component::Normal(segment) => segments.push(segment),
            Utf8Component::CurDir => {}
            _ => {
                return Err(AttachmentPathError::OutsideRoot {
                    path: path.to_owned(),
                    root: root.to_owned(),
                });
            }
        }
    }
    if segments.is_empty() {
        return Err(AttachmentPathError::NotAFile(path.to_owned()));
    }

    // Backslashes can survive inside a segment on non-Windows hosts.
    Ok(segments.join("/").replace('\\', "/"))
}
