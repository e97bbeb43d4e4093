//! Error types for submission validation and attachment capture.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Reasons a submitted contact form is rejected before persistence.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum SubmissionValidationError {
    /// A required text field was absent or empty.
    #[error("required field '{0}' is missing or empty")]
    MissingField(&'static str),

    /// The consent field was absent or not one of the accepted tokens.
    #[error("consent was not given")]
    ConsentNotGiven,
}

/// Errors raised while deriving attachment metadata from an upload.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AttachmentPathError {
    /// The stored upload does not live beneath the application root.
    #[error("upload path '{path}' is outside application root '{root}'")]
    OutsideRoot {
        /// Absolute location of the stored upload.
        path: Utf8PathBuf,
        /// Application root the path must be relative to.
        root: Utf8PathBuf,
    },

    /// The stored upload path resolves to the application root itself.
    #[error("upload path '{0}' does not name a file")]
    NotAFile(Utf8PathBuf),
}
