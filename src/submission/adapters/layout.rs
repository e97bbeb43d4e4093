//! On-disk application layout.
//!
//! The application root holds the static site, the `uploads/` directory
//! for attachments, and the `data/` directory used by the fallback store.

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use std::io;

use super::{local::LocalFileStore, uploads::UploadDirectory};

/// Directory, relative to the application root, receiving attachments.
pub const UPLOADS_DIR: &str = "uploads";
/// Directory, relative to the application root, used by the fallback store.
pub const DATA_DIR: &str = "data";

/// Prepared application directories.
#[derive(Debug)]
pub struct AppLayout {
    root: Utf8PathBuf,
    uploads: UploadDirectory,
    fallback: LocalFileStore,
}

impl AppLayout {
    /// Resolves `root` to an absolute path and creates `uploads/` and
    /// `data/` beneath it when absent.
    ///
    /// # Errors
    ///
    /// Returns the I/O error raised while canonicalising the root or
    /// creating and opening either directory.
    pub fn prepare(root: &Utf8Path) -> io::Result<Self> {
        let absolute_root = root.canonicalize_utf8()?;
        let root_dir = Dir::open_ambient_dir(&absolute_root, ambient_authority())?;

        root_dir.create_dir_all(UPLOADS_DIR)?;
        root_dir.create_dir_all(DATA_DIR)?;

        let uploads = UploadDirectory::new(
            root_dir.open_dir(UPLOADS_DIR)?,
            absolute_root.join(UPLOADS_DIR),
        );
        let fallback =
            LocalFileStore::new(root_dir.open_dir(DATA_DIR)?, absolute_root.join(DATA_DIR));

        Ok(Self {
            root: absolute_root,
            uploads,
            fallback,
        })
    }

    /// Returns the absolute application root.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Returns the upload directory.
    #[must_use]
    pub const fn uploads(&self) -> &UploadDirectory {
        &self.uploads
    }

    /// Returns the local fallback store.
    #[must_use]
    pub const fn fallback(&self) -> &LocalFileStore {
        &self.fallback
    }

    /// Splits the layout into its root, upload directory, and fallback store.
    #[must_use]
    pub fn into_parts(self) -> (Utf8PathBuf, UploadDirectory, LocalFileStore) {
        (self.root, self.uploads, self.fallback)
    }
}
