//! Shared scratch-directory helpers for integration tests.

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8::Dir};
use contact_intake::submission::adapters::layout::AppLayout;
use eyre::{Result, WrapErr};
use uuid::Uuid;

/// Temporary application root removed on drop.
pub struct ScratchRoot {
    path: Utf8PathBuf,
}

impl ScratchRoot {
    /// Creates an empty directory under the system temp dir.
    pub fn new() -> Result<Self> {
        let base = Utf8PathBuf::from_path_buf(std::env::temp_dir())
            .map_err(|path| eyre::eyre!("temp dir is not UTF-8: {}", path.display()))?;
        let path = base.join(format!("contact_intake_test_{}", Uuid::new_v4().simple()));
        std::fs::create_dir_all(&path).wrap_err("create scratch root")?;
        Ok(Self { path })
    }

    /// Returns the scratch root.
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Prepares `uploads/` and `data/` beneath the root.
    pub fn layout(&self) -> Result<AppLayout> {
        AppLayout::prepare(&self.path).wrap_err("prepare application layout")
    }

    /// Lists file names in a directory below the root, sorted.
    pub fn list(&self, relative: &str) -> Result<Vec<String>> {
        let dir = self.open(relative)?;
        let mut names = Vec::new();
        for entry in dir.entries().wrap_err("read directory")? {
            names.push(entry.wrap_err("read entry")?.file_name().wrap_err("entry name")?);
        }
        names.sort();
        Ok(names)
    }

    /// Reads a file below the root as bytes.
    pub fn read(&self, relative: &str) -> Result<Vec<u8>> {
        let root = self.open(".")?;
        root.read(relative)
            .wrap_err_with(|| format!("read {relative}"))
    }

    /// Writes a file below the root.
    pub fn write(&self, relative: &str, contents: &str) -> Result<()> {
        let root = self.open(".")?;
        root.write(relative, contents)
            .wrap_err_with(|| format!("write {relative}"))
    }

    /// Removes a directory below the root with everything in it.
    pub fn remove_dir(&self, relative: &str) -> Result<()> {
        let root = self.open(".")?;
        root.remove_dir_all(relative)
            .wrap_err_with(|| format!("remove {relative}"))
    }

    fn open(&self, relative: &str) -> Result<Dir> {
        let root = Dir::open_ambient_dir(&self.path, ambient_authority())
            .wrap_err("open scratch root")?;
        if relative == "." {
            return Ok(root);
        }
        root.open_dir(relative)
            .wrap_err_with(|| format!("open {relative}"))
    }
}

impl Drop for ScratchRoot {
    fn drop(&mut self) {
        drop(std::fs::remove_dir_all(&self.path));
    }
}
