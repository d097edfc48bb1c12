use crate::error::Result;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Local directory where synthesized media sits until it is uploaded.
#[derive(Debug, Clone)]
pub struct ScratchDir {
    root: PathBuf,
}

impl ScratchDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Reserves a fresh `<uuid>.<extension>` path, creating the directory if needed.
    pub async fn reserve(&self, extension: &str) -> Result<ScratchFile> {
        tokio::fs::create_dir_all(&self.root).await?;
        let path = self
            .root
            .join(format!("{}.{}", Uuid::new_v4(), extension));
        Ok(ScratchFile { path })
    }
}

/// A scratch path that is deleted when the guard goes out of scope.
#[derive(Debug)]
pub struct ScratchFile {
    path: PathBuf,
}

impl ScratchFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn remove(&self) {
        match fs::remove_file(&self.path) {
            Ok(()) => log::debug!("🧹 Removed scratch file {}", self.path.display()),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => log::warn!(
                "Failed to remove scratch file {}: {}",
                self.path.display(),
                e
            ),
        }
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        self.remove();
    }
}
