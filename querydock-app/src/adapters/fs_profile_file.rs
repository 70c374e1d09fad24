//! Filesystem-backed favorites file.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use querydock_core::error::{CoreError, CoreResult};
use querydock_core::traits::ProfileFile;

const DATA_DIR: &str = "data";
const FAVORITES_FILE: &str = "favorites.json";

/// Stores the favorites file at `<root>/data/favorites.json`.
///
/// The file holds either an encrypted envelope or, for installations
/// predating encryption, a plain JSON array; this adapter is format-blind
/// and just moves text.
pub struct FsProfileFile {
    path: PathBuf,
}

impl FsProfileFile {
    /// `root` is the application-private data directory.
    #[must_use]
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            path: root.as_ref().join(DATA_DIR).join(FAVORITES_FILE),
        }
    }

    /// The full path of the favorites file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ProfileFile for FsProfileFile {
    async fn exists(&self) -> CoreResult<bool> {
        tokio::fs::try_exists(&self.path)
            .await
            .map_err(|e| CoreError::Storage(e.to_string()))
    }

    async fn read(&self) -> CoreResult<String> {
        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| CoreError::Storage(e.to_string()))
    }

    async fn write(&self, contents: &str) -> CoreResult<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| CoreError::Storage(e.to_string()))?;
        }
        tokio::fs::write(&self.path, contents)
            .await
            .map_err(|e| CoreError::Storage(e.to_string()))
    }
}
