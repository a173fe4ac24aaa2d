//! Generated artifact storage

use crate::error::{GenError, Result};
use crate::path_guard::PathGuard;
use crate::ports::ArtifactStore;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::info;

/// Writes artifacts as plain files in one output directory.
///
/// Only the final path component of a requested name is used. Writing the
/// same name twice keeps the last content.
pub struct FsArtifactStore {
    guard: PathGuard,
}

impl FsArtifactStore {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            guard: PathGuard::new(output_dir),
        }
    }

    pub fn output_dir(&self) -> &Path {
        self.guard.base()
    }
}

#[async_trait]
impl ArtifactStore for FsArtifactStore {
    async fn save(&self, requested_name: &str, content: &str) -> Result<String> {
        let leaf = PathGuard::base_name(requested_name)?;
        let path = self.guard.resolve(&leaf).await?;

        tokio::fs::write(&path, content)
            .await
            .map_err(|e| GenError::write_failed(path.display(), e))?;

        info!("Wrote artifact {} ({} bytes)", path.display(), content.len());
        Ok(leaf)
    }
}
