//! Uploaded context file library

use crate::config::GatewayConfig;
use crate::error::{GenError, Result};
use crate::path_guard::PathGuard;
use crate::ports::ContextSource;
use async_trait::async_trait;
use ollagen_types::ContextFileInfo;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Reads context files from the local filesystem.
///
/// Bytes that are not valid UTF-8 are replaced with U+FFFD rather than
/// failing the read.
pub struct FsContextSource;

#[async_trait]
impl ContextSource for FsContextSource {
    async fn read(&self, path: &Path) -> std::io::Result<String> {
        let bytes = tokio::fs::read(path).await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// The set of context files clients have uploaded
pub struct ContextLibrary {
    guard: PathGuard,
    max_file_size: u64,
    /// Lowercase, dot-prefixed
    allowed_extensions: Vec<String>,
}

impl ContextLibrary {
    pub fn new(
        context_dir: impl Into<PathBuf>,
        max_file_size: u64,
        allowed_extensions: Vec<String>,
    ) -> Self {
        Self {
            guard: PathGuard::new(context_dir),
            max_file_size,
            allowed_extensions,
        }
    }

    pub fn from_config(config: &GatewayConfig) -> Self {
        Self::new(
            config.context_dir.clone(),
            config.max_context_file_size,
            config.allowed_context_extensions.clone(),
        )
    }

    pub fn dir(&self) -> &Path {
        self.guard.base()
    }

    fn check_extension(&self, name: &str) -> Result<()> {
        let extension = Path::new(name)
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
            .unwrap_or_default();

        if extension.is_empty() || !self.allowed_extensions.contains(&extension) {
            return Err(GenError::UploadRejected(format!(
                "file type '{}' is not allowed",
                if extension.is_empty() { name } else { &extension }
            )));
        }
        Ok(())
    }

    /// Store an uploaded file under the leaf of `filename`, replacing any
    /// file of the same name.
    pub async fn save(&self, filename: &str, data: &[u8]) -> Result<ContextFileInfo> {
        let name = PathGuard::base_name(filename)?;

        let size = data.len() as u64;
        if size > self.max_file_size {
            return Err(GenError::UploadRejected(format!(
                "'{}' is {} bytes, the limit is {}",
                name, size, self.max_file_size
            )));
        }
        self.check_extension(&name)?;

        let path = self.guard.resolve(&name).await?;
        tokio::fs::write(&path, data)
            .await
            .map_err(|e| GenError::write_failed(path.display(), e))?;

        info!("Stored context file {} ({} bytes)", name, size);
        Ok(ContextFileInfo { name, size })
    }

    /// Regular files in the library, sorted by name
    pub async fn list(&self) -> Result<Vec<ContextFileInfo>> {
        let mut entries = match tokio::fs::read_dir(self.guard.base()).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut files = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let metadata = match entry.metadata().await {
                Ok(metadata) => metadata,
                Err(e) => {
                    warn!("Skipping {}: {}", entry.path().display(), e);
                    continue;
                }
            };
            if !metadata.is_file() {
                continue;
            }
            files.push(ContextFileInfo {
                name: entry.file_name().to_string_lossy().to_string(),
                size: metadata.len(),
            });
        }

        files.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(files)
    }

    pub async fn delete(&self, filename: &str) -> Result<()> {
        let path = self.guard.resolve(filename).await?;

        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                info!("Deleted context file {}", filename);
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(GenError::NotFound(format!("context file {}", filename)))
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_CONTEXT_EXTENSIONS;

    fn library(dir: &Path, max: u64) -> ContextLibrary {
        ContextLibrary::new(
            dir,
            max,
            DEFAULT_CONTEXT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        )
    }

    #[tokio::test]
    async fn test_save_list_delete() {
        let temp_dir = tempfile::tempdir().unwrap();
        let lib = library(temp_dir.path(), 1024);

        let info = lib.save("uploads/../design.MD", b"# Notes").await.unwrap();
        assert_eq!(info.name, "design.MD");
        assert_eq!(info.size, 7);
        lib.save("a.txt", b"a").await.unwrap();
        std::fs::create_dir(temp_dir.path().join("nested")).unwrap();

        let files = lib.list().await.unwrap();
        let names: Vec<_> = files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["a.txt", "design.MD"]);

        lib.delete("a.txt").await.unwrap();
        assert_eq!(lib.list().await.unwrap().len(), 1);
        assert!(matches!(
            lib.delete("a.txt").await.unwrap_err(),
            GenError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_rejects_oversized_and_unknown_types() {
        let temp_dir = tempfile::tempdir().unwrap();
        let lib = library(temp_dir.path(), 4);

        let err = lib.save("big.txt", b"12345").await.unwrap_err();
        assert_eq!(err.kind(), "upload_rejected");

        let err = lib.save("tool.exe", b"MZ").await.unwrap_err();
        assert_eq!(err.kind(), "upload_rejected");

        let err = lib.save("Makefile", b"all:").await.unwrap_err();
        assert_eq!(err.kind(), "upload_rejected");

        assert!(lib.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_outside_library_is_rejected() {
        let temp_dir = tempfile::tempdir().unwrap();
        let lib = library(&temp_dir.path().join("ctx"), 1024);
        std::fs::create_dir(lib.dir()).unwrap();
        std::fs::write(temp_dir.path().join("keep.txt"), "x").unwrap();

        let err = lib.delete("../keep.txt").await.unwrap_err();
        assert_eq!(err.kind(), "path_traversal");
        assert!(temp_dir.path().join("keep.txt").exists());
    }

    #[tokio::test]
    async fn test_source_reads_non_utf8_lossily() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("notes.txt");
        std::fs::write(&path, b"caf\xe9").unwrap();

        let content = FsContextSource.read(&path).await.unwrap();
        assert_eq!(content, "caf\u{fffd}");

        let err = FsContextSource
            .read(&temp_dir.path().join("absent.txt"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_missing_library_lists_empty() {
        let temp_dir = tempfile::tempdir().unwrap();
        let lib = library(&temp_dir.path().join("absent"), 1024);
        let files = tokio_test::block_on(lib.list()).unwrap();
        assert!(files.is_empty());
    }
}
