//! File-per-record history storage
//!
//! Each record lives in `<history_dir>/<id>.json`. Records are written to a
//! hidden temporary file first and then linked into place, so a concurrent
//! reader never sees a half-written record and an existing record is never
//! replaced.

use crate::error::{GenError, Result};
use crate::path_guard::PathGuard;
use crate::ports::HistoryStore;
use async_trait::async_trait;
use ollagen_types::HistoryRecord;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const RECORD_EXTENSION: &str = "json";

pub struct FsHistoryStore {
    guard: PathGuard,
}

impl FsHistoryStore {
    pub fn new(history_dir: impl Into<PathBuf>) -> Self {
        Self {
            guard: PathGuard::new(history_dir),
        }
    }

    pub fn dir(&self) -> &Path {
        self.guard.base()
    }

    /// Path of the record file for `id`. Ids are plain file stems.
    async fn record_path(&self, id: &str) -> Result<PathBuf> {
        if id.starts_with('.') || PathGuard::base_name(id)? != id {
            return Err(GenError::PathTraversal(id.to_string()));
        }
        self.guard
            .resolve(&format!("{}.{}", id, RECORD_EXTENSION))
            .await
    }

    /// Stored record files as `(file name, raw bytes)`, sorted by name.
    ///
    /// Used for archive export; the bytes are exactly what is on disk.
    pub async fn export_entries(&self) -> Result<Vec<(String, Vec<u8>)>> {
        let mut entries = Vec::new();
        for path in self.record_files().await? {
            let Some(name) = path.file_name().map(|n| n.to_string_lossy().to_string()) else {
                continue;
            };
            match tokio::fs::read(&path).await {
                Ok(bytes) => entries.push((name, bytes)),
                // Deleted between listing and reading
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(entries)
    }

    async fn record_files(&self) -> Result<Vec<PathBuf>> {
        let mut dir = match tokio::fs::read_dir(self.guard.base()).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut files = Vec::new();
        while let Some(entry) = dir.next_entry().await? {
            let path = entry.path();
            let hidden = entry.file_name().to_string_lossy().starts_with('.');
            if !hidden && path.extension().and_then(|e| e.to_str()) == Some(RECORD_EXTENSION) {
                files.push(path);
            }
        }
        Ok(files)
    }
}

#[async_trait]
impl HistoryStore for FsHistoryStore {
    async fn append(&self, record: &HistoryRecord) -> Result<()> {
        let path = self.record_path(&record.id).await?;
        let temp_path = self
            .guard
            .base()
            .join(format!(".{}.{}.tmp", record.id, RECORD_EXTENSION));

        let json = serde_json::to_vec_pretty(record)
            .map_err(|e| GenError::write_failed(path.display(), e))?;

        if let Err(e) = tokio::fs::write(&temp_path, &json).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(GenError::write_failed(temp_path.display(), e));
        }

        // Linking fails if the target exists, so a record is never replaced
        let linked = tokio::fs::hard_link(&temp_path, &path).await;
        let _ = tokio::fs::remove_file(&temp_path).await;
        match linked {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(GenError::write_failed(
                    path.display(),
                    "a record with this id already exists",
                ));
            }
            Err(e) => return Err(GenError::write_failed(path.display(), e)),
        }

        debug!("Saved history record {}", record.id);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<HistoryRecord>> {
        let mut records = Vec::new();

        for path in self.record_files().await? {
            let content = match tokio::fs::read_to_string(&path).await {
                Ok(content) => content,
                Err(e) => {
                    warn!("Skipping history file {}: {}", path.display(), e);
                    continue;
                }
            };
            match serde_json::from_str::<HistoryRecord>(&content) {
                Ok(record) => records.push(record),
                Err(e) => warn!("Skipping corrupt history file {}: {}", path.display(), e),
            }
        }

        records.sort_by(|a, b| {
            b.timestamp
                .cmp(&a.timestamp)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(records)
    }

    async fn load(&self, id: &str) -> Result<HistoryRecord> {
        let path = self.record_path(id).await?;

        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(GenError::NotFound(format!("history record {}", id)))
            }
            Err(e) => return Err(e.into()),
        };

        serde_json::from_str(&content).map_err(|e| GenError::CorruptRecord {
            id: id.to_string(),
            reason: e.to_string(),
        })
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let path = self.record_path(id).await?;

        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                info!("Deleted history record {}", id);
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(GenError::NotFound(format!("history record {}", id)))
            }
            Err(e) => Err(e.into()),
        }
    }
}
