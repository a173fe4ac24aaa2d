//! Storage traits for persistence

use crate::Result;
use async_trait::async_trait;
use ollagen_types::HistoryRecord;
use std::path::Path;

/// Generated artifact store
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Write `content` under the leaf of `requested_name`, returning that leaf
    async fn save(&self, requested_name: &str, content: &str) -> Result<String>;
}

/// History record store
#[async_trait]
pub trait HistoryStore: Send + Sync {
    async fn append(&self, record: &HistoryRecord) -> Result<()>;
    /// Newest first; unreadable records are skipped
    async fn list(&self) -> Result<Vec<HistoryRecord>>;
    async fn load(&self, id: &str) -> Result<HistoryRecord>;
    async fn delete(&self, id: &str) -> Result<()>;
}

/// Reads context file contents
#[async_trait]
pub trait ContextSource: Send + Sync {
    async fn read(&self, path: &Path) -> std::io::Result<String>;
}
