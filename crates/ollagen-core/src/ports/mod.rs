//! Port traits (interfaces) for dependency injection

pub mod backend;
pub mod storage;

pub use backend::ModelBackend;
pub use storage::{ArtifactStore, ContextSource, HistoryStore};
