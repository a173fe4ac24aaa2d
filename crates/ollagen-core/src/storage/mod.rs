//! Filesystem-backed stores

pub mod artifact;
pub mod context_files;
pub mod history;

pub use artifact::FsArtifactStore;
pub use context_files::{ContextLibrary, FsContextSource};
pub use history::FsHistoryStore;
