//! Ollagen Core Library
//!
//! The generation-and-persistence pipeline behind the Ollagen gateway:
//! path validation, context assembly, the model backend client, artifact and
//! history storage, and the orchestrating [`GenerationPipeline`].

// Re-export pure types from ollagen-types
pub use ollagen_types::*;

pub mod backend;
pub mod config;
pub mod context;
pub mod error;
pub mod export;
pub mod path_guard;
pub mod pipeline;
pub mod ports;
pub mod storage;

pub use backend::OllamaBackend;
pub use config::GatewayConfig;
pub use context::ContextAssembler;
pub use error::{GenError, Result};
pub use path_guard::PathGuard;
pub use pipeline::{GenerationPipeline, Stage};
pub use ports::{ArtifactStore, ContextSource, HistoryStore, ModelBackend};
pub use storage::{ContextLibrary, FsArtifactStore, FsContextSource, FsHistoryStore};
