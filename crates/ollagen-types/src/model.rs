//! Backend model and context file listings

use serde::{Deserialize, Serialize};

/// A model installed on the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub name: String,
    /// Size on disk in bytes
    #[serde(default)]
    pub size: u64,
}

/// An uploaded context file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextFileInfo {
    pub name: String,
    pub size: u64,
}
