//! Prompt assembly from free-text context and uploaded context files

use crate::error::{GenError, Result};
use crate::path_guard::PathGuard;
use crate::ports::ContextSource;
use crate::storage::FsContextSource;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// Builds the full prompt sent to the model backend
pub struct ContextAssembler {
    guard: PathGuard,
    source: Arc<dyn ContextSource>,
}

impl ContextAssembler {
    pub fn new(context_dir: impl Into<PathBuf>, source: Arc<dyn ContextSource>) -> Self {
        Self {
            guard: PathGuard::new(context_dir),
            source,
        }
    }

    /// Assembler reading context files straight from disk
    pub fn from_dir(context_dir: impl Into<PathBuf>) -> Self {
        Self::new(context_dir, Arc::new(FsContextSource))
    }

    /// Merge `context` and the named files into one prompt.
    ///
    /// Every name is resolved before any file is read, so a single bad name
    /// aborts the whole assembly without touching the others. File blocks
    /// follow the order of `context_files`.
    pub async fn assemble(
        &self,
        prompt: &str,
        context: &str,
        context_files: &[String],
    ) -> Result<String> {
        let mut full_prompt = if context.is_empty() {
            prompt.to_string()
        } else {
            format!("Context: {}\n\nTask: {}", context, prompt)
        };

        let mut resolved = Vec::with_capacity(context_files.len());
        for name in context_files {
            resolved.push((name, self.guard.resolve(name).await?));
        }

        for (name, path) in resolved {
            let content = self.source.read(&path).await.map_err(|e| {
                GenError::ContextFileUnreadable {
                    name: name.clone(),
                    reason: e.to_string(),
                }
            })?;
            debug!("Appending context file {} ({} bytes)", name, content.len());

            full_prompt.push_str(&format!(
                "\n\n### Context from file: {}\n{}\n",
                name, content
            ));
        }

        Ok(full_prompt)
    }
}
