//! Confinement of user-supplied names to a base directory

use crate::error::{GenError, Result};
use std::path::{Component, Path, PathBuf};

/// Validates names against one base directory.
///
/// Two modes are offered:
/// - [`PathGuard::base_name`] keeps only the final component, for names of
///   files the gateway is about to create.
/// - [`PathGuard::resolve`] joins a (possibly nested) name onto the base and
///   verifies the result stays inside it, for names of existing files.
#[derive(Debug, Clone)]
pub struct PathGuard {
    base: PathBuf,
}

impl PathGuard {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Strip every directory component and return the leaf name.
    ///
    /// Both `/` and `\` count as separators so Windows-style upload names
    /// are reduced the same way.
    pub fn base_name(name: &str) -> Result<String> {
        let leaf = name
            .rsplit(|c| c == '/' || c == '\\')
            .next()
            .unwrap_or("")
            .trim();

        if leaf.is_empty() || leaf == "." || leaf == ".." || leaf.contains('\0') {
            return Err(GenError::PathTraversal(format!(
                "'{}' has no usable file name",
                name
            )));
        }

        Ok(leaf.to_string())
    }

    /// Join `name` onto the base directory and verify it stays inside.
    ///
    /// The lexical check runs first and never touches the filesystem. When
    /// the target exists it is also canonicalized (off the async executor),
    /// so a symlink pointing out of the base is rejected too.
    pub async fn resolve(&self, name: &str) -> Result<PathBuf> {
        let escape = || GenError::PathTraversal(name.to_string());

        if name.trim().is_empty() || name.contains('\0') {
            return Err(escape());
        }

        let mut relative = PathBuf::new();
        let mut depth = 0usize;
        for component in Path::new(name).components() {
            match component {
                Component::Normal(part) => {
                    relative.push(part);
                    depth += 1;
                }
                Component::CurDir => {}
                Component::ParentDir => {
                    if depth == 0 {
                        return Err(escape());
                    }
                    relative.pop();
                    depth -= 1;
                }
                Component::RootDir | Component::Prefix(_) => return Err(escape()),
            }
        }

        // A name that collapses to the base itself does not name a file in it
        if depth == 0 {
            return Err(escape());
        }

        let joined = self.base.join(&relative);

        if let Ok(canonical) = tokio::fs::canonicalize(&joined).await {
            let base = tokio::fs::canonicalize(&self.base).await?;
            if !canonical.starts_with(&base) {
                return Err(escape());
            }
        }

        Ok(joined)
    }
}
