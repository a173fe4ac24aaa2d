//! Error types for Ollagen

use thiserror::Error;

pub type Result<T> = std::result::Result<T, GenError>;

#[derive(Error, Debug)]
pub enum GenError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Path escapes its base directory: {0}")]
    PathTraversal(String),

    #[error("Context file '{name}' could not be read: {reason}")]
    ContextFileUnreadable { name: String, reason: String },

    #[error("Model backend unreachable at {url}: {reason}")]
    BackendUnreachable { url: String, reason: String },

    #[error("Model backend returned {status}: {body}")]
    BackendError { status: u16, body: String },

    #[error("Model backend returned no content")]
    EmptyResponse,

    #[error("Failed to write {target}: {reason}")]
    WriteFailed { target: String, reason: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("History record {id} is corrupt: {reason}")]
    CorruptRecord { id: String, reason: String },

    #[error("Upload rejected: {0}")]
    UploadRejected(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl GenError {
    /// Stable machine-readable code for this error
    pub fn kind(&self) -> &'static str {
        match self {
            GenError::MissingField(_) => "missing_field",
            GenError::PathTraversal(_) => "path_traversal",
            GenError::ContextFileUnreadable { .. } => "context_file_unreadable",
            GenError::BackendUnreachable { .. } => "backend_unreachable",
            GenError::BackendError { .. } => "backend_error",
            GenError::EmptyResponse => "empty_response",
            GenError::WriteFailed { .. } => "write_failed",
            GenError::NotFound(_) => "not_found",
            GenError::CorruptRecord { .. } => "corrupt_record",
            GenError::UploadRejected(_) => "upload_rejected",
            GenError::Config(_) => "config",
            GenError::Io(_) => "io",
        }
    }

    pub(crate) fn write_failed(target: impl std::fmt::Display, err: impl std::fmt::Display) -> Self {
        GenError::WriteFailed {
            target: target.to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<config::ConfigError> for GenError {
    fn from(e: config::ConfigError) -> Self {
        GenError::Config(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_codes() {
        assert_eq!(GenError::MissingField("prompt").kind(), "missing_field");
        assert_eq!(GenError::EmptyResponse.kind(), "empty_response");
        assert_eq!(
            GenError::BackendError {
                status: 500,
                body: "boom".to_string()
            }
            .kind(),
            "backend_error"
        );
    }

    #[test]
    fn test_backend_error_keeps_body() {
        let err = GenError::BackendError {
            status: 404,
            body: r#"{"error":"model 'nope' not found"}"#.to_string(),
        };
        assert_eq!(
            err.to_string(),
            r#"Model backend returned 404: {"error":"model 'nope' not found"}"#
        );
    }
}
