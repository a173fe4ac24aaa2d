//! History record types

use crate::options::OptionMap;
use crate::request::GenerationRequest;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A replayable record of one persisted generation.
///
/// The generated content is copied in full so a record stays meaningful
/// after the artifact it describes has been changed or removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub model: String,
    pub prompt: String,
    #[serde(default)]
    pub context: String,
    #[serde(default)]
    pub context_files: Vec<String>,
    /// Name of the artifact written for this generation
    pub filename: String,
    pub content: String,
    #[serde(default)]
    pub duration_ms: u64,
    #[serde(default, skip_serializing_if = "OptionMap::is_empty")]
    pub options: OptionMap,
}

impl HistoryRecord {
    /// Build a record with a fresh time-ordered id, stamped now
    pub fn new(
        request: &GenerationRequest,
        filename: impl Into<String>,
        content: impl Into<String>,
        duration: Duration,
    ) -> Self {
        Self {
            id: uuid::Uuid::now_v7().to_string(),
            timestamp: Utc::now(),
            model: request.model.clone(),
            prompt: request.prompt.clone(),
            context: request.context.clone(),
            context_files: request.context_files.clone(),
            filename: filename.into(),
            content: content.into(),
            duration_ms: u64::try_from(duration.as_millis()).unwrap_or(u64::MAX),
            options: request.options.clone(),
        }
    }

    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_copies_request() {
        let req = GenerationRequest::new("llama2", "hi")
            .with_context("ctx")
            .with_context_files(["a.txt"])
            .with_option("temperature", "0.3");

        let record = HistoryRecord::new(&req, "out.txt", "Hello!", Duration::from_millis(1500));
        assert_eq!(record.model, "llama2");
        assert_eq!(record.prompt, "hi");
        assert_eq!(record.context, "ctx");
        assert_eq!(record.context_files, vec!["a.txt"]);
        assert_eq!(record.filename, "out.txt");
        assert_eq!(record.content, "Hello!");
        assert_eq!(record.duration(), Duration::from_millis(1500));
        assert_eq!(record.options, req.options);
    }

    #[test]
    fn test_ids_are_unique() {
        let req = GenerationRequest::new("llama2", "hi");
        let a = HistoryRecord::new(&req, "a", "x", Duration::ZERO);
        let b = HistoryRecord::new(&req, "a", "x", Duration::ZERO);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_json_shape() {
        let req = GenerationRequest::new("llama2", "hi");
        let record = HistoryRecord::new(&req, "out.txt", "Hello!", Duration::ZERO);

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["filename"], "out.txt");
        assert_eq!(json["context_files"], serde_json::json!([]));
        assert!(json.get("options").is_none());

        let back: HistoryRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }
}
