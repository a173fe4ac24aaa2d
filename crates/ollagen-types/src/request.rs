//! Generation request and result types

use crate::options::OptionMap;
use serde::{Deserialize, Deserializer, Serialize};
use std::time::Duration;

/// A user's request to generate (and optionally persist) a file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Artifact name, only required when `persist` is set
    #[serde(default, deserialize_with = "nullable")]
    pub filename: String,
    #[serde(default, deserialize_with = "nullable")]
    pub prompt: String,
    /// Free-text context placed ahead of the prompt
    #[serde(default, deserialize_with = "nullable")]
    pub context: String,
    /// Names of uploaded context files, appended in this order
    #[serde(default, deserialize_with = "nullable")]
    pub context_files: Vec<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub model: String,
    #[serde(default, deserialize_with = "nullable")]
    pub options: OptionMap,
    /// Write an artifact and a history record
    #[serde(default, alias = "save_to_file")]
    pub persist: bool,
}

impl GenerationRequest {
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            ..Default::default()
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = context.into();
        self
    }

    pub fn with_context_files<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.context_files = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_option(mut self, key: impl Into<String>, raw: &str) -> Self {
        self.options.insert(key.into(), raw.into());
        self
    }

    /// Persist the output under `filename`
    pub fn save_as(mut self, filename: impl Into<String>) -> Self {
        self.filename = filename.into();
        self.persist = true;
        self
    }
}

/// Outcome of a successful generation
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationResult {
    pub content: String,
    /// Set only when the artifact was written
    pub artifact_name: Option<String>,
    /// Time spent in the backend call
    pub duration: Duration,
}

/// Treat an explicit JSON `null` like a missing field
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OptionValue;

    #[test]
    fn test_deserialize_wire_request() {
        let json = r#"{
            "filename": "out.txt",
            "prompt": "hi",
            "context": "",
            "context_files": ["a.txt", "b.txt"],
            "model": "llama2",
            "options": {"temperature": "0.1"},
            "save_to_file": true
        }"#;

        let req: GenerationRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.filename, "out.txt");
        assert_eq!(req.context_files, vec!["a.txt", "b.txt"]);
        assert_eq!(req.options["temperature"], OptionValue::Float(0.1));
        assert!(req.persist);
    }

    #[test]
    fn test_nulls_and_missing_fields() {
        let json = r#"{"prompt": "hi", "model": "llama2", "context_files": null, "options": null}"#;

        let req: GenerationRequest = serde_json::from_str(json).unwrap();
        assert!(req.filename.is_empty());
        assert!(req.context_files.is_empty());
        assert!(req.options.is_empty());
        assert!(!req.persist);
    }

    #[test]
    fn test_builder() {
        let req = GenerationRequest::new("llama2", "write a haiku")
            .with_context("about rust")
            .with_context_files(["notes.md"])
            .with_option("num_ctx", "4096")
            .save_as("haiku.txt");

        assert_eq!(req.model, "llama2");
        assert_eq!(req.context, "about rust");
        assert_eq!(req.context_files, vec!["notes.md"]);
        assert_eq!(req.options["num_ctx"], OptionValue::Integer(4096));
        assert_eq!(req.filename, "haiku.txt");
        assert!(req.persist);
    }
}
