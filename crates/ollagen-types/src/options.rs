//! Backend generation options
//!
//! Clients send options as a string-keyed map whose values are mostly
//! strings ("0.7", "4096"). They are converted exactly once, when the
//! request is deserialized, into typed [`OptionValue`]s that are forwarded
//! to the model backend as proper JSON scalars.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Options keyed by name, in a stable order
pub type OptionMap = BTreeMap<String, OptionValue>;

/// A single typed option value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OptionValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl OptionValue {
    /// Interpret a wire string.
    ///
    /// Integer strings become integers, other finite numeric strings become
    /// floats. Everything else, `"true"` included, is kept verbatim as text.
    /// Only a JSON boolean yields [`OptionValue::Bool`].
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if let Ok(value) = trimmed.parse::<i64>() {
            return OptionValue::Integer(value);
        }

        match trimmed.parse::<f64>() {
            Ok(value) if value.is_finite() => OptionValue::Float(value),
            _ => OptionValue::Text(raw.to_string()),
        }
    }
}

impl std::fmt::Display for OptionValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OptionValue::Bool(value) => write!(f, "{}", value),
            OptionValue::Integer(value) => write!(f, "{}", value),
            OptionValue::Float(value) => write!(f, "{}", value),
            OptionValue::Text(value) => write!(f, "{}", value),
        }
    }
}

impl From<&str> for OptionValue {
    fn from(raw: &str) -> Self {
        OptionValue::parse(raw)
    }
}

impl<'de> Deserialize<'de> for OptionValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Wire {
            Bool(bool),
            Integer(i64),
            Float(f64),
            Text(String),
        }

        Ok(match Wire::deserialize(deserializer)? {
            Wire::Bool(value) => OptionValue::Bool(value),
            Wire::Integer(value) => OptionValue::Integer(value),
            Wire::Float(value) => OptionValue::Float(value),
            Wire::Text(value) => OptionValue::parse(&value),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scalars() {
        assert_eq!(OptionValue::parse("4096"), OptionValue::Integer(4096));
        assert_eq!(OptionValue::parse("-3"), OptionValue::Integer(-3));
        assert_eq!(OptionValue::parse("0.7"), OptionValue::Float(0.7));
    }

    #[test]
    fn test_parse_keeps_text() {
        assert_eq!(
            OptionValue::parse("stop here"),
            OptionValue::Text("stop here".to_string())
        );
        assert_eq!(OptionValue::parse("NaN"), OptionValue::Text("NaN".to_string()));
        assert_eq!(OptionValue::parse(""), OptionValue::Text(String::new()));
        assert_eq!(OptionValue::parse("true"), OptionValue::Text("true".to_string()));
        assert_eq!(OptionValue::parse("false"), OptionValue::Text("false".to_string()));
    }

    #[test]
    fn test_deserialize_mixed_map() {
        let json = r####"{"temperature": "0.2", "num_ctx": 8192, "stop": "###", "mirostat": "1", "numa": true, "penalize_newline": "false"}"####;
        let options: OptionMap = serde_json::from_str(json).unwrap();

        assert_eq!(options["temperature"], OptionValue::Float(0.2));
        assert_eq!(options["num_ctx"], OptionValue::Integer(8192));
        assert_eq!(options["stop"], OptionValue::Text("###".to_string()));
        assert_eq!(options["mirostat"], OptionValue::Integer(1));
        assert_eq!(options["numa"], OptionValue::Bool(true));
        assert_eq!(
            options["penalize_newline"],
            OptionValue::Text("false".to_string())
        );
    }

    #[test]
    fn test_serialize_as_json_scalars() {
        let mut options = OptionMap::new();
        options.insert("num_ctx".to_string(), OptionValue::parse("2048"));
        options.insert("temperature".to_string(), OptionValue::parse("0.5"));

        let json = serde_json::to_value(&options).unwrap();
        assert_eq!(json, serde_json::json!({"num_ctx": 2048, "temperature": 0.5}));
    }
}
