//! Record data structure handed to the duplicate detection engine

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{Error, Result};

/// A single text record
///
/// `metadata` is opaque to the engine and echoed unchanged into reports.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Caller-assigned ordinal (source line, row number, batch index...)
    pub index: usize,
    /// Raw text; an absent text is stored as the empty string
    pub text: String,
    /// Fields passed through to reports
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl Record {
    /// Create a record without metadata
    pub fn new(index: usize, text: impl Into<String>) -> Self {
        Self {
            index,
            text: text.into(),
            metadata: Map::new(),
        }
    }

    /// Attach one metadata field
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Build a record from a JSON object
    ///
    /// The value of `text_field` becomes the text (missing or `null` reads as
    /// empty, other scalars are rendered to text); every other field becomes
    /// metadata.
    pub fn from_json(index: usize, value: &Value, text_field: &str) -> Result<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| Error::NotAnObject(index))?;

        let text = match object.get(text_field) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        };

        let metadata = object
            .iter()
            .filter(|(key, _)| key.as_str() != text_field)
            .map(|(key, v)| (key.clone(), v.clone()))
            .collect();

        Ok(Self {
            index,
            text,
            metadata,
        })
    }

    /// Parse one JSON line into a record
    pub fn from_json_str(index: usize, line: &str, text_field: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(line)?;
        Self::from_json(index, &value, text_field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_creation() {
        let record = Record::new(3, "hello").with_field("city", "Sapporo");
        assert_eq!(record.index, 3);
        assert_eq!(record.text, "hello");
        assert_eq!(record.metadata["city"], json!("Sapporo"));
    }

    #[test]
    fn test_from_json_splits_text_and_metadata() {
        let data = json!({"text": "hello", "year": 2021, "city": "Otaru"});
        let record = Record::from_json(0, &data, "text").unwrap();

        assert_eq!(record.text, "hello");
        assert_eq!(record.metadata.len(), 2);
        assert_eq!(record.metadata["year"], json!(2021));
        assert!(!record.metadata.contains_key("text"));
    }

    #[test]
    fn test_from_json_missing_text() {
        let data = json!({"id": 7});
        let record = Record::from_json(1, &data, "text").unwrap();
        assert_eq!(record.text, "");
        assert_eq!(record.metadata["id"], json!(7));
    }

    #[test]
    fn test_from_json_null_text() {
        let data = json!({"body": null});
        let record = Record::from_json(1, &data, "body").unwrap();
        assert_eq!(record.text, "");
        assert!(record.metadata.is_empty());
    }

    #[test]
    fn test_from_json_numeric_text() {
        let data = json!({"body": 12345});
        let record = Record::from_json(1, &data, "body").unwrap();
        assert_eq!(record.text, "12345");
    }

    #[test]
    fn test_from_json_rejects_non_object() {
        let data = json!(["not", "an", "object"]);
        assert!(matches!(
            Record::from_json(4, &data, "text"),
            Err(Error::NotAnObject(4))
        ));
    }

    #[test]
    fn test_from_json_str() {
        let record = Record::from_json_str(2, r#"{"text": "abc", "k": "v"}"#, "text").unwrap();
        assert_eq!(record.text, "abc");
        assert_eq!(record.metadata["k"], json!("v"));

        assert!(Record::from_json_str(2, "{broken", "text").is_err());
    }
}
