use serde_json::{Map, Value};

use crate::error::SubmissionError;

pub const MISSING_VALUE_PLACEHOLDER: &str = "N/A";

/// The JSON object posted by the form, in the order the client sent it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubmissionPayload {
    fields: Map<String, Value>,
}

impl SubmissionPayload {
    pub fn parse(body: &[u8]) -> Result<Self, SubmissionError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Err(SubmissionError::MalformedPayload(
                "request body is empty".to_string(),
            ));
        }

        let value: Value = serde_json::from_slice(body)
            .map_err(|e| SubmissionError::MalformedPayload(format!("invalid JSON: {}", e)))?;

        match value {
            Value::Object(fields) => Ok(Self { fields }),
            Value::Null => Err(SubmissionError::MalformedPayload(
                "request body is empty".to_string(),
            )),
            other => Err(SubmissionError::MalformedPayload(format!(
                "expected a JSON object, got {}",
                json_type_name(&other)
            ))),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// The text to show for `key`, when the payload holds a non-empty scalar.
    /// Strings that are blank after trimming count as empty; other strings
    /// are returned untrimmed.
    pub fn value_for(&self, key: &str) -> Option<String> {
        match self.fields.get(key)? {
            Value::String(s) if s.trim().is_empty() => None,
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }

    pub fn display_value(&self, key: &str) -> String {
        self.value_for(key)
            .unwrap_or_else(|| MISSING_VALUE_PLACEHOLDER.to_string())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl From<Map<String, Value>> for SubmissionPayload {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
