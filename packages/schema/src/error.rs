use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

pub type ValidationResult<T> = Result<T, ValidationError>;

/// Shape mismatch at a specific field
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("Invalid `{path}`: expected {expected}, found {found}")]
pub struct ValidationError {
    /// Field path, e.g. `content.blocks[2].data.level`
    pub path: String,
    pub expected: String,
    pub found: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Mismatch where the offending value is at hand
    pub fn mismatch(path: impl Into<String>, expected: impl Into<String>, found: &Value) -> Self {
        Self::new(path, expected, describe(found))
    }

    pub fn missing(path: impl Into<String>, expected: impl Into<String>) -> Self {
        Self::new(path, expected, "nothing")
    }
}

/// Short human description of a JSON value's type
pub(crate) fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => format!("boolean {}", b),
        Value::Number(n) => format!("number {}", n),
        Value::String(_) => "a string".to_string(),
        Value::Array(_) => "an array".to_string(),
        Value::Object(_) => "an object".to_string(),
    }
}
