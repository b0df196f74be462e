//! Raw field values.
//!
//! `FieldValue` is what a [`FieldReader`](crate::writer::FieldReader) yields
//! and what the [`AssembledDocument`](crate::document::AssembledDocument)
//! stores. Values serialize as plain JSON scalars or string arrays.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single field value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Boolean value (checkbox fields).
    Bool(bool),
    /// Integer value.
    Integer(i64),
    /// Floating point value.
    Float(f64),
    /// Text value.
    Text(String),
    /// Multi-valued text (lists, multilists, tags).
    List(Vec<String>),
}

impl FieldValue {
    /// Creates a text value.
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    /// Returns the text content, if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Bool(b) => write!(f, "{b}"),
            FieldValue::Integer(n) => write!(f, "{n}"),
            FieldValue::Float(x) => write!(f, "{x}"),
            FieldValue::Text(s) => write!(f, "{s}"),
            FieldValue::List(items) => write!(f, "{}", items.join("|")),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Integer(n)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_text_accessors() {
        let v = FieldValue::text("Hello");
        assert_eq!(v.as_text(), Some("Hello"));
        assert_eq!(FieldValue::Integer(3).as_text(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(FieldValue::Integer(42).to_string(), "42");
        assert_eq!(
            FieldValue::List(vec!["a".into(), "b".into()]).to_string(),
            "a|b"
        );
    }

    #[test]
    fn test_deserialize_untagged() {
        let v: FieldValue = serde_json::from_str("true").unwrap();
        assert_eq!(v, FieldValue::Bool(true));

        let v: FieldValue = serde_json::from_str("12").unwrap();
        assert_eq!(v, FieldValue::Integer(12));

        let v: FieldValue = serde_json::from_str("1.5").unwrap();
        assert_eq!(v, FieldValue::Float(1.5));

        let v: FieldValue = serde_json::from_str("\"World\"").unwrap();
        assert_eq!(v, FieldValue::text("World"));

        let v: FieldValue = serde_json::from_str(r#"["x","y"]"#).unwrap();
        assert_eq!(v, FieldValue::List(vec!["x".into(), "y".into()]));
    }
}
