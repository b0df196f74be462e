//! The assembled search document.
//!
//! `AssembledDocument` is a concurrent map from translated field name to
//! value. Workers write into it through [`AssembledDocument::store_field`],
//! which performs one atomic check-and-set per key:
//!
//! - key absent: insert
//! - key present, both values text, `append` requested: concatenate with
//!   [`APPEND_SEPARATOR`]
//! - otherwise: the first write wins and the new value is dropped

use std::collections::BTreeMap;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde::{Serialize, Serializer};

use crate::value::FieldValue;

/// Separator placed between appended text values.
pub const APPEND_SEPARATOR: &str = " ";

/// What a `store_field` call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOutcome {
    /// The key was new.
    Inserted,
    /// Text was appended to an existing value.
    Appended,
    /// The key already had a value; the new one was discarded.
    Dropped,
}

/// Flat key/value document submitted to a search backend.
#[derive(Debug, Default)]
pub struct AssembledDocument {
    fields: DashMap<String, FieldValue>,
}

impl AssembledDocument {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value under `key` using first-write-wins semantics.
    pub fn store_field(
        &self,
        key: impl Into<String>,
        value: FieldValue,
        append: bool,
    ) -> StoreOutcome {
        match self.fields.entry(key.into()) {
            Entry::Vacant(slot) => {
                slot.insert(value);
                StoreOutcome::Inserted
            }
            Entry::Occupied(mut slot) => match (slot.get_mut(), value.as_text()) {
                (FieldValue::Text(existing), Some(extra)) if append => {
                    existing.push_str(APPEND_SEPARATOR);
                    existing.push_str(extra);
                    StoreOutcome::Appended
                }
                _ => StoreOutcome::Dropped,
            },
        }
    }

    /// Get a copy of the value stored under `key`.
    pub fn get(&self, key: &str) -> Option<FieldValue> {
        self.fields.get(key).map(|v| v.value().clone())
    }

    /// Returns `true` if `key` has a value.
    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Number of stored fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if nothing was stored.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Stored keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.fields.iter().map(|e| e.key().clone()).collect();
        keys.sort();
        keys
    }

    /// Ordered snapshot of the document.
    pub fn to_map(&self) -> BTreeMap<String, FieldValue> {
        self.fields
            .iter()
            .map(|e| (e.key().clone(), e.value().clone()))
            .collect()
    }

    /// Consume the document into an ordered map.
    pub fn into_map(self) -> BTreeMap<String, FieldValue> {
        self.fields.into_iter().collect()
    }
}

impl Serialize for AssembledDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_map().serialize(serializer)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_insert_into_empty_key() {
        let doc = AssembledDocument::new();
        let outcome = doc.store_field("title", FieldValue::text("Hello"), false);
        assert_eq!(outcome, StoreOutcome::Inserted);
        assert_eq!(doc.get("title"), Some(FieldValue::text("Hello")));
    }

    #[test]
    fn test_first_write_wins() {
        let doc = AssembledDocument::new();
        doc.store_field("title", FieldValue::text("first"), false);
        let outcome = doc.store_field("title", FieldValue::text("second"), false);
        assert_eq!(outcome, StoreOutcome::Dropped);
        assert_eq!(doc.get("title"), Some(FieldValue::text("first")));
    }

    #[test]
    fn test_append_text() {
        let doc = AssembledDocument::new();
        doc.store_field("content", FieldValue::text("Hello"), true);
        let outcome = doc.store_field("content", FieldValue::text("World"), true);
        assert_eq!(outcome, StoreOutcome::Appended);
        assert_eq!(doc.get("content"), Some(FieldValue::text("Hello World")));
    }

    #[test]
    fn test_append_ignored_for_non_text() {
        let doc = AssembledDocument::new();
        doc.store_field("count", FieldValue::Integer(1), true);
        let outcome = doc.store_field("count", FieldValue::Integer(2), true);
        assert_eq!(outcome, StoreOutcome::Dropped);
        assert_eq!(doc.get("count"), Some(FieldValue::Integer(1)));
    }

    #[test]
    fn test_append_requires_existing_text() {
        let doc = AssembledDocument::new();
        doc.store_field("mixed", FieldValue::Integer(1), true);
        let outcome = doc.store_field("mixed", FieldValue::text("x"), true);
        assert_eq!(outcome, StoreOutcome::Dropped);
    }

    #[test]
    fn test_concurrent_inserts_keep_exactly_one_winner() {
        let doc = Arc::new(AssembledDocument::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let doc = Arc::clone(&doc);
                std::thread::spawn(move || doc.store_field("key", FieldValue::Integer(i), false))
            })
            .collect();

        let outcomes: Vec<StoreOutcome> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let inserted = outcomes
            .iter()
            .filter(|o| **o == StoreOutcome::Inserted)
            .count();
        assert_eq!(inserted, 1);
        assert_eq!(doc.len(), 1);
    }

    #[test]
    fn test_concurrent_appends_lose_nothing() {
        let doc = Arc::new(AssembledDocument::new());
        let handles: Vec<_> = (0..16)
            .map(|_| {
                let doc = Arc::clone(&doc);
                std::thread::spawn(move || doc.store_field("text", FieldValue::text("w"), true))
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let value = doc.get("text").unwrap();
        assert_eq!(value.as_text().unwrap().split(' ').count(), 16);
    }

    #[test]
    fn test_keys_and_serialization() {
        let doc = AssembledDocument::new();
        doc.store_field("b", FieldValue::text("2"), false);
        doc.store_field("a", FieldValue::Integer(1), false);

        assert_eq!(doc.keys(), vec!["a".to_string(), "b".to_string()]);
        assert_eq!(serde_json::to_string(&doc).unwrap(), r#"{"a":1,"b":"2"}"#);
    }
}
