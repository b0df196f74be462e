//! Field selection policy.
//!
//! A [`FieldSelectionPolicy`] is the read-only snapshot of indexing options
//! an assembly runs under. Every key set holds field ids or field names; a
//! field is a member when either form is present.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::item::Field;

// ============================================================================
// FieldKeySet
// ============================================================================

/// A set of field keys (id strings or names).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldKeySet(BTreeSet<String>);

impl FieldKeySet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a key.
    pub fn insert(&mut self, key: impl Into<String>) -> bool {
        self.0.insert(key.into())
    }

    /// Returns `true` if the raw key is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains(key)
    }

    /// Returns `true` if the field's name is present.
    pub fn contains_name(&self, field: &Field) -> bool {
        field.name().is_some_and(|name| self.0.contains(name))
    }

    /// Returns `true` if the field's id string or name is present.
    pub fn contains_field(&self, field: &Field) -> bool {
        self.0.contains(field.id.as_str()) || self.contains_name(field)
    }

    /// Returns `true` if the set has no keys.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate over the keys.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for FieldKeySet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

// ============================================================================
// FieldSelectionPolicy
// ============================================================================

/// Indexing options that decide which fields reach the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSelectionPolicy {
    /// Index every loaded field (subject to exclusions).
    #[serde(default = "default_true")]
    pub index_all_fields: bool,

    /// Fields to index when `index_all_fields` is off.
    #[serde(default)]
    pub included_fields: FieldKeySet,

    /// Fields never indexed.
    #[serde(default)]
    pub excluded_fields: FieldKeySet,

    /// Fields never indexed on template items.
    #[serde(default)]
    pub excluded_template_fields: FieldKeySet,

    /// Fields never indexed on media items (matched by name).
    #[serde(default)]
    pub excluded_media_fields: FieldKeySet,

    /// Abort the assembly on the first field error.
    #[serde(default)]
    pub stop_on_field_error: bool,

    /// Read fallback-language values for fields without a value.
    #[serde(default)]
    pub enable_field_language_fallback: bool,

    /// Resolve included keys that are not owned ids as field names.
    #[serde(default)]
    pub resolve_included_by_name: bool,
}

fn default_true() -> bool {
    true
}

impl Default for FieldSelectionPolicy {
    fn default() -> Self {
        Self {
            index_all_fields: default_true(),
            included_fields: FieldKeySet::new(),
            excluded_fields: FieldKeySet::new(),
            excluded_template_fields: FieldKeySet::new(),
            excluded_media_fields: FieldKeySet::new(),
            stop_on_field_error: false,
            enable_field_language_fallback: false,
            resolve_included_by_name: false,
        }
    }
}

impl FieldSelectionPolicy {
    /// Policy that indexes every loaded field.
    pub fn index_all() -> Self {
        Self::default()
    }

    /// Policy that indexes only the given keys.
    pub fn include_only<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            index_all_fields: false,
            included_fields: keys.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Add general exclusions.
    pub fn excluding<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for key in keys {
            self.excluded_fields.insert(key);
        }
        self
    }

    /// Add template-only exclusions.
    pub fn excluding_on_templates<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for key in keys {
            self.excluded_template_fields.insert(key);
        }
        self
    }

    /// Add media-only exclusions.
    pub fn excluding_on_media<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for key in keys {
            self.excluded_media_fields.insert(key);
        }
        self
    }

    /// Set fail-fast behavior.
    pub fn stop_on_field_error(mut self, stop: bool) -> Self {
        self.stop_on_field_error = stop;
        self
    }

    /// Enable or disable language fallback.
    pub fn with_language_fallback(mut self, enabled: bool) -> Self {
        self.enable_field_language_fallback = enabled;
        self
    }

    /// Returns `true` if template exclusions are configured.
    pub fn has_excluded_template_fields(&self) -> bool {
        !self.excluded_template_fields.is_empty()
    }

    /// Returns `true` if media exclusions are configured.
    pub fn has_excluded_media_fields(&self) -> bool {
        !self.excluded_media_fields.is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================
