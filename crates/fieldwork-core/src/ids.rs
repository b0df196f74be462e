//! Identifier types for content items and their fields.
//!
//! Both identifiers are opaque strings. Field ids are compared verbatim:
//! a policy key matches a field when it equals the id string or the name.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier of an indexable content item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Creates a new item ID from a string.
    ///
    /// # Examples
    ///
    /// ```
    /// use fieldwork_core::ItemId;
    ///
    /// let id = ItemId::new("sitecore://master/{110D559F}");
    /// assert_eq!(id.as_str(), "sitecore://master/{110D559F}");
    /// ```
    pub fn new<S: Into<String>>(id: S) -> Self {
        Self(id.into())
    }

    /// Returns the item ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ItemId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Stable identifier of a field within an item.
///
/// Field names are neither unique nor guaranteed to be present, so the id is
/// the only reliable key for a field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldId(String);

impl FieldId {
    /// Creates a new field ID from a string.
    ///
    /// # Examples
    ///
    /// ```
    /// use fieldwork_core::FieldId;
    ///
    /// let id = FieldId::new("{75577384-3C97-45DA-A847-81B00500E250}");
    /// assert!(id.matches_key("{75577384-3C97-45DA-A847-81B00500E250}"));
    /// ```
    pub fn new<S: Into<String>>(id: S) -> Self {
        Self(id.into())
    }

    /// Returns the field ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if `key` is this id's string form.
    pub fn matches_key(&self, key: &str) -> bool {
        self.0 == key
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for FieldId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for FieldId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for FieldId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
