//! Indexable content items and their fields.
//!
//! The assembler only sees items through the [`IndexableItem`] trait. An item
//! may expose a partial field set until [`IndexableItem::load_all_fields`] is
//! called, and may own fields that are only reachable by id.
//!
//! [`ContentItem`] is an in-memory implementation that can be deserialized
//! from JSON:
//!
//! ```json
//! {
//!   "id": "item-1",
//!   "is_template": false,
//!   "fields": [
//!     { "id": "1", "name": "Title", "value": "Hello" },
//!     { "id": "9", "name": "Summary", "value": "Lazy", "eager": false }
//!   ]
//! }
//! ```

use std::sync::atomic::{AtomicBool, Ordering};

use fieldwork_core::{FieldId, ItemId};
use serde::{Deserialize, Serialize};

use crate::value::FieldValue;

// ============================================================================
// Field
// ============================================================================

/// A named, typed attribute of a content item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// Stable identifier.
    pub id: FieldId,
    /// Display name. May be missing or empty.
    #[serde(default)]
    pub name: Option<String>,
    /// Type key (e.g. "single-line text", "integer").
    #[serde(default)]
    pub type_key: String,
    /// Raw value in the item's own language.
    #[serde(default)]
    pub value: Option<FieldValue>,
    /// Value resolved from the fallback language.
    #[serde(default)]
    pub fallback_value: Option<FieldValue>,
    /// Whether the field is visible before a full load.
    #[serde(default = "default_true")]
    pub eager: bool,
}

fn default_true() -> bool {
    true
}

impl Field {
    /// Create an eager field with an optional name and no value.
    pub fn new(id: impl Into<FieldId>, name: Option<&str>) -> Self {
        Self {
            id: id.into(),
            name: name.map(str::to_string),
            type_key: String::new(),
            value: None,
            fallback_value: None,
            eager: true,
        }
    }

    /// Create an eager named text field.
    pub fn text(id: impl Into<FieldId>, name: &str, value: &str) -> Self {
        Self::new(id, Some(name)).with_value(FieldValue::text(value))
    }

    /// Set the raw value.
    pub fn with_value(mut self, value: impl Into<FieldValue>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Set the fallback-language value.
    pub fn with_fallback_value(mut self, value: impl Into<FieldValue>) -> Self {
        self.fallback_value = Some(value.into());
        self
    }

    /// Set the type key.
    pub fn with_type_key(mut self, type_key: impl Into<String>) -> Self {
        self.type_key = type_key.into();
        self
    }

    /// Hide the field until the item is fully loaded.
    pub fn lazy(mut self) -> Self {
        self.eager = false;
        self
    }

    /// The field name, or `None` when missing or empty.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref().filter(|n| !n.is_empty())
    }

    /// The field name for diagnostics (empty when missing).
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    /// Returns `true` if `key` is this field's id string or its name.
    pub fn matches_key(&self, key: &str) -> bool {
        self.id.matches_key(key) || self.name() == Some(key)
    }
}

// ============================================================================
// IndexableItem
// ============================================================================

/// A source record being prepared for search indexing.
///
/// Implementations must be shareable across worker threads; lazy loading
/// therefore goes through `&self`.
pub trait IndexableItem: Send + Sync {
    /// Unique identifier of the item.
    fn unique_id(&self) -> &ItemId;

    /// Template (type) tag of the item.
    fn template_id(&self) -> Option<&str> {
        None
    }

    /// Whether the item is itself a template definition.
    fn is_template(&self) -> bool;

    /// Whether the item is a media item.
    fn is_media(&self) -> bool;

    /// Culture/locale of the item version being indexed.
    fn culture(&self) -> Option<&str> {
        None
    }

    /// Populate the full field set.
    fn load_all_fields(&self);

    /// The currently loaded fields, in the item's natural order.
    fn fields(&self) -> Vec<Field>;

    /// Look up a field owned by this item, loaded or not.
    fn field_by_id(&self, id: &FieldId) -> Option<Field>;

    /// Look up a field by name.
    fn field_by_name(&self, name: &str) -> Option<Field> {
        self.fields().into_iter().find(|f| f.name() == Some(name))
    }

    /// Whether the field id belongs to this item.
    fn owns_field(&self, id: &FieldId) -> bool {
        self.field_by_id(id).is_some()
    }
}

/// Resolve a policy key to a field of the item.
///
/// A key naming a field id resolves only when the item owns that field. When
/// `by_name` is set, a key that is not an owned id is tried as a field name.
pub fn resolve_field_key(item: &dyn IndexableItem, key: &str, by_name: bool) -> Option<Field> {
    let id = FieldId::new(key);
    if item.owns_field(&id) {
        return item.field_by_id(&id);
    }

    if by_name {
        return item.field_by_name(key);
    }

    None
}

// ============================================================================
// ContentItem
// ============================================================================

/// In-memory indexable item.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ContentItem {
    id: ItemId,
    #[serde(default)]
    template_id: Option<String>,
    #[serde(default)]
    is_template: bool,
    #[serde(default)]
    is_media: bool,
    #[serde(default)]
    culture: Option<String>,
    #[serde(default)]
    fields: Vec<Field>,
    #[serde(skip)]
    fully_loaded: AtomicBool,
}

impl ContentItem {
    /// Create an empty item.
    pub fn new(id: impl Into<ItemId>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Mark the item as a template.
    pub fn template(mut self) -> Self {
        self.is_template = true;
        self
    }

    /// Mark the item as a media item.
    pub fn media(mut self) -> Self {
        self.is_media = true;
        self
    }

    /// Set the template id.
    pub fn with_template_id(mut self, template_id: impl Into<String>) -> Self {
        self.template_id = Some(template_id.into());
        self
    }

    /// Set the culture.
    pub fn with_culture(mut self, culture: impl Into<String>) -> Self {
        self.culture = Some(culture.into());
        self
    }

    /// Append a field.
    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Append several fields.
    pub fn with_fields(mut self, fields: impl IntoIterator<Item = Field>) -> Self {
        self.fields.extend(fields);
        self
    }

    /// Whether `load_all_fields` has run.
    pub fn is_fully_loaded(&self) -> bool {
        self.fully_loaded.load(Ordering::Acquire)
    }
}

impl Clone for ContentItem {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            template_id: self.template_id.clone(),
            is_template: self.is_template,
            is_media: self.is_media,
            culture: self.culture.clone(),
            fields: self.fields.clone(),
            fully_loaded: AtomicBool::new(self.is_fully_loaded()),
        }
    }
}

impl IndexableItem for ContentItem {
    fn unique_id(&self) -> &ItemId {
        &self.id
    }

    fn template_id(&self) -> Option<&str> {
        self.template_id.as_deref()
    }

    fn is_template(&self) -> bool {
        self.is_template
    }

    fn is_media(&self) -> bool {
        self.is_media
    }

    fn culture(&self) -> Option<&str> {
        self.culture.as_deref()
    }

    fn load_all_fields(&self) {
        self.fully_loaded.store(true, Ordering::Release);
    }

    fn fields(&self) -> Vec<Field> {
        let all = self.is_fully_loaded();
        self.fields
            .iter()
            .filter(|f| all || f.eager)
            .cloned()
            .collect()
    }

    fn field_by_id(&self, id: &FieldId) -> Option<Field> {
        self.fields.iter().find(|f| &f.id == id).cloned()
    }

    fn field_by_name(&self, name: &str) -> Option<Field> {
        self.fields.iter().find(|f| f.name() == Some(name)).cloned()
    }
}

// ============================================================================
// Tests
// ============================================================================
