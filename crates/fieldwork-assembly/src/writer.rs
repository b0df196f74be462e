//! The add-field step and its collaborators.
//!
//! The assembler hands every admitted field to a [`FieldWriter`]. The stock
//! [`StoringFieldWriter`] composes a [`FieldReader`] (value resolution and
//! type coercion) with a [`FieldNameTranslator`] (document key) and stores
//! the result through [`AssembledDocument::store_field`]. Any of these
//! steps may fail for a single field with a [`FieldAddError`].

use fieldwork_core::FieldAddError;

use crate::document::{AssembledDocument, StoreOutcome};
use crate::item::{Field, IndexableItem};
use crate::value::FieldValue;

// ============================================================================
// FieldContext
// ============================================================================

/// Everything the add-field step knows about one field.
#[derive(Clone, Copy)]
pub struct FieldContext<'a> {
    /// Item being assembled.
    pub item: &'a dyn IndexableItem,
    /// Field being added.
    pub field: &'a Field,
    /// Whether fallback-language values may be used.
    pub language_fallback: bool,
    /// Name of the target index, for diagnostics.
    pub index_name: &'a str,
}

impl<'a> FieldContext<'a> {
    /// Build a field error for this context.
    pub fn error(&self, message: impl Into<String>) -> FieldAddError {
        FieldAddError::new(
            self.item.unique_id().clone(),
            self.field.id.clone(),
            self.field.display_name(),
            message,
        )
    }
}

impl std::fmt::Debug for FieldContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldContext")
            .field("item", self.item.unique_id())
            .field("field", &self.field.id)
            .field("language_fallback", &self.language_fallback)
            .field("index_name", &self.index_name)
            .finish()
    }
}

// ============================================================================
// Traits
// ============================================================================

/// Resolves a field's raw value.
pub trait FieldReader: Send + Sync {
    /// Read the value of `ctx.field`. `Ok(None)` means there is nothing to
    /// store.
    fn read(&self, ctx: &FieldContext<'_>) -> Result<Option<FieldValue>, FieldAddError>;
}

/// Maps a field to its document key.
pub trait FieldNameTranslator: Send + Sync {
    /// Return the key under which `ctx.field` is stored.
    fn translate(&self, ctx: &FieldContext<'_>) -> Result<String, FieldAddError>;
}

/// Result of a successful add-field call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldWrite {
    /// The value reached the document store.
    Stored(StoreOutcome),
    /// The field had no value; nothing was stored.
    Empty,
}

/// The add-field capability.
pub trait FieldWriter: Send + Sync {
    /// Add `ctx.field` to `doc`.
    fn add_field(
        &self,
        ctx: &FieldContext<'_>,
        doc: &AssembledDocument,
    ) -> Result<FieldWrite, FieldAddError>;
}

// ============================================================================
// ItemValueReader
// ============================================================================

/// Reads values straight off the [`Field`], coercing by type key.
///
/// Recognized type keys (case-insensitive): `integer`, `number`, `checkbox`.
/// Other type keys pass values through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct ItemValueReader;

impl FieldReader for ItemValueReader {
    fn read(&self, ctx: &FieldContext<'_>) -> Result<Option<FieldValue>, FieldAddError> {
        let field = ctx.field;
        let raw = match (&field.value, ctx.language_fallback) {
            (Some(value), _) => Some(value),
            (None, true) => field.fallback_value.as_ref(),
            (None, false) => None,
        };

        match raw {
            Some(value) => coerce(ctx, value).map(Some),
            None => Ok(None),
        }
    }
}

fn coerce(ctx: &FieldContext<'_>, value: &FieldValue) -> Result<FieldValue, FieldAddError> {
    let type_key = ctx.field.type_key.to_ascii_lowercase();
    match (type_key.as_str(), value) {
        ("integer", FieldValue::Text(s)) => s
            .trim()
            .parse::<i64>()
            .map(FieldValue::Integer)
            .map_err(|e| ctx.error(format!("'{s}' is not an integer")).with_source(e)),
        ("number", FieldValue::Text(s)) => s
            .trim()
            .parse::<f64>()
            .map(FieldValue::Float)
            .map_err(|e| ctx.error(format!("'{s}' is not a number")).with_source(e)),
        ("checkbox", FieldValue::Text(s)) => match s.trim() {
            "1" | "true" => Ok(FieldValue::Bool(true)),
            "" | "0" | "false" => Ok(FieldValue::Bool(false)),
            other => Err(ctx.error(format!("'{other}' is not a checkbox value"))),
        },
        _ => Ok(value.clone()),
    }
}

// ============================================================================
// Translators
// ============================================================================

/// Uses the field name verbatim as the document key.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughTranslator;

impl FieldNameTranslator for PassthroughTranslator {
    fn translate(&self, ctx: &FieldContext<'_>) -> Result<String, FieldAddError> {
        ctx.field
            .name()
            .map(str::to_string)
            .ok_or_else(|| ctx.error("field has no name to translate"))
    }
}

/// Lowercase snake_case keys ("Page Title" → "page_title").
#[derive(Debug, Clone, Copy, Default)]
pub struct SnakeCaseTranslator;

impl FieldNameTranslator for SnakeCaseTranslator {
    fn translate(&self, ctx: &FieldContext<'_>) -> Result<String, FieldAddError> {
        let name = ctx
            .field
            .name()
            .ok_or_else(|| ctx.error("field has no name to translate"))?;
        let key = snake_case(name);
        if key.is_empty() {
            return Err(ctx.error(format!("field name '{name}' translates to an empty key")));
        }
        Ok(key)
    }
}

/// Normalize a field name to lowercase snake_case.
///
/// Trims, lowercases, treats hyphens as word breaks and collapses runs of
/// whitespace into single underscores.
pub fn snake_case(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .replace('-', " ")
        .split_whitespace()
        .collect::<Vec<&str>>()
        .join("_")
}

// ============================================================================
// StoringFieldWriter
// ============================================================================

/// Reader + translator + document store.
#[derive(Debug, Clone, Default)]
pub struct StoringFieldWriter<R = ItemValueReader, T = PassthroughTranslator> {
    reader: R,
    translator: T,
    append_text: bool,
}

impl StoringFieldWriter {
    /// Writer with the stock reader and passthrough keys.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<R: FieldReader, T: FieldNameTranslator> StoringFieldWriter<R, T> {
    /// Writer with custom collaborators.
    pub fn with_parts(reader: R, translator: T) -> Self {
        Self {
            reader,
            translator,
            append_text: false,
        }
    }

    /// Append text written to an existing key instead of dropping it.
    pub fn append_text(mut self, append: bool) -> Self {
        self.append_text = append;
        self
    }
}

impl<R: FieldReader, T: FieldNameTranslator> FieldWriter for StoringFieldWriter<R, T> {
    fn add_field(
        &self,
        ctx: &FieldContext<'_>,
        doc: &AssembledDocument,
    ) -> Result<FieldWrite, FieldAddError> {
        let Some(value) = self.reader.read(ctx)? else {
            log::debug!(
                "Field id:{}, name:{} of '{}' has no value",
                ctx.field.id,
                ctx.field.display_name(),
                ctx.item.unique_id()
            );
            return Ok(FieldWrite::Empty);
        };

        let key = self.translator.translate(ctx)?;
        let outcome = doc.store_field(key.as_str(), value, self.append_text);
        if outcome == StoreOutcome::Dropped {
            log::debug!(
                "Field id:{} dropped: '{}' already set on '{}'",
                ctx.field.id,
                key,
                ctx.item.unique_id()
            );
        }
        Ok(FieldWrite::Stored(outcome))
    }
}

// ============================================================================
// Tests
// ============================================================================
