//! Per-field admission.
//!
//! Admission is a pure decision over `(policy, item kind, field)`. Rules are
//! evaluated in a fixed order and the first match wins:
//!
//! 1. missing or empty name → skipped
//! 2. template item with template exclusions, id or name excluded → skipped
//! 3. media item with media exclusions, name excluded → skipped
//! 4. id or name generally excluded → skipped
//! 5. `index_all_fields` → admitted
//! 6. id or name included → admitted
//! 7. otherwise → skipped as not included

use std::fmt;

use crate::item::{Field, IndexableItem};
use crate::policy::FieldSelectionPolicy;

/// Why a field was left out of the document. Not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// The field has no name.
    MissingName,
    /// Excluded on template items.
    TemplateExcluded,
    /// Excluded on media items.
    MediaExcluded,
    /// Excluded on every item.
    Excluded,
    /// Not part of the included set.
    NotIncluded,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingName => write!(f, "the field name is missed"),
            Self::TemplateExcluded => write!(f, "Field was excluded."),
            Self::MediaExcluded => write!(f, "Media field was excluded."),
            Self::Excluded => write!(f, "Field was excluded."),
            Self::NotIncluded => write!(f, "Field was not included."),
        }
    }
}

/// Outcome of an admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// The field goes to the add-field step.
    Admitted,
    /// The field is left out.
    Skipped(SkipReason),
}

impl Admission {
    /// Returns `true` if the field was admitted.
    pub fn is_admitted(&self) -> bool {
        matches!(self, Admission::Admitted)
    }
}

/// The item properties admission depends on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ItemKind {
    /// Item is a template definition.
    pub is_template: bool,
    /// Item is a media item.
    pub is_media: bool,
}

impl ItemKind {
    /// Read the kind flags of an item.
    pub fn of(item: &dyn IndexableItem) -> Self {
        Self {
            is_template: item.is_template(),
            is_media: item.is_media(),
        }
    }
}

/// Strategy deciding whether a field enters the document.
pub trait FieldAdmission: Send + Sync {
    /// Decide admission for one field of `item`.
    fn admit(&self, item: &dyn IndexableItem, field: &Field) -> Admission;
}

impl FieldAdmission for FieldSelectionPolicy {
    fn admit(&self, item: &dyn IndexableItem, field: &Field) -> Admission {
        evaluate(self, ItemKind::of(item), field)
    }
}

/// Apply the admission rules of `policy` to one field.
pub fn evaluate(policy: &FieldSelectionPolicy, kind: ItemKind, field: &Field) -> Admission {
    if field.name().is_none() {
        return Admission::Skipped(SkipReason::MissingName);
    }

    if kind.is_template
        && policy.has_excluded_template_fields()
        && policy.excluded_template_fields.contains_field(field)
    {
        return Admission::Skipped(SkipReason::TemplateExcluded);
    }

    if kind.is_media
        && policy.has_excluded_media_fields()
        && policy.excluded_media_fields.contains_name(field)
    {
        return Admission::Skipped(SkipReason::MediaExcluded);
    }

    if policy.excluded_fields.contains_field(field) {
        return Admission::Skipped(SkipReason::Excluded);
    }

    if policy.index_all_fields || policy.included_fields.contains_field(field) {
        return Admission::Admitted;
    }

    Admission::Skipped(SkipReason::NotIncluded)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const STANDARD: ItemKind = ItemKind {
        is_template: false,
        is_media: false,
    };
    const TEMPLATE: ItemKind = ItemKind {
        is_template: true,
        is_media: false,
    };
    const MEDIA: ItemKind = ItemKind {
        is_template: false,
        is_media: true,
    };

    fn title() -> Field {
        Field::text("1", "Title", "Hello")
    }

    // ------------------------------------------------------------------------
    // Rule order
    // ------------------------------------------------------------------------

    #[test]
    fn test_missing_name_beats_inclusion() {
        let policy = FieldSelectionPolicy::include_only(["2"]);
        let field = Field::new("2", Some("")).with_value("x");
        assert_eq!(
            evaluate(&policy, STANDARD, &field),
            Admission::Skipped(SkipReason::MissingName)
        );
    }

    #[test]
    fn test_missing_name_with_index_all() {
        let field = Field::new("2", None);
        assert_eq!(
            evaluate(&FieldSelectionPolicy::index_all(), STANDARD, &field),
            Admission::Skipped(SkipReason::MissingName)
        );
    }

    #[test]
    fn test_template_exclusion_precedes_general_exclusion() {
        let policy = FieldSelectionPolicy::index_all()
            .excluding(["Title"])
            .excluding_on_templates(["1"]);
        assert_eq!(
            evaluate(&policy, TEMPLATE, &title()),
            Admission::Skipped(SkipReason::TemplateExcluded)
        );
        assert_eq!(
            evaluate(&policy, STANDARD, &title()),
            Admission::Skipped(SkipReason::Excluded)
        );
    }

    // ------------------------------------------------------------------------
    // Kind-specific exclusions
    // ------------------------------------------------------------------------

    #[test]
    fn test_template_exclusion_only_on_templates() {
        let policy = FieldSelectionPolicy::index_all().excluding_on_templates(["Title"]);
        assert!(!evaluate(&policy, TEMPLATE, &title()).is_admitted());
        assert!(evaluate(&policy, STANDARD, &title()).is_admitted());
        assert!(evaluate(&policy, MEDIA, &title()).is_admitted());
    }

    #[test]
    fn test_media_exclusion_only_on_media() {
        let policy = FieldSelectionPolicy::index_all().excluding_on_media(["Title"]);
        assert_eq!(
            evaluate(&policy, MEDIA, &title()),
            Admission::Skipped(SkipReason::MediaExcluded)
        );
        assert!(evaluate(&policy, STANDARD, &title()).is_admitted());
        assert!(evaluate(&policy, TEMPLATE, &title()).is_admitted());
    }

    #[test]
    fn test_media_exclusion_matches_name_only() {
        let policy = FieldSelectionPolicy::index_all().excluding_on_media(["1"]);
        assert!(evaluate(&policy, MEDIA, &title()).is_admitted());
    }

    // ------------------------------------------------------------------------
    // General exclusion and inclusion
    // ------------------------------------------------------------------------

    #[test]
    fn test_excluded_by_id_or_name() {
        let by_id = FieldSelectionPolicy::index_all().excluding(["1"]);
        let by_name = FieldSelectionPolicy::index_all().excluding(["Title"]);
        assert_eq!(
            evaluate(&by_id, STANDARD, &title()),
            Admission::Skipped(SkipReason::Excluded)
        );
        assert_eq!(
            evaluate(&by_name, STANDARD, &title()),
            Admission::Skipped(SkipReason::Excluded)
        );
    }

    #[test]
    fn test_exclusion_beats_inclusion() {
        let policy = FieldSelectionPolicy::include_only(["Title"]).excluding(["1"]);
        assert_eq!(
            evaluate(&policy, STANDARD, &title()),
            Admission::Skipped(SkipReason::Excluded)
        );
    }

    #[test]
    fn test_included_by_id_or_name() {
        let by_id = FieldSelectionPolicy::include_only(["1"]);
        let by_name = FieldSelectionPolicy::include_only(["Title"]);
        assert!(evaluate(&by_id, STANDARD, &title()).is_admitted());
        assert!(evaluate(&by_name, STANDARD, &title()).is_admitted());
    }

    #[test]
    fn test_not_included() {
        let policy = FieldSelectionPolicy::include_only(["Body"]);
        assert_eq!(
            evaluate(&policy, STANDARD, &title()),
            Admission::Skipped(SkipReason::NotIncluded)
        );
    }

    #[test]
    fn test_skip_reason_display() {
        assert_eq!(
            SkipReason::NotIncluded.to_string(),
            "Field was not included."
        );
        assert_eq!(
            SkipReason::MissingName.to_string(),
            "the field name is missed"
        );
        assert_eq!(SkipReason::MediaExcluded.to_string(), "Media field was excluded.");
    }

    #[test]
    fn test_template_exclusion_reads_as_plain_exclusion() {
        assert_eq!(
            SkipReason::TemplateExcluded.to_string(),
            SkipReason::Excluded.to_string()
        );
        assert_eq!(SkipReason::TemplateExcluded.to_string(), "Field was excluded.");
    }
}
