//! Field selection and document assembly for search indexing.
//!
//! This crate decides which fields of an indexable content item reach a
//! search document, adds them through a pluggable add-field step, and
//! aggregates per-field failures under sequential or parallel execution.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    fieldwork-assembly                       │
//! ├─────────────────────────────────────────────────────────────┤
//! │  DocumentAssembler (working set, dispatch, error policy)    │
//! │  ├── Executor::Sequential                                   │
//! │  └── Executor::Parallel (bounded rayon pool)                │
//! ├─────────────────────────────────────────────────────────────┤
//! │  FieldAdmission trait (FieldSelectionPolicy rules)          │
//! │  FieldWriter trait                                          │
//! │  └── StoringFieldWriter (FieldReader + FieldNameTranslator) │
//! ├─────────────────────────────────────────────────────────────┤
//! │  IndexableItem trait / ContentItem / Field / FieldValue     │
//! │  AssembledDocument (concurrent first-write-wins map)        │
//! │  AssemblerConfig (TOML)                                     │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Admission order
//!
//! | Step | Rule | Outcome |
//! |------|------|---------|
//! | 1 | name missing or empty | skipped (warn) |
//! | 2 | template item, id/name in template exclusions | skipped |
//! | 3 | media item, name in media exclusions | skipped |
//! | 4 | id/name in exclusions | skipped |
//! | 5 | `index_all_fields` | admitted |
//! | 6 | id/name in inclusions | admitted |
//! | 7 | otherwise | skipped (not included) |
//!
//! # Example
//!
//! ```rust
//! use fieldwork_assembly::{
//!     AssemblerConfig, ContentItem, DocumentAssembler, ExecutionMode, Field,
//!     FieldSelectionPolicy, FieldValue, StoringFieldWriter,
//! };
//!
//! let item = ContentItem::new("item-1")
//!     .with_field(Field::text("1", "Title", "Hello"))
//!     .with_field(Field::new("2", Some("")).with_value("x"))
//!     .with_field(Field::text("3", "Body", "World"));
//!
//! let config = AssemblerConfig::with_policy(FieldSelectionPolicy::index_all())
//!     .execution(ExecutionMode::Parallel { max_workers: 2 });
//! let assembler = DocumentAssembler::new(config, StoringFieldWriter::new())?;
//!
//! let assembly = assembler.assemble(&item)?;
//! assert_eq!(assembly.document.get("Body"), Some(FieldValue::text("World")));
//! assert_eq!(assembly.stats.skipped.len(), 1);
//! # Ok::<(), fieldwork_core::Error>(())
//! ```

pub mod admission;
pub mod assembler;
pub mod config;
pub mod document;
pub mod item;
pub mod policy;
pub mod value;
pub mod writer;

// Re-exports
pub use admission::{Admission, FieldAdmission, ItemKind, SkipReason};
pub use assembler::{Assembly, AssemblyStats, DocumentAssembler, SkippedField};
pub use config::{AssemblerConfig, ExecutionMode};
pub use document::{APPEND_SEPARATOR, AssembledDocument, StoreOutcome};
pub use item::{ContentItem, Field, IndexableItem, resolve_field_key};
pub use policy::{FieldKeySet, FieldSelectionPolicy};
pub use value::FieldValue;
pub use writer::{
    FieldContext, FieldNameTranslator, FieldReader, FieldWrite, FieldWriter, ItemValueReader,
    PassthroughTranslator, SnakeCaseTranslator, StoringFieldWriter,
};

pub use tokio_util::sync::CancellationToken;
