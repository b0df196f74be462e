//! Document assembly.
//!
//! [`DocumentAssembler`] turns an [`IndexableItem`] into an
//! [`AssembledDocument`]:
//!
//! 1. Load the full field set when indexing all fields
//! 2. Build the working set (all loaded fields, or the included ones plus
//!    owned fields resolved by id)
//! 3. Run admission on every field
//! 4. Hand admitted fields to the [`FieldWriter`]
//! 5. Record or propagate field errors according to `stop_on_field_error`
//!
//! Fields are processed sequentially or on a bounded rayon pool. In both
//! modes the cancellation token is checked before each field is dispatched.
//! In parallel mode a fail-fast error stops new fields from starting; fields
//! already running finish.
//!
//! # Usage
//!
//! ```rust
//! use fieldwork_assembly::{
//!     AssemblerConfig, ContentItem, DocumentAssembler, Field, FieldSelectionPolicy,
//!     StoringFieldWriter,
//! };
//!
//! let item = ContentItem::new("item-1")
//!     .with_field(Field::text("1", "Title", "Hello"))
//!     .with_field(Field::text("3", "Body", "World"));
//!
//! let config = AssemblerConfig::with_policy(FieldSelectionPolicy::include_only(["Title"]));
//! let assembler = DocumentAssembler::new(config, StoringFieldWriter::new())?;
//!
//! let document = assembler.assemble(&item)?.into_result()?;
//! assert_eq!(document.keys(), vec!["Title".to_string()]);
//! # Ok::<(), fieldwork_core::Error>(())
//! ```

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use fieldwork_core::{AggregateFieldError, Error, FieldAddError, FieldId, ItemId, Result};
use parking_lot::Mutex;
use rayon::prelude::*;
use tokio_util::sync::CancellationToken;

use crate::admission::{Admission, FieldAdmission, SkipReason};
use crate::config::{AssemblerConfig, ExecutionMode};
use crate::document::{AssembledDocument, StoreOutcome};
use crate::item::{Field, IndexableItem, resolve_field_key};
use crate::policy::FieldSelectionPolicy;
use crate::writer::{FieldContext, FieldWrite, FieldWriter};

// ============================================================================
// Results
// ============================================================================

/// A field that was left out of the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedField {
    /// Field id.
    pub field_id: FieldId,
    /// Field name (empty when missing).
    pub field_name: String,
    /// Why it was skipped.
    pub reason: SkipReason,
}

/// Statistics about one assembly.
#[derive(Debug, Default)]
pub struct AssemblyStats {
    /// Fields in the working set.
    pub fields_considered: usize,
    /// Fields whose value reached the document (inserted or appended).
    pub fields_added: usize,
    /// Fields admitted but without a value.
    pub fields_empty: usize,
    /// Fields whose key was already taken.
    pub fields_dropped: usize,
    /// Fields rejected by admission.
    pub skipped: Vec<SkippedField>,
    /// Recorded field errors (never populated on fail-fast).
    pub errors: Vec<FieldAddError>,
}

impl AssemblyStats {
    fn record(&mut self, field: &Field, outcome: FieldOutcome) {
        match outcome {
            FieldOutcome::Skipped(reason) => self.skipped.push(SkippedField {
                field_id: field.id.clone(),
                field_name: field.display_name().to_string(),
                reason,
            }),
            FieldOutcome::Written(FieldWrite::Stored(StoreOutcome::Dropped)) => {
                self.fields_dropped += 1;
            }
            FieldOutcome::Written(FieldWrite::Stored(_)) => self.fields_added += 1,
            FieldOutcome::Written(FieldWrite::Empty) => self.fields_empty += 1,
            FieldOutcome::Failed(err) => self.errors.push(err),
        }
    }

    /// Skips recorded for one field id.
    pub fn skips_for(&self, id: &FieldId) -> Vec<SkipReason> {
        self.skipped
            .iter()
            .filter(|s| &s.field_id == id)
            .map(|s| s.reason)
            .collect()
    }
}

/// The document plus what happened while building it.
#[derive(Debug)]
pub struct Assembly {
    /// The assembled document (possibly partial when fields failed).
    pub document: AssembledDocument,
    /// Assembly statistics.
    pub stats: AssemblyStats,
}

impl Assembly {
    /// Returns `true` if any field failed.
    pub fn has_errors(&self) -> bool {
        !self.stats.errors.is_empty()
    }

    /// The document, or every field error together when any field failed.
    pub fn into_result(self) -> std::result::Result<AssembledDocument, AggregateFieldError> {
        if self.stats.errors.is_empty() {
            Ok(self.document)
        } else {
            Err(AggregateFieldError::new(self.stats.errors))
        }
    }

    /// The document, discarding statistics and errors.
    pub fn into_document(self) -> AssembledDocument {
        self.document
    }
}

enum FieldOutcome {
    Skipped(SkipReason),
    Written(FieldWrite),
    Failed(FieldAddError),
}

// ============================================================================
// DocumentAssembler
// ============================================================================

enum Executor {
    Sequential,
    Parallel {
        pool: rayon::ThreadPool,
        max_workers: usize,
    },
}

/// Builds search documents from indexable items.
///
/// Generic over the add-field capability `W`. Admission defaults to the
/// configured [`FieldSelectionPolicy`] and can be replaced.
pub struct DocumentAssembler<W: FieldWriter> {
    index_name: String,
    policy: FieldSelectionPolicy,
    admission: Box<dyn FieldAdmission>,
    writer: W,
    executor: Executor,
    cancel: CancellationToken,
}

impl<W: FieldWriter> DocumentAssembler<W> {
    /// Create an assembler from configuration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the configuration is invalid or the
    /// worker pool cannot be created.
    pub fn new(config: AssemblerConfig, writer: W) -> Result<Self> {
        config.validate()?;

        let executor = match config.execution {
            ExecutionMode::Sequential => Executor::Sequential,
            ExecutionMode::Parallel { max_workers } => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(max_workers)
                    .thread_name(|i| format!("fieldwork-worker-{i}"))
                    .build()
                    .map_err(|e| Error::config(format!("Failed to build worker pool: {e}")))?;
                Executor::Parallel { pool, max_workers }
            }
        };

        Ok(Self {
            index_name: config.index_name,
            admission: Box::new(config.policy.clone()),
            policy: config.policy,
            writer,
            executor,
            cancel: CancellationToken::new(),
        })
    }

    /// Replace the admission strategy.
    pub fn with_admission(mut self, admission: Box<dyn FieldAdmission>) -> Self {
        self.admission = admission;
        self
    }

    /// Use an external cancellation token.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// The token checked between field dispatches.
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// The active policy.
    pub fn policy(&self) -> &FieldSelectionPolicy {
        &self.policy
    }

    /// The add-field capability.
    pub fn writer(&self) -> &W {
        &self.writer
    }

    /// Assemble the document for one item.
    ///
    /// # Errors
    ///
    /// - [`Error::FieldAdd`] with the first failure when
    ///   `stop_on_field_error` is set
    /// - [`Error::Cancelled`] when the token fires before every field was
    ///   dispatched
    ///
    /// Other field failures are recorded in [`AssemblyStats::errors`]; use
    /// [`Assembly::into_result`] to turn them into one aggregate error.
    pub fn assemble(&self, item: &dyn IndexableItem) -> Result<Assembly> {
        let _marker = AssemblyMarker::start(item.unique_id());

        if self.policy.index_all_fields {
            item.load_all_fields();
        }

        let working = self.working_set(item);
        let document = AssembledDocument::new();

        let mut stats = match &self.executor {
            Executor::Sequential => self.run_sequential(item, &working, &document)?,
            Executor::Parallel { pool, .. } => {
                pool.install(|| self.run_parallel(item, &working, &document))?
            }
        };
        stats.fields_considered = working.len();

        for err in &stats.errors {
            log::error!(
                "Could not add field {} : {} for indexable {}: {}",
                err.field_id,
                err.field_name,
                err.item_id,
                err.message
            );
        }

        Ok(Assembly { document, stats })
    }

    /// The fields an assembly of `item` will visit, in dispatch order.
    pub fn working_set(&self, item: &dyn IndexableItem) -> Vec<Field> {
        let loaded = item.fields();
        if self.policy.index_all_fields {
            return loaded;
        }

        let included = &self.policy.included_fields;
        let loaded_ids: HashSet<FieldId> = loaded.iter().map(|f| f.id.clone()).collect();
        let mut seen: HashSet<FieldId> = HashSet::new();
        let mut working: Vec<Field> = loaded
            .into_iter()
            .filter(|f| included.contains_field(f) && seen.insert(f.id.clone()))
            .collect();

        for key in included.iter() {
            if loaded_ids.contains(&FieldId::new(key)) {
                continue;
            }
            match resolve_field_key(item, key, self.policy.resolve_included_by_name) {
                Some(field) if seen.insert(field.id.clone()) => working.push(field),
                Some(_) => {}
                None if working.iter().any(|f| f.matches_key(key)) => {}
                None => log::debug!(
                    "Included field '{}' does not resolve on '{}'",
                    key,
                    item.unique_id()
                ),
            }
        }

        working
    }

    fn run_sequential(
        &self,
        item: &dyn IndexableItem,
        working: &[Field],
        document: &AssembledDocument,
    ) -> Result<AssemblyStats> {
        let mut stats = AssemblyStats::default();

        for (processed, field) in working.iter().enumerate() {
            if self.cancel.is_cancelled() {
                log::debug!("Assembly of '{}' cancelled", item.unique_id());
                return Err(Error::Cancelled { processed });
            }

            match self.process_field(item, field, document) {
                FieldOutcome::Failed(err) if self.policy.stop_on_field_error => {
                    return Err(Error::FieldAdd(err));
                }
                outcome => stats.record(field, outcome),
            }
        }

        Ok(stats)
    }

    fn run_parallel(
        &self,
        item: &dyn IndexableItem,
        working: &[Field],
        document: &AssembledDocument,
    ) -> Result<AssemblyStats> {
        let stats = Mutex::new(AssemblyStats::default());
        let halted = AtomicBool::new(false);
        let processed = AtomicUsize::new(0);
        let stop_on_error = self.policy.stop_on_field_error;

        working.par_iter().for_each(|field| {
            if halted.load(Ordering::Acquire) || self.cancel.is_cancelled() {
                return;
            }

            let outcome = self.process_field(item, field, document);
            processed.fetch_add(1, Ordering::AcqRel);

            if stop_on_error && matches!(outcome, FieldOutcome::Failed(_)) {
                halted.store(true, Ordering::Release);
            }
            stats.lock().record(field, outcome);
        });

        let processed = processed.into_inner();
        let mut stats = stats.into_inner();

        if stop_on_error && !stats.errors.is_empty() {
            return Err(Error::FieldAdd(stats.errors.swap_remove(0)));
        }

        if processed < working.len() && self.cancel.is_cancelled() {
            log::debug!("Assembly of '{}' cancelled", item.unique_id());
            return Err(Error::Cancelled { processed });
        }

        Ok(stats)
    }

    fn process_field(
        &self,
        item: &dyn IndexableItem,
        field: &Field,
        document: &AssembledDocument,
    ) -> FieldOutcome {
        if let Admission::Skipped(reason) = self.admission.admit(item, field) {
            self.log_skip(item, field, reason);
            return FieldOutcome::Skipped(reason);
        }

        let ctx = FieldContext {
            item,
            field,
            language_fallback: self.policy.enable_field_language_fallback,
            index_name: &self.index_name,
        };

        match self.writer.add_field(&ctx, document) {
            Ok(write) => FieldOutcome::Written(write),
            Err(err) => FieldOutcome::Failed(err),
        }
    }

    fn log_skip(&self, item: &dyn IndexableItem, field: &Field, reason: SkipReason) {
        match reason {
            SkipReason::MissingName => log::warn!(
                "[Index={}] '{}' field of '{}' item is skipped: {}.",
                self.index_name,
                field.id,
                item.unique_id(),
                reason
            ),
            _ => log::debug!(
                "Skipping field id:{}, name:{}, typeKey:{} - {}",
                field.id,
                field.display_name(),
                field.type_key,
                reason
            ),
        }
    }
}

impl<W: FieldWriter> std::fmt::Debug for DocumentAssembler<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mode = match &self.executor {
            Executor::Sequential => "sequential".to_string(),
            Executor::Parallel { max_workers, .. } => format!("parallel({max_workers})"),
        };
        f.debug_struct("DocumentAssembler")
            .field("index_name", &self.index_name)
            .field("policy", &self.policy)
            .field("mode", &mode)
            .finish()
    }
}

/// Logs the start of an assembly and, on drop, its end.
struct AssemblyMarker<'a> {
    item_id: &'a ItemId,
}

impl<'a> AssemblyMarker<'a> {
    fn start(item_id: &'a ItemId) -> Self {
        log::debug!("AssembleFields start [{item_id}]");
        Self { item_id }
    }
}

impl Drop for AssemblyMarker<'_> {
    fn drop(&mut self) {
        log::debug!("AssembleFields end [{}]", self.item_id);
    }
}

// ============================================================================
// Tests
// ============================================================================
