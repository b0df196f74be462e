//! Common test utilities for assembly integration tests.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};

use fieldwork_assembly::{
    AssembledDocument, AssemblerConfig, CancellationToken, ContentItem, DocumentAssembler,
    ExecutionMode, Field, FieldContext, FieldSelectionPolicy, FieldWrite, FieldWriter,
    StoringFieldWriter,
};
use fieldwork_core::{FieldAddError, FieldId};
use parking_lot::Mutex;

/// Writer that stores values but fails for selected field ids.
///
/// Records every field it was asked to add.
#[derive(Default)]
pub struct ScriptedWriter {
    inner: StoringFieldWriter,
    failing: HashSet<FieldId>,
    fail_all: bool,
    attempts: AtomicUsize,
    seen: Mutex<Vec<FieldId>>,
    cancel_after: Option<(usize, CancellationToken)>,
}

impl ScriptedWriter {
    /// Writer that never fails.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail for the given field ids.
    pub fn failing<I: IntoIterator<Item = &'static str>>(ids: I) -> Self {
        Self {
            failing: ids.into_iter().map(FieldId::new).collect(),
            ..Self::default()
        }
    }

    /// Fail for every field.
    pub fn failing_all() -> Self {
        Self {
            fail_all: true,
            ..Self::default()
        }
    }

    /// Cancel `token` once `calls` fields have been added.
    pub fn cancelling_after(calls: usize, token: CancellationToken) -> Self {
        Self {
            cancel_after: Some((calls, token)),
            ..Self::default()
        }
    }

    /// Number of add-field calls.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    /// Field ids passed to the writer, in call order.
    pub fn seen(&self) -> Vec<FieldId> {
        self.seen.lock().clone()
    }
}

impl FieldWriter for ScriptedWriter {
    fn add_field(
        &self,
        ctx: &FieldContext<'_>,
        doc: &AssembledDocument,
    ) -> Result<FieldWrite, FieldAddError> {
        let calls = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
        self.seen.lock().push(ctx.field.id.clone());

        if let Some((after, token)) = &self.cancel_after {
            if calls >= *after {
                token.cancel();
            }
        }

        if self.fail_all || self.failing.contains(&ctx.field.id) {
            return Err(ctx.error("scripted failure"));
        }

        self.inner.add_field(ctx, doc)
    }
}

/// Build an assembler for `policy` in the given mode.
pub fn assembler_with<W: FieldWriter>(
    policy: FieldSelectionPolicy,
    mode: ExecutionMode,
    writer: W,
) -> DocumentAssembler<W> {
    let config = AssemblerConfig::with_policy(policy)
        .execution(mode)
        .index_name("test_index");
    DocumentAssembler::new(config, writer).unwrap()
}

/// Both execution modes used across tests.
pub fn modes() -> [ExecutionMode; 2] {
    [
        ExecutionMode::Sequential,
        ExecutionMode::Parallel { max_workers: 4 },
    ]
}

/// Item with `n` named text fields `F0..Fn` (ids `0..n`).
pub fn item_with_fields(n: usize) -> ContentItem {
    ContentItem::new("item-n").with_fields(
        (0..n).map(|i| Field::text(i.to_string(), &format!("F{i}"), &format!("value {i}"))),
    )
}

/// The three-field item from the reference scenario.
pub fn scenario_item() -> ContentItem {
    ContentItem::new("item-1")
        .with_field(Field::text("1", "Title", "Hello"))
        .with_field(Field::new("2", Some("")).with_value("x"))
        .with_field(Field::text("3", "Body", "World"))
}
