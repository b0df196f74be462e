//! Handler functions for CLI commands.
//!
//! Handlers return their output instead of printing it, so the binary
//! decides how to render and the tests can inspect the result.

use std::path::Path;

use fieldwork_assembly::{
    AssemblerConfig, Assembly, ContentItem, DocumentAssembler, ExecutionMode, StoringFieldWriter,
};
use fieldwork_core::{Error, Result};
use serde_json::{Value, json};

// ============================================================================
// Loading
// ============================================================================

/// Load the configuration at `path`, or defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> Result<AssemblerConfig> {
    match path {
        Some(path) => AssemblerConfig::load(path),
        None => Ok(AssemblerConfig::default()),
    }
}

/// Load an item from a JSON file.
pub fn load_item(path: &Path) -> Result<ContentItem> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::io_with_path(e, path))?;
    let item = serde_json::from_str(&content)?;
    Ok(item)
}

// ============================================================================
// Commands
// ============================================================================

/// Assemble the document for the item at `item_path`.
///
/// `mode` overrides the configured execution mode.
pub fn cmd_assemble(
    config_path: Option<&Path>,
    item_path: &Path,
    mode: Option<ExecutionMode>,
) -> Result<Assembly> {
    let mut config = load_config(config_path)?;
    if let Some(mode) = mode {
        config = config.execution(mode);
    }

    let writer = StoringFieldWriter::new().append_text(config.append_text_values);
    let assembler = DocumentAssembler::new(config, writer)?;
    log::debug!("Using {assembler:?}");

    let item = load_item(item_path)?;
    assembler.assemble(&item)
}

/// Render an assembly as JSON.
pub fn assembly_to_json(assembly: &Assembly) -> Result<Value> {
    let stats = &assembly.stats;
    let skipped: Vec<Value> = stats
        .skipped
        .iter()
        .map(|s| {
            json!({
                "field_id": s.field_id,
                "field_name": s.field_name,
                "reason": s.reason.to_string(),
            })
        })
        .collect();
    let errors: Vec<Value> = stats
        .errors
        .iter()
        .map(|e| {
            json!({
                "field_id": e.field_id,
                "field_name": e.field_name,
                "message": e.message,
            })
        })
        .collect();

    Ok(json!({
        "document": serde_json::to_value(&assembly.document)?,
        "stats": {
            "fields_considered": stats.fields_considered,
            "fields_added": stats.fields_added,
            "fields_empty": stats.fields_empty,
            "fields_dropped": stats.fields_dropped,
        },
        "skipped": skipped,
        "errors": errors,
    }))
}

/// Validate the configuration at `path` and describe it.
pub fn cmd_check_config(path: &Path) -> Result<String> {
    let config = AssemblerConfig::load(path)?;
    let policy = &config.policy;

    let selection = if policy.index_all_fields {
        "all fields".to_string()
    } else {
        format!("{} included field(s)", policy.included_fields.len())
    };
    let execution = match config.execution {
        ExecutionMode::Sequential => "sequential".to_string(),
        ExecutionMode::Parallel { max_workers } => format!("parallel ({max_workers} workers)"),
    };

    Ok(format!(
        "{}: OK\n  index: {}\n  selection: {}\n  excluded: {} (templates: {}, media: {})\n  \
         on field error: {}\n  execution: {}",
        path.display(),
        config.index_name,
        selection,
        policy.excluded_fields.len(),
        policy.excluded_template_fields.len(),
        policy.excluded_media_fields.len(),
        if policy.stop_on_field_error {
            "stop"
        } else {
            "record and continue"
        },
        execution,
    ))
}

// ============================================================================
// Tests
// ============================================================================
