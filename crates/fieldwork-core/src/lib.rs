//! Fieldwork Core: shared identifiers and errors.
//!
//! This crate provides the foundational types used across all Fieldwork crates.
//! It has no internal Fieldwork dependencies (dependency level 0).
//!
//! # Modules
//!
//! - [`error`]: Error types, field-level failures and the Result alias
//! - [`ids`]: Item and field identifiers

pub mod error;
pub mod ids;

// Re-export key types at crate root for convenience
pub use error::{AggregateFieldError, Error, FieldAddError, Result};
pub use ids::{FieldId, ItemId};
