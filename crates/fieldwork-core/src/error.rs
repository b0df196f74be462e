//! Error types for Fieldwork.
//!
//! Field-level failures are first-class values: a [`FieldAddError`] describes
//! one field that could not be added to a document, and an
//! [`AggregateFieldError`] reports every such failure of one assembly in a
//! single pass.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::ids::{FieldId, ItemId};

/// Result type alias for Fieldwork operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Boxed source error carried by field failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

// ============================================================================
// FieldAddError
// ============================================================================

/// A single field could not be added to the document.
///
/// Raised by the add-field step (reader, translator or storage). Whether it
/// aborts the assembly depends on the policy's `stop_on_field_error`.
#[derive(Debug, thiserror::Error)]
#[error("Could not add field {field_id} : {field_name} for indexable {item_id}: {message}")]
pub struct FieldAddError {
    /// Item the field belongs to.
    pub item_id: ItemId,
    /// Id of the failing field.
    pub field_id: FieldId,
    /// Name of the failing field (may be empty).
    pub field_name: String,
    /// What went wrong.
    pub message: String,
    /// Underlying cause, if any.
    #[source]
    pub source: Option<BoxError>,
}

impl FieldAddError {
    /// Creates a field error without an underlying cause.
    pub fn new(
        item_id: ItemId,
        field_id: FieldId,
        field_name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            item_id,
            field_id,
            field_name: field_name.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Attaches an underlying cause.
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }
}

// ============================================================================
// AggregateFieldError
// ============================================================================

/// Every field failure of one assembly, reported together.
#[derive(Debug, Default)]
pub struct AggregateFieldError {
    errors: Vec<FieldAddError>,
}

impl AggregateFieldError {
    /// Wraps a list of field errors.
    pub fn new(errors: Vec<FieldAddError>) -> Self {
        Self { errors }
    }

    /// The individual failures.
    pub fn errors(&self) -> &[FieldAddError] {
        &self.errors
    }

    /// Number of failed fields.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Returns `true` if no field failed.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl fmt::Display for AggregateFieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} field(s) failed", self.errors.len())?;
        for (i, err) in self.errors.iter().enumerate() {
            let sep = if i == 0 { ": " } else { "; " };
            write!(f, "{sep}{err}")?;
        }
        Ok(())
    }
}

impl std::error::Error for AggregateFieldError {}

impl IntoIterator for AggregateFieldError {
    type Item = FieldAddError;
    type IntoIter = std::vec::IntoIter<FieldAddError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

// ============================================================================
// Error
// ============================================================================

/// Errors that can occur in Fieldwork.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A field failed and the policy requested fail-fast.
    #[error("Field error: {0}")]
    FieldAdd(#[from] FieldAddError),

    /// One or more fields failed; all failures are reported.
    #[error("Field errors: {0}")]
    Aggregate(#[from] AggregateFieldError),

    /// Assembly was cancelled before all fields were dispatched.
    #[error("Assembly cancelled after {processed} field(s)")]
    Cancelled {
        /// Fields processed before cancellation was observed.
        processed: usize,
    },

    /// Configuration error.
    #[error("Configuration error: {message}")]
    Config {
        /// What configuration is problematic
        message: String,
    },

    /// I/O error tied to a path.
    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        /// Path being accessed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Creates a new configuration error.
    pub fn config<S: Into<String>>(message: S) -> Self {
        Error::Config {
            message: message.into(),
        }
    }

    /// Creates an I/O error carrying the path that was accessed.
    pub fn io_with_path(source: std::io::Error, path: impl AsRef<Path>) -> Self {
        Error::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Returns the field failures this error carries, if any.
    pub fn field_errors(&self) -> &[FieldAddError] {
        match self {
            Error::FieldAdd(err) => std::slice::from_ref(err),
            Error::Aggregate(agg) => agg.errors(),
            _ => &[],
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
