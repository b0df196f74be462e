//! Assembler configuration.
//!
//! Configuration is a TOML file with the selection policy, the execution
//! mode and a few storage options:
//!
//! ```toml
//! index_name = "sitecore_web_index"
//! append_text_values = false
//!
//! [policy]
//! index_all_fields = false
//! included_fields = ["Title", "Body"]
//! excluded_fields = ["__Updated by"]
//! stop_on_field_error = false
//!
//! [execution]
//! mode = "parallel"
//! max_workers = 4
//! ```

use std::path::Path;

use fieldwork_core::{Error, Result};
use serde::{Deserialize, Serialize};

use crate::policy::FieldSelectionPolicy;

/// How fields of one item are processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ExecutionMode {
    /// One field after another, in item order.
    #[default]
    Sequential,
    /// A bounded pool of worker threads; no ordering between fields.
    Parallel {
        /// Pool size.
        #[serde(default = "default_max_workers")]
        max_workers: usize,
    },
}

fn default_max_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

/// Full assembler configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssemblerConfig {
    /// Target index name, used in diagnostics.
    #[serde(default = "default_index_name")]
    pub index_name: String,

    /// Field selection policy.
    #[serde(default)]
    pub policy: FieldSelectionPolicy,

    /// Sequential or parallel execution.
    #[serde(default)]
    pub execution: ExecutionMode,

    /// Append text values written to an existing key.
    #[serde(default)]
    pub append_text_values: bool,
}

fn default_index_name() -> String {
    "default".to_string()
}

impl Default for AssemblerConfig {
    fn default() -> Self {
        Self {
            index_name: default_index_name(),
            policy: FieldSelectionPolicy::default(),
            execution: ExecutionMode::default(),
            append_text_values: false,
        }
    }
}

impl AssemblerConfig {
    /// Configuration with the given policy and defaults elsewhere.
    pub fn with_policy(policy: FieldSelectionPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Set the execution mode.
    pub fn execution(mut self, mode: ExecutionMode) -> Self {
        self.execution = mode;
        self
    }

    /// Set the index name.
    pub fn index_name(mut self, name: impl Into<String>) -> Self {
        self.index_name = name.into();
        self
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| Error::config(format!("Invalid config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::io_with_path(e, path))?;
        Self::from_toml_str(&content).map_err(|e| match e {
            Error::Config { message } => {
                Error::config(format!("Failed to load {}: {message}", path.display()))
            }
            other => other,
        })
    }

    /// Check invariants serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if let ExecutionMode::Parallel { max_workers: 0 } = self.execution {
            return Err(Error::config("execution.max_workers must be at least 1"));
        }
        if self.index_name.trim().is_empty() {
            return Err(Error::config("index_name must not be empty"));
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AssemblerConfig::default();
        assert_eq!(config.index_name, "default");
        assert_eq!(config.execution, ExecutionMode::Sequential);
        assert!(config.policy.index_all_fields);
        assert!(!config.append_text_values);
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = AssemblerConfig::from_toml_str("").unwrap();
        assert_eq!(config, AssemblerConfig::default());
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
            index_name = "web"
            append_text_values = true

            [policy]
            index_all_fields = false
            included_fields = ["Title", "Body"]
            excluded_template_fields = ["__Standard values"]
            stop_on_field_error = true

            [execution]
            mode = "parallel"
            max_workers = 3
        "#;
        let config = AssemblerConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.index_name, "web");
        assert!(config.append_text_values);
        assert!(!config.policy.index_all_fields);
        assert_eq!(config.policy.included_fields.len(), 2);
        assert!(config.policy.has_excluded_template_fields());
        assert!(config.policy.stop_on_field_error);
        assert_eq!(config.execution, ExecutionMode::Parallel { max_workers: 3 });
    }

    #[test]
    fn test_parallel_default_workers() {
        let config = AssemblerConfig::from_toml_str("[execution]\nmode = \"parallel\"").unwrap();
        let ExecutionMode::Parallel { max_workers } = config.execution else {
            unreachable!("Expected parallel mode");
        };
        assert!(max_workers >= 1);
    }

    #[test]
    fn test_zero_workers_rejected() {
        let result =
            AssemblerConfig::from_toml_str("[execution]\nmode = \"parallel\"\nmax_workers = 0");
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[test]
    fn test_unknown_mode_rejected() {
        let result = AssemblerConfig::from_toml_str("[execution]\nmode = \"turbo\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "index_name = \"master\"").unwrap();

        let config = AssemblerConfig::load(file.path()).unwrap();
        assert_eq!(config.index_name, "master");
    }

    #[test]
    fn test_load_invalid_file_reports_once() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[execution]\nmode = \"parallel\"\nmax_workers = 0").unwrap();

        let err = AssemblerConfig::load(file.path()).unwrap_err();
        let text = err.to_string();
        assert!(matches!(err, Error::Config { .. }));
        assert!(text.starts_with("Configuration error: Failed to load "));
        assert!(text.ends_with("execution.max_workers must be at least 1"));
        assert_eq!(text.matches("Configuration error").count(), 1);
    }

    #[test]
    fn test_load_missing_file() {
        let result = AssemblerConfig::load(Path::new("/nonexistent/fieldwork.toml"));
        assert!(matches!(result, Err(Error::Io { .. })));
    }
}
