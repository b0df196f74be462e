//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use fieldwork_assembly::ExecutionMode;

/// Fieldwork - search document field assembly
#[derive(Parser, Debug)]
#[command(name = "fieldwork")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Assemble the document for one item and print it as JSON
    Assemble {
        /// Assembler configuration file (TOML); defaults apply when omitted
        #[arg(short, long, env = "FIELDWORK_CONFIG")]
        config: Option<PathBuf>,

        /// Item description (JSON)
        #[arg(short, long)]
        item: PathBuf,

        /// Process fields on a pool of N workers
        #[arg(long, value_name = "N", conflicts_with = "sequential")]
        parallel: Option<usize>,

        /// Process fields one after another
        #[arg(long)]
        sequential: bool,

        /// Exit with an error when any field failed
        #[arg(long)]
        strict: bool,
    },

    /// Validate a configuration file and print the resolved settings
    CheckConfig {
        /// Assembler configuration file (TOML)
        #[arg(short, long)]
        config: PathBuf,
    },
}

/// Execution mode requested on the command line, if any.
pub fn mode_override(parallel: Option<usize>, sequential: bool) -> Option<ExecutionMode> {
    match (parallel, sequential) {
        (Some(max_workers), _) => Some(ExecutionMode::Parallel { max_workers }),
        (None, true) => Some(ExecutionMode::Sequential),
        (None, false) => None,
    }
}

// ============================================================================
// Tests
// ============================================================================
