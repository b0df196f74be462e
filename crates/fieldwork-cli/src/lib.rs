//! # fieldwork-cli
//!
//! Command-line tools for fieldwork:
//! - Assemble a search document from an item described in JSON
//! - Validate an assembler configuration file

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod cli;
pub mod commands;

pub use cli::{Cli, Command};
