//! Fieldwork CLI
//!
//! Command-line interface for search document field assembly.

#![warn(clippy::all)]
#![forbid(unsafe_code)]

use anyhow::{Result, bail};
use clap::Parser;
use fieldwork_cli::cli::mode_override;
use fieldwork_cli::commands::{assembly_to_json, cmd_assemble, cmd_check_config};
use fieldwork_cli::{Cli, Command};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Assemble {
            config,
            item,
            parallel,
            sequential,
            strict,
        } => {
            let mode = mode_override(parallel, sequential);
            let assembly = cmd_assemble(config.as_deref(), &item, mode)?;
            println!("{}", serde_json::to_string_pretty(&assembly_to_json(&assembly)?)?);

            if strict && assembly.has_errors() {
                bail!("{}", fieldwork_core::AggregateFieldError::new(assembly.stats.errors));
            }
        }
        Command::CheckConfig { config } => {
            println!("{}", cmd_check_config(&config)?);
        }
    }

    Ok(())
}
