//! Offline filter compilation.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use serde_json::json;

use crate::output;
use msgcenter_core::config::LoggingConfig;
use msgcenter_core::error::AppError;
use msgcenter_filter::{SubscribeRequest, compile};

/// Arguments for the filter command
#[derive(Debug, Args)]
pub struct FilterArgs {
    /// Filter subcommand
    #[command(subcommand)]
    pub command: FilterCommand,
}

/// Filter subcommands
#[derive(Debug, Subcommand)]
pub enum FilterCommand {
    /// Compile a subscription request into its canonical filter document
    Compile {
        /// Request as inline JSON
        #[arg(long, conflicts_with = "file")]
        json: Option<String>,
        /// Request JSON file (`-` for stdin)
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

/// Execute filter commands. Needs no configuration or database.
pub fn execute(args: &FilterArgs) -> Result<(), AppError> {
    crate::init_logging(&LoggingConfig::default());

    match &args.command {
        FilterCommand::Compile { json, file } => {
            let raw = super::read_json_input(json.as_deref(), file.as_ref())?;
            let request: SubscribeRequest = serde_json::from_str(&raw)?;
            let compiled = compile(&request)?;

            output::print_json(&json!({
                "source": compiled.kind.source().as_str(),
                "eventType": compiled.kind.event_type(),
                "specVersion": compiled.spec_version,
                "modeFilter": compiled.filter.to_document()?,
            }));
        }
    }

    Ok(())
}
