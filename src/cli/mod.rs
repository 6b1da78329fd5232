pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "tenant-guard")]
#[command(about = "Evaluate tenant isolation rules against JSON or YAML documents")]
#[command(version)]
pub struct Cli {
    #[arg(
        long,
        global = true,
        conflicts_with = "json",
        help = "Output in human-readable text format"
    )]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Check whether a principal may access a resource")]
    Check {
        #[arg(long, help = "Principal document (inline JSON or @file)")]
        principal: String,

        #[arg(long, help = "Resource document (inline JSON or @file)")]
        resource: String,

        #[arg(long, help = "Message reported on a tenant mismatch")]
        message: Option<String>,
    },

    #[command(about = "Stamp a write payload with the tenant it should be persisted under")]
    Scope {
        #[arg(long, help = "Payload document (inline JSON or @file)")]
        payload: String,

        #[arg(long, help = "Principal document (inline JSON or @file)")]
        principal: Option<String>,
    },

    #[command(about = "Keep the rows automation acting as a principal may run on")]
    Filter {
        #[arg(long, help = "Principal document (inline JSON or @file)")]
        principal: String,

        #[arg(long, help = "Array of rows (inline JSON or @file)")]
        rows: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

/// Run a command. `Ok(false)` means the guard denied access.
pub fn run(cli: Cli) -> anyhow::Result<bool> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Check { principal, resource, message } => {
            commands::check::handle(&principal, &resource, message.as_deref(), &output_format)
        }
        Commands::Scope { payload, principal } => {
            commands::scope::handle(&payload, principal.as_deref(), &output_format).map(|_| true)
        }
        Commands::Filter { principal, rows } => {
            commands::filter::handle(&principal, &rows, &output_format).map(|_| true)
        }
    }
}
