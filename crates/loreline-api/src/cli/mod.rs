//! CLI command definitions for the `loreline` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod key;
pub mod status;

use clap::{Parser, Subcommand};

/// Multi-tenant campaign storytelling service.
#[derive(Parser)]
#[command(name = "loreline", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export spans to stdout through OpenTelemetry.
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the REST API server.
    Serve {
        /// Host to bind to (defaults to `server.host` in config.toml).
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (defaults to `server.port` in config.toml).
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Manage API credentials.
    Key {
        #[command(subcommand)]
        action: KeyCommand,
    },

    /// Show storage counts and configuration.
    Status,
}

#[derive(Subcommand)]
pub enum KeyCommand {
    /// Issue a new credential. The key is printed once.
    Create {
        /// Label for the credential.
        #[arg(long, default_value = "default")]
        name: String,
    },

    /// List issued credentials.
    #[command(alias = "ls")]
    List,
}
