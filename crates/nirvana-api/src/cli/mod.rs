//! CLI definitions for the `nirvana` binary.

pub mod config;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Retrieval-augmented chat backend for journaling apps.
#[derive(Parser)]
#[command(name = "nirvana", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, global = true, env = "NIRVANA_CONFIG", default_value = "nirvana.toml")]
    pub config: PathBuf,

    /// Detailed output (-v for debug, -vv for trace). `RUST_LOG` wins.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Export spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API server.
    Serve {
        /// Address to bind (overrides `server.host`).
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides `server.port`).
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Print the resolved configuration with secrets redacted.
    Config,
}
