//! Command-line interface definitions using clap derive API.

use clap::{Parser, Subcommand};

/// plclink CLI
#[derive(Parser)]
#[command(name = "plclink-cli")]
#[command(about = "PLC request controller over an in-process key-value memory")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Process a single JSON request and print the response
    Exec {
        /// Request as a JSON object, e.g. '{"command":"ping"}'
        #[arg(short, long)]
        request: String,
    },
    /// Read JSON requests from stdin, one per line, printing responses
    Repl,
}
