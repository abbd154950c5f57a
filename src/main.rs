//! Main entry point for the plclink CLI.

use anyhow::Result;
use clap::Parser;
use plclink::{
    cli, controller::PlcController, memory::InMemoryPlcMemory, request::PlcRequest,
    settings::Settings, telemetry,
};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::error;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = cli::Cli::parse();

    // Load settings
    let settings = Settings::load()?;

    // Initialize logging
    telemetry::init(&settings.logging)?;

    let memory = Arc::new(InMemoryPlcMemory::with_entries(settings.memory.seed));
    let controller = PlcController::with_memory(memory);

    // Execute the requested command
    match args.command {
        cli::Commands::Exec { request } => {
            let request: PlcRequest = serde_json::from_str(&request)?;
            let response = controller.process(request).await?;
            println!("{}", serde_json::to_string(&response)?);
            Ok(())
        }
        cli::Commands::Repl => repl(&controller).await,
    }
}

/// Process newline-delimited JSON requests from stdin. Failures are
/// reported on stderr and the loop continues.
async fn repl(controller: &PlcController) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let request: PlcRequest = match serde_json::from_str(line) {
            Ok(request) => request,
            Err(e) => {
                error!("Malformed request: {}", e);
                continue;
            }
        };

        match controller.process(request).await {
            Ok(response) => println!("{}", serde_json::to_string(&response)?),
            Err(e) => error!("Request failed: {}", e),
        }
    }

    Ok(())
}
