//! Relay CLI Application
//!
//! Terminal, HTTP and MCP front ends for the relay task pipeline.

mod args;
mod cli;
mod mcp;
mod renderer;
mod server;

use std::sync::Arc;

use anyhow::{Context, Result};
use args::{Args, Commands};
use clap::Parser;
use cli::Cli;
use log::info;
use mcp::{run_stdio_server, RelayMcpServer};
use relay_core::{Orchestrator, RelayConfig};
use renderer::TerminalRenderer;
use Commands::*;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        database_file,
        config,
        no_color,
        json,
        command,
    } = Args::parse();

    let config = RelayConfig::load(config.as_deref()).context("Failed to load configuration")?;
    let orchestrator = Arc::new(
        Orchestrator::builder()
            .with_config(config)
            .build()
            .context("Failed to initialize orchestrator")?,
    );

    let renderer = TerminalRenderer::new(!no_color);
    let cli = Cli::new(orchestrator.clone(), renderer, database_file, json);

    info!("Relay started");

    match command {
        Run(args) => cli.run(args).await,
        Plan(args) => cli.plan(args),
        Interactive(args) => cli.interactive(args).await,
        Serve(args) => server::run_server(orchestrator, &args.host, args.port).await,
        Mcp => {
            info!("Starting Relay MCP server");
            run_stdio_server(RelayMcpServer::new(orchestrator))
                .await
                .context("MCP server failed")
        }
        History(args) => cli.history(args).await,
        Show(args) => cli.show(args).await,
        Tools => cli.tools(),
    }
}
