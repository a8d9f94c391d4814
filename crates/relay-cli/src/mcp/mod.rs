//! MCP server implementation for Relay
//!
//! Exposes the pipeline to AI assistants over the Model Context Protocol on
//! stdio. The server shares one orchestrator, and with it the result cache,
//! across every call.

use std::{future::Future, sync::Arc};

use anyhow::Result;
use log::{debug, error, info};
use relay_core::Orchestrator;
use rmcp::{
    handler::server::{router::tool::ToolRouter, tool::Parameters},
    model::{Implementation, ProtocolVersion, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router, ServerHandler,
};
use tokio::signal::unix::{signal, SignalKind};

pub mod errors;
pub mod handlers;

pub use handlers::{McpResult, ProcessTask};

/// MCP server for Relay
#[derive(Clone)]
pub struct RelayMcpServer {
    orchestrator: Arc<Orchestrator>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl RelayMcpServer {
    pub fn new(orchestrator: Arc<Orchestrator>) -> Self {
        Self {
            orchestrator,
            tool_router: Self::tool_router(),
        }
    }

    fn handlers(&self) -> handlers::McpHandlers {
        handlers::McpHandlers::new(self.orchestrator.clone())
    }

    #[tool(
        name = "process_task",
        description = "Plan, execute and verify a natural-language task such as 'weather in Tokyo' or 'find popular rust repositories'. Returns a markdown report with status, completeness score, per-step results (live, cached or fallback data), issues and suggestions."
    )]
    async fn process_task(&self, params: Parameters<ProcessTask>) -> McpResult {
        self.handlers().process_task(params).await
    }

    #[tool(
        name = "plan_task",
        description = "Show the steps Relay would run for a task without calling any provider. Useful to check which tools and parameters a task maps to."
    )]
    async fn plan_task(&self, params: Parameters<ProcessTask>) -> McpResult {
        self.handlers().plan_task(params)
    }

    #[tool(
        name = "list_tools",
        description = "List the data tools Relay can call, with their parameters."
    )]
    async fn available_tools(&self) -> McpResult {
        self.handlers().list_tools()
    }
}

#[tool_handler(router = self.tool_router)]
impl ServerHandler for RelayMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "relay".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            instructions: Some(r#"Relay answers natural-language tasks by calling external data providers.

## Tools
- `process_task`: run a task end to end and get a report
- `plan_task`: preview the plan for a task without running it
- `list_tools`: see which providers are available

## Providers
- **github_search**: repository search sorted by stars (`query`, optional `per_page`)
- **weather_lookup**: current conditions for a city (`city`)

## Reading reports
Each step is marked with its data source. `live` came from the provider, `cached` from a recent identical call, and `fallback` is built-in sample data used when the provider was unreachable. A report with fallback data is complete but degraded; check its suggestions."#.to_string()),
        }
    }
}

/// Run the MCP server with stdio transport
pub async fn run_stdio_server(server: RelayMcpServer) -> Result<()> {
    use rmcp::{transport::stdio, ServiceExt};

    info!("Starting Relay MCP server on stdio");
    debug!(
        "Server created with {} tools",
        server.tool_router.list_all().len()
    );

    let service = server.serve(stdio()).await.inspect_err(|e| {
        error!("serving error: {e:?}");
    })?;

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;

    tokio::select! {
        result = service.waiting() => {
            match result {
                Ok(_) => info!("MCP server stopped normally"),
                Err(e) => error!("MCP server error: {e:?}"),
            }
        }
        _ = sigint.recv() => {
            info!("Received SIGINT, shutting down gracefully...");
        }
        _ = sigterm.recv() => {
            info!("Received SIGTERM, shutting down gracefully...");
        }
    }

    info!("MCP server shutdown complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use relay_core::RelayConfig;

    use super::*;

    fn server() -> RelayMcpServer {
        let orchestrator = Orchestrator::builder()
            .with_config(RelayConfig::default())
            .build()
            .expect("Failed to build orchestrator");
        RelayMcpServer::new(Arc::new(orchestrator))
    }

    #[test]
    fn test_registers_three_tools() {
        let server = server();
        let mut names: Vec<String> = server
            .tool_router
            .list_all()
            .into_iter()
            .map(|tool| tool.name.to_string())
            .collect();
        names.sort();
        assert_eq!(names, vec!["list_tools", "plan_task", "process_task"]);
    }

    #[test]
    fn test_server_info() {
        let info = server().get_info();
        assert_eq!(info.server_info.name, "relay");
        assert!(info.capabilities.tools.is_some());
    }
}
