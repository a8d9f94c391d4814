//! MCP tool handlers implementation

use std::sync::Arc;

use log::debug;
use relay_core::{display::ToolListing, params as core, Orchestrator};
use rmcp::{
    handler::server::tool::Parameters,
    model::{CallToolResult, Content},
    ErrorData,
};
use schemars::JsonSchema;
use serde::Deserialize;

use super::errors::to_mcp_error;

/// Generic MCP wrapper for core parameter types.
///
/// `#[serde(transparent)]` passes (de)serialization straight through to the
/// wrapped type, and the schema is the wrapped type's schema.
#[derive(Debug, Deserialize)]
#[serde(transparent)]
pub struct McpParams<T>(T)
where
    T: JsonSchema;

impl<T> JsonSchema for McpParams<T>
where
    T: JsonSchema,
{
    fn schema_name() -> std::borrow::Cow<'static, str> {
        T::schema_name()
    }

    fn json_schema(g: &mut schemars::SchemaGenerator) -> schemars::Schema {
        T::json_schema(g)
    }
}

impl<T> AsRef<T> for McpParams<T>
where
    T: JsonSchema,
{
    fn as_ref(&self) -> &T {
        &self.0
    }
}

pub type ProcessTask = McpParams<core::ProcessTask>;

pub type McpResult = Result<CallToolResult, ErrorData>;

/// Handler implementations for the MCP server
pub struct McpHandlers {
    orchestrator: Arc<Orchestrator>,
}

impl McpHandlers {
    pub fn new(orchestrator: Arc<Orchestrator>) -> Self {
        Self { orchestrator }
    }

    pub async fn process_task(&self, Parameters(params): Parameters<ProcessTask>) -> McpResult {
        debug!("process_task: {:?}", params);
        let params = params.as_ref();
        params
            .validate()
            .map_err(|e| to_mcp_error("Failed to process task", &e))?;

        let report = self.orchestrator.process(&params.task).await;
        Ok(CallToolResult::success(vec![Content::text(
            report.to_string(),
        )]))
    }

    pub fn plan_task(&self, Parameters(params): Parameters<ProcessTask>) -> McpResult {
        debug!("plan_task: {:?}", params);
        let params = params.as_ref();
        params
            .validate()
            .map_err(|e| to_mcp_error("Failed to plan task", &e))?;

        let plan = self.orchestrator.plan(&params.task);
        Ok(CallToolResult::success(vec![Content::text(
            plan.to_string(),
        )]))
    }

    pub fn list_tools(&self) -> McpResult {
        let listing = ToolListing(self.orchestrator.tools());
        Ok(CallToolResult::success(vec![Content::text(
            listing.to_string(),
        )]))
    }
}
