//! Parameter structures shared by every front end.
//!
//! The CLI, HTTP and MCP layers each add their own derives on wrapper types
//! and convert into these with `From`/`.into()`:
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │   CLI Args      │    │ HTTP / MCP body │    │  Core Params    │
//! │  (clap derives) │───▶│ (serde derives) │───▶│ (minimal deps)  │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! JSON schema derives are only compiled with the `schema` feature.

#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{RelayError, Result};

/// Parameters for processing or planning a task.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct ProcessTask {
    /// Natural-language description of what to do
    pub task: String,
    /// Optional caller identifier, used for logging only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl ProcessTask {
    pub fn new(task: impl Into<String>) -> Self {
        Self {
            task: task.into(),
            user_id: None,
        }
    }

    /// Rejects blank task text.
    pub fn validate(&self) -> Result<()> {
        if self.task.trim().is_empty() {
            return Err(RelayError::invalid_input("task").with_reason("cannot be empty"));
        }
        Ok(())
    }
}

/// Parameters for listing stored reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct ListReports {
    /// Maximum number of reports, newest first
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_limit() -> u32 {
    20
}

impl Default for ListReports {
    fn default() -> Self {
        Self {
            limit: default_limit(),
        }
    }
}

/// Generic parameters for operations requiring just an ID.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct Id {
    /// The ID of the stored report
    pub id: u64,
}
