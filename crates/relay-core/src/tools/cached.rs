//! Cache decorator shared by every tool.

use std::sync::Arc;

use log::{debug, info};

use super::{ResultCache, Tool, ToolInfo};
use crate::{
    error::ProviderError,
    models::{Parameters, ToolOutcome},
};

/// Wraps a [`Tool`] with its own [`ResultCache`].
///
/// The cache lives as long as the decorator; the registry keeps one
/// decorator per tool name for the life of the process.
pub struct CachedTool {
    tool: Arc<dyn Tool>,
    cache: ResultCache,
}

impl CachedTool {
    pub fn new(tool: Arc<dyn Tool>, cache: ResultCache) -> Self {
        Self { tool, cache }
    }

    pub fn name(&self) -> &str {
        self.tool.name()
    }

    pub fn info(&self) -> ToolInfo {
        self.tool.info()
    }

    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    pub fn validate(&self, params: &Parameters) -> bool {
        self.tool.validate(params)
    }

    /// Serves a fresh cached outcome, or makes one provider call and caches
    /// its result. Provider errors are returned for the caller to retry.
    pub async fn execute(&self, params: &Parameters) -> Result<ToolOutcome, ProviderError> {
        if let Some(outcome) = self.cache.get(params) {
            debug!("Serving {} from cache", self.name());
            return Ok(outcome.into_cached());
        }

        let data = self.tool.fetch(params).await?;
        let outcome = ToolOutcome::live(data);
        self.cache.insert(params, outcome.clone());
        Ok(outcome)
    }

    /// Synthetic outcome for when the provider stays unreachable. Not cached.
    pub fn fallback(&self, params: &Parameters) -> Option<ToolOutcome> {
        let data = self.tool.fallback(params)?;
        info!("Using fallback data for {}", self.name());
        Some(ToolOutcome::fallback(data))
    }
}

impl std::fmt::Debug for CachedTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedTool")
            .field("name", &self.name())
            .field("cache", &self.cache)
            .finish()
    }
}
