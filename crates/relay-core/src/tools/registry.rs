//! Registry of named tools.

use std::{collections::BTreeMap, sync::Arc};

use super::{CachedTool, Clock, GithubSearch, ResultCache, Tool, ToolInfo, WeatherLookup};
use crate::config::RelayConfig;

/// Tools available to the executor, keyed by name.
#[derive(Debug, Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, Arc<CachedTool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the built-in providers, each with its own cache.
    pub fn with_defaults(
        config: &RelayConfig,
        client: &reqwest::Client,
        clock: &Arc<dyn Clock>,
    ) -> Self {
        let mut registry = Self::new();
        let cache = || ResultCache::new(config.cache_ttl(), config.cache_capacity, clock.clone());

        registry.register(
            Arc::new(GithubSearch::new(client.clone(), &config.github_api_base)),
            cache(),
        );
        registry.register(
            Arc::new(WeatherLookup::from_config(client.clone(), config)),
            cache(),
        );
        registry
    }

    /// Adds a tool, replacing any tool registered under the same name.
    pub fn register(&mut self, tool: Arc<dyn Tool>, cache: ResultCache) {
        let name = tool.name().to_string();
        self.tools.insert(name, Arc::new(CachedTool::new(tool, cache)));
    }

    pub fn get(&self, name: &str) -> Option<Arc<CachedTool>> {
        self.tools.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Tool descriptions in name order.
    pub fn list(&self) -> Vec<ToolInfo> {
        self.tools.values().map(|tool| tool.info()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
