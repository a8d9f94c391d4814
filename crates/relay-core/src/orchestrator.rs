//! One request/response cycle: plan, execute, verify.

use std::{sync::Arc, time::Instant};

use log::{debug, info};

use crate::{
    config::RelayConfig,
    error::{RelayError, Result},
    executor::{Executor, ExecutorConfig},
    models::{Plan, Report},
    planner::Planner,
    tools::{Clock, SystemClock, ToolInfo, ToolRegistry},
    verifier::Verifier,
};

/// Composes [`Planner`], [`Executor`] and [`Verifier`].
///
/// Tool caches live inside the registry held here, so one orchestrator
/// should be shared (behind an `Arc`) by every front end in a process.
#[derive(Debug)]
pub struct Orchestrator {
    planner: Planner,
    executor: Executor,
    verifier: Verifier,
}

impl Orchestrator {
    pub fn builder() -> OrchestratorBuilder {
        OrchestratorBuilder::new()
    }

    /// Plans `task` without executing anything.
    pub fn plan(&self, task: &str) -> Plan {
        self.planner.create_plan(task)
    }

    /// Runs the full pipeline. A report is always produced; failures are
    /// expressed through its status and issues.
    pub async fn process(&self, task: &str) -> Report {
        let started = Instant::now();
        info!("Processing task: {task}");

        let plan = self.planner.create_plan(task);
        let results = self.executor.execute_plan(&plan).await;
        let mut report = self.verifier.verify(task, &plan, results);

        let elapsed = started.elapsed().as_millis() as u64;
        report.execution_time_ms = Some(elapsed);
        debug!("Task finished in {elapsed} ms");
        report
    }

    /// Registered tools with their parameter contracts.
    pub fn tools(&self) -> Vec<ToolInfo> {
        self.executor.registry().list()
    }
}

/// Builder for [`Orchestrator`].
#[derive(Default)]
pub struct OrchestratorBuilder {
    config: Option<RelayConfig>,
    registry: Option<ToolRegistry>,
    clock: Option<Arc<dyn Clock>>,
    planner: Option<Planner>,
    verifier: Option<Verifier>,
}

impl OrchestratorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: RelayConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Uses the given tools instead of the built-in providers.
    pub fn with_registry(mut self, registry: ToolRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Clock for the built-in tools' caches.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn with_planner(mut self, planner: Planner) -> Self {
        self.planner = Some(planner);
        self
    }

    pub fn with_verifier(mut self, verifier: Verifier) -> Self {
        self.verifier = Some(verifier);
        self
    }

    /// Builds the orchestrator.
    ///
    /// # Errors
    ///
    /// Returns `RelayError::InvalidInput` if the configuration is out of
    /// range, and `RelayError::Configuration` if the HTTP client cannot be
    /// created.
    pub fn build(self) -> Result<Orchestrator> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        let registry = match self.registry {
            Some(registry) => registry,
            None => {
                let client = reqwest::Client::builder()
                    .user_agent(config.user_agent.clone())
                    .timeout(config.request_timeout())
                    .build()
                    .map_err(|e| {
                        RelayError::configuration(format!("Failed to create HTTP client: {e}"))
                    })?;
                let clock = self
                    .clock
                    .unwrap_or_else(|| Arc::new(SystemClock) as Arc<dyn Clock>);
                ToolRegistry::with_defaults(&config, &client, &clock)
            }
        };

        debug!("Orchestrator built with {} tool(s)", registry.len());
        Ok(Orchestrator {
            planner: self.planner.unwrap_or_default(),
            executor: Executor::new(Arc::new(registry), ExecutorConfig::from(&config)),
            verifier: self.verifier.unwrap_or_default(),
        })
    }
}
