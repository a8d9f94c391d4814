//! Sequential plan execution with bounded retry.

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use log::{debug, info, warn};

use crate::{
    config::RelayConfig,
    error::{ProviderError, StepFailure},
    models::{Plan, Step, StepResult, ToolOutcome},
    tools::ToolRegistry,
};

/// Retry and pacing policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutorConfig {
    /// Provider calls per step, never below 1
    pub max_attempts: u32,
    /// The wait after attempt k is k times this
    pub retry_delay: Duration,
    /// Pause between consecutive steps
    pub pacing_delay: Duration,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self::from(&RelayConfig::default())
    }
}

impl From<&RelayConfig> for ExecutorConfig {
    fn from(config: &RelayConfig) -> Self {
        Self {
            max_attempts: config.max_retries,
            retry_delay: config.retry_delay(),
            pacing_delay: config.pacing_delay(),
        }
    }
}

impl ExecutorConfig {
    /// No retry or pacing waits.
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            retry_delay: Duration::ZERO,
            pacing_delay: Duration::ZERO,
        }
    }
}

/// Runs plan steps against the registry, one at a time.
#[derive(Debug, Clone)]
pub struct Executor {
    registry: Arc<ToolRegistry>,
    config: ExecutorConfig,
}

impl Executor {
    pub fn new(registry: Arc<ToolRegistry>, config: ExecutorConfig) -> Self {
        Self { registry, config }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    fn max_attempts(&self) -> u32 {
        self.config.max_attempts.max(1)
    }

    /// Executes every step in order and returns one result per step.
    pub async fn execute_plan(&self, plan: &Plan) -> Vec<StepResult> {
        let mut results = Vec::with_capacity(plan.len());

        for (position, step) in plan.steps().iter().enumerate() {
            if position > 0 && !self.config.pacing_delay.is_zero() {
                tokio::time::sleep(self.config.pacing_delay).await;
            }
            results.push(self.execute_step(step).await);
        }

        results
    }

    /// Executes a single step, including retries and fallback.
    pub async fn execute_step(&self, step: &Step) -> StepResult {
        let started = Instant::now();
        let index = step.index();

        let Some(tool) = self.registry.get(step.tool_name()) else {
            warn!("Step {index}: unknown tool {}", step.tool_name());
            let failure = StepFailure::UnknownTool {
                tool: step.tool_name().to_string(),
            };
            return finish(step, ToolOutcome::failure(failure.to_string()), 0, started);
        };

        if !tool.validate(step.parameters()) {
            warn!("Step {index}: invalid parameters for {}", tool.name());
            let failure = StepFailure::InvalidParameters {
                tool: tool.name().to_string(),
            };
            return finish(step, ToolOutcome::failure(failure.to_string()), 0, started);
        }

        let max_attempts = self.max_attempts();
        let mut last_error: Option<ProviderError> = None;

        for attempt in 1..=max_attempts {
            debug!("Step {index}: {} attempt {attempt}/{max_attempts}", tool.name());
            match tool.execute(step.parameters()).await {
                Ok(outcome) => return finish(step, outcome, attempt, started),
                Err(error) => {
                    warn!("Step {index}: attempt {attempt} failed: {error}");
                    last_error = Some(error);
                }
            }

            if attempt < max_attempts {
                let wait = self.config.retry_delay * attempt;
                if !wait.is_zero() {
                    debug!("Step {index}: retrying in {wait:?}");
                    tokio::time::sleep(wait).await;
                }
            }
        }

        let outcome = match tool.fallback(step.parameters()) {
            Some(outcome) => outcome,
            None => {
                let failure = StepFailure::Exhausted {
                    attempts: max_attempts,
                    source: last_error.unwrap_or_else(|| ProviderError::Transport {
                        provider: tool.name().to_string(),
                        message: "no attempt was made".to_string(),
                    }),
                };
                info!("Step {index}: {failure}");
                ToolOutcome::failure(failure.to_string())
            }
        };
        finish(step, outcome, max_attempts, started)
    }
}

fn finish(step: &Step, outcome: ToolOutcome, attempts: u32, started: Instant) -> StepResult {
    StepResult {
        step: step.clone(),
        outcome,
        attempts,
        retry_count: attempts.saturating_sub(1),
        duration_ms: started.elapsed().as_millis() as u64,
    }
}
