//! Per-step execution result.

use serde::{Deserialize, Serialize};

use super::{OutcomeSource, Step, ToolOutcome};

/// A step together with how its execution went.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StepResult {
    pub step: Step,
    pub outcome: ToolOutcome,
    /// Provider calls made for this step
    pub attempts: u32,
    /// Attempts beyond the first
    pub retry_count: u32,
    /// Wall-clock time spent on the step, excluding inter-step pacing
    pub duration_ms: u64,
}

impl StepResult {
    pub fn is_success(&self) -> bool {
        self.outcome.is_success()
    }

    pub fn source(&self) -> OutcomeSource {
        self.outcome.source()
    }

    pub fn error(&self) -> Option<&str> {
        self.outcome.error()
    }
}
