//! Final report model.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{OutcomeSource, ReportStatus, StepResult};

/// Counts over the step results of a report.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReportSummary {
    pub total_steps: u32,
    pub successful_steps: u32,
    pub failed_steps: u32,
    pub live_steps: u32,
    pub cached_steps: u32,
    pub fallback_steps: u32,
}

impl ReportSummary {
    /// Tallies the given results.
    pub fn from_results(results: &[StepResult]) -> Self {
        let mut summary = Self {
            total_steps: results.len() as u32,
            ..Self::default()
        };
        for result in results {
            if !result.is_success() {
                summary.failed_steps += 1;
                continue;
            }
            summary.successful_steps += 1;
            match result.source() {
                OutcomeSource::Live => summary.live_steps += 1,
                OutcomeSource::Cached => summary.cached_steps += 1,
                OutcomeSource::Fallback => summary.fallback_steps += 1,
            }
        }
        summary
    }
}

/// Aggregated, scored outcome of one request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Report {
    /// Task text as submitted
    pub task: String,
    pub status: ReportStatus,
    /// Percentage of successful steps, one decimal place
    pub completeness_score: f64,
    pub steps: Vec<StepResult>,
    pub issues: Vec<String>,
    pub suggestions: Vec<String>,
    pub summary: ReportSummary,
    /// Planner's explanation of the chosen steps
    #[serde(default)]
    pub reasoning: String,
    pub generated_at: Timestamp,
    /// End-to-end request time, set by the orchestrator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_time_ms: Option<u64>,
}

impl Report {
    /// Whether any successful step used synthetic fallback data.
    pub fn is_degraded(&self) -> bool {
        self.summary.fallback_steps > 0
    }
}
