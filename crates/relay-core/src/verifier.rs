//! Scoring and report assembly.

use std::collections::BTreeMap;

use jiff::Timestamp;
use log::info;

use crate::{
    models::{Plan, Report, ReportStatus, ReportSummary, StepResult},
    tools::{GITHUB_SEARCH, WEATHER_LOOKUP},
};

/// Leading issue when no step succeeded.
pub const ALL_FAILED: &str = "All execution steps failed";

/// Suggestions when no step succeeded.
pub const REMEDIATION: [&str; 3] = [
    "Check provider availability",
    "Verify parameters",
    "Retry later",
];

/// Suggestion when every step returned authoritative data.
pub const ALL_SATISFIED: &str = "All requirements satisfied";

/// Suggestion when some data is synthetic.
pub const FALLBACK_NOTICE: &str =
    "Some results use fallback data and are not authoritative; retry later for live data";

/// Aggregates step results into a [`Report`].
#[derive(Debug, Clone)]
pub struct Verifier {
    hints: BTreeMap<String, String>,
}

impl Verifier {
    pub fn new() -> Self {
        let mut verifier = Self {
            hints: BTreeMap::new(),
        };
        verifier.set_hint(
            GITHUB_SEARCH,
            "Check the search query or the GitHub API rate limit",
        );
        verifier.set_hint(
            WEATHER_LOOKUP,
            "Verify the city name or try the weather lookup again later",
        );
        verifier
    }

    /// Registers the suggestion shown when `tool` fails.
    pub fn set_hint(&mut self, tool: impl Into<String>, hint: impl Into<String>) {
        self.hints.insert(tool.into(), hint.into());
    }

    fn hint_for(&self, tool: &str) -> String {
        self.hints
            .get(tool)
            .cloned()
            .unwrap_or_else(|| format!("Check that '{tool}' is available and its parameters are valid"))
    }

    /// Builds the report for `task`. Never fails.
    pub fn verify(&self, task: &str, plan: &Plan, steps: Vec<StepResult>) -> Report {
        let summary = ReportSummary::from_results(&steps);
        let completeness_score = completeness(summary.successful_steps, summary.total_steps);
        let status = if summary.total_steps > 0 && summary.failed_steps == 0 {
            ReportStatus::Completed
        } else if summary.successful_steps > 0 {
            ReportStatus::Partial
        } else {
            ReportStatus::Failed
        };

        let step_issues = steps.iter().filter(|r| !r.is_success()).map(|r| {
            format!(
                "Step {} ({}): {}",
                r.step.index(),
                r.step.tool_name(),
                r.error().unwrap_or("unknown error")
            )
        });

        let (issues, suggestions) = if status == ReportStatus::Failed {
            let issues = std::iter::once(ALL_FAILED.to_string())
                .chain(step_issues)
                .collect();
            let suggestions = REMEDIATION.iter().map(|s| s.to_string()).collect();
            (issues, suggestions)
        } else {
            (step_issues.collect(), self.suggestions(&steps, &summary))
        };

        info!(
            "Report: {} of {} steps succeeded ({completeness_score}%), status {}",
            summary.successful_steps,
            summary.total_steps,
            status.as_str()
        );

        Report {
            task: task.to_string(),
            status,
            completeness_score,
            steps,
            issues,
            suggestions,
            summary,
            reasoning: plan.reasoning().to_string(),
            generated_at: Timestamp::now(),
            execution_time_ms: None,
        }
    }

    fn suggestions(&self, steps: &[StepResult], summary: &ReportSummary) -> Vec<String> {
        let mut suggestions: Vec<String> = Vec::new();
        for result in steps.iter().filter(|r| !r.is_success()) {
            let hint = self.hint_for(result.step.tool_name());
            if !suggestions.contains(&hint) {
                suggestions.push(hint);
            }
        }
        if summary.fallback_steps > 0 {
            suggestions.push(FALLBACK_NOTICE.to_string());
        }
        if suggestions.is_empty() {
            suggestions.push(ALL_SATISFIED.to_string());
        }
        suggestions
    }
}

impl Default for Verifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Percentage of successful steps, rounded to one decimal place.
///
/// ```rust
/// use relay_core::verifier::completeness;
///
/// assert_eq!(completeness(2, 3), 66.7);
/// assert_eq!(completeness(0, 0), 0.0);
/// ```
pub fn completeness(successes: u32, total: u32) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let raw = 100.0 * f64::from(successes) / f64::from(total);
    (raw * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::models::{Parameters, ToolOutcome};

    fn results(outcomes: Vec<(&str, ToolOutcome)>) -> (Plan, Vec<StepResult>) {
        let plan = outcomes
            .iter()
            .fold(Plan::builder(), |b, (tool, _)| {
                b.step(format!("run {tool}"), *tool, Parameters::new())
            })
            .reason("test plan")
            .build();
        let steps = plan
            .steps()
            .iter()
            .zip(outcomes)
            .map(|(step, (_, outcome))| StepResult {
                step: step.clone(),
                outcome,
                attempts: 1,
                retry_count: 0,
                duration_ms: 0,
            })
            .collect();
        (plan, steps)
    }

    #[test]
    fn test_all_live_is_completed() {
        let (plan, steps) = results(vec![
            (GITHUB_SEARCH, ToolOutcome::live(json!({}))),
            (WEATHER_LOOKUP, ToolOutcome::live(json!({}))),
        ]);
        let report = Verifier::new().verify("task", &plan, steps);

        assert_eq!(report.status, ReportStatus::Completed);
        assert_eq!(report.completeness_score, 100.0);
        assert!(report.issues.is_empty());
        assert_eq!(report.suggestions, vec![ALL_SATISFIED]);
        assert_eq!(report.reasoning, "test plan");
        assert!(report.execution_time_ms.is_none());
    }

    #[test]
    fn test_fallback_counts_as_success_with_notice() {
        let (plan, steps) = results(vec![(GITHUB_SEARCH, ToolOutcome::fallback(json!({})))]);
        let report = Verifier::new().verify("task", &plan, steps);

        assert_eq!(report.status, ReportStatus::Completed);
        assert_eq!(report.completeness_score, 100.0);
        assert_eq!(report.summary.fallback_steps, 1);
        assert_eq!(report.suggestions, vec![FALLBACK_NOTICE]);
        assert!(report.is_degraded());
    }

    #[test]
    fn test_partial_lists_issue_and_tool_hint() {
        let (plan, steps) = results(vec![
            (GITHUB_SEARCH, ToolOutcome::live(json!({}))),
            ("stock_ticker", ToolOutcome::failure("unknown tool")),
            ("stock_ticker", ToolOutcome::failure("unknown tool")),
        ]);
        let report = Verifier::new().verify("task", &plan, steps);

        assert_eq!(report.status, ReportStatus::Partial);
        assert_eq!(report.completeness_score, 33.3);
        assert_eq!(
            report.issues,
            vec![
                "Step 2 (stock_ticker): unknown tool",
                "Step 3 (stock_ticker): unknown tool",
            ]
        );
        assert_eq!(report.suggestions.len(), 1);
        assert!(report.suggestions[0].contains("stock_ticker"));
    }

    #[test]
    fn test_all_failed_uses_fixed_remediation() {
        let (plan, steps) = results(vec![(
            WEATHER_LOOKUP,
            ToolOutcome::failure("invalid parameters"),
        )]);
        let report = Verifier::new().verify("task", &plan, steps);

        assert_eq!(report.status, ReportStatus::Failed);
        assert_eq!(report.completeness_score, 0.0);
        assert_eq!(
            report.issues,
            vec![ALL_FAILED, "Step 1 (weather_lookup): invalid parameters"]
        );
        assert_eq!(report.suggestions, REMEDIATION.to_vec());
    }

    #[test]
    fn test_empty_plan_is_failed() {
        let report = Verifier::new().verify("", &Plan::default(), Vec::new());
        assert_eq!(report.status, ReportStatus::Failed);
        assert_eq!(report.completeness_score, 0.0);
        assert_eq!(report.summary.total_steps, 0);
    }

    #[test]
    fn test_custom_hint() {
        let mut verifier = Verifier::new();
        verifier.set_hint("stock_ticker", "Register a stock provider");
        let (plan, steps) = results(vec![
            (GITHUB_SEARCH, ToolOutcome::live(json!({}))),
            ("stock_ticker", ToolOutcome::failure("unknown tool")),
        ]);
        let report = verifier.verify("task", &plan, steps);
        assert_eq!(report.suggestions, vec!["Register a stock provider"]);
    }

    #[test]
    fn test_score_is_monotonic_in_successes() {
        for total in 1..=12 {
            let scores: Vec<f64> = (0..=total).map(|s| completeness(s, total)).collect();
            assert!(scores.windows(2).all(|w| w[0] < w[1]));
            assert_eq!(scores[0], 0.0);
            assert_eq!(scores[total as usize], 100.0);
        }
    }
}
