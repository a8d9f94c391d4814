//! Display implementations for domain models.
//!
//! Output is markdown: a heading per entity, metadata as bullet lists and
//! provider data through [`Payload`].

use std::fmt;

use super::{datetime::LocalDateTime, payload::Payload};
use crate::{
    models::{
        OutcomeSource, Plan, Report, ReportRecord, ReportStatus, Step, StepResult, StoredReport,
    },
    tools::ToolInfo,
};

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for OutcomeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn fmt_parameters(step: &Step) -> String {
    step.parameters()
        .iter()
        .map(|(key, value)| match value {
            serde_json::Value::String(s) => format!("{key}={s}"),
            other => format!("{key}={other}"),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "### {}. {}", self.index(), self.description())?;
        writeln!(f)?;
        writeln!(f, "- Tool: `{}`", self.tool_name())?;
        if !self.parameters().is_empty() {
            writeln!(f, "- Parameters: {}", fmt_parameters(self))?;
        }
        writeln!(f)
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# Plan ({} steps)", self.len())?;
        writeln!(f)?;
        if !self.reasoning().is_empty() {
            writeln!(f, "{}", self.reasoning())?;
            writeln!(f)?;
        }
        for step in self.steps() {
            write!(f, "{step}")?;
        }
        Ok(())
    }
}

impl fmt::Display for StepResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let icon = if self.is_success() { "✓" } else { "✗" };
        writeln!(
            f,
            "### {}. {} ({icon} {})",
            self.step.index(),
            self.step.description(),
            self.source()
        )?;
        writeln!(f)?;
        writeln!(f, "- Tool: `{}`", self.step.tool_name())?;
        writeln!(
            f,
            "- Attempts: {} ({} retries), {} ms",
            self.attempts, self.retry_count, self.duration_ms
        )?;
        if let Some(note) = self.outcome.note() {
            writeln!(f, "- Note: {note}")?;
        }
        if let Some(error) = self.error() {
            writeln!(f, "- Error: {error}")?;
        }
        writeln!(f)?;

        if let Some(data) = self.outcome.data() {
            write!(f, "{}", Payload(data))?;
            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# {}", self.task)?;
        writeln!(f)?;
        writeln!(f, "- Status: {}", self.status.with_icon())?;
        writeln!(f, "- Completeness: {:.1}%", self.completeness_score)?;
        writeln!(
            f,
            "- Steps: {} total, {} succeeded, {} failed",
            self.summary.total_steps, self.summary.successful_steps, self.summary.failed_steps
        )?;
        writeln!(
            f,
            "- Sources: {} live, {} cached, {} fallback",
            self.summary.live_steps, self.summary.cached_steps, self.summary.fallback_steps
        )?;
        if let Some(ms) = self.execution_time_ms {
            writeln!(f, "- Execution time: {ms} ms")?;
        }
        writeln!(f, "- Generated: {}", LocalDateTime(&self.generated_at))?;

        if !self.reasoning.is_empty() {
            writeln!(f)?;
            writeln!(f, "{}", self.reasoning)?;
        }

        if !self.steps.is_empty() {
            writeln!(f, "\n## Results")?;
            writeln!(f)?;
            for result in &self.steps {
                write!(f, "{result}")?;
            }
        }

        if !self.issues.is_empty() {
            writeln!(f, "## Issues")?;
            writeln!(f)?;
            for issue in &self.issues {
                writeln!(f, "- {issue}")?;
            }
            writeln!(f)?;
        }

        writeln!(f, "## Suggestions")?;
        writeln!(f)?;
        for suggestion in &self.suggestions {
            writeln!(f, "- {suggestion}")?;
        }
        Ok(())
    }
}

impl fmt::Display for ReportRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## {} (ID: {})", self.task, self.id)?;
        writeln!(f)?;
        writeln!(
            f,
            "- **Status**: {} ({:.1}%, {} steps)",
            self.status.with_icon(),
            self.completeness_score,
            self.total_steps
        )?;
        writeln!(f, "- **Created**: {}", LocalDateTime(&self.created_at))?;
        writeln!(f)
    }
}

impl fmt::Display for StoredReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Report ID: {}", self.id)?;
        writeln!(f)?;
        write!(f, "{}", self.report)
    }
}

impl fmt::Display for ToolInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## {}", self.name)?;
        writeln!(f)?;
        writeln!(f, "{}", self.description)?;
        writeln!(f)?;
        for param in &self.parameters {
            let required = if param.required { "required" } else { "optional" };
            writeln!(f, "- `{}` ({required}): {}", param.name, param.description)?;
        }
        writeln!(f)
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use serde_json::json;

    use super::*;
    use crate::{
        models::{ReportSummary, ToolOutcome},
        verifier::Verifier,
    };

    fn plan() -> Plan {
        Plan::builder()
            .step(
                "Get current weather in Tokyo",
                "weather_lookup",
                json!({"city": "Tokyo"}).as_object().cloned().unwrap_or_default(),
            )
            .reason("User wants weather information for Tokyo.")
            .build()
    }

    #[test]
    fn test_plan_display() {
        let out = plan().to_string();
        assert!(out.starts_with("# Plan (1 steps)"));
        assert!(out.contains("### 1. Get current weather in Tokyo"));
        assert!(out.contains("- Tool: `weather_lookup`"));
        assert!(out.contains("- Parameters: city=Tokyo"));
    }

    #[test]
    fn test_report_display() {
        let plan = plan();
        let step = plan.steps()[0].clone();
        let result = StepResult {
            step,
            outcome: ToolOutcome::fallback(json!({"city": "Tokyo", "temperature": 25.5})),
            attempts: 3,
            retry_count: 2,
            duration_ms: 12,
        };
        let mut report = Verifier::new().verify("weather in Tokyo", &plan, vec![result]);
        report.execution_time_ms = Some(40);

        let out = report.to_string();
        assert!(out.starts_with("# weather in Tokyo"));
        assert!(out.contains("- Status: ✓ Completed"));
        assert!(out.contains("- Completeness: 100.0%"));
        assert!(out.contains("- Sources: 0 live, 0 cached, 1 fallback"));
        assert!(out.contains("### 1. Get current weather in Tokyo (✓ fallback)"));
        assert!(out.contains("- Attempts: 3 (2 retries), 12 ms"));
        assert!(out.contains("- Note: Using fallback data (API unavailable)"));
        assert!(out.contains("- Execution time: 40 ms"));
        assert!(!out.contains("## Issues"));
    }

    #[test]
    fn test_failed_report_lists_issues() {
        let report = Report {
            task: "check stocks".to_string(),
            status: ReportStatus::Failed,
            completeness_score: 0.0,
            steps: Vec::new(),
            issues: vec!["All execution steps failed".to_string()],
            suggestions: vec!["Retry later".to_string()],
            summary: ReportSummary::default(),
            reasoning: String::new(),
            generated_at: Timestamp::now(),
            execution_time_ms: None,
        };
        let out = report.to_string();
        assert!(out.contains("- Status: ✗ Failed"));
        assert!(out.contains("## Issues\n\n- All execution steps failed"));
        assert!(out.contains("## Suggestions\n\n- Retry later"));
    }
}
