//! Data models flowing through the pipeline.
//!
//! Each request produces the following values, strictly downstream:
//!
//! ```text
//! task text ──▶ Plan (Steps) ──▶ StepResult[] ──▶ Report
//!              planner          executor          verifier
//! ```
//!
//! Display implementations for these models live in
//! [`crate::display::models`] so that data structures stay free of
//! presentation logic.

pub mod outcome;
pub mod plan;
pub mod record;
pub mod report;
pub mod status;
pub mod step_result;

pub use outcome::ToolOutcome;
pub use plan::{Parameters, Plan, PlanBuilder, Step};
pub use record::{ReportRecord, StoredReport};
pub use report::{Report, ReportSummary};
pub use status::{OutcomeSource, ReportStatus};
pub use step_result::StepResult;
