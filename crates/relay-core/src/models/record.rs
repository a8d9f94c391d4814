//! Persisted report types.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{Report, ReportStatus};

/// One row of the report history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportRecord {
    pub id: u64,
    pub task: String,
    pub status: ReportStatus,
    pub completeness_score: f64,
    pub total_steps: u32,
    pub created_at: Timestamp,
}

/// A full report together with its storage ID.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredReport {
    pub id: u64,
    pub report: Report,
}
