//! Status enumerations for outcomes and reports.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Where a tool outcome's data came from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeSource {
    /// Fetched from the provider during this request
    Live,
    /// Served from the tool's result cache
    Cached,
    /// Synthetic data produced after the provider kept failing
    Fallback,
}

impl OutcomeSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutcomeSource::Live => "live",
            OutcomeSource::Cached => "cached",
            OutcomeSource::Fallback => "fallback",
        }
    }

    /// Whether the data came from the real provider.
    pub fn is_authoritative(&self) -> bool {
        !matches!(self, OutcomeSource::Fallback)
    }
}

/// Overall result of a request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    /// Every step succeeded
    Completed,
    /// Some, but not all, steps succeeded
    Partial,
    /// No step succeeded
    Failed,
}

impl FromStr for ReportStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "completed" => Ok(ReportStatus::Completed),
            "partial" => Ok(ReportStatus::Partial),
            "failed" => Ok(ReportStatus::Failed),
            _ => Err(format!("Invalid report status: {s}")),
        }
    }
}

impl ReportStatus {
    /// Convert to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Completed => "completed",
            ReportStatus::Partial => "partial",
            ReportStatus::Failed => "failed",
        }
    }

    /// Status with an icon for display.
    ///
    /// ```rust
    /// use relay_core::models::ReportStatus;
    ///
    /// assert_eq!(ReportStatus::Completed.with_icon(), "✓ Completed");
    /// assert_eq!(ReportStatus::Partial.with_icon(), "◐ Partial");
    /// assert_eq!(ReportStatus::Failed.with_icon(), "✗ Failed");
    /// ```
    pub fn with_icon(&self) -> &'static str {
        match self {
            ReportStatus::Completed => "✓ Completed",
            ReportStatus::Partial => "◐ Partial",
            ReportStatus::Failed => "✗ Failed",
        }
    }
}
