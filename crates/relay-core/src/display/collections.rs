//! Collection wrapper types.

use std::fmt;

use crate::{models::ReportRecord, tools::ToolInfo};

/// Newtype wrapper for displaying report history.
///
/// # Examples
///
/// ```rust
/// use jiff::Timestamp;
/// use relay_core::{
///     display::ReportRecords,
///     models::{ReportRecord, ReportStatus},
/// };
///
/// let records = ReportRecords(vec![ReportRecord {
///     id: 1,
///     task: "weather in Paris".to_string(),
///     status: ReportStatus::Completed,
///     completeness_score: 100.0,
///     total_steps: 1,
///     created_at: Timestamp::now(),
/// }]);
/// assert!(records.to_string().contains("weather in Paris (ID: 1)"));
/// assert_eq!(ReportRecords(vec![]).to_string(), "No reports found.\n");
/// ```
pub struct ReportRecords(pub Vec<ReportRecord>);

impl ReportRecords {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ReportRecord> {
        self.0.iter()
    }
}

impl fmt::Display for ReportRecords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No reports found.");
        }
        for record in &self.0 {
            write!(f, "{record}")?;
        }
        Ok(())
    }
}

/// Newtype wrapper for displaying registered tools.
pub struct ToolListing(pub Vec<ToolInfo>);

impl ToolListing {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for ToolListing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# Available Tools")?;
        writeln!(f)?;
        if self.0.is_empty() {
            return writeln!(f, "No tools registered.");
        }
        for tool in &self.0 {
            write!(f, "{tool}")?;
        }
        Ok(())
    }
}
