//! Report insert and lookup queries.

use jiff::Timestamp;
use rusqlite::{params, types::Type, OptionalExtension, Row};

use crate::{
    error::{DatabaseResultExt, Result},
    models::{Report, ReportRecord, ReportStatus, StoredReport},
};

const INSERT_REPORT_SQL: &str = "INSERT INTO reports (task, status, completeness_score, total_steps, created_at, body) VALUES (?1, ?2, ?3, ?4, ?5, ?6)";
const SELECT_REPORT_SQL: &str = "SELECT id, body FROM reports WHERE id = ?1";
const LIST_REPORTS_SQL: &str = "SELECT id, task, status, completeness_score, total_steps, created_at FROM reports ORDER BY id DESC LIMIT ?1";

fn conversion_error(column: usize, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        column,
        Type::Text,
        Box::new(std::io::Error::new(std::io::ErrorKind::InvalidData, message)),
    )
}

fn record_from_row(row: &Row<'_>) -> rusqlite::Result<ReportRecord> {
    let status_str: String = row.get(2)?;
    let status = status_str
        .parse::<ReportStatus>()
        .map_err(|e| conversion_error(2, e))?;

    Ok(ReportRecord {
        id: row.get::<_, i64>(0)? as u64,
        task: row.get(1)?,
        status,
        completeness_score: row.get(3)?,
        total_steps: row.get::<_, i64>(4)? as u32,
        created_at: row.get::<_, String>(5)?.parse::<Timestamp>().map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(e))
        })?,
    })
}

impl super::Database {
    /// Stores a report and returns its history record.
    pub fn insert_report(&mut self, report: &Report) -> Result<ReportRecord> {
        let body = serde_json::to_string(report)?;
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        tx.execute(
            INSERT_REPORT_SQL,
            params![
                report.task,
                report.status.as_str(),
                report.completeness_score,
                i64::from(report.summary.total_steps),
                report.generated_at.to_string(),
                body,
            ],
        )
        .db_context("Failed to insert report")?;

        let id = tx.last_insert_rowid() as u64;
        tx.commit().db_context("Failed to commit transaction")?;

        Ok(ReportRecord {
            id,
            task: report.task.clone(),
            status: report.status,
            completeness_score: report.completeness_score,
            total_steps: report.summary.total_steps,
            created_at: report.generated_at,
        })
    }

    /// Retrieves a stored report by its ID.
    pub fn get_report(&self, id: u64) -> Result<Option<StoredReport>> {
        let body: Option<String> = self
            .connection
            .query_row(SELECT_REPORT_SQL, params![id as i64], |row| row.get(1))
            .optional()
            .db_context("Failed to query report")?;

        match body {
            Some(body) => Ok(Some(StoredReport {
                id,
                report: serde_json::from_str(&body)?,
            })),
            None => Ok(None),
        }
    }

    /// Lists the most recent reports, newest first.
    pub fn list_reports(&self, limit: u32) -> Result<Vec<ReportRecord>> {
        let mut stmt = self
            .connection
            .prepare(LIST_REPORTS_SQL)
            .db_context("Failed to prepare query")?;

        let records = stmt
            .query_map(params![i64::from(limit)], record_from_row)
            .db_context("Failed to list reports")?
            .collect::<rusqlite::Result<Vec<_>>>()
            .db_context("Failed to read report row")?;

        Ok(records)
    }
}
