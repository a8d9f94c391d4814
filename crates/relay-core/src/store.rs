//! Async access to the report audit store.

use std::path::{Path, PathBuf};

use log::debug;
use tokio::task;

use crate::{
    db::Database,
    error::{RelayError, Result},
    models::{Report, ReportRecord, StoredReport},
    params::{Id, ListReports},
};

/// Handle to the SQLite report store.
///
/// Each operation opens its own connection on the blocking thread pool, so
/// the handle is cheap to clone and share.
#[derive(Debug, Clone)]
pub struct ReportStore {
    db_path: PathBuf,
}

impl ReportStore {
    /// Opens the store, creating the database file and schema if needed.
    ///
    /// Without a path the database lives at `$XDG_DATA_HOME/relay/relay.db`
    /// (usually `~/.local/share/relay/relay.db`).
    ///
    /// # Errors
    ///
    /// Returns `RelayError::XdgDirectory` if the default location cannot be
    /// determined, `RelayError::FileSystem` if the parent directory cannot be
    /// created, and `RelayError::Database` if initialization fails.
    pub async fn open<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        let db_path = match path {
            Some(path) => path.as_ref().to_path_buf(),
            None => Self::default_database_path()?,
        };

        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| RelayError::FileSystem {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        let init_path = db_path.clone();
        task::spawn_blocking(move || {
            let _db = Database::new(&init_path)?;
            Ok::<(), RelayError>(())
        })
        .await
        .map_err(join_error)??;

        debug!("Report store at {}", db_path.display());
        Ok(Self { db_path })
    }

    fn default_database_path() -> Result<PathBuf> {
        xdg::BaseDirectories::with_prefix("relay")
            .place_data_file("relay.db")
            .map_err(|e| RelayError::XdgDirectory(e.to_string()))
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }

    /// Persists a report and returns its history record.
    pub async fn save(&self, report: &Report) -> Result<ReportRecord> {
        let db_path = self.db_path.clone();
        let report = report.clone();

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.insert_report(&report)
        })
        .await
        .map_err(join_error)?
    }

    /// Retrieves a stored report.
    ///
    /// # Errors
    ///
    /// Returns `RelayError::ReportNotFound` if no report has the given ID.
    pub async fn get(&self, params: &Id) -> Result<StoredReport> {
        let db_path = self.db_path.clone();
        let id = params.id;

        task::spawn_blocking(move || {
            let db = Database::new(&db_path)?;
            db.get_report(id)?.ok_or(RelayError::ReportNotFound { id })
        })
        .await
        .map_err(join_error)?
    }

    /// Lists the most recent reports, newest first.
    pub async fn list(&self, params: &ListReports) -> Result<Vec<ReportRecord>> {
        let db_path = self.db_path.clone();
        let limit = params.limit;

        task::spawn_blocking(move || {
            let db = Database::new(&db_path)?;
            db.list_reports(limit)
        })
        .await
        .map_err(join_error)?
    }
}

fn join_error(e: task::JoinError) -> RelayError {
    RelayError::configuration(format!("Task join error: {e}"))
}
