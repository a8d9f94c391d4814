//! Database schema initialization and versioning.

use crate::error::{DatabaseResultExt, RelayError, Result};

/// Version written to `PRAGMA user_version` by this build.
pub const SCHEMA_VERSION: i64 = 1;

impl super::Database {
    /// Initializes the schema using the embedded SQL file.
    pub(super) fn initialize_schema(&self) -> Result<()> {
        let schema_sql = include_str!("../../assets/schema.sql");
        self.connection
            .execute_batch(schema_sql)
            .db_context("Failed to initialize database schema")?;

        self.apply_migrations()
    }

    /// Stamps new databases and refuses ones written by a newer build.
    fn apply_migrations(&self) -> Result<()> {
        let version = self.schema_version()?;

        if version > SCHEMA_VERSION {
            return Err(RelayError::configuration(format!(
                "Database schema version {version} is newer than supported version {SCHEMA_VERSION}"
            )));
        }

        if version < SCHEMA_VERSION {
            self.connection
                .pragma_update(None, "user_version", SCHEMA_VERSION)
                .db_context("Failed to record schema version")?;
        }

        Ok(())
    }

    pub fn schema_version(&self) -> Result<i64> {
        self.connection
            .pragma_query_value(None, "user_version", |row| row.get(0))
            .db_context("Failed to read schema version")
    }
}
