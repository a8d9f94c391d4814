//! Error types for the relay library.
//!
//! Three layers of errors exist:
//!
//! - [`RelayError`]: faults of the surrounding machinery (configuration,
//!   storage, serialization). These are the only errors that escape the
//!   public API as `Err`.
//! - [`ProviderError`]: a failed round trip to an external data provider.
//!   Always retryable; never escapes the executor.
//! - [`StepFailure`]: the reason a single step ended unsuccessfully. Its
//!   display text becomes the step's error message in the report.

use std::path::PathBuf;

use thiserror::Error;

/// Comprehensive error type for relay operations outside the pipeline.
#[derive(Error, Debug)]
pub enum RelayError {
    /// Database connection or query errors
    #[error("Database error: {message}")]
    Database {
        message: String,
        #[source]
        source: rusqlite::Error,
    },
    /// Stored report not found for the given ID
    #[error("Report with ID {id} not found")]
    ReportNotFound { id: u64 },
    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// XDG directory specification errors
    #[error("XDG directory error: {0}")]
    XdgDirectory(String),
    /// Invalid input validation errors
    #[error("Invalid input for field '{field}': {reason}")]
    InvalidInput { field: String, reason: String },
    /// Serialization/deserialization errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

/// Builder for creating database errors with optional context.
pub struct DatabaseErrorBuilder {
    message: String,
}

impl DatabaseErrorBuilder {
    /// Create a new database error builder with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Build the error with the given source.
    pub fn with_source(self, source: rusqlite::Error) -> RelayError {
        RelayError::Database {
            message: self.message,
            source,
        }
    }
}

/// Builder for creating input validation errors.
pub struct InvalidInputBuilder {
    field: String,
}

impl InvalidInputBuilder {
    /// Create a new invalid input error builder for a field.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// Build the error with the given reason.
    pub fn with_reason(self, reason: impl Into<String>) -> RelayError {
        RelayError::InvalidInput {
            field: self.field,
            reason: reason.into(),
        }
    }
}

impl RelayError {
    /// Creates a builder for database errors.
    pub fn database(message: impl Into<String>) -> DatabaseErrorBuilder {
        DatabaseErrorBuilder::new(message)
    }

    /// Creates a builder for input validation errors.
    pub fn invalid_input(field: impl Into<String>) -> InvalidInputBuilder {
        InvalidInputBuilder::new(field)
    }

    /// Creates a configuration error from a message.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

/// Specialized extension trait for database-related Results.
pub trait DatabaseResultExt<T> {
    /// Map database errors with a message.
    fn db_context(self, message: &str) -> Result<T>;
}

impl<T> DatabaseResultExt<T> for std::result::Result<T, rusqlite::Error> {
    fn db_context(self, message: &str) -> Result<T> {
        self.map_err(|e| RelayError::database(message).with_source(e))
    }
}

/// Result type alias for relay operations
pub type Result<T> = std::result::Result<T, RelayError>;

/// A failed call to an external data provider.
///
/// Every variant is eligible for retry by the executor.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// The request did not complete within the configured timeout
    #[error("{provider} request timed out")]
    Timeout { provider: String },
    /// Connection, DNS or protocol failure
    #[error("{provider} request failed: {message}")]
    Transport { provider: String, message: String },
    /// The provider answered with a status outside the 2xx range
    #[error("{provider} returned HTTP {status}")]
    Status { provider: String, status: u16 },
    /// The provider answered but the body could not be used
    #[error("{provider} returned an unusable response: {message}")]
    InvalidResponse { provider: String, message: String },
}

impl ProviderError {
    /// Classifies a reqwest error as a timeout or a transport failure.
    pub fn from_reqwest(provider: impl Into<String>, error: &reqwest::Error) -> Self {
        let provider = provider.into();
        if error.is_timeout() {
            Self::Timeout { provider }
        } else if error.is_decode() {
            Self::InvalidResponse {
                provider,
                message: error.to_string(),
            }
        } else {
            Self::Transport {
                provider,
                message: error.to_string(),
            }
        }
    }

    /// Creates an invalid response error.
    pub fn invalid_response(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            provider: provider.into(),
            message: message.into(),
        }
    }
}

/// Why a step ended with `success = false`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StepFailure {
    /// The step names a tool that is not in the registry
    #[error("unknown tool")]
    UnknownTool { tool: String },
    /// A required parameter is missing
    #[error("invalid parameters")]
    InvalidParameters { tool: String },
    /// Every attempt failed and the tool has no fallback
    #[error("failed after {attempts} attempts: {source}")]
    Exhausted {
        attempts: u32,
        #[source]
        source: ProviderError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_failure_messages() {
        let unknown = StepFailure::UnknownTool {
            tool: "stock_ticker".to_string(),
        };
        assert_eq!(unknown.to_string(), "unknown tool");

        let invalid = StepFailure::InvalidParameters {
            tool: "weather_lookup".to_string(),
        };
        assert_eq!(invalid.to_string(), "invalid parameters");

        let exhausted = StepFailure::Exhausted {
            attempts: 3,
            source: ProviderError::Status {
                provider: "github".to_string(),
                status: 503,
            },
        };
        assert_eq!(
            exhausted.to_string(),
            "failed after 3 attempts: github returned HTTP 503"
        );
    }

    #[test]
    fn test_invalid_input_builder() {
        let err = RelayError::invalid_input("max_retries").with_reason("must be at least 1");
        assert_eq!(
            err.to_string(),
            "Invalid input for field 'max_retries': must be at least 1"
        );
    }
}
