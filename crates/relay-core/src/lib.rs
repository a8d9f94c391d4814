//! Core library for the Relay task assistant.
//!
//! Relay turns a natural-language task into calls against external data
//! providers and reports how they went. The pipeline has three stages, run
//! strictly in order by the [`Orchestrator`]:
//!
//! ```text
//! ┌───────────┐    ┌───────────┐    ┌───────────┐
//! │  Planner  │───▶│ Executor  │───▶│ Verifier  │
//! │ text→Plan │    │ Plan→Steps│    │ →Report   │
//! └───────────┘    └───────────┘    └───────────┘
//!                        │
//!                        ▼
//!                  ToolRegistry (CachedTool per provider)
//! ```
//!
//! Provider failures never escape the pipeline: they are retried, then
//! replaced by fallback data or recorded as failed steps. A failed
//! [`Report`] is still a normal return value.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use relay_core::{Orchestrator, RelayConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let orchestrator = Orchestrator::builder()
//!     .with_config(RelayConfig::load(None)?)
//!     .build()?;
//!
//! let report = orchestrator.process("weather in Tokyo and rust repositories").await;
//! println!("{report}");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod db;
pub mod display;
pub mod error;
pub mod executor;
pub mod models;
pub mod orchestrator;
pub mod params;
pub mod planner;
pub mod store;
pub mod tools;
pub mod verifier;

// Re-export commonly used types
pub use config::RelayConfig;
pub use db::Database;
pub use display::{LocalDateTime, OperationStatus, ReportRecords, ToolListing};
pub use error::{ProviderError, RelayError, Result, StepFailure};
pub use executor::{Executor, ExecutorConfig};
pub use models::{
    OutcomeSource, Plan, Report, ReportRecord, ReportStatus, Step, StepResult, StoredReport,
    ToolOutcome,
};
pub use orchestrator::{Orchestrator, OrchestratorBuilder};
pub use params::{Id, ListReports, ProcessTask};
pub use planner::Planner;
pub use store::ReportStore;
pub use tools::{CachedTool, ResultCache, Tool, ToolInfo, ToolRegistry};
pub use verifier::Verifier;
