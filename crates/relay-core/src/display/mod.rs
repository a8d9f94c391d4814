//! Markdown formatting for pipeline output.
//!
//! Domain models implement [`std::fmt::Display`] directly (see [`models`]);
//! collections and contextual messages use the wrapper types defined here.
//! The CLI renders the markdown through termimad, the MCP server returns it
//! as text content.
//!
//! ## Module Organization
//!
//! - [`collections`]: `ReportRecords`, `ToolListing`
//! - [`datetime`]: `LocalDateTime`
//! - [`models`]: Display implementations for plans, results and reports
//! - [`payload`]: compact rendering of provider data
//! - [`status`]: `OperationStatus`

pub mod collections;
pub mod datetime;
pub mod models;
pub mod payload;
pub mod status;

pub use collections::{ReportRecords, ToolListing};
pub use datetime::LocalDateTime;
pub use payload::Payload;
pub use status::OperationStatus;
