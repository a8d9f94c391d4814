//! Command-line interface definitions using clap.
//!
//! Argument structs carry the clap derives and convert into the
//! interface-agnostic types in `relay_core::params`:
//!
//! ```text
//! User Input → CLI Args (clap) → Core Params → Orchestrator / ReportStore
//! ```

use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};
use relay_core::params::{Id, ListReports, ProcessTask};

/// Relay decomposes a natural-language task into calls against external
/// data providers (GitHub repository search, current weather), runs them
/// with caching, retry and fallback, and reports what came back.
#[derive(Parser)]
#[command(version, about, name = "relay")]
pub struct Args {
    /// Path to the SQLite report store. Defaults to
    /// $XDG_DATA_HOME/relay/relay.db
    #[arg(long, global = true)]
    pub database_file: Option<PathBuf>,

    /// Path to a TOML configuration file. Defaults to
    /// $XDG_CONFIG_HOME/relay/config.toml when present
    #[arg(long, global = true, env = "RELAY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Print machine-readable JSON instead of markdown
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Plan, execute and report on a task
    #[command(alias = "r")]
    Run(RunArgs),
    /// Show the plan for a task without executing it
    #[command(alias = "p")]
    Plan(TaskArgs),
    /// Read tasks from standard input until quit, exit, q or end of input
    #[command(alias = "i")]
    Interactive(InteractiveArgs),
    /// Start the HTTP API server
    Serve(ServeArgs),
    /// Start the MCP server on stdio
    Mcp,
    /// List stored reports, newest first
    History(HistoryArgs),
    /// Show a stored report
    Show(ShowArgs),
    /// List the available tools and their parameters
    Tools,
}

/// Task text given as one or more words.
#[derive(ClapArgs)]
pub struct TaskArgs {
    /// Task description, e.g. "weather in Tokyo and rust repositories"
    #[arg(required = true, num_args = 1..)]
    pub task: Vec<String>,
}

impl From<TaskArgs> for ProcessTask {
    fn from(args: TaskArgs) -> Self {
        ProcessTask::new(args.task.join(" "))
    }
}

#[derive(ClapArgs)]
pub struct RunArgs {
    #[command(flatten)]
    pub task: TaskArgs,

    /// Also write the JSON report to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Do not store the report in the history database
    #[arg(long)]
    pub no_save: bool,
}

#[derive(ClapArgs)]
pub struct InteractiveArgs {
    /// Do not store reports in the history database
    #[arg(long)]
    pub no_save: bool,
}

#[derive(ClapArgs)]
pub struct ServeArgs {
    /// Address to bind
    #[arg(long, default_value = "localhost")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = 8000)]
    pub port: u16,
}

#[derive(ClapArgs)]
pub struct HistoryArgs {
    /// Maximum number of reports to show
    #[arg(short, long, default_value_t = 20)]
    pub limit: u32,
}

impl From<HistoryArgs> for ListReports {
    fn from(args: HistoryArgs) -> Self {
        ListReports { limit: args.limit }
    }
}

#[derive(ClapArgs)]
pub struct ShowArgs {
    /// Report ID
    pub id: u64,
}

impl From<ShowArgs> for Id {
    fn from(args: ShowArgs) -> Self {
        Id { id: args.id }
    }
}
