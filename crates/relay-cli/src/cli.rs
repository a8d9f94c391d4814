//! Command handlers for the terminal front end.

use std::{fs, path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use log::{info, warn};
use relay_core::{
    display::{OperationStatus, ReportRecords, ToolListing},
    params::{Id, ListReports, ProcessTask},
    Orchestrator, Report, ReportStore,
};
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::{
    args::{HistoryArgs, InteractiveArgs, RunArgs, ShowArgs, TaskArgs},
    renderer::TerminalRenderer,
};

/// Words that end an interactive session.
const QUIT_WORDS: [&str; 3] = ["quit", "exit", "q"];

pub struct Cli {
    orchestrator: Arc<Orchestrator>,
    renderer: TerminalRenderer,
    database_file: Option<PathBuf>,
    json: bool,
}

impl Cli {
    pub fn new(
        orchestrator: Arc<Orchestrator>,
        renderer: TerminalRenderer,
        database_file: Option<PathBuf>,
        json: bool,
    ) -> Self {
        Self {
            orchestrator,
            renderer,
            database_file,
            json,
        }
    }

    async fn store(&self) -> Result<ReportStore> {
        ReportStore::open(self.database_file.as_deref())
            .await
            .context("Failed to open report store")
    }

    pub async fn run(&self, args: RunArgs) -> Result<()> {
        let RunArgs {
            task,
            output,
            no_save,
        } = args;
        let params = ProcessTask::from(task);
        params.validate()?;

        let report = self.orchestrator.process(&params.task).await;

        if let Some(path) = output {
            let json =
                serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
            fs::write(&path, json)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            info!("Report written to {}", path.display());
        }

        let saved = if no_save {
            None
        } else {
            self.save(&report).await
        };

        if self.json {
            return self.renderer.json(&report);
        }
        self.renderer.render(&report.to_string());
        if let Some(id) = saved {
            self.renderer
                .render(&OperationStatus::success(format!("Saved report {id}")).to_string());
        }
        Ok(())
    }

    /// Stores a report, returning its ID. Storage problems never fail the
    /// command; the report has already been produced.
    async fn save(&self, report: &Report) -> Option<u64> {
        let store = match self.store().await {
            Ok(store) => store,
            Err(e) => {
                warn!("Report not saved: {e:#}");
                return None;
            }
        };
        match store.save(report).await {
            Ok(record) => Some(record.id),
            Err(e) => {
                warn!("Report not saved: {e}");
                None
            }
        }
    }

    pub fn plan(&self, args: TaskArgs) -> Result<()> {
        let params = ProcessTask::from(args);
        params.validate()?;

        let plan = self.orchestrator.plan(&params.task);
        if self.json {
            return self.renderer.json(&plan);
        }
        self.renderer.render(&plan.to_string());
        Ok(())
    }

    /// Reads tasks from stdin, one per line, until a quit word or end of
    /// input.
    pub async fn interactive(&self, args: InteractiveArgs) -> Result<()> {
        let mut lines = BufReader::new(io::stdin()).lines();
        let mut stdout = io::stdout();

        if !self.json {
            self.renderer
                .render("# Relay interactive mode\n\nType a task, or `quit` to exit.\n\n");
        }

        loop {
            if !self.json {
                stdout.write_all(b"relay> ").await?;
                stdout.flush().await?;
            }

            let Some(line) = lines.next_line().await? else {
                break;
            };
            let task = line.trim();
            if task.is_empty() {
                continue;
            }
            if QUIT_WORDS.contains(&task.to_lowercase().as_str()) {
                break;
            }

            let report = self.orchestrator.process(task).await;
            if !args.no_save {
                self.save(&report).await;
            }
            if self.json {
                self.renderer.json(&report)?;
            } else {
                self.renderer.render(&report.to_string());
                println!();
            }
        }

        info!("Interactive session ended");
        Ok(())
    }

    pub async fn history(&self, args: HistoryArgs) -> Result<()> {
        let params = ListReports::from(args);
        let records = self
            .store()
            .await?
            .list(&params)
            .await
            .context("Failed to list reports")?;

        if self.json {
            return self.renderer.json(&records);
        }
        self.renderer.render(&ReportRecords(records).to_string());
        Ok(())
    }

    pub async fn show(&self, args: ShowArgs) -> Result<()> {
        let params = Id::from(args);
        let stored = self
            .store()
            .await?
            .get(&params)
            .await
            .context("Failed to load report")?;

        if self.json {
            return self.renderer.json(&stored);
        }
        self.renderer.render(&stored.to_string());
        Ok(())
    }

    pub fn tools(&self) -> Result<()> {
        let tools = self.orchestrator.tools();
        if self.json {
            return self.renderer.json(&tools);
        }
        self.renderer.render(&ToolListing(tools).to_string());
        Ok(())
    }
}
