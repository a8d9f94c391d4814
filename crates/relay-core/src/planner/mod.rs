//! Rule-based intent decomposition.
//!
//! The [`Planner`] maps free text onto a fixed step vocabulary. It never
//! fails: text that triggers no rule still yields a single default step.
//!
//! ```text
//! "weather in Tokyo and rust repos"
//!        │ tokenize
//!        ▼
//! [weather, in, tokyo, and, rust, repos]
//!        │ rules, in table order
//!        ▼
//! 1. github_search  {query: "rust", per_page: 5}
//! 2. weather_lookup {city: "Tokyo"}
//! ```
//!
//! Submodules:
//!
//! - [`text`]: tokenization and word/phrase matching
//! - [`rules`]: the ordered rule table and parameter extractors

use log::{debug, info};

use crate::models::{Plan, PlanBuilder};

pub mod rules;
pub mod text;


pub use rules::{PlanRule, DEFAULT_RULES};
pub use text::TaskText;

/// Turns task text into a [`Plan`].
#[derive(Debug, Clone)]
pub struct Planner {
    rules: Vec<PlanRule>,
}

impl Planner {
    /// Planner using the built-in rule table.
    pub fn new() -> Self {
        Self::with_rules(DEFAULT_RULES.to_vec())
    }

    /// Planner with a custom rule table, evaluated in order.
    pub fn with_rules(rules: Vec<PlanRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[PlanRule] {
        &self.rules
    }

    /// Builds the plan for `text`. Every matching rule contributes one
    /// step; when none match, the default search step is used.
    pub fn create_plan(&self, text: &str) -> Plan {
        let task = TaskText::new(text);
        let mut builder = PlanBuilder::default();

        for rule in &self.rules {
            if !rule.matches(&task) {
                continue;
            }
            let planned = (rule.plan)(&task);
            debug!("Rule {} matched: {}", rule.tool, planned.description);
            builder = builder
                .step(planned.description, rule.tool, planned.parameters)
                .reason(planned.reasoning);
        }

        if builder.is_empty() {
            let planned = rules::default_step();
            builder = builder
                .step(planned.description, rules::DEFAULT_TOOL, planned.parameters)
                .reason(planned.reasoning);
        }

        let plan = builder.build();
        info!("Planned {} step(s) for task", plan.len());
        plan
    }
}

impl Default for Planner {
    fn default() -> Self {
        Self::new()
    }
}
