//! Plan and step definitions.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Parameter mapping passed to a tool.
pub type Parameters = Map<String, Value>;

/// A single tool invocation with resolved parameters.
///
/// Steps are created only through [`PlanBuilder`], which assigns the index,
/// and expose no mutating accessors once placed in a plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Step {
    index: u32,
    description: String,
    tool_name: String,
    parameters: Parameters,
}

impl Step {
    /// 1-based position within the plan.
    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Name of the registered tool this step invokes.
    pub fn tool_name(&self) -> &str {
        &self.tool_name
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }
}

/// Ordered sequence of steps produced for one request.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Plan {
    steps: Vec<Step>,
    #[serde(default)]
    reasoning: String,
}

impl Plan {
    /// Starts building a plan.
    pub fn builder() -> PlanBuilder {
        PlanBuilder::default()
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Why the planner chose these steps.
    pub fn reasoning(&self) -> &str {
        &self.reasoning
    }
}

/// Appends steps in emission order, numbering them 1, 2, 3, ...
#[derive(Debug, Default)]
pub struct PlanBuilder {
    steps: Vec<Step>,
    reasoning: Vec<String>,
}

impl PlanBuilder {
    /// Appends a step; its index is the next free position.
    pub fn step(
        mut self,
        description: impl Into<String>,
        tool_name: impl Into<String>,
        parameters: Parameters,
    ) -> Self {
        let index = self.steps.len() as u32 + 1;
        self.steps.push(Step {
            index,
            description: description.into(),
            tool_name: tool_name.into(),
            parameters,
        });
        self
    }

    /// Records one sentence of reasoning.
    pub fn reason(mut self, sentence: impl Into<String>) -> Self {
        self.reasoning.push(sentence.into());
        self
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn build(self) -> Plan {
        Plan {
            steps: self.steps,
            reasoning: self.reasoning.join(" "),
        }
    }
}
