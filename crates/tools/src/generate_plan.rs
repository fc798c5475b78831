//! Plan generation tool — establishes the initial research plan.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use sgr_core::config::AgentConfig;
use sgr_core::context::AgentContext;
use sgr_core::error::ToolError;
use sgr_core::tool::{AgentTool, ToolDescriptor};

pub const NAME: &str = "generate_plan";

const DESCRIPTION: &str =
    "Create the initial research plan: a goal and 3-5 concrete planned steps.";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratePlanTool {
    /// Why this plan fits the request
    pub reasoning: String,

    /// The overall research goal
    pub research_goal: String,

    /// Concrete steps, in execution order
    pub planned_steps: Vec<String>,
}

pub fn descriptor() -> ToolDescriptor {
    ToolDescriptor::new(NAME, DESCRIPTION, schema, |args| {
        crate::from_args::<GeneratePlanTool>(NAME, args)
    })
}

fn schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "tool": { "type": "string", "const": NAME },
            "reasoning": {
                "type": "string",
                "description": "Why this plan fits the request"
            },
            "research_goal": {
                "type": "string",
                "description": "The overall research goal"
            },
            "planned_steps": {
                "type": "array",
                "items": { "type": "string" },
                "minItems": 3,
                "maxItems": 5,
                "description": "Concrete steps in execution order"
            }
        },
        "required": ["tool", "reasoning", "research_goal", "planned_steps"],
        "additionalProperties": false
    })
}

#[async_trait]
impl AgentTool for GeneratePlanTool {
    fn name(&self) -> &'static str {
        NAME
    }

    fn payload(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }

    async fn execute(
        &self,
        context: &mut AgentContext,
        _config: &AgentConfig,
    ) -> Result<String, ToolError> {
        context.plan = self.planned_steps.clone();

        let steps = self
            .planned_steps
            .iter()
            .enumerate()
            .map(|(i, s)| format!("{}. {s}", i + 1))
            .collect::<Vec<_>>()
            .join("\n");
        Ok(format!(
            "Plan created for goal: {}\n{steps}",
            self.research_goal
        ))
    }
}
