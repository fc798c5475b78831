//! Plan adaptation tool — replaces the plan when findings contradict it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use sgr_core::config::AgentConfig;
use sgr_core::context::AgentContext;
use sgr_core::error::ToolError;
use sgr_core::tool::{AgentTool, ToolDescriptor};

pub const NAME: &str = "adapt_plan";

const DESCRIPTION: &str =
    "Adapt the research plan when findings contradict it: state the new goal and the remaining steps.";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdaptPlanTool {
    /// What finding forced the adaptation
    pub reasoning: String,

    /// The goal as it was before adapting
    pub original_goal: String,

    /// The revised goal
    pub new_goal: String,

    /// Summary of what changed and why
    pub plan_changes: String,

    /// The remaining steps under the new goal
    pub next_steps: Vec<String>,
}

pub fn descriptor() -> ToolDescriptor {
    ToolDescriptor::new(NAME, DESCRIPTION, schema, |args| {
        crate::from_args::<AdaptPlanTool>(NAME, args)
    })
}

fn schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "tool": { "type": "string", "const": NAME },
            "reasoning": {
                "type": "string",
                "description": "What finding forced the adaptation"
            },
            "original_goal": {
                "type": "string",
                "description": "The goal as it was before adapting"
            },
            "new_goal": {
                "type": "string",
                "description": "The revised goal"
            },
            "plan_changes": {
                "type": "string",
                "description": "Summary of what changed and why"
            },
            "next_steps": {
                "type": "array",
                "items": { "type": "string" },
                "minItems": 1,
                "maxItems": 5,
                "description": "The remaining steps under the new goal"
            }
        },
        "required": ["tool", "reasoning", "original_goal", "new_goal", "plan_changes", "next_steps"],
        "additionalProperties": false
    })
}

#[async_trait]
impl AgentTool for AdaptPlanTool {
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
        context.plan = self.next_steps.clone();

        Ok(format!(
            "Plan adapted: {} -> {}\nChanges: {}\nNext steps: {}",
            self.original_goal,
            self.new_goal,
            self.plan_changes,
            self.next_steps.join("; ")
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn execute_swaps_the_plan() {
        let tool = AdaptPlanTool {
            reasoning: "source was wrong".into(),
            original_goal: "old goal".into(),
            new_goal: "new goal".into(),
            plan_changes: "dropped step 2".into(),
            next_steps: vec!["verify claim".into(), "finalize".into()],
        };
        let mut ctx = AgentContext::new();
        ctx.plan = vec!["stale".into()];

        let result = tool.execute(&mut ctx, &AgentConfig::default()).await.unwrap();
        assert_eq!(ctx.plan, vec!["verify claim".to_string(), "finalize".to_string()]);
        assert!(result.contains("new goal"));
    }
}
