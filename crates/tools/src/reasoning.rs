//! Reasoning tool — records the model's structured self-assessment.
//!
//! Not part of the default toolkit: the context-budgeted strategy forces it
//! during the reasoning phase, and the availability policy injects it into
//! the concluding subset at the iteration cap. Its schema doubles as the
//! reasoning-envelope schema embedded in every next-step schema.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use sgr_core::config::AgentConfig;
use sgr_core::context::{AgentContext, ReasoningEnvelope};
use sgr_core::error::ToolError;
use sgr_core::tool::{AgentTool, ToolDescriptor};

pub const NAME: &str = "reasoning";

const DESCRIPTION: &str =
    "Assess the situation, the plan, and the remaining steps before acting.";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReasoningTool {
    #[serde(flatten)]
    pub envelope: ReasoningEnvelope,
}

pub fn descriptor() -> ToolDescriptor {
    ToolDescriptor::new(NAME, DESCRIPTION, schema, |args| {
        crate::from_args::<ReasoningTool>(NAME, args)
    })
    .concluding()
}

fn schema() -> serde_json::Value {
    let mut schema = envelope_schema();
    schema["properties"]["tool"] = json!({ "type": "string", "const": NAME });
    if let Some(required) = schema["required"].as_array_mut() {
        required.insert(0, json!("tool"));
    }
    schema
}

/// The bare envelope schema, without the discriminator. Embedded both in the
/// next-step schema and in the forced reasoning-phase response format.
pub fn envelope_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "reasoning_steps": {
                "type": "array",
                "items": { "type": "string" },
                "minItems": 2,
                "maxItems": 4,
                "description": "Step-by-step reasoning for this turn"
            },
            "current_situation": {
                "type": "string",
                "description": "One-line summary of where the task stands"
            },
            "plan_status": {
                "type": "string",
                "description": "Whether the plan is on track, adapted, or not yet formed"
            },
            "enough_data": {
                "type": "boolean",
                "description": "Whether enough data has been gathered to answer"
            },
            "remaining_steps": {
                "type": "array",
                "items": { "type": "string" },
                "minItems": 0,
                "maxItems": 5,
                "description": "Steps still to take, next one first"
            },
            "task_completed": {
                "type": "boolean",
                "description": "Whether the task is done"
            }
        },
        "required": [
            "reasoning_steps",
            "current_situation",
            "plan_status",
            "enough_data",
            "remaining_steps",
            "task_completed"
        ],
        "additionalProperties": false
    })
}

#[async_trait]
impl AgentTool for ReasoningTool {
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
        context.current_step_reasoning = Some(self.envelope.clone());
        Ok(format!(
            "Reasoning recorded. Next step: {}",
            self.envelope.next_step()
        ))
    }
}
