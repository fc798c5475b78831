//! Final answer tool — concludes the run.
//!
//! Also serves as the safe fallback: when a strategy cannot resolve the
//! model's output into a genuine tool, it synthesizes a `FinalAnswerTool`
//! carrying an explanatory answer instead of crashing the run.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use sgr_core::config::AgentConfig;
use sgr_core::context::AgentContext;
use sgr_core::error::ToolError;
use sgr_core::tool::{AgentTool, ToolDescriptor};

pub const NAME: &str = "final_answer";

const DESCRIPTION: &str =
    "Conclude the task with the final answer. Use once enough data has been gathered.";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalAnswerTool {
    /// Why the task is complete
    pub reasoning: String,

    /// Steps that were completed on the way to the answer
    #[serde(default)]
    pub completed_steps: Vec<String>,

    /// The answer itself
    pub answer: String,

    /// Completion status, e.g. "completed" or "partial"
    #[serde(default = "default_status")]
    pub status: String,
}

fn default_status() -> String {
    "completed".into()
}

impl FinalAnswerTool {
    /// A synthesized conclusion used when the model's output could not be
    /// resolved into a real tool call.
    pub fn fallback(reason: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            reasoning: reason.into(),
            completed_steps: Vec::new(),
            answer: answer.into(),
            status: "partial".into(),
        }
    }
}

pub fn descriptor() -> ToolDescriptor {
    ToolDescriptor::new(NAME, DESCRIPTION, schema, |args| {
        crate::from_args::<FinalAnswerTool>(NAME, args)
    })
    .concluding()
}

fn schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "tool": { "type": "string", "const": NAME },
            "reasoning": {
                "type": "string",
                "description": "Why the task is complete"
            },
            "completed_steps": {
                "type": "array",
                "items": { "type": "string" },
                "description": "Steps completed on the way to the answer"
            },
            "answer": {
                "type": "string",
                "description": "The final answer, self-contained"
            },
            "status": {
                "type": "string",
                "enum": ["completed", "partial"],
                "description": "Whether the answer fully covers the request"
            }
        },
        "required": ["tool", "reasoning", "answer"],
        "additionalProperties": false
    })
}

#[async_trait]
impl AgentTool for FinalAnswerTool {
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
        context.complete(self.answer.clone());
        Ok(self.answer.clone())
    }
}
