//! Clarification tool — suspends the run to ask the caller questions.
//!
//! Executing this tool records the questions and moves the context to
//! `WaitingForClarification`; the loop observes that state after the action
//! phase and suspends until an answer arrives.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use sgr_core::config::AgentConfig;
use sgr_core::context::{AgentContext, AgentState};
use sgr_core::error::ToolError;
use sgr_core::tool::{AgentTool, ToolDescriptor};

pub const NAME: &str = "clarification";

const DESCRIPTION: &str =
    "Ask the user clarifying questions when the request is ambiguous. Use before searching.";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClarificationTool {
    /// Why clarification is needed before proceeding
    pub reasoning: String,

    /// The questions to ask, specific and answerable
    pub questions: Vec<String>,
}

pub fn descriptor() -> ToolDescriptor {
    ToolDescriptor::new(NAME, DESCRIPTION, schema, |args| {
        crate::from_args::<ClarificationTool>(NAME, args)
    })
}

fn schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "tool": { "type": "string", "const": NAME },
            "reasoning": {
                "type": "string",
                "description": "Why clarification is needed before proceeding"
            },
            "questions": {
                "type": "array",
                "items": { "type": "string" },
                "minItems": 1,
                "maxItems": 5,
                "description": "Specific questions for the user"
            }
        },
        "required": ["tool", "reasoning", "questions"],
        "additionalProperties": false
    })
}

#[async_trait]
impl AgentTool for ClarificationTool {
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
        if self.questions.is_empty() {
            return Err(ToolError::InvalidArguments {
                tool_name: NAME.to_string(),
                reason: "at least one question is required".into(),
            });
        }

        context.pending_questions = self.questions.clone();
        context.state = AgentState::WaitingForClarification;

        let listing = self
            .questions
            .iter()
            .map(|q| format!("- {q}"))
            .collect::<Vec<_>>()
            .join("\n");
        Ok(format!("Waiting for clarification:\n{listing}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn execute_suspends_the_context() {
        let tool = ClarificationTool {
            reasoning: "The request is ambiguous".into(),
            questions: vec!["Which time period?".into(), "Which region?".into()],
        };
        let mut ctx = AgentContext::new();
        ctx.state = AgentState::Researching;

        let result = tool.execute(&mut ctx, &AgentConfig::default()).await.unwrap();
        assert_eq!(ctx.state, AgentState::WaitingForClarification);
        assert_eq!(ctx.pending_questions.len(), 2);
        assert!(result.contains("Which time period?"));
    }

    #[tokio::test]
    async fn empty_questions_rejected() {
        let tool = ClarificationTool {
            reasoning: "unsure".into(),
            questions: vec![],
        };
        let mut ctx = AgentContext::new();
        let err = tool.execute(&mut ctx, &AgentConfig::default()).await;
        assert!(err.is_err());
    }

    #[test]
    fn parse_from_arguments() {
        let desc = descriptor();
        let tool = desc
            .parse_args(json!({
                "tool": NAME,
                "reasoning": "ambiguous",
                "questions": ["What exactly?"]
            }))
            .unwrap();
        assert_eq!(tool.name(), NAME);
    }

    #[test]
    fn parse_rejects_missing_questions() {
        let desc = descriptor();
        let err = desc.parse_args(json!({"reasoning": "ambiguous"}));
        assert!(matches!(err, Err(ToolError::InvalidArguments { .. })));
    }
}
