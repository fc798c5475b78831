//! Report tool — stores a long-form write-up on the context.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use sgr_core::config::AgentConfig;
use sgr_core::context::AgentContext;
use sgr_core::error::ToolError;
use sgr_core::tool::{AgentTool, ToolDescriptor};

pub const NAME: &str = "create_report";

const DESCRIPTION: &str =
    "Write a detailed report from the gathered findings before concluding.";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateReportTool {
    /// Why the gathered data supports a full report now
    pub reasoning: String,

    /// Report title
    pub title: String,

    /// Full report body in markdown
    pub content: String,

    /// Confidence in the findings: "high", "medium" or "low"
    #[serde(default = "default_confidence")]
    pub confidence: String,
}

fn default_confidence() -> String {
    "medium".into()
}

pub fn descriptor() -> ToolDescriptor {
    ToolDescriptor::new(NAME, DESCRIPTION, schema, |args| {
        crate::from_args::<CreateReportTool>(NAME, args)
    })
}

fn schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "tool": { "type": "string", "const": NAME },
            "reasoning": {
                "type": "string",
                "description": "Why the gathered data supports a full report now"
            },
            "title": {
                "type": "string",
                "description": "Report title"
            },
            "content": {
                "type": "string",
                "description": "Full report body in markdown"
            },
            "confidence": {
                "type": "string",
                "enum": ["high", "medium", "low"],
                "description": "Confidence in the findings"
            }
        },
        "required": ["tool", "reasoning", "title", "content"],
        "additionalProperties": false
    })
}

#[async_trait]
impl AgentTool for CreateReportTool {
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
        context.report = Some(self.content.clone());
        Ok(format!(
            "Report '{}' created ({} chars, confidence: {})",
            self.title,
            self.content.chars().count(),
            self.confidence
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn execute_stores_the_report() {
        let tool = CreateReportTool {
            reasoning: "enough data".into(),
            title: "Rust history".into(),
            content: "# Rust history\n\nIt began at Mozilla...".into(),
            confidence: "high".into(),
        };
        let mut ctx = AgentContext::new();
        let result = tool.execute(&mut ctx, &AgentConfig::default()).await.unwrap();
        assert!(ctx.report.as_deref().unwrap().contains("Mozilla"));
        assert!(result.contains("Rust history"));
        assert!(result.contains("high"));
    }
}
