//! Page extraction tool — deterministic mock page content.
//!
//! Fetches and distills the content of specific pages found by a search.
//! Mocked for the same reason as `web_search`: the loop must be exercisable
//! without network access.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use sgr_core::config::AgentConfig;
use sgr_core::context::AgentContext;
use sgr_core::error::ToolError;
use sgr_core::tool::{AgentTool, ToolDescriptor};

pub const NAME: &str = "extract_page_content";

const DESCRIPTION: &str =
    "Fetch and extract the readable content of specific pages found by a search.";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractPageContentTool {
    /// Why these pages are worth reading in full
    #[serde(default)]
    pub reasoning: String,

    /// The URLs to extract, at most 3 per call
    pub urls: Vec<String>,
}

pub fn descriptor() -> ToolDescriptor {
    ToolDescriptor::new(NAME, DESCRIPTION, schema, |args| {
        crate::from_args::<ExtractPageContentTool>(NAME, args)
    })
}

fn schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "tool": { "type": "string", "const": NAME },
            "reasoning": {
                "type": "string",
                "description": "Why these pages are worth reading in full"
            },
            "urls": {
                "type": "array",
                "items": { "type": "string" },
                "minItems": 1,
                "maxItems": 3,
                "description": "The URLs to extract"
            }
        },
        "required": ["tool", "urls"],
        "additionalProperties": false
    })
}

#[async_trait]
impl AgentTool for ExtractPageContentTool {
    fn name(&self) -> &'static str {
        NAME
    }

    fn payload(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }

    async fn execute(
        &self,
        _context: &mut AgentContext,
        _config: &AgentConfig,
    ) -> Result<String, ToolError> {
        if self.urls.is_empty() {
            return Err(ToolError::InvalidArguments {
                tool_name: NAME.to_string(),
                reason: "at least one URL is required".into(),
            });
        }

        let extracts = self
            .urls
            .iter()
            .take(3)
            .map(|url| {
                format!(
                    "## {url}\nMock extracted content for {url}. In production this would be \
                     the distilled readable text of the page."
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n");
        Ok(extracts)
    }
}
