//! Web search tool — deterministic mock results.
//!
//! In production this would call a real search API. The mock returns
//! plausible results so the loop can be exercised end-to-end without network
//! access. Each execution consumes one unit of the search budget.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use sgr_core::config::AgentConfig;
use sgr_core::context::AgentContext;
use sgr_core::error::ToolError;
use sgr_core::tool::{AgentTool, ToolDescriptor};

pub const NAME: &str = "web_search";

const DESCRIPTION: &str =
    "Search the web for information. Returns relevant results with titles, URLs, and snippets.";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebSearchTool {
    /// What this search is expected to uncover
    #[serde(default)]
    pub reasoning: String,

    /// The search query
    pub query: String,

    /// Maximum number of results (default 5)
    #[serde(default = "default_max_results")]
    pub max_results: u32,
}

fn default_max_results() -> u32 {
    5
}

pub fn descriptor() -> ToolDescriptor {
    ToolDescriptor::new(NAME, DESCRIPTION, schema, |args| {
        crate::from_args::<WebSearchTool>(NAME, args)
    })
    .search_capable()
}

fn schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "tool": { "type": "string", "const": NAME },
            "reasoning": {
                "type": "string",
                "description": "What this search is expected to uncover"
            },
            "query": {
                "type": "string",
                "description": "The search query"
            },
            "max_results": {
                "type": "integer",
                "minimum": 1,
                "maximum": 10,
                "description": "Maximum number of results (default 5)"
            }
        },
        "required": ["tool", "query"],
        "additionalProperties": false
    })
}

#[async_trait]
impl AgentTool for WebSearchTool {
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
        context.searches_used += 1;
        context.searched_queries.push(self.query.clone());

        let count = self.max_results.clamp(1, 10) as usize;
        let results = mock_results(&self.query, count);
        tracing::debug!(query = %self.query, results = results.len(), "Search executed");

        let listing = results
            .iter()
            .enumerate()
            .map(|(i, r)| format!("{}. {} — {}\n   {}", i + 1, r.title, r.url, r.snippet))
            .collect::<Vec<_>>()
            .join("\n");
        Ok(format!("Search results for '{}':\n{listing}", self.query))
    }
}

#[derive(Clone, Serialize)]
struct SearchResult {
    title: String,
    url: String,
    snippet: String,
}

fn mock_results(query: &str, count: usize) -> Vec<SearchResult> {
    let q = query.to_lowercase();

    // Context-aware mock results for common topics.
    if q.contains("rust") {
        let canned = vec![
            SearchResult {
                title: "The Rust Programming Language".into(),
                url: "https://doc.rust-lang.org/book/".into(),
                snippet: "Rust is a systems programming language focused on safety, speed, and concurrency.".into(),
            },
            SearchResult {
                title: "Rust by Example".into(),
                url: "https://doc.rust-lang.org/rust-by-example/".into(),
                snippet: "A collection of runnable examples that illustrate Rust concepts.".into(),
            },
            SearchResult {
                title: "crates.io: Rust Package Registry".into(),
                url: "https://crates.io/".into(),
                snippet: "The Rust community's crate registry.".into(),
            },
        ];
        return canned.into_iter().take(count).collect();
    }

    // Generic fallback.
    (0..count)
        .map(|i| SearchResult {
            title: format!("Result {} for: {}", i + 1, query),
            url: format!(
                "https://example.com/search?q={}&p={}",
                query.replace(' ', "+"),
                i + 1
            ),
            snippet: format!("Mock search result for the query '{query}'."),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn search_increments_the_budget_counter() {
        let tool = WebSearchTool {
            reasoning: String::new(),
            query: "rust history".into(),
            max_results: 3,
        };
        let mut ctx = AgentContext::new();
        let result = tool.execute(&mut ctx, &AgentConfig::default()).await.unwrap();
        assert_eq!(ctx.searches_used, 1);
        assert_eq!(ctx.searched_queries, vec!["rust history"]);
        assert!(result.contains("Rust"));
    }

    #[tokio::test]
    async fn search_respects_max_results() {
        let tool = WebSearchTool {
            reasoning: String::new(),
            query: "anything else".into(),
            max_results: 2,
        };
        let mut ctx = AgentContext::new();
        let result = tool.execute(&mut ctx, &AgentConfig::default()).await.unwrap();
        assert!(result.contains("1. "));
        assert!(result.contains("2. "));
        assert!(!result.contains("3. "));
    }

    #[test]
    fn parse_defaults_max_results() {
        let desc = descriptor();
        let tool = desc
            .parse_args(json!({"tool": NAME, "query": "rust"}))
            .unwrap();
        assert_eq!(tool.name(), NAME);
    }

    #[test]
    fn parse_rejects_missing_query() {
        let desc = descriptor();
        assert!(desc.parse_args(json!({"reasoning": "look"})).is_err());
    }

    #[test]
    fn descriptor_is_search_capable() {
        assert!(descriptor().is_search_capable());
    }
}
