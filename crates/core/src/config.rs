//! Agent configuration types.
//!
//! The config object is built once (see the `sgr-config` crate for file
//! loading and validation) and passed by reference into the loop and the
//! tools. Nothing here reads the environment or the filesystem.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Placeholder that must appear in the system prompt template.
pub const TOOLS_PLACEHOLDER: &str = "{tools}";
/// Placeholder that must appear in the initial request template.
pub const TASK_PLACEHOLDER: &str = "{task}";
/// Placeholder that must appear in the clarification template.
pub const CLARIFICATIONS_PLACEHOLDER: &str = "{clarifications}";

const DEFAULT_SYSTEM_PROMPT: &str = "\
You are a methodical research agent. You reason explicitly before every \
action, maintain a plan, and adapt it when findings contradict it.

Available tools:
{tools}

Rules:
- Always assess the situation before selecting a tool.
- Ask for clarification when the request is ambiguous, before searching.
- Conclude with a final answer once you have enough data.";

const DEFAULT_INITIAL_REQUEST: &str = "\
Current date: {date}

Research request:
{task}";

const DEFAULT_CLARIFICATION: &str = "\
Clarifications received:
{clarifications}

Continue the research taking these into account.";

/// Top-level agent configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub llm: LlmConfig,
    pub execution: ExecutionConfig,
    pub prompts: PromptsConfig,
}

/// Connection and sampling settings for the model endpoint.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".into(),
            api_key: String::new(),
            model: "gpt-4o-mini".into(),
            temperature: 0.4,
            max_tokens: Some(8000),
        }
    }
}

impl LlmConfig {
    /// A JSON view safe to persist in run logs.
    pub fn redacted(&self) -> serde_json::Value {
        serde_json::json!({
            "base_url": self.base_url,
            "model": self.model,
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
        })
    }
}

// Redact the API key so configs can be logged.
impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"***")
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

/// Loop limits and logging destinations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionConfig {
    /// Turns before the toolkit is restricted to the concluding subset
    pub max_iterations: u32,

    /// Searches before search-capable tools are withdrawn
    pub max_searches: u32,

    /// Clarification round-trips before the clarification tool is withdrawn
    pub max_clarifications: u32,

    /// Extra turns allowed past `max_iterations` before the run is failed
    pub wrap_up_turns: u32,

    /// Where to persist run logs; unset disables persistence
    pub logs_dir: Option<PathBuf>,

    pub reduction: ReductionConfig,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            max_iterations: 10,
            max_searches: 4,
            max_clarifications: 3,
            wrap_up_turns: 3,
            logs_dir: None,
            reduction: ReductionConfig::default(),
        }
    }
}

/// Context-reduction settings used by the context-budgeted strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReductionConfig {
    /// Tool outputs longer than this are truncated with a marker
    pub tool_output_max_chars: usize,

    /// Non-system messages kept after windowing
    pub keep_last_messages: usize,

    /// Total character budget across the whole prompt
    pub char_budget: usize,
}

impl Default for ReductionConfig {
    fn default() -> Self {
        Self {
            tool_output_max_chars: 800,
            keep_last_messages: 2,
            char_budget: 20_000,
        }
    }
}

/// Prompt templates with their rendering helpers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptsConfig {
    pub system_prompt: String,
    pub initial_request: String,
    pub clarification: String,
}

impl Default for PromptsConfig {
    fn default() -> Self {
        Self {
            system_prompt: DEFAULT_SYSTEM_PROMPT.into(),
            initial_request: DEFAULT_INITIAL_REQUEST.into(),
            clarification: DEFAULT_CLARIFICATION.into(),
        }
    }
}

impl PromptsConfig {
    /// Render the system prompt with a `- name: description` line per tool.
    pub fn render_system_prompt<'a, I>(&self, tools: I) -> String
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let listing = tools
            .into_iter()
            .map(|(name, description)| format!("- {name}: {description}"))
            .collect::<Vec<_>>()
            .join("\n");
        self.system_prompt.replace(TOOLS_PLACEHOLDER, &listing)
    }

    pub fn render_initial_request(&self, task: &str, date: &str) -> String {
        self.initial_request
            .replace(TASK_PLACEHOLDER, task)
            .replace("{date}", date)
    }

    pub fn render_clarification(&self, clarifications: &str) -> String {
        self.clarification
            .replace(CLARIFICATIONS_PLACEHOLDER, clarifications)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_redacts_api_key() {
        let llm = LlmConfig {
            api_key: "sk-secret".into(),
            ..Default::default()
        };
        let debug = format!("{llm:?}");
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("***"));
    }

    #[test]
    fn redacted_json_omits_api_key() {
        let llm = LlmConfig {
            api_key: "sk-secret".into(),
            ..Default::default()
        };
        let json = llm.redacted().to_string();
        assert!(!json.contains("sk-secret"));
        assert!(json.contains("gpt-4o-mini"));
    }

    #[test]
    fn system_prompt_lists_tools() {
        let prompts = PromptsConfig::default();
        let rendered =
            prompts.render_system_prompt([("web_search", "Search the web"), ("final_answer", "Conclude")]);
        assert!(rendered.contains("- web_search: Search the web"));
        assert!(rendered.contains("- final_answer: Conclude"));
        assert!(!rendered.contains(TOOLS_PLACEHOLDER));
    }

    #[test]
    fn initial_request_substitutes_task_and_date() {
        let prompts = PromptsConfig::default();
        let rendered = prompts.render_initial_request("find rust history", "2026-08-30");
        assert!(rendered.contains("find rust history"));
        assert!(rendered.contains("2026-08-30"));
    }

    #[test]
    fn execution_defaults_are_sane() {
        let exec = ExecutionConfig::default();
        assert!(exec.max_iterations >= 1);
        assert!(exec.reduction.keep_last_messages >= 1);
        assert!(exec.reduction.char_budget > exec.reduction.tool_output_max_chars);
    }
}
