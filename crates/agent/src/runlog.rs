//! Structured run log.
//!
//! The console gets truncated one-liners via `tracing`; the run log keeps
//! the full payloads. On teardown the log is written as one JSON document
//! per run; with no log directory configured, persistence is skipped
//! silently.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use sgr_core::context::{AgentState, ReasoningEnvelope};

/// One recorded step of a run.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "step_type", rename_all = "snake_case")]
pub enum RunLogEntry {
    Reasoning {
        step_number: u32,
        timestamp: DateTime<Utc>,
        envelope: ReasoningEnvelope,
    },
    ToolExecution {
        step_number: u32,
        timestamp: DateTime<Utc>,
        tool_name: String,
        arguments: serde_json::Value,
        result: String,
    },
}

/// Header describing the run a log belongs to.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub id: String,
    pub task: String,
    pub strategy: String,
    pub state: AgentState,
    pub iterations: u32,
    pub toolkit: Vec<String>,
    /// Redacted LLM settings (never the API key)
    pub llm: serde_json::Value,
}

/// Ordered log of everything a run did.
#[derive(Debug, Default)]
pub struct RunLog {
    entries: Vec<RunLogEntry>,
}

impl RunLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_reasoning(&mut self, step_number: u32, envelope: &ReasoningEnvelope) {
        self.entries.push(RunLogEntry::Reasoning {
            step_number,
            timestamp: Utc::now(),
            envelope: envelope.clone(),
        });
    }

    pub fn record_tool_execution(
        &mut self,
        step_number: u32,
        tool_name: &str,
        arguments: serde_json::Value,
        result: &str,
    ) {
        self.entries.push(RunLogEntry::ToolExecution {
            step_number,
            timestamp: Utc::now(),
            tool_name: tool_name.to_string(),
            arguments,
            result: result.to_string(),
        });
    }

    pub fn entries(&self) -> &[RunLogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Write the log as `{timestamp}-{id}-log.json` under `logs_dir`.
    /// Returns the written path, or `None` when persistence is disabled.
    pub fn persist(
        &self,
        logs_dir: Option<&Path>,
        summary: &RunSummary,
    ) -> std::io::Result<Option<PathBuf>> {
        let Some(dir) = logs_dir else {
            tracing::debug!(agent = %summary.id, "Run log persistence disabled");
            return Ok(None);
        };

        std::fs::create_dir_all(dir)?;
        let filename = format!(
            "{}-{}-log.json",
            Utc::now().format("%Y%m%d-%H%M%S"),
            summary.id
        );
        let path = dir.join(filename);

        let document = json!({
            "agent": summary,
            "steps": self.entries,
        });
        let bytes = serde_json::to_vec_pretty(&document).map_err(std::io::Error::other)?;
        std::fs::write(&path, bytes)?;

        tracing::info!(agent = %summary.id, path = %path.display(), "Run log saved");
        Ok(Some(path))
    }
}
