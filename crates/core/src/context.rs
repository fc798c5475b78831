//! Agent execution state: the state machine, the per-run context, and the
//! reasoning envelope the model fills in every turn.

use serde::{Deserialize, Serialize};

/// Lifecycle states of a single agent run.
///
/// `Inited → Researching ⇄ WaitingForClarification → Completed | Failed`.
/// `Completed` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentState {
    /// Constructed, not yet started
    Inited,
    /// Actively reasoning and executing tools
    Researching,
    /// Suspended until the caller provides a clarification
    WaitingForClarification,
    /// Finished with a final answer
    Completed,
    /// Finished by error
    Failed,
}

impl AgentState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, AgentState::Completed | AgentState::Failed)
    }
}

impl std::fmt::Display for AgentState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AgentState::Inited => "inited",
            AgentState::Researching => "researching",
            AgentState::WaitingForClarification => "waiting_for_clarification",
            AgentState::Completed => "completed",
            AgentState::Failed => "failed",
        };
        write!(f, "{s}")
    }
}

/// The structured self-assessment the model produces each turn before
/// selecting an action.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReasoningEnvelope {
    /// Step-by-step reasoning trace for this turn
    #[serde(default)]
    pub reasoning_steps: Vec<String>,

    /// One-line summary of where the task stands
    #[serde(default)]
    pub current_situation: String,

    /// Whether the plan is on track, adapted, or not yet formed
    #[serde(default)]
    pub plan_status: String,

    /// Whether enough data has been gathered to answer
    #[serde(default)]
    pub enough_data: bool,

    /// Steps the model still intends to take, next one first
    #[serde(default)]
    pub remaining_steps: Vec<String>,

    /// Whether the model considers the task done
    #[serde(default)]
    pub task_completed: bool,
}

impl ReasoningEnvelope {
    /// The next planned step, used as the human-readable summary of this
    /// turn's decision.
    pub fn next_step(&self) -> &str {
        self.remaining_steps
            .first()
            .map(String::as_str)
            .unwrap_or("finalize")
    }
}

/// Mutable per-run state shared between the loop and the tools.
///
/// Tools mutate this during their action phase: searches bump
/// `searches_used`, planning tools replace `plan`, the final-answer tool
/// completes the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentContext {
    /// Current state in the lifecycle
    pub state: AgentState,

    /// Monotonically increasing turn counter
    pub iteration: u32,

    /// Searches performed so far
    pub searches_used: u32,

    /// Clarification round-trips completed so far
    pub clarifications_used: u32,

    /// The most recent reasoning envelope
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_step_reasoning: Option<ReasoningEnvelope>,

    /// The final answer, set once the run completes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_result: Option<String>,

    /// The current research plan, replaced wholesale by planning tools
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub plan: Vec<String>,

    /// Queries already sent to the search tool, in order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub searched_queries: Vec<String>,

    /// Questions posed by the clarification tool, pending an answer
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pending_questions: Vec<String>,

    /// A long-form report produced by the report tool, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report: Option<String>,
}

impl AgentContext {
    pub fn new() -> Self {
        Self {
            state: AgentState::Inited,
            iteration: 0,
            searches_used: 0,
            clarifications_used: 0,
            current_step_reasoning: None,
            execution_result: None,
            plan: Vec::new(),
            searched_queries: Vec::new(),
            pending_questions: Vec::new(),
            report: None,
        }
    }

    /// Record the final answer and move to the terminal Completed state.
    pub fn complete(&mut self, answer: impl Into<String>) {
        self.execution_result = Some(answer.into());
        self.state = AgentState::Completed;
    }

    /// Move to the terminal Failed state, keeping whatever partial result
    /// exists.
    pub fn fail(&mut self) {
        self.state = AgentState::Failed;
    }
}

impl Default for AgentContext {
    fn default() -> Self {
        Self::new()
    }
}
