//! Shared per-run machinery used by every strategy.
//!
//! `AgentRuntime` owns the conversation, the mutable context, the toolkit
//! and the backend for one run. Strategies borrow it mutably for a single
//! turn and leave the state transitions to the driver.

use std::sync::Arc;

use chrono::Utc;
use sgr_core::config::AgentConfig;
use sgr_core::context::{AgentContext, AgentState, ReasoningEnvelope};
use sgr_core::error::AgentError;
use sgr_core::message::Message;
use sgr_core::provider::CompletionBackend;
use sgr_core::relay::StreamRelay;
use sgr_core::tool::Toolkit;
use tokio::sync::{mpsc, watch};

use crate::runlog::RunLog;

/// Longest tool result / reasoning preview echoed to the console log.
const LOG_PREVIEW_CHARS: usize = 400;

/// Everything a strategy needs to run one turn.
pub struct AgentRuntime {
    pub id: String,
    pub task: String,
    pub config: AgentConfig,
    pub toolkit: Toolkit,
    pub backend: Arc<dyn CompletionBackend>,
    pub relay: Arc<dyn StreamRelay>,
    pub context: AgentContext,
    /// Turns appended since the initial request, oldest first
    pub conversation: Vec<Message>,
    pub run_log: RunLog,
}

impl AgentRuntime {
    pub fn new(
        id: String,
        task: String,
        config: AgentConfig,
        toolkit: Toolkit,
        backend: Arc<dyn CompletionBackend>,
        relay: Arc<dyn StreamRelay>,
    ) -> Self {
        Self {
            id,
            task,
            config,
            toolkit,
            backend,
            relay,
            context: AgentContext::new(),
            conversation: Vec::new(),
            run_log: RunLog::new(),
        }
    }

    /// The full prompt for the next completion: system prompt rendered
    /// against the whole toolkit, the initial request, then the recorded
    /// conversation.
    pub fn base_messages(&self) -> Vec<Message> {
        let system = self.config.prompts.render_system_prompt(
            self.toolkit
                .descriptors()
                .iter()
                .map(|d| (d.name(), d.description())),
        );
        let initial = self
            .config
            .prompts
            .render_initial_request(&self.task, &Utc::now().format("%Y-%m-%d").to_string());

        let mut messages = Vec::with_capacity(self.conversation.len() + 2);
        messages.push(Message::system(system));
        messages.push(Message::user(initial));
        messages.extend(self.conversation.iter().cloned());
        messages
    }

    /// Call id for the reasoning phase of the current iteration.
    pub fn reasoning_call_id(&self) -> String {
        format!("{}-reasoning", self.context.iteration)
    }

    /// Call id for the action phase of the current iteration.
    pub fn action_call_id(&self) -> String {
        format!("{}-action", self.context.iteration)
    }

    pub fn log_reasoning(&mut self, envelope: &ReasoningEnvelope) {
        tracing::info!(
            agent = %self.id,
            iteration = self.context.iteration,
            next_step = %envelope.next_step(),
            enough_data = envelope.enough_data,
            situation = %preview(&envelope.current_situation),
            "Reasoning phase"
        );
        self.run_log
            .record_reasoning(self.context.iteration, envelope);
    }

    pub fn log_tool_execution(
        &mut self,
        tool_name: &str,
        arguments: &serde_json::Value,
        result: &str,
    ) {
        tracing::info!(
            agent = %self.id,
            iteration = self.context.iteration,
            tool = tool_name,
            result = %preview(result),
            "Tool executed"
        );
        self.run_log.record_tool_execution(
            self.context.iteration,
            tool_name,
            arguments.clone(),
            result,
        );
    }
}

fn preview(text: &str) -> String {
    if text.chars().count() <= LOG_PREVIEW_CHARS {
        return text.to_string();
    }
    let cut: String = text.chars().take(LOG_PREVIEW_CHARS).collect();
    format!("{cut}...")
}

/// Driver-side half of the clarification channel.
///
/// The loop publishes state changes and blocks on `next_answer` while the
/// run is suspended.
pub struct ClarificationGate {
    state_tx: watch::Sender<AgentState>,
    answers: mpsc::UnboundedReceiver<String>,
}

/// Caller-side half: observe the run state and feed answers in.
#[derive(Clone)]
pub struct ClarificationHandle {
    state_rx: watch::Receiver<AgentState>,
    answers: mpsc::UnboundedSender<String>,
}

impl ClarificationGate {
    pub fn pair() -> (ClarificationGate, ClarificationHandle) {
        let (state_tx, state_rx) = watch::channel(AgentState::Inited);
        let (answer_tx, answer_rx) = mpsc::unbounded_channel();
        (
            ClarificationGate {
                state_tx,
                answers: answer_rx,
            },
            ClarificationHandle {
                state_rx,
                answers: answer_tx,
            },
        )
    }

    /// Broadcast the current run state to all handles.
    pub fn publish_state(&self, state: AgentState) {
        // Only fails when every handle is gone; nothing to notify then.
        let _ = self.state_tx.send(state);
    }

    /// Wait for the next clarification answer. `None` means every handle
    /// was dropped and no answer can ever arrive.
    pub async fn next_answer(&mut self) -> Option<String> {
        self.answers.recv().await
    }
}

impl ClarificationHandle {
    /// The last state the run published.
    pub fn state(&self) -> AgentState {
        *self.state_rx.borrow()
    }

    /// Submit an answer to a suspended run. Rejected unless the run is
    /// currently waiting for clarification.
    pub fn provide(&self, answer: impl Into<String>) -> Result<(), AgentError> {
        let state = self.state();
        if state != AgentState::WaitingForClarification {
            return Err(AgentError::NotWaitingForClarification {
                state: state.to_string(),
            });
        }
        self.answers
            .send(answer.into())
            .map_err(|_| AgentError::ClarificationChannelClosed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sgr_core::relay::NullRelay;
    use sgr_core::provider::{CompletionRequest, CompletionResponse};
    use sgr_core::error::ProviderError;
    use async_trait::async_trait;

    struct NoBackend;

    #[async_trait]
    impl CompletionBackend for NoBackend {
        fn name(&self) -> &str {
            "none"
        }

        async fn complete(
            &self,
            _request: CompletionRequest,
        ) -> Result<CompletionResponse, ProviderError> {
            Err(ProviderError::EmptyCompletion("no backend".into()))
        }
    }

    fn runtime() -> AgentRuntime {
        AgentRuntime::new(
            "sgr_test".into(),
            "Find the answer".into(),
            AgentConfig::default(),
            sgr_tools::default_toolkit(),
            Arc::new(NoBackend),
            Arc::new(NullRelay),
        )
    }

    #[test]
    fn base_messages_start_with_system_and_task() {
        let mut rt = runtime();
        rt.conversation.push(Message::assistant("working on it"));

        let messages = rt.base_messages();
        assert_eq!(messages.len(), 3);
        assert!(messages[0].is_system());
        assert!(messages[0].content.contains("web_search"));
        assert!(messages[1].content.contains("Find the answer"));
        assert_eq!(messages[2].content, "working on it");
    }

    #[test]
    fn call_ids_follow_the_iteration() {
        let mut rt = runtime();
        rt.context.iteration = 3;
        assert_eq!(rt.reasoning_call_id(), "3-reasoning");
        assert_eq!(rt.action_call_id(), "3-action");
    }

    #[test]
    fn log_helpers_record_into_the_run_log() {
        let mut rt = runtime();
        rt.context.iteration = 1;
        rt.log_reasoning(&ReasoningEnvelope::default());
        rt.log_tool_execution("web_search", &serde_json::json!({"query": "x"}), "results");
        assert_eq!(rt.run_log.len(), 2);
    }

    #[test]
    fn preview_truncates_long_text_by_chars() {
        let long = "🦀".repeat(LOG_PREVIEW_CHARS + 10);
        let short = preview(&long);
        assert!(short.ends_with("..."));
        assert_eq!(short.chars().count(), LOG_PREVIEW_CHARS + 3);
        assert_eq!(preview("short"), "short");
    }

    #[test]
    fn provide_rejected_outside_waiting_state() {
        let (gate, handle) = ClarificationGate::pair();
        gate.publish_state(AgentState::Researching);
        let err = handle.provide("answer").unwrap_err();
        assert!(matches!(
            err,
            AgentError::NotWaitingForClarification { ref state } if state == "researching"
        ));
    }

    #[tokio::test]
    async fn provide_delivers_while_waiting() {
        let (mut gate, handle) = ClarificationGate::pair();
        gate.publish_state(AgentState::WaitingForClarification);
        handle.provide("use the 2024 data").unwrap();
        assert_eq!(gate.next_answer().await.as_deref(), Some("use the 2024 data"));
    }

    #[tokio::test]
    async fn next_answer_ends_when_handles_drop() {
        let (mut gate, handle) = ClarificationGate::pair();
        gate.publish_state(AgentState::WaitingForClarification);
        drop(handle);
        assert_eq!(gate.next_answer().await, None);
    }
}
