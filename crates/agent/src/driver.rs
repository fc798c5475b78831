//! The agent loop.
//!
//! `Agent` owns a runtime and a strategy and drives turns until a terminal
//! state: each turn the strategy reasons and acts, then the driver handles
//! clarification suspension, the iteration cap, and teardown (final state
//! broadcast, stream close, run-log persistence).

use std::sync::Arc;

use serde::Serialize;
use sgr_core::config::AgentConfig;
use sgr_core::context::AgentState;
use sgr_core::error::{AgentError, Error};
use sgr_core::message::Message;
use sgr_core::provider::CompletionBackend;
use sgr_core::relay::StreamRelay;
use sgr_core::tool::Toolkit;
use uuid::Uuid;

use crate::runlog::RunSummary;
use crate::runtime::{AgentRuntime, ClarificationGate, ClarificationHandle};
use crate::strategies::StepStrategy;

/// How a finished run looked from the outside.
#[derive(Debug, Clone, Serialize)]
pub struct AgentReport {
    pub id: String,
    pub state: AgentState,
    pub execution_result: Option<String>,
    pub iterations: u32,
    pub searches_used: u32,
    pub clarifications_used: u32,
}

/// One task, one strategy, one run.
pub struct Agent {
    runtime: AgentRuntime,
    strategy: Box<dyn StepStrategy>,
    gate: ClarificationGate,
    handle: ClarificationHandle,
}

impl Agent {
    pub fn new(
        task: impl Into<String>,
        config: AgentConfig,
        toolkit: Toolkit,
        backend: Arc<dyn CompletionBackend>,
        relay: Arc<dyn StreamRelay>,
        strategy: Box<dyn StepStrategy>,
    ) -> Self {
        let id = format!("{}_{}", strategy.name(), Uuid::new_v4());
        let (gate, handle) = ClarificationGate::pair();
        Self {
            runtime: AgentRuntime::new(id, task.into(), config, toolkit, backend, relay),
            strategy,
            gate,
            handle,
        }
    }

    pub fn id(&self) -> &str {
        &self.runtime.id
    }

    pub fn task(&self) -> &str {
        &self.runtime.task
    }

    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    /// A handle for observing the run state and answering clarification
    /// requests from outside the loop.
    pub fn clarifications(&self) -> ClarificationHandle {
        self.handle.clone()
    }

    /// Run the loop to a terminal state and return the report.
    pub async fn execute(self) -> AgentReport {
        let Agent {
            mut runtime,
            strategy,
            mut gate,
            handle,
        } = self;
        // The loop must see the answer channel close when every external
        // handle is gone, so the agent's own handle is dropped here.
        drop(handle);

        tracing::info!(
            agent = %runtime.id,
            strategy = strategy.name(),
            task = %runtime.task,
            "Agent run started"
        );
        runtime.context.state = AgentState::Researching;
        gate.publish_state(AgentState::Researching);

        let hard_cap =
            runtime.config.execution.max_iterations + runtime.config.execution.wrap_up_turns;

        let outcome: Result<(), Error> = loop {
            if runtime.context.state.is_terminal() {
                break Ok(());
            }
            if runtime.context.iteration >= hard_cap {
                break Err(AgentError::IterationLimitExceeded {
                    iterations: runtime.context.iteration,
                }
                .into());
            }
            runtime.context.iteration += 1;

            if let Err(err) = strategy.step(&mut runtime).await {
                break Err(err);
            }

            if runtime.context.state == AgentState::WaitingForClarification {
                if let Err(err) = await_clarification(&mut runtime, &mut gate).await {
                    break Err(err);
                }
            }
        };

        if let Err(err) = outcome {
            tracing::error!(
                agent = %runtime.id,
                iteration = runtime.context.iteration,
                error = %err,
                "Agent run failed"
            );
            runtime.context.fail();
        }

        teardown(runtime, strategy.name(), &gate)
    }
}

/// Suspend until the caller answers the pending questions, then resume
/// research with the answer appended as a user turn.
async fn await_clarification(
    runtime: &mut AgentRuntime,
    gate: &mut ClarificationGate,
) -> Result<(), Error> {
    tracing::info!(
        agent = %runtime.id,
        questions = runtime.context.pending_questions.len(),
        "Waiting for clarification"
    );
    // Publish the state before closing the stream segment, so a caller
    // reacting to the segment end already observes the waiting state.
    gate.publish_state(AgentState::WaitingForClarification);
    runtime.relay.finish(None);

    let Some(answer) = gate.next_answer().await else {
        return Err(AgentError::ClarificationChannelClosed.into());
    };

    let turn = runtime.config.prompts.render_clarification(&answer);
    runtime.conversation.push(Message::user(turn));
    runtime.context.clarifications_used += 1;
    runtime.context.pending_questions.clear();
    runtime.context.state = AgentState::Researching;
    gate.publish_state(AgentState::Researching);
    Ok(())
}

fn teardown(runtime: AgentRuntime, strategy: &str, gate: &ClarificationGate) -> AgentReport {
    let context = &runtime.context;
    gate.publish_state(context.state);
    runtime.relay.finish(context.execution_result.as_deref());

    let summary = RunSummary {
        id: runtime.id.clone(),
        task: runtime.task.clone(),
        strategy: strategy.to_string(),
        state: context.state,
        iterations: context.iteration,
        toolkit: runtime
            .toolkit
            .names()
            .iter()
            .map(|n| n.to_string())
            .collect(),
        llm: runtime.config.llm.redacted(),
    };
    if let Err(err) = runtime
        .run_log
        .persist(runtime.config.execution.logs_dir.as_deref(), &summary)
    {
        tracing::warn!(agent = %runtime.id, error = %err, "Run log not saved");
    }

    tracing::info!(
        agent = %runtime.id,
        state = %context.state,
        iterations = context.iteration,
        "Agent run finished"
    );
    AgentReport {
        id: runtime.id.clone(),
        state: context.state,
        execution_result: context.execution_result.clone(),
        iterations: context.iteration,
        searches_used: context.searches_used,
        clarifications_used: context.clarifications_used,
    }
}
