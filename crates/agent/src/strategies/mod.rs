//! Step strategies.
//!
//! A strategy implements exactly one turn of the loop: decide what to do
//! next against the current conversation, then execute one tool. The
//! driver owns everything around the turn (iteration counting, state
//! transitions, clarification suspension, teardown).

mod sgr;
mod sgr_tool_calling;
mod tool_calling;

pub use sgr::SgrStrategy;
pub use sgr_tool_calling::SgrToolCallingStrategy;
pub use tool_calling::ToolCallingStrategy;

use async_trait::async_trait;
use sgr_core::error::Result;
use sgr_core::message::{Message, MessageToolCall};
use sgr_core::tool::AgentTool;
use sgr_tools::final_answer::FinalAnswerTool;

use crate::runtime::AgentRuntime;

/// One decision-plus-action turn of the agent loop.
#[async_trait]
pub trait StepStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Run one turn. State transitions happen through `runtime.context`;
    /// a fatal error here fails the whole run.
    async fn step(&self, runtime: &mut AgentRuntime) -> Result<()>;
}

/// Execute the selected tool and record the exchange in the conversation.
///
/// The action turn is an assistant tool call followed by the matching
/// tool result, so the next completion sees what was done and why. The
/// assistant text carries the current plan step when one is known.
pub(crate) async fn run_action(
    runtime: &mut AgentRuntime,
    tool: Box<dyn AgentTool>,
) -> Result<()> {
    let call_id = runtime.action_call_id();
    let name = tool.name();
    let payload = tool.payload();
    let step = runtime
        .context
        .current_step_reasoning
        .as_ref()
        .map(|e| e.next_step().to_string())
        .unwrap_or_default();

    runtime.conversation.push(Message::assistant_with_tool_calls(
        step,
        vec![MessageToolCall {
            id: call_id.clone(),
            name: name.to_string(),
            arguments: payload.to_string(),
        }],
    ));
    runtime
        .relay
        .append_tool_call(&call_id, name, payload.clone());

    let result = tool
        .execute(&mut runtime.context, &runtime.config)
        .await?;

    runtime
        .conversation
        .push(Message::tool_result(&call_id, &result));
    runtime.relay.append_chunk(&format!("{result}\n"));
    runtime.log_tool_execution(name, &payload, &result);
    Ok(())
}

/// Conclude the run with a partial answer when the model's action could
/// not be honored (unknown tool, bad arguments, no tool call at all).
pub(crate) async fn fallback_final_answer(
    runtime: &mut AgentRuntime,
    reason: &str,
    answer: &str,
) -> Result<()> {
    tracing::warn!(
        agent = %runtime.id,
        iteration = runtime.context.iteration,
        reason,
        "Falling back to a partial final answer"
    );
    let tool = Box::new(FinalAnswerTool::fallback(reason, answer));
    run_action(runtime, tool).await
}
