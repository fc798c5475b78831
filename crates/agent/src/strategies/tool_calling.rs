//! Native tool-calling strategy.
//!
//! No envelope: the available tools are exposed through the provider's
//! native tool-calling API with a required tool choice, and whatever call
//! comes back is executed. Any response the loop cannot honor degrades to
//! a partial final answer instead of failing the run.

use async_trait::async_trait;
use sgr_core::error::Result;
use sgr_core::provider::{CompletionRequest, ToolChoice};

use crate::availability::available_tools;
use crate::runtime::AgentRuntime;
use crate::strategies::{fallback_final_answer, run_action, StepStrategy};

#[derive(Debug, Default)]
pub struct ToolCallingStrategy;

#[async_trait]
impl StepStrategy for ToolCallingStrategy {
    fn name(&self) -> &'static str {
        "tool_calling"
    }

    async fn step(&self, runtime: &mut AgentRuntime) -> Result<()> {
        let offered = available_tools(
            &runtime.toolkit,
            &runtime.context,
            &runtime.config.execution,
        );

        let mut request =
            CompletionRequest::new(&runtime.config.llm.model, runtime.base_messages());
        request.temperature = runtime.config.llm.temperature;
        request.max_tokens = runtime.config.llm.max_tokens;
        request.tools = offered.iter().map(|d| d.to_definition()).collect();
        request.tool_choice = ToolChoice::Required;

        let response = runtime.backend.complete(request).await?;
        let message = response.message;

        let Some(call) = message.tool_calls.first() else {
            let answer = if message.content.trim().is_empty() {
                "Task completed.".to_string()
            } else {
                message.content.clone()
            };
            return fallback_final_answer(runtime, "model produced no tool call", &answer).await;
        };

        let Some(descriptor) = offered.iter().find(|d| d.name() == call.name) else {
            return fallback_final_answer(
                runtime,
                &format!("model called unavailable tool '{}'", call.name),
                &message.content,
            )
            .await;
        };

        let arguments: serde_json::Value = match serde_json::from_str(&call.arguments) {
            Ok(v) => v,
            Err(e) => {
                return fallback_final_answer(
                    runtime,
                    &format!("tool arguments were not valid JSON: {e}"),
                    &message.content,
                )
                .await;
            }
        };

        match descriptor.parse_args(arguments) {
            Ok(tool) => run_action(runtime, tool).await,
            Err(err) => {
                fallback_final_answer(
                    runtime,
                    &format!("tool arguments were rejected: {err}"),
                    &message.content,
                )
                .await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{scripted_runtime, structured_response, tool_call_response};
    use serde_json::json;
    use sgr_core::context::AgentState;

    #[tokio::test]
    async fn executes_the_returned_tool_call() {
        let mut rt = scripted_runtime(vec![tool_call_response(
            "call_1",
            "generate_plan",
            &json!({
                "reasoning": "need a plan first",
                "research_goal": "answer the question",
                "planned_steps": ["search", "read", "answer"],
            }),
        )]);
        rt.context.state = AgentState::Researching;
        rt.context.iteration = 1;

        ToolCallingStrategy.step(&mut rt).await.unwrap();

        assert_eq!(rt.context.plan.len(), 3);
        assert_eq!(rt.context.state, AgentState::Researching);
        assert_eq!(rt.conversation.len(), 2);
    }

    #[tokio::test]
    async fn missing_tool_call_concludes_with_the_content() {
        let mut rt = scripted_runtime(vec![structured_response(&json!("ignored"))]);
        // structured_response carries plain content, no tool calls
        rt.context.state = AgentState::Researching;
        rt.context.iteration = 1;

        ToolCallingStrategy.step(&mut rt).await.unwrap();

        assert_eq!(rt.context.state, AgentState::Completed);
        assert!(rt.context.execution_result.is_some());
    }

    #[tokio::test]
    async fn unavailable_tool_concludes_partially() {
        let mut rt = scripted_runtime(vec![tool_call_response(
            "call_1",
            "teleport",
            &json!({}),
        )]);
        rt.context.state = AgentState::Researching;
        rt.context.iteration = 1;

        ToolCallingStrategy.step(&mut rt).await.unwrap();
        assert_eq!(rt.context.state, AgentState::Completed);
    }

    #[tokio::test]
    async fn invalid_arguments_conclude_partially() {
        let mut rt = scripted_runtime(vec![tool_call_response(
            "call_1",
            "generate_plan",
            &json!({"reasoning": 7}),
        )]);
        rt.context.state = AgentState::Researching;
        rt.context.iteration = 1;

        ToolCallingStrategy.step(&mut rt).await.unwrap();
        assert_eq!(rt.context.state, AgentState::Completed);
        assert!(rt.context.plan.is_empty());
    }
}
