//! Single-request schema-guided strategy.
//!
//! One completion per turn: the response format is the combined
//! envelope + action union schema, so the model reasons and picks its
//! next action in the same structured payload. The completion is
//! streamed, with every content delta forwarded to the relay as it
//! arrives.

use async_trait::async_trait;
use sgr_core::error::{AgentError, Result};
use sgr_core::message::Message;
use sgr_core::provider::CompletionRequest;

use crate::availability::available_tools;
use crate::next_step::NextStepSchemaBuilder;
use crate::runtime::AgentRuntime;
use crate::strategies::{fallback_final_answer, run_action, StepStrategy};

#[derive(Debug, Default)]
pub struct SgrStrategy;

#[async_trait]
impl StepStrategy for SgrStrategy {
    fn name(&self) -> &'static str {
        "sgr"
    }

    async fn step(&self, runtime: &mut AgentRuntime) -> Result<()> {
        let offered = available_tools(
            &runtime.toolkit,
            &runtime.context,
            &runtime.config.execution,
        );
        let schema = NextStepSchemaBuilder::build(&offered)?;

        let mut request =
            CompletionRequest::new(&runtime.config.llm.model, runtime.base_messages());
        request.temperature = runtime.config.llm.temperature;
        request.max_tokens = runtime.config.llm.max_tokens;
        request.response_format = Some(schema.as_schema_format());
        request.stream = true;

        let mut chunks = runtime.backend.stream(request).await?;
        let mut content = String::new();
        while let Some(chunk) = chunks.recv().await {
            let chunk = chunk?;
            if let Some(delta) = chunk.content {
                if !delta.is_empty() {
                    runtime.relay.append_chunk(&delta);
                    content.push_str(&delta);
                }
            }
            if chunk.done {
                break;
            }
        }

        let payload: serde_json::Value = serde_json::from_str(&content)
            .map_err(|e| AgentError::MalformedReasoning(e.to_string()))?;
        let envelope = schema.parse_envelope(&payload)?;

        // The decision becomes part of the conversation so later turns see
        // their own prior reasoning, not just the tool results.
        runtime
            .conversation
            .push(Message::assistant(payload.to_string()));
        runtime
            .relay
            .append_tool_call(&runtime.reasoning_call_id(), "next_step", payload.clone());
        runtime.log_reasoning(&envelope);
        runtime.context.current_step_reasoning = Some(envelope);

        match schema.resolve_tool(&payload) {
            Ok(tool) => run_action(runtime, tool).await,
            Err(err) => {
                let answer = runtime
                    .context
                    .current_step_reasoning
                    .as_ref()
                    .map(|e| e.current_situation.clone())
                    .unwrap_or_default();
                fallback_final_answer(
                    runtime,
                    &format!("action could not be resolved: {err}"),
                    &answer,
                )
                .await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{scripted_runtime, scripted_runtime_with_relay, structured_response};
    use serde_json::json;
    use sgr_core::context::AgentState;
    use sgr_core::error::Error;
    use sgr_core::relay::{AgentStreamEvent, ChannelRelay};
    use std::sync::Arc;

    fn decision(function: serde_json::Value) -> serde_json::Value {
        json!({
            "reasoning_steps": ["assess the task", "pick an action"],
            "current_situation": "starting research",
            "plan_status": "none",
            "enough_data": false,
            "remaining_steps": ["answer"],
            "task_completed": false,
            "function": function,
        })
    }

    #[tokio::test]
    async fn one_turn_reasons_then_acts() {
        let payload = decision(json!({
            "tool": "final_answer",
            "reasoning": "task is trivial",
            "answer": "42",
        }));
        let mut rt = scripted_runtime(vec![structured_response(&payload)]);
        rt.context.state = AgentState::Researching;
        rt.context.iteration = 1;

        SgrStrategy.step(&mut rt).await.unwrap();

        assert_eq!(rt.context.state, AgentState::Completed);
        assert_eq!(rt.context.execution_result.as_deref(), Some("42"));
        // decision turn + action call + tool result
        assert_eq!(rt.conversation.len(), 3);
        // the action turn records the plan step as assistant text
        assert_eq!(rt.conversation[1].content, "answer");
        assert!(rt.context.current_step_reasoning.is_some());
        assert_eq!(rt.run_log.len(), 2);
    }

    #[tokio::test]
    async fn the_decision_streams_through_the_relay() {
        let payload = decision(json!({
            "tool": "final_answer",
            "reasoning": "task is trivial",
            "answer": "42",
        }));
        let (relay, mut events) = ChannelRelay::new();
        let mut rt = scripted_runtime_with_relay(
            vec![structured_response(&payload)],
            Arc::new(relay),
        );
        rt.context.state = AgentState::Researching;
        rt.context.iteration = 1;

        SgrStrategy.step(&mut rt).await.unwrap();

        // Content deltas arrive before the committed decision event, and
        // together they reconstruct the decision payload.
        let mut streamed = String::new();
        let decision_event = loop {
            match events.try_recv().unwrap() {
                AgentStreamEvent::Chunk { content } => streamed.push_str(&content),
                other => break other,
            }
        };
        assert_eq!(
            serde_json::from_str::<serde_json::Value>(&streamed).unwrap(),
            payload
        );
        assert!(matches!(
            decision_event,
            AgentStreamEvent::ToolCall { ref name, .. } if name == "next_step"
        ));
    }

    #[tokio::test]
    async fn unknown_action_falls_back_to_partial_answer() {
        let payload = decision(json!({"tool": "teleport", "reasoning": "x"}));
        let mut rt = scripted_runtime(vec![structured_response(&payload)]);
        rt.context.state = AgentState::Researching;
        rt.context.iteration = 1;

        SgrStrategy.step(&mut rt).await.unwrap();

        assert_eq!(rt.context.state, AgentState::Completed);
        assert_eq!(
            rt.context.execution_result.as_deref(),
            Some("starting research")
        );
    }

    #[tokio::test]
    async fn non_json_content_is_fatal() {
        let mut rt = scripted_runtime(vec![structured_response_text("not json at all")]);
        rt.context.state = AgentState::Researching;
        rt.context.iteration = 1;

        let err = SgrStrategy.step(&mut rt).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Agent(AgentError::MalformedReasoning(_))
        ));
    }

    fn structured_response_text(content: &str) -> sgr_core::provider::CompletionResponse {
        sgr_core::provider::CompletionResponse {
            message: Message::assistant(content),
            usage: None,
            model: "mock".into(),
        }
    }
}
