//! Two-phase, context-budgeted strategy.
//!
//! Each turn makes two completions. The reasoning phase constrains the
//! response to the bare envelope schema and records the assessment as a
//! forced `reasoning` tool exchange. The action phase offers the available
//! tools by name and executes the selection. Both phases run over the
//! reduced conversation, so long runs stay inside the character budget.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use sgr_core::error::{AgentError, Result};
use sgr_core::message::{Message, MessageToolCall};
use sgr_core::provider::{CompletionRequest, SchemaFormat};
use sgr_core::tool::AgentTool;
use sgr_tools::reasoning::{self, ReasoningTool};

use crate::availability::available_tools;
use crate::reduction::reduce;
use crate::runtime::AgentRuntime;
use crate::strategies::{fallback_final_answer, run_action, StepStrategy};

/// The action phase's structured output: a tool picked by name plus its
/// arguments.
#[derive(Debug, Deserialize)]
struct ToolSelection {
    tool_name: String,
    #[serde(default)]
    tool_args: serde_json::Value,
}

#[derive(Debug, Default)]
pub struct SgrToolCallingStrategy;

#[async_trait]
impl StepStrategy for SgrToolCallingStrategy {
    fn name(&self) -> &'static str {
        "sgr_tool_calling"
    }

    async fn step(&self, runtime: &mut AgentRuntime) -> Result<()> {
        self.reasoning_phase(runtime).await?;
        self.action_phase(runtime).await
    }
}

impl SgrToolCallingStrategy {
    async fn reasoning_phase(&self, runtime: &mut AgentRuntime) -> Result<()> {
        let mut request = self.budgeted_request(runtime);
        request.response_format = Some(SchemaFormat {
            name: "reasoning".into(),
            schema: reasoning::envelope_schema(),
            strict: true,
        });

        let response = runtime.backend.complete(request).await?;
        let payload = extract_json(&response.message.content).ok_or_else(|| {
            AgentError::MalformedReasoning("reasoning response carried no JSON object".into())
        })?;
        let tool: ReasoningTool = serde_json::from_value(payload.clone())
            .map_err(|e| AgentError::MalformedReasoning(e.to_string()))?;

        // Record the phase as a forced tool exchange so the action phase
        // (and every later turn) sees the assessment in the conversation.
        // The assistant text is the step the model plans to take next.
        let call_id = runtime.reasoning_call_id();
        runtime.conversation.push(Message::assistant_with_tool_calls(
            tool.envelope.next_step(),
            vec![MessageToolCall {
                id: call_id.clone(),
                name: reasoning::NAME.to_string(),
                arguments: payload.to_string(),
            }],
        ));
        runtime
            .relay
            .append_tool_call(&call_id, reasoning::NAME, payload);

        let envelope = tool.envelope.clone();
        let ack = tool
            .execute(&mut runtime.context, &runtime.config)
            .await?;
        runtime.conversation.push(Message::tool_result(&call_id, &ack));
        runtime.log_reasoning(&envelope);
        Ok(())
    }

    async fn action_phase(&self, runtime: &mut AgentRuntime) -> Result<()> {
        let offered = available_tools(
            &runtime.toolkit,
            &runtime.context,
            &runtime.config.execution,
        );
        let names: Vec<&str> = offered.iter().map(|d| d.name()).collect();

        let mut request = self.budgeted_request(runtime);
        request.response_format = Some(SchemaFormat {
            name: "select_tool".into(),
            schema: json!({
                "type": "object",
                "properties": {
                    "tool_name": {
                        "type": "string",
                        "enum": names,
                        "description": "The tool to execute next"
                    },
                    "tool_args": {
                        "type": "object",
                        "description": "Arguments for the selected tool"
                    }
                },
                "required": ["tool_name", "tool_args"],
                "additionalProperties": false
            }),
            strict: true,
        });

        let response = runtime.backend.complete(request).await?;
        let Some(payload) = extract_json(&response.message.content) else {
            return fallback_final_answer(
                runtime,
                "tool selection carried no JSON object",
                &response.message.content,
            )
            .await;
        };
        let selection: ToolSelection = match serde_json::from_value(payload) {
            Ok(s) => s,
            Err(e) => {
                return fallback_final_answer(
                    runtime,
                    &format!("tool selection did not match the schema: {e}"),
                    &response.message.content,
                )
                .await;
            }
        };

        let Some(descriptor) = offered.iter().find(|d| d.name() == selection.tool_name) else {
            return fallback_final_answer(
                runtime,
                &format!("model selected unavailable tool '{}'", selection.tool_name),
                &response.message.content,
            )
            .await;
        };

        match descriptor.parse_args(selection.tool_args) {
            Ok(tool) => run_action(runtime, tool).await,
            Err(err) => {
                fallback_final_answer(
                    runtime,
                    &format!("tool arguments were rejected: {err}"),
                    &response.message.content,
                )
                .await
            }
        }
    }

    fn budgeted_request(&self, runtime: &AgentRuntime) -> CompletionRequest {
        let messages = reduce(runtime.base_messages(), &runtime.config.execution.reduction);
        let mut request = CompletionRequest::new(&runtime.config.llm.model, messages);
        request.temperature = runtime.config.llm.temperature;
        request.max_tokens = runtime.config.llm.max_tokens;
        request
    }
}

/// Pull the JSON object out of a structured response, tolerating markdown
/// fences and prose around it.
fn extract_json(content: &str) -> Option<serde_json::Value> {
    let trimmed = content.trim();
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(trimmed) {
        if value.is_object() {
            return Some(value);
        }
    }

    let stripped = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .map(str::trim);
    if let Some(inner) = stripped {
        if let Ok(value) = serde_json::from_str::<serde_json::Value>(inner) {
            if value.is_object() {
                return Some(value);
            }
        }
    }

    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    if end <= start {
        return None;
    }
    serde_json::from_str(&trimmed[start..=end])
        .ok()
        .filter(serde_json::Value::is_object)
}
