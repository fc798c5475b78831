//! Shared test fixtures: a scripted backend that replays canned responses.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use sgr_core::config::AgentConfig;
use sgr_core::error::ProviderError;
use sgr_core::message::{Message, MessageToolCall};
use sgr_core::provider::{CompletionBackend, CompletionRequest, CompletionResponse};
use sgr_core::relay::{NullRelay, StreamRelay};

use crate::runtime::AgentRuntime;

/// Replays queued responses in order; an exhausted script reports an empty
/// completion, which fails the run.
pub(crate) struct ScriptedBackend {
    responses: Mutex<VecDeque<CompletionResponse>>,
}

impl ScriptedBackend {
    pub(crate) fn new(responses: Vec<CompletionResponse>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
        }
    }
}

#[async_trait]
impl CompletionBackend for ScriptedBackend {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(
        &self,
        _request: CompletionRequest,
    ) -> Result<CompletionResponse, ProviderError> {
        let mut responses = self.responses.lock().unwrap();
        responses
            .pop_front()
            .ok_or_else(|| ProviderError::EmptyCompletion("script exhausted".into()))
    }
}

/// A structured-output response whose content is the serialized payload.
pub(crate) fn structured_response(payload: &serde_json::Value) -> CompletionResponse {
    CompletionResponse {
        message: Message::assistant(payload.to_string()),
        usage: None,
        model: "mock".into(),
    }
}

/// A native tool-call response, as the tool-calling strategies expect.
pub(crate) fn tool_call_response(
    id: &str,
    name: &str,
    arguments: &serde_json::Value,
) -> CompletionResponse {
    CompletionResponse {
        message: Message::assistant_with_tool_calls(
            "",
            vec![MessageToolCall {
                id: id.to_string(),
                name: name.to_string(),
                arguments: arguments.to_string(),
            }],
        ),
        usage: None,
        model: "mock".into(),
    }
}

/// A runtime wired to a scripted backend, the default toolkit and a null
/// relay.
pub(crate) fn scripted_runtime(responses: Vec<CompletionResponse>) -> AgentRuntime {
    scripted_runtime_with_relay(responses, Arc::new(NullRelay))
}

pub(crate) fn scripted_runtime_with_relay(
    responses: Vec<CompletionResponse>,
    relay: Arc<dyn StreamRelay>,
) -> AgentRuntime {
    AgentRuntime::new(
        "sgr_test".into(),
        "Research the question".into(),
        AgentConfig::default(),
        sgr_tools::default_toolkit(),
        Arc::new(ScriptedBackend::new(responses)),
        relay,
    )
}
