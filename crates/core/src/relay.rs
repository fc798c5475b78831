//! Streaming relay — how the loop surfaces progress to an observer.
//!
//! The loop never blocks on the consumer: `ChannelRelay` pushes events into
//! an unbounded channel, `NullRelay` drops everything. Relay errors (a
//! dropped receiver) are swallowed; observation must never fail a run.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// Events emitted by the agent while a run is in flight.
///
/// - `chunk`      — human-readable progress or tool output text
/// - `tool_call`  — the agent committed to a tool invocation
/// - `done`       — a turn boundary (`result: null`, emitted when the run
///   suspends for clarification) or the end of the run (`result` carries the
///   final answer, if any)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AgentStreamEvent {
    /// Progress text.
    Chunk { content: String },

    /// The agent is invoking a tool.
    ToolCall {
        id: String,
        name: String,
        arguments: serde_json::Value,
    },

    /// The stream (or a clarification-bounded segment of it) is complete.
    Done { result: Option<String> },
}

impl AgentStreamEvent {
    /// SSE event name for this event type.
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::Chunk { .. } => "chunk",
            Self::ToolCall { .. } => "tool_call",
            Self::Done { .. } => "done",
        }
    }
}

/// Sink for stream events. Implementations must be non-blocking.
pub trait StreamRelay: Send + Sync {
    /// Append progress text.
    fn append_chunk(&self, content: &str);

    /// Record a committed tool invocation.
    fn append_tool_call(&self, id: &str, name: &str, arguments: serde_json::Value);

    /// Close the current segment. `None` marks a clarification suspension;
    /// `Some` carries the final result at the end of the run.
    fn finish(&self, result: Option<&str>);
}

/// Relay that forwards events over an unbounded mpsc channel.
pub struct ChannelRelay {
    tx: mpsc::UnboundedSender<AgentStreamEvent>,
}

impl ChannelRelay {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<AgentStreamEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl StreamRelay for ChannelRelay {
    fn append_chunk(&self, content: &str) {
        let _ = self.tx.send(AgentStreamEvent::Chunk {
            content: content.to_string(),
        });
    }

    fn append_tool_call(&self, id: &str, name: &str, arguments: serde_json::Value) {
        let _ = self.tx.send(AgentStreamEvent::ToolCall {
            id: id.to_string(),
            name: name.to_string(),
            arguments,
        });
    }

    fn finish(&self, result: Option<&str>) {
        let _ = self.tx.send(AgentStreamEvent::Done {
            result: result.map(str::to_string),
        });
    }
}

/// Relay that discards all events.
pub struct NullRelay;

impl StreamRelay for NullRelay {
    fn append_chunk(&self, _content: &str) {}
    fn append_tool_call(&self, _id: &str, _name: &str, _arguments: serde_json::Value) {}
    fn finish(&self, _result: Option<&str>) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_serialization_chunk() {
        let event = AgentStreamEvent::Chunk {
            content: "Searching...".into(),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains(r#""type":"chunk""#));
        assert!(json.contains(r#""content":"Searching...""#));
    }

    #[test]
    fn event_serialization_tool_call() {
        let event = AgentStreamEvent::ToolCall {
            id: "1-action".into(),
            name: "web_search".into(),
            arguments: serde_json::json!({"query": "rust"}),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains(r#""type":"tool_call""#));
        assert!(json.contains(r#""name":"web_search""#));
    }

    #[test]
    fn event_type_names() {
        assert_eq!(
            AgentStreamEvent::Done { result: None }.event_type(),
            "done"
        );
        assert_eq!(
            AgentStreamEvent::Chunk { content: "x".into() }.event_type(),
            "chunk"
        );
    }

    #[tokio::test]
    async fn channel_relay_forwards_events_in_order() {
        let (relay, mut rx) = ChannelRelay::new();
        relay.append_chunk("working");
        relay.append_tool_call("1-action", "web_search", serde_json::json!({}));
        relay.finish(Some("answer"));

        match rx.recv().await.unwrap() {
            AgentStreamEvent::Chunk { content } => assert_eq!(content, "working"),
            other => panic!("unexpected event: {other:?}"),
        }
        match rx.recv().await.unwrap() {
            AgentStreamEvent::ToolCall { name, .. } => assert_eq!(name, "web_search"),
            other => panic!("unexpected event: {other:?}"),
        }
        match rx.recv().await.unwrap() {
            AgentStreamEvent::Done { result } => assert_eq!(result.as_deref(), Some("answer")),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn relay_survives_dropped_receiver() {
        let (relay, rx) = ChannelRelay::new();
        drop(rx);
        relay.append_chunk("nobody listening");
        relay.finish(None);
    }
}
