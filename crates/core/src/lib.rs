//! # sgr-core
//!
//! Core domain types and traits for the SGR agent framework:
//!
//! - [`message`] — conversation messages and tool calls
//! - [`provider`] — the `CompletionBackend` abstraction over LLM endpoints
//! - [`tool`] — the `AgentTool` trait, descriptors, and the toolkit
//! - [`context`] — the agent state machine and per-run context
//! - [`config`] — configuration objects passed through the loop
//! - [`relay`] — streaming observation of in-flight runs
//! - [`error`] — error types per bounded context
//!
//! This crate has no I/O beyond the traits it defines; concrete backends,
//! tools, and the loop itself live in the sibling crates.

pub mod config;
pub mod context;
pub mod error;
pub mod message;
pub mod provider;
pub mod relay;
pub mod tool;

pub use config::{AgentConfig, ExecutionConfig, LlmConfig, PromptsConfig, ReductionConfig};
pub use context::{AgentContext, AgentState, ReasoningEnvelope};
pub use error::{AgentError, Error, ProviderError, Result, ToolError};
pub use message::{Message, MessageToolCall, Role};
pub use provider::{
    CompletionBackend, CompletionRequest, CompletionResponse, SchemaFormat, StreamChunk,
    ToolChoice, ToolDefinition, Usage,
};
pub use relay::{AgentStreamEvent, ChannelRelay, NullRelay, StreamRelay};
pub use tool::{AgentTool, ToolDescriptor, Toolkit};
