//! # sgr-providers
//!
//! LLM backend implementations for the SGR agent framework.
//!
//! `OpenAiCompatBackend` covers every endpoint exposing an OpenAI-style
//! `/chat/completions` route, which is all the loop needs: the strategies
//! drive backends purely through `tool_choice` and `response_format`.

pub mod openai_compat;

pub use openai_compat::OpenAiCompatBackend;
