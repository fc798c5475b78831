//! # sgr-tools
//!
//! Built-in toolkit for the SGR agent framework. One module per tool, each
//! exposing a `descriptor()` that carries the tool's argument schema (with
//! its `tool` discriminator const) and a parser from validated arguments to
//! a live instance.
//!
//! `web_search` and `extract_page_content` return deterministic mock results
//! so the loop can run end-to-end without network access; real engines plug
//! in behind the same descriptors.

use serde::de::DeserializeOwned;
use sgr_core::error::ToolError;
use sgr_core::tool::{AgentTool, Toolkit};

pub mod adapt_plan;
pub mod clarification;
pub mod create_report;
pub mod extract_page_content;
pub mod final_answer;
pub mod generate_plan;
pub mod reasoning;
pub mod web_search;

pub use adapt_plan::AdaptPlanTool;
pub use clarification::ClarificationTool;
pub use create_report::CreateReportTool;
pub use extract_page_content::ExtractPageContentTool;
pub use final_answer::FinalAnswerTool;
pub use generate_plan::GeneratePlanTool;
pub use reasoning::ReasoningTool;
pub use web_search::WebSearchTool;

/// The default research toolkit, in its canonical order.
pub fn default_toolkit() -> Toolkit {
    let toolkit = Toolkit::new(vec![
        clarification::descriptor(),
        generate_plan::descriptor(),
        adapt_plan::descriptor(),
        final_answer::descriptor(),
        web_search::descriptor(),
        extract_page_content::descriptor(),
        create_report::descriptor(),
    ]);
    // Names are statically unique, so this cannot fail.
    match toolkit {
        Ok(kit) => kit,
        Err(_) => Toolkit::default(),
    }
}

/// Deserialize tool arguments into a concrete tool instance.
pub(crate) fn from_args<T>(
    tool_name: &'static str,
    args: serde_json::Value,
) -> Result<Box<dyn AgentTool>, ToolError>
where
    T: AgentTool + DeserializeOwned + 'static,
{
    let tool: T = serde_json::from_value(args).map_err(|e| ToolError::InvalidArguments {
        tool_name: tool_name.to_string(),
        reason: e.to_string(),
    })?;
    Ok(Box::new(tool))
}
