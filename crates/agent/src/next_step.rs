//! Next-step schema builder.
//!
//! Every turn, the model must answer with a single JSON object: the
//! reasoning envelope plus a `function` field holding exactly one of the
//! currently offered tools. The builder assembles that schema fresh from the
//! offered descriptor subset, with each tool's `tool` const acting as the
//! discriminator of the `oneOf` union.

use serde_json::json;
use sgr_core::context::ReasoningEnvelope;
use sgr_core::error::{AgentError, ToolError};
use sgr_core::provider::SchemaFormat;
use sgr_core::tool::{AgentTool, ToolDescriptor};

/// Builds [`NextStepSchema`]s from offered tool subsets.
pub struct NextStepSchemaBuilder;

impl NextStepSchemaBuilder {
    /// Build the combined envelope + action schema for this turn's offered
    /// tools. The offered set must be non-empty; the availability policy
    /// guarantees that, and an empty set here is a programming error worth
    /// failing loudly on.
    pub fn build(tools: &[ToolDescriptor]) -> Result<NextStepSchema, AgentError> {
        if tools.is_empty() {
            return Err(AgentError::EmptyToolSet);
        }

        let variants: Vec<serde_json::Value> = tools.iter().map(|t| t.schema()).collect();

        let mut schema = sgr_tools::reasoning::envelope_schema();
        schema["properties"]["function"] = json!({
            "description": "The single next action to execute",
            "oneOf": variants,
        });
        if let Some(required) = schema["required"].as_array_mut() {
            required.push(json!("function"));
        }

        Ok(NextStepSchema {
            schema,
            tools: tools.to_vec(),
        })
    }
}

/// A per-turn schema plus the descriptors it was built from.
pub struct NextStepSchema {
    schema: serde_json::Value,
    tools: Vec<ToolDescriptor>,
}

impl NextStepSchema {
    /// The raw JSON Schema.
    pub fn json_schema(&self) -> &serde_json::Value {
        &self.schema
    }

    /// The tools this schema offers, in order.
    pub fn offered(&self) -> &[ToolDescriptor] {
        &self.tools
    }

    /// Wrap the schema as a strict structured-output response format.
    pub fn as_schema_format(&self) -> SchemaFormat {
        SchemaFormat {
            name: "next_step".into(),
            schema: self.schema.clone(),
            strict: true,
        }
    }

    /// Extract the reasoning envelope from a model payload. Failure here
    /// means the model broke the schema contract outright.
    pub fn parse_envelope(
        &self,
        payload: &serde_json::Value,
    ) -> Result<ReasoningEnvelope, AgentError> {
        if !payload.is_object() {
            return Err(AgentError::MalformedReasoning(
                "next-step payload is not a JSON object".into(),
            ));
        }
        serde_json::from_value(payload.clone())
            .map_err(|e| AgentError::MalformedReasoning(e.to_string()))
    }

    /// Resolve the `function` field into a live tool instance. Failures are
    /// recoverable: the caller falls back to a synthesized final answer.
    pub fn resolve_tool(
        &self,
        payload: &serde_json::Value,
    ) -> Result<Box<dyn AgentTool>, ToolError> {
        let function = payload
            .get("function")
            .ok_or_else(|| ToolError::Unknown("<missing function field>".into()))?;

        let name = function
            .get("tool")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ToolError::Unknown("<missing tool discriminator>".into()))?;

        let descriptor = self
            .tools
            .iter()
            .find(|t| t.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| ToolError::Unknown(name.to_string()))?;

        descriptor.parse_args(function.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sgr_tools::{final_answer, web_search};

    fn offered() -> Vec<ToolDescriptor> {
        vec![web_search::descriptor(), final_answer::descriptor()]
    }

    #[test]
    fn empty_tool_set_is_rejected() {
        let err = NextStepSchemaBuilder::build(&[]);
        assert!(matches!(err, Err(AgentError::EmptyToolSet)));
    }

    #[test]
    fn schema_unions_offered_tools_in_order() {
        let schema = NextStepSchemaBuilder::build(&offered()).unwrap();
        let variants = schema.json_schema()["properties"]["function"]["oneOf"]
            .as_array()
            .unwrap();
        assert_eq!(variants.len(), 2);
        assert_eq!(variants[0]["properties"]["tool"]["const"], "web_search");
        assert_eq!(variants[1]["properties"]["tool"]["const"], "final_answer");
    }

    #[test]
    fn schema_requires_envelope_and_function() {
        let schema = NextStepSchemaBuilder::build(&offered()).unwrap();
        let required = schema.json_schema()["required"].as_array().unwrap();
        assert!(required.contains(&json!("function")));
        assert!(required.contains(&json!("remaining_steps")));
        assert!(required.contains(&json!("task_completed")));
    }

    #[test]
    fn rebuild_reflects_a_narrower_offer() {
        let wide = NextStepSchemaBuilder::build(&offered()).unwrap();
        let narrow = NextStepSchemaBuilder::build(&[final_answer::descriptor()]).unwrap();
        let wide_count = wide.json_schema()["properties"]["function"]["oneOf"]
            .as_array()
            .unwrap()
            .len();
        let narrow_count = narrow.json_schema()["properties"]["function"]["oneOf"]
            .as_array()
            .unwrap()
            .len();
        assert_eq!(wide_count, 2);
        assert_eq!(narrow_count, 1);
    }

    fn sample_payload(tool: serde_json::Value) -> serde_json::Value {
        json!({
            "reasoning_steps": ["assess", "act"],
            "current_situation": "mid-research",
            "plan_status": "on track",
            "enough_data": false,
            "remaining_steps": ["search"],
            "task_completed": false,
            "function": tool
        })
    }

    #[test]
    fn parse_envelope_and_resolve_tool() {
        let schema = NextStepSchemaBuilder::build(&offered()).unwrap();
        let payload = sample_payload(json!({"tool": "web_search", "query": "rust"}));

        let envelope = schema.parse_envelope(&payload).unwrap();
        assert_eq!(envelope.remaining_steps, vec!["search".to_string()]);

        let tool = schema.resolve_tool(&payload).unwrap();
        assert_eq!(tool.name(), "web_search");
    }

    #[test]
    fn unknown_discriminator_is_a_tool_error() {
        let schema = NextStepSchemaBuilder::build(&offered()).unwrap();
        let payload = sample_payload(json!({"tool": "rm_rf", "target": "/"}));
        let err = schema.resolve_tool(&payload).unwrap_err();
        assert!(matches!(err, ToolError::Unknown(name) if name == "rm_rf"));
    }

    #[test]
    fn invalid_arguments_are_a_tool_error() {
        let schema = NextStepSchemaBuilder::build(&offered()).unwrap();
        // web_search without its required query
        let payload = sample_payload(json!({"tool": "web_search"}));
        let err = schema.resolve_tool(&payload).unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments { .. }));
    }

    #[test]
    fn non_object_payload_is_malformed() {
        let schema = NextStepSchemaBuilder::build(&offered()).unwrap();
        let err = schema.parse_envelope(&json!("free text")).unwrap_err();
        assert!(matches!(err, AgentError::MalformedReasoning(_)));
    }
}
