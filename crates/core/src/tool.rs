//! Tool trait, descriptors, and the toolkit.
//!
//! A tool has two sides. The *descriptor* is the static side: name,
//! description, JSON argument schema, capability flags, and a parser that
//! turns validated arguments into a live instance. The [`AgentTool`] instance
//! is the dynamic side: parsed arguments plus an `execute` that runs against
//! the agent context. Descriptors are what the schema builder and the
//! availability policy work with; instances are what the action phase runs.

use std::fmt;

use async_trait::async_trait;

use crate::config::AgentConfig;
use crate::context::AgentContext;
use crate::error::ToolError;
use crate::provider::ToolDefinition;

/// A parsed, ready-to-run tool invocation.
#[async_trait]
pub trait AgentTool: Send + Sync {
    /// The tool's unique lowercase name (matches its descriptor).
    fn name(&self) -> &'static str;

    /// The parsed arguments as JSON, for logs and stream events.
    fn payload(&self) -> serde_json::Value;

    /// Run the tool against the agent context. Returns the text that is
    /// appended to the conversation as the tool result.
    async fn execute(
        &self,
        context: &mut AgentContext,
        config: &AgentConfig,
    ) -> Result<String, ToolError>;
}

impl fmt::Debug for dyn AgentTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AgentTool")
            .field("name", &self.name())
            .field("payload", &self.payload())
            .finish()
    }
}

type SchemaFn = fn() -> serde_json::Value;
type ParseFn = fn(serde_json::Value) -> Result<Box<dyn AgentTool>, ToolError>;

/// The static side of a tool: everything the loop needs to offer it to the
/// model and to construct an instance from the model's arguments.
#[derive(Clone)]
pub struct ToolDescriptor {
    name: &'static str,
    description: &'static str,
    search_capable: bool,
    concluding: bool,
    schema: SchemaFn,
    parse: ParseFn,
}

impl ToolDescriptor {
    pub fn new(
        name: &'static str,
        description: &'static str,
        schema: SchemaFn,
        parse: ParseFn,
    ) -> Self {
        Self {
            name,
            description,
            search_capable: false,
            concluding: false,
            schema,
            parse,
        }
    }

    /// Mark this tool as consuming the search budget.
    pub fn search_capable(mut self) -> Self {
        self.search_capable = true;
        self
    }

    /// Mark this tool as part of the concluding subset offered at the
    /// iteration cap.
    pub fn concluding(mut self) -> Self {
        self.concluding = true;
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn description(&self) -> &'static str {
        self.description
    }

    pub fn is_search_capable(&self) -> bool {
        self.search_capable
    }

    pub fn is_concluding(&self) -> bool {
        self.concluding
    }

    /// The JSON Schema for this tool's arguments, including the `tool`
    /// discriminator const.
    pub fn schema(&self) -> serde_json::Value {
        (self.schema)()
    }

    /// Validate arguments and construct a live instance.
    pub fn parse_args(&self, args: serde_json::Value) -> Result<Box<dyn AgentTool>, ToolError> {
        (self.parse)(args)
    }

    /// The definition sent to the model in native tool-calling mode.
    pub fn to_definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name.to_string(),
            description: self.description.to_string(),
            parameters: self.schema(),
        }
    }
}

impl fmt::Debug for ToolDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolDescriptor")
            .field("name", &self.name)
            .field("search_capable", &self.search_capable)
            .field("concluding", &self.concluding)
            .finish()
    }
}

/// An ordered set of tool descriptors with unique names.
///
/// Order is preserved: schemas and tool definitions are emitted in the order
/// the toolkit was built, so offered-tool lists stay deterministic.
#[derive(Debug, Clone, Default)]
pub struct Toolkit {
    tools: Vec<ToolDescriptor>,
}

impl Toolkit {
    pub fn new(tools: Vec<ToolDescriptor>) -> Result<Self, ToolError> {
        let mut seen: Vec<String> = Vec::with_capacity(tools.len());
        for tool in &tools {
            let name = tool.name().to_lowercase();
            if seen.contains(&name) {
                return Err(ToolError::DuplicateName(name));
            }
            seen.push(name);
        }
        Ok(Self { tools })
    }

    /// Look up a descriptor by name, case-insensitively.
    pub fn get(&self, name: &str) -> Option<&ToolDescriptor> {
        self.tools
            .iter()
            .find(|t| t.name().eq_ignore_ascii_case(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn descriptors(&self) -> &[ToolDescriptor] {
        &self.tools
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
