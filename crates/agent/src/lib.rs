//! The agent loop: strategies, availability policy, schema building,
//! context reduction, clarification plumbing, and run logging.
//!
//! An [`Agent`] binds one task to one [`StepStrategy`] and drives
//! reason-then-act turns until a terminal state. Strategy selection and
//! live-agent tracking go through the registries.

pub mod availability;
pub mod driver;
pub mod next_step;
pub mod reduction;
pub mod registry;
pub mod runlog;
pub mod runtime;
pub mod strategies;

#[cfg(test)]
pub(crate) mod testing;

pub use availability::available_tools;
pub use driver::{Agent, AgentReport};
pub use next_step::{NextStepSchema, NextStepSchemaBuilder};
pub use reduction::reduce;
pub use registry::{AgentEntry, AgentRegistry, StrategyRegistry};
pub use runlog::{RunLog, RunLogEntry, RunSummary};
pub use runtime::{AgentRuntime, ClarificationGate, ClarificationHandle};
pub use strategies::{
    SgrStrategy, SgrToolCallingStrategy, StepStrategy, ToolCallingStrategy,
};
