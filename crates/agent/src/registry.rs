//! Strategy and agent registries.
//!
//! Strategies are registered by name so callers pick one with a string;
//! running agents are tracked by id so clarification answers can be routed
//! to them from outside the loop.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use sgr_core::context::AgentState;
use sgr_core::error::AgentError;
use tokio::sync::RwLock;

use crate::runtime::ClarificationHandle;
use crate::strategies::{
    SgrStrategy, SgrToolCallingStrategy, StepStrategy, ToolCallingStrategy,
};

type StrategyFactory = fn() -> Box<dyn StepStrategy>;

/// Name-to-factory map for step strategies.
#[derive(Default)]
pub struct StrategyRegistry {
    factories: HashMap<&'static str, StrategyFactory>,
}

impl StrategyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the built-in strategies.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register("sgr", || Box::new(SgrStrategy));
        registry.register("tool_calling", || Box::new(ToolCallingStrategy));
        registry.register("sgr_tool_calling", || Box::new(SgrToolCallingStrategy));
        registry
    }

    pub fn register(&mut self, name: &'static str, factory: StrategyFactory) {
        self.factories.insert(name, factory);
    }

    pub fn create(&self, name: &str) -> Result<Box<dyn StepStrategy>, AgentError> {
        self.factories
            .get(name)
            .map(|factory| factory())
            .ok_or_else(|| AgentError::UnknownStrategy(name.to_string()))
    }

    /// Registered strategy names, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.factories.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

/// A running (or finished) agent as seen from the registry.
pub struct AgentEntry {
    pub id: String,
    pub task: String,
    pub strategy: String,
    pub created_at: DateTime<Utc>,
    pub clarifications: ClarificationHandle,
}

impl AgentEntry {
    pub fn state(&self) -> AgentState {
        self.clarifications.state()
    }
}

/// Tracks live agents by id.
#[derive(Default)]
pub struct AgentRegistry {
    agents: RwLock<HashMap<String, Arc<AgentEntry>>>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, entry: AgentEntry) -> Arc<AgentEntry> {
        let entry = Arc::new(entry);
        self.agents
            .write()
            .await
            .insert(entry.id.clone(), Arc::clone(&entry));
        entry
    }

    pub async fn get(&self, id: &str) -> Option<Arc<AgentEntry>> {
        self.agents.read().await.get(id).cloned()
    }

    pub async fn remove(&self, id: &str) -> Option<Arc<AgentEntry>> {
        self.agents.write().await.remove(id)
    }

    pub async fn list(&self) -> Vec<Arc<AgentEntry>> {
        let mut entries: Vec<_> = self.agents.read().await.values().cloned().collect();
        entries.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        entries
    }

    /// Route a clarification answer to the agent with this id.
    pub async fn provide_clarification(&self, id: &str, answer: &str) -> Result<(), AgentError> {
        let entry = self
            .get(id)
            .await
            .ok_or_else(|| AgentError::NotFound(id.to_string()))?;
        entry.clarifications.provide(answer)
    }
}
