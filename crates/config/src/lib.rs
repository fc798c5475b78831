//! Configuration loading and validation for the SGR agent framework.
//!
//! Loads an [`AgentConfig`] from a TOML file with environment variable
//! overrides, and validates it at load time. Validation failures are fatal:
//! a config that renders broken prompts or nonsensical limits must never
//! reach the loop.

use std::path::{Path, PathBuf};

use sgr_core::config::{
    AgentConfig, CLARIFICATIONS_PLACEHOLDER, TASK_PLACEHOLDER, TOOLS_PLACEHOLDER,
};

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

/// Load configuration from a TOML file, falling back to defaults if the file
/// does not exist, then apply environment overrides and validate.
///
/// Environment overrides (highest priority):
/// - `SGR_API_KEY`, then `OPENAI_API_KEY` — fills `llm.api_key` if empty
/// - `SGR_MODEL` — replaces `llm.model`
/// - `SGR_BASE_URL` — replaces `llm.base_url`
pub fn load(path: &Path) -> Result<AgentConfig, ConfigError> {
    let mut config = load_file(path)?;
    apply_env_overrides(&mut config);
    validate(&config)?;
    Ok(config)
}

fn load_file(path: &Path) -> Result<AgentConfig, ConfigError> {
    if !path.exists() {
        tracing::info!("No config file found at {}, using defaults", path.display());
        return Ok(AgentConfig::default());
    }

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    toml::from_str(&content).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

fn apply_env_overrides(config: &mut AgentConfig) {
    if config.llm.api_key.is_empty() {
        if let Some(key) = std::env::var("SGR_API_KEY")
            .ok()
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
        {
            config.llm.api_key = key;
        }
    }

    if let Ok(model) = std::env::var("SGR_MODEL") {
        config.llm.model = model;
    }

    if let Ok(base_url) = std::env::var("SGR_BASE_URL") {
        config.llm.base_url = base_url;
    }
}

/// Validate a configuration.
///
/// Checks sampling parameters, loop limits, and that every prompt template
/// still carries its required placeholder. A template missing its
/// placeholder would silently produce prompts without the task or the tool
/// listing, so this is a hard error.
pub fn validate(config: &AgentConfig) -> Result<(), ConfigError> {
    if !(0.0..=2.0).contains(&config.llm.temperature) {
        return Err(ConfigError::ValidationError(
            "llm.temperature must be between 0.0 and 2.0".into(),
        ));
    }

    if config.execution.max_iterations == 0 {
        return Err(ConfigError::ValidationError(
            "execution.max_iterations must be at least 1".into(),
        ));
    }

    if config.execution.reduction.keep_last_messages == 0 {
        return Err(ConfigError::ValidationError(
            "execution.reduction.keep_last_messages must be at least 1".into(),
        ));
    }

    if config.execution.reduction.char_budget == 0 {
        return Err(ConfigError::ValidationError(
            "execution.reduction.char_budget must be at least 1".into(),
        ));
    }

    let placeholders = [
        ("prompts.system_prompt", &config.prompts.system_prompt, TOOLS_PLACEHOLDER),
        ("prompts.initial_request", &config.prompts.initial_request, TASK_PLACEHOLDER),
        ("prompts.clarification", &config.prompts.clarification, CLARIFICATIONS_PLACEHOLDER),
    ];
    for (field, template, placeholder) in placeholders {
        if !template.contains(placeholder) {
            return Err(ConfigError::ValidationError(format!(
                "{field} is missing required placeholder {placeholder}"
            )));
        }
    }

    Ok(())
}

/// Generate a default config TOML string (for bootstrapping a config file).
pub fn default_toml() -> String {
    toml::to_string_pretty(&AgentConfig::default()).unwrap_or_default()
}
