mod agent;
mod observability;
mod server;
mod store;

pub use agent::*;
pub use observability::*;
pub use server::*;
pub use store::*;

use serde::{Deserialize, Serialize};
use std::fmt;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Top-level config
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub agent: AgentConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Config {
    /// Apply environment overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    /// Apply environment overrides using `lookup` to read variables.
    ///
    /// `AGENT_ID` and `AGENT_ALIAS_ID` replace the configured agent ids
    /// when set. Unset variables leave the file values (empty by default).
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(id) = lookup(AGENT_ID_ENV) {
            self.agent.agent_id = id;
        }
        if let Some(alias) = lookup(AGENT_ALIAS_ID_ENV) {
            self.agent.agent_alias_id = alias;
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Config validation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Severity level for a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSeverity {
    Error,
    Warning,
}

/// A single configuration validation issue.
#[derive(Debug, Clone)]
pub struct ConfigError {
    pub severity: ConfigSeverity,
    pub field: String,
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.severity {
            ConfigSeverity::Error => "ERROR",
            ConfigSeverity::Warning => "WARN",
        };
        write!(f, "[{tag}] {}: {}", self.field, self.message)
    }
}

impl Config {
    /// Validate the configuration and return a list of issues.
    ///
    /// Empty agent ids are only warnings: the server still starts and the
    /// first invocation reports the failure.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.server.port == 0 {
            errors.push(ConfigError {
                severity: ConfigSeverity::Error,
                field: "server.port".into(),
                message: "port must be greater than 0".into(),
            });
        }

        if self.server.host.is_empty() {
            errors.push(ConfigError {
                severity: ConfigSeverity::Error,
                field: "server.host".into(),
                message: "host must not be empty".into(),
            });
        }

        if self.agent.base_url.is_empty() {
            errors.push(ConfigError {
                severity: ConfigSeverity::Error,
                field: "agent.base_url".into(),
                message: "base_url must not be empty".into(),
            });
        }

        if self.agent.agent_id.is_empty() {
            errors.push(ConfigError {
                severity: ConfigSeverity::Warning,
                field: "agent.agent_id".into(),
                message: format!("empty; set {AGENT_ID_ENV} or agent.agent_id"),
            });
        }

        if self.agent.agent_alias_id.is_empty() {
            errors.push(ConfigError {
                severity: ConfigSeverity::Warning,
                field: "agent.agent_alias_id".into(),
                message: format!("empty; set {AGENT_ALIAS_ID_ENV} or agent.agent_alias_id"),
            });
        }

        if self.store.backend == StoreBackend::Rest && self.store.base_url.is_empty() {
            errors.push(ConfigError {
                severity: ConfigSeverity::Error,
                field: "store.base_url".into(),
                message: "base_url must not be empty for the rest backend".into(),
            });
        }

        if self.store.table.is_empty() {
            errors.push(ConfigError {
                severity: ConfigSeverity::Error,
                field: "store.table".into(),
                message: "table must not be empty".into(),
            });
        }

        if self.store.backend == StoreBackend::Memory {
            errors.push(ConfigError {
                severity: ConfigSeverity::Warning,
                field: "store.backend".into(),
                message: "memory backend discards chats on exit".into(),
            });
        }

        errors
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
