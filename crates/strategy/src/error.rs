//! Error types for agent configuration and message handling

use desim_protocol::ProtocolError;
use thiserror::Error;

/// Configuration errors, raised once at setup
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Malformed value {value:?} for '{key}': {reason}")]
    Malformed {
        key: String,
        value: String,
        reason: String,
    },

    #[error("Missing required parameter '{0}'")]
    MissingRequired(String),

    #[error("Invalid value for '{key}': {reason}")]
    Invalid { key: String, reason: String },
}

impl ConfigError {
    pub fn malformed(key: &str, value: &str, reason: impl ToString) -> Self {
        ConfigError::Malformed {
            key: key.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn invalid(key: &str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

/// Errors surfaced by an agent
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AgentError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),
}

pub type Result<T> = std::result::Result<T, AgentError>;
