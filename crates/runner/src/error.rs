//! Driver errors

use desim_core::{AgentId, Timestamp};
use desim_strategy::{AgentError, ConfigError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimulationError {
    #[error("Failed to read scenario: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse scenario: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Unknown strategy: {0}")]
    UnknownStrategy(String),

    #[error("Unknown agent: {0}")]
    UnknownAgent(AgentId),

    #[error("Duplicate agent name: {0}")]
    DuplicateAgent(AgentId),

    #[error("Agent {agent} failed to configure: {source}")]
    Configure {
        agent: AgentId,
        #[source]
        source: ConfigError,
    },

    #[error("Agent {agent} failed at t={at}: {source}")]
    Agent {
        agent: AgentId,
        at: Timestamp,
        #[source]
        source: AgentError,
    },

    #[error("Message for t={deliver_at} scheduled at t={now}")]
    ScheduledInPast { now: Timestamp, deliver_at: Timestamp },

    #[error("Invalid scenario value for '{key}': {value}")]
    InvalidParam { key: String, value: String },
}

pub type Result<T> = std::result::Result<T, SimulationError>;
