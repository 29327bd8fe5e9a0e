//! Error types shared by every crate in the engine.

use crate::action::Action;
use crate::agent::AgentId;

/// Errors raised by rule validation, layout parsing and state mutation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GameError {
    #[error("Illegal action {action:?} for {agent}: {reason}")]
    IllegalAction {
        agent: AgentId,
        action: Action,
        reason: String,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Invalid layout at line {line}: {reason}")]
    InvalidLayout { line: usize, reason: String },

    #[error("Invariant violated: {0}")]
    InvariantViolation(String),
}

impl GameError {
    pub(crate) fn illegal(agent: AgentId, action: Action, reason: impl Into<String>) -> Self {
        GameError::IllegalAction {
            agent,
            action,
            reason: reason.into(),
        }
    }

    pub(crate) fn layout(line: usize, reason: impl Into<String>) -> Self {
        GameError::InvalidLayout {
            line,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, GameError>;
