//! Agent identities and per-agent mutable state.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::grid::Position;

/// The two fixed identities taking part in every match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentId {
    Strategist,
    Reactive,
}

impl AgentId {
    pub const BOTH: [AgentId; 2] = [AgentId::Strategist, AgentId::Reactive];

    pub fn opponent(self) -> AgentId {
        match self {
            AgentId::Strategist => AgentId::Reactive,
            AgentId::Reactive => AgentId::Strategist,
        }
    }

    /// Index into per-agent arrays.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            AgentId::Strategist => 0,
            AgentId::Reactive => 1,
        }
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentId::Strategist => write!(f, "strategist"),
            AgentId::Reactive => write!(f, "reactive"),
        }
    }
}

/// Mutable state of one agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Agent {
    pub id: AgentId,
    pub position: Position,
    pub fuel: u32,
    /// Cached count of light nodes owned by this agent.
    pub nodes_controlled: u32,
}

impl Agent {
    pub fn new(id: AgentId, position: Position, fuel: u32) -> Self {
        Self {
            id,
            position,
            fuel,
            nodes_controlled: 0,
        }
    }
}

/// Final result of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Strategist,
    Reactive,
    Draw,
}

impl Outcome {
    /// +1 for a win from `perspective`, -1 for a loss, 0 for a draw.
    pub fn sign_for(self, perspective: AgentId) -> f32 {
        match (self, perspective) {
            (Outcome::Draw, _) => 0.0,
            (Outcome::Strategist, AgentId::Strategist) | (Outcome::Reactive, AgentId::Reactive) => 1.0,
            _ => -1.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Strategist => "strategist",
            Outcome::Reactive => "reactive",
            Outcome::Draw => "draw",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opponent_is_involution() {
        for id in AgentId::BOTH {
            assert_ne!(id, id.opponent());
            assert_eq!(id, id.opponent().opponent());
        }
    }

    #[test]
    fn test_outcome_sign() {
        assert_eq!(Outcome::Strategist.sign_for(AgentId::Strategist), 1.0);
        assert_eq!(Outcome::Strategist.sign_for(AgentId::Reactive), -1.0);
        assert_eq!(Outcome::Draw.sign_for(AgentId::Reactive), 0.0);
    }
}
