//! Action model and applied-action descriptors.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::agent::AgentId;
use crate::grid::{Direction, Position};

/// Everything an agent can do on its turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Take ownership of the light node under the agent.
    ControlNode,
    /// Draw fuel from the station under the agent.
    Refuel,
    /// Step one cell, or open an adjacent closed door.
    Move(Direction),
    Wait,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::ControlNode => write!(f, "control_node"),
            Action::Refuel => write!(f, "refuel"),
            Action::Move(dir) => write!(f, "move_{}", format!("{dir:?}").to_lowercase()),
            Action::Wait => write!(f, "wait"),
        }
    }
}

/// What an applied action did to the state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActionResult {
    Moved {
        from: Position,
        to: Position,
        fuel_cost: u32,
        fuel_after: u32,
    },
    DoorOpened {
        door: Position,
        fuel_cost: u32,
        fuel_after: u32,
    },
    Refueled {
        station: Position,
        amount: u32,
        fuel_after: u32,
        station_remaining: u32,
    },
    NodeControlled {
        node: Position,
        previous_owner: Option<AgentId>,
        new_owner: AgentId,
        fuel_cost: u32,
        fuel_after: u32,
    },
    Waited,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_display() {
        assert_eq!(Action::Move(Direction::North).to_string(), "move_north");
        assert_eq!(Action::ControlNode.to_string(), "control_node");
    }

    #[test]
    fn test_action_serialization() {
        let json = serde_json::to_string(&Action::Move(Direction::East)).unwrap();
        assert_eq!(json, r#"{"move":"east"}"#);
        let json = serde_json::to_string(&Action::Wait).unwrap();
        assert_eq!(json, r#""wait""#);
    }

    #[test]
    fn test_result_is_tagged() {
        let result = ActionResult::Refueled {
            station: Position::new(3, 4),
            amount: 5,
            fuel_after: 12,
            station_remaining: 10,
        };
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["kind"], "refueled");
        assert_eq!(value["station"]["x"], 3);
        assert_eq!(value["station_remaining"], 10);
    }
}
