//! Read-only, serialisable views of a game state for viewers and logs.

use serde::{Deserialize, Serialize};

use crate::agent::AgentId;
use crate::grid::{Cell, Position};
use crate::scoring::HeuristicEvaluator;
use crate::state::GameState;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSnapshot {
    pub id: AgentId,
    pub position: Position,
    pub fuel: u32,
    pub nodes_controlled: u32,
    pub score: f32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationSnapshot {
    pub position: Position,
    pub current: u32,
    pub capacity: u32,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSnapshot {
    pub position: Position,
    pub controlled_by: Option<AgentId>,
}

/// Everything a viewer needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub size: usize,
    /// Row-major terrain, `terrain[y][x]`.
    pub terrain: Vec<Vec<Cell>>,
    pub open_doors: Vec<Position>,
    pub agents: Vec<AgentSnapshot>,
    pub stations: Vec<StationSnapshot>,
    pub nodes: Vec<NodeSnapshot>,
    pub turn: u32,
    pub max_turns: u32,
    pub active_player: AgentId,
}

impl Snapshot {
    /// Capture `state`, scoring each agent with `evaluator`.
    pub fn capture(state: &GameState, evaluator: &HeuristicEvaluator) -> Self {
        let grid = state.grid();
        Self {
            size: grid.size(),
            terrain: grid.rows().map(<[Cell]>::to_vec).collect(),
            open_doors: state
                .doors()
                .iter()
                .filter(|d| d.open)
                .map(|d| d.position)
                .collect(),
            agents: state
                .agents()
                .iter()
                .map(|a| AgentSnapshot {
                    id: a.id,
                    position: a.position,
                    fuel: a.fuel,
                    nodes_controlled: a.nodes_controlled,
                    score: evaluator.agent_score(state, a.id),
                })
                .collect(),
            stations: state
                .stations()
                .iter()
                .map(|s| StationSnapshot {
                    position: s.position,
                    current: s.current,
                    capacity: s.capacity,
                    active: s.is_active(),
                })
                .collect(),
            nodes: state
                .nodes()
                .iter()
                .map(|n| NodeSnapshot {
                    position: n.position,
                    controlled_by: n.controlled_by,
                })
                .collect(),
            turn: state.turn(),
            max_turns: state.max_turns(),
            active_player: state.active_player(),
        }
    }

    pub fn agent(&self, id: AgentId) -> Option<&AgentSnapshot> {
        self.agents.iter().find(|a| a.id == id)
    }
}
