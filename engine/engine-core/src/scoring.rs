//! Static position evaluation shared by both search algorithms.

use serde::{Deserialize, Serialize};

use crate::agent::AgentId;
use crate::state::GameState;

/// Scores a state from one agent's point of view. Higher is better for
/// `perspective`.
pub trait Evaluator: Send + Sync {
    fn evaluate(&self, state: &GameState, perspective: AgentId) -> f32;
}

/// Relative importance of each heuristic term.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    pub node: f32,
    pub fuel: f32,
    pub proximity: f32,
    pub sight: f32,
    pub outcome: f32,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            node: 10.0,
            fuel: 2.0,
            proximity: 1.0,
            sight: 0.5,
            outcome: 100.0,
        }
    }
}

/// Weighted sum of territory, fuel reserve, distance to the next capturable
/// node and initiative.
///
/// `evaluate(s, a) == -evaluate(s, a.opponent())` holds exactly: the result
/// is computed as one utility difference and negated for the other side.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicEvaluator {
    weights: ScoringWeights,
}

impl HeuristicEvaluator {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Utility of `agent` on its own, without reference to the opponent.
    pub fn agent_score(&self, state: &GameState, agent: AgentId) -> f32 {
        let w = &self.weights;
        let me = state.agent(agent);
        let rules = state.rules();

        let nodes = w.node * me.nodes_controlled as f32;
        let fuel = w.fuel * me.fuel as f32 / rules.max_fuel as f32;

        let dmax = 2.0 * rules.grid_size as f32;
        let proximity = match state.target_distance(agent) {
            Some(d) => w.proximity * (1.0 - d as f32 / dmax).max(0.0),
            None => 0.0,
        };

        let sight = if state.active_player() == agent && state.agents_in_sight() {
            w.sight
        } else {
            0.0
        };

        nodes + fuel + proximity + sight
    }

    fn strategist_view(&self, state: &GameState) -> f32 {
        let mut value = self.agent_score(state, AgentId::Strategist)
            - self.agent_score(state, AgentId::Reactive);
        if state.is_terminal() {
            value += self.weights.outcome * state.winner().sign_for(AgentId::Strategist);
        }
        value
    }
}

impl Evaluator for HeuristicEvaluator {
    fn evaluate(&self, state: &GameState, perspective: AgentId) -> f32 {
        let value = self.strategist_view(state);
        match perspective {
            AgentId::Strategist => value,
            AgentId::Reactive => -value,
        }
    }
}
