//! The decision-making seam between the orchestrator and the search crates.

use std::time::Instant;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::state::GameState;

/// Why a search stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The configured depth or simulation budget was fully used.
    Completed,
    /// The root had nothing to search (single legal action, terminal state)
    /// or the tree was exhausted before the budget.
    BudgetExhausted,
    /// A wall-clock deadline interrupted the search.
    Deadline,
}

/// Search statistics reported alongside every decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchDiagnostics {
    pub algorithm: String,
    /// Nodes visited (minimax) or simulations run (MCTS).
    pub explored: u64,
    /// Estimated value of the chosen action from the deciding agent's view.
    pub value: f32,
    pub elapsed_us: u64,
    pub stop_reason: StopReason,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depth_reached: Option<u32>,
}

impl SearchDiagnostics {
    pub fn new(algorithm: impl Into<String>, stop_reason: StopReason) -> Self {
        Self {
            algorithm: algorithm.into(),
            explored: 0,
            value: 0.0,
            elapsed_us: 0,
            stop_reason,
            depth_reached: None,
        }
    }
}

/// An action plus how it was found.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub action: Action,
    pub diagnostics: SearchDiagnostics,
}

/// Chooses actions for the agent whose turn it is.
///
/// Implementations only ever read the live state; any exploration happens
/// on clones.
pub trait DecisionPolicy: Send {
    /// Short identifier used in logs and diagnostics.
    fn name(&self) -> &str;

    /// Pick an action for `state.active_player()`. Must return a legal
    /// action whenever the state is not terminal.
    fn choose_action(&mut self, state: &GameState) -> Decision;
}

/// Uniformly random legal actions. Baseline opponent and rollout reference.
pub struct RandomPolicy {
    rng: ChaCha20Rng,
}

impl RandomPolicy {
    pub fn new() -> Self {
        Self {
            rng: ChaCha20Rng::from_entropy(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl DecisionPolicy for RandomPolicy {
    fn name(&self) -> &str {
        "random"
    }

    fn choose_action(&mut self, state: &GameState) -> Decision {
        let start = Instant::now();
        let legal = state.legal_actions(state.active_player());
        let action = legal.choose(&mut self.rng).copied().unwrap_or(Action::Wait);

        let mut diagnostics = SearchDiagnostics::new(self.name(), StopReason::Completed);
        diagnostics.explored = legal.len() as u64;
        diagnostics.elapsed_us = start.elapsed().as_micros() as u64;
        Decision {
            action,
            diagnostics,
        }
    }
}
