//! Core model for the Fuel Dominion simulation.
//!
//! This crate owns everything both search algorithms share:
//! - `Grid`/`Layout`: immutable terrain, ASCII maps and seeded generation
//! - `GameState`: the authoritative state and turn-execution rules
//! - `Evaluator`: the static heuristic used to score leaves
//! - `DecisionPolicy`: the seam the orchestrator drives agents through
//! - `Snapshot`: the serialisable view handed to observers

pub mod action;
pub mod agent;
pub mod error;
pub mod generation;
pub mod grid;
pub mod layout;
pub mod policy;
pub mod rules;
pub mod scoring;
pub mod snapshot;
pub mod state;

// Re-export main types for convenience
pub use action::{Action, ActionResult};
pub use agent::{Agent, AgentId, Outcome};
pub use error::{GameError, Result};
pub use generation::{generate_layout, spawn_points};
pub use grid::{Cell, Direction, Grid, Position};
pub use layout::{render, Layout};
pub use policy::{Decision, DecisionPolicy, RandomPolicy, SearchDiagnostics, StopReason};
pub use rules::{RulesConfig, MAX_GRID_SIZE, MIN_GENERATED_GRID};
pub use scoring::{Evaluator, HeuristicEvaluator, ScoringWeights};
pub use snapshot::{AgentSnapshot, NodeSnapshot, Snapshot, StationSnapshot};
pub use state::{Door, FuelStation, GameState, LightNode};

#[cfg(test)]
mod tests;
