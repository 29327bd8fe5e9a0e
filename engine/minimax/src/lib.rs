//! Adversarial minimax search with alpha-beta pruning.
//!
//! The searching agent is whoever is to move at the root. Max plies belong
//! to that agent and min plies to its opponent; leaves and terminal states
//! are scored with an [`engine_core::Evaluator`] from the root agent's view.
//!
//! # Usage
//!
//! ```rust,ignore
//! use engine_core::{GameState, HeuristicEvaluator, RulesConfig};
//! use minimax::{MinimaxConfig, MinimaxSearch};
//!
//! let state = GameState::generate(&RulesConfig::default(), 42)?;
//! let evaluator = HeuristicEvaluator::default();
//! let result = MinimaxSearch::new(&evaluator, MinimaxConfig::default()).run(&state);
//! println!("{} ({:.2}) after {} nodes", result.action, result.value, result.nodes_visited);
//! ```
//!
//! # Configuration
//!
//! - `depth`: plies below the root (default: 3)
//! - `pruning`: alpha-beta cutoffs (default: on)
//! - `move_ordering`: captures, then closing moves, then refuel, then wait
//! - `parallel_root`: split root children across the rayon pool
//! - `time_limit`: iterative deepening under a wall-clock budget

pub mod config;
pub mod ordering;
pub mod policy;
pub mod search;

pub use config::MinimaxConfig;
pub use ordering::ordered_actions;
pub use policy::MinimaxPolicy;
pub use search::{MinimaxResult, MinimaxSearch};
