//! Monte Carlo Tree Search with UCB1 selection and random rollouts.
//!
//! This crate searches `engine-core` game states for the agent to move.
//! Each simulation consists of four phases:
//!
//! 1. **Selection**: Traverse the tree using UCB1 to balance exploration
//!    and exploitation
//! 2. **Expansion**: Add a child for one not-yet-tried legal action
//! 3. **Rollout**: Play uniformly random actions for a bounded number of
//!    turns and squash the heuristic score of the end state into (0, 1)
//! 4. **Backpropagation**: Update visit counts and rewards along the path
//!    from leaf to root, flipping the reward for opponent moves
//!
//! # Usage
//!
//! ```rust,ignore
//! use engine_core::{GameState, HeuristicEvaluator, RulesConfig};
//! use mcts::{run_mcts, MctsConfig};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha20Rng;
//!
//! let state = GameState::generate(&RulesConfig::default(), 42)?;
//! let evaluator = HeuristicEvaluator::default();
//! let mut rng = ChaCha20Rng::seed_from_u64(42);
//! let result = run_mcts(&evaluator, MctsConfig::default(), &state, &mut rng);
//!
//! println!("Best action: {}", result.action);
//! println!("Visits: {:?}", result.visits);
//! ```
//!
//! # Configuration
//!
//! The [`MctsConfig`] struct controls search behavior:
//!
//! - `num_simulations`: Number of simulations per search (default: 100)
//! - `exploration`: UCB1 constant C (default: 1.414)
//! - `rollout_depth`: Random turns per rollout (default: 10)
//! - `reward_scale`: Heuristic divisor before the logistic squash (default: 10)
//! - `time_limit`: Optional wall-clock budget
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                  MctsSearch                  │
//! ├──────────────────────────────────────────────┤
//! │  ┌──────────────┐        ┌────────────────┐  │
//! │  │   MctsTree   │        │   Evaluator    │  │
//! │  │   (arena)    │        │  (heuristic)   │  │
//! │  └──────────────┘        └────────────────┘  │
//! └──────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod node;
pub mod policy;
pub mod search;
pub mod tree;

pub use config::MctsConfig;
pub use node::{MctsNode, NodeId};
pub use policy::MctsPolicy;
pub use search::{logistic, run_mcts, MctsSearch, SearchResult};
pub use tree::{MctsTree, TreeStats};
