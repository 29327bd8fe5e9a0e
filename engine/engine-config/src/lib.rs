//! Centralized configuration loading from config.toml.
//!
//! This crate provides configuration structs and loading logic shared
//! by the arena binary and anything else that needs match settings.
//!
//! # Configuration Priority
//!
//! Settings are loaded with the following priority (highest to lowest):
//! 1. Environment variables (`DOMINION_<SECTION>_<KEY>`)
//! 2. config.toml file
//! 3. Built-in defaults (config.defaults.toml, embedded at compile time)
//!
//! Command-line flags of the arena binary sit above all three.
//!
//! # Environment Variable Override Pattern
//!
//! ```text
//! DOMINION_<SECTION>_<KEY>=value
//!
//! Examples:
//!     DOMINION_COMMON_SEED=7
//!     DOMINION_GAME_GRID_SIZE=16
//!     DOMINION_FUEL_MOVE_COST=2
//!     DOMINION_MINIMAX_DEPTH=4
//!     DOMINION_MCTS_NUM_SIMULATIONS=400
//! ```

mod defaults;
mod loader;
mod structs;

pub use defaults::*;
pub use loader::{
    apply_env_overrides, load_config, load_from_path, CONFIG_PATH_ENV, CONFIG_SEARCH_PATHS,
};
pub use structs::*;

#[cfg(test)]
mod tests;
