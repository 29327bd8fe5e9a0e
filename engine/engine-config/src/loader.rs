//! Configuration loading logic.
//!
//! Handles loading config from files and applying environment variable overrides.

use crate::CentralConfig;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "DOMINION_CONFIG";

/// Standard locations to search for config.toml
pub const CONFIG_SEARCH_PATHS: &[&str] = &[
    "config.toml",    // Current directory
    "../config.toml", // Parent directory (when running from a crate directory)
];

/// Load the central configuration from config.toml.
///
/// Searches for config.toml in the following order:
/// 1. Path specified by the DOMINION_CONFIG environment variable
/// 2. Current directory (config.toml)
/// 3. Parent directory (../config.toml)
///
/// After loading, environment variable overrides are applied.
pub fn load_config() -> CentralConfig {
    // Check for explicit config path
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        let path = PathBuf::from(&path);
        if path.exists() {
            info!("Loading config from {}: {}", CONFIG_PATH_ENV, path.display());
            return load_from_path(&path);
        }
        warn!(
            "{}={} not found, searching defaults",
            CONFIG_PATH_ENV,
            path.display()
        );
    }

    // Search default locations
    for path_str in CONFIG_SEARCH_PATHS {
        let path = PathBuf::from(path_str);
        if path.exists() {
            info!("Loading config from {}", path.display());
            return load_from_path(&path);
        }
    }

    // Fall back to defaults
    debug!("No config.toml found, using built-in defaults");
    apply_env_overrides(CentralConfig::default())
}

/// Load configuration from a specific path.
///
/// Unreadable or malformed files are reported and replaced by the defaults.
pub fn load_from_path(path: &PathBuf) -> CentralConfig {
    match std::fs::read_to_string(path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => apply_env_overrides(config),
            Err(e) => {
                warn!("Failed to parse {}: {}, using defaults", path.display(), e);
                apply_env_overrides(CentralConfig::default())
            }
        },
        Err(e) => {
            warn!("Failed to read {}: {}, using defaults", path.display(), e);
            apply_env_overrides(CentralConfig::default())
        }
    }
}

/// Macro to reduce env override boilerplate
macro_rules! env_override {
    // String field
    ($config:expr, $section:ident . $field:ident, $key:expr) => {
        if let Ok(v) = std::env::var($key) {
            $config.$section.$field = v;
        }
    };
    // Parseable field (u32, f64, bool, etc.); unparseable values are ignored
    ($config:expr, $section:ident . $field:ident, $key:expr, parse) => {
        if let Ok(v) =
            std::env::var($key).and_then(|s| s.parse().map_err(|_| std::env::VarError::NotPresent))
        {
            $config.$section.$field = v;
        }
    };
}

/// Apply environment variable overrides to a configuration.
///
/// Environment variables follow the pattern: DOMINION_<SECTION>_<KEY>
pub fn apply_env_overrides(mut config: CentralConfig) -> CentralConfig {
    // Common
    env_override!(config, common.log_level, "DOMINION_COMMON_LOG_LEVEL");
    env_override!(config, common.seed, "DOMINION_COMMON_SEED", parse);

    // Game
    env_override!(config, game.grid_size, "DOMINION_GAME_GRID_SIZE", parse);
    env_override!(config, game.max_turns, "DOMINION_GAME_MAX_TURNS", parse);
    env_override!(config, game.early_victory, "DOMINION_GAME_EARLY_VICTORY", parse);
    env_override!(config, game.num_walls, "DOMINION_GAME_NUM_WALLS", parse);
    env_override!(config, game.num_doors, "DOMINION_GAME_NUM_DOORS", parse);
    env_override!(config, game.num_windows, "DOMINION_GAME_NUM_WINDOWS", parse);
    env_override!(config, game.num_trees, "DOMINION_GAME_NUM_TREES", parse);
    env_override!(config, game.num_fuel_stations, "DOMINION_GAME_NUM_FUEL_STATIONS", parse);
    env_override!(config, game.num_light_nodes, "DOMINION_GAME_NUM_LIGHT_NODES", parse);
    env_override!(config, game.min_spacing, "DOMINION_GAME_MIN_SPACING", parse);
    env_override!(config, game.agent_clearance, "DOMINION_GAME_AGENT_CLEARANCE", parse);

    // Fuel
    env_override!(config, fuel.initial, "DOMINION_FUEL_INITIAL", parse);
    env_override!(config, fuel.max, "DOMINION_FUEL_MAX", parse);
    env_override!(config, fuel.move_cost, "DOMINION_FUEL_MOVE_COST", parse);
    env_override!(config, fuel.control_cost, "DOMINION_FUEL_CONTROL_COST", parse);
    env_override!(config, fuel.capture_cost, "DOMINION_FUEL_CAPTURE_COST", parse);
    env_override!(config, fuel.refuel_amount, "DOMINION_FUEL_REFUEL_AMOUNT", parse);
    env_override!(config, fuel.station_capacity, "DOMINION_FUEL_STATION_CAPACITY", parse);
    env_override!(config, fuel.regen_interval, "DOMINION_FUEL_REGEN_INTERVAL", parse);
    env_override!(config, fuel.regen_amount, "DOMINION_FUEL_REGEN_AMOUNT", parse);

    // Scoring
    env_override!(config, scoring.node_weight, "DOMINION_SCORING_NODE_WEIGHT", parse);
    env_override!(config, scoring.fuel_weight, "DOMINION_SCORING_FUEL_WEIGHT", parse);
    env_override!(config, scoring.proximity_weight, "DOMINION_SCORING_PROXIMITY_WEIGHT", parse);
    env_override!(config, scoring.sight_weight, "DOMINION_SCORING_SIGHT_WEIGHT", parse);
    env_override!(config, scoring.outcome_weight, "DOMINION_SCORING_OUTCOME_WEIGHT", parse);

    // Minimax
    env_override!(config, minimax.depth, "DOMINION_MINIMAX_DEPTH", parse);
    env_override!(config, minimax.pruning, "DOMINION_MINIMAX_PRUNING", parse);
    env_override!(config, minimax.move_ordering, "DOMINION_MINIMAX_MOVE_ORDERING", parse);
    env_override!(config, minimax.parallel_root, "DOMINION_MINIMAX_PARALLEL_ROOT", parse);
    env_override!(config, minimax.time_limit_ms, "DOMINION_MINIMAX_TIME_LIMIT_MS", parse);

    // MCTS
    env_override!(config, mcts.num_simulations, "DOMINION_MCTS_NUM_SIMULATIONS", parse);
    env_override!(config, mcts.exploration, "DOMINION_MCTS_EXPLORATION", parse);
    env_override!(config, mcts.rollout_depth, "DOMINION_MCTS_ROLLOUT_DEPTH", parse);
    env_override!(config, mcts.reward_scale, "DOMINION_MCTS_REWARD_SCALE", parse);
    env_override!(config, mcts.time_limit_ms, "DOMINION_MCTS_TIME_LIMIT_MS", parse);

    // Arena
    env_override!(config, arena.matches, "DOMINION_ARENA_MATCHES", parse);
    env_override!(config, arena.turn_delay_ms, "DOMINION_ARENA_TURN_DELAY_MS", parse);
    env_override!(config, arena.events_path, "DOMINION_ARENA_EVENTS_PATH");
    env_override!(config, arena.log_interval, "DOMINION_ARENA_LOG_INTERVAL", parse);
    config
}
