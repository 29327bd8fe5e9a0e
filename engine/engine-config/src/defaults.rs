//! Default configuration values loaded from config.defaults.toml.
//!
//! The shared TOML file is embedded at compile time so the binary, the
//! tests and a hand-edited config.toml all start from the same numbers.

use once_cell::sync::Lazy;
use serde::Deserialize;

/// The embedded defaults TOML file (loaded at compile time)
const DEFAULTS_TOML: &str = include_str!("../../../config.defaults.toml");

/// Parsed defaults structure (parsed once at first use)
static DEFAULTS: Lazy<DefaultsConfig> = Lazy::new(|| {
    toml::from_str(DEFAULTS_TOML).expect("config.defaults.toml should be valid TOML")
});

// ============================================================================
// Internal structs for parsing config.defaults.toml
// ============================================================================

#[derive(Debug, Deserialize)]
struct DefaultsConfig {
    common: CommonDefaults,
    game: GameDefaults,
    fuel: FuelDefaults,
    scoring: ScoringDefaults,
    minimax: MinimaxDefaults,
    mcts: MctsDefaults,
    arena: ArenaDefaults,
}

#[derive(Debug, Deserialize)]
struct CommonDefaults {
    log_level: String,
    seed: u64,
}

#[derive(Debug, Deserialize)]
struct GameDefaults {
    grid_size: usize,
    max_turns: u32,
    early_victory: bool,
    num_walls: usize,
    num_doors: usize,
    num_windows: usize,
    num_trees: usize,
    num_fuel_stations: usize,
    num_light_nodes: usize,
    min_spacing: u32,
    agent_clearance: u32,
}

#[derive(Debug, Deserialize)]
struct FuelDefaults {
    initial: u32,
    max: u32,
    move_cost: u32,
    control_cost: u32,
    capture_cost: u32,
    refuel_amount: u32,
    station_capacity: u32,
    regen_interval: u32,
    regen_amount: u32,
}

#[derive(Debug, Deserialize)]
struct ScoringDefaults {
    node_weight: f32,
    fuel_weight: f32,
    proximity_weight: f32,
    sight_weight: f32,
    outcome_weight: f32,
}

#[derive(Debug, Deserialize)]
struct MinimaxDefaults {
    depth: u32,
    pruning: bool,
    move_ordering: bool,
    parallel_root: bool,
    time_limit_ms: u64,
}

#[derive(Debug, Deserialize)]
struct MctsDefaults {
    num_simulations: u32,
    exploration: f64,
    rollout_depth: u32,
    reward_scale: f32,
    time_limit_ms: u64,
}

#[derive(Debug, Deserialize)]
struct ArenaDefaults {
    matches: u32,
    turn_delay_ms: u64,
    events_path: String,
    log_interval: u32,
}

// ============================================================================
// Public accessor functions
// ============================================================================

// Common
pub fn log_level() -> &'static str {
    &DEFAULTS.common.log_level
}
pub fn seed() -> u64 {
    DEFAULTS.common.seed
}

// Game
pub fn grid_size() -> usize {
    DEFAULTS.game.grid_size
}
pub fn max_turns() -> u32 {
    DEFAULTS.game.max_turns
}
pub fn early_victory() -> bool {
    DEFAULTS.game.early_victory
}
pub fn num_walls() -> usize {
    DEFAULTS.game.num_walls
}
pub fn num_doors() -> usize {
    DEFAULTS.game.num_doors
}
pub fn num_windows() -> usize {
    DEFAULTS.game.num_windows
}
pub fn num_trees() -> usize {
    DEFAULTS.game.num_trees
}
pub fn num_fuel_stations() -> usize {
    DEFAULTS.game.num_fuel_stations
}
pub fn num_light_nodes() -> usize {
    DEFAULTS.game.num_light_nodes
}
pub fn min_spacing() -> u32 {
    DEFAULTS.game.min_spacing
}
pub fn agent_clearance() -> u32 {
    DEFAULTS.game.agent_clearance
}

// Fuel
pub fn initial_fuel() -> u32 {
    DEFAULTS.fuel.initial
}
pub fn max_fuel() -> u32 {
    DEFAULTS.fuel.max
}
pub fn move_cost() -> u32 {
    DEFAULTS.fuel.move_cost
}
pub fn control_cost() -> u32 {
    DEFAULTS.fuel.control_cost
}
pub fn capture_cost() -> u32 {
    DEFAULTS.fuel.capture_cost
}
pub fn refuel_amount() -> u32 {
    DEFAULTS.fuel.refuel_amount
}
pub fn station_capacity() -> u32 {
    DEFAULTS.fuel.station_capacity
}
pub fn regen_interval() -> u32 {
    DEFAULTS.fuel.regen_interval
}
pub fn regen_amount() -> u32 {
    DEFAULTS.fuel.regen_amount
}

// Scoring
pub fn node_weight() -> f32 {
    DEFAULTS.scoring.node_weight
}
pub fn fuel_weight() -> f32 {
    DEFAULTS.scoring.fuel_weight
}
pub fn proximity_weight() -> f32 {
    DEFAULTS.scoring.proximity_weight
}
pub fn sight_weight() -> f32 {
    DEFAULTS.scoring.sight_weight
}
pub fn outcome_weight() -> f32 {
    DEFAULTS.scoring.outcome_weight
}

// Minimax
pub fn minimax_depth() -> u32 {
    DEFAULTS.minimax.depth
}
pub fn pruning() -> bool {
    DEFAULTS.minimax.pruning
}
pub fn move_ordering() -> bool {
    DEFAULTS.minimax.move_ordering
}
pub fn parallel_root() -> bool {
    DEFAULTS.minimax.parallel_root
}
pub fn minimax_time_limit_ms() -> u64 {
    DEFAULTS.minimax.time_limit_ms
}

// MCTS
pub fn num_simulations() -> u32 {
    DEFAULTS.mcts.num_simulations
}
pub fn exploration() -> f64 {
    DEFAULTS.mcts.exploration
}
pub fn rollout_depth() -> u32 {
    DEFAULTS.mcts.rollout_depth
}
pub fn reward_scale() -> f32 {
    DEFAULTS.mcts.reward_scale
}
pub fn mcts_time_limit_ms() -> u64 {
    DEFAULTS.mcts.time_limit_ms
}

// Arena
pub fn matches() -> u32 {
    DEFAULTS.arena.matches
}
pub fn turn_delay_ms() -> u64 {
    DEFAULTS.arena.turn_delay_ms
}
pub fn events_path() -> &'static str {
    &DEFAULTS.arena.events_path
}
pub fn log_interval() -> u32 {
    DEFAULTS.arena.log_interval
}
