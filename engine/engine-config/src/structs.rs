//! Configuration structs matching the sections of config.toml.
//!
//! Every field falls back to the embedded default when absent, so a
//! config.toml only needs the keys it changes.

use serde::Deserialize;

use crate::defaults;

// ============================================================================
// Serde default functions (required for #[serde(default = "...")])
// ============================================================================

fn d_log_level() -> String {
    defaults::log_level().into()
}
fn d_seed() -> u64 {
    defaults::seed()
}
fn d_grid_size() -> usize {
    defaults::grid_size()
}
fn d_max_turns() -> u32 {
    defaults::max_turns()
}
fn d_early_victory() -> bool {
    defaults::early_victory()
}
fn d_num_walls() -> usize {
    defaults::num_walls()
}
fn d_num_doors() -> usize {
    defaults::num_doors()
}
fn d_num_windows() -> usize {
    defaults::num_windows()
}
fn d_num_trees() -> usize {
    defaults::num_trees()
}
fn d_num_fuel_stations() -> usize {
    defaults::num_fuel_stations()
}
fn d_num_light_nodes() -> usize {
    defaults::num_light_nodes()
}
fn d_min_spacing() -> u32 {
    defaults::min_spacing()
}
fn d_agent_clearance() -> u32 {
    defaults::agent_clearance()
}
fn d_initial_fuel() -> u32 {
    defaults::initial_fuel()
}
fn d_max_fuel() -> u32 {
    defaults::max_fuel()
}
fn d_move_cost() -> u32 {
    defaults::move_cost()
}
fn d_control_cost() -> u32 {
    defaults::control_cost()
}
fn d_capture_cost() -> u32 {
    defaults::capture_cost()
}
fn d_refuel_amount() -> u32 {
    defaults::refuel_amount()
}
fn d_station_capacity() -> u32 {
    defaults::station_capacity()
}
fn d_regen_interval() -> u32 {
    defaults::regen_interval()
}
fn d_regen_amount() -> u32 {
    defaults::regen_amount()
}
fn d_node_weight() -> f32 {
    defaults::node_weight()
}
fn d_fuel_weight() -> f32 {
    defaults::fuel_weight()
}
fn d_proximity_weight() -> f32 {
    defaults::proximity_weight()
}
fn d_sight_weight() -> f32 {
    defaults::sight_weight()
}
fn d_outcome_weight() -> f32 {
    defaults::outcome_weight()
}
fn d_minimax_depth() -> u32 {
    defaults::minimax_depth()
}
fn d_pruning() -> bool {
    defaults::pruning()
}
fn d_move_ordering() -> bool {
    defaults::move_ordering()
}
fn d_parallel_root() -> bool {
    defaults::parallel_root()
}
fn d_minimax_time_limit_ms() -> u64 {
    defaults::minimax_time_limit_ms()
}
fn d_num_simulations() -> u32 {
    defaults::num_simulations()
}
fn d_exploration() -> f64 {
    defaults::exploration()
}
fn d_rollout_depth() -> u32 {
    defaults::rollout_depth()
}
fn d_reward_scale() -> f32 {
    defaults::reward_scale()
}
fn d_mcts_time_limit_ms() -> u64 {
    defaults::mcts_time_limit_ms()
}
fn d_matches() -> u32 {
    defaults::matches()
}
fn d_turn_delay_ms() -> u64 {
    defaults::turn_delay_ms()
}
fn d_events_path() -> String {
    defaults::events_path().into()
}
fn d_log_interval() -> u32 {
    defaults::log_interval()
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Root configuration structure matching config.toml
#[derive(Debug, Deserialize, Default, Clone)]
pub struct CentralConfig {
    #[serde(default)]
    pub common: CommonConfig,
    #[serde(default)]
    pub game: GameConfig,
    #[serde(default)]
    pub fuel: FuelConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub minimax: MinimaxConfig,
    #[serde(default)]
    pub mcts: MctsConfig,
    #[serde(default)]
    pub arena: ArenaConfig,
}

/// Settings shared by all components
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CommonConfig {
    #[serde(default = "d_log_level")]
    pub log_level: String,
    /// Seed of the first match; later matches use seed + index.
    #[serde(default = "d_seed")]
    pub seed: u64,
}

impl Default for CommonConfig {
    fn default() -> Self {
        Self {
            log_level: defaults::log_level().into(),
            seed: defaults::seed(),
        }
    }
}

/// Board size, match length and object counts for generation
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct GameConfig {
    #[serde(default = "d_grid_size")]
    pub grid_size: usize,
    #[serde(default = "d_max_turns")]
    pub max_turns: u32,
    #[serde(default = "d_early_victory")]
    pub early_victory: bool,
    #[serde(default = "d_num_walls")]
    pub num_walls: usize,
    #[serde(default = "d_num_doors")]
    pub num_doors: usize,
    #[serde(default = "d_num_windows")]
    pub num_windows: usize,
    #[serde(default = "d_num_trees")]
    pub num_trees: usize,
    #[serde(default = "d_num_fuel_stations")]
    pub num_fuel_stations: usize,
    #[serde(default = "d_num_light_nodes")]
    pub num_light_nodes: usize,
    #[serde(default = "d_min_spacing")]
    pub min_spacing: u32,
    #[serde(default = "d_agent_clearance")]
    pub agent_clearance: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: defaults::grid_size(),
            max_turns: defaults::max_turns(),
            early_victory: defaults::early_victory(),
            num_walls: defaults::num_walls(),
            num_doors: defaults::num_doors(),
            num_windows: defaults::num_windows(),
            num_trees: defaults::num_trees(),
            num_fuel_stations: defaults::num_fuel_stations(),
            num_light_nodes: defaults::num_light_nodes(),
            min_spacing: defaults::min_spacing(),
            agent_clearance: defaults::agent_clearance(),
        }
    }
}

/// Fuel economy
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct FuelConfig {
    #[serde(default = "d_initial_fuel")]
    pub initial: u32,
    #[serde(default = "d_max_fuel")]
    pub max: u32,
    #[serde(default = "d_move_cost")]
    pub move_cost: u32,
    #[serde(default = "d_control_cost")]
    pub control_cost: u32,
    #[serde(default = "d_capture_cost")]
    pub capture_cost: u32,
    #[serde(default = "d_refuel_amount")]
    pub refuel_amount: u32,
    #[serde(default = "d_station_capacity")]
    pub station_capacity: u32,
    /// Turns between station regeneration ticks (0 disables)
    #[serde(default = "d_regen_interval")]
    pub regen_interval: u32,
    #[serde(default = "d_regen_amount")]
    pub regen_amount: u32,
}

impl Default for FuelConfig {
    fn default() -> Self {
        Self {
            initial: defaults::initial_fuel(),
            max: defaults::max_fuel(),
            move_cost: defaults::move_cost(),
            control_cost: defaults::control_cost(),
            capture_cost: defaults::capture_cost(),
            refuel_amount: defaults::refuel_amount(),
            station_capacity: defaults::station_capacity(),
            regen_interval: defaults::regen_interval(),
            regen_amount: defaults::regen_amount(),
        }
    }
}

/// Heuristic evaluation weights
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ScoringConfig {
    #[serde(default = "d_node_weight")]
    pub node_weight: f32,
    #[serde(default = "d_fuel_weight")]
    pub fuel_weight: f32,
    #[serde(default = "d_proximity_weight")]
    pub proximity_weight: f32,
    #[serde(default = "d_sight_weight")]
    pub sight_weight: f32,
    #[serde(default = "d_outcome_weight")]
    pub outcome_weight: f32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            node_weight: defaults::node_weight(),
            fuel_weight: defaults::fuel_weight(),
            proximity_weight: defaults::proximity_weight(),
            sight_weight: defaults::sight_weight(),
            outcome_weight: defaults::outcome_weight(),
        }
    }
}

/// Strategist (alpha-beta) search settings
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MinimaxConfig {
    #[serde(default = "d_minimax_depth")]
    pub depth: u32,
    #[serde(default = "d_pruning")]
    pub pruning: bool,
    #[serde(default = "d_move_ordering")]
    pub move_ordering: bool,
    #[serde(default = "d_parallel_root")]
    pub parallel_root: bool,
    /// Wall-clock budget per decision in milliseconds (0 = unbounded)
    #[serde(default = "d_minimax_time_limit_ms")]
    pub time_limit_ms: u64,
}

impl Default for MinimaxConfig {
    fn default() -> Self {
        Self {
            depth: defaults::minimax_depth(),
            pruning: defaults::pruning(),
            move_ordering: defaults::move_ordering(),
            parallel_root: defaults::parallel_root(),
            time_limit_ms: defaults::minimax_time_limit_ms(),
        }
    }
}

/// Reactive (MCTS) search settings
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MctsConfig {
    #[serde(default = "d_num_simulations")]
    pub num_simulations: u32,
    #[serde(default = "d_exploration")]
    pub exploration: f64,
    #[serde(default = "d_rollout_depth")]
    pub rollout_depth: u32,
    #[serde(default = "d_reward_scale")]
    pub reward_scale: f32,
    /// Wall-clock budget per decision in milliseconds (0 = unbounded)
    #[serde(default = "d_mcts_time_limit_ms")]
    pub time_limit_ms: u64,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            num_simulations: defaults::num_simulations(),
            exploration: defaults::exploration(),
            rollout_depth: defaults::rollout_depth(),
            reward_scale: defaults::reward_scale(),
            time_limit_ms: defaults::mcts_time_limit_ms(),
        }
    }
}

/// Match runner settings
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ArenaConfig {
    #[serde(default = "d_matches")]
    pub matches: u32,
    /// Pause between turns for live viewing (0 = none)
    #[serde(default = "d_turn_delay_ms")]
    pub turn_delay_ms: u64,
    /// JSON-lines event file; empty disables it
    #[serde(default = "d_events_path")]
    pub events_path: String,
    /// Log progress every N turns (0 to disable)
    #[serde(default = "d_log_interval")]
    pub log_interval: u32,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            matches: defaults::matches(),
            turn_delay_ms: defaults::turn_delay_ms(),
            events_path: defaults::events_path().into(),
            log_interval: defaults::log_interval(),
        }
    }
}
