//! Command-line configuration for the arena binary.
//!
//! Defaults come from the central config (config.toml plus `DOMINION_*`
//! environment overrides); flags given on the command line win.

use anyhow::{anyhow, Result};
use clap::Parser;
use engine_config::{load_config, CentralConfig};
use once_cell::sync::Lazy;
use std::path::PathBuf;
use std::time::Duration;
use tracing::level_filters::LevelFilter;

use crate::setup::MatchSetup;

// Load central config once at startup
static CENTRAL_CONFIG: Lazy<CentralConfig> = Lazy::new(load_config);

fn default_log_level() -> String {
    CENTRAL_CONFIG.common.log_level.clone()
}

fn default_seed() -> u64 {
    CENTRAL_CONFIG.common.seed
}

fn default_matches() -> u32 {
    CENTRAL_CONFIG.arena.matches
}

fn default_grid_size() -> usize {
    CENTRAL_CONFIG.game.grid_size
}

fn default_max_turns() -> u32 {
    CENTRAL_CONFIG.game.max_turns
}

fn default_depth() -> u32 {
    CENTRAL_CONFIG.minimax.depth
}

fn default_simulations() -> u32 {
    CENTRAL_CONFIG.mcts.num_simulations
}

fn default_turn_delay() -> u64 {
    CENTRAL_CONFIG.arena.turn_delay_ms
}

fn default_events_path() -> String {
    CENTRAL_CONFIG.arena.events_path.clone()
}

fn default_log_interval() -> u32 {
    CENTRAL_CONFIG.arena.log_interval
}

#[derive(Parser, Debug, Clone)]
#[command(name = "arena")]
#[command(about = "Fuel Dominion arena - minimax Strategist vs MCTS Reactive")]
#[command(
    long_about = "Runs Fuel Dominion matches on procedurally generated boards. The
Strategist searches with depth-limited alpha-beta minimax, the Reactive agent
with UCB1 Monte Carlo Tree Search.

Configuration is loaded from config.toml with DOMINION_<SECTION>_<KEY>
environment overrides. CLI arguments take highest priority."
)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value_t = default_log_level())]
    pub log_level: String,

    /// Seed of the first match; match i uses seed + i
    #[arg(long, default_value_t = default_seed())]
    pub seed: u64,

    /// Number of matches to play
    #[arg(long, default_value_t = default_matches())]
    pub matches: u32,

    /// Board side length
    #[arg(long, default_value_t = default_grid_size())]
    pub grid_size: usize,

    /// Total actions (both agents) before the match ends
    #[arg(long, default_value_t = default_max_turns())]
    pub max_turns: u32,

    /// Strategist search depth in plies
    #[arg(long, default_value_t = default_depth())]
    pub depth: u32,

    /// Reactive MCTS simulations per decision
    #[arg(long, default_value_t = default_simulations())]
    pub simulations: u32,

    /// Pause between turns in milliseconds (0 = as fast as possible)
    #[arg(long, default_value_t = default_turn_delay())]
    pub turn_delay_ms: u64,

    /// Write every match event as a JSON line to this file (empty = off)
    #[arg(long, default_value_t = default_events_path())]
    pub events_path: String,

    /// Log a progress line every N turns (0 to disable)
    #[arg(long, default_value_t = default_log_interval())]
    pub log_interval: u32,

    /// Log the Prometheus metrics text when the run ends
    #[arg(long)]
    pub print_metrics: bool,

    #[arg(skip = (*CENTRAL_CONFIG).clone())]
    pub central: CentralConfig,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.log_level.parse::<LevelFilter>().is_err() {
            return Err(anyhow!(
                "invalid log level '{}', expected one of trace, debug, info, warn, error",
                self.log_level
            ));
        }

        if self.matches == 0 {
            return Err(anyhow!("matches must be greater than 0"));
        }

        if self.depth == 0 {
            return Err(anyhow!("depth must be greater than 0"));
        }

        if self.simulations == 0 {
            return Err(anyhow!("simulations must be greater than 0"));
        }

        self.match_setup()
            .rules
            .validate_for_generation()
            .map_err(|e| anyhow!("invalid game rules: {}", e))?;

        Ok(())
    }

    /// Central settings with the command-line overrides applied.
    pub fn match_setup(&self) -> MatchSetup {
        let mut setup = MatchSetup::from_central(&self.central).with_seed(self.seed);
        setup.rules.grid_size = self.grid_size;
        setup.rules.max_turns = self.max_turns;
        setup.minimax.depth = self.depth;
        setup.mcts.num_simulations = self.simulations;
        setup
    }

    pub fn turn_delay(&self) -> Duration {
        Duration::from_millis(self.turn_delay_ms)
    }

    pub fn events_path(&self) -> Option<PathBuf> {
        (!self.events_path.is_empty()).then(|| PathBuf::from(&self.events_path))
    }
}
