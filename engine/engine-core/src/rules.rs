//! Match rules: board dimensions, object counts and the fuel economy.

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};

/// Smallest board on which the spawn points and placement bands fit.
pub const MIN_GENERATED_GRID: usize = 8;

/// Largest accepted board side. Keeps coordinates well inside `i32`.
pub const MAX_GRID_SIZE: usize = 1024;

/// Immutable parameters of one match. Shared between state clones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    pub grid_size: usize,
    pub max_turns: u32,
    /// End the match as soon as one agent owns every light node.
    pub early_victory: bool,

    pub num_walls: usize,
    pub num_doors: usize,
    pub num_windows: usize,
    pub num_trees: usize,
    pub num_fuel_stations: usize,
    pub num_light_nodes: usize,
    /// Chebyshev radius around a placed object that must be empty.
    pub min_spacing: u32,
    /// Manhattan radius around each spawn kept free of obstacles.
    pub agent_clearance: u32,

    pub initial_fuel: u32,
    pub max_fuel: u32,
    pub move_cost: u32,
    pub control_cost: u32,
    pub capture_cost: u32,
    pub refuel_amount: u32,
    pub station_capacity: u32,
    /// Stations regenerate every this many turns; 0 disables.
    pub regen_interval: u32,
    pub regen_amount: u32,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            grid_size: 12,
            max_turns: 100,
            early_victory: true,
            num_walls: 15,
            num_doors: 5,
            num_windows: 8,
            num_trees: 6,
            num_fuel_stations: 4,
            num_light_nodes: 10,
            min_spacing: 1,
            agent_clearance: 3,
            initial_fuel: 10,
            max_fuel: 20,
            move_cost: 1,
            control_cost: 0,
            capture_cost: 1,
            refuel_amount: 5,
            station_capacity: 15,
            regen_interval: 5,
            regen_amount: 1,
        }
    }
}

impl RulesConfig {
    pub fn with_grid_size(mut self, grid_size: usize) -> Self {
        self.grid_size = grid_size;
        self
    }

    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = max_turns;
        self
    }

    pub fn with_early_victory(mut self, early_victory: bool) -> Self {
        self.early_victory = early_victory;
        self
    }

    pub fn with_regen(mut self, interval: u32, amount: u32) -> Self {
        self.regen_interval = interval;
        self.regen_amount = amount;
        self
    }

    /// Total number of placed obstacles.
    pub fn obstacle_count(&self) -> usize {
        self.num_walls
            .saturating_add(self.num_doors)
            .saturating_add(self.num_windows)
            .saturating_add(self.num_trees)
    }

    /// Check the rule values that apply to every match, generated or not.
    pub fn validate(&self) -> Result<()> {
        if self.grid_size < 3 {
            return Err(GameError::InvalidConfiguration(format!(
                "grid_size must be at least 3, got {}",
                self.grid_size
            )));
        }
        if self.grid_size > MAX_GRID_SIZE {
            return Err(GameError::InvalidConfiguration(format!(
                "grid_size must be at most {MAX_GRID_SIZE}, got {}",
                self.grid_size
            )));
        }
        if self.max_turns == 0 {
            return Err(GameError::InvalidConfiguration(
                "max_turns must be positive".into(),
            ));
        }
        if self.max_fuel == 0 {
            return Err(GameError::InvalidConfiguration(
                "max_fuel must be positive".into(),
            ));
        }
        if self.initial_fuel > self.max_fuel {
            return Err(GameError::InvalidConfiguration(format!(
                "initial_fuel ({}) exceeds max_fuel ({})",
                self.initial_fuel, self.max_fuel
            )));
        }
        if self.station_capacity == 0 {
            return Err(GameError::InvalidConfiguration(
                "station_capacity must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Additional checks for procedurally generated boards.
    pub fn validate_for_generation(&self) -> Result<()> {
        self.validate()?;
        if self.grid_size < MIN_GENERATED_GRID {
            return Err(GameError::InvalidConfiguration(format!(
                "generated boards need grid_size >= {MIN_GENERATED_GRID}, got {}",
                self.grid_size
            )));
        }
        let cells = self.grid_size.checked_mul(self.grid_size);
        let wanted = self
            .obstacle_count()
            .checked_add(self.num_fuel_stations)
            .and_then(|n| n.checked_add(self.num_light_nodes))
            .and_then(|n| n.checked_add(2));
        let fits = matches!((wanted, cells), (Some(wanted), Some(cells)) if wanted <= cells);
        if !fits {
            let wanted = wanted.map_or_else(|| "too many".to_string(), |n| n.to_string());
            return Err(GameError::InvalidConfiguration(format!(
                "{wanted} objects do not fit on a {0}x{0} board",
                self.grid_size
            )));
        }
        Ok(())
    }
}
