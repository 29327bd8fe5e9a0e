//! Seeded procedural board generation.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use tracing::debug;

use crate::agent::AgentId;
use crate::error::{GameError, Result};
use crate::grid::{Cell, Grid, Position};
use crate::layout::Layout;
use crate::rules::RulesConfig;
use crate::state::GameState;

/// Spawn points for a board of side `size`.
pub fn spawn_points(size: usize) -> [Position; 2] {
    let far = size as i32 - 2;
    [Position::new(1, 1), Position::new(far, far)]
}

struct Placer<'a> {
    grid: Grid,
    spawns: [Position; 2],
    rules: &'a RulesConfig,
    rng: ChaCha20Rng,
}

impl Placer<'_> {
    /// Free cell with a `spacing` ring of open cells around it.
    fn is_free(&self, pos: Position, spacing: i32) -> bool {
        if self.grid.terrain_at(pos) != Some(Cell::Open) || self.spawns.contains(&pos) {
            return false;
        }
        for dy in -spacing..=spacing {
            for dx in -spacing..=spacing {
                let near = Position::new(pos.x + dx, pos.y + dy);
                if let Some(cell) = self.grid.terrain_at(near) {
                    if cell != Cell::Open {
                        return false;
                    }
                }
            }
        }
        true
    }

    fn near_spawn(&self, pos: Position) -> bool {
        self.spawns
            .iter()
            .any(|s| pos.manhattan(*s) < self.rules.agent_clearance)
    }

    /// Try `count * 20` random cells in `[lo, hi]^2`. Returns how many
    /// were placed.
    fn place(&mut self, cell: Cell, count: usize, lo: i32, hi: i32, clear_spawns: bool) -> usize {
        let spacing = self.rules.min_spacing as i32;
        let mut placed = 0;
        let mut attempts = 0;
        while placed < count && attempts < count * 20 {
            attempts += 1;
            let pos = Position::new(self.rng.gen_range(lo..=hi), self.rng.gen_range(lo..=hi));
            if clear_spawns && self.near_spawn(pos) {
                continue;
            }
            if self.is_free(pos, spacing) {
                self.grid.set(pos, cell);
                placed += 1;
            }
        }
        if placed < count {
            debug!(?cell, placed, requested = count, "placement budget exhausted");
        }
        placed
    }
}

/// Generate a board layout from `rules` and `seed`. Same inputs, same board.
pub fn generate_layout(rules: &RulesConfig, seed: u64) -> Result<Layout> {
    rules.validate_for_generation()?;

    let n = rules.grid_size as i32;
    let spawns = spawn_points(rules.grid_size);
    let mut placer = Placer {
        grid: Grid::new(rules.grid_size),
        spawns,
        rules,
        rng: ChaCha20Rng::seed_from_u64(seed),
    };

    let (lo, hi) = (3, n - 4);
    placer.place(Cell::Wall, rules.num_walls, lo, hi, true);
    placer.place(Cell::Door, rules.num_doors, lo, hi, true);
    placer.place(Cell::Window, rules.num_windows, lo, hi, true);
    placer.place(Cell::Tree, rules.num_trees, lo, hi, true);
    placer.place(Cell::FuelStation, rules.num_fuel_stations, lo, hi, false);
    let nodes = placer.place(Cell::LightNode, rules.num_light_nodes, 2, n - 3, false);

    if rules.num_light_nodes > 0 && nodes == 0 {
        return Err(GameError::InvalidConfiguration(format!(
            "could not place any of {} light nodes on a {n}x{n} board",
            rules.num_light_nodes
        )));
    }

    Ok(Layout::new(placer.grid, spawns))
}

impl GameState {
    /// Build a fresh, procedurally generated match. Strategist moves first.
    pub fn generate(rules: &RulesConfig, seed: u64) -> Result<Self> {
        let layout = generate_layout(rules, seed)?;
        let state = layout
            .with_first_player(AgentId::Strategist)
            .into_state(rules)?;
        debug!(
            seed,
            nodes = state.nodes().len(),
            stations = state.stations().len(),
            doors = state.doors().len(),
            "generated board"
        );
        Ok(state)
    }
}
