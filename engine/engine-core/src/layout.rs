//! Explicit board descriptions.
//!
//! A [`Layout`] is the terrain plus spawn points and a few overrides. It is
//! produced either by parsing ASCII art (handy for tests and hand-made maps)
//! or by the seeded generator, and turned into a [`GameState`] with
//! [`Layout::into_state`].
//!
//! Glyphs: `.` open, `#` wall, `D` closed door, `d` open door, `W` window,
//! `T` tree, `F` fuel station, `N` light node, `S` Strategist start,
//! `R` Reactive start. Whitespace inside a row is ignored.

use crate::agent::{Agent, AgentId};
use crate::error::{GameError, Result};
use crate::grid::{Cell, Grid, Position};
use crate::rules::{RulesConfig, MAX_GRID_SIZE};
use crate::state::{Door, FuelStation, GameState, LightNode};

#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    grid: Grid,
    starts: [Position; 2],
    open_doors: Vec<Position>,
    fuel: [Option<u32>; 2],
    owners: Vec<(Position, AgentId)>,
    first_player: AgentId,
}

impl Layout {
    pub(crate) fn new(grid: Grid, starts: [Position; 2]) -> Self {
        Self {
            grid,
            starts,
            open_doors: Vec::new(),
            fuel: [None, None],
            owners: Vec::new(),
            first_player: AgentId::Strategist,
        }
    }

    /// Parse an ASCII map. Blank leading/trailing lines are skipped.
    pub fn parse(text: &str) -> Result<Self> {
        let rows: Vec<(usize, Vec<char>)> = text
            .lines()
            .enumerate()
            .map(|(i, line)| (i + 1, line.chars().filter(|c| !c.is_whitespace()).collect::<Vec<_>>()))
            .filter(|(_, row)| !row.is_empty())
            .collect();

        let size = rows.len();
        if size == 0 {
            return Err(GameError::layout(0, "layout is empty"));
        }
        if size > MAX_GRID_SIZE {
            return Err(GameError::layout(
                rows[MAX_GRID_SIZE].0,
                format!("layout has {size} rows, at most {MAX_GRID_SIZE} allowed"),
            ));
        }

        let mut grid = Grid::new(size);
        let mut starts: [Option<Position>; 2] = [None, None];
        let mut open_doors = Vec::new();

        for (y, (line, row)) in rows.iter().enumerate() {
            if row.len() != size {
                return Err(GameError::layout(
                    *line,
                    format!("expected {size} cells, found {}", row.len()),
                ));
            }
            for (x, &glyph) in row.iter().enumerate() {
                let pos = Position::new(x as i32, y as i32);
                let cell = match glyph {
                    '.' => Cell::Open,
                    '#' => Cell::Wall,
                    'D' => Cell::Door,
                    'd' => {
                        open_doors.push(pos);
                        Cell::Door
                    }
                    'W' => Cell::Window,
                    'T' => Cell::Tree,
                    'F' => Cell::FuelStation,
                    'N' => Cell::LightNode,
                    'S' | 'R' => {
                        let agent = if glyph == 'S' {
                            AgentId::Strategist
                        } else {
                            AgentId::Reactive
                        };
                        if starts[agent.index()].replace(pos).is_some() {
                            return Err(GameError::layout(
                                *line,
                                format!("duplicate start for {agent}"),
                            ));
                        }
                        Cell::Open
                    }
                    other => {
                        return Err(GameError::layout(*line, format!("unknown glyph {other:?}")))
                    }
                };
                grid.set(pos, cell);
            }
        }

        let [Some(strategist), Some(reactive)] = starts else {
            let missing = if starts[0].is_none() { 'S' } else { 'R' };
            return Err(GameError::layout(0, format!("missing start '{missing}'")));
        };

        let mut layout = Layout::new(grid, [strategist, reactive]);
        layout.open_doors = open_doors;
        Ok(layout)
    }

    /// Override the starting fuel of one agent.
    pub fn with_fuel(mut self, agent: AgentId, fuel: u32) -> Self {
        self.fuel[agent.index()] = Some(fuel);
        self
    }

    /// Give the light node at `pos` to `agent` before the first turn.
    pub fn with_owner(mut self, pos: Position, agent: AgentId) -> Self {
        self.owners.retain(|(p, _)| *p != pos);
        self.owners.push((pos, agent));
        self
    }

    pub fn with_first_player(mut self, agent: AgentId) -> Self {
        self.first_player = agent;
        self
    }

    pub fn size(&self) -> usize {
        self.grid.size()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Build the initial state. `rules.grid_size` is replaced by the layout
    /// size; everything else comes from `rules`.
    pub fn into_state(self, rules: &RulesConfig) -> Result<GameState> {
        let rules = rules.clone().with_grid_size(self.grid.size());
        rules.validate()?;

        let mut nodes: Vec<LightNode> = Vec::new();
        let mut stations = Vec::new();
        let mut doors = Vec::new();
        for pos in self.grid.positions() {
            match self.grid.terrain_at(pos) {
                Some(Cell::LightNode) => nodes.push(LightNode {
                    position: pos,
                    controlled_by: None,
                }),
                Some(Cell::FuelStation) => stations.push(FuelStation {
                    position: pos,
                    capacity: rules.station_capacity,
                    current: rules.station_capacity,
                }),
                Some(Cell::Door) => doors.push(Door {
                    position: pos,
                    open: self.open_doors.contains(&pos),
                }),
                _ => {}
            }
        }

        let mut agents = AgentId::BOTH.map(|id| {
            let fuel = self.fuel[id.index()].unwrap_or(rules.initial_fuel);
            Agent::new(id, self.starts[id.index()], fuel)
        });

        for (pos, owner) in &self.owners {
            let node = nodes
                .iter_mut()
                .find(|n| n.position == *pos)
                .ok_or_else(|| GameError::layout(0, format!("no light node at {pos} to assign")))?;
            node.controlled_by = Some(*owner);
            agents[owner.index()].nodes_controlled += 1;
        }

        GameState::from_parts(
            self.grid,
            rules,
            agents,
            stations,
            nodes,
            doors,
            self.first_player,
        )
    }
}

/// Render a state as layout glyphs, one row per line. Agents are drawn over
/// the terrain they stand on.
pub fn render(state: &GameState) -> String {
    let grid = state.grid();
    let mut out = String::with_capacity(grid.size() * (grid.size() + 1));
    for pos in grid.positions() {
        let glyph = match state.occupant(pos) {
            Some(AgentId::Strategist) => 'S',
            Some(AgentId::Reactive) => 'R',
            None => match grid.terrain_at(pos) {
                Some(Cell::Door) if state.is_door_open(pos) => 'd',
                Some(cell) => cell.glyph(),
                None => '?',
            },
        };
        out.push(glyph);
        if pos.x as usize == grid.size() - 1 {
            out.push('\n');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAP: &str = "
        S . . #
        . N D .
        . F W .
        T . . R
    ";

    #[test]
    fn test_parse_places_everything() {
        let layout = Layout::parse(MAP).unwrap();
        assert_eq!(layout.size(), 4);
        assert_eq!(layout.grid().terrain_at(Position::new(3, 0)), Some(Cell::Wall));
        assert_eq!(layout.grid().terrain_at(Position::new(2, 1)), Some(Cell::Door));
        assert_eq!(layout.grid().terrain_at(Position::new(0, 3)), Some(Cell::Tree));

        let state = layout.into_state(&RulesConfig::default()).unwrap();
        assert_eq!(state.agent(AgentId::Strategist).position, Position::new(0, 0));
        assert_eq!(state.agent(AgentId::Reactive).position, Position::new(3, 3));
    }

    #[test]
    fn test_into_state_builds_objects() {
        let state = Layout::parse(MAP)
            .unwrap()
            .into_state(&RulesConfig::default())
            .unwrap();
        assert_eq!(state.nodes().len(), 1);
        assert_eq!(state.stations().len(), 1);
        assert_eq!(state.doors().len(), 1);
        assert!(!state.doors()[0].open);
        assert_eq!(state.stations()[0].current, 15);
        assert_eq!(state.agent(AgentId::Reactive).fuel, 10);
        assert_eq!(state.rules().grid_size, 4);
        assert_eq!(state.active_player(), AgentId::Strategist);
    }

    #[test]
    fn test_overrides() {
        let state = Layout::parse(MAP)
            .unwrap()
            .with_fuel(AgentId::Strategist, 3)
            .with_owner(Position::new(1, 1), AgentId::Reactive)
            .with_first_player(AgentId::Reactive)
            .into_state(&RulesConfig::default())
            .unwrap();
        assert_eq!(state.agent(AgentId::Strategist).fuel, 3);
        assert_eq!(state.agent(AgentId::Reactive).nodes_controlled, 1);
        assert_eq!(state.nodes()[0].controlled_by, Some(AgentId::Reactive));
        assert_eq!(state.active_player(), AgentId::Reactive);
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let err = Layout::parse("S.\n.R.\n").unwrap_err();
        assert!(matches!(err, GameError::InvalidLayout { line: 2, .. }));
    }

    #[test]
    fn test_oversized_layout_rejected() {
        let text = ".\n".repeat(MAX_GRID_SIZE + 1);
        let err = Layout::parse(&text).unwrap_err();
        assert!(matches!(
            err,
            GameError::InvalidLayout { line, .. } if line == MAX_GRID_SIZE + 1
        ));
    }

    #[test]
    fn test_unknown_glyph_rejected() {
        let err = Layout::parse("S?\n.R").unwrap_err();
        assert!(err.to_string().contains("unknown glyph"));
    }

    #[test]
    fn test_missing_and_duplicate_starts() {
        let missing = Layout::parse("S.\n..").unwrap_err();
        assert!(missing.to_string().contains("missing start 'R'"));

        let duplicate = Layout::parse("SS\n.R").unwrap_err();
        assert!(duplicate.to_string().contains("duplicate start"));
    }

    #[test]
    fn test_owner_requires_node() {
        let err = Layout::parse(MAP)
            .unwrap()
            .with_owner(Position::new(0, 1), AgentId::Strategist)
            .into_state(&RulesConfig::default())
            .unwrap_err();
        assert!(matches!(err, GameError::InvalidLayout { .. }));
    }

    #[test]
    fn test_excess_fuel_is_an_invariant_violation() {
        let err = Layout::parse(MAP)
            .unwrap()
            .with_fuel(AgentId::Strategist, 99)
            .into_state(&RulesConfig::default())
            .unwrap_err();
        assert!(matches!(err, GameError::InvariantViolation(_)));
    }

    #[test]
    fn test_render_matches_source() {
        let state = Layout::parse(MAP)
            .unwrap()
            .into_state(&RulesConfig::default())
            .unwrap();
        assert_eq!(render(&state), "S..#\n.ND.\n.FW.\nT..R\n");
    }
}
