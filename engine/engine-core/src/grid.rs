//! Static terrain and spatial queries.
//!
//! The grid is immutable for the lifetime of a match and is shared between
//! clones of the game state through an `Arc`. The only mutable terrain
//! property, whether a door is open, lives in [`GameState`](crate::GameState)
//! and is passed into the queries that need it.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::rules::MAX_GRID_SIZE;

/// A cell coordinate. `x` grows East, `y` grows South.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Manhattan distance to `other`.
    pub fn manhattan(self, other: Position) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// The neighbouring position one step in `dir` (may be out of bounds).
    pub fn step(self, dir: Direction) -> Position {
        let (dx, dy) = dir.delta();
        Position::new(self.x + dx, self.y + dy)
    }

    pub fn is_adjacent(self, other: Position) -> bool {
        self.manhattan(other) == 1
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// Cardinal movement direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    /// Canonical enumeration order used by action generation.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::East => (1, 0),
            Direction::South => (0, 1),
            Direction::West => (-1, 0),
        }
    }
}

/// Terrain classification of a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cell {
    Open,
    Wall,
    Door,
    Window,
    Tree,
    FuelStation,
    LightNode,
}

impl Cell {
    /// Whether the terrain blocks movement. Doors are treated as closed here;
    /// the game state knows which doors have been opened.
    pub fn blocks_movement(self) -> bool {
        matches!(self, Cell::Wall | Cell::Door | Cell::Window | Cell::Tree)
    }

    /// Whether the terrain blocks sight (doors treated as closed).
    pub fn blocks_sight(self) -> bool {
        matches!(self, Cell::Wall | Cell::Door)
    }

    /// Single-character representation used by [`Layout`](crate::Layout).
    pub fn glyph(self) -> char {
        match self {
            Cell::Open => '.',
            Cell::Wall => '#',
            Cell::Door => 'D',
            Cell::Window => 'W',
            Cell::Tree => 'T',
            Cell::FuelStation => 'F',
            Cell::LightNode => 'N',
        }
    }
}

/// Square terrain matrix stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    size: i32,
    cells: Vec<Cell>,
}

impl Grid {
    /// Create an all-open grid of `size` x `size` cells.
    ///
    /// `size` must not exceed [`MAX_GRID_SIZE`]; rule validation and the
    /// layout parser enforce that before calling here.
    pub fn new(size: usize) -> Self {
        debug_assert!(size <= MAX_GRID_SIZE, "grid size {size} out of range");
        Self {
            size: size as i32,
            cells: vec![Cell::Open; size * size],
        }
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size as usize
    }

    #[inline]
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.size && pos.y < self.size
    }

    #[inline]
    fn index(&self, pos: Position) -> Option<usize> {
        self.in_bounds(pos)
            .then(|| (pos.y * self.size + pos.x) as usize)
    }

    /// Terrain at `pos`, or `None` when out of bounds.
    pub fn terrain_at(&self, pos: Position) -> Option<Cell> {
        self.index(pos).map(|i| self.cells[i])
    }

    pub(crate) fn set(&mut self, pos: Position, cell: Cell) {
        if let Some(i) = self.index(pos) {
            self.cells[i] = cell;
        }
    }

    /// True when `pos` is in bounds and its terrain permits movement.
    pub fn is_traversable(&self, pos: Position) -> bool {
        self.terrain_at(pos)
            .is_some_and(|cell| !cell.blocks_movement())
    }

    /// Line of sight over static terrain, with every door closed.
    pub fn has_line_of_sight(&self, a: Position, b: Position) -> bool {
        self.line_of_sight_with(a, b, |_| false)
    }

    /// Line of sight between the centres of `a` and `b`.
    ///
    /// Walks a Bresenham ray over the intermediate cells (endpoints excluded).
    /// Walls and closed doors block; windows and trees do not. The ray always
    /// starts at the smaller endpoint so the answer is symmetric.
    pub fn line_of_sight_with<F>(&self, a: Position, b: Position, door_open: F) -> bool
    where
        F: Fn(Position) -> bool,
    {
        if !self.in_bounds(a) || !self.in_bounds(b) {
            return false;
        }
        if a == b {
            return true;
        }

        let (start, end) = if a <= b { (a, b) } else { (b, a) };
        let dx = (end.x - start.x).abs();
        let dy = -(end.y - start.y).abs();
        let sx = if start.x < end.x { 1 } else { -1 };
        let sy = if start.y < end.y { 1 } else { -1 };
        let mut err = dx + dy;
        let (mut x, mut y) = (start.x, start.y);

        loop {
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }

            let current = Position::new(x, y);
            if current == end {
                return true;
            }

            let blocked = match self.terrain_at(current) {
                Some(Cell::Wall) => true,
                Some(Cell::Door) => !door_open(current),
                _ => false,
            };
            if blocked {
                return false;
            }
        }
    }

    /// Breadth-first distance from `from` to the nearest cell matching
    /// `is_goal`, stepping only onto cells accepted by `passable`.
    ///
    /// Goal cells must also be passable to be reached (except `from` itself).
    pub fn path_distance<P, G>(&self, from: Position, passable: P, is_goal: G) -> Option<u32>
    where
        P: Fn(Position) -> bool,
        G: Fn(Position) -> bool,
    {
        let start = self.index(from)?;
        if is_goal(from) {
            return Some(0);
        }

        let mut seen = vec![false; self.cells.len()];
        seen[start] = true;
        let mut queue = VecDeque::from([(from, 0u32)]);

        while let Some((pos, dist)) = queue.pop_front() {
            for dir in Direction::ALL {
                let next = pos.step(dir);
                let Some(idx) = self.index(next) else {
                    continue;
                };
                if seen[idx] || !passable(next) {
                    continue;
                }
                if is_goal(next) {
                    return Some(dist + 1);
                }
                seen[idx] = true;
                queue.push_back((next, dist + 1));
            }
        }

        None
    }

    /// Row-major terrain slice.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Iterate rows from North to South.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.size())
    }

    /// All positions in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.size).flat_map(move |y| (0..self.size).map(move |x| Position::new(x, y)))
    }
}
