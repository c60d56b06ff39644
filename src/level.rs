mod deadlock;
mod loader;

pub use loader::Level;

use crate::common::{Position, State};

/// Grids with more cells than this skip the pairwise distance table.
pub const DISTANCE_TABLE_MAX_CELLS: usize = 1024;

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Tile {
    wall: bool,
    goal: bool,
    deadlock: bool,
}

/// Which derived tables `LevelData` builds up front.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Precompute {
    pub deadlocks: bool,
    pub distance_table: bool,
}

impl Default for Precompute {
    fn default() -> Self {
        Precompute {
            deadlocks: true,
            distance_table: true,
        }
    }
}

/// Static geometry of one puzzle instance. Built once, then only read.
#[derive(Debug, Clone)]
pub struct LevelData {
    pub width: usize,
    pub height: usize,
    pub(crate) grid: Vec<Vec<Tile>>,
    goals: Box<[Position]>,
    has_deadlocks: bool,
    distances: Option<Vec<u16>>,
}

impl LevelData {
    pub fn new(
        walls: impl IntoIterator<Item = Position>,
        goals: impl IntoIterator<Item = Position>,
    ) -> Self {
        Self::with_options(walls, goals, Precompute::default())
    }

    pub fn with_options(
        walls: impl IntoIterator<Item = Position>,
        goals: impl IntoIterator<Item = Position>,
        precompute: Precompute,
    ) -> Self {
        let walls = walls.into_iter().collect::<Vec<_>>();
        let mut goals = goals.into_iter().collect::<Vec<_>>();
        goals.sort_unstable();
        goals.dedup();

        let extent = |coord: fn(&Position) -> i32| {
            walls
                .iter()
                .chain(&goals)
                .map(coord)
                .max()
                .map_or(0, |max| (max + 1).max(0) as usize)
        };
        let width = extent(|pos| pos.0);
        let height = extent(|pos| pos.1);

        let mut level = LevelData {
            width,
            height,
            grid: vec![vec![Tile::default(); width]; height],
            goals: goals.into(),
            has_deadlocks: false,
            distances: None,
        };
        for &pos in &walls {
            if let Some(tile) = level.tile_mut(pos) {
                tile.wall = true;
            }
        }
        for i in 0..level.goals.len() {
            let pos = level.goals[i];
            if let Some(tile) = level.tile_mut(pos) {
                tile.goal = true;
            }
        }

        if precompute.deadlocks {
            for (x, y) in deadlock::find_deadlocks(&level) {
                level.grid[y as usize][x as usize].deadlock = true;
            }
            level.has_deadlocks = true;
        }
        if precompute.distance_table {
            level.distances = level.build_distance_table();
        }

        level
    }

    fn cell_index(&self, (x, y): Position) -> Option<usize> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(y as usize * self.width + x as usize)
    }

    fn tile(&self, (x, y): Position) -> Option<&Tile> {
        self.cell_index((x, y))?;
        Some(&self.grid[y as usize][x as usize])
    }

    fn tile_mut(&mut self, (x, y): Position) -> Option<&mut Tile> {
        self.cell_index((x, y))?;
        Some(&mut self.grid[y as usize][x as usize])
    }

    /// Cells outside the grid count as walls.
    pub fn is_wall(&self, pos: Position) -> bool {
        self.tile(pos).is_none_or(|tile| tile.wall)
    }

    pub fn is_goal(&self, pos: Position) -> bool {
        self.tile(pos).is_some_and(|tile| tile.goal)
    }

    /// Whether a box on `pos` can never reach any goal. Always `false` when
    /// deadlocks were not precomputed.
    pub fn is_deadlock(&self, pos: Position) -> bool {
        self.tile(pos).is_some_and(|tile| tile.deadlock)
    }

    pub fn has_deadlocks(&self) -> bool {
        self.has_deadlocks
    }

    pub fn has_distance_table(&self) -> bool {
        self.distances.is_some()
    }

    /// Sorted goal positions.
    pub fn goals(&self) -> &[Position] {
        &self.goals
    }

    pub fn cells(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.height as i32).flat_map(move |y| (0..self.width as i32).map(move |x| (x, y)))
    }

    pub fn walls(&self) -> impl Iterator<Item = Position> + '_ {
        self.cells().filter(|&pos| self.is_wall(pos))
    }

    pub fn deadlocks(&self) -> impl Iterator<Item = Position> + '_ {
        self.cells().filter(|&pos| self.is_deadlock(pos))
    }

    fn build_distance_table(&self) -> Option<Vec<u16>> {
        let cells = self.width * self.height;
        if cells == 0 || cells > DISTANCE_TABLE_MAX_CELLS {
            return None;
        }
        let positions = self.cells().collect::<Vec<_>>();
        let mut table = Vec::with_capacity(cells * cells);
        for &a in &positions {
            for &b in &positions {
                table.push(manhattan(a, b) as u16);
            }
        }
        Some(table)
    }

    /// Grid distance between two cells, served from the precomputed table
    /// when both cells are inside the grid.
    pub fn manhattan(&self, a: Position, b: Position) -> u32 {
        if let Some(table) = &self.distances {
            if let (Some(i), Some(j)) = (self.cell_index(a), self.cell_index(b)) {
                return u32::from(table[i * self.width * self.height + j]);
            }
        }
        manhattan(a, b)
    }

    /// Draw `state` in the level text format.
    pub fn render(&self, state: &State) -> String {
        let mut lines = Vec::with_capacity(self.height);
        for y in 0..self.height as i32 {
            let line = (0..self.width as i32)
                .map(|x| {
                    let pos = (x, y);
                    let goal = self.is_goal(pos);
                    if self.is_wall(pos) {
                        '#'
                    } else if state.player() == pos {
                        if goal {
                            '+'
                        } else {
                            '@'
                        }
                    } else if state.has_box(pos) {
                        if goal {
                            '*'
                        } else {
                            '$'
                        }
                    } else if goal {
                        '.'
                    } else {
                        ' '
                    }
                })
                .collect::<String>();
            lines.push(line);
        }
        lines.join("\n")
    }
}

pub fn manhattan(a: Position, b: Position) -> u32 {
    a.0.abs_diff(b.0) + a.1.abs_diff(b.1)
}

pub fn euclidean(a: Position, b: Position) -> f64 {
    f64::from(a.0 - b.0).hypot(f64::from(a.1 - b.1))
}
