use super::LevelData;
use crate::common::{Direction, Position};

/// Cells from which a box can never be pushed onto a goal.
///
/// Two patterns are detected, both only on non-goal floor cells:
/// - corners: a wall on a horizontal side and a wall on a vertical side;
/// - closed wall runs: the cell lies against a wall, and following that wall
///   in both directions hits a wall before reaching a goal or a gap in the
///   wall. A box there can only slide along the run.
pub(super) fn find_deadlocks(level: &LevelData) -> Vec<Position> {
    level
        .cells()
        .filter(|&pos| !level.is_wall(pos) && !level.is_goal(pos))
        .filter(|&pos| is_corner(level, pos) || on_closed_wall_run(level, pos))
        .collect()
}

fn is_corner(level: &LevelData, pos: Position) -> bool {
    let wall = |dir: Direction| level.is_wall(dir.step(pos));
    (wall(Direction::Left) || wall(Direction::Right))
        && (wall(Direction::Up) || wall(Direction::Down))
}

fn on_closed_wall_run(level: &LevelData, pos: Position) -> bool {
    Direction::ALL.into_iter().any(|side| {
        if !level.is_wall(side.step(pos)) {
            return false;
        }
        let (along, back) = match side {
            Direction::Up | Direction::Down => (Direction::Left, Direction::Right),
            Direction::Left | Direction::Right => (Direction::Up, Direction::Down),
        };
        run_is_closed(level, pos, side, along) && run_is_closed(level, pos, side, back)
    })
}

/// Follow the wall on `side` from `pos` towards `dir`.
fn run_is_closed(level: &LevelData, mut pos: Position, side: Direction, dir: Direction) -> bool {
    loop {
        pos = dir.step(pos);
        if level.is_wall(pos) {
            return true;
        }
        if level.is_goal(pos) || !level.is_wall(side.step(pos)) {
            return false;
        }
    }
}
