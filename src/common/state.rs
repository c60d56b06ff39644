use std::fmt;

use anyhow::bail;

use crate::level::LevelData;

/// Grid coordinate `(x, y)`: `x` is the column, `y` the row, origin at the top-left.
pub type Position = (i32, i32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Successor enumeration order. DFS and unbroken priority ties depend on it.
    pub const ALL: [Self; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn step(self, (x, y): Position) -> Position {
        let (dx, dy) = self.delta();
        (x + dx, y + dy)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => "U".fmt(f),
            Direction::Down => "D".fmt(f),
            Direction::Left => "L".fmt(f),
            Direction::Right => "R".fmt(f),
        }
    }
}

impl TryFrom<char> for Direction {
    type Error = anyhow::Error;

    fn try_from(ch: char) -> Result<Self, Self::Error> {
        Ok(match ch.to_ascii_uppercase() {
            'U' => Direction::Up,
            'D' => Direction::Down,
            'L' => Direction::Left,
            'R' => Direction::Right,
            _ => bail!("Invalid action: {ch:?}"),
        })
    }
}

/// A puzzle configuration: where the player stands and where the boxes are.
///
/// Boxes are kept sorted and deduplicated, so the derived `Eq`/`Hash` are
/// structural over the box *set*. A state is never mutated; every move
/// builds a new one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct State {
    player: Position,
    boxes: Box<[Position]>,
}

impl State {
    pub fn new(player: Position, boxes: impl IntoIterator<Item = Position>) -> Self {
        let mut boxes = boxes.into_iter().collect::<Vec<_>>();
        boxes.sort_unstable();
        boxes.dedup();
        Self {
            player,
            boxes: boxes.into(),
        }
    }

    pub fn player(&self) -> Position {
        self.player
    }

    pub fn boxes(&self) -> &[Position] {
        &self.boxes
    }

    pub fn has_box(&self, pos: Position) -> bool {
        self.boxes.binary_search(&pos).is_ok()
    }

    /// Boxes that are not resting on a goal.
    pub fn unplaced_boxes<'a>(
        &'a self,
        level: &'a LevelData,
    ) -> impl Iterator<Item = Position> + 'a {
        self.boxes
            .iter()
            .copied()
            .filter(|&pos| !level.is_goal(pos))
    }

    /// Exact cover: the box set equals the goal set.
    pub fn is_goal(&self, level: &LevelData) -> bool {
        *self.boxes == *level.goals()
    }

    /// Apply a move, or `None` when the move is illegal (walks into a wall,
    /// or pushes a box into a wall or another box).
    pub fn try_move(&self, dir: Direction, level: &LevelData) -> Option<State> {
        let next = dir.step(self.player);
        if level.is_wall(next) {
            return None;
        }

        let Ok(idx) = self.boxes.binary_search(&next) else {
            return Some(State {
                player: next,
                boxes: self.boxes.clone(),
            });
        };

        // Push.
        let beyond = dir.step(next);
        if level.is_wall(beyond) || self.has_box(beyond) {
            return None;
        }
        let mut boxes = self.boxes.to_vec();
        boxes[idx] = beyond;
        boxes.sort_unstable();
        Some(State {
            player: next,
            boxes: boxes.into(),
        })
    }

    /// Apply a move. Illegal moves leave the state unchanged.
    pub fn transition(&self, dir: Direction, level: &LevelData) -> State {
        self.try_move(dir, level).unwrap_or_else(|| self.clone())
    }

    /// Whether `dir` from this state moves a box.
    pub fn is_push(&self, dir: Direction, level: &LevelData) -> bool {
        self.has_box(dir.step(self.player)) && self.try_move(dir, level).is_some()
    }

    /// Legal moves in `Direction::ALL` order.
    pub fn successors(&self, level: &LevelData) -> Vec<(Direction, State)> {
        Direction::ALL
            .into_iter()
            .filter_map(|dir| Some((dir, self.try_move(dir, level)?)))
            .collect()
    }

    /// Apply `actions` in order through `transition`.
    pub fn replay(&self, actions: &[Direction], level: &LevelData) -> State {
        actions
            .iter()
            .fold(self.clone(), |state, &dir| state.transition(dir, level))
    }

    /// Whether `actions` lead from this state to a goal state.
    pub fn is_solved_by(&self, actions: &[Direction], level: &LevelData) -> bool {
        self.replay(actions, level).is_goal(level)
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Player: {:?}, Boxes: {:?}", self.player, self.boxes)
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;
    use crate::level::Level;

    fn parse_level(map: &str) -> Level {
        map.parse::<Level>().unwrap()
    }

    #[test]
    fn test_state_identity_ignores_box_order() {
        let a = State::new((1, 1), [(3, 2), (2, 2), (2, 2)]);
        let b = State::new((1, 1), [(2, 2), (3, 2)]);
        assert_eq!(a, b);
        assert_eq!(a.boxes(), &[(2, 2), (3, 2)]);
    }

    #[test]
    fn test_walk_and_wall_no_op() {
        let level = parse_level("#####\n#@  #\n#####");
        let state = &level.initial;

        let right = state.transition(Direction::Right, &level.data);
        assert_eq!(right.player(), (2, 1));

        // Walking into a wall returns the same state.
        let up = state.transition(Direction::Up, &level.data);
        assert_eq!(&up, state);
        assert!(state.try_move(Direction::Left, &level.data).is_none());
    }

    #[test]
    fn test_push_moves_box() {
        let level = parse_level("######\n#@$ .#\n######");
        let pushed = level.initial.transition(Direction::Right, &level.data);
        assert_eq!(pushed.player(), (2, 1));
        assert_eq!(pushed.boxes(), &[(3, 1)]);
        assert!(level.initial.is_push(Direction::Right, &level.data));
    }

    #[test]
    fn test_push_blocked_by_wall_or_box() {
        let against_wall = parse_level("#####\n#@$.#\n#   #\n#####");
        let blocked = against_wall
            .initial
            .transition(Direction::Right, &against_wall.data)
            .transition(Direction::Right, &against_wall.data);
        // The first push lands on the goal, the second one hits the wall.
        assert_eq!(blocked.boxes(), &[(3, 1)]);
        assert_eq!(blocked.player(), (2, 1));

        let two_boxes = parse_level("######\n#@$$.#\n#   .#\n######");
        let state = &two_boxes.initial;
        assert!(state.try_move(Direction::Right, &two_boxes.data).is_none());
        assert_eq!(&state.transition(Direction::Right, &two_boxes.data), state);
    }

    #[test]
    fn test_successors_order_and_legality() {
        let level = parse_level("#####\n#   #\n# @ #\n#   #\n#####");
        let dirs = level
            .initial
            .successors(&level.data)
            .into_iter()
            .map(|(dir, _)| dir)
            .collect::<Vec<_>>();
        assert_eq!(dirs, Direction::ALL);

        let cornered = parse_level("####\n#@ #\n#  #\n####");
        let dirs = cornered
            .initial
            .successors(&cornered.data)
            .into_iter()
            .map(|(dir, _)| dir)
            .collect::<Vec<_>>();
        assert_eq!(dirs, [Direction::Down, Direction::Right]);
    }

    #[test]
    fn test_goal_is_exact_cover() {
        let level = parse_level("#####\n#@*.#\n# $ #\n#####");
        // One of two goals covered.
        assert!(!level.initial.is_goal(&level.data));

        let covered = State::new((1, 1), [(2, 1), (3, 1)]);
        assert!(covered.is_goal(&level.data));

        // More boxes than goals never counts as solved.
        let extra = State::new((1, 1), [(2, 1), (3, 1), (1, 1)]);
        assert!(!extra.is_goal(&level.data));
    }

    #[test]
    fn test_replay() {
        let level = parse_level("#####\n#   #\n# $.#\n#@  #\n#####");
        let actions = [Direction::Up, Direction::Right];
        assert!(level.initial.is_solved_by(&actions, &level.data));
        assert!(!level.initial.is_solved_by(&actions[..1], &level.data));
    }

    #[test]
    fn test_random_walk_keeps_invariants() {
        let level = parse_level(
            "########\n\
             #      #\n\
             # $  $ #\n\
             #  @   #\n\
             # .  . #\n\
             ########",
        );
        let mut rng = StdRng::seed_from_u64(7);
        let mut state = level.initial.clone();
        for _ in 0..500 {
            let dir = Direction::ALL[rng.gen_range(0..4)];
            let next = state.transition(dir, &level.data);

            assert_eq!(next.boxes().len(), state.boxes().len());
            assert!(!level.data.is_wall(next.player()));
            assert!(!next.has_box(next.player()));
            assert!(next.boxes().iter().all(|&b| !level.data.is_wall(b)));

            // `successors` lists exactly the moves that change the state.
            let listed = state
                .successors(&level.data)
                .into_iter()
                .any(|(d, s)| d == dir && s == next);
            assert_eq!(listed, next != state);

            state = next;
        }
    }
}
