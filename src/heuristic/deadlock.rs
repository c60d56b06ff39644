use super::Heuristic;
use crate::common::State;
use crate::level::LevelData;

/// Infinite when a box off the goals rests on a precomputed deadlock cell,
/// zero otherwise. Contributes nothing when the level was built without
/// deadlock detection.
#[derive(Debug, Clone, Copy, Default)]
pub struct Deadlock;

impl Heuristic for Deadlock {
    fn name(&self) -> &'static str {
        "deadlock"
    }

    fn estimate(&self, state: &State, level: &LevelData) -> f64 {
        if state
            .unplaced_boxes(level)
            .any(|pos| level.is_deadlock(pos))
        {
            f64::INFINITY
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::{Level, Precompute};

    #[test]
    fn test_box_in_corner() {
        let level = Level::from_file("map_file/test/corner.txt", Precompute::default()).unwrap();
        assert_eq!(
            Deadlock.estimate(&level.initial, &level.data),
            f64::INFINITY
        );
    }

    #[test]
    fn test_free_box() {
        let level = Level::from_file("map_file/test/room.txt", Precompute::default()).unwrap();
        assert_eq!(Deadlock.estimate(&level.initial, &level.data), 0.0);

        // Same level, box pushed against the top wall.
        let stuck = State::new(level.initial.player(), [(2, 1)]);
        assert_eq!(Deadlock.estimate(&stuck, &level.data), f64::INFINITY);
    }

    #[test]
    fn test_without_precomputation() {
        let level = Level::from_file(
            "map_file/test/corner.txt",
            Precompute {
                deadlocks: false,
                distance_table: true,
            },
        )
        .unwrap();
        assert_eq!(Deadlock.estimate(&level.initial, &level.data), 0.0);
    }
}
