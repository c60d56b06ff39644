use super::Heuristic;
use crate::common::{Position, State};
use crate::level::{euclidean, LevelData};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Manhattan,
    /// Straight-line distance; the whole estimate is halved.
    Euclidean,
}

/// How the player's distance to the nearest box not on a goal is counted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PlayerTerm {
    #[default]
    Distance,
    /// One step less, since the player only has to stand next to the box.
    /// Keeps single-box estimates admissible.
    Adjacent,
}

impl PlayerTerm {
    pub fn apply(self, distance: f64) -> f64 {
        match self {
            PlayerTerm::Distance => distance,
            PlayerTerm::Adjacent => (distance - 1.0).max(0.0),
        }
    }
}

/// Each box's distance to its nearest goal, plus the player's distance to the
/// nearest box not yet on a goal.
#[derive(Debug, Clone, Copy)]
pub struct DistanceSum {
    metric: Metric,
    player: PlayerTerm,
}

impl DistanceSum {
    pub fn new(metric: Metric) -> Self {
        DistanceSum {
            metric,
            player: PlayerTerm::Distance,
        }
    }

    pub fn adjacent(metric: Metric) -> Self {
        DistanceSum {
            metric,
            player: PlayerTerm::Adjacent,
        }
    }

    fn distance(&self, level: &LevelData, a: Position, b: Position) -> f64 {
        match self.metric {
            Metric::Manhattan => f64::from(level.manhattan(a, b)),
            Metric::Euclidean => euclidean(a, b),
        }
    }

    fn nearest(
        &self,
        level: &LevelData,
        from: Position,
        to: impl Iterator<Item = Position>,
    ) -> Option<f64> {
        to.map(|pos| self.distance(level, from, pos))
            .min_by(f64::total_cmp)
    }
}

impl Heuristic for DistanceSum {
    fn name(&self) -> &'static str {
        match (self.metric, self.player) {
            (Metric::Manhattan, PlayerTerm::Distance) => "manhattan",
            (Metric::Manhattan, PlayerTerm::Adjacent) => "manhattan-adjacent",
            (Metric::Euclidean, PlayerTerm::Distance) => "euclidean",
            (Metric::Euclidean, PlayerTerm::Adjacent) => "euclidean-adjacent",
        }
    }

    fn estimate(&self, state: &State, level: &LevelData) -> f64 {
        if state.boxes().is_empty() {
            return 0.0;
        }

        let mut boxes_total = 0.0;
        for &pos in state.boxes() {
            match self.nearest(level, pos, level.goals().iter().copied()) {
                Some(distance) => boxes_total += distance,
                // No goal at all: the box set can never match the goal set.
                None => return f64::INFINITY,
            }
        }

        let player = self
            .nearest(level, state.player(), state.unplaced_boxes(level))
            .map_or(0.0, |distance| self.player.apply(distance));
        match self.metric {
            Metric::Manhattan => boxes_total + player,
            Metric::Euclidean => (boxes_total + player) / 2.0,
        }
    }
}
