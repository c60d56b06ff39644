use super::{Heuristic, PlayerTerm};
use crate::common::State;
use crate::level::LevelData;

/// Minimum total cost of assigning every row to a distinct column
/// (Kuhn-Munkres with potentials, `O(n^2 m)`). Wider-than-tall and
/// taller-than-wide matrices are both accepted; the smaller side is fully
/// assigned.
pub fn min_cost_assignment(cost: &[Vec<i64>]) -> i64 {
    let rows = cost.len();
    let cols = cost.first().map_or(0, Vec::len);
    if rows == 0 || cols == 0 {
        return 0;
    }
    if rows > cols {
        let transposed = (0..cols)
            .map(|j| (0..rows).map(|i| cost[i][j]).collect())
            .collect::<Vec<Vec<i64>>>();
        return min_cost_assignment(&transposed);
    }

    let inf = i64::MAX / 4;
    // 1-based; row 0 and column 0 are sentinels.
    let mut u = vec![0i64; rows + 1];
    let mut v = vec![0i64; cols + 1];
    let mut owner = vec![0usize; cols + 1];
    let mut way = vec![0usize; cols + 1];

    for row in 1..=rows {
        owner[0] = row;
        let mut j0 = 0;
        let mut min_slack = vec![inf; cols + 1];
        let mut used = vec![false; cols + 1];

        loop {
            used[j0] = true;
            let i0 = owner[j0];
            let mut delta = inf;
            let mut j1 = 0;
            for j in 1..=cols {
                if used[j] {
                    continue;
                }
                let slack = cost[i0 - 1][j - 1] - u[i0] - v[j];
                if slack < min_slack[j] {
                    min_slack[j] = slack;
                    way[j] = j0;
                }
                if min_slack[j] < delta {
                    delta = min_slack[j];
                    j1 = j;
                }
            }
            for j in 0..=cols {
                if used[j] {
                    u[owner[j]] += delta;
                    v[j] -= delta;
                } else {
                    min_slack[j] -= delta;
                }
            }
            j0 = j1;
            if owner[j0] == 0 {
                break;
            }
        }

        // Flip the augmenting path.
        while j0 != 0 {
            let j1 = way[j0];
            owner[j0] = owner[j1];
            j0 = j1;
        }
    }

    (1..=cols)
        .filter(|&j| owner[j] != 0)
        .map(|j| cost[owner[j] - 1][j - 1])
        .sum()
}

/// Optimal one-to-one matching of boxes to goals under grid distance, plus
/// the steps the player needs to reach the nearest box not on a goal.
#[derive(Debug, Clone, Copy, Default)]
pub struct Assignment {
    player: PlayerTerm,
}

impl Assignment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn adjacent() -> Self {
        Assignment {
            player: PlayerTerm::Adjacent,
        }
    }
}

impl Heuristic for Assignment {
    fn name(&self) -> &'static str {
        match self.player {
            PlayerTerm::Distance => "hungarian",
            PlayerTerm::Adjacent => "hungarian-adjacent",
        }
    }

    fn estimate(&self, state: &State, level: &LevelData) -> f64 {
        if state.boxes().is_empty() {
            return 0.0;
        }
        if level.goals().is_empty() {
            return f64::INFINITY;
        }

        let cost = state
            .boxes()
            .iter()
            .map(|&pos| {
                level
                    .goals()
                    .iter()
                    .map(|&goal| i64::from(level.manhattan(pos, goal)))
                    .collect()
            })
            .collect::<Vec<Vec<i64>>>();
        let matching = min_cost_assignment(&cost);

        let player = state
            .unplaced_boxes(level)
            .map(|pos| level.manhattan(state.player(), pos))
            .min()
            .map_or(0.0, |distance| self.player.apply(f64::from(distance)));

        matching as f64 + player
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heuristic::{DistanceSum, Metric};
    use crate::level::Level;

    #[test]
    fn test_square_matrix() {
        let cost = vec![vec![4, 1, 3], vec![2, 0, 5], vec![3, 2, 2]];
        assert_eq!(min_cost_assignment(&cost), 5);
    }

    #[test]
    fn test_rectangular_matrix() {
        let wide = vec![vec![1, 2, 3], vec![2, 4, 6]];
        assert_eq!(min_cost_assignment(&wide), 4);

        let tall = vec![vec![1, 2], vec![2, 4], vec![3, 6]];
        assert_eq!(min_cost_assignment(&tall), 4);

        assert_eq!(min_cost_assignment(&[]), 0);
    }

    #[test]
    fn test_greedy_matching_is_not_optimal() {
        // Taking the cheapest cell first (0) forces the expensive 10.
        let cost = vec![vec![0, 1], vec![1, 10]];
        assert_eq!(min_cost_assignment(&cost), 2);
    }

    #[test]
    fn test_dominates_nearest_goal_sum() {
        // Both boxes are nearest to the right goal; only one can have it.
        let level = "########\n#@  $$.#\n#.     #\n########"
            .parse::<Level>()
            .unwrap();
        let assignment = Assignment::new().estimate(&level.initial, &level.data);
        let manhattan = DistanceSum::new(Metric::Manhattan).estimate(&level.initial, &level.data);
        assert!(assignment >= manhattan);
        // Boxes (4, 1), (5, 1); goals (1, 2), (6, 1): 4 + 1, player 3.
        assert_eq!(assignment, 8.0);
        assert_eq!(manhattan, 6.0);

        let adjacent = Assignment::adjacent().estimate(&level.initial, &level.data);
        assert_eq!(adjacent, 7.0);
    }

    #[test]
    fn test_two_move_scenario() {
        let level = Level::from_file("map_file/test/push_one.txt", Default::default()).unwrap();
        // Matching 1, player 2 from the box.
        assert_eq!(Assignment::new().estimate(&level.initial, &level.data), 3.0);
        assert_eq!(
            Assignment::adjacent().estimate(&level.initial, &level.data),
            2.0
        );
    }
}
