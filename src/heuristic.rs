mod assignment;
mod deadlock;
mod distance;

pub use assignment::{min_cost_assignment, Assignment};
pub use deadlock::Deadlock;
pub use distance::{DistanceSum, Metric, PlayerTerm};

use std::fmt;
use std::str::FromStr;

use anyhow::bail;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::common::State;
use crate::level::LevelData;

/// A remaining-cost estimate. Implementations must return a non-negative
/// value or `f64::INFINITY`.
pub trait Heuristic: fmt::Debug + Send + Sync {
    fn name(&self) -> &'static str;
    fn estimate(&self, state: &State, level: &LevelData) -> f64;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum HeuristicKind {
    Manhattan,
    /// Manhattan with the player counted up to a cell next to the box.
    ManhattanAdjacent,
    Euclidean,
    #[serde(alias = "assignment")]
    #[value(alias = "assignment")]
    Hungarian,
    /// Hungarian with the player counted up to a cell next to the box.
    #[serde(alias = "assignment-adjacent")]
    #[value(alias = "assignment-adjacent")]
    HungarianAdjacent,
    Deadlock,
}

impl HeuristicKind {
    pub const ALL: [Self; 6] = [
        Self::Manhattan,
        Self::ManhattanAdjacent,
        Self::Euclidean,
        Self::Hungarian,
        Self::HungarianAdjacent,
        Self::Deadlock,
    ];

    pub fn name(self) -> &'static str {
        match self {
            HeuristicKind::Manhattan => "manhattan",
            HeuristicKind::ManhattanAdjacent => "manhattan-adjacent",
            HeuristicKind::Euclidean => "euclidean",
            HeuristicKind::Hungarian => "hungarian",
            HeuristicKind::HungarianAdjacent => "hungarian-adjacent",
            HeuristicKind::Deadlock => "deadlock",
        }
    }

    /// Whether the estimate never exceeds the true remaining cost, in which
    /// case A* returns shortest solutions.
    pub fn is_admissible(self) -> bool {
        !matches!(self, HeuristicKind::Manhattan | HeuristicKind::Hungarian)
    }

    pub fn build(self) -> Box<dyn Heuristic> {
        match self {
            HeuristicKind::Manhattan => Box::new(DistanceSum::new(Metric::Manhattan)),
            HeuristicKind::ManhattanAdjacent => Box::new(DistanceSum::adjacent(Metric::Manhattan)),
            HeuristicKind::Euclidean => Box::new(DistanceSum::new(Metric::Euclidean)),
            HeuristicKind::Hungarian => Box::new(Assignment::new()),
            HeuristicKind::HungarianAdjacent => Box::new(Assignment::adjacent()),
            HeuristicKind::Deadlock => Box::new(Deadlock),
        }
    }
}

impl fmt::Display for HeuristicKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.name().fmt(f)
    }
}

impl FromStr for HeuristicKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "manhattan" => HeuristicKind::Manhattan,
            "manhattan-adjacent" => HeuristicKind::ManhattanAdjacent,
            "euclidean" => HeuristicKind::Euclidean,
            "hungarian" | "assignment" => HeuristicKind::Hungarian,
            "hungarian-adjacent" | "assignment-adjacent" => HeuristicKind::HungarianAdjacent,
            "deadlock" => HeuristicKind::Deadlock,
            other => bail!("Unknown heuristic: {other:?}"),
        })
    }
}

/// Sum of an ordered list of heuristics, fixed when the search is configured.
#[derive(Debug, Default)]
pub struct Heuristics {
    components: Vec<Box<dyn Heuristic>>,
}

impl Heuristics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_kinds(kinds: &[HeuristicKind]) -> Self {
        Heuristics {
            components: kinds.iter().map(|kind| kind.build()).collect(),
        }
    }

    pub fn with(mut self, heuristic: impl Heuristic + 'static) -> Self {
        self.components.push(Box::new(heuristic));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.components.iter().map(|h| h.name()).collect()
    }

    /// Sum of all component estimates; `0` when there are none.
    pub fn estimate(&self, state: &State, level: &LevelData) -> f64 {
        self.components.iter().fold(0.0, |total, heuristic| {
            let value = heuristic.estimate(state, level);
            debug_assert!(
                value >= 0.0,
                "heuristic {} returned {value}",
                heuristic.name()
            );
            total + value
        })
    }
}

impl fmt::Display for Heuristics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return "none".fmt(f);
        }
        self.names().join("+").fmt(f)
    }
}
