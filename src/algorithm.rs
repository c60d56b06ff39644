use std::fmt;
use std::str::FromStr;

use anyhow::bail;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::common::Node;
use crate::frontier::{Discipline, VisitPolicy};

/// A search variant. Each one fixes the frontier discipline, the visited
/// policy and the priority key the driver uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    Bfs,
    Dfs,
    Greedy,
    #[serde(alias = "a*", alias = "a_star")]
    #[value(alias = "a*")]
    Astar,
}

impl Algorithm {
    pub const ALL: [Self; 4] = [Self::Bfs, Self::Dfs, Self::Greedy, Self::Astar];

    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Bfs => "bfs",
            Algorithm::Dfs => "dfs",
            Algorithm::Greedy => "greedy",
            Algorithm::Astar => "astar",
        }
    }

    pub fn discipline(self) -> Discipline {
        match self {
            Algorithm::Bfs => Discipline::Fifo,
            Algorithm::Dfs => Discipline::Lifo,
            Algorithm::Greedy | Algorithm::Astar => Discipline::Priority,
        }
    }

    pub fn visit_policy(self) -> VisitPolicy {
        match self {
            Algorithm::Astar => VisitPolicy::BestCost,
            _ => VisitPolicy::FirstDiscovery,
        }
    }

    /// Whether the variant reads heuristic values at all.
    pub fn is_informed(self) -> bool {
        matches!(self, Algorithm::Greedy | Algorithm::Astar)
    }

    /// Frontier key of `node`; lower is expanded first. Nodes without a
    /// computed heuristic count as `h = 0`.
    pub fn priority(self, node: &Node) -> f64 {
        match self {
            Algorithm::Bfs | Algorithm::Dfs => 0.0,
            Algorithm::Greedy => node.h_cost.unwrap_or(0.0),
            Algorithm::Astar => node.f_cost().unwrap_or(node.g_cost as f64),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.name().fmt(f)
    }
}

impl FromStr for Algorithm {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "bfs" => Algorithm::Bfs,
            "dfs" => Algorithm::Dfs,
            "greedy" => Algorithm::Greedy,
            "astar" | "a*" | "a_star" => Algorithm::Astar,
            other => bail!("Unknown algorithm: {other:?}"),
        })
    }
}
