use std::collections::HashSet;
use std::path::Path;

use anyhow::{bail, ensure, Context};
use clap::Parser;
use serde::{Deserialize, Serialize};

use crate::algorithm::Algorithm;
use crate::heuristic::HeuristicKind;
use crate::level::Precompute;

#[derive(Parser, Debug, Default)]
#[command(
    name = "Sokoban search",
    about = "Uninformed and informed state-space search on Sokoban levels.",
    version = "0.1"
)]
pub struct Cli {
    #[arg(long, help = "Path to a YAML or JSON experiment file")]
    pub config: Option<String>,

    #[arg(long, help = "Level files to solve", use_value_delimiter = true)]
    pub levels: Vec<String>,

    #[arg(
        long,
        help = "Algorithms to run",
        value_enum,
        use_value_delimiter = true
    )]
    pub algorithms: Vec<Algorithm>,

    #[arg(
        long,
        help = "One heuristic set for the informed algorithms, summed",
        value_enum,
        use_value_delimiter = true
    )]
    pub heuristics: Vec<HeuristicKind>,

    #[arg(long, help = "Path to the output file")]
    pub output_path: Option<String>,

    #[arg(long, help = "Skip static deadlock detection", default_value_t = false)]
    pub no_deadlocks: bool,

    #[arg(
        long,
        help = "Skip the pairwise distance table",
        default_value_t = false
    )]
    pub no_distance_table: bool,

    #[arg(long, help = "Log the solution of every run", default_value_t = false)]
    pub show_solution: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub levels: Vec<String>,
    pub algorithms: Vec<Algorithm>,
    /// Heuristic sets tried with every informed algorithm.
    pub heuristics: Vec<Vec<HeuristicKind>>,
    pub output_path: String,
    pub precompute_deadlocks: bool,
    pub distance_table: bool,
    pub show_solution: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            levels: vec!["map_file/test/room.txt".to_string()],
            algorithms: Algorithm::ALL.to_vec(),
            heuristics: vec![
                vec![HeuristicKind::Manhattan],
                vec![HeuristicKind::Hungarian, HeuristicKind::Deadlock],
            ],
            output_path: "result/result.csv".to_string(),
            precompute_deadlocks: true,
            distance_table: true,
            show_solution: false,
        }
    }
}

impl Config {
    pub fn from_yaml_str(s: &str) -> anyhow::Result<Self> {
        serde_yaml::from_str(s).context("Failed to parse YAML config")
    }

    pub fn from_json_str(s: &str) -> anyhow::Result<Self> {
        serde_json::from_str(s).context("Failed to parse JSON config")
    }

    /// `.json` files are read as JSON, anything else as YAML.
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {path}"))?;
        let is_json = Path::new(path)
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let config = if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_yaml_str(&content)
        };
        config.with_context(|| format!("error with config file: {path}"))
    }

    pub fn override_from_command_line(mut self, cli: &Cli) -> anyhow::Result<Self> {
        if !cli.levels.is_empty() {
            self.levels = cli.levels.clone();
        }
        if !cli.algorithms.is_empty() {
            self.algorithms = cli.algorithms.clone();
        }
        if !cli.heuristics.is_empty() {
            self.heuristics = vec![cli.heuristics.clone()];
        }
        if let Some(output_path) = &cli.output_path {
            self.output_path = output_path.clone();
        }
        if cli.no_deadlocks {
            self.precompute_deadlocks = false;
        }
        if cli.no_distance_table {
            self.distance_table = false;
        }
        if cli.show_solution {
            self.show_solution = true;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(!self.levels.is_empty(), "No level to solve");
        ensure!(!self.algorithms.is_empty(), "No algorithm to run");

        for set in &self.heuristics {
            let mut seen = HashSet::new();
            for kind in set {
                if !seen.insert(kind) {
                    bail!("Heuristic {kind} appears twice in one set");
                }
            }
        }

        let informed = self.algorithms.iter().any(|a| a.is_informed());
        ensure!(
            !informed || !self.heuristics.is_empty(),
            "Informed algorithms need at least one heuristic set"
        );
        Ok(())
    }

    pub fn precompute(&self) -> Precompute {
        Precompute {
            deadlocks: self.precompute_deadlocks,
            distance_table: self.distance_table,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yaml_config() {
        let config = Config::from_yaml_str(
            "
levels: [map_file/test/push_one.txt, map_file/test/room.txt]
algorithms: [bfs, astar]
heuristics:
  - [manhattan]
  - [assignment, deadlock]
show_solution: true
",
        )
        .unwrap();
        assert_eq!(config.levels.len(), 2);
        assert_eq!(config.algorithms, vec![Algorithm::Bfs, Algorithm::Astar]);
        assert_eq!(
            config.heuristics[1],
            vec![HeuristicKind::Hungarian, HeuristicKind::Deadlock]
        );
        assert!(config.show_solution);
        // Unspecified fields keep their defaults.
        assert_eq!(config.output_path, "result/result.csv");
        assert!(config.precompute_deadlocks);
        config.validate().unwrap();
    }

    #[test]
    fn test_json_config() {
        let config = Config::from_json_str(
            r#"{"algorithms": ["greedy"], "heuristics": [["euclidean"]], "distance_table": false}"#,
        )
        .unwrap();
        assert_eq!(config.algorithms, vec![Algorithm::Greedy]);
        assert!(!config.precompute().distance_table);
        assert!(config.precompute().deadlocks);
    }

    #[test]
    fn test_config_files() {
        let yaml = Config::from_file("configs/experiment.yaml").unwrap();
        assert_eq!(yaml.algorithms, Algorithm::ALL.to_vec());
        assert_eq!(yaml.heuristics.len(), 4);
        yaml.validate().unwrap();

        let json = Config::from_file("configs/experiment.json").unwrap();
        assert_eq!(json.heuristics[1], vec![HeuristicKind::Hungarian]);
        assert_eq!(json.output_path, "result/room.csv");

        assert!(Config::from_file("configs/missing.yaml").is_err());
    }

    #[test]
    fn test_unknown_names_are_rejected() {
        assert!(Config::from_yaml_str("algorithms: [dijkstra]").is_err());
        assert!(Config::from_yaml_str("heuristics: [[chebyshev]]").is_err());
    }

    #[test]
    fn test_validate() {
        let mut config = Config {
            heuristics: vec![vec![HeuristicKind::Manhattan, HeuristicKind::Manhattan]],
            ..Default::default()
        };
        assert!(config.validate().is_err());

        config.heuristics.clear();
        assert!(config.validate().is_err());
        config.algorithms = vec![Algorithm::Bfs, Algorithm::Dfs];
        assert!(config.validate().is_ok());

        config.levels.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_command_line_overrides() {
        let cli = Cli::parse_from([
            "sokoban_search",
            "--levels",
            "a.txt,b.txt",
            "--algorithms",
            "bfs,a*",
            "--heuristics",
            "manhattan,deadlock",
            "--no-deadlocks",
            "--output-path",
            "out/runs.csv",
        ]);
        let config = Config::default().override_from_command_line(&cli).unwrap();
        assert_eq!(config.levels, vec!["a.txt", "b.txt"]);
        assert_eq!(config.algorithms, vec![Algorithm::Bfs, Algorithm::Astar]);
        assert_eq!(
            config.heuristics,
            vec![vec![HeuristicKind::Manhattan, HeuristicKind::Deadlock]]
        );
        assert_eq!(config.output_path, "out/runs.csv");
        assert!(!config.precompute_deadlocks);
        assert!(config.distance_table);

        let untouched = Config::default()
            .override_from_command_line(&Cli::default())
            .unwrap();
        assert_eq!(untouched, Config::default());
    }
}
