use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use anyhow::{ensure, Context, Result};
use tracing::{info, warn};

use crate::algorithm::Algorithm;
use crate::common::format_actions;
use crate::config::Config;
use crate::heuristic::{HeuristicKind, Heuristics};
use crate::level::{Level, Precompute};
use crate::solver::{search, Sokoban};

/// One search to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    pub level: String,
    pub algorithm: Algorithm,
    pub heuristics: Vec<HeuristicKind>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunRecord {
    pub level: String,
    pub algorithm: Algorithm,
    pub heuristics: String,
    pub solution_length: Option<usize>,
    pub expanded_nodes: usize,
    pub peak_frontier: usize,
    pub time_us: u64,
    /// Solution as a `UDLR` string; empty when unsolved.
    pub actions: String,
}

/// A batch of searches: every level with every algorithm and, for the
/// informed ones, every heuristic set.
#[derive(Debug, Clone)]
pub struct Experiment {
    runs: Vec<Run>,
    precompute: Precompute,
    show_solution: bool,
}

impl Experiment {
    pub fn from_config(config: &Config) -> Self {
        let mut runs = Vec::new();
        for level in &config.levels {
            for &algorithm in &config.algorithms {
                if !algorithm.is_informed() {
                    runs.push(Run {
                        level: level.clone(),
                        algorithm,
                        heuristics: Vec::new(),
                    });
                    continue;
                }
                for set in &config.heuristics {
                    runs.push(Run {
                        level: level.clone(),
                        algorithm,
                        heuristics: set.clone(),
                    });
                }
            }
        }

        Experiment {
            runs,
            precompute: config.precompute(),
            show_solution: config.show_solution,
        }
    }

    pub fn runs(&self) -> &[Run] {
        &self.runs
    }

    pub fn run(&self) -> Result<Vec<RunRecord>> {
        let mut records = Vec::with_capacity(self.runs.len());
        let mut loaded: Option<(&str, Level)> = None;

        for run in &self.runs {
            // Runs are grouped by level, so each level is parsed once.
            if loaded.as_ref().is_none_or(|(path, _)| *path != run.level) {
                loaded = Some((&run.level, Level::from_file(&run.level, self.precompute)?));
            }
            if let Some((_, level)) = &loaded {
                records.push(self.run_one(run, level)?);
            }
        }

        Ok(records)
    }

    fn run_one(&self, run: &Run, level: &Level) -> Result<RunRecord> {
        let heuristics = Heuristics::from_kinds(&run.heuristics);
        let admissible = run.heuristics.iter().all(|kind| kind.is_admissible());
        if run.algorithm == Algorithm::Astar && !admissible {
            warn!("{heuristics} can overestimate, A* may miss shorter paths");
        }
        let problem = Sokoban::from_level(level);
        let outcome = search(&problem, run.algorithm, &heuristics);

        info!(
            "Level {} Algorithm {} Heuristics {}",
            run.level, run.algorithm, heuristics
        );
        outcome.stats.print();

        let actions = match &outcome.solution {
            Some(actions) => {
                ensure!(
                    level.initial.is_solved_by(actions, &level.data),
                    "{} returned an invalid solution for {}",
                    run.algorithm,
                    run.level
                );
                let moves = format_actions(actions);
                if self.show_solution {
                    let solved = level.initial.replay(actions, &level.data);
                    info!("Solution: {moves}");
                    info!("Final state:\n{}", level.data.render(&solved));
                }
                moves
            }
            None => {
                info!("No solution for {}", run.level);
                String::new()
            }
        };

        Ok(RunRecord {
            level: run.level.clone(),
            algorithm: run.algorithm,
            heuristics: heuristics.to_string(),
            solution_length: outcome.stats.solution_length,
            expanded_nodes: outcome.stats.expanded_nodes,
            peak_frontier: outcome.stats.peak_frontier,
            time_us: outcome.stats.time_us,
            actions,
        })
    }
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Write `records` with a header row, creating parent directories.
pub fn write_csv(path: &str, records: &[RunRecord]) -> Result<()> {
    let mut out = String::from(
        "level,algorithm,heuristics,solution_length,expanded_nodes,peak_frontier,time_us,actions\n",
    );
    for record in records {
        let solution_length = record
            .solution_length
            .map(|len| len.to_string())
            .unwrap_or_default();
        writeln!(
            out,
            "{},{},{},{},{},{},{},{}",
            csv_field(&record.level),
            record.algorithm,
            csv_field(&record.heuristics),
            solution_length,
            record.expanded_nodes,
            record.peak_frontier,
            record.time_us,
            record.actions
        )?;
    }

    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }
    fs::write(path, out).with_context(|| format!("Failed to write {path}"))
}
