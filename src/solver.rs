use std::time::Instant;

use tracing::{debug, instrument, trace};

use crate::algorithm::Algorithm;
use crate::common::{Direction, Node, NodeArena, NodeId, State};
use crate::frontier::{Frontier, Visited};
use crate::heuristic::Heuristics;
use crate::level::{Level, LevelData};
use crate::stat::Stats;

/// What the driver needs from a puzzle: a start, a goal test and a
/// successor function. Defaults follow the box-pushing rules of
/// [`State`].
pub trait SearchProblem {
    fn initial_state(&self) -> State;
    fn level(&self) -> &LevelData;

    fn is_goal(&self, state: &State) -> bool {
        state.is_goal(self.level())
    }

    fn successors(&self, state: &State) -> Vec<(Direction, State)> {
        state.successors(self.level())
    }
}

/// A level paired with the configuration to solve it from.
#[derive(Debug, Clone)]
pub struct Sokoban<'a> {
    level: &'a LevelData,
    initial: State,
}

impl<'a> Sokoban<'a> {
    pub fn new(level: &'a LevelData, initial: State) -> Self {
        Sokoban { level, initial }
    }

    pub fn from_level(level: &'a Level) -> Self {
        Self::new(&level.data, level.initial.clone())
    }
}

impl SearchProblem for Sokoban<'_> {
    fn initial_state(&self) -> State {
        self.initial.clone()
    }

    fn level(&self) -> &LevelData {
        self.level
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStatus {
    Initialized,
    Running,
    Succeeded,
    Exhausted,
}

/// Result of one search: the action sequence (`None` when the frontier ran
/// out) and the effort spent.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    pub solution: Option<Vec<Direction>>,
    pub stats: Stats,
}

impl SearchOutcome {
    pub fn expanded_nodes(&self) -> usize {
        self.stats.expanded_nodes
    }

    pub fn peak_frontier(&self) -> usize {
        self.stats.peak_frontier
    }

    /// `(solution, expanded nodes, peak frontier size)`.
    pub fn into_parts(self) -> (Option<Vec<Direction>>, usize, usize) {
        (
            self.solution,
            self.stats.expanded_nodes,
            self.stats.peak_frontier,
        )
    }
}

/// The expansion loop shared by every [`Algorithm`]. All search structures
/// belong to the solver and are rebuilt on every [`Solver::solve`] call.
pub struct Solver<'a, P: SearchProblem> {
    problem: &'a P,
    algorithm: Algorithm,
    heuristics: &'a Heuristics,
    arena: NodeArena,
    frontier: Frontier,
    visited: Visited,
    status: SearchStatus,
    stats: Stats,
}

impl<'a, P: SearchProblem> Solver<'a, P> {
    pub fn new(problem: &'a P, algorithm: Algorithm, heuristics: &'a Heuristics) -> Self {
        Solver {
            problem,
            algorithm,
            heuristics,
            arena: NodeArena::new(),
            frontier: Frontier::new(algorithm.discipline()),
            visited: Visited::new(algorithm.visit_policy()),
            status: SearchStatus::Initialized,
            stats: Stats::default(),
        }
    }

    pub fn status(&self) -> SearchStatus {
        self.status
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    fn reset(&mut self) {
        self.arena = NodeArena::new();
        self.frontier = Frontier::new(self.algorithm.discipline());
        self.visited = Visited::new(self.algorithm.visit_policy());
        self.status = SearchStatus::Initialized;
        self.stats = Stats::default();
    }

    #[instrument(skip_all, name = "search", fields(algorithm = %self.algorithm, heuristics = %self.heuristics), level = "debug")]
    pub fn solve(&mut self) -> Option<Vec<Direction>> {
        if self.status != SearchStatus::Initialized {
            self.reset();
        }

        let start = Instant::now();
        let solution = self.run();
        self.stats.time_us = start.elapsed().as_micros() as u64;
        self.stats.solution_length = solution.as_ref().map(Vec::len);
        solution
    }

    fn estimate(&self, node: &mut Node) {
        // Uninformed variants never consult the heuristics.
        if self.algorithm.is_informed() {
            node.h_cost = Some(self.heuristics.estimate(&node.state, self.problem.level()));
        }
    }

    fn run(&mut self) -> Option<Vec<Direction>> {
        let mut root = Node::root(self.problem.initial_state());
        self.estimate(&mut root);
        debug!("root: {} h {:?}", root.state, root.h_cost);

        if self.problem.is_goal(&root.state) {
            debug!("initial state is a goal");
            self.status = SearchStatus::Succeeded;
            return Some(Vec::new());
        }

        self.visited.admit(&root.state, root.g_cost);
        let priority = self.algorithm.priority(&root);
        let root_id = self.arena.push(root);
        self.frontier.push(root_id, priority);
        self.stats.peak_frontier = self.frontier.high_water();
        self.status = SearchStatus::Running;

        while let Some(current) = self.pop_live() {
            self.stats.expanded_nodes += 1;
            if self.visited.mark_expanded(&self.arena[current].state) {
                self.stats.reexpanded_nodes += 1;
            }
            trace!("expand node: {:?}", self.arena[current]);

            if self.problem.is_goal(&self.arena[current].state) {
                self.status = SearchStatus::Succeeded;
                let path = self.arena.construct_path(current);
                debug!(
                    "found solution of length {} with {} nodes created",
                    path.len(),
                    self.arena.len()
                );
                return Some(path);
            }

            let mut successors = self.problem.successors(&self.arena[current].state);
            if self.algorithm == Algorithm::Dfs {
                // The first enumerated direction ends up on top of the stack.
                successors.reverse();
            }

            for (action, state) in successors {
                let mut child = self.arena.child(current, action, state);
                if !self.visited.admit(&child.state, child.g_cost) {
                    continue;
                }
                self.estimate(&mut child);
                let priority = self.algorithm.priority(&child);
                let child_id = self.arena.push(child);
                self.frontier.push(child_id, priority);
                self.stats.generated_nodes += 1;
            }
            self.stats.peak_frontier = self.frontier.high_water();
            trace!("frontier size {}", self.frontier.len());
        }

        debug!("cannot find solution, {} nodes created", self.arena.len());
        self.status = SearchStatus::Exhausted;
        None
    }

    /// Pop the next entry that still carries its state's best known cost.
    fn pop_live(&mut self) -> Option<NodeId> {
        while let Some(id) = self.frontier.pop() {
            let node = &self.arena[id];
            if self.visited.is_stale(&node.state, node.g_cost) {
                trace!("skip stale entry: {node:?}");
                self.stats.stale_entries += 1;
                continue;
            }
            return Some(id);
        }
        None
    }

    pub fn into_outcome(self, solution: Option<Vec<Direction>>) -> SearchOutcome {
        SearchOutcome {
            solution,
            stats: self.stats,
        }
    }
}

/// Run `algorithm` on `problem` with a fresh frontier and visited registry.
pub fn search<P: SearchProblem>(
    problem: &P,
    algorithm: Algorithm,
    heuristics: &Heuristics,
) -> SearchOutcome {
    let mut solver = Solver::new(problem, algorithm, heuristics);
    let solution = solver.solve();
    solver.into_outcome(solution)
}

pub fn bfs_search<P: SearchProblem>(problem: &P) -> SearchOutcome {
    search(problem, Algorithm::Bfs, &Heuristics::new())
}

pub fn dfs_search<P: SearchProblem>(problem: &P) -> SearchOutcome {
    search(problem, Algorithm::Dfs, &Heuristics::new())
}

pub fn greedy_search<P: SearchProblem>(problem: &P, heuristics: &Heuristics) -> SearchOutcome {
    search(problem, Algorithm::Greedy, heuristics)
}

pub fn a_star_search<P: SearchProblem>(problem: &P, heuristics: &Heuristics) -> SearchOutcome {
    search(problem, Algorithm::Astar, heuristics)
}
