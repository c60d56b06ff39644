use tracing::info;

/// Effort counters of one search run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stats {
    /// Loop iterations that expanded a node; stale entries are not counted.
    pub expanded_nodes: usize,
    pub peak_frontier: usize,
    /// Child nodes created and pushed.
    pub generated_nodes: usize,
    /// Expansions of a state that had been expanded before (A* only).
    pub reexpanded_nodes: usize,
    /// Superseded A* entries discarded on pop.
    pub stale_entries: usize,
    pub solution_length: Option<usize>,
    pub time_us: u64,
}

impl Stats {
    pub fn print(&self) {
        info!(
            "Solution length {:?} Time(microseconds) {:?} Expanded nodes: {:?} Peak frontier: {:?} Generated nodes: {:?} Re-expanded nodes: {:?} Stale entries: {:?}",
            self.solution_length,
            self.time_us,
            self.expanded_nodes,
            self.peak_frontier,
            self.generated_nodes,
            self.reexpanded_nodes,
            self.stale_entries
        );
    }
}
