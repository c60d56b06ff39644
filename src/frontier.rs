use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

use crate::common::{NodeId, State};

/// Removal order of a [`Frontier`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Discipline {
    Fifo,
    Lifo,
    /// Lowest priority first; equal priorities leave in insertion order.
    Priority,
}

#[derive(Debug)]
struct OpenEntry {
    priority: f64,
    order: u64,
    id: NodeId,
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenEntry {}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority
            .total_cmp(&other.priority)
            // Earlier insertion wins ties; the counter is unique, so no two
            // entries ever compare equal.
            .then_with(|| self.order.cmp(&other.order))
    }
}

#[derive(Debug)]
enum Container {
    Fifo(VecDeque<NodeId>),
    Lifo(Vec<NodeId>),
    Priority(BTreeSet<OpenEntry>),
}

/// Nodes discovered but not yet expanded.
#[derive(Debug)]
pub struct Frontier {
    container: Container,
    inserted: u64,
    high_water: usize,
}

impl Frontier {
    pub fn new(discipline: Discipline) -> Self {
        let container = match discipline {
            Discipline::Fifo => Container::Fifo(VecDeque::new()),
            Discipline::Lifo => Container::Lifo(Vec::new()),
            Discipline::Priority => Container::Priority(BTreeSet::new()),
        };
        Frontier {
            container,
            inserted: 0,
            high_water: 0,
        }
    }

    pub fn discipline(&self) -> Discipline {
        match self.container {
            Container::Fifo(_) => Discipline::Fifo,
            Container::Lifo(_) => Discipline::Lifo,
            Container::Priority(_) => Discipline::Priority,
        }
    }

    /// Insert a node. `priority` is only read by the priority discipline.
    pub fn push(&mut self, id: NodeId, priority: f64) {
        match &mut self.container {
            Container::Fifo(queue) => queue.push_back(id),
            Container::Lifo(stack) => stack.push(id),
            Container::Priority(open) => {
                open.insert(OpenEntry {
                    priority,
                    order: self.inserted,
                    id,
                });
            }
        }
        self.inserted += 1;
        self.high_water = self.high_water.max(self.len());
    }

    pub fn pop(&mut self) -> Option<NodeId> {
        match &mut self.container {
            Container::Fifo(queue) => queue.pop_front(),
            Container::Lifo(stack) => stack.pop(),
            Container::Priority(open) => open.pop_first().map(|entry| entry.id),
        }
    }

    pub fn len(&self) -> usize {
        match &self.container {
            Container::Fifo(queue) => queue.len(),
            Container::Lifo(stack) => stack.len(),
            Container::Priority(open) => open.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Largest size the frontier has reached.
    pub fn high_water(&self) -> usize {
        self.high_water
    }

    /// Total number of insertions so far.
    pub fn inserted(&self) -> u64 {
        self.inserted
    }
}

/// How a [`Visited`] registry decides whether a reached state gets a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitPolicy {
    /// Admit a state only the first time it is reached.
    FirstDiscovery,
    /// Admit a state again whenever it is reached by a strictly cheaper path.
    BestCost,
}

#[derive(Debug, Clone, Copy)]
struct CostEntry {
    best_g: usize,
    expanded: bool,
}

#[derive(Debug)]
enum Registry {
    Set(HashSet<State>),
    CostMap(HashMap<State, CostEntry>),
}

/// States reached during one search.
#[derive(Debug)]
pub struct Visited {
    registry: Registry,
}

impl Visited {
    pub fn new(policy: VisitPolicy) -> Self {
        let registry = match policy {
            VisitPolicy::FirstDiscovery => Registry::Set(HashSet::new()),
            VisitPolicy::BestCost => Registry::CostMap(HashMap::new()),
        };
        Visited { registry }
    }

    /// Record that `state` was reached with path cost `g`. Returns whether a
    /// node for it should enter the frontier.
    pub fn admit(&mut self, state: &State, g: usize) -> bool {
        match &mut self.registry {
            Registry::Set(seen) => {
                if seen.contains(state) {
                    return false;
                }
                seen.insert(state.clone())
            }
            Registry::CostMap(costs) => match costs.get_mut(state) {
                Some(entry) if g < entry.best_g => {
                    entry.best_g = g;
                    true
                }
                Some(_) => false,
                None => {
                    costs.insert(
                        state.clone(),
                        CostEntry {
                            best_g: g,
                            expanded: false,
                        },
                    );
                    true
                }
            },
        }
    }

    /// Whether a frontier entry for `state` with cost `g` has been superseded
    /// by a cheaper one. Never true for the set policy.
    pub fn is_stale(&self, state: &State, g: usize) -> bool {
        match &self.registry {
            Registry::Set(_) => false,
            Registry::CostMap(costs) => costs.get(state).is_some_and(|entry| g > entry.best_g),
        }
    }

    /// Record an expansion of `state`. Returns `true` when it had already been
    /// expanded before.
    pub fn mark_expanded(&mut self, state: &State) -> bool {
        match &mut self.registry {
            Registry::Set(_) => false,
            Registry::CostMap(costs) => costs
                .get_mut(state)
                .is_some_and(|entry| std::mem::replace(&mut entry.expanded, true)),
        }
    }

    pub fn best_cost(&self, state: &State) -> Option<usize> {
        match &self.registry {
            Registry::Set(_) => None,
            Registry::CostMap(costs) => costs.get(state).map(|entry| entry.best_g),
        }
    }

    pub fn contains(&self, state: &State) -> bool {
        match &self.registry {
            Registry::Set(seen) => seen.contains(state),
            Registry::CostMap(costs) => costs.contains_key(state),
        }
    }

    pub fn len(&self) -> usize {
        match &self.registry {
            Registry::Set(seen) => seen.len(),
            Registry::CostMap(costs) => costs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{Node, NodeArena};

    fn ids(n: usize) -> Vec<NodeId> {
        let mut arena = NodeArena::new();
        (0..n)
            .map(|i| arena.push(Node::root(State::new((i as i32, 0), Vec::new()))))
            .collect()
    }

    fn drain(frontier: &mut Frontier) -> Vec<NodeId> {
        std::iter::from_fn(|| frontier.pop()).collect()
    }

    #[test]
    fn test_fifo_and_lifo_order() {
        let ids = ids(3);

        let mut fifo = Frontier::new(Discipline::Fifo);
        let mut lifo = Frontier::new(Discipline::Lifo);
        for &id in &ids {
            fifo.push(id, 0.0);
            lifo.push(id, 0.0);
        }
        assert_eq!(drain(&mut fifo), ids);
        assert_eq!(
            drain(&mut lifo),
            ids.iter().rev().copied().collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_priority_order_and_ties() {
        let ids = ids(5);
        let mut frontier = Frontier::new(Discipline::Priority);
        frontier.push(ids[0], 3.0);
        frontier.push(ids[1], 1.0);
        frontier.push(ids[2], f64::INFINITY);
        frontier.push(ids[3], 1.0);
        frontier.push(ids[4], 0.5);

        assert_eq!(frontier.discipline(), Discipline::Priority);
        assert_eq!(
            drain(&mut frontier),
            vec![ids[4], ids[1], ids[3], ids[0], ids[2]]
        );
    }

    #[test]
    fn test_high_water() {
        let ids = ids(3);
        let mut frontier = Frontier::new(Discipline::Fifo);
        assert!(frontier.is_empty());
        frontier.push(ids[0], 0.0);
        frontier.push(ids[1], 0.0);
        frontier.pop();
        frontier.pop();
        frontier.push(ids[2], 0.0);
        assert_eq!(frontier.len(), 1);
        assert_eq!(frontier.high_water(), 2);
        assert_eq!(frontier.inserted(), 3);
    }

    #[test]
    fn test_first_discovery() {
        let state = State::new((1, 1), [(2, 2)]);
        let mut visited = Visited::new(VisitPolicy::FirstDiscovery);
        assert!(visited.admit(&state, 5));
        assert!(!visited.admit(&state, 1));
        assert!(!visited.is_stale(&state, 100));
        assert!(!visited.mark_expanded(&state));
        assert_eq!(visited.best_cost(&state), None);
        assert_eq!(visited.len(), 1);
    }

    #[test]
    fn test_best_cost() {
        let state = State::new((1, 1), [(2, 2)]);
        let mut visited = Visited::new(VisitPolicy::BestCost);
        assert!(visited.admit(&state, 5));
        assert!(!visited.admit(&state, 5));
        assert!(!visited.admit(&state, 7));
        assert!(visited.admit(&state, 3));
        assert_eq!(visited.best_cost(&state), Some(3));

        // The entry pushed with g = 5 is now stale.
        assert!(visited.is_stale(&state, 5));
        assert!(!visited.is_stale(&state, 3));

        assert!(!visited.mark_expanded(&state));
        assert!(visited.mark_expanded(&state));
        assert!(visited.contains(&state));
        assert!(!visited.contains(&State::new((1, 2), [(2, 2)])));
    }
}
