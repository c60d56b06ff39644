use std::ops::Index;

use super::{Direction, State};

/// Handle of a node inside a [`NodeArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

/// A search-tree record. Which cost fields matter is up to the algorithm:
/// BFS/DFS read `depth`, greedy reads `h_cost`, A* reads `g_cost` and `f_cost()`.
#[derive(Debug, Clone)]
pub struct Node {
    pub state: State,
    pub parent: Option<NodeId>,
    pub action: Option<Direction>,
    pub depth: usize,
    pub g_cost: usize,
    pub h_cost: Option<f64>,
}

impl Node {
    pub fn root(state: State) -> Self {
        Node {
            state,
            parent: None,
            action: None,
            depth: 0,
            g_cost: 0,
            h_cost: None,
        }
    }

    /// `g + h`, or `None` when no heuristic has been computed for this node.
    pub fn f_cost(&self) -> Option<f64> {
        self.h_cost.map(|h| self.g_cost as f64 + h)
    }
}

/// Owner of every node created during one search. Nodes refer to their
/// parent by handle, so parent chains stay valid for the arena's lifetime.
#[derive(Debug, Default)]
pub struct NodeArena {
    nodes: Vec<Node>,
}

impl Index<NodeId> for NodeArena {
    type Output = Node;
    fn index(&self, id: NodeId) -> &Self::Output {
        &self.nodes[id.0]
    }
}

impl NodeArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    /// Build (but do not store) the child of `parent` reached by `action`.
    pub fn child(&self, parent: NodeId, action: Direction, state: State) -> Node {
        let parent_node = &self[parent];
        Node {
            state,
            parent: Some(parent),
            action: Some(action),
            depth: parent_node.depth + 1,
            // Uniform step cost.
            g_cost: parent_node.g_cost + 1,
            h_cost: None,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Actions from the root to `id`, in execution order.
    pub fn construct_path(&self, mut id: NodeId) -> Vec<Direction> {
        let mut path = Vec::with_capacity(self[id].depth);
        while let Node {
            parent: Some(parent),
            action: Some(action),
            ..
        } = self[id]
        {
            path.push(action);
            id = parent;
        }
        path.reverse();
        path
    }

    /// Nodes from `id` back up to the root.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = &Node> + '_ {
        std::iter::successors(Some(&self[id]), |node| node.parent.map(|p| &self[p]))
    }
}
