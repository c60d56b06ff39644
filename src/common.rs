mod node;
mod state;

pub use node::{Node, NodeArena, NodeId};
pub use state::{Direction, Position, State};

use anyhow::Result;

/// Render an action sequence as a compact `UDLR` string.
pub fn format_actions(actions: &[Direction]) -> String {
    actions.iter().map(ToString::to_string).collect()
}

/// Parse a `UDLR` string back into actions. Whitespace is ignored.
pub fn parse_actions(s: &str) -> Result<Vec<Direction>> {
    s.chars()
        .filter(|ch| !ch.is_whitespace())
        .map(Direction::try_from)
        .collect()
}
