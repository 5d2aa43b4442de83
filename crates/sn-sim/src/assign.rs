//! Round-robin target assignment.

use sn_core::NodeIdx;

use crate::model::{Agent, Target};

/// Destinations of each agent, indexed like `agents`, in assignment order.
///
/// Target `i` goes to agent `i mod agents.len()`, counting agents in creation
/// order.  Clustered targets follow the same rotation as global ones; their
/// hub only records where they were drawn.
pub fn assign_targets(agents: &[Agent], targets: &[Target]) -> Vec<Vec<NodeIdx>> {
    let mut out = vec![Vec::new(); agents.len()];
    if agents.is_empty() {
        return out;
    }
    for (i, target) in targets.iter().enumerate() {
        out[i % agents.len()].push(target.node);
    }
    out
}
