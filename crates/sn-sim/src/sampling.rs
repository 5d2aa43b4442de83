//! Node eligibility, seeded sampling, and even splitting.

use sn_core::{NodeIdx, SimRng};
use sn_graph::StreetGraph;

use crate::{SimError, SimResult};

/// Minimum total degree for a node to host a hub, agent, or target.
pub const MIN_DEGREE: usize = 1;

/// Nodes with at least one incident edge, in index order.
///
/// Index order makes the pool, and therefore every seeded sample drawn from
/// it, a function of the graph alone.
pub fn eligible_nodes(graph: &StreetGraph) -> Vec<NodeIdx> {
    graph.nodes_with_degree(MIN_DEGREE)
}

/// Draw `count` distinct nodes from `pool`.
pub fn sample_nodes(
    rng: &mut SimRng,
    pool: &[NodeIdx],
    count: usize,
    what: &'static str,
) -> SimResult<Vec<NodeIdx>> {
    rng.sample_distinct(pool, count).ok_or(SimError::InsufficientNodes {
        what,
        requested: count,
        available: pool.len(),
    })
}

/// Split `total` into `parts` shares differing by at most one; the first
/// `total % parts` shares get the extra unit.
///
/// ```
/// assert_eq!(sn_sim::split_evenly(7, 3), vec![3, 2, 2]);
/// ```
pub fn split_evenly(total: usize, parts: usize) -> Vec<usize> {
    if parts == 0 {
        return Vec::new();
    }
    let (base, extra) = (total / parts, total % parts);
    (0..parts).map(|i| base + usize::from(i < extra)).collect()
}
