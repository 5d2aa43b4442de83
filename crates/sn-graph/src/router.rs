//! Routing trait and default single-source Dijkstra implementation.
//!
//! # Pluggability
//!
//! `sn-sim` calls routing via the [`Router`] trait, so applications can swap
//! in other search strategies (A*, contraction hierarchies) without touching
//! the simulator.
//!
//! # One tree per origin
//!
//! A simulated agent visits many targets from the same origin, so the router
//! computes a full [`ShortestPathTree`] once and every target path is a
//! cheap walk back along predecessor edges.
//!
//! # Tie-breaking
//!
//! The heap is ordered by `(cost, NodeIdx)`, and a node's predecessor is only
//! replaced on a strictly cheaper cost.  Among equal-cost paths the one
//! discovered first wins, which makes the tree a pure function of the graph,
//! the origin, and the weight attribute.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use sn_core::{EdgeIdx, NodeIdx};

use crate::network::StreetGraph;
use crate::normalize::WeightAttr;
use crate::{GraphError, GraphResult};

// ── ShortestPathTree ──────────────────────────────────────────────────────────

/// Result of a single-source search: best cost and predecessor edge per node.
#[derive(Debug, Clone)]
pub struct ShortestPathTree {
    pub source: NodeIdx,
    /// `f64::INFINITY` for unreached nodes.
    pub dist: Vec<f64>,
    /// `EdgeIdx::INVALID` for the source and for unreached nodes.
    pub prev_edge: Vec<EdgeIdx>,
}

impl ShortestPathTree {
    #[inline]
    pub fn reaches(&self, target: NodeIdx) -> bool {
        self.dist
            .get(target.index())
            .is_some_and(|d| d.is_finite())
    }

    /// Node sequence from the source to `target` inclusive.
    ///
    /// Returns `None` if `target` is unreachable.  A path to the source
    /// itself is the single-node sequence `[source]`.
    pub fn path_to(&self, graph: &StreetGraph, target: NodeIdx) -> Option<Vec<NodeIdx>> {
        if !self.reaches(target) {
            return None;
        }
        let mut nodes = vec![target];
        let mut cur = target;
        while cur != self.source {
            let e = self.prev_edge[cur.index()];
            if e == EdgeIdx::INVALID {
                return None;
            }
            cur = graph.edge_from[e.index()];
            nodes.push(cur);
        }
        nodes.reverse();
        Some(nodes)
    }
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable single-source routing engine.
///
/// Implementations must be `Send + Sync` so per-agent searches can run on
/// Rayon worker threads; they only ever read the graph.
pub trait Router: Send + Sync {
    /// Compute the shortest-path tree rooted at `source`.
    ///
    /// Errors only when `source` is not a node of `graph`; unreachable nodes
    /// are represented inside the tree, not as errors.
    fn tree(
        &self,
        graph: &StreetGraph,
        source: NodeIdx,
        weight: WeightAttr,
    ) -> GraphResult<ShortestPathTree>;
}

// ── DijkstraRouter ────────────────────────────────────────────────────────────

/// Binary-heap Dijkstra over the CSR street graph.
pub struct DijkstraRouter;

impl Router for DijkstraRouter {
    fn tree(
        &self,
        graph: &StreetGraph,
        source: NodeIdx,
        weight: WeightAttr,
    ) -> GraphResult<ShortestPathTree> {
        dijkstra(graph, source, weight)
    }
}

// ── Dijkstra internals ────────────────────────────────────────────────────────

/// Min-heap entry.  `BinaryHeap` is a max-heap, so the ordering is reversed.
#[derive(Copy, Clone, PartialEq)]
struct HeapEntry {
    cost: f64,
    node: NodeIdx,
}

impl Eq for HeapEntry {}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn dijkstra(
    graph: &StreetGraph,
    source: NodeIdx,
    weight: WeightAttr,
) -> GraphResult<ShortestPathTree> {
    let n = graph.node_count();
    if source.index() >= n {
        return Err(GraphError::NodeNotFound(source));
    }

    let mut dist      = vec![f64::INFINITY; n];
    let mut prev_edge = vec![EdgeIdx::INVALID; n];
    dist[source.index()] = 0.0;

    let mut heap = BinaryHeap::new();
    heap.push(HeapEntry { cost: 0.0, node: source });

    while let Some(HeapEntry { cost, node }) = heap.pop() {
        // Skip stale heap entries.
        if cost > dist[node.index()] {
            continue;
        }

        for edge in graph.out_edges(node) {
            let neighbor = graph.edge_to[edge.index()];
            let new_cost = cost + weight.cost(&graph.edge_attrs[edge.index()]);

            if new_cost < dist[neighbor.index()] {
                dist[neighbor.index()] = new_cost;
                prev_edge[neighbor.index()] = edge;
                heap.push(HeapEntry { cost: new_cost, node: neighbor });
            }
        }
    }

    Ok(ShortestPathTree { source, dist, prev_edge })
}
