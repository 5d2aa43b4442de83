//! Target selection: global sampling or radius clustering around hubs.
//!
//! # Clustering
//!
//! Each hub gets a quota from `split_evenly(targets, hubs)`.  Candidates are
//! eligible nodes within `radius_m` (haversine) of the hub that no earlier
//! hub has taken, in index order; the quota is sampled from them without
//! replacement.  A short candidate set is topped up from a shuffled copy of
//! the whole eligible pool.  No node is ever chosen twice.
//!
//! Candidate lookup uses an R-tree over `[lat, lon]`: a degree box sized by
//! [`GeoPoint::radius_envelope`] is queried first, and only the nodes inside
//! it get the exact distance test.  Near the poles or the antimeridian, where
//! no such box exists, every eligible node is tested.

use log::{debug, warn};
use rstar::{RTree, RTreeObject, AABB};

use sn_core::{GeoPoint, NodeIdx, SimRng};
use sn_graph::StreetGraph;

use crate::model::{Hub, Target};
use crate::sampling::{sample_nodes, split_evenly};
use crate::SimResult;

// ── Spatial index ─────────────────────────────────────────────────────────────

#[derive(Clone)]
struct NodeEntry {
    point: [f64; 2], // [lat, lon]
    node:  NodeIdx,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

/// Radius queries over a fixed node pool.
pub struct NodeLocator<'g> {
    graph: &'g StreetGraph,
    pool:  &'g [NodeIdx],
    tree:  RTree<NodeEntry>,
}

impl<'g> NodeLocator<'g> {
    pub fn new(graph: &'g StreetGraph, pool: &'g [NodeIdx]) -> Self {
        let entries = pool
            .iter()
            .map(|&node| {
                let p = graph.node_pos(node);
                NodeEntry { point: [p.lat, p.lon], node }
            })
            .collect();
        Self { graph, pool, tree: RTree::bulk_load(entries) }
    }

    /// Pool nodes within `radius_m` metres of `center`, in index order.
    pub fn within(&self, center: GeoPoint, radius_m: f64) -> Vec<NodeIdx> {
        let inside = |n: NodeIdx| self.graph.node_pos(n).distance_m(center) <= radius_m;
        let mut found: Vec<NodeIdx> = match center.radius_envelope(radius_m) {
            Some((half_lat, half_lon)) => {
                let bbox = AABB::from_corners(
                    [center.lat - half_lat, center.lon - half_lon],
                    [center.lat + half_lat, center.lon + half_lon],
                );
                self.tree
                    .locate_in_envelope_intersecting(&bbox)
                    .map(|e| e.node)
                    .filter(|&n| inside(n))
                    .collect()
            }
            None => self.pool.iter().copied().filter(|&n| inside(n)).collect(),
        };
        found.sort_unstable();
        found
    }
}

// ── Selection ─────────────────────────────────────────────────────────────────

/// `count` distinct targets drawn uniformly from `eligible`.
pub fn select_global(
    rng: &mut SimRng,
    eligible: &[NodeIdx],
    count: usize,
) -> SimResult<Vec<Target>> {
    Ok(sample_nodes(rng, eligible, count, "targets")?
        .into_iter()
        .map(|node| Target { node, hub: None })
        .collect())
}

/// Up to `count` distinct targets clustered around `hubs`, grouped by hub in
/// hub order.  Never fails; a shortfall is logged.
///
/// Candidates come from `eligible` (nodes with degree ≥ 1), not from every
/// graph node, so an isolated node inside the radius is never a target.
/// The top-up pool is `eligible` as well.
pub fn select_clustered(
    rng: &mut SimRng,
    graph: &StreetGraph,
    eligible: &[NodeIdx],
    hubs: &[Hub],
    count: usize,
    radius_m: f64,
) -> Vec<Target> {
    let locator = NodeLocator::new(graph, eligible);
    let mut taken = vec![false; graph.node_count()];
    let mut targets = Vec::with_capacity(count);

    for (hub_idx, (hub, quota)) in hubs.iter().zip(split_evenly(count, hubs.len())).enumerate() {
        let candidates: Vec<NodeIdx> = locator
            .within(graph.node_pos(hub.node), radius_m)
            .into_iter()
            .filter(|n| !taken[n.index()])
            .collect();
        debug!("hub {hub_idx}: {} candidate(s) within {radius_m} m", candidates.len());

        let mut picked = rng
            .sample_distinct(&candidates, quota.min(candidates.len()))
            .unwrap_or_default();
        for n in &picked {
            taken[n.index()] = true;
        }

        if picked.len() < quota {
            let near = picked.len();
            let mut pool = eligible.to_vec();
            rng.shuffle(&mut pool);
            for n in pool {
                if picked.len() == quota {
                    break;
                }
                if !taken[n.index()] {
                    taken[n.index()] = true;
                    picked.push(n);
                }
            }
            warn!(
                "hub {hub_idx}: only {near} node(s) within {radius_m} m, supplemented {} of {} from the full pool",
                picked.len() - near,
                quota - near,
            );
        }

        targets.extend(picked.into_iter().map(|node| Target { node, hub: Some(hub_idx) }));
    }

    if targets.len() < count {
        warn!("selected {} of {count} requested targets: eligible pool exhausted", targets.len());
    }
    targets
}
