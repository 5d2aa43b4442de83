//! Last-writer-wins union of snapshots into one master graph.
//!
//! # Merge rules
//!
//! - Nodes are unioned by [`OsmNodeId`](sn_core::OsmNodeId).  A node seen in
//!   several snapshots appears once, at the position given by the latest one.
//! - Edges are unioned by `(u, v, slot)`.  A later snapshot's edge replaces
//!   the earlier attribute bag wholesale; fields are never merged.  Distinct
//!   slots between the same pair stay separate parallel edges.
//! - Graph-level metadata is overlaid in snapshot order, then the list of
//!   contributing files and the merge time are recorded.

use std::path::Path;

use chrono::{DateTime, Utc};
use log::{info, warn};

use sn_graph::{write_graph, GraphMeta, StreetGraphBuilder, StreetGraph};

use crate::snapshot::{discover_snapshots, load_snapshots, Snapshot};
use crate::{ComposeError, ComposeResult};

/// Where a master graph came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Provenance {
    /// Snapshot source ids in merge order.
    pub sources:   Vec<String>,
    pub merged_at: DateTime<Utc>,
}

/// The composed graph plus its provenance.
#[derive(Debug)]
pub struct MasterGraph {
    pub graph:      StreetGraph,
    pub provenance: Provenance,
}

/// Compose snapshots, stamping the current time.
pub fn compose(snapshots: &[Snapshot]) -> ComposeResult<MasterGraph> {
    compose_at(snapshots, Utc::now())
}

/// Compose snapshots in slice order with an explicit merge timestamp.
///
/// An empty slice is [`ComposeError::EmptyInputSet`].
pub fn compose_at(
    snapshots: &[Snapshot],
    merged_at: DateTime<Utc>,
) -> ComposeResult<MasterGraph> {
    if snapshots.is_empty() {
        return Err(ComposeError::EmptyInputSet(None));
    }

    let nodes_hint = snapshots.iter().map(|s| s.graph.node_count()).max().unwrap_or(0);
    let edges_hint = snapshots.iter().map(|s| s.graph.edge_count()).max().unwrap_or(0);
    let mut builder = StreetGraphBuilder::with_capacity(nodes_hint, edges_hint);
    let mut replaced = 0usize;

    for snap in snapshots {
        let g = &snap.graph;
        overlay_meta(&mut builder.meta, &g.meta);
        for node in &g.nodes {
            builder.add_node(node.id, node.pos);
        }
        for (e, u, v, attrs) in g.edges() {
            let slot = g.edge_slot[e.index()];
            if builder.add_edge(g.node_id(u), g.node_id(v), slot, attrs.clone())? {
                replaced += 1;
            }
        }
    }

    let sources: Vec<String> = snapshots.iter().map(|s| s.source_id.clone()).collect();
    builder.meta.source_files = sources.clone();
    builder.meta.merged_at = Some(merged_at);

    let graph = builder.build();
    info!(
        "composed {} snapshot(s): {} nodes, {} edges ({} edge bags replaced)",
        snapshots.len(),
        graph.node_count(),
        graph.edge_count(),
        replaced
    );
    Ok(MasterGraph { graph, provenance: Provenance { sources, merged_at } })
}

/// Later snapshot metadata wins key by key.
fn overlay_meta(into: &mut GraphMeta, from: &GraphMeta) {
    if from.source_place.is_some() {
        into.source_place.clone_from(&from.source_place);
    }
    if from.fetched_at.is_some() {
        into.fetched_at = from.fetched_at;
    }
    if from.filter.is_some() {
        into.filter.clone_from(&from.filter);
    }
    if from.tool_version.is_some() {
        into.tool_version.clone_from(&from.tool_version);
    }
    into.extra.extend(from.extra.iter().map(|(k, v)| (k.clone(), v.clone())));
}

/// Discover, load, compose and write: the `merge` command.
///
/// Every snapshot is loaded before anything is written, so a malformed file
/// leaves `output` untouched.
pub fn merge_directory(dir: &Path, output: &Path) -> ComposeResult<MasterGraph> {
    let paths = discover_snapshots(dir)?;
    let snapshots = load_snapshots(&paths)?;
    let master = compose(&snapshots)?;

    if master.graph.is_empty() {
        warn!("merged graph has no nodes");
    }
    write_graph(&master.graph, output)?;
    info!(
        "merge completed: {} nodes, {} edges written to {}",
        master.graph.node_count(),
        master.graph.edge_count(),
        output.display()
    );
    Ok(master)
}
