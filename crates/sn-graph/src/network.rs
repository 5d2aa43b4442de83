//! Street multigraph representation and builder.
//!
//! # Data layout
//!
//! The graph uses **Compressed Sparse Row (CSR)** format for outgoing edges.
//! Given a `NodeIdx n`, its outgoing edges occupy the slice:
//!
//! ```text
//! edge_to[ node_out_start[n] .. node_out_start[n+1] ]
//! ```
//!
//! All edge arrays (`edge_from`, `edge_to`, `edge_slot`, `edge_attrs`) are
//! sorted by source node and indexed by `EdgeIdx`.  Within one source node
//! edges keep the order they were first added, so "the first enumerated
//! edge" between two nodes is stable across runs.
//!
//! # Identity
//!
//! Nodes are addressed externally by [`OsmNodeId`] and internally by the
//! dense [`NodeIdx`].  Edges are addressed externally by [`EdgeKey`]
//! `(u, v, slot)`; parallel edges share `(u, v)` and differ in `slot`.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use sn_core::{EdgeIdx, GeoPoint, NodeIdx, OsmNodeId};

use crate::attrs::{EdgeAttrs, EdgeKey};
use crate::{GraphError, GraphResult};

#[cfg(feature = "fx-hash")]
pub(crate) type IdMap<K, V> = rustc_hash::FxHashMap<K, V>;
#[cfg(not(feature = "fx-hash"))]
pub(crate) type IdMap<K, V> = std::collections::HashMap<K, V>;

// ── GraphMeta ─────────────────────────────────────────────────────────────────

/// Graph-level provenance carried alongside the nodes and edges.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphMeta {
    /// Place query that produced a single snapshot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_place: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fetched_at: Option<DateTime<Utc>>,
    /// Road filter expression used by the fetch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    /// Version of the tool that produced the snapshot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_version: Option<String>,

    /// Contributing snapshots of a composed graph, in merge order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub source_files: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merged_at: Option<DateTime<Utc>>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

/// A node as stored in the arena.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct NodeRecord {
    pub id:  OsmNodeId,
    pub pos: GeoPoint,
}

// ── StreetGraph ───────────────────────────────────────────────────────────────

/// Directed street multigraph in CSR format.
///
/// Topology is fixed once built; only `edge_attrs` and `meta` may be mutated
/// (attribute normalization).  Fields are `pub` for direct indexed access on
/// hot paths.  Do not construct directly; use [`StreetGraphBuilder`].
#[derive(Debug)]
pub struct StreetGraph {
    // ── Node data ─────────────────────────────────────────────────────────
    /// Indexed by `NodeIdx`.
    pub nodes: Vec<NodeRecord>,

    /// In-degree of each node; out-degree comes from the CSR row pointer.
    pub node_in_degree: Vec<u32>,

    // ── CSR edge adjacency ────────────────────────────────────────────────
    /// Outgoing edges of node `n` are at EdgeIdx
    /// `node_out_start[n] .. node_out_start[n+1]`.  Length = `node_count + 1`.
    pub node_out_start: Vec<u32>,

    // ── Edge data (indexed by EdgeIdx) ────────────────────────────────────
    pub edge_from:  Vec<NodeIdx>,
    pub edge_to:    Vec<NodeIdx>,
    /// Slot key distinguishing parallel edges.
    pub edge_slot:  Vec<u32>,
    pub edge_attrs: Vec<EdgeAttrs>,

    pub meta: GraphMeta,

    node_index: IdMap<OsmNodeId, NodeIdx>,
}

impl StreetGraph {
    /// Construct an empty graph with no nodes or edges.
    pub fn empty() -> Self {
        StreetGraphBuilder::new().build()
    }

    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // ── Lookup ────────────────────────────────────────────────────────────

    /// Arena index of an external node id.
    #[inline]
    pub fn node_idx(&self, id: OsmNodeId) -> Option<NodeIdx> {
        self.node_index.get(&id).copied()
    }

    #[inline]
    pub fn node_id(&self, node: NodeIdx) -> OsmNodeId {
        self.nodes[node.index()].id
    }

    #[inline]
    pub fn node_pos(&self, node: NodeIdx) -> GeoPoint {
        self.nodes[node.index()].pos
    }

    /// External `(u, v, slot)` identity of an edge.
    pub fn edge_key(&self, edge: EdgeIdx) -> EdgeKey {
        EdgeKey {
            u:    self.node_id(self.edge_from[edge.index()]),
            v:    self.node_id(self.edge_to[edge.index()]),
            slot: self.edge_slot[edge.index()],
        }
    }

    /// Find an edge by its external key.
    pub fn find_edge(&self, key: EdgeKey) -> Option<EdgeIdx> {
        let (u, v) = (self.node_idx(key.u)?, self.node_idx(key.v)?);
        self.out_edges(u)
            .find(|&e| self.edge_to[e.index()] == v && self.edge_slot[e.index()] == key.slot)
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// Iterator over the `EdgeIdx`s of all outgoing edges from `node`.
    #[inline]
    pub fn out_edges(&self, node: NodeIdx) -> impl Iterator<Item = EdgeIdx> + '_ {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        (start..end).map(|i| EdgeIdx(i as u32))
    }

    #[inline]
    pub fn out_degree(&self, node: NodeIdx) -> usize {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        end - start
    }

    /// Total degree (in + out), counting every parallel edge.
    #[inline]
    pub fn degree(&self, node: NodeIdx) -> usize {
        self.out_degree(node) + self.node_in_degree[node.index()] as usize
    }

    /// The lowest-slot edge from `u` to `v`, if any.
    ///
    /// This is the canonical choice whenever a path given as a node sequence
    /// has to be mapped back onto edges.
    pub fn edge_between(&self, u: NodeIdx, v: NodeIdx) -> Option<EdgeIdx> {
        self.out_edges(u)
            .filter(|&e| self.edge_to[e.index()] == v)
            .min_by_key(|&e| self.edge_slot[e.index()])
    }

    /// All edges with their endpoints, in `EdgeIdx` order.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeIdx, NodeIdx, NodeIdx, &EdgeAttrs)> + '_ {
        self.edge_attrs.iter().enumerate().map(|(i, attrs)| {
            (EdgeIdx(i as u32), self.edge_from[i], self.edge_to[i], attrs)
        })
    }

    /// Nodes with total degree ≥ `min_degree`, in index order.
    pub fn nodes_with_degree(&self, min_degree: usize) -> Vec<NodeIdx> {
        (0..self.node_count() as u32)
            .map(NodeIdx)
            .filter(|&n| self.degree(n) >= min_degree)
            .collect()
    }
}

// ── StreetGraphBuilder ────────────────────────────────────────────────────────

/// Construct a [`StreetGraph`] incrementally, then call [`build`](Self::build).
///
/// Re-adding a node id overwrites its position; re-adding an edge key
/// replaces its attribute bag wholesale.  Edges whose endpoints were never
/// added are rejected, so a built graph has no dangling edges.
///
/// # Example
///
/// ```
/// use sn_core::{GeoPoint, OsmNodeId};
/// use sn_graph::{EdgeAttrs, StreetGraphBuilder};
///
/// let mut b = StreetGraphBuilder::new();
/// b.add_node(OsmNodeId(1), GeoPoint::new(49.10, -122.66));
/// b.add_node(OsmNodeId(2), GeoPoint::new(49.11, -122.66));
/// b.add_edge(OsmNodeId(1), OsmNodeId(2), 0, EdgeAttrs::default().with_length(1_100.0)).unwrap();
/// let g = b.build();
/// assert_eq!(g.node_count(), 2);
/// assert_eq!(g.edge_count(), 1);
/// ```
pub struct StreetGraphBuilder {
    nodes:      Vec<NodeRecord>,
    node_index: IdMap<OsmNodeId, NodeIdx>,
    raw_edges:  Vec<RawEdge>,
    edge_index: IdMap<(NodeIdx, NodeIdx, u32), usize>,
    pub meta:   GraphMeta,
}

struct RawEdge {
    from:  NodeIdx,
    to:    NodeIdx,
    slot:  u32,
    attrs: EdgeAttrs,
}

impl StreetGraphBuilder {
    pub fn new() -> Self {
        Self::with_capacity(0, 0)
    }

    /// Pre-allocate for the expected number of nodes and edges.
    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            nodes:      Vec::with_capacity(nodes),
            node_index: IdMap::default(),
            raw_edges:  Vec::with_capacity(edges),
            edge_index: IdMap::default(),
            meta:       GraphMeta::default(),
        }
    }

    /// Add a node, or move an existing one to `pos`.  Returns its index.
    pub fn add_node(&mut self, id: OsmNodeId, pos: GeoPoint) -> NodeIdx {
        if let Some(&idx) = self.node_index.get(&id) {
            self.nodes[idx.index()].pos = pos;
            return idx;
        }
        let idx = NodeIdx(self.nodes.len() as u32);
        self.nodes.push(NodeRecord { id, pos });
        self.node_index.insert(id, idx);
        idx
    }

    /// Add (or replace) the directed edge `(u, v, slot)`.
    ///
    /// Returns `true` if an existing edge's attributes were replaced.
    pub fn add_edge(
        &mut self,
        u: OsmNodeId,
        v: OsmNodeId,
        slot: u32,
        attrs: EdgeAttrs,
    ) -> GraphResult<bool> {
        let from = self.lookup(u, EdgeKey { u, v, slot })?;
        let to   = self.lookup(v, EdgeKey { u, v, slot })?;
        Ok(self.push_edge(from, to, slot, attrs))
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn edge_count(&self) -> usize { self.raw_edges.len() }

    fn lookup(&self, id: OsmNodeId, key: EdgeKey) -> GraphResult<NodeIdx> {
        self.node_index
            .get(&id)
            .copied()
            .ok_or(GraphError::DanglingEdge { key, missing: id })
    }

    fn push_edge(&mut self, from: NodeIdx, to: NodeIdx, slot: u32, attrs: EdgeAttrs) -> bool {
        match self.edge_index.get(&(from, to, slot)) {
            Some(&i) => {
                self.raw_edges[i].attrs = attrs;
                true
            }
            None => {
                self.edge_index.insert((from, to, slot), self.raw_edges.len());
                self.raw_edges.push(RawEdge { from, to, slot, attrs });
                false
            }
        }
    }

    /// Consume the builder and produce a [`StreetGraph`].
    ///
    /// Time complexity: O(E log E) for the stable edge sort.
    pub fn build(self) -> StreetGraph {
        let node_count = self.nodes.len();
        let edge_count = self.raw_edges.len();

        // Stable sort keeps insertion order among edges of one source node.
        let mut raw = self.raw_edges;
        raw.sort_by_key(|e| e.from.0);

        let mut node_out_start = vec![0u32; node_count + 1];
        let mut node_in_degree = vec![0u32; node_count];
        for e in &raw {
            node_out_start[e.from.index() + 1] += 1;
            node_in_degree[e.to.index()] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[node_count] as usize, edge_count);

        let mut edge_from  = Vec::with_capacity(edge_count);
        let mut edge_to    = Vec::with_capacity(edge_count);
        let mut edge_slot  = Vec::with_capacity(edge_count);
        let mut edge_attrs = Vec::with_capacity(edge_count);
        for e in raw {
            edge_from.push(e.from);
            edge_to.push(e.to);
            edge_slot.push(e.slot);
            edge_attrs.push(e.attrs);
        }

        StreetGraph {
            nodes: self.nodes,
            node_in_degree,
            node_out_start,
            edge_from,
            edge_to,
            edge_slot,
            edge_attrs,
            meta: self.meta,
            node_index: self.node_index,
        }
    }
}

impl Default for StreetGraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}
