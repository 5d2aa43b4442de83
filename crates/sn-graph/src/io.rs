//! JSON snapshot reader and writer.
//!
//! # Document format
//!
//! ```json
//! {
//!   "meta":  { "source_place": "Langley, British Columbia, Canada", ... },
//!   "nodes": [ { "id": 101, "lat": 49.104, "lon": -122.66 }, ... ],
//!   "edges": [ { "u": 101, "v": 102, "key": 0,
//!                "highway": "residential", "length": 87.4, ... }, ... ]
//! }
//! ```
//!
//! Node coordinates are also accepted as `y`/`x`.  Edge tags other than
//! `u`, `v`, `key` are read into [`EdgeAttrs`]; numeric tags may be numbers
//! or numeric strings.  Out-of-range coordinates are rejected.  An edge that references an unknown node is a decode
//! error, never silently dropped.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use sn_core::{GeoPoint, OsmNodeId};

use crate::attrs::EdgeAttrs;
use crate::network::{GraphMeta, StreetGraph, StreetGraphBuilder};
use crate::GraphResult;

// ── Wire records ──────────────────────────────────────────────────────────────

#[derive(Serialize, Deserialize)]
struct GraphDoc {
    #[serde(default)]
    meta:  GraphMeta,
    nodes: Vec<NodeDoc>,
    #[serde(default)]
    edges: Vec<EdgeDoc>,
}

#[derive(Serialize, Deserialize)]
struct NodeDoc {
    id:  OsmNodeId,
    #[serde(alias = "y")]
    lat: f64,
    #[serde(alias = "x")]
    lon: f64,
}

#[derive(Serialize, Deserialize)]
struct EdgeDoc {
    u:   OsmNodeId,
    v:   OsmNodeId,
    #[serde(default)]
    key: u32,
    #[serde(flatten)]
    attrs: EdgeAttrs,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a graph from a JSON snapshot file.
pub fn read_graph(path: &Path) -> GraphResult<StreetGraph> {
    let file = File::open(path)?;
    read_graph_from(BufReader::new(file))
}

/// Like [`read_graph`] but accepts any `Read` source.
pub fn read_graph_from<R: Read>(reader: R) -> GraphResult<StreetGraph> {
    let doc: GraphDoc = serde_json::from_reader(reader)?;

    let mut builder = StreetGraphBuilder::with_capacity(doc.nodes.len(), doc.edges.len());
    builder.meta = doc.meta;
    for n in doc.nodes {
        builder.add_node(n.id, GeoPoint::checked(n.lat, n.lon)?);
    }
    for e in doc.edges {
        builder.add_edge(e.u, e.v, e.key, e.attrs)?;
    }
    Ok(builder.build())
}

/// Write a graph as a JSON snapshot file, creating parent directories.
pub fn write_graph(graph: &StreetGraph, path: &Path) -> GraphResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = BufWriter::new(File::create(path)?);
    write_graph_to(graph, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Like [`write_graph`] but accepts any `Write` sink.
pub fn write_graph_to<W: Write>(graph: &StreetGraph, writer: W) -> GraphResult<()> {
    let doc = GraphDoc {
        meta:  graph.meta.clone(),
        nodes: graph
            .nodes
            .iter()
            .map(|n| NodeDoc { id: n.id, lat: n.pos.lat, lon: n.pos.lon })
            .collect(),
        edges: graph
            .edges()
            .map(|(e, u, v, attrs)| EdgeDoc {
                u:     graph.node_id(u),
                v:     graph.node_id(v),
                key:   graph.edge_slot[e.index()],
                attrs: attrs.clone(),
            })
            .collect(),
    };
    serde_json::to_writer(writer, &doc)?;
    Ok(())
}
