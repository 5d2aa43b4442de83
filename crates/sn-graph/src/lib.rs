//! `sn-graph` — street multigraph, snapshot I/O, normalization, statistics,
//! and routing.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                        |
//! |---------------|-----------------------------------------------------------------|
//! | [`attrs`]     | `EdgeKey`, `EdgeAttrs` (typed tags + side table), `NumericAttr`  |
//! | [`network`]   | `StreetGraph` (CSR multigraph), `StreetGraphBuilder`, `GraphMeta`|
//! | [`io`]        | JSON snapshot `read_graph` / `write_graph`                      |
//! | [`normalize`] | numeric coercion, travel-time derivation, `select_weight`       |
//! | [`stats`]     | category lengths, tag histograms, `NetworkStats`                |
//! | [`router`]    | `Router` trait, `ShortestPathTree`, `DijkstraRouter`            |
//! | [`error`]     | `GraphError`, `GraphResult<T>`                                  |
//!
//! # Feature flags
//!
//! | Flag      | Effect                                                       |
//! |-----------|--------------------------------------------------------------|
//! | `fx-hash` | Use FxHash for the node-id → index map.                      |

pub mod attrs;
pub mod error;
pub mod io;
pub mod network;
pub mod normalize;
pub mod router;
pub mod stats;


pub use attrs::{EdgeAttrs, EdgeKey, NumericAttr};
pub use error::{GraphError, GraphResult};
pub use io::{read_graph, read_graph_from, write_graph, write_graph_to};
pub use network::{GraphMeta, NodeRecord, StreetGraph, StreetGraphBuilder};
pub use normalize::{
    normalize, recompute_travel_times, select_weight, NormalizeReport, RetimeReport, WeightAttr,
};
pub use router::{DijkstraRouter, Router, ShortestPathTree};
pub use stats::{EdgePredicate, Histogram, NetworkStats};
