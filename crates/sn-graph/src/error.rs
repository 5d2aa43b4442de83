//! Graph-subsystem error type.

use thiserror::Error;

use sn_core::{CoreError, NodeIdx, OsmNodeId};

use crate::attrs::EdgeKey;

/// Errors produced by `sn-graph`.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("edge {key} references node {missing}, which is not in the graph")]
    DanglingEdge { key: EdgeKey, missing: OsmNodeId },

    #[error("node {0} not found in graph")]
    NodeNotFound(NodeIdx),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("snapshot decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for `sn-graph`.
pub type GraphResult<T> = Result<T, GraphError>;
