//! Snapshot discovery and loading.
//!
//! A snapshot is one `*.json` graph document in a data directory, usually
//! named `<SLUG>__<YYYYMMDD>.json` by the fetch boundary.  Discovery order is
//! the lexicographic order of file names, so the same directory always merges
//! the same way.

use std::path::{Path, PathBuf};

use log::{debug, info};

use sn_graph::{read_graph, GraphError, StreetGraph};

use crate::{ComposeError, ComposeResult};

/// File extension of snapshot documents.
pub const SNAPSHOT_EXT: &str = "json";

/// One loaded snapshot.  Read-only input to composition.
#[derive(Debug)]
pub struct Snapshot {
    /// File name the snapshot was loaded from (recorded as provenance).
    pub source_id: String,
    pub graph:     StreetGraph,
}

impl Snapshot {
    pub fn new(source_id: impl Into<String>, graph: StreetGraph) -> Self {
        Self { source_id: source_id.into(), graph }
    }
}

/// All snapshot files directly inside `dir`, sorted by file name.
///
/// A missing directory, or one with no `*.json` files, is
/// [`ComposeError::EmptyInputSet`].
pub fn discover_snapshots(dir: &Path) -> ComposeResult<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(ComposeError::EmptyInputSet(Some(dir.to_path_buf())));
    }
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|e| e == SNAPSHOT_EXT) {
            files.push(path);
        }
    }
    if files.is_empty() {
        return Err(ComposeError::EmptyInputSet(Some(dir.to_path_buf())));
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    info!("found {} snapshot(s) in {}", files.len(), dir.display());
    Ok(files)
}

/// Load one snapshot.  Any read or decode failure is reported as
/// [`ComposeError::MalformedSnapshot`] naming the file.
pub fn load_snapshot(path: &Path) -> ComposeResult<Snapshot> {
    let source_id = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    debug!("loading {source_id}");
    let graph = read_graph(path).map_err(|e| malformed(path, e))?;
    info!(
        "loaded {source_id}: {} nodes, {} edges",
        graph.node_count(),
        graph.edge_count()
    );
    Ok(Snapshot { source_id, graph })
}

/// Load every path in order, stopping at the first failure.
pub fn load_snapshots(paths: &[PathBuf]) -> ComposeResult<Vec<Snapshot>> {
    paths.iter().map(|p| load_snapshot(p)).collect()
}

fn malformed(path: &Path, err: GraphError) -> ComposeError {
    ComposeError::MalformedSnapshot {
        path:   path.to_path_buf(),
        reason: err.to_string(),
    }
}
