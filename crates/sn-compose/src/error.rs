//! Composition and fetch-boundary error type.

use std::path::PathBuf;

use thiserror::Error;

use sn_graph::GraphError;

/// Errors produced by `sn-compose`.
#[derive(Debug, Error)]
pub enum ComposeError {
    /// The fetch boundary gave up after exhausting its retries.
    #[error("fetching '{place}' failed after {attempts} attempt(s); last error: {last_error}")]
    AcquisitionFailure {
        place:      String,
        attempts:   u32,
        last_error: String,
    },

    #[error("malformed snapshot {}: {reason}", path.display())]
    MalformedSnapshot { path: PathBuf, reason: String },

    /// No snapshots to merge.  Carries the searched directory, if any.
    #[error("no snapshots to merge{}", .0.as_ref().map(|d| format!(" in {}", d.display())).unwrap_or_default())]
    EmptyInputSet(Option<PathBuf>),

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for `sn-compose`.
pub type ComposeResult<T> = Result<T, ComposeError>;
