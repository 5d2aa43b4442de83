//! `sn-compose` — build a master street graph from dated snapshots.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                      |
//! |--------------|---------------------------------------------------------------|
//! | [`snapshot`] | `Snapshot`, `discover_snapshots`, `load_snapshot`             |
//! | [`compose`]  | `compose`, `compose_at`, `merge_directory`, `MasterGraph`     |
//! | [`fetch`]    | `SnapshotFetcher`, `fetch_with_retry`, stamping, file naming   |
//! | [`config`]   | `FetchConfig`, `RetryPolicy` (JSON or TOML)                   |
//! | [`error`]    | `ComposeError`, `ComposeResult<T>`                            |

pub mod compose;
pub mod config;
pub mod error;
pub mod fetch;
pub mod snapshot;

#[cfg(test)]
mod tests;

pub use compose::{compose, compose_at, merge_directory, MasterGraph, Provenance};
pub use config::{FetchConfig, RetryPolicy};
pub use error::{ComposeError, ComposeResult};
pub use fetch::{
    acquire_snapshot, fetch_with_retry, sanitize_place_name, snapshot_file_name, FetchRequest,
    FileFetcher, SnapshotFetcher,
};
pub use snapshot::{discover_snapshots, load_snapshot, load_snapshots, Snapshot};
