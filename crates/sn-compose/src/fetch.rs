//! Acquisition boundary: request description, retry loop, snapshot stamping
//! and naming.
//!
//! The network query itself lives behind [`SnapshotFetcher`]; this module
//! only decides how often to ask, what to record about the answer, and where
//! to store it.  [`FileFetcher`] adapts a graph document that was downloaded
//! by other means.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use log::{error, info, warn};

use sn_graph::{read_graph, write_graph, GraphError, StreetGraph};

use crate::config::{FetchConfig, RetryPolicy};
use crate::snapshot::SNAPSHOT_EXT;
use crate::{ComposeError, ComposeResult};

/// Road classes requested from the query service.
pub const CUSTOM_FILTER: &str = concat!(
    r#"["highway"~"motorway|motorway_link|trunk|trunk_link|primary|primary_link|"#,
    "secondary|secondary_link|tertiary|tertiary_link|",
    r#"unclassified|residential|service|track"]"#,
);

/// Way tags kept on every fetched edge in addition to the routing fields.
pub const EXTRA_USEFUL_TAGS: &[&str] = &[
    // classification
    "highway", "name", "ref",
    // surface and roughness
    "surface", "smoothness", "tracktype", "4wd_only", "surface:note", "condition",
    // access and usage
    "access", "service", "motor_vehicle", "vehicle", "foot", "bicycle", "horse", "barrier",
    // physical
    "lanes", "width", "est_width", "maxspeed", "maxspeed:practical", "oneway", "bridge", "tunnel",
    // context
    "sidewalk", "cycleway", "shoulder", "lit",
];

/// Edge tag recording the day a snapshot was fetched.
pub const DATE_FETCHED_TAG: &str = "date_fetched";

// ── Naming ────────────────────────────────────────────────────────────────────

/// Filesystem-safe slug for a place query.
///
/// `"Langley, British Columbia, Canada"` → `"Langley_BC"`: the first
/// component, then the initials of a multi-word second component (or the
/// first two letters of a single word), with anything but ASCII letters,
/// digits and `_` removed.
pub fn sanitize_place_name(place: &str) -> String {
    let parts: Vec<&str> = place.split(',').map(str::trim).collect();
    let slug = match parts.as_slice() {
        [first, second, ..] => {
            let words: Vec<&str> = second.split_whitespace().collect();
            let abbrev: String = if words.len() >= 2 {
                words
                    .iter()
                    .filter_map(|w| w.chars().next())
                    .filter(|c| c.is_alphabetic())
                    .flat_map(char::to_uppercase)
                    .collect()
            } else {
                second.chars().take(2).flat_map(char::to_uppercase).collect()
            };
            format!("{first}_{abbrev}")
        }
        [only] => (*only).to_owned(),
        [] => String::new(),
    };
    slug.replace(' ', "_")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect()
}

/// `<SLUG>__<YYYYMMDD>.json`
pub fn snapshot_file_name(place: &str, date: NaiveDate) -> String {
    format!(
        "{}__{}.{SNAPSHOT_EXT}",
        sanitize_place_name(place),
        date.format("%Y%m%d")
    )
}

// ── FetchRequest ──────────────────────────────────────────────────────────────

/// Everything a fetcher needs to know, passed explicitly per call.
#[derive(Clone, Debug, PartialEq)]
pub struct FetchRequest {
    pub place:        String,
    pub filter:       String,
    /// Tags to keep on fetched edges.
    pub useful_tags:  Vec<String>,
    pub timeout_s:    u64,
    pub memory_bytes: u64,
    pub endpoint:     Option<String>,
}

impl FetchRequest {
    pub fn new(place: impl Into<String>, config: &FetchConfig) -> Self {
        Self {
            place:        place.into(),
            filter:       CUSTOM_FILTER.to_owned(),
            useful_tags:  config.useful_tags(),
            timeout_s:    config.overpass_timeout,
            memory_bytes: config.overpass_memory,
            endpoint:     config.overpass_endpoint.clone(),
        }
    }
}

// ── SnapshotFetcher ───────────────────────────────────────────────────────────

/// One attempt at acquiring the raw graph for a place.
pub trait SnapshotFetcher {
    type Error: fmt::Display;

    fn fetch(&mut self, request: &FetchRequest) -> Result<StreetGraph, Self::Error>;
}

/// Fetcher that reads a graph document already on disk.
///
/// Side-table tags not in the request's useful-tag list are dropped.
pub struct FileFetcher {
    pub path: PathBuf,
}

impl SnapshotFetcher for FileFetcher {
    type Error = GraphError;

    fn fetch(&mut self, request: &FetchRequest) -> Result<StreetGraph, GraphError> {
        let mut graph = read_graph(&self.path)?;
        retain_tags(&mut graph, &request.useful_tags);
        Ok(graph)
    }
}

/// Drop side-table tags not named in `keep`.  Typed fields are untouched.
pub fn retain_tags(graph: &mut StreetGraph, keep: &[String]) {
    for attrs in &mut graph.edge_attrs {
        attrs.extra.retain(|k, _| keep.iter().any(|t| t == k));
    }
}

// ── Retry / stamping ──────────────────────────────────────────────────────────

/// Call `fetcher` up to `policy.attempts` times, calling `sleep` between
/// failed attempts.  The last error is surfaced in
/// [`ComposeError::AcquisitionFailure`].
pub fn fetch_with_retry<F, S>(
    fetcher: &mut F,
    request: &FetchRequest,
    policy: &RetryPolicy,
    mut sleep: S,
) -> ComposeResult<StreetGraph>
where
    F: SnapshotFetcher,
    S: FnMut(Duration),
{
    let attempts = policy.attempts.max(1);
    let mut last_error = String::new();
    for attempt in 1..=attempts {
        info!("fetching '{}' (attempt {attempt}/{attempts})", request.place);
        match fetcher.fetch(request) {
            Ok(graph) => {
                info!(
                    "fetched '{}': {} nodes, {} edges",
                    request.place,
                    graph.node_count(),
                    graph.edge_count()
                );
                return Ok(graph);
            }
            Err(e) => {
                warn!("attempt {attempt} failed: {e}");
                last_error = e.to_string();
                if attempt < attempts {
                    info!("waiting {}s before retry", policy.sleep_seconds);
                    sleep(policy.sleep());
                }
            }
        }
    }
    error!("giving up on '{}' after {attempts} attempt(s)", request.place);
    Err(ComposeError::AcquisitionFailure {
        place: request.place.clone(),
        attempts,
        last_error,
    })
}

/// Record where and when a snapshot came from, on the graph and every edge.
pub fn stamp_snapshot(graph: &mut StreetGraph, request: &FetchRequest, fetched_at: DateTime<Utc>) {
    graph.meta.source_place = Some(request.place.clone());
    graph.meta.fetched_at = Some(fetched_at);
    graph.meta.filter = Some(request.filter.clone());
    graph.meta.tool_version = Some(env!("CARGO_PKG_VERSION").to_owned());

    let day = fetched_at.format("%Y-%m-%d").to_string();
    for attrs in &mut graph.edge_attrs {
        attrs.set_tag(DATE_FETCHED_TAG, day.clone());
    }
}

/// Fetch with retries, stamp, and write under `out_dir` with the standard
/// snapshot file name.  Returns the written path.
pub fn acquire_snapshot<F: SnapshotFetcher>(
    fetcher: &mut F,
    request: &FetchRequest,
    policy: &RetryPolicy,
    out_dir: &Path,
    fetched_at: DateTime<Utc>,
) -> ComposeResult<PathBuf> {
    let mut graph = fetch_with_retry(fetcher, request, policy, std::thread::sleep)?;
    stamp_snapshot(&mut graph, request, fetched_at);

    let path = out_dir.join(snapshot_file_name(&request.place, fetched_at.date_naive()));
    write_graph(&graph, &path)?;
    info!("saved snapshot to {}", path.display());
    Ok(path)
}
