//! Fetch configuration, loaded from a `.json` or `.toml` file.
//!
//! Every field has a default, so an empty file (or no file at all) is valid.
//!
//! ```toml
//! overpass_timeout  = 180
//! overpass_memory   = 1073741824
//! data_root         = "./data"
//! extra_useful_tags = ["smoothness:date"]
//!
//! [retry]
//! attempts      = 3
//! sleep_seconds = 60
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::fetch::EXTRA_USEFUL_TAGS;
use crate::{ComposeError, ComposeResult};

/// How often to retry a failed acquisition and how long to wait in between.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    pub attempts:      u32,
    pub sleep_seconds: u64,
}

impl RetryPolicy {
    pub fn sleep(&self) -> Duration {
        Duration::from_secs(self.sleep_seconds)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { attempts: 3, sleep_seconds: 60 }
    }
}

/// Settings for the acquisition boundary.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Query-service timeout, seconds.
    pub overpass_timeout: u64,
    /// Query-service memory limit, bytes.
    pub overpass_memory: u64,
    pub overpass_endpoint: Option<String>,
    /// Directory snapshots are written to and merged from.
    pub data_root: PathBuf,
    /// Tags kept in addition to [`EXTRA_USEFUL_TAGS`].
    pub extra_useful_tags: Vec<String>,
    pub retry: RetryPolicy,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            overpass_timeout:  180,
            overpass_memory:   1_073_741_824,
            overpass_endpoint: None,
            data_root:         PathBuf::from("./data"),
            extra_useful_tags: Vec::new(),
            retry:             RetryPolicy::default(),
        }
    }
}

impl FetchConfig {
    /// Built-in useful tags followed by configured extras, without repeats.
    pub fn useful_tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = Vec::with_capacity(EXTRA_USEFUL_TAGS.len() + self.extra_useful_tags.len());
        let all = EXTRA_USEFUL_TAGS
            .iter()
            .map(|t| (*t).to_owned())
            .chain(self.extra_useful_tags.iter().cloned());
        for tag in all {
            if !tags.contains(&tag) {
                tags.push(tag);
            }
        }
        tags
    }

    /// Load from `path` when given, else defaults.
    pub fn load(path: Option<&Path>) -> ComposeResult<Self> {
        match path {
            Some(p) => Self::try_from(p),
            None => Ok(Self::default()),
        }
    }
}

impl TryFrom<&Path> for FetchConfig {
    type Error = ComposeError;

    fn try_from(f: &Path) -> Result<Self, Self::Error> {
        let read = || {
            std::fs::read_to_string(f).map_err(|e| {
                ComposeError::Config(format!("failure reading {}: {e}", f.display()))
            })
        };
        debug!("loading fetch configuration from {}", f.display());
        match f.extension().and_then(|e| e.to_str()) {
            Some("toml") => toml::from_str(&read()?).map_err(|e| {
                ComposeError::Config(format!("failure decoding {}: {e}", f.display()))
            }),
            Some("json") => serde_json::from_str(&read()?).map_err(|e| {
                ComposeError::Config(format!("failure decoding {}: {e}", f.display()))
            }),
            _ => Err(ComposeError::Config(format!(
                "unsupported file type: {}",
                f.display()
            ))),
        }
    }
}
