//! Edge tag bag: typed routing fields plus an ordered side table.
//!
//! Snapshots written by different tool versions disagree on whether numbers
//! are stored as numbers or as text, so the three numeric fields hold a
//! [`NumericAttr`] until normalization coerces them.  Routing and statistics
//! only ever see numbers through the `Option<f64>` accessors.
//!
//! String tags arrive as whatever JSON scalar the producer chose
//! (`"oneway": true`, `"lanes": 2`, `"osmid": [12, 13]`).  They are stored as
//! text: booleans and numbers in their JSON spelling, lists joined with `;`,
//! and `null` as an absent tag.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use sn_core::OsmNodeId;

// ── EdgeKey ───────────────────────────────────────────────────────────────────

/// Identity of a directed edge slot: `(u, v, slot)`.
///
/// Multiple edges may join the same ordered pair; `slot` tells them apart.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct EdgeKey {
    pub u:    OsmNodeId,
    pub v:    OsmNodeId,
    pub slot: u32,
}

impl EdgeKey {
    /// Key from raw OSM node ids.
    pub fn new(u: i64, v: i64, slot: u32) -> Self {
        Self { u: OsmNodeId(u), v: OsmNodeId(v), slot }
    }
}

impl std::fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.u, self.v, self.slot)
    }
}

// ── NumericAttr ───────────────────────────────────────────────────────────────

/// A numeric tag as found in a snapshot: already a number, or text that may
/// parse as one.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumericAttr {
    Number(f64),
    Text(String),
}

impl NumericAttr {
    /// The value if it is already numeric.
    #[inline]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            NumericAttr::Number(v) => Some(*v),
            NumericAttr::Text(_) => None,
        }
    }

    /// Parse to a finite number, whatever the current representation.
    pub fn coerce(&self) -> Option<f64> {
        let v = match self {
            NumericAttr::Number(v) => *v,
            NumericAttr::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        v.is_finite().then_some(v)
    }
}

impl From<f64> for NumericAttr {
    fn from(v: f64) -> Self {
        NumericAttr::Number(v)
    }
}

// ── EdgeAttrs ─────────────────────────────────────────────────────────────────

/// Tags carried by one directed edge.
///
/// Unknown tags are kept verbatim in `extra` (sorted by key) so a
/// load → save cycle does not lose data.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawEdgeAttrs")]
pub struct EdgeAttrs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highway: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub surface: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oneway: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lanes: Option<String>,

    /// Metres.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<NumericAttr>,
    /// km/h.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed_kph: Option<NumericAttr>,
    /// Seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub travel_time: Option<NumericAttr>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

/// Wire form of [`EdgeAttrs`]: string tags as arbitrary JSON values.
#[derive(Deserialize)]
struct RawEdgeAttrs {
    #[serde(default)]
    highway: Option<Value>,
    #[serde(default)]
    surface: Option<Value>,
    #[serde(default)]
    access: Option<Value>,
    #[serde(default)]
    service: Option<Value>,
    #[serde(default)]
    oneway: Option<Value>,
    #[serde(default)]
    lanes: Option<Value>,

    #[serde(default)]
    length: Option<NumericAttr>,
    #[serde(default, alias = "speed")]
    speed_kph: Option<NumericAttr>,
    #[serde(default)]
    travel_time: Option<NumericAttr>,

    #[serde(flatten)]
    extra: BTreeMap<String, Value>,
}

/// Tag text for a JSON value; `None` for `null`.
fn tag_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Array(items) => {
            Some(items.into_iter().filter_map(tag_text).collect::<Vec<_>>().join(";"))
        }
        other => Some(other.to_string()),
    }
}

impl From<RawEdgeAttrs> for EdgeAttrs {
    fn from(raw: RawEdgeAttrs) -> Self {
        let text = |v: Option<Value>| v.and_then(tag_text);
        Self {
            highway:     text(raw.highway),
            surface:     text(raw.surface),
            access:      text(raw.access),
            service:     text(raw.service),
            oneway:      text(raw.oneway),
            lanes:       text(raw.lanes),
            length:      raw.length,
            speed_kph:   raw.speed_kph,
            travel_time: raw.travel_time,
            extra:       raw
                .extra
                .into_iter()
                .filter_map(|(k, v)| tag_text(v).map(|t| (k, t)))
                .collect(),
        }
    }
}

impl EdgeAttrs {
    #[inline]
    pub fn length_m(&self) -> Option<f64> {
        self.length.as_ref().and_then(NumericAttr::as_f64)
    }

    #[inline]
    pub fn speed_kph(&self) -> Option<f64> {
        self.speed_kph.as_ref().and_then(NumericAttr::as_f64)
    }

    #[inline]
    pub fn travel_time_s(&self) -> Option<f64> {
        self.travel_time.as_ref().and_then(NumericAttr::as_f64)
    }

    /// Look up a string tag by its snapshot key, typed fields first.
    pub fn tag(&self, key: &str) -> Option<&str> {
        let typed = match key {
            "highway" => &self.highway,
            "surface" => &self.surface,
            "access"  => &self.access,
            "service" => &self.service,
            "oneway"  => &self.oneway,
            "lanes"   => &self.lanes,
            _ => return self.extra.get(key).map(String::as_str),
        };
        typed.as_deref()
    }

    /// Set a string tag, routing known keys to their typed field.
    pub fn set_tag(&mut self, key: &str, value: impl Into<String>) {
        let value = Some(value.into());
        match key {
            "highway" => self.highway = value,
            "surface" => self.surface = value,
            "access"  => self.access = value,
            "service" => self.service = value,
            "oneway"  => self.oneway = value,
            "lanes"   => self.lanes = value,
            _ => {
                self.extra.insert(key.to_owned(), value.unwrap_or_default());
            }
        }
    }

    // ── Fluent constructors (test fixtures, loaders) ──────────────────────

    pub fn with_length(mut self, metres: f64) -> Self {
        self.length = Some(NumericAttr::Number(metres));
        self
    }

    pub fn with_speed(mut self, kph: f64) -> Self {
        self.speed_kph = Some(NumericAttr::Number(kph));
        self
    }

    pub fn with_travel_time(mut self, secs: f64) -> Self {
        self.travel_time = Some(NumericAttr::Number(secs));
        self
    }

    pub fn with_tag(mut self, key: &str, value: &str) -> Self {
        self.set_tag(key, value);
        self
    }
}
