//! Edge attribute normalization and routing-weight selection.
//!
//! Operates in place on a graph's edge tags; topology is never touched.
//!
//! ```text
//! travel_time [s] = length [m] / (speed [km/h] × 1000 / 3600)
//! ```

use std::collections::BTreeMap;

use log::{debug, info};

use crate::attrs::{EdgeAttrs, NumericAttr};
use crate::network::StreetGraph;

/// Cost assigned to an edge whose weight attribute is missing or unusable.
pub const DEFAULT_EDGE_COST: f64 = 1.0;

const KPH_TO_MPS: f64 = 1000.0 / 3600.0;
const MPH_TO_KPH: f64 = 1.609_344;

// ── WeightAttr ────────────────────────────────────────────────────────────────

/// The edge field used as the shortest-path cost.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum WeightAttr {
    /// `travel_time`, seconds.
    TravelTime,
    /// `length`, metres.
    Length,
}

impl WeightAttr {
    pub fn name(self) -> &'static str {
        match self {
            WeightAttr::TravelTime => "travel_time",
            WeightAttr::Length     => "length",
        }
    }

    /// Routing cost of one edge.  Missing, negative, or non-finite values
    /// cost [`DEFAULT_EDGE_COST`].
    #[inline]
    pub fn cost(self, attrs: &EdgeAttrs) -> f64 {
        let value = match self {
            WeightAttr::TravelTime => attrs.travel_time_s(),
            WeightAttr::Length     => attrs.length_m(),
        };
        value
            .filter(|c| c.is_finite() && *c >= 0.0)
            .unwrap_or(DEFAULT_EDGE_COST)
    }
}

impl std::fmt::Display for WeightAttr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Prefer `travel_time` if any edge has a positive numeric one, else `length`.
///
/// Pure: recompute after any mutation of the graph's tags.
pub fn select_weight(graph: &StreetGraph) -> WeightAttr {
    let any_time = graph
        .edge_attrs
        .iter()
        .any(|a| a.travel_time_s().is_some_and(|t| t > 0.0));
    if any_time { WeightAttr::TravelTime } else { WeightAttr::Length }
}

// ── normalize ─────────────────────────────────────────────────────────────────

/// Counters returned by [`normalize`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeReport {
    /// Text values successfully converted to numbers.
    pub coerced: usize,
    /// Values that could not be parsed and were removed.
    pub dropped: usize,
    /// `travel_time` values derived from length and speed.
    pub derived: usize,
}

/// Coerce numeric tags and derive missing travel times, in place.
pub fn normalize(graph: &mut StreetGraph) -> NormalizeReport {
    let mut report = NormalizeReport::default();
    for attrs in &mut graph.edge_attrs {
        coerce_edge(attrs, &mut report);
        if attrs.travel_time.is_none() {
            if let Some(t) = derive_travel_time(attrs) {
                attrs.travel_time = Some(NumericAttr::Number(t));
                report.derived += 1;
            }
        }
    }
    info!(
        "normalized {} edges: {} coerced, {} dropped, {} travel times derived",
        graph.edge_count(),
        report.coerced,
        report.dropped,
        report.derived
    );
    report
}

fn coerce_edge(attrs: &mut EdgeAttrs, report: &mut NormalizeReport) {
    for (name, slot) in [
        ("length", &mut attrs.length),
        ("speed_kph", &mut attrs.speed_kph),
        ("travel_time", &mut attrs.travel_time),
    ] {
        coerce_field(name, slot, report);
    }
}

fn coerce_field(name: &str, slot: &mut Option<NumericAttr>, report: &mut NormalizeReport) {
    let Some(value) = slot.take() else { return };
    match (value.coerce(), &value) {
        (Some(_), NumericAttr::Number(_)) => *slot = Some(value),
        (Some(v), NumericAttr::Text(_)) => {
            *slot = Some(NumericAttr::Number(v));
            report.coerced += 1;
        }
        (None, _) => {
            debug!("dropping unparseable {name} value {value:?}");
            report.dropped += 1;
        }
    }
}

/// `length / speed` in seconds, when both are usable.
fn derive_travel_time(attrs: &EdgeAttrs) -> Option<f64> {
    let length = attrs.length_m()?;
    let speed = attrs.speed_kph().filter(|s| *s > 0.0)?;
    Some(length / (speed * KPH_TO_MPS))
}

// ── Speed imputation / travel-time recomputation ──────────────────────────────

/// Counters returned by [`recompute_travel_times`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RetimeReport {
    pub normalize: NormalizeReport,
    /// Edges that received an imputed speed.
    pub imputed: usize,
    /// Edges whose travel time was (re)computed from length and speed.
    pub timed: usize,
    /// Edges left without a travel time.
    pub untimed: usize,
}

/// Give every edge without a speed an imputed `speed_kph`.
///
/// Order of preference: a parseable `maxspeed` tag; the mean speed of edges
/// sharing the same `highway` class; the mean speed over all edges.  Edges
/// stay without speed only if no edge in the graph has one.
pub fn impute_speeds(graph: &mut StreetGraph) -> usize {
    let mut by_class: BTreeMap<String, (f64, usize)> = BTreeMap::new();
    let mut overall = (0.0, 0usize);
    for attrs in &graph.edge_attrs {
        let Some(speed) = known_speed(attrs) else { continue };
        if let Some(class) = attrs.highway.as_deref() {
            let entry = by_class.entry(class.to_owned()).or_default();
            entry.0 += speed;
            entry.1 += 1;
        }
        overall.0 += speed;
        overall.1 += 1;
    }
    let mean = |(sum, count): (f64, usize)| (count > 0).then(|| sum / count as f64);
    let overall_mean = mean(overall);

    let mut imputed = 0;
    for attrs in &mut graph.edge_attrs {
        if attrs.speed_kph().is_some() {
            continue;
        }
        let speed = parse_maxspeed(attrs.tag("maxspeed"))
            .or_else(|| {
                attrs
                    .highway
                    .as_deref()
                    .and_then(|class| by_class.get(class).copied())
                    .and_then(mean)
            })
            .or(overall_mean);
        if let Some(speed) = speed {
            attrs.speed_kph = Some(NumericAttr::Number(speed));
            imputed += 1;
        }
    }
    imputed
}

fn known_speed(attrs: &EdgeAttrs) -> Option<f64> {
    attrs
        .speed_kph()
        .or_else(|| parse_maxspeed(attrs.tag("maxspeed")))
        .filter(|s| *s > 0.0)
}

/// Parse an OSM `maxspeed` value in km/h: `"50"`, `"30 mph"`, `"50;70"`.
///
/// Symbolic values (`"walk"`, `"none"`, `"RU:urban"`) yield `None`.
pub fn parse_maxspeed(raw: Option<&str>) -> Option<f64> {
    let first = raw?.split(|c| c == ';' || c == '|').next()?.trim();
    let (number, mph) = match first.strip_suffix("mph") {
        Some(rest) => (rest.trim(), true),
        None => (first.trim_end_matches("km/h").trim(), false),
    };
    let v = number.parse::<f64>().ok().filter(|v| v.is_finite() && *v > 0.0)?;
    Some(if mph { v * MPH_TO_KPH } else { v })
}

/// Normalize, impute missing speeds, then enforce
/// `travel_time = length / speed` on every edge.
///
/// Edges lacking a usable length or speed lose any stale `travel_time`, so
/// callers can tell which edges are untimed.
pub fn recompute_travel_times(graph: &mut StreetGraph) -> RetimeReport {
    let mut report = RetimeReport {
        normalize: normalize(graph),
        imputed:   impute_speeds(graph),
        ..RetimeReport::default()
    };
    for attrs in &mut graph.edge_attrs {
        match derive_travel_time(attrs) {
            Some(t) => {
                attrs.travel_time = Some(NumericAttr::Number(t));
                report.timed += 1;
            }
            None => {
                attrs.travel_time = None;
                report.untimed += 1;
            }
        }
    }
    info!(
        "recomputed travel times: {} timed, {} untimed, {} speeds imputed",
        report.timed, report.untimed, report.imputed
    );
    report
}
