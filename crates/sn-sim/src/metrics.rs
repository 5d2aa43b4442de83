//! Route metrics and fleet percentile statistics.

use sn_core::NodeIdx;
use sn_graph::StreetGraph;

use crate::model::RouteRecord;

/// Total `(length_m, travel_time_s)` along a node path.
///
/// Each consecutive pair uses its lowest-slot edge; missing values count as
/// zero.  A single-node path has zero length and time.
pub fn path_totals(graph: &StreetGraph, path: &[NodeIdx]) -> (f64, f64) {
    path.windows(2)
        .filter_map(|w| graph.edge_between(w[0], w[1]))
        .map(|e| &graph.edge_attrs[e.index()])
        .fold((0.0, 0.0), |(len, time), a| {
            (
                len + a.length_m().unwrap_or(0.0),
                time + a.travel_time_s().unwrap_or(0.0),
            )
        })
}

/// Linear-interpolation percentile of an ascending sample, `p` in 0–100.
///
/// With `k = (n - 1) · p / 100`, `f = ⌊k⌋` and `c = f + 1`, the result is
/// `v[f] · (c - k) + v[c] · (k - f)`, or the last value when `c` is past the
/// end.  An empty sample has no percentile.
pub fn percentile(sorted: &[f64], p: f64) -> Option<f64> {
    let last = *sorted.last()?;
    let k = (sorted.len() - 1) as f64 * p.clamp(0.0, 100.0) / 100.0;
    let f = k.floor();
    let c = f + 1.0;
    let (fi, ci) = (f as usize, c as usize);
    if ci >= sorted.len() {
        return Some(last);
    }
    Some(sorted[fi] * (c - k) + sorted[ci] * (k - f))
}

/// Five-number summary of a sample.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Summary {
    pub min:    f64,
    pub p25:    f64,
    pub median: f64,
    pub mean:   f64,
    pub p75:    f64,
}

impl Summary {
    /// `None` for an empty sample.
    pub fn of(values: &[f64]) -> Option<Summary> {
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        Some(Summary {
            min:    *sorted.first()?,
            p25:    percentile(&sorted, 25.0)?,
            median: percentile(&sorted, 50.0)?,
            mean:   sorted.iter().sum::<f64>() / sorted.len() as f64,
            p75:    percentile(&sorted, 75.0)?,
        })
    }
}

/// Fleet-wide distribution of route lengths and times.
#[derive(Clone, Debug, PartialEq)]
pub struct FleetStats {
    pub routes:     usize,
    pub length_km:  Option<Summary>,
    pub travel_min: Option<Summary>,
}

impl FleetStats {
    pub fn from_routes(routes: &[RouteRecord]) -> Self {
        let lengths: Vec<f64> = routes.iter().map(|r| r.length_km).collect();
        let times: Vec<f64> = routes.iter().map(|r| r.travel_min).collect();
        Self {
            routes:     routes.len(),
            length_km:  Summary::of(&lengths),
            travel_min: Summary::of(&times),
        }
    }
}
