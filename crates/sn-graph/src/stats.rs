//! Aggregate edge lengths and categorical histograms.
//!
//! Everything here is a pure read over the graph.  Lengths are summed from
//! the numeric `length` tag in metres and reported in kilometres; an edge
//! without a numeric length contributes zero.

use std::fmt;

use crate::attrs::EdgeAttrs;
use crate::network::StreetGraph;

/// Surface values counted as paved.
pub const PAVED_SURFACES: &[&str] = &[
    "paved",
    "asphalt",
    "concrete",
    "concrete:plates",
    "concrete:lanes",
    "paving_stones",
    "sett",
    "metal",
    "wood",
];

/// Track-quality buckets, best to worst.
pub const TRACKTYPE_GRADES: &[&str] = &["grade1", "grade2", "grade3", "grade4", "grade5"];

// ── Predicates ────────────────────────────────────────────────────────────────

/// A named boolean test over an edge's tags.
#[derive(Copy, Clone)]
pub struct EdgePredicate {
    pub name: &'static str,
    pub test: fn(&EdgeAttrs) -> bool,
}

impl EdgePredicate {
    pub const fn new(name: &'static str, test: fn(&EdgeAttrs) -> bool) -> Self {
        Self { name, test }
    }

    #[inline]
    pub fn matches(&self, attrs: &EdgeAttrs) -> bool {
        (self.test)(attrs)
    }
}

impl fmt::Debug for EdgePredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EdgePredicate").field(&self.name).finish()
    }
}

pub fn is_paved(a: &EdgeAttrs) -> bool {
    a.surface.as_deref().is_some_and(|s| PAVED_SURFACES.contains(&s))
}

/// Surface known and not paved.  Edges without a surface are neither.
pub fn is_unpaved(a: &EdgeAttrs) -> bool {
    a.surface.as_deref().is_some_and(|s| !PAVED_SURFACES.contains(&s))
}

pub fn is_track(a: &EdgeAttrs) -> bool {
    a.highway.as_deref() == Some("track")
}

pub fn is_alley(a: &EdgeAttrs) -> bool {
    a.service.as_deref() == Some("alley")
}

pub fn is_private(a: &EdgeAttrs) -> bool {
    a.access.as_deref() == Some("private")
}

pub fn any_edge(_: &EdgeAttrs) -> bool {
    true
}

pub const PAVED:   EdgePredicate = EdgePredicate::new("paved", is_paved);
pub const UNPAVED: EdgePredicate = EdgePredicate::new("unpaved", is_unpaved);
pub const TRACK:   EdgePredicate = EdgePredicate::new("track", is_track);
pub const ALLEY:   EdgePredicate = EdgePredicate::new("alley", is_alley);
pub const PRIVATE: EdgePredicate = EdgePredicate::new("private", is_private);
pub const TOTAL:   EdgePredicate = EdgePredicate::new("total", any_edge);

// ── Length aggregation ────────────────────────────────────────────────────────

/// Total length in km of edges matching `pred`.
pub fn length_km(graph: &StreetGraph, pred: &EdgePredicate) -> f64 {
    let metres: f64 = graph
        .edge_attrs
        .iter()
        .filter(|a| pred.matches(a))
        .filter_map(EdgeAttrs::length_m)
        .sum();
    metres / 1000.0
}

/// `(name, km)` for each predicate, in input order.
pub fn category_lengths(
    graph: &StreetGraph,
    preds: &[EdgePredicate],
) -> Vec<(&'static str, f64)> {
    preds.iter().map(|p| (p.name, length_km(graph, p))).collect()
}

// ── Histogram ─────────────────────────────────────────────────────────────────

/// Counts over a fixed ordered bucket set plus an `unknown` bucket.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Histogram {
    pub key:     String,
    pub buckets: Vec<(String, usize)>,
    /// Missing or unrecognised values.
    pub unknown: usize,
}

impl Histogram {
    pub fn new(key: &str, buckets: &[&str]) -> Self {
        Self {
            key:     key.to_owned(),
            buckets: buckets.iter().map(|b| ((*b).to_owned(), 0)).collect(),
            unknown: 0,
        }
    }

    pub fn record(&mut self, value: Option<&str>) {
        let slot = value.and_then(|v| self.buckets.iter_mut().find(|(b, _)| b == v));
        match slot {
            Some((_, count)) => *count += 1,
            None => self.unknown += 1,
        }
    }

    pub fn count(&self, bucket: &str) -> Option<usize> {
        self.buckets.iter().find(|(b, _)| b == bucket).map(|(_, c)| *c)
    }

    pub fn total(&self) -> usize {
        self.buckets.iter().map(|(_, c)| c).sum::<usize>() + self.unknown
    }
}

/// Tally tag `key` over edges matching `filter`.
pub fn tag_histogram(
    graph: &StreetGraph,
    filter: &EdgePredicate,
    key: &str,
    buckets: &[&str],
) -> Histogram {
    let mut hist = Histogram::new(key, buckets);
    for attrs in graph.edge_attrs.iter().filter(|a| filter.matches(a)) {
        hist.record(attrs.tag(key));
    }
    hist
}

/// `tracktype` grades of `highway=track` edges.
pub fn tracktype_histogram(graph: &StreetGraph) -> Histogram {
    tag_histogram(graph, &TRACK, "tracktype", TRACKTYPE_GRADES)
}

// ── NetworkStats ──────────────────────────────────────────────────────────────

/// Summary figures for one graph, as printed by the `stats` command.
#[derive(Clone, Debug, PartialEq)]
pub struct NetworkStats {
    pub nodes:      usize,
    pub edges:      usize,
    pub total_km:   f64,
    /// `(name, km)` for paved, unpaved, track, alley, private.
    pub categories: Vec<(&'static str, f64)>,
    pub tracktype:  Histogram,
}

impl NetworkStats {
    pub fn compute(graph: &StreetGraph) -> Self {
        Self {
            nodes:      graph.node_count(),
            edges:      graph.edge_count(),
            total_km:   length_km(graph, &TOTAL),
            categories: category_lengths(graph, &[PAVED, UNPAVED, TRACK, ALLEY, PRIVATE]),
            tracktype:  tracktype_histogram(graph),
        }
    }

    pub fn category_km(&self, name: &str) -> Option<f64> {
        self.categories.iter().find(|(n, _)| *n == name).map(|(_, km)| *km)
    }
}

impl fmt::Display for NetworkStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "-".repeat(40);
        writeln!(f, "{}", "=".repeat(60))?;
        writeln!(f, "NETWORK STATISTICS")?;
        writeln!(f, "{}", "=".repeat(60))?;
        writeln!(f, "Total nodes:  {}", self.nodes)?;
        writeln!(f, "Total edges:  {}", self.edges)?;
        writeln!(f, "Total length: {:.2} km", self.total_km)?;
        writeln!(f)?;
        writeln!(f, "Road type lengths (km):")?;
        writeln!(f, "{rule}")?;
        writeln!(f, "  {:<25} {:>12}", "Category", "Length (km)")?;
        writeln!(f, "{rule}")?;
        for (name, km) in &self.categories {
            writeln!(f, "  {name:<25} {km:>12.2}")?;
        }
        writeln!(f, "{rule}")?;
        writeln!(f)?;
        writeln!(f, "Tracktype histogram (highway=track edges):")?;
        writeln!(f, "{rule}")?;
        writeln!(f, "  {:<15} {:>10}", "Tracktype", "Count")?;
        writeln!(f, "{rule}")?;
        for (bucket, count) in &self.tracktype.buckets {
            writeln!(f, "  {bucket:<15} {count:>10}")?;
        }
        writeln!(f, "  {:<15} {:>10}", "unknown", self.tracktype.unknown)?;
        writeln!(f, "{rule}")
    }
}
