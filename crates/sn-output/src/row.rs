//! Plain data row types written by output backends, and their construction
//! from a finished run.

use sn_graph::StreetGraph;
use sn_sim::{FleetStats, RouteRecord, SimOutcome, Summary};

/// One realized route.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteRow {
    pub route_id:      u32,
    /// `nurse_<n>`, 1-based.
    pub nurse_id:      String,
    /// External node id of the origin.
    pub origin:        i64,
    pub destination:   i64,
    pub nodes_in_path: usize,
    /// Rounded to 3 decimals.
    pub length_km:     f64,
    /// Rounded to 2 decimals.
    pub travel_min:    f64,
}

/// One node of one route's path, for an external map renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct PathRow {
    pub route_id: u32,
    pub nurse_id: String,
    /// Position along the path, starting at 0.
    pub seq:      usize,
    pub node_id:  i64,
    pub lat:      f64,
    pub lon:      f64,
}

/// Distribution of one route metric; `None` cells are written empty.
#[derive(Debug, Clone, PartialEq)]
pub struct FleetStatRow {
    pub metric: &'static str,
    pub routes: usize,
    pub min:    Option<f64>,
    pub p25:    Option<f64>,
    pub median: Option<f64>,
    pub mean:   Option<f64>,
    pub p75:    Option<f64>,
}

impl FleetStatRow {
    fn new(metric: &'static str, routes: usize, summary: Option<Summary>) -> Self {
        Self {
            metric,
            routes,
            min:    summary.map(|s| s.min),
            p25:    summary.map(|s| s.p25),
            median: summary.map(|s| s.median),
            mean:   summary.map(|s| s.mean),
            p75:    summary.map(|s| s.p75),
        }
    }
}

/// Round half away from zero to `places` decimals.
pub fn round_to(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (value * scale).round() / scale
}

fn nurse_label(outcome: &SimOutcome, route: &RouteRecord) -> String {
    outcome.agents[route.agent.index()].label()
}

/// One row per route, in route id order.
pub fn route_rows(graph: &StreetGraph, outcome: &SimOutcome) -> Vec<RouteRow> {
    outcome
        .routes
        .iter()
        .map(|r| RouteRow {
            route_id:      r.id,
            nurse_id:      nurse_label(outcome, r),
            origin:        graph.node_id(r.origin).0,
            destination:   graph.node_id(r.destination).0,
            nodes_in_path: r.path.len(),
            length_km:     round_to(r.length_km, 3),
            travel_min:    round_to(r.travel_min, 2),
        })
        .collect()
}

/// One row per path node of every route.
pub fn path_rows(graph: &StreetGraph, outcome: &SimOutcome) -> Vec<PathRow> {
    let mut rows = Vec::with_capacity(outcome.routes.iter().map(|r| r.path.len()).sum());
    for r in &outcome.routes {
        let nurse = nurse_label(outcome, r);
        for (seq, &node) in r.path.iter().enumerate() {
            let pos = graph.node_pos(node);
            rows.push(PathRow {
                route_id: r.id,
                nurse_id: nurse.clone(),
                seq,
                node_id:  graph.node_id(node).0,
                lat:      pos.lat,
                lon:      pos.lon,
            });
        }
    }
    rows
}

/// `length_km` and `travel_min` rows.
pub fn fleet_rows(stats: &FleetStats) -> Vec<FleetStatRow> {
    vec![
        FleetStatRow::new("length_km", stats.routes, stats.length_km),
        FleetStatRow::new("travel_min", stats.routes, stats.travel_min),
    ]
}
