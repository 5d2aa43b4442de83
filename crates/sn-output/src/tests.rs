//! Unit tests for sn-output.

#[cfg(test)]
mod helpers {
    use sn_core::{AgentId, GeoPoint, NodeIdx, OsmNodeId};
    use sn_graph::{EdgeAttrs, StreetGraph, StreetGraphBuilder, WeightAttr};
    use sn_sim::{Agent, FleetStats, RouteRecord, SimOutcome};

    /// 10 → 20 → 30 in a line.
    pub fn line() -> StreetGraph {
        let mut b = StreetGraphBuilder::new();
        for (i, id) in [10, 20, 30].into_iter().enumerate() {
            b.add_node(OsmNodeId(id), GeoPoint::new(49.0, -122.0 + i as f64 * 0.01));
        }
        b.add_edge(OsmNodeId(10), OsmNodeId(20), 0, EdgeAttrs::default().with_length(1000.0))
            .unwrap();
        b.add_edge(OsmNodeId(20), OsmNodeId(30), 0, EdgeAttrs::default().with_length(234.56))
            .unwrap();
        b.build()
    }

    /// Two agents at node 10; the second drives two routes.
    pub fn outcome(graph: &StreetGraph) -> SimOutcome {
        let n = |id| graph.node_idx(OsmNodeId(id)).unwrap();
        let agents: Vec<Agent> = (0..2)
            .map(|i| Agent { id: AgentId(i), home: n(10), hub: Some(0) })
            .collect();
        let route = |id, agent, path: Vec<NodeIdx>, length_km, travel_min| RouteRecord {
            id,
            agent: AgentId(agent),
            origin: path[0],
            destination: *path.last().unwrap(),
            path,
            length_km,
            travel_min,
        };
        let routes = vec![
            route(1, 0, vec![n(10), n(20), n(30)], 1.23456, 2.345678),
            route(2, 1, vec![n(10)], 0.0, 0.0),
            route(3, 1, vec![n(10), n(20)], 1.0, 1.5),
        ];
        let stats = FleetStats::from_routes(&routes);
        SimOutcome {
            weight: WeightAttr::Length,
            hubs: Vec::new(),
            agents,
            targets: Vec::new(),
            routes,
            skipped: 0,
            stats,
        }
    }

    pub fn empty_outcome() -> SimOutcome {
        SimOutcome {
            weight:  WeightAttr::Length,
            hubs:    Vec::new(),
            agents:  Vec::new(),
            targets: Vec::new(),
            routes:  Vec::new(),
            skipped: 3,
            stats:   FleetStats::from_routes(&[]),
        }
    }
}

// ── Rows ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod rows {
    use super::helpers::{empty_outcome, line, outcome};
    use crate::{fleet_rows, path_rows, round_to, route_rows};

    #[test]
    fn rounding() {
        assert_eq!(round_to(1.23456, 3), 1.235);
        assert_eq!(round_to(2.345678, 2), 2.35);
        assert_eq!(round_to(0.0, 2), 0.0);
    }

    #[test]
    fn route_rows_use_external_ids_and_labels() {
        let g = line();
        let rows = route_rows(&g, &outcome(&g));
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].route_id, 1);
        assert_eq!(rows[0].nurse_id, "nurse_1");
        assert_eq!(rows[0].origin, 10);
        assert_eq!(rows[0].destination, 30);
        assert_eq!(rows[0].nodes_in_path, 3);
        assert_eq!(rows[0].length_km, 1.235);
        assert_eq!(rows[0].travel_min, 2.35);
        assert_eq!(rows[1].nurse_id, "nurse_2");
        assert_eq!(rows[1].nodes_in_path, 1);
    }

    #[test]
    fn path_rows_follow_each_route() {
        let g = line();
        let rows = path_rows(&g, &outcome(&g));
        assert_eq!(rows.len(), 3 + 1 + 2);
        let first: Vec<(usize, i64)> = rows.iter().take(3).map(|r| (r.seq, r.node_id)).collect();
        assert_eq!(first, vec![(0, 10), (1, 20), (2, 30)]);
        assert_eq!(rows[2].lon, -122.0 + 2.0 * 0.01);
        assert!(rows[3..].iter().all(|r| r.nurse_id == "nurse_2"));
    }

    #[test]
    fn fleet_rows_absent_when_no_routes() {
        let rows = fleet_rows(&empty_outcome().stats);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].metric, "length_km");
        assert_eq!(rows[1].metric, "travel_min");
        assert!(rows.iter().all(|r| r.routes == 0 && r.min.is_none() && r.p75.is_none()));
    }

    #[test]
    fn fleet_rows_carry_summary() {
        let g = line();
        let rows = fleet_rows(&outcome(&g).stats);
        assert_eq!(rows[0].routes, 3);
        assert_eq!(rows[0].min, Some(0.0));
        assert_eq!(rows[0].median, Some(1.0));
        let p75 = rows[1].p75.unwrap();
        assert!((p75 - 1.922839).abs() < 1e-9);
    }
}

// ── CSV backend ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod csv_tests {
    use tempfile::TempDir;

    use super::helpers::{empty_outcome, line, outcome};
    use crate::csv::{CsvRouteWriter, FLEET_STATS_FILE, PATHS_FILE, ROUTES_FILE};
    use crate::writer::RouteWriter;
    use crate::write_outcome;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn read(path: std::path::PathBuf) -> (Vec<String>, Vec<csv::StringRecord>) {
        let mut rdr = csv::Reader::from_path(path).unwrap();
        let headers = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        let rows = rdr.records().map(|r| r.unwrap()).collect();
        (headers, rows)
    }

    #[test]
    fn files_created_in_new_dir() {
        let dir = tmp();
        let out = dir.path().join("nested/out");
        let _w = CsvRouteWriter::new(&out).unwrap();
        assert!(out.join(ROUTES_FILE).exists());
        assert!(out.join(PATHS_FILE).exists());
        assert!(out.join(FLEET_STATS_FILE).exists());
    }

    #[test]
    fn headers_correct() {
        let dir = tmp();
        let mut w = CsvRouteWriter::new(dir.path()).unwrap();
        w.finish().unwrap();

        let (routes, _) = read(dir.path().join(ROUTES_FILE));
        assert_eq!(
            routes,
            ["route_id", "nurse_id", "origin", "destination", "nodes_in_path", "length_km", "travel_min"]
        );
        let (paths, _) = read(dir.path().join(PATHS_FILE));
        assert_eq!(paths, ["route_id", "nurse_id", "seq", "node_id", "lat", "lon"]);
        let (fleet, _) = read(dir.path().join(FLEET_STATS_FILE));
        assert_eq!(fleet, ["metric", "routes", "min", "p25", "median", "mean", "p75"]);
    }

    #[test]
    fn outcome_written() {
        let dir = tmp();
        let g = line();
        let mut w = CsvRouteWriter::new(dir.path()).unwrap();
        assert_eq!(write_outcome(&mut w, &g, &outcome(&g)).unwrap(), 3);

        let (_, routes) = read(dir.path().join(ROUTES_FILE));
        assert_eq!(routes.len(), 3);
        assert_eq!(&routes[0][0], "1");
        assert_eq!(&routes[0][1], "nurse_1");
        assert_eq!(&routes[0][2], "10");
        assert_eq!(&routes[0][3], "30");
        assert_eq!(&routes[0][4], "3");
        assert_eq!(&routes[0][5], "1.235");
        assert_eq!(&routes[0][6], "2.35");

        let (_, paths) = read(dir.path().join(PATHS_FILE));
        assert_eq!(paths.len(), 6);
        assert_eq!(&paths[5][3], "20");

        let (_, fleet) = read(dir.path().join(FLEET_STATS_FILE));
        assert_eq!(&fleet[0][0], "length_km");
        assert_eq!(&fleet[0][1], "3");
        assert_eq!(&fleet[0][2], "0");
    }

    #[test]
    fn empty_statistics_are_blank_cells() {
        let dir = tmp();
        let mut w = CsvRouteWriter::new(dir.path()).unwrap();
        write_outcome(&mut w, &line(), &empty_outcome()).unwrap();

        let (_, fleet) = read(dir.path().join(FLEET_STATS_FILE));
        assert_eq!(fleet.len(), 2);
        assert_eq!(&fleet[1][0], "travel_min");
        assert_eq!(&fleet[1][1], "0");
        assert!((2..7).all(|i| fleet[1][i].is_empty()));
    }

    #[test]
    fn finish_idempotent() {
        let dir = tmp();
        let mut w = CsvRouteWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
    }
}
