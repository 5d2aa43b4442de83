//! Unit tests for sn-compose.

#[cfg(test)]
mod helpers {
    use sn_core::{GeoPoint, OsmNodeId};
    use sn_graph::{EdgeAttrs, StreetGraph, StreetGraphBuilder};

    use crate::Snapshot;

    /// Graph from `(id, lat, lon)` nodes and `(u, v, slot, length_m)` edges.
    pub fn graph(nodes: &[(i64, f64, f64)], edges: &[(i64, i64, u32, f64)]) -> StreetGraph {
        let mut b = StreetGraphBuilder::new();
        for &(id, lat, lon) in nodes {
            b.add_node(OsmNodeId(id), GeoPoint::new(lat, lon));
        }
        for &(u, v, slot, len) in edges {
            b.add_edge(OsmNodeId(u), OsmNodeId(v), slot, EdgeAttrs::default().with_length(len))
                .unwrap();
        }
        b.build()
    }

    pub fn snap(name: &str, g: StreetGraph) -> Snapshot {
        Snapshot::new(name, g)
    }
}

// ── Composition ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod compose {
    use chrono::{TimeZone, Utc};
    use sn_core::OsmNodeId;
    use sn_graph::{EdgeAttrs, EdgeKey, StreetGraphBuilder};

    use super::helpers::{graph, snap};
    use crate::{compose, compose_at, ComposeError};

    #[test]
    fn disjoint_counts_add() {
        let a = graph(&[(1, 0.0, 0.0), (2, 0.0, 0.01)], &[(1, 2, 0, 100.0)]);
        let b = graph(
            &[(10, 1.0, 0.0), (11, 1.0, 0.01), (12, 1.0, 0.02)],
            &[(10, 11, 0, 50.0), (11, 12, 0, 60.0)],
        );
        let m = compose(&[snap("a.json", a), snap("b.json", b)]).unwrap();
        assert_eq!(m.graph.node_count(), 5);
        assert_eq!(m.graph.edge_count(), 3);
    }

    #[test]
    fn shared_node_same_slot_later_wins() {
        let a = graph(&[(1, 0.0, 0.0), (2, 0.0, 0.01)], &[(1, 2, 0, 100.0)]);
        let b = graph(&[(2, 0.0, 0.01), (3, 0.0, 0.02)], &[(2, 3, 0, 80.0)]);
        // Same (1, 2, 0) key as `a`, different length.
        let c = graph(&[(1, 0.0, 0.0), (2, 0.0, 0.01)], &[(1, 2, 0, 120.0)]);

        let m = compose(&[snap("a", a), snap("b", b), snap("c", c)]).unwrap();
        assert_eq!(m.graph.node_count(), 3);
        assert_eq!(m.graph.edge_count(), 2);
        let e = m.graph.find_edge(EdgeKey::new(1, 2, 0)).unwrap();
        assert_eq!(m.graph.edge_attrs[e.index()].length_m(), Some(120.0));
    }

    #[test]
    fn shared_node_counts() {
        let a = graph(&[(1, 0.0, 0.0), (2, 0.0, 0.01)], &[(1, 2, 0, 100.0)]);
        let b = graph(&[(2, 0.0, 0.01), (3, 0.0, 0.02)], &[(2, 3, 0, 80.0)]);
        let m = compose(&[snap("a", a), snap("b", b)]).unwrap();
        assert_eq!(m.graph.node_count(), 2 + 2 - 1);
        assert_eq!(m.graph.edge_count(), 2);
    }

    #[test]
    fn replacement_is_wholesale() {
        let mut b1 = StreetGraphBuilder::new();
        let mut b2 = StreetGraphBuilder::new();
        for b in [&mut b1, &mut b2] {
            b.add_node(OsmNodeId(1), sn_core::GeoPoint::new(0.0, 0.0));
            b.add_node(OsmNodeId(2), sn_core::GeoPoint::new(0.0, 0.01));
        }
        b1.add_edge(
            OsmNodeId(1),
            OsmNodeId(2),
            0,
            EdgeAttrs::default().with_length(10.0).with_tag("surface", "asphalt"),
        )
        .unwrap();
        b2.add_edge(OsmNodeId(1), OsmNodeId(2), 0, EdgeAttrs::default().with_speed(50.0)).unwrap();

        let m = compose(&[snap("old", b1.build()), snap("new", b2.build())]).unwrap();
        let bag = &m.graph.edge_attrs[0];
        assert_eq!(bag.speed_kph(), Some(50.0));
        assert_eq!(bag.length_m(), None);
        assert_eq!(bag.surface, None);
    }

    #[test]
    fn distinct_slots_stay_parallel() {
        let a = graph(&[(1, 0.0, 0.0), (2, 0.0, 0.01)], &[(1, 2, 0, 100.0)]);
        let b = graph(&[(1, 0.0, 0.0), (2, 0.0, 0.01)], &[(1, 2, 1, 140.0)]);
        let m = compose(&[snap("a", a), snap("b", b)]).unwrap();
        assert_eq!(m.graph.edge_count(), 2);
        assert!(m.graph.find_edge(EdgeKey::new(1, 2, 0)).is_some());
        assert!(m.graph.find_edge(EdgeKey::new(1, 2, 1)).is_some());
    }

    #[test]
    fn later_position_wins() {
        let a = graph(&[(1, 49.0, -122.0)], &[]);
        let b = graph(&[(1, 49.5, -122.5)], &[]);
        let m = compose(&[snap("a", a), snap("b", b)]).unwrap();
        let n = m.graph.node_idx(OsmNodeId(1)).unwrap();
        assert_eq!(m.graph.node_pos(n).lat, 49.5);
    }

    #[test]
    fn provenance_recorded_and_mirrored() {
        let at = Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap();
        let mut a = graph(&[(1, 0.0, 0.0)], &[]);
        a.meta.source_place = Some("Langley, British Columbia, Canada".into());
        let mut b = graph(&[(2, 0.0, 0.0)], &[]);
        b.meta.source_place = Some("Surrey, British Columbia, Canada".into());

        let m = compose_at(&[snap("Langley_BC__20240301.json", a), snap("Surrey_BC__20240302.json", b)], at)
            .unwrap();
        assert_eq!(m.provenance.sources, vec!["Langley_BC__20240301.json", "Surrey_BC__20240302.json"]);
        assert_eq!(m.provenance.merged_at, at);
        assert_eq!(m.graph.meta.source_files, m.provenance.sources);
        assert_eq!(m.graph.meta.merged_at, Some(at));
        assert_eq!(m.graph.meta.source_place.as_deref(), Some("Surrey, British Columbia, Canada"));
    }

    #[test]
    fn empty_input_is_an_error() {
        let err = compose(&[]).unwrap_err();
        assert!(matches!(err, ComposeError::EmptyInputSet(None)));
        assert_eq!(err.to_string(), "no snapshots to merge");
    }

    #[test]
    fn zero_node_snapshots_merge() {
        let m = compose(&[snap("empty", graph(&[], &[]))]).unwrap();
        assert!(m.graph.is_empty());
    }
}

// ── Discovery / loading / merge_directory ─────────────────────────────────────

#[cfg(test)]
mod directory {
    use std::fs;

    use sn_graph::{read_graph, write_graph};

    use super::helpers::graph;
    use crate::{discover_snapshots, load_snapshot, merge_directory, ComposeError};

    #[test]
    fn discovery_is_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b__20240102.json", "a__20240101.json", "notes.txt"] {
            fs::write(dir.path().join(name), "{}").unwrap();
        }
        fs::create_dir(dir.path().join("nested.json")).unwrap();

        let files = discover_snapshots(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a__20240101.json", "b__20240102.json"]);
    }

    #[test]
    fn empty_directory_is_distinct_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = discover_snapshots(dir.path()).unwrap_err();
        assert!(matches!(err, ComposeError::EmptyInputSet(Some(_))));
        assert!(err.to_string().starts_with("no snapshots to merge in "));
    }

    #[test]
    fn missing_directory_is_empty_input() {
        let dir = tempfile::tempdir().unwrap();
        let err = discover_snapshots(&dir.path().join("absent")).unwrap_err();
        assert!(matches!(err, ComposeError::EmptyInputSet(Some(_))));
    }

    #[test]
    fn malformed_snapshot_names_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ \"nodes\": [ { \"id\": ").unwrap();
        match load_snapshot(&path).unwrap_err() {
            ComposeError::MalformedSnapshot { path: p, .. } => assert_eq!(p, path),
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn malformed_snapshot_aborts_merge_without_output() {
        let dir = tempfile::tempdir().unwrap();
        write_graph(&graph(&[(1, 0.0, 0.0)], &[]), &dir.path().join("a.json")).unwrap();
        fs::write(dir.path().join("b.json"), "not a graph").unwrap();
        let out = dir.path().join("out").join("master.json");

        let err = merge_directory(dir.path(), &out).unwrap_err();
        assert!(matches!(err, ComposeError::MalformedSnapshot { .. }));
        assert!(!out.exists());
    }

    #[test]
    fn merge_directory_writes_master() {
        let dir = tempfile::tempdir().unwrap();
        let a = graph(&[(1, 0.0, 0.0), (2, 0.0, 0.01)], &[(1, 2, 0, 100.0)]);
        let b = graph(&[(2, 0.0, 0.01), (3, 0.0, 0.02)], &[(2, 3, 0, 80.0)]);
        write_graph(&a, &dir.path().join("a__20240101.json")).unwrap();
        write_graph(&b, &dir.path().join("b__20240101.json")).unwrap();
        let out_dir = tempfile::tempdir().unwrap();
        let out = out_dir.path().join("master.json");

        let master = merge_directory(dir.path(), &out).unwrap();
        assert_eq!(master.provenance.sources, vec!["a__20240101.json", "b__20240101.json"]);

        let back = read_graph(&out).unwrap();
        assert_eq!(back.node_count(), 3);
        assert_eq!(back.edge_count(), 2);
        assert_eq!(back.meta.source_files, master.provenance.sources);
    }
}

// ── Fetch boundary ────────────────────────────────────────────────────────────

#[cfg(test)]
mod fetch {
    use std::time::Duration;

    use chrono::{NaiveDate, TimeZone, Utc};
    use sn_graph::{read_graph, write_graph, StreetGraph};

    use super::helpers::graph;
    use crate::fetch::{retain_tags, stamp_snapshot, CUSTOM_FILTER, DATE_FETCHED_TAG};
    use crate::{
        acquire_snapshot, fetch_with_retry, sanitize_place_name, snapshot_file_name, ComposeError,
        FetchConfig, FetchRequest, FileFetcher, RetryPolicy, SnapshotFetcher,
    };

    /// Fails `failures` times, then returns a one-edge graph.
    struct Flaky {
        failures: u32,
        calls:    u32,
    }

    impl SnapshotFetcher for Flaky {
        type Error = String;

        fn fetch(&mut self, _: &FetchRequest) -> Result<StreetGraph, String> {
            self.calls += 1;
            if self.calls <= self.failures {
                Err(format!("gateway timeout #{}", self.calls))
            } else {
                Ok(graph(&[(1, 0.0, 0.0), (2, 0.0, 0.01)], &[(1, 2, 0, 100.0)]))
            }
        }
    }

    fn request() -> FetchRequest {
        FetchRequest::new("Langley, British Columbia, Canada", &FetchConfig::default())
    }

    #[test]
    fn slugs() {
        assert_eq!(sanitize_place_name("Langley, British Columbia, Canada"), "Langley_BC");
        assert_eq!(sanitize_place_name("Langley, British Columbia"), "Langley_BC");
        assert_eq!(sanitize_place_name("Surrey, BC, Canada"), "Surrey_BC");
        assert_eq!(sanitize_place_name("Hope, british columbia"), "Hope_BC");
        assert_eq!(sanitize_place_name("Red Deer, Alberta"), "Red_Deer_AL");
        assert_eq!(sanitize_place_name("Port Coquitlam"), "Port_Coquitlam");
        assert_eq!(sanitize_place_name("St. John's, Newfoundland and Labrador"), "St_Johns_NAL");
    }

    #[test]
    fn file_name() {
        let d = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert_eq!(
            snapshot_file_name("Langley, British Columbia, Canada", d),
            "Langley_BC__20240315.json"
        );
    }

    #[test]
    fn request_carries_tags_explicitly() {
        let config = FetchConfig {
            extra_useful_tags: vec!["smoothness:date".into(), "highway".into()],
            ..FetchConfig::default()
        };
        let req = FetchRequest::new("Hope, BC", &config);
        assert_eq!(req.filter, CUSTOM_FILTER);
        assert!(req.useful_tags.iter().any(|t| t == "smoothness:date"));
        assert_eq!(req.useful_tags.iter().filter(|t| *t == "highway").count(), 1);
        assert_eq!(req.timeout_s, 180);
    }

    #[test]
    fn retry_then_success() {
        let mut fetcher = Flaky { failures: 2, calls: 0 };
        let mut slept = Vec::new();
        let policy = RetryPolicy { attempts: 3, sleep_seconds: 60 };
        let g = fetch_with_retry(&mut fetcher, &request(), &policy, |d| slept.push(d)).unwrap();
        assert_eq!(g.edge_count(), 1);
        assert_eq!(fetcher.calls, 3);
        assert_eq!(slept, vec![Duration::from_secs(60); 2]);
    }

    #[test]
    fn exhausted_retries_surface_last_error() {
        let mut fetcher = Flaky { failures: 10, calls: 0 };
        let mut sleeps = 0;
        let err = fetch_with_retry(&mut fetcher, &request(), &RetryPolicy::default(), |_| sleeps += 1)
            .unwrap_err();
        match err {
            ComposeError::AcquisitionFailure { place, attempts, last_error } => {
                assert_eq!(place, "Langley, British Columbia, Canada");
                assert_eq!(attempts, 3);
                assert_eq!(last_error, "gateway timeout #3");
            }
            other => panic!("unexpected error {other}"),
        }
        assert_eq!(sleeps, 2, "no sleep after the final attempt");
    }

    #[test]
    fn stamping_marks_graph_and_edges() {
        let mut g = graph(&[(1, 0.0, 0.0), (2, 0.0, 0.01)], &[(1, 2, 0, 100.0), (2, 1, 0, 100.0)]);
        let at = Utc.with_ymd_and_hms(2024, 3, 15, 8, 30, 0).unwrap();
        stamp_snapshot(&mut g, &request(), at);

        assert_eq!(g.meta.source_place.as_deref(), Some("Langley, British Columbia, Canada"));
        assert_eq!(g.meta.fetched_at, Some(at));
        assert_eq!(g.meta.filter.as_deref(), Some(CUSTOM_FILTER));
        assert!(g.meta.tool_version.is_some());
        for attrs in &g.edge_attrs {
            assert_eq!(attrs.tag(DATE_FETCHED_TAG), Some("2024-03-15"));
        }
    }

    #[test]
    fn acquire_writes_named_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let mut fetcher = Flaky { failures: 1, calls: 0 };
        let policy = RetryPolicy { attempts: 2, sleep_seconds: 0 };
        let at = Utc.with_ymd_and_hms(2024, 3, 15, 8, 30, 0).unwrap();

        let path = acquire_snapshot(&mut fetcher, &request(), &policy, dir.path(), at).unwrap();
        assert_eq!(path.file_name().unwrap(), "Langley_BC__20240315.json");
        let back = read_graph(&path).unwrap();
        assert_eq!(back.meta.fetched_at, Some(at));
        assert_eq!(back.edge_attrs[0].tag(DATE_FETCHED_TAG), Some("2024-03-15"));
    }

    #[test]
    fn file_fetcher_keeps_useful_tags_only() {
        let dir = tempfile::tempdir().unwrap();
        let raw = dir.path().join("raw.json");
        let mut g = graph(&[(1, 0.0, 0.0), (2, 0.0, 0.01)], &[(1, 2, 0, 100.0)]);
        g.edge_attrs[0].set_tag("name", "Fraser Hwy");
        g.edge_attrs[0].set_tag("osm_internal", "x");
        write_graph(&g, &raw).unwrap();

        let mut fetcher = FileFetcher { path: raw };
        let fetched = fetcher.fetch(&request()).unwrap();
        let attrs = &fetched.edge_attrs[0];
        assert_eq!(attrs.tag("name"), Some("Fraser Hwy"));
        assert_eq!(attrs.tag("osm_internal"), None);
        assert_eq!(attrs.length_m(), Some(100.0));
    }

    #[test]
    fn retain_tags_leaves_typed_fields() {
        let mut g = graph(&[(1, 0.0, 0.0), (2, 0.0, 0.01)], &[(1, 2, 0, 100.0)]);
        g.edge_attrs[0].set_tag("surface", "gravel");
        g.edge_attrs[0].set_tag("lit", "yes");
        retain_tags(&mut g, &[]);
        assert_eq!(g.edge_attrs[0].surface.as_deref(), Some("gravel"));
        assert!(g.edge_attrs[0].extra.is_empty());
    }
}

// ── Configuration ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod config {
    use std::fs;
    use std::path::PathBuf;

    use crate::{ComposeError, FetchConfig, RetryPolicy};

    #[test]
    fn defaults() {
        let c = FetchConfig::default();
        assert_eq!(c.overpass_timeout, 180);
        assert_eq!(c.overpass_memory, 1_073_741_824);
        assert_eq!(c.overpass_endpoint, None);
        assert_eq!(c.data_root, PathBuf::from("./data"));
        assert!(c.extra_useful_tags.is_empty());
        assert_eq!(c.retry, RetryPolicy { attempts: 3, sleep_seconds: 60 });
        assert_eq!(FetchConfig::load(None).unwrap(), c);
    }

    #[test]
    fn toml_partial_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "overpass_timeout = 300\nextra_useful_tags = [\"crossing\"]\n\n[retry]\nattempts = 5\n",
        )
        .unwrap();
        let c = FetchConfig::load(Some(&path)).unwrap();
        assert_eq!(c.overpass_timeout, 300);
        assert_eq!(c.overpass_memory, 1_073_741_824);
        assert_eq!(c.extra_useful_tags, vec!["crossing"]);
        assert_eq!(c.retry.attempts, 5);
        assert_eq!(c.retry.sleep_seconds, 60);
    }

    #[test]
    fn json_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{ "overpass_endpoint": "https://overpass.example/api", "data_root": "/srv/osm" }"#,
        )
        .unwrap();
        let c = FetchConfig::try_from(path.as_path()).unwrap();
        assert_eq!(c.overpass_endpoint.as_deref(), Some("https://overpass.example/api"));
        assert_eq!(c.data_root, PathBuf::from("/srv/osm"));
    }

    #[test]
    fn unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "x: 1").unwrap();
        assert!(matches!(FetchConfig::load(Some(&path)), Err(ComposeError::Config(_))));
    }

    #[test]
    fn bad_toml_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "overpass_timeout = \"soon\"").unwrap();
        assert!(matches!(FetchConfig::load(Some(&path)), Err(ComposeError::Config(_))));
    }
}
