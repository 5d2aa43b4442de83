//! CSV output backend.
//!
//! Creates three files in the configured output directory:
//! - `routes.csv`
//! - `route_paths.csv`
//! - `fleet_stats.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::RouteWriter;
use crate::{FleetStatRow, OutputResult, PathRow, RouteRow};

pub const ROUTES_FILE: &str = "routes.csv";
pub const PATHS_FILE: &str = "route_paths.csv";
pub const FLEET_STATS_FILE: &str = "fleet_stats.csv";

fn cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Writes run output to three CSV files.
pub struct CsvRouteWriter {
    routes:   Writer<File>,
    paths:    Writer<File>,
    fleet:    Writer<File>,
    finished: bool,
}

impl CsvRouteWriter {
    /// Create `dir` if needed, open the three CSV files in it and write the
    /// header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;

        let mut routes = Writer::from_path(dir.join(ROUTES_FILE))?;
        routes.write_record([
            "route_id",
            "nurse_id",
            "origin",
            "destination",
            "nodes_in_path",
            "length_km",
            "travel_min",
        ])?;

        let mut paths = Writer::from_path(dir.join(PATHS_FILE))?;
        paths.write_record(["route_id", "nurse_id", "seq", "node_id", "lat", "lon"])?;

        let mut fleet = Writer::from_path(dir.join(FLEET_STATS_FILE))?;
        fleet.write_record(["metric", "routes", "min", "p25", "median", "mean", "p75"])?;

        Ok(Self { routes, paths, fleet, finished: false })
    }
}

impl RouteWriter for CsvRouteWriter {
    fn write_routes(&mut self, rows: &[RouteRow]) -> OutputResult<()> {
        for row in rows {
            self.routes.write_record(&[
                row.route_id.to_string(),
                row.nurse_id.clone(),
                row.origin.to_string(),
                row.destination.to_string(),
                row.nodes_in_path.to_string(),
                row.length_km.to_string(),
                row.travel_min.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_paths(&mut self, rows: &[PathRow]) -> OutputResult<()> {
        for row in rows {
            self.paths.write_record(&[
                row.route_id.to_string(),
                row.nurse_id.clone(),
                row.seq.to_string(),
                row.node_id.to_string(),
                row.lat.to_string(),
                row.lon.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_fleet_stats(&mut self, rows: &[FleetStatRow]) -> OutputResult<()> {
        for row in rows {
            self.fleet.write_record(&[
                row.metric.to_string(),
                row.routes.to_string(),
                cell(row.min),
                cell(row.p25),
                cell(row.median),
                cell(row.mean),
                cell(row.p75),
            ])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.routes.flush()?;
        self.paths.flush()?;
        self.fleet.flush()?;
        Ok(())
    }
}
