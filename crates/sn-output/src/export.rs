//! Drives a [`RouteWriter`] over one finished run.

use log::info;

use sn_graph::StreetGraph;
use sn_sim::SimOutcome;

use crate::row::{fleet_rows, path_rows, route_rows};
use crate::writer::RouteWriter;
use crate::OutputResult;

/// Write every table of `outcome` and finish the writer.
///
/// Returns the number of route rows written.
pub fn write_outcome<W: RouteWriter>(
    writer: &mut W,
    graph: &StreetGraph,
    outcome: &SimOutcome,
) -> OutputResult<usize> {
    let routes = route_rows(graph, outcome);
    writer.write_routes(&routes)?;
    writer.write_paths(&path_rows(graph, outcome))?;
    writer.write_fleet_stats(&fleet_rows(&outcome.stats))?;
    writer.finish()?;
    info!("wrote {} route row(s)", routes.len());
    Ok(routes.len())
}
