//! The `RouteWriter` trait implemented by output backends.

use crate::{FleetStatRow, OutputResult, PathRow, RouteRow};

/// Sink for the tables of one simulation run.
pub trait RouteWriter {
    /// Write a batch of route rows.
    fn write_routes(&mut self, rows: &[RouteRow]) -> OutputResult<()>;

    /// Write a batch of path-node rows.
    fn write_paths(&mut self, rows: &[PathRow]) -> OutputResult<()>;

    /// Write the fleet statistics rows.
    fn write_fleet_stats(&mut self, rows: &[FleetStatRow]) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent; safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
