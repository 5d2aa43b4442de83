//! `sn-output` — tabular writers for simulation runs.
//!
//! | File              | Row            | One row per                  |
//! |-------------------|----------------|------------------------------|
//! | `routes.csv`      | [`RouteRow`]   | realized route               |
//! | `route_paths.csv` | [`PathRow`]    | node along a route's path    |
//! | `fleet_stats.csv` | [`FleetStatRow`] | route metric (`length_km`, `travel_min`) |
//!
//! Backends implement [`RouteWriter`]; [`write_outcome`] feeds one
//! [`sn_sim::SimOutcome`] through a writer.
//!
//! # Usage
//!
//! ```rust,ignore
//! use sn_output::{write_outcome, CsvRouteWriter};
//!
//! let mut writer = CsvRouteWriter::new(Path::new("./output"))?;
//! write_outcome(&mut writer, &graph, &outcome)?;
//! ```

pub mod csv;
pub mod error;
pub mod export;
pub mod row;
pub mod writer;

#[cfg(test)]
mod tests;

pub use csv::CsvRouteWriter;
pub use error::{OutputError, OutputResult};
pub use export::write_outcome;
pub use row::{fleet_rows, path_rows, round_to, route_rows, FleetStatRow, PathRow, RouteRow};
pub use writer::RouteWriter;
