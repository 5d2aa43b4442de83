//! Command-line arguments.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

/// Street-network snapshot, merge, statistics and route simulation tool.
#[derive(Parser, Debug)]
#[command(name = "streetnet", author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path of a JSON or TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Acquire a snapshot for a place from a local graph document
    Import(ImportArgs),
    /// Merge every snapshot in a directory into one master graph
    Merge {
        /// Directory holding the snapshot files
        #[arg(long)]
        folder: PathBuf,
        /// Path of the merged graph
        #[arg(long)]
        output: PathBuf,
    },
    /// Print network statistics for a graph file
    Stats {
        /// Path of the graph file
        filepath: PathBuf,
    },
    /// Impute speeds and recompute edge travel times
    Retime {
        #[arg(long)]
        input:  PathBuf,
        #[arg(long)]
        output: PathBuf,
    },
    /// Simulate nurse routes over a merged graph
    Simulate(SimulateArgs),
}

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Place name, e.g. "Langley, British Columbia, Canada"
    pub place: String,
    /// Graph document to import
    #[arg(long)]
    pub source: PathBuf,
    /// Directory to save the snapshot in [default: <data_root>/raw]
    #[arg(long)]
    pub output_dir: Option<PathBuf>,
    /// Fetch date stamped on the snapshot (YYYY-MM-DD) [default: today]
    #[arg(long)]
    pub date: Option<NaiveDate>,
    /// Number of attempts on failure
    #[arg(long)]
    pub retry: Option<u32>,
    /// Seconds to wait between attempts
    #[arg(long)]
    pub sleep_seconds: Option<u64>,
}

#[derive(Args, Debug)]
pub struct SimulateArgs {
    /// Path of the merged graph
    #[arg(long)]
    pub graph: PathBuf,
    /// Number of nurses
    #[arg(long, default_value_t = 2)]
    pub nurses: usize,
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
    /// Place nurses at this many hubs; without it every nurse gets its own
    /// random home
    #[arg(long)]
    pub hubs: Option<usize>,
    /// Total targets in hub mode [default: nurses × routes-per]
    #[arg(long)]
    pub targets: Option<usize>,
    /// Cluster targets within this many metres of their hub
    #[arg(long)]
    pub cluster_radius: Option<f64>,
    /// Routes per nurse when no hubs are given
    #[arg(long, default_value_t = 5)]
    pub routes_per: usize,
    /// Directory for the route CSV files
    #[arg(long, default_value = "./data/routes")]
    pub output_dir: PathBuf,
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use super::{Cli, Command};

    #[test]
    fn command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn simulate_defaults() {
        let cli = Cli::parse_from(["streetnet", "simulate", "--graph", "g.json"]);
        let Command::Simulate(a) = cli.command else { panic!("expected simulate") };
        assert_eq!(a.nurses, 2);
        assert_eq!(a.seed, 42);
        assert_eq!(a.routes_per, 5);
        assert!(a.hubs.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from(["streetnet", "stats", "g.json", "-v", "--config", "c.toml"]);
        assert!(cli.verbose);
        assert_eq!(cli.config.as_deref(), Some(std::path::Path::new("c.toml")));
    }

    #[test]
    fn import_date_parses() {
        let cli = Cli::parse_from([
            "streetnet", "import", "Langley, British Columbia, Canada",
            "--source", "raw.json", "--date", "2024-12-01",
        ]);
        let Command::Import(a) = cli.command else { panic!("expected import") };
        assert_eq!(a.date, chrono::NaiveDate::from_ymd_opt(2024, 12, 1));
    }
}
