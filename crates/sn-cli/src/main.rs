//! `streetnet` — snapshot import, merge, statistics, retiming and route
//! simulation for street networks.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use log::LevelFilter;

use sn_compose::FetchConfig;

use crate::cli::{Cli, Command};

fn main() -> Result<()> {
    let args = Cli::parse();

    // RUST_LOG still overrides the default level.
    let level = if args.verbose { LevelFilter::Debug } else { LevelFilter::Info };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let config = FetchConfig::load(args.config.as_deref())?;

    match args.command {
        Command::Import(a) => commands::import(&config, a),
        Command::Merge { folder, output } => commands::merge(&folder, &output),
        Command::Stats { filepath } => commands::stats(&filepath),
        Command::Retime { input, output } => commands::retime(&input, &output),
        Command::Simulate(a) => commands::simulate(a),
    }
}
