//! One function per subcommand.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{NaiveTime, Utc};
use log::info;

use sn_compose::{acquire_snapshot, merge_directory, FetchConfig, FetchRequest, FileFetcher};
use sn_graph::{
    normalize, read_graph, recompute_travel_times, write_graph, DijkstraRouter, NetworkStats,
};
use sn_output::{write_outcome, CsvRouteWriter};
use sn_sim::{FleetStats, RouteSimulator, SimConfig, SimMode, Summary};

use crate::cli::{ImportArgs, SimulateArgs};

pub fn import(config: &FetchConfig, args: ImportArgs) -> Result<()> {
    let mut policy = config.retry.clone();
    if let Some(n) = args.retry {
        policy.attempts = n;
    }
    if let Some(s) = args.sleep_seconds {
        policy.sleep_seconds = s;
    }
    let fetched_at = match args.date {
        Some(day) => day.and_time(NaiveTime::MIN).and_utc(),
        None => Utc::now(),
    };
    let out_dir = args.output_dir.unwrap_or_else(|| config.data_root.join("raw"));
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let request = FetchRequest::new(args.place, config);
    let mut fetcher = FileFetcher { path: args.source };
    let path = acquire_snapshot(&mut fetcher, &request, &policy, &out_dir, fetched_at)?;
    println!("{}", path.display());
    Ok(())
}

pub fn merge(folder: &Path, output: &Path) -> Result<()> {
    let master = merge_directory(folder, output)?;
    println!(
        "merged {} snapshot(s): {} nodes, {} edges -> {}",
        master.provenance.sources.len(),
        master.graph.node_count(),
        master.graph.edge_count(),
        output.display()
    );
    Ok(())
}

pub fn stats(filepath: &Path) -> Result<()> {
    let mut graph = read_graph(filepath)
        .with_context(|| format!("reading {}", filepath.display()))?;
    normalize(&mut graph);
    println!("{}", filepath.display());
    print!("{}", NetworkStats::compute(&graph));
    Ok(())
}

pub fn retime(input: &Path, output: &Path) -> Result<()> {
    let mut graph = read_graph(input).with_context(|| format!("reading {}", input.display()))?;
    let report = recompute_travel_times(&mut graph);
    info!(
        "retimed {} edge(s), {} imputed speed(s), {} left untimed",
        report.timed, report.imputed, report.untimed
    );
    write_graph(&graph, output).with_context(|| format!("writing {}", output.display()))?;
    println!("{} edges timed -> {}", report.timed, output.display());
    Ok(())
}

pub fn simulate(args: SimulateArgs) -> Result<()> {
    let mut graph = read_graph(&args.graph)
        .with_context(|| format!("reading {}", args.graph.display()))?;
    normalize(&mut graph);

    let mode = match args.hubs {
        Some(hubs) => SimMode::Hub {
            hubs,
            targets: args.targets.unwrap_or(args.nurses * args.routes_per),
            cluster_radius_m: args.cluster_radius,
        },
        None => SimMode::legacy(args.routes_per),
    };
    let config = SimConfig { seed: args.seed, agents: args.nurses, mode };
    let outcome = RouteSimulator::new(config, DijkstraRouter).run(&graph)?;

    let mut writer = CsvRouteWriter::new(&args.output_dir)?;
    let written = write_outcome(&mut writer, &graph, &outcome)?;
    println!(
        "{written} route(s), {} skipped, weight = {} -> {}",
        outcome.skipped,
        outcome.weight,
        routes_csv(&args.output_dir).display()
    );
    print_fleet(&outcome.stats);
    Ok(())
}

fn routes_csv(dir: &Path) -> PathBuf {
    dir.join(sn_output::csv::ROUTES_FILE)
}

fn print_fleet(stats: &FleetStats) {
    let line = |name: &str, s: Option<Summary>| match s {
        Some(s) => println!(
            "  {name:<10} min {:>8.3}  p25 {:>8.3}  median {:>8.3}  mean {:>8.3}  p75 {:>8.3}",
            s.min, s.p25, s.median, s.mean, s.p75
        ),
        None => println!("  {name:<10} n/a"),
    };
    line("length_km", stats.length_km);
    line("travel_min", stats.travel_min);
}
