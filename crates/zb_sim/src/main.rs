//! ZB Supply Simulator CLI
//!
//! Builds the token release schedule, runs the revenue x FDV scenario grid
//! and writes charts and reports for the linear and/or sigmoid release model.

mod chart;
mod config;
mod output;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::fs;
use std::path::PathBuf;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;
use zb_economics::prelude::*;
use zb_economics::{unallocated_residual, verify_conservation};

use crate::config::{resolve_output_dir, SimConfig};
use crate::output::{ArtifactPaths, RunSummary};

#[derive(Parser, Debug)]
#[command(name = "zb-sim")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "ZB token release and circulating supply simulator", long_about = None)]
struct Args {
    /// Optional TOML configuration (simulation parameters and scenario grids)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Release model for the cliff-vested categories
    #[arg(short, long, value_enum, default_value = "both")]
    mode: ModeArg,

    /// Directory for charts and reports (falls back to ZB_SIM_OUTPUT_DIR)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Skip chart rendering
    #[arg(long)]
    no_plot: bool,

    /// Also write per-month trajectories as CSV
    #[arg(long)]
    csv: bool,

    /// Also write a JSON summary
    #[arg(long)]
    json: bool,

    /// Evaluate scenarios on the rayon thread pool
    #[arg(long)]
    parallel: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq)]
enum ModeArg {
    /// Cliff then linear release
    Linear,
    /// Cliff then sigmoid release
    Sigmoid,
    /// Run both models
    Both,
}

impl ModeArg {
    fn modes(self, steepness: f64) -> Vec<ReleaseMode> {
        let sigmoid = ReleaseMode::Sigmoid { steepness };
        match self {
            ModeArg::Linear => vec![ReleaseMode::Linear],
            ModeArg::Sigmoid => vec![sigmoid],
            ModeArg::Both => vec![ReleaseMode::Linear, sigmoid],
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    info!("ZB Supply Simulator v{}", env!("CARGO_PKG_VERSION"));

    let config = SimConfig::load(args.config.as_deref())?;
    let runner = config.runner().context("Invalid scenario grid")?;
    let output_dir = resolve_output_dir(args.output_dir.clone());
    fs::create_dir_all(&output_dir)
        .with_context(|| format!("Failed to create output directory {}", output_dir.display()))?;

    info!(
        "Scenario grid: {} revenue x {} FDV",
        runner.revenue_grid().len(),
        runner.fdv_grid().len()
    );

    for mode in args.mode.modes(config.simulation.sigmoid_steepness) {
        run_mode(&args, &config, &runner, mode, &output_dir)?;
    }

    Ok(())
}

fn run_mode(
    args: &Args,
    config: &SimConfig,
    runner: &ScenarioRunner,
    mode: ReleaseMode,
    output_dir: &std::path::Path,
) -> Result<()> {
    info!("Running {mode} release model");

    let schedule = AllocationSchedule::new(default_categories(), config.simulation.horizon_months)
        .and_then(|s| s.with_mode(mode))
        .context("Invalid allocation schedule")?;
    let issuance = aggregate(&schedule);

    verify_conservation(&schedule, &issuance, 1e-6).context("Release schedule leaks tokens")?;
    unallocated_residual(&issuance, config.simulation.burn.reference_supply);

    let results = if args.parallel {
        runner.run_parallel(&issuance.total)?
    } else {
        runner.run(&issuance.total)?
    };

    let report = render_report(mode, &results, &issuance, runner.burn())
        .context("Failed to build report")?;
    println!("{report}");

    let paths = ArtifactPaths::new(output_dir, mode);
    output::write_report(&paths.report, &report)?;

    if !args.no_plot {
        match chart::render_inflation_chart(&paths.chart, mode, &results) {
            Ok(()) => info!("Chart saved → {}", paths.chart.display()),
            Err(e) => warn!("Chart generation failed for {mode} model: {e}"),
        }
    }

    if args.csv {
        output::write_trajectories_csv(&paths.csv, &results)?;
    }

    if args.json {
        let summary = RunSummary::new(mode, &issuance, &results);
        output::write_summary_json(&paths.json, &summary)?;
    }

    Ok(())
}
