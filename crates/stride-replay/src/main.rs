//! Headless replay runner.
//!
//! Loads a movement config, an ASCII level layout and an input script (or a
//! seed for a random one), replays the script against the level and prints
//! the recorded trajectory with its determinism hash as JSON.
//!
//! ```text
//! stride-replay level.txt --config hero.json --script run.json --ticks 500
//! stride-replay level.txt --seed 42 --hash-only
//! ```
//!
//! Logging goes to stderr and honours `RUST_LOG`.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use stride_core::ledge::Layout;
use stride_core::{
    hash_trajectory, run_script, InputScript, MovementConfig, MovementController, PlayField, Timing, Trajectory,
    FIXED_DT,
};

/// Replay an input script against a platformer level
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// ASCII level layout (`#` solid, `.` empty, `P` spawn)
    layout: PathBuf,

    /// Movement config JSON; defaults to the classic tuning
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Input script JSON
    #[arg(short, long, conflicts_with = "seed")]
    script: Option<PathBuf>,

    /// Seed for a random input script, used when no script is given
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Number of steps to run
    #[arg(short, long, default_value_t = 250)]
    ticks: u64,

    /// Logic and physics timestep in seconds
    #[arg(long, default_value_t = FIXED_DT)]
    dt: f32,

    /// World units per layout tile
    #[arg(long, default_value_t = 1.0)]
    tile_size: f32,

    /// Write the report here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print only the trajectory hash
    #[arg(long)]
    hash_only: bool,

    /// Pretty-print the JSON report
    #[arg(long)]
    pretty: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Everything a replay needs, loaded and validated.
struct Replay {
    config: MovementConfig,
    layout: Layout,
    script: InputScript,
    timing: Timing,
}

/// JSON output of a run.
#[derive(Debug, Serialize)]
struct Report {
    hash: u64,
    ticks: u64,
    trajectory: Trajectory,
}

fn init_logging(verbose: bool) -> Result<()> {
    let default = if verbose { "stride_core=debug,ledge=debug" } else { "stride_core=info" };
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default))?;
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .try_init()?;
    Ok(())
}

fn read_text(path: &Path, what: &str) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {what} from {}", path.display()))
}

fn load(args: &Args) -> Result<Replay> {
    if !(args.dt.is_finite() && args.dt > 0.0) {
        bail!("timestep must be a positive number of seconds, got {}", args.dt);
    }

    let config = match &args.config {
        Some(path) => MovementConfig::from_json(&read_text(path, "config")?)
            .with_context(|| format!("invalid movement config in {}", path.display()))?,
        None => MovementConfig::default(),
    };

    let layout = Layout::parse(&read_text(&args.layout, "layout")?, args.tile_size)
        .with_context(|| format!("invalid layout in {}", args.layout.display()))?;

    let script = match &args.script {
        Some(path) => serde_json::from_str(&read_text(path, "input script")?)
            .with_context(|| format!("invalid input script in {}", path.display()))?,
        None => {
            let len = usize::try_from(args.ticks).context("tick count does not fit in memory")?;
            debug!(seed = args.seed, len, "generating random input script");
            InputScript::random(args.seed, len)
        }
    };

    Ok(Replay {
        config,
        layout,
        script,
        timing: Timing {
            dt: args.dt,
            fixed_dt: args.dt,
            ticks: args.ticks,
        },
    })
}

fn replay(mut run: Replay) -> Result<Report> {
    let Some(spawn) = run.layout.spawn else {
        bail!("layout has no spawn marker `P`");
    };
    let extents = run.layout.extents;
    let field = PlayField::new(extents.min.x, extents.max.x);

    let mut controller = MovementController::new(run.config, spawn);
    let trajectory = run_script(&mut controller, &mut run.script, &run.layout.terrain, &field, run.timing);

    Ok(Report {
        hash: hash_trajectory(&trajectory),
        ticks: run.timing.ticks,
        trajectory,
    })
}

fn write_report(args: &Args, report: &Report) -> Result<()> {
    let mut text = if args.hash_only {
        format!("{:016x}", report.hash)
    } else if args.pretty {
        serde_json::to_string_pretty(report)?
    } else {
        serde_json::to_string(report)?
    };
    text.push('\n');

    match &args.output {
        Some(path) => {
            fs::write(path, text).with_context(|| format!("failed to write report to {}", path.display()))?;
        }
        None => io::stdout().lock().write_all(text.as_bytes())?,
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose)?;

    let report = replay(load(&args)?)?;
    info!(hash = report.hash, ticks = report.ticks, "replay complete");
    write_report(&args, &report)
}
