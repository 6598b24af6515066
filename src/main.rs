//! SmartTeammates - Entry Point
//!
//! Loads the runtime config, applies command-line overrides, then either runs
//! the terminal front-end or a fixed number of ticks headless, printing a JSON
//! report.

use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;

use clap::Parser;
use smart_teammates::core::config::{DamageMultiplier, LoggingConfig, RuntimeConfig, SpeedTier};
use smart_teammates::core::error::Result;
use smart_teammates::simulation::Controller;
use smart_teammates::ui::{run_headless, run_interactive};
use tracing_subscriber::EnvFilter;

/// SmartTeammates - AI teammate bot squad demo
#[derive(Parser, Debug)]
#[command(name = "smart-teammates")]
#[command(about = "Watch three AI teammate bots hunt respawning targets")]
struct Args {
    /// Runtime config file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Damage multiplier, 1.0 to 5.0 in steps of 0.5
    #[arg(long)]
    damage: Option<DamageMultiplier>,

    /// Movement speed: standard, fast or very-fast
    #[arg(long)]
    speed: Option<SpeedTier>,

    /// Start with the AI logic system disabled
    #[arg(long)]
    no_ai: bool,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Run this many ticks without a terminal UI and print a JSON report
    #[arg(long, value_name = "TICKS")]
    headless: Option<u64>,

    /// Also write the headless report to this file
    #[arg(long, requires = "headless")]
    report: Option<PathBuf>,

    /// Write logs to this file while the terminal UI is running
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => RuntimeConfig::load(path)?,
        None => RuntimeConfig::default(),
    };
    if let Some(damage) = args.damage {
        config.mods.damage_multiplier = damage;
    }
    if let Some(speed) = args.speed {
        config.mods.movement_speed = speed;
    }
    if args.no_ai {
        config.mods.ai_enabled = false;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if args.log_file.is_some() {
        config.logging.file = args.log_file.clone();
    }

    init_tracing(&config.logging, args.headless.is_some())?;

    let seed = config.seed.unwrap_or_else(rand::random);
    tracing::info!(seed, options = %config.mods.summary(), "SmartTeammates starting");
    let controller = Controller::seeded(config.mods, seed);

    match args.headless {
        Some(ticks) => {
            let report = run_headless(controller, ticks, Some(seed))?;
            println!("{}", report.to_json()?);
            if let Some(path) = &args.report {
                report.write_json(path)?;
            }
        }
        None => run_interactive(controller)?,
    }

    Ok(())
}

/// Headless runs log to stderr. The terminal UI owns the screen, so logs go
/// to the configured file or nowhere.
fn init_tracing(logging: &LoggingConfig, headless: bool) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.filter));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    if headless {
        builder.with_writer(std::io::stderr).init();
    } else if let Some(path) = &logging.file {
        let file = File::create(path)?;
        builder.with_writer(Mutex::new(file)).with_ansi(false).init();
    } else {
        builder.with_writer(std::io::sink).init();
    }
    Ok(())
}
