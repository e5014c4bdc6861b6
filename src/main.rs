//! Civsim headless runner
//!
//! Runs a simulation for a fixed number of years, printing notifications as
//! they happen, then writes the final save state and event log.

use std::path::PathBuf;
use std::time::Instant;

use civsim::core::error::Result;
use civsim::{Simulation, SimulationConfig};
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Civsim - watch civilizations rise and fall
#[derive(Parser, Debug)]
#[command(name = "civsim")]
#[command(about = "Run a civilization rise-and-fall simulation")]
struct Args {
    /// TOML config file (defaults are used when omitted)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Random seed, overrides the config
    #[arg(long)]
    seed: Option<u64>,

    /// Years to simulate
    #[arg(long, default_value_t = 500)]
    ticks: u64,

    /// Civilizations to found at start, overrides the config
    #[arg(long)]
    civs: Option<usize>,

    /// Where to write the final save state
    #[arg(long, default_value = "civsim_save.json")]
    output: PathBuf,

    /// Where to write the event log
    #[arg(long)]
    events: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("civsim=info")))
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    let civs = args.civs.unwrap_or(config.initial_civilizations);

    println!("Starting {}", config.name);
    println!("======================================");
    println!("World: {}x{} tiles, seed {}", config.world_width, config.world_height, config.seed);
    println!("Simulating {} years with {} civilizations...", args.ticks, civs);
    println!();

    let start = Instant::now();
    let mut sim = Simulation::new(config)?;
    sim.initialize(civs);

    for _ in 0..args.ticks {
        sim.tick();
        for event in sim.major_events() {
            println!("[Year {}] {}: {}", sim.year(), event.title, event.message);
        }
        if sim.is_paused() {
            sim.resume();
        }
        if sim.civilization_count() == 0 {
            println!("[Year {}] No civilizations remain.", sim.year());
            break;
        }
    }
    let elapsed = start.elapsed();

    let summary = sim.summary(elapsed.as_millis() as u64);
    println!();
    println!("{}", summary.summary());

    sim.save_state(&args.output)?;
    println!("\nSave state written to {}", args.output.display());

    if let Some(path) = &args.events {
        std::fs::write(path, sim.event_log().export_to_json()?)?;
        println!("Event log written to {}", path.display());
    }

    Ok(())
}
