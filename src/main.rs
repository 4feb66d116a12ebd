//! Veilwatch - headless scenario runner
//!
//! Loads a level, runs the stealth core at its fixed step and prints a
//! summary of what happened.

use clap::Parser;
use std::path::PathBuf;

use veilwatch::core::config::{load_config, StealthConfig};
use veilwatch::core::error::Result;
use veilwatch::scenario::{load_scenario, RunSummary, ScenarioRunner};

/// Run a stealth scenario without a game engine
#[derive(Parser, Debug)]
#[command(name = "veilwatch")]
#[command(about = "Run a stealth scenario headlessly and report detection outcomes")]
struct Args {
    /// Level file (TOML)
    #[arg(long, default_value = "data/scenarios/courtyard.toml")]
    scenario: PathBuf,

    /// Tuning file (TOML); defaults are used when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Steps to run; falls back to the level's own count
    #[arg(long)]
    ticks: Option<u64>,

    /// Seed for patrol and wander points
    #[arg(long)]
    seed: Option<u64>,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,
}

const DEFAULT_TICKS: u64 = 3000;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("veilwatch=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => StealthConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.simulation.seed = seed;
    }

    let scenario = load_scenario(&args.scenario)?;
    let ticks = args.ticks.or(scenario.ticks).unwrap_or(DEFAULT_TICKS);

    let mut runner = ScenarioRunner::new(&scenario, config)?;
    let summary = runner.run(ticks);

    match args.format.as_str() {
        "text" => print_text(&summary),
        _ => println!("{}", serde_json::to_string_pretty(&summary)?),
    }

    Ok(())
}

fn print_text(summary: &RunSummary) {
    println!("=== {} (seed {}) ===", summary.scenario, summary.seed);
    println!("ticks run:       {}", summary.ticks);
    println!("outcome:         {}", summary.outcome);
    println!("final mode:      {}", summary.final_mode);
    println!("final meter:     {:.1}", summary.final_meter);
    println!("corruption:      {:.1}", summary.corruption);
    println!(
        "detections: {}  alerts: {}  lure pulses: {}  lured: {}  fallen: {}",
        summary.events.full_detections,
        summary.events.group_alerts,
        summary.events.lure_pulses,
        summary.events.guards_lured,
        summary.events.guards_fallen
    );
    println!("guards remaining: {}", summary.guards_remaining);
    for guard in &summary.guards {
        println!(
            "  {} {} {:<11} at ({:.1}, {:.1}){}",
            guard.id,
            guard.group,
            guard.state.to_string(),
            guard.position[0],
            guard.position[1],
            if guard.has_los { " [sees player]" } else { "" }
        );
    }
}
