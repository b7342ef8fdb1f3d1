//! synth_scatter command-line driver.
//!
//! Usage:
//!   synth-scatter loop <config.ron>
//!   synth-scatter plan <config.ron> [seed]
//!   synth-scatter defaults
mod config;
mod logging;
mod looper;

use std::env;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Context;
use rand::rngs::StdRng;
use rand::SeedableRng;
use ron::ser::PrettyConfig;
use synth_scatter::prelude::{run_cycle, CycleEvent, FnSink, MemoryScene};
use tracing::{debug, info};

use crate::config::AppConfig;

const USAGE: &str = "Usage: synth-scatter <loop <config.ron> | plan <config.ron> [seed] | defaults>";

fn main() -> anyhow::Result<()> {
    logging::init_tracing();

    let args: Vec<String> = env::args().collect();
    match (args.get(1).map(String::as_str), args.get(2)) {
        (Some("loop"), Some(path)) => cmd_loop(path),
        (Some("plan"), Some(path)) => cmd_plan(path, args.get(3).map(String::as_str)),
        (Some("defaults"), None) => cmd_defaults(),
        _ => {
            eprintln!("{USAGE}");
            std::process::exit(2);
        }
    }
}

fn cmd_loop(path: &str) -> anyhow::Result<()> {
    let config = AppConfig::load(path)?;
    let done = looper::run_loop(&config.generator, &config.driver)?;
    info!("Loop finished after {done} cycles.");
    Ok(())
}

/// One dry-run cycle against the in-memory scene, printed as RON.
fn cmd_plan(path: &str, seed: Option<&str>) -> anyhow::Result<()> {
    let config = AppConfig::load(path)?;
    let seed = match seed {
        Some(s) => s
            .parse::<u64>()
            .with_context(|| format!("seed must be an unsigned integer, got '{s}'"))?,
        None => clock_seed(),
    };
    info!("Planning one cycle with seed {seed}.");

    let mut scene = MemoryScene::new();
    let mut rng = StdRng::seed_from_u64(seed);
    let mut sink = FnSink::new(|event: CycleEvent| debug!("{event:?}"));
    let report = run_cycle(&config.generator, &mut scene, &mut rng, &mut sink)?;

    let id = config.generator.output.next_cycle_id();
    info!(
        "Cycle {id} would write {} and {}.",
        config.generator.output.image_path(&id).display(),
        config.generator.output.label_path(&id).display()
    );
    println!("{}", ron::ser::to_string_pretty(&report, PrettyConfig::default())?);
    Ok(())
}

fn cmd_defaults() -> anyhow::Result<()> {
    println!("{}", AppConfig::default().to_ron()?);
    Ok(())
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}
