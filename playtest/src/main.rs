//! Playtest - runs independent Voyage trials driven by determinized MCTS
//!
//! A batch process that:
//! 1. Loads config.toml (with env overrides) and applies CLI flags
//! 2. Plays `trials` games sequentially with seeds `seed, seed + 1, ...`
//! 3. Logs each trial and the aggregate summary
//! 4. Writes the summary as JSON

use anyhow::{Context, Result};
use clap::Parser;
use engine_core::ActionCodec;
use hex_grid::HexGrid;
use std::sync::Arc;
use tracing::info;

mod config;
mod stats;
mod trial;

use crate::config::{Cli, Settings};
use crate::stats::{write_summary, TrialStats};

fn init_tracing(level: &str) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    Ok(())
}

fn print_layout() -> Result<()> {
    let codec = ActionCodec::new(Arc::new(
        HexGrid::generate().context("generating the board")?,
    ));
    let metadata = games_voyage::layout_metadata(&codec);
    println!(
        "{}",
        serde_json::to_string_pretty(&metadata).context("serializing layout metadata")?
    );
    Ok(())
}

fn run(settings: &Settings) -> Result<()> {
    info!(
        trials = settings.trials,
        seed = settings.seed,
        iterations = settings.mcts.iterations,
        exploration = settings.mcts.exploration,
        reshuffle_interval = settings.mcts.reshuffle_interval,
        "Starting playtest"
    );

    let mut stats = TrialStats::new(games_voyage::ENV_ID);
    for i in 0..settings.trials {
        let seed = settings.seed.wrapping_add(u64::from(i));
        let outcome =
            trial::run_trial(settings, seed).with_context(|| format!("trial {i} (seed {seed})"))?;
        stats.record(&outcome);
    }

    let summary = stats.summary();
    info!(
        trials = summary.trials,
        wins = summary.wins,
        win_rate = summary.win_rate,
        mean_score = summary.mean_score,
        mean_turns = summary.mean_turns,
        mean_search_value = summary.mean_search_value,
        runtime_seconds = summary.runtime_seconds,
        "Playtest complete"
    );

    if let Some(path) = &settings.output {
        write_summary(&summary, path)?;
        info!(path = %path.display(), "Summary written");
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.load_config()?;
    let settings = cli.resolve(config)?;

    if settings.print_layout {
        return print_layout();
    }

    init_tracing(&settings.log_level)?;
    info!(log_level = %settings.log_level, "Tracing initialized");

    run(&settings)
}
