//! Command line for the playtest driver
//!
//! Configuration is loaded from config.toml with environment variable overrides.
//! CLI arguments take highest priority; every flag is optional and replaces the
//! loaded value. The result is resolved once into [`Settings`].

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use engine_config::PlaytestConfig;
use mcts::{MctsConfig, PlayoutKind};
use std::path::{Path, PathBuf};
use tracing::level_filters::LevelFilter;

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "playtest")]
#[command(about = "Hex playtester - runs Voyage trials with determinized MCTS")]
#[command(
    long_about = "Runs independent Voyage games, choosing every action with a determinized
Monte Carlo Tree Search, and reports win rate, scores and search values.

Configuration is loaded from config.toml with environment variable overrides.
CLI arguments take highest priority."
)]
pub struct Cli {
    /// Config file to load instead of searching for config.toml
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Number of independent trials
    #[arg(long)]
    pub trials: Option<u32>,

    /// Seed of the first trial; trial i uses seed + i
    #[arg(long)]
    pub seed: Option<u64>,

    /// MCTS iterations per decision
    #[arg(long)]
    pub iterations: Option<u32>,

    /// UCT exploration constant
    #[arg(long)]
    pub exploration: Option<f64>,

    /// Iterations between hidden deck resamples
    #[arg(long)]
    pub reshuffle_interval: Option<u32>,

    /// Playout steps before the heuristic is used
    #[arg(long)]
    pub max_playout_depth: Option<u32>,

    /// Playout policy (uniform, greedy)
    #[arg(long)]
    pub playout: Option<String>,

    /// Ship speed
    #[arg(long)]
    pub speed: Option<u32>,

    /// Turn cap per trial
    #[arg(long)]
    pub max_turns: Option<u32>,

    /// Where to write the JSON trial summary
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Print the action layout as JSON and exit
    #[arg(long)]
    pub print_layout: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,
}

/// Everything a playtest run needs, after config, env and CLI are merged.
#[derive(Debug, Clone)]
pub struct Settings {
    pub rules: games_voyage::RulesConfig,
    pub mcts: MctsConfig,
    pub trials: u32,
    pub seed: u64,
    pub max_turns: u32,
    pub log_level: String,
    /// None disables the summary file.
    pub output: Option<PathBuf>,
    pub print_layout: bool,
}

impl Cli {
    /// Load the config file named by `--config`, or search the usual places.
    pub fn load_config(&self) -> Result<PlaytestConfig> {
        match &self.config {
            Some(path) => engine_config::load_from_path(path)
                .with_context(|| format!("loading {}", path.display())),
            None => engine_config::load_config().context("loading configuration"),
        }
    }

    /// Merge CLI flags over `config` and validate the result.
    pub fn resolve(&self, mut config: PlaytestConfig) -> Result<Settings> {
        if let Some(trials) = self.trials {
            config.trials.trials = trials;
        }
        if let Some(seed) = self.seed {
            config.common.seed = seed;
        }
        if let Some(iterations) = self.iterations {
            config.mcts.iterations = iterations;
        }
        if let Some(exploration) = self.exploration {
            config.mcts.exploration = exploration;
        }
        if let Some(k) = self.reshuffle_interval {
            config.mcts.reshuffle_interval = k;
        }
        if let Some(depth) = self.max_playout_depth {
            config.mcts.max_playout_depth = depth;
        }
        if let Some(playout) = &self.playout {
            config.mcts.playout = playout.clone();
        }
        if let Some(speed) = self.speed {
            config.rules.speed = speed;
        }
        if let Some(max_turns) = self.max_turns {
            config.trials.max_turns = max_turns;
        }
        if let Some(level) = &self.log_level {
            config.common.log_level = level.clone();
        }

        config.validate()?;
        if config.common.log_level.parse::<LevelFilter>().is_err() {
            return Err(anyhow!(
                "invalid log level '{}', expected one of trace, debug, info, warn, error",
                config.common.log_level
            ));
        }

        let output = match &self.output {
            Some(path) => Some(path.clone()),
            None if config.trials.summary_file.is_empty() => None,
            None => Some(Path::new(&config.common.data_dir).join(&config.trials.summary_file)),
        };

        Ok(Settings {
            rules: rules_from(&config.rules),
            mcts: mcts_from(&config.mcts),
            trials: config.trials.trials,
            seed: config.common.seed,
            max_turns: config.trials.max_turns,
            log_level: config.common.log_level,
            output,
            print_layout: self.print_layout,
        })
    }
}

fn rules_from(rules: &engine_config::RulesConfig) -> games_voyage::RulesConfig {
    games_voyage::RulesConfig {
        speed: rules.speed,
        max_rounds: rules.max_rounds,
        actions_per_round: rules.actions_per_round,
        target_score: rules.target_score,
        deck_size: rules.deck_size,
        starting_hand: rules.starting_hand,
        initially_unlocked: rules.initially_unlocked,
        unlock_interval: rules.unlock_interval,
        token_spawns_per_round: rules.token_spawns_per_round,
        wild_chance: rules.wild_chance,
    }
}

fn mcts_from(mcts: &engine_config::MctsConfig) -> MctsConfig {
    let playout = match mcts.playout.as_str() {
        "greedy" => PlayoutKind::Greedy {
            epsilon: mcts.greedy_epsilon,
        },
        _ => PlayoutKind::Uniform,
    };
    MctsConfig::default()
        .with_iterations(mcts.iterations)
        .with_exploration(mcts.exploration as f32)
        .with_reshuffle_interval(mcts.reshuffle_interval)
        .with_max_playout_depth(mcts.max_playout_depth)
        .with_playout(playout)
}
