//! Default configuration values loaded from config.defaults.toml.
//!
//! This module loads defaults from the shared TOML file at compile time,
//! so the binary, the tests and the checked-in defaults file never drift.

use once_cell::sync::Lazy;
use serde::Deserialize;

/// The embedded defaults TOML file (loaded at compile time)
const DEFAULTS_TOML: &str = include_str!("../../../config.defaults.toml");

/// Parsed defaults structure (parsed once at first use)
static DEFAULTS: Lazy<DefaultsConfig> = Lazy::new(|| {
    toml::from_str(DEFAULTS_TOML).expect("config.defaults.toml should be valid TOML")
});

// ============================================================================
// Internal structs for parsing config.defaults.toml
// ============================================================================

#[derive(Debug, Deserialize)]
struct DefaultsConfig {
    common: CommonDefaults,
    rules: RulesDefaults,
    mcts: MctsDefaults,
    trials: TrialsDefaults,
}

#[derive(Debug, Deserialize)]
struct CommonDefaults {
    data_dir: String,
    log_level: String,
    seed: u64,
}

#[derive(Debug, Deserialize)]
struct RulesDefaults {
    speed: u32,
    max_rounds: u32,
    actions_per_round: u32,
    target_score: u32,
    deck_size: usize,
    starting_hand: usize,
    initially_unlocked: usize,
    unlock_interval: u32,
    token_spawns_per_round: usize,
    wild_chance: f64,
}

#[derive(Debug, Deserialize)]
struct MctsDefaults {
    iterations: u32,
    exploration: f64,
    reshuffle_interval: u32,
    max_playout_depth: u32,
    playout: String,
    greedy_epsilon: f64,
}

#[derive(Debug, Deserialize)]
struct TrialsDefaults {
    trials: u32,
    max_turns: u32,
    summary_file: String,
}

// ============================================================================
// Public accessor functions
// ============================================================================

// Common
pub fn data_dir() -> &'static str {
    &DEFAULTS.common.data_dir
}
pub fn log_level() -> &'static str {
    &DEFAULTS.common.log_level
}
pub fn seed() -> u64 {
    DEFAULTS.common.seed
}

// Rules
pub fn speed() -> u32 {
    DEFAULTS.rules.speed
}
pub fn max_rounds() -> u32 {
    DEFAULTS.rules.max_rounds
}
pub fn actions_per_round() -> u32 {
    DEFAULTS.rules.actions_per_round
}
pub fn target_score() -> u32 {
    DEFAULTS.rules.target_score
}
pub fn deck_size() -> usize {
    DEFAULTS.rules.deck_size
}
pub fn starting_hand() -> usize {
    DEFAULTS.rules.starting_hand
}
pub fn initially_unlocked() -> usize {
    DEFAULTS.rules.initially_unlocked
}
pub fn unlock_interval() -> u32 {
    DEFAULTS.rules.unlock_interval
}
pub fn token_spawns_per_round() -> usize {
    DEFAULTS.rules.token_spawns_per_round
}
pub fn wild_chance() -> f64 {
    DEFAULTS.rules.wild_chance
}

// MCTS
pub fn iterations() -> u32 {
    DEFAULTS.mcts.iterations
}
pub fn exploration() -> f64 {
    DEFAULTS.mcts.exploration
}
pub fn reshuffle_interval() -> u32 {
    DEFAULTS.mcts.reshuffle_interval
}
pub fn max_playout_depth() -> u32 {
    DEFAULTS.mcts.max_playout_depth
}
pub fn playout() -> &'static str {
    &DEFAULTS.mcts.playout
}
pub fn greedy_epsilon() -> f64 {
    DEFAULTS.mcts.greedy_epsilon
}

// Trials
pub fn trials() -> u32 {
    DEFAULTS.trials.trials
}
pub fn max_turns() -> u32 {
    DEFAULTS.trials.max_turns
}
pub fn summary_file() -> &'static str {
    &DEFAULTS.trials.summary_file
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_parse() {
        // Just accessing these will verify the TOML parses correctly
        assert_eq!(data_dir(), "./data");
        assert_eq!(log_level(), "info");
        assert_eq!(seed(), 42);
    }

    #[test]
    fn test_rules_defaults() {
        assert_eq!(speed(), 2);
        assert_eq!(max_rounds(), 12);
        assert_eq!(actions_per_round(), 3);
        assert_eq!(target_score(), 10);
        assert_eq!(deck_size(), 8);
        assert_eq!(starting_hand(), 3);
        assert_eq!(initially_unlocked(), 2);
        assert_eq!(unlock_interval(), 2);
        assert_eq!(token_spawns_per_round(), 2);
        assert!((wild_chance() - 0.2).abs() < f64::EPSILON);
    }

    #[test]
    fn test_mcts_defaults() {
        assert_eq!(iterations(), 400);
        assert!((exploration() - std::f64::consts::SQRT_2).abs() < 1e-12);
        assert_eq!(reshuffle_interval(), 20);
        assert_eq!(max_playout_depth(), 48);
        assert_eq!(playout(), "uniform");
        assert!((greedy_epsilon() - 0.1).abs() < f64::EPSILON);
    }

    #[test]
    fn test_trials_defaults() {
        assert_eq!(trials(), 10);
        assert_eq!(max_turns(), 200);
        assert_eq!(summary_file(), "trial_summary.json");
    }
}
