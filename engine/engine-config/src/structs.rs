//! Configuration struct definitions.
//!
//! All config structs with serde deserialization support and default values.

use crate::defaults;
use crate::ConfigError;
use serde::{Deserialize, Serialize};

// ============================================================================
// Serde default functions (required for #[serde(default = "...")])
// These call the accessor functions from defaults module
// ============================================================================

fn d_data_dir() -> String {
    defaults::data_dir().into()
}
fn d_log_level() -> String {
    defaults::log_level().into()
}
fn d_seed() -> u64 {
    defaults::seed()
}
fn d_speed() -> u32 {
    defaults::speed()
}
fn d_max_rounds() -> u32 {
    defaults::max_rounds()
}
fn d_actions_per_round() -> u32 {
    defaults::actions_per_round()
}
fn d_target_score() -> u32 {
    defaults::target_score()
}
fn d_deck_size() -> usize {
    defaults::deck_size()
}
fn d_starting_hand() -> usize {
    defaults::starting_hand()
}
fn d_initially_unlocked() -> usize {
    defaults::initially_unlocked()
}
fn d_unlock_interval() -> u32 {
    defaults::unlock_interval()
}
fn d_token_spawns() -> usize {
    defaults::token_spawns_per_round()
}
fn d_wild_chance() -> f64 {
    defaults::wild_chance()
}
fn d_iterations() -> u32 {
    defaults::iterations()
}
fn d_exploration() -> f64 {
    defaults::exploration()
}
fn d_reshuffle_interval() -> u32 {
    defaults::reshuffle_interval()
}
fn d_max_playout_depth() -> u32 {
    defaults::max_playout_depth()
}
fn d_playout() -> String {
    defaults::playout().into()
}
fn d_greedy_epsilon() -> f64 {
    defaults::greedy_epsilon()
}
fn d_trials() -> u32 {
    defaults::trials()
}
fn d_max_turns() -> u32 {
    defaults::max_turns()
}
fn d_summary_file() -> String {
    defaults::summary_file().into()
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Root configuration structure matching config.toml
#[derive(Debug, Deserialize, Serialize, Default, Clone, PartialEq)]
pub struct PlaytestConfig {
    #[serde(default)]
    pub common: CommonConfig,
    #[serde(default)]
    pub rules: RulesConfig,
    #[serde(default)]
    pub mcts: MctsConfig,
    #[serde(default)]
    pub trials: TrialsConfig,
}

impl PlaytestConfig {
    /// Reject values no component can run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: &str| Err(ConfigError::Invalid(msg.to_string()));

        if self.rules.speed == 0 {
            return invalid("rules.speed must be at least 1");
        }
        if self.rules.max_rounds == 0 {
            return invalid("rules.max_rounds must be at least 1");
        }
        if self.rules.actions_per_round == 0 {
            return invalid("rules.actions_per_round must be at least 1");
        }
        if self.rules.target_score == 0 {
            return invalid("rules.target_score must be at least 1");
        }
        if self.rules.initially_unlocked > 6 {
            return invalid("rules.initially_unlocked cannot exceed the 6 sectors");
        }
        if !(0.0..=1.0).contains(&self.rules.wild_chance) {
            return invalid("rules.wild_chance must be within [0, 1]");
        }
        if !self.mcts.exploration.is_finite() || self.mcts.exploration < 0.0 {
            return invalid("mcts.exploration must be a finite non-negative number");
        }
        if self.mcts.reshuffle_interval == 0 {
            return invalid("mcts.reshuffle_interval must be at least 1");
        }
        if !matches!(self.mcts.playout.as_str(), "uniform" | "greedy") {
            return Err(ConfigError::Invalid(format!(
                "mcts.playout must be \"uniform\" or \"greedy\", got \"{}\"",
                self.mcts.playout
            )));
        }
        if !(0.0..=1.0).contains(&self.mcts.greedy_epsilon) {
            return invalid("mcts.greedy_epsilon must be within [0, 1]");
        }
        if self.trials.trials == 0 {
            return invalid("trials.trials must be at least 1");
        }
        Ok(())
    }
}

/// Common configuration shared by all components
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct CommonConfig {
    #[serde(default = "d_data_dir")]
    pub data_dir: String,
    #[serde(default = "d_log_level")]
    pub log_level: String,
    /// Base seed; trial `i` runs with `seed + i`
    #[serde(default = "d_seed")]
    pub seed: u64,
}

impl Default for CommonConfig {
    fn default() -> Self {
        Self {
            data_dir: defaults::data_dir().into(),
            log_level: defaults::log_level().into(),
            seed: defaults::seed(),
        }
    }
}

/// Rule parameters of the game under test
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct RulesConfig {
    #[serde(default = "d_speed")]
    pub speed: u32,
    #[serde(default = "d_max_rounds")]
    pub max_rounds: u32,
    #[serde(default = "d_actions_per_round")]
    pub actions_per_round: u32,
    #[serde(default = "d_target_score")]
    pub target_score: u32,
    /// Cards per sector deck
    #[serde(default = "d_deck_size")]
    pub deck_size: usize,
    #[serde(default = "d_starting_hand")]
    pub starting_hand: usize,
    #[serde(default = "d_initially_unlocked")]
    pub initially_unlocked: usize,
    /// Rounds between deck unlocks
    #[serde(default = "d_unlock_interval")]
    pub unlock_interval: u32,
    #[serde(default = "d_token_spawns")]
    pub token_spawns_per_round: usize,
    /// Probability that a card icon is a wildcard
    #[serde(default = "d_wild_chance")]
    pub wild_chance: f64,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            speed: defaults::speed(),
            max_rounds: defaults::max_rounds(),
            actions_per_round: defaults::actions_per_round(),
            target_score: defaults::target_score(),
            deck_size: defaults::deck_size(),
            starting_hand: defaults::starting_hand(),
            initially_unlocked: defaults::initially_unlocked(),
            unlock_interval: defaults::unlock_interval(),
            token_spawns_per_round: defaults::token_spawns_per_round(),
            wild_chance: defaults::wild_chance(),
        }
    }
}

/// MCTS (Monte Carlo Tree Search) configuration
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct MctsConfig {
    /// Iteration budget per recommendation
    #[serde(default = "d_iterations")]
    pub iterations: u32,
    /// UCT exploration constant `c`
    #[serde(default = "d_exploration")]
    pub exploration: f64,
    /// Iterations between hidden-deck resamples (`K`)
    #[serde(default = "d_reshuffle_interval")]
    pub reshuffle_interval: u32,
    #[serde(default = "d_max_playout_depth")]
    pub max_playout_depth: u32,
    /// "uniform" or "greedy"
    #[serde(default = "d_playout")]
    pub playout: String,
    #[serde(default = "d_greedy_epsilon")]
    pub greedy_epsilon: f64,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            iterations: defaults::iterations(),
            exploration: defaults::exploration(),
            reshuffle_interval: defaults::reshuffle_interval(),
            max_playout_depth: defaults::max_playout_depth(),
            playout: defaults::playout().into(),
            greedy_epsilon: defaults::greedy_epsilon(),
        }
    }
}

/// Playtest driver configuration
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct TrialsConfig {
    #[serde(default = "d_trials")]
    pub trials: u32,
    /// Safety cap on turns per trial
    #[serde(default = "d_max_turns")]
    pub max_turns: u32,
    /// Summary file name, relative to `common.data_dir`. Empty disables it.
    #[serde(default = "d_summary_file")]
    pub summary_file: String,
}

impl Default for TrialsConfig {
    fn default() -> Self {
        Self {
            trials: defaults::trials(),
            max_turns: defaults::max_turns(),
            summary_file: defaults::summary_file().into(),
        }
    }
}
