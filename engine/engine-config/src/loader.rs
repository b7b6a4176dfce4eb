//! Configuration loading logic.
//!
//! Handles loading config from files and applying environment variable overrides.

use crate::{ConfigError, PlaytestConfig};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "PLAYTEST_CONFIG";

/// Standard locations to search for config.toml
pub const CONFIG_SEARCH_PATHS: &[&str] = &[
    "config.toml",    // Current directory
    "../config.toml", // Parent directory (when running from subdirectory)
];

/// Load the configuration from config.toml.
///
/// Searches for config.toml in the following order:
/// 1. Path specified by the PLAYTEST_CONFIG environment variable
/// 2. Current directory (config.toml)
/// 3. Parent directory (../config.toml)
///
/// After loading, environment variable overrides are applied. A file that
/// exists but cannot be read or parsed is an error, not a silent fallback.
pub fn load_config() -> Result<PlaytestConfig, ConfigError> {
    // Check for explicit config path
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        let path = PathBuf::from(&path);
        if path.exists() {
            info!("Loading config from {}: {}", CONFIG_ENV_VAR, path.display());
            return load_from_path(&path);
        }
        warn!(
            "{}={} not found, searching defaults",
            CONFIG_ENV_VAR,
            path.display()
        );
    }

    // Search default locations
    for path_str in CONFIG_SEARCH_PATHS {
        let path = PathBuf::from(path_str);
        if path.exists() {
            info!("Loading config from {}", path.display());
            return load_from_path(&path);
        }
    }

    // Fall back to defaults
    debug!("No config.toml found, using built-in defaults");
    let config = apply_env_overrides(PlaytestConfig::default());
    config.validate()?;
    Ok(config)
}

/// Load configuration from a specific path.
pub fn load_from_path(path: &Path) -> Result<PlaytestConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config: PlaytestConfig = toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    let config = apply_env_overrides(config);
    config.validate()?;
    Ok(config)
}

/// Macro to reduce env override boilerplate
macro_rules! env_override {
    // String field
    ($config:expr, $section:ident . $field:ident, $key:expr) => {
        if let Ok(v) = std::env::var($key) {
            $config.$section.$field = v;
        }
    };
    // Parseable field (u32, u64, f64, etc.)
    ($config:expr, $section:ident . $field:ident, $key:expr, parse) => {
        match std::env::var($key).map(|s| s.parse()) {
            Ok(Ok(v)) => $config.$section.$field = v,
            Ok(Err(_)) => warn!("Ignoring unparseable {}", $key),
            Err(_) => {}
        }
    };
}

/// Apply environment variable overrides to a configuration.
///
/// Environment variables follow the pattern: PLAYTEST_<SECTION>_<KEY>
pub fn apply_env_overrides(mut config: PlaytestConfig) -> PlaytestConfig {
    // Common
    env_override!(config, common.data_dir, "PLAYTEST_COMMON_DATA_DIR");
    env_override!(config, common.log_level, "PLAYTEST_COMMON_LOG_LEVEL");
    env_override!(config, common.seed, "PLAYTEST_COMMON_SEED", parse);

    // Rules
    env_override!(config, rules.speed, "PLAYTEST_RULES_SPEED", parse);
    env_override!(config, rules.max_rounds, "PLAYTEST_RULES_MAX_ROUNDS", parse);
    env_override!(
        config,
        rules.actions_per_round,
        "PLAYTEST_RULES_ACTIONS_PER_ROUND",
        parse
    );
    env_override!(
        config,
        rules.target_score,
        "PLAYTEST_RULES_TARGET_SCORE",
        parse
    );
    env_override!(config, rules.deck_size, "PLAYTEST_RULES_DECK_SIZE", parse);
    env_override!(
        config,
        rules.starting_hand,
        "PLAYTEST_RULES_STARTING_HAND",
        parse
    );
    env_override!(
        config,
        rules.initially_unlocked,
        "PLAYTEST_RULES_INITIALLY_UNLOCKED",
        parse
    );
    env_override!(
        config,
        rules.unlock_interval,
        "PLAYTEST_RULES_UNLOCK_INTERVAL",
        parse
    );
    env_override!(
        config,
        rules.token_spawns_per_round,
        "PLAYTEST_RULES_TOKEN_SPAWNS_PER_ROUND",
        parse
    );
    env_override!(
        config,
        rules.wild_chance,
        "PLAYTEST_RULES_WILD_CHANCE",
        parse
    );

    // MCTS
    env_override!(config, mcts.iterations, "PLAYTEST_MCTS_ITERATIONS", parse);
    env_override!(config, mcts.exploration, "PLAYTEST_MCTS_EXPLORATION", parse);
    env_override!(
        config,
        mcts.reshuffle_interval,
        "PLAYTEST_MCTS_RESHUFFLE_INTERVAL",
        parse
    );
    env_override!(
        config,
        mcts.max_playout_depth,
        "PLAYTEST_MCTS_MAX_PLAYOUT_DEPTH",
        parse
    );
    env_override!(config, mcts.playout, "PLAYTEST_MCTS_PLAYOUT");
    env_override!(
        config,
        mcts.greedy_epsilon,
        "PLAYTEST_MCTS_GREEDY_EPSILON",
        parse
    );

    // Trials
    env_override!(config, trials.trials, "PLAYTEST_TRIALS_TRIALS", parse);
    env_override!(config, trials.max_turns, "PLAYTEST_TRIALS_MAX_TURNS", parse);
    env_override!(config, trials.summary_file, "PLAYTEST_TRIALS_SUMMARY_FILE");

    config
}
