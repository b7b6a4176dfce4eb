//! Centralized configuration loading from config.toml.
//!
//! This crate provides the configuration structs and loading logic used by
//! the playtest driver. The loaded value is passed explicitly into the rule
//! engine and search; nothing here is a mutable global.
//!
//! # Configuration Priority
//!
//! Settings are loaded with the following priority (highest to lowest):
//! 1. Environment variables (`PLAYTEST_<SECTION>_<KEY>`)
//! 2. config.toml file
//! 3. Built-in defaults (config.defaults.toml, embedded at compile time)
//!
//! # Environment Variable Override Pattern
//!
//! ```text
//! PLAYTEST_<SECTION>_<KEY>=value
//!
//! Examples:
//!     PLAYTEST_COMMON_SEED=7
//!     PLAYTEST_COMMON_LOG_LEVEL=debug
//!     PLAYTEST_RULES_SPEED=3
//!     PLAYTEST_MCTS_RESHUFFLE_INTERVAL=10
//!     PLAYTEST_TRIALS_TRIALS=50
//! ```

mod defaults;
mod loader;
mod structs;

pub use defaults::*;
pub use loader::{
    apply_env_overrides, load_config, load_from_path, CONFIG_ENV_VAR, CONFIG_SEARCH_PATHS,
};
pub use structs::*;

use std::path::PathBuf;
use thiserror::Error;

/// Configuration errors. All of them abort startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests;
