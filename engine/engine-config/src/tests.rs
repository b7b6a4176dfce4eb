//! Tests for the configuration module.

use super::*;
use std::io::Write;

#[test]
fn test_default_config() {
    let config = PlaytestConfig::default();
    assert_eq!(config.common.data_dir, "./data");
    assert_eq!(config.common.log_level, "info");
    assert_eq!(config.common.seed, 42);
    assert_eq!(config.trials.trials, 10);
    assert_eq!(config.trials.summary_file, "trial_summary.json");
    assert!(config.validate().is_ok());
}

#[test]
fn test_rules_defaults() {
    let config = PlaytestConfig::default();
    assert_eq!(config.rules.speed, 2);
    assert_eq!(config.rules.max_rounds, 12);
    assert_eq!(config.rules.actions_per_round, 3);
    assert_eq!(config.rules.target_score, 10);
    assert_eq!(config.rules.deck_size, 8);
    assert_eq!(config.rules.starting_hand, 3);
    assert_eq!(config.rules.initially_unlocked, 2);
    assert_eq!(config.rules.unlock_interval, 2);
    assert_eq!(config.rules.token_spawns_per_round, 2);
    assert!((config.rules.wild_chance - 0.2).abs() < f64::EPSILON);
}

#[test]
fn test_mcts_defaults() {
    let config = PlaytestConfig::default();
    assert_eq!(config.mcts.iterations, 400);
    assert!((config.mcts.exploration - std::f64::consts::SQRT_2).abs() < 1e-12);
    assert_eq!(config.mcts.reshuffle_interval, 20);
    assert_eq!(config.mcts.max_playout_depth, 48);
    assert_eq!(config.mcts.playout, "uniform");
}

#[test]
fn test_playtest_env_overrides() {
    std::env::set_var("PLAYTEST_COMMON_SEED", "7");
    std::env::set_var("PLAYTEST_RULES_SPEED", "3");
    std::env::set_var("PLAYTEST_MCTS_EXPLORATION", "0.5");
    std::env::set_var("PLAYTEST_MCTS_PLAYOUT", "greedy");

    let config = apply_env_overrides(PlaytestConfig::default());
    assert_eq!(config.common.seed, 7);
    assert_eq!(config.rules.speed, 3);
    assert!((config.mcts.exploration - 0.5).abs() < f64::EPSILON);
    assert_eq!(config.mcts.playout, "greedy");

    std::env::remove_var("PLAYTEST_COMMON_SEED");
    std::env::remove_var("PLAYTEST_RULES_SPEED");
    std::env::remove_var("PLAYTEST_MCTS_EXPLORATION");
    std::env::remove_var("PLAYTEST_MCTS_PLAYOUT");
}

#[test]
fn test_unparseable_env_override_is_ignored() {
    std::env::set_var("PLAYTEST_TRIALS_MAX_TURNS", "lots");

    let config = apply_env_overrides(PlaytestConfig::default());
    assert_eq!(config.trials.max_turns, 200);

    std::env::remove_var("PLAYTEST_TRIALS_MAX_TURNS");
}

#[test]
fn test_parse_config_toml() {
    let toml_content = r#"
[common]
seed = 1234
data_dir = "/custom/data"

[rules]
speed = 3
max_rounds = 20

[mcts]
iterations = 1000
reshuffle_interval = 10
playout = "greedy"

[trials]
trials = 100
"#;
    let config: PlaytestConfig = toml::from_str(toml_content).unwrap();
    assert_eq!(config.common.seed, 1234);
    assert_eq!(config.common.data_dir, "/custom/data");
    assert_eq!(config.rules.speed, 3);
    assert_eq!(config.rules.max_rounds, 20);
    assert_eq!(config.mcts.iterations, 1000);
    assert_eq!(config.mcts.reshuffle_interval, 10);
    assert_eq!(config.mcts.playout, "greedy");
    assert_eq!(config.trials.trials, 100);
}

#[test]
fn test_partial_config() {
    let toml_content = r#"
[rules]
target_score = 15
"#;
    let config: PlaytestConfig = toml::from_str(toml_content).unwrap();
    assert_eq!(config.rules.target_score, 15);
    assert_eq!(config.rules.speed, 2); // Default
    assert_eq!(config.common.log_level, "info"); // Default
    assert_eq!(config.mcts.reshuffle_interval, 20); // Default
}

#[test]
fn test_validate_rejects_bad_values() {
    let mut config = PlaytestConfig::default();
    config.mcts.reshuffle_interval = 0;
    assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

    let mut config = PlaytestConfig::default();
    config.mcts.playout = "random".to_string();
    assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

    let mut config = PlaytestConfig::default();
    config.rules.wild_chance = 1.5;
    assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

    let mut config = PlaytestConfig::default();
    config.rules.speed = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_load_from_path() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[rules]\ndeck_size = 12\n\n[trials]\nmax_turns = 50").unwrap();

    let config = load_from_path(file.path()).unwrap();
    assert_eq!(config.rules.deck_size, 12);
    assert_eq!(config.trials.max_turns, 50);
}

#[test]
fn test_load_from_path_errors() {
    let missing = std::path::Path::new("/definitely/not/here/config.toml");
    assert!(matches!(
        load_from_path(missing),
        Err(ConfigError::Read { .. })
    ));

    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[rules\nspeed = ").unwrap();
    let err = load_from_path(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().contains("Failed to parse"));

    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[trials]\ntrials = 0").unwrap();
    assert!(matches!(
        load_from_path(file.path()),
        Err(ConfigError::Invalid(_))
    ));
}

#[test]
fn test_config_serializes_back_to_toml() {
    let config = PlaytestConfig::default();
    let text = toml::to_string(&config).unwrap();
    let parsed: PlaytestConfig = toml::from_str(&text).unwrap();
    assert_eq!(config, parsed);
}
