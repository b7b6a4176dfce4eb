//! Trial statistics and the JSON summary.
//!
//! Outcomes are accumulated as trials finish and snapshotted into a
//! [`TrialSummary`], which is logged and written to disk.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::Path;
use std::time::Instant;
use tracing::debug;

use crate::trial::TrialOutcome;

/// Running totals over completed trials.
#[derive(Debug)]
pub struct TrialStats {
    env_id: String,
    trials: u32,
    wins: u32,
    total_score: u64,
    total_turns: u64,
    total_rounds: u64,
    /// Sum of per-trial mean search values
    total_search_value: f64,
    searches: u64,
    iterations: u64,
    start_time: Instant,
}

/// Serializable summary for JSON output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrialSummary {
    pub env_id: String,
    pub trials: u32,
    pub wins: u32,
    pub win_rate: f64,
    pub mean_score: f64,
    pub mean_turns: f64,
    pub mean_rounds: f64,
    pub mean_search_value: f64,
    pub searches: u64,
    pub iterations: u64,
    pub runtime_seconds: f64,
    pub timestamp: u64,
}

impl TrialStats {
    pub fn new(env_id: &str) -> Self {
        Self {
            env_id: env_id.to_string(),
            trials: 0,
            wins: 0,
            total_score: 0,
            total_turns: 0,
            total_rounds: 0,
            total_search_value: 0.0,
            searches: 0,
            iterations: 0,
            start_time: Instant::now(),
        }
    }

    /// Record a finished trial.
    pub fn record(&mut self, outcome: &TrialOutcome) {
        self.trials += 1;
        if outcome.won {
            self.wins += 1;
        }
        self.total_score += u64::from(outcome.score);
        self.total_turns += u64::from(outcome.turns);
        self.total_rounds += u64::from(outcome.rounds);
        self.total_search_value += f64::from(outcome.mean_search_value);
        self.searches += u64::from(outcome.searches);
        self.iterations += outcome.iterations;
    }

    /// Get a snapshot of current stats.
    pub fn summary(&self) -> TrialSummary {
        let per_trial = |total: f64| {
            if self.trials > 0 {
                total / self.trials as f64
            } else {
                0.0
            }
        };

        TrialSummary {
            env_id: self.env_id.clone(),
            trials: self.trials,
            wins: self.wins,
            win_rate: per_trial(self.wins as f64),
            mean_score: per_trial(self.total_score as f64),
            mean_turns: per_trial(self.total_turns as f64),
            mean_rounds: per_trial(self.total_rounds as f64),
            mean_search_value: per_trial(self.total_search_value),
            searches: self.searches,
            iterations: self.iterations,
            runtime_seconds: self.start_time.elapsed().as_secs_f64(),
            timestamp: std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0),
        }
    }
}

/// Write `summary` as JSON to `path` (atomic write-then-rename).
pub fn write_summary(summary: &TrialSummary, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .with_context(|| format!("creating {}", dir.display()))?;
    }

    let json = serde_json::to_string_pretty(summary).context("serializing trial summary")?;

    let mut temp_path = path.as_os_str().to_owned();
    temp_path.push(".tmp");
    let temp_path = Path::new(&temp_path);

    let mut file = fs::File::create(temp_path)
        .with_context(|| format!("creating {}", temp_path.display()))?;
    file.write_all(json.as_bytes())
        .with_context(|| format!("writing {}", temp_path.display()))?;

    if let Err(e) = fs::rename(temp_path, path) {
        let _ = fs::remove_file(temp_path);
        return Err(e).with_context(|| format!("renaming to {}", path.display()));
    }

    debug!("Wrote trial summary to {}", path.display());
    Ok(())
}
