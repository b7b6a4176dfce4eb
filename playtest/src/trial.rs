//! One playtest trial: a full Voyage game where every action comes from a
//! fresh determinized search.

use anyhow::{Context, Result};
use engine_core::{ActionCodec, RuleEngine};
use games_voyage::Voyage;
use hex_grid::HexGrid;
use mcts::MctsSearch;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::Settings;

/// What happened in one trial.
#[derive(Debug, Clone, PartialEq)]
pub struct TrialOutcome {
    pub seed: u64,
    pub won: bool,
    pub score: u32,
    pub turns: u32,
    pub rounds: u32,
    /// Terminal score, or the heuristic if the turn cap was hit.
    pub final_value: f32,
    /// Mean of the recommended actions' search values.
    pub mean_search_value: f32,
    pub searches: u32,
    pub iterations: u64,
}

/// Play one game from `seed` to the end or the turn cap.
///
/// Each trial owns its board, codec, rule engine and random stream.
pub fn run_trial(settings: &Settings, seed: u64) -> Result<TrialOutcome> {
    let grid = Arc::new(HexGrid::generate().context("generating the board")?);
    let voyage = Voyage::new(Arc::clone(&grid), settings.rules.clone());
    let codec = ActionCodec::new(grid);
    let mut rng = ChaCha20Rng::seed_from_u64(seed);

    let mut position = voyage
        .new_game(&mut rng)
        .context("setting up the game")?;

    let mut turns = 0;
    let mut searches = 0;
    let mut iterations = 0u64;
    let mut value_sum = 0.0f32;

    while turns < settings.max_turns && voyage.terminal_score(&position).is_none() {
        let mut search = MctsSearch::new(&voyage, &codec, settings.mcts.clone(), &position)
            .with_context(|| format!("starting search at turn {turns}"))?;
        let outcome = search
            .run(&mut rng)
            .with_context(|| format!("searching at turn {turns}"))?;
        iterations += u64::from(outcome.stats.iterations);

        // A zero budget yields no recommendation; passing is always legal.
        let action = match outcome.recommendation {
            Some(rec) => {
                searches += 1;
                value_sum += rec.value;
                rec.action
            }
            None => codec.layout().pass(),
        };

        let mv = codec
            .decode(action, &position)
            .with_context(|| format!("decoding action {action} at turn {turns}"))?;
        debug!(seed, turn = turns, action = action.0, %mv, "Applying recommended action");
        position = voyage
            .apply(&position, &mv, &mut rng)
            .with_context(|| format!("applying {mv} at turn {turns}"))?;
        turns += 1;
    }

    let terminal = voyage.terminal_score(&position);
    let outcome = TrialOutcome {
        seed,
        won: position.score >= voyage.config().target_score,
        score: position.score,
        turns,
        rounds: position.round,
        final_value: terminal.unwrap_or_else(|| voyage.heuristic(&position)),
        mean_search_value: if searches > 0 {
            value_sum / searches as f32
        } else {
            0.0
        },
        searches,
        iterations,
    };

    info!(
        seed = outcome.seed,
        won = outcome.won,
        score = outcome.score,
        turns = outcome.turns,
        rounds = outcome.rounds,
        final_value = outcome.final_value,
        "Trial finished"
    );
    Ok(outcome)
}
