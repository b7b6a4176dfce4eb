//! Voyage: the reference rule engine for the hex playtester
//!
//! Voyage is a solo game on the 169-cell hex board. A ship starts at home,
//! sails up to `speed` cells per move, draws cards from the deck of the
//! sector it is in, plays cards at the cells printed on them, and collects
//! tokens that boost card plays. The game ends when the score reaches the
//! target or the round limit runs out.
//!
//! The rules are deliberately small; they exist so the codec and search can
//! be exercised end to end against a real [`RuleEngine`].
//!
//! # Usage
//!
//! ```rust
//! use engine_core::{ActionCodec, RuleEngine};
//! use games_voyage::{RulesConfig, Voyage};
//! use hex_grid::HexGrid;
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha20Rng;
//! use std::sync::Arc;
//!
//! let grid = Arc::new(HexGrid::generate().unwrap());
//! let voyage = Voyage::new(grid.clone(), RulesConfig::default());
//! let codec = ActionCodec::new(grid);
//!
//! let mut rng = ChaCha20Rng::seed_from_u64(42);
//! let position = voyage.new_game(&mut rng).unwrap();
//! let pass = codec.layout().pass();
//! let mv = codec.decode(pass, &position).unwrap();
//! let next = voyage.apply(&position, &mv, &mut rng).unwrap();
//! assert_eq!(next.round, 1);
//! ```

mod config;
mod setup;

pub use config::RulesConfig;

use engine_core::{rules, ActionCodec, LayoutMetadata, Move, Position, RuleEngine, RuleError};
use hex_grid::{GridError, HexGrid};
use rand_chacha::ChaCha20Rng;
use std::sync::Arc;
use tracing::trace;

/// Environment identifier used in layout metadata and summaries.
pub const ENV_ID: &str = "voyage";

/// Points for playing any card.
const PLAY_POINTS: u32 = 1;

/// Extra points when the chosen token is spent from cargo.
const CARGO_BONUS: u32 = 2;

/// The Voyage rule engine. One instance per trial.
#[derive(Debug, Clone)]
pub struct Voyage {
    grid: Arc<HexGrid>,
    config: RulesConfig,
}

impl Voyage {
    pub fn new(grid: Arc<HexGrid>, config: RulesConfig) -> Self {
        Self { grid, config }
    }

    pub fn config(&self) -> &RulesConfig {
        &self.config
    }

    /// Shared handle to the board, for building a codec.
    pub fn grid_arc(&self) -> Arc<HexGrid> {
        Arc::clone(&self.grid)
    }

    /// Set up a new game. All randomness comes from `rng`.
    pub fn new_game(&self, rng: &mut ChaCha20Rng) -> Result<Position, GridError> {
        let catalog = setup::generate_catalog(&self.grid, &self.config, rng)?;
        Ok(setup::initial_position(
            &self.grid,
            &self.config,
            Arc::new(catalog),
            rng,
        ))
    }

    /// Score as a fraction of the target, capped below 1 unless reached.
    pub fn progress(&self, position: &Position) -> f32 {
        let target = self.config.target_score.max(1);
        if position.score >= target {
            1.0
        } else {
            position.score as f32 / target as f32
        }
    }

    fn end_round(&self, position: &mut Position, rng: &mut ChaCha20Rng) {
        position.round += 1;
        position.actions_this_round = 0;

        let interval = self.config.unlock_interval;
        if interval > 0 && position.round % interval == 0 {
            if let Some(deck) = position.decks.iter_mut().find(|d| !d.unlocked) {
                deck.unlocked = true;
                trace!(sector = %deck.sector, round = position.round, "Deck unlocked");
            }
        }

        setup::spawn_tokens(
            &self.grid,
            position,
            self.config.token_spawns_per_round,
            rng,
        );
    }
}

/// Layout metadata for Voyage's action space.
pub fn layout_metadata(codec: &ActionCodec) -> LayoutMetadata {
    codec
        .metadata(ENV_ID, "Voyage")
        .with_description("Solo hex voyage: sail, draw, collect tokens and play cards")
}

impl RuleEngine for Voyage {
    fn grid(&self) -> &HexGrid {
        &self.grid
    }

    fn apply(
        &self,
        position: &Position,
        mv: &Move,
        rng: &mut ChaCha20Rng,
    ) -> Result<Position, RuleError> {
        if self.terminal_score(position).is_some() {
            return Err(RuleError::GameOver);
        }
        if !rules::is_legal(&self.grid, position, mv) {
            return Err(RuleError::Illegal(mv.clone()));
        }

        let mut next = position.clone();
        match mv {
            Move::MoveTo(path) => {
                next.ship = rules::move_destination(&self.grid, position, path)
                    .ok_or_else(|| RuleError::Illegal(mv.clone()))?;
            }
            Move::PlayCard { slot, option } => {
                let card = next.hand.remove(*slot);
                let kind = next.catalog.options(card)[*option];
                next.score += PLAY_POINTS;
                if next.cargo_of(kind) > 0 {
                    next.cargo[kind.index()] -= 1;
                    next.score += CARGO_BONUS;
                }
                next.markers[next.ship] = next.markers[next.ship].saturating_add(1);
                next.discard.push(card);
            }
            Move::DrawCard { zone, discard } => {
                if let Some(slot) = discard {
                    let dropped = next.hand.remove(*slot);
                    next.discard.push(dropped);
                }
                if let Some(card) = next.deck_mut(*zone).draw() {
                    next.hand.push(card);
                }
            }
            Move::Collect { slot } => {
                if let Some(kind) = next.tokens[next.ship][*slot].take() {
                    next.cargo[kind.index()] = next.cargo[kind.index()].saturating_add(1);
                }
            }
            Move::Pass => {}
        }

        if mv.is_pass() {
            self.end_round(&mut next, rng);
        } else {
            next.actions_this_round += 1;
            if next.actions_this_round >= self.config.actions_per_round {
                self.end_round(&mut next, rng);
            }
        }

        Ok(next)
    }

    fn terminal_score(&self, position: &Position) -> Option<f32> {
        if position.score >= self.config.target_score {
            Some(1.0)
        } else if position.round >= self.config.max_rounds {
            Some(self.progress(position))
        } else {
            None
        }
    }

    /// Progress with half credit for each token in cargo.
    fn heuristic(&self, position: &Position) -> f32 {
        let target = self.config.target_score.max(1) as f32;
        let cargo: u32 = position.cargo.iter().map(|&c| c as u32).sum();
        let estimate = (position.score as f32 + 0.5 * cargo as f32) / target;
        estimate.clamp(0.0, 0.99)
    }
}

#[cfg(test)]
mod tests;
