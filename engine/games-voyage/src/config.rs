//! Rule parameters.

use serde::{Deserialize, Serialize};

/// Tunable rule parameters for one game.
///
/// Owned by the [`Voyage`](crate::Voyage) instance built for a trial; there
/// is no process-wide rules table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Maximum hex distance per move.
    pub speed: u32,
    pub max_rounds: u32,
    /// Non-pass actions before the round ends on its own.
    pub actions_per_round: u32,
    pub target_score: u32,
    /// Cards per sector deck.
    pub deck_size: usize,
    pub starting_hand: usize,
    /// Sectors whose decks start unlocked, in sector order.
    pub initially_unlocked: usize,
    /// Rounds between deck unlocks. Zero disables unlocking.
    pub unlock_interval: u32,
    pub token_spawns_per_round: usize,
    /// Probability that a card icon is a wildcard.
    pub wild_chance: f64,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            speed: 2,
            max_rounds: 12,
            actions_per_round: 3,
            target_score: 10,
            deck_size: 8,
            starting_hand: 3,
            initially_unlocked: 2,
            unlock_interval: 2,
            token_spawns_per_round: 2,
            wild_chance: 0.2,
        }
    }
}

impl RulesConfig {
    /// Builder method for speed
    pub fn with_speed(mut self, speed: u32) -> Self {
        self.speed = speed;
        self
    }

    /// Builder method for the game length
    pub fn with_rounds(mut self, max_rounds: u32, actions_per_round: u32) -> Self {
        self.max_rounds = max_rounds;
        self.actions_per_round = actions_per_round;
        self
    }

    /// Builder method for the winning score
    pub fn with_target(mut self, target_score: u32) -> Self {
        self.target_score = target_score;
        self
    }
}
