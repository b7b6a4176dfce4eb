//! Playout policies.
//!
//! A playout policy picks the next action below the expanded node. It sees
//! only legal action ids and the position they are legal in; applying the
//! chosen action is up to the search.

use engine_core::{ActionCodec, ActionId, Position, RuleEngine};
use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha20Rng;

use crate::config::PlayoutKind;

/// Trait for playout action choice.
///
/// Implementations could be:
/// - UniformPlayout: uniform over legal ids (the default)
/// - GreedyPlayout: epsilon-greedy one-step lookahead on the heuristic
pub trait PlayoutPolicy: Send + Sync + std::fmt::Debug {
    /// Choose one of `legal`, or None if it is empty.
    fn choose(
        &self,
        rules: &dyn RuleEngine,
        codec: &ActionCodec,
        position: &Position,
        legal: &[ActionId],
        rng: &mut ChaCha20Rng,
    ) -> Option<ActionId>;
}

/// Uniform choice over legal ids.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformPlayout;

impl UniformPlayout {
    pub fn new() -> Self {
        Self
    }
}

impl PlayoutPolicy for UniformPlayout {
    fn choose(
        &self,
        _rules: &dyn RuleEngine,
        _codec: &ActionCodec,
        _position: &Position,
        legal: &[ActionId],
        rng: &mut ChaCha20Rng,
    ) -> Option<ActionId> {
        legal.choose(rng).copied()
    }
}

/// Picks the action whose successor scores best: the terminal score if the
/// game ends there, the heuristic otherwise. With probability `epsilon` it
/// picks uniformly instead.
#[derive(Debug, Clone, Copy)]
pub struct GreedyPlayout {
    epsilon: f64,
}

impl GreedyPlayout {
    pub fn new(epsilon: f64) -> Self {
        Self {
            epsilon: epsilon.clamp(0.0, 1.0),
        }
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }
}

impl PlayoutPolicy for GreedyPlayout {
    fn choose(
        &self,
        rules: &dyn RuleEngine,
        codec: &ActionCodec,
        position: &Position,
        legal: &[ActionId],
        rng: &mut ChaCha20Rng,
    ) -> Option<ActionId> {
        if legal.is_empty() {
            return None;
        }
        if rng.gen_bool(self.epsilon) {
            return legal.choose(rng).copied();
        }

        let mut best: Option<(f32, ActionId)> = None;
        for &id in legal {
            let Ok(mv) = codec.decode(id, position) else {
                continue;
            };
            // Lookahead must not consume the playout's random stream.
            let mut probe = rng.clone();
            let Ok(next) = rules.apply(position, &mv, &mut probe) else {
                continue;
            };
            let score = rules
                .terminal_score(&next)
                .unwrap_or_else(|| rules.heuristic(&next));
            if best.map_or(true, |(top, _)| score > top) {
                best = Some((score, id));
            }
        }

        best.map(|(_, id)| id).or_else(|| legal.choose(rng).copied())
    }
}

impl PlayoutKind {
    /// Build the policy this kind names.
    pub fn build(self) -> Box<dyn PlayoutPolicy> {
        match self {
            PlayoutKind::Uniform => Box::new(UniformPlayout::new()),
            PlayoutKind::Greedy { epsilon } => Box::new(GreedyPlayout::new(epsilon)),
        }
    }
}
