//! Hidden-information resampling for the playout phase.
//!
//! Deck order below each visible top card is unknown to the player. The
//! search keeps one determinized view of the root position, a copy with
//! every hidden deck portion shuffled, and replaces it every `K` iterations.
//! Playouts reorder the hidden cards of the position they start from to
//! follow the current view. Tree statistics are never reset.

use engine_core::Position;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use tracing::trace;

/// Which determinization is current: how many resamples have happened and
/// the seed the resample stream started from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeterminizationEpoch {
    pub counter: u64,
    pub seed: u64,
}

/// Owns the resample schedule and the current determinized view.
#[derive(Debug, Clone)]
pub struct Determinizer {
    base: Position,
    view: Position,
    interval: u32,
    epoch: DeterminizationEpoch,
    rng: ChaCha20Rng,
    resamples: Vec<u32>,
}

impl Determinizer {
    /// Schedule resamples of `base` every `interval` iterations, drawing
    /// shuffles from a stream seeded with `seed`. An interval of zero is
    /// treated as one.
    pub fn new(base: &Position, interval: u32, seed: u64) -> Self {
        Self {
            base: base.clone(),
            view: base.clone(),
            interval: interval.max(1),
            epoch: DeterminizationEpoch { counter: 0, seed },
            rng: ChaCha20Rng::seed_from_u64(seed),
            resamples: Vec::new(),
        }
    }

    /// Called at the start of every iteration. Resamples when `iteration`
    /// is a multiple of the interval and reports whether it did.
    pub fn begin_iteration(&mut self, iteration: u32) -> bool {
        if iteration % self.interval != 0 {
            return false;
        }
        self.resample(iteration);
        true
    }

    fn resample(&mut self, iteration: u32) {
        let mut view = self.base.clone();
        view.resample_hidden(&mut self.rng);
        self.view = view;
        self.epoch.counter += 1;
        self.resamples.push(iteration);
        trace!(iteration, epoch = self.epoch.counter, "Hidden decks resampled");
    }

    /// The current determinized view of the root position.
    pub fn view(&self) -> &Position {
        &self.view
    }

    pub fn epoch(&self) -> DeterminizationEpoch {
        self.epoch
    }

    pub fn interval(&self) -> u32 {
        self.interval
    }

    /// Iteration indices at which a resample happened, in order.
    pub fn resample_iterations(&self) -> &[u32] {
        &self.resamples
    }

    /// A copy of `position` whose hidden deck order follows the current view.
    pub fn determinize(&self, position: &Position) -> Position {
        let mut determinized = position.clone();
        determinized.align_hidden_to(&self.view);
        determinized
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_core::{CardCatalog, CardId};
    use hex_grid::{HexGrid, Sector};
    use std::sync::Arc;

    fn base() -> Position {
        let grid = HexGrid::generate().unwrap();
        let mut pos = Position::new(&grid, Arc::new(CardCatalog::empty()), 2);
        let a = pos.deck_mut(Sector::A);
        a.cards = (0..10).map(CardId).collect();
        a.unlocked = true;
        let b = pos.deck_mut(Sector::B);
        b.cards = (10..18).map(CardId).collect();
        b.unlocked = true;
        pos
    }

    fn sorted(cards: &[CardId]) -> Vec<CardId> {
        let mut cards = cards.to_vec();
        cards.sort();
        cards
    }

    #[test]
    fn test_resample_schedule() {
        let mut det = Determinizer::new(&base(), 20, 7);
        let fired: Vec<u32> = (0..100).filter(|&i| det.begin_iteration(i)).collect();
        assert_eq!(fired, vec![0, 20, 40, 60, 80]);
        assert_eq!(det.resample_iterations(), &[0, 20, 40, 60, 80]);
        assert_eq!(det.epoch(), DeterminizationEpoch { counter: 5, seed: 7 });
    }

    #[test]
    fn test_zero_interval_resamples_every_iteration() {
        let mut det = Determinizer::new(&base(), 0, 1);
        assert_eq!(det.interval(), 1);
        assert!((0..5).all(|i| det.begin_iteration(i)));
    }

    #[test]
    fn test_resample_preserves_deck_contents() {
        let base = base();
        let mut det = Determinizer::new(&base, 1, 3);
        let mut reordered = false;

        for i in 0..8 {
            det.begin_iteration(i);
            for (seen, original) in det.view().decks.iter().zip(&base.decks) {
                assert_eq!(seen.len(), original.len());
                assert_eq!(seen.top(), original.top());
                assert_eq!(sorted(&seen.cards), sorted(&original.cards));
                reordered |= seen.cards != original.cards;
            }
        }
        assert!(reordered);
    }

    #[test]
    fn test_same_seed_same_views() {
        let mut a = Determinizer::new(&base(), 1, 99);
        let mut b = Determinizer::new(&base(), 1, 99);
        for i in 0..4 {
            a.begin_iteration(i);
            b.begin_iteration(i);
            assert_eq!(a.view().decks, b.view().decks);
        }
    }

    #[test]
    fn test_determinize_follows_view() {
        let base = base();
        let mut det = Determinizer::new(&base, 1, 5);
        det.begin_iteration(0);

        // A descendant that drew the top of deck A.
        let mut later = base.clone();
        later.deck_mut(Sector::A).draw();

        let determinized = det.determinize(&later);
        let deck = determinized.deck(Sector::A);
        let view = det.view().deck(Sector::A);
        assert_eq!(deck.top(), later.deck(Sector::A).top());
        assert_eq!(sorted(&deck.cards), sorted(&later.deck(Sector::A).cards));

        // Hidden cards keep the view's relative order.
        let expected: Vec<CardId> = view
            .cards
            .iter()
            .copied()
            .filter(|id| deck.hidden().contains(id))
            .collect();
        assert_eq!(deck.hidden(), expected.as_slice());
    }
}
