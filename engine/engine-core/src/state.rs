//! Game position: everything the rules read and mutate.

use crate::cards::{CardCatalog, CardId, TokenKind};
use hex_grid::{HexGrid, Sector};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;
use std::sync::Arc;

/// Hand size limit.
pub const HAND_SIZE: usize = 5;

/// Token slots tracked per cell. Only the home cell uses the second one.
pub const TOKEN_SLOTS: usize = 2;

/// One face-down deck per sector.
///
/// `cards[0]` is the visible top card; everything below it is hidden and
/// may be resampled by search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    pub sector: Sector,
    pub cards: Vec<CardId>,
    pub unlocked: bool,
}

impl Deck {
    pub fn new(sector: Sector) -> Self {
        Self {
            sector,
            cards: Vec::new(),
            unlocked: false,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn top(&self) -> Option<CardId> {
        self.cards.first().copied()
    }

    /// Cards below the visible top.
    pub fn hidden(&self) -> &[CardId] {
        self.cards.get(1..).unwrap_or(&[])
    }

    /// Remove and return the top card.
    pub fn draw(&mut self) -> Option<CardId> {
        if self.cards.is_empty() {
            None
        } else {
            Some(self.cards.remove(0))
        }
    }
}

/// A full game position.
///
/// Positions are plain values: search clones them freely to branch into
/// hypothetical futures. Only the catalog is shared, and it is immutable.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub catalog: Arc<CardCatalog>,
    /// Grid index of the ship's cell.
    pub ship: usize,
    pub speed: u32,
    pub hand: Vec<CardId>,
    /// Indexed by [`Sector::index`].
    pub decks: Vec<Deck>,
    pub discard: Vec<CardId>,
    /// Indexed by grid cell.
    pub tokens: Vec<[Option<TokenKind>; TOKEN_SLOTS]>,
    /// Indexed by grid cell.
    pub markers: Vec<u8>,
    /// Indexed by [`TokenKind::index`].
    pub cargo: [u8; 5],
    pub score: u32,
    pub round: u32,
    pub actions_this_round: u32,
}

impl Position {
    /// Empty position: ship at home, empty hand, six locked empty decks.
    pub fn new(grid: &HexGrid, catalog: Arc<CardCatalog>, speed: u32) -> Self {
        Self {
            catalog,
            ship: grid.home_index(),
            speed,
            hand: Vec::with_capacity(HAND_SIZE),
            decks: Sector::ALL.into_iter().map(Deck::new).collect(),
            discard: Vec::new(),
            tokens: vec![[None; TOKEN_SLOTS]; grid.len()],
            markers: vec![0; grid.len()],
            cargo: [0; 5],
            score: 0,
            round: 0,
            actions_this_round: 0,
        }
    }

    #[inline]
    pub fn hand_is_full(&self) -> bool {
        self.hand.len() >= HAND_SIZE
    }

    #[inline]
    pub fn deck(&self, sector: Sector) -> &Deck {
        &self.decks[sector.index()]
    }

    #[inline]
    pub fn deck_mut(&mut self, sector: Sector) -> &mut Deck {
        &mut self.decks[sector.index()]
    }

    pub fn hand_card(&self, slot: usize) -> Option<CardId> {
        self.hand.get(slot).copied()
    }

    pub fn token_at(&self, cell: usize, slot: usize) -> Option<TokenKind> {
        self.tokens.get(cell).and_then(|slots| slots.get(slot).copied().flatten())
    }

    /// Put a token in an empty slot. Returns false if the slot does not
    /// exist on that cell or is occupied.
    pub fn place_token(&mut self, grid: &HexGrid, cell: usize, slot: usize, kind: TokenKind) -> bool {
        let Some(hex) = grid.get(cell) else {
            return false;
        };
        if slot >= hex.token_slots() as usize {
            return false;
        }
        let entry = &mut self.tokens[cell][slot];
        if entry.is_some() {
            return false;
        }
        *entry = Some(kind);
        true
    }

    #[inline]
    pub fn cargo_of(&self, kind: TokenKind) -> u8 {
        self.cargo[kind.index()]
    }

    /// Number of cards in hand, decks and discard. Constant over a game.
    pub fn card_count(&self) -> usize {
        self.hand.len() + self.discard.len() + self.decks.iter().map(Deck::len).sum::<usize>()
    }

    /// Shuffle the hidden part of every deck. The visible top card and the
    /// multiset of hidden cards stay the same.
    pub fn resample_hidden<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for deck in &mut self.decks {
            if deck.cards.len() > 2 {
                deck.cards[1..].shuffle(rng);
            }
        }
    }

    /// Reorder each deck's hidden cards to follow their order in `view`.
    ///
    /// Hidden cards that `view` does not hold in the same deck keep their
    /// current relative order and go after the aligned ones. Deck contents
    /// never change, only their order.
    pub fn align_hidden_to(&mut self, view: &Position) {
        for (deck, seen) in self.decks.iter_mut().zip(&view.decks) {
            if deck.cards.len() <= 2 {
                continue;
            }
            let hidden: Vec<CardId> = deck.cards[1..].to_vec();
            let mut remaining: HashSet<CardId> = hidden.iter().copied().collect();

            let mut ordered = Vec::with_capacity(hidden.len());
            for id in &seen.cards {
                if remaining.remove(id) {
                    ordered.push(*id);
                }
            }
            ordered.extend(hidden.into_iter().filter(|id| remaining.contains(id)));

            deck.cards.truncate(1);
            deck.cards.extend(ordered);
        }
    }
}
