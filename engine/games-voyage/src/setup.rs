//! Procedural game setup: catalog, decks, tokens and the opening hand.

use crate::config::RulesConfig;
use engine_core::{Card, CardCatalog, CardId, Icon, Position, TokenKind, HAND_SIZE, TOKEN_SLOTS};
use hex_grid::{GridError, HexGrid, Sector};
use rand::seq::SliceRandom;
use rand::Rng;
use std::sync::Arc;

const MAX_ICONS: usize = 3;

/// Cards for every sector deck, in sector order. Card `i` of sector `s` gets
/// id `s * deck_size + i`.
pub(crate) fn generate_catalog<R: Rng + ?Sized>(
    grid: &HexGrid,
    config: &RulesConfig,
    rng: &mut R,
) -> Result<CardCatalog, GridError> {
    let mut cards = Vec::with_capacity(Sector::ALL.len() * config.deck_size);

    for sector in Sector::ALL {
        let cells: Vec<usize> = grid.cells_in_sector(sector).collect();
        for i in 0..config.deck_size {
            let cell = *cells.choose(rng).ok_or_else(|| {
                GridError::Configuration(format!("sector {sector} has no cells"))
            })?;
            let icons = (0..rng.gen_range(1..=MAX_ICONS))
                .map(|_| random_icon(rng, config.wild_chance))
                .collect();
            cards.push(Card::new(
                format!("{}{:02}", sector.letter(), i),
                grid.cell(cell).name(),
                icons,
            ));
        }
    }

    CardCatalog::new(grid, cards)
}

fn random_icon<R: Rng + ?Sized>(rng: &mut R, wild_chance: f64) -> Icon {
    if rng.gen_bool(wild_chance.clamp(0.0, 1.0)) {
        Icon::Wild
    } else {
        Icon::Token(TokenKind::ALL[rng.gen_range(0..TokenKind::ALL.len())])
    }
}

/// Fresh position: shuffled decks, opening unlocks, tokens and hand.
pub(crate) fn initial_position<R: Rng + ?Sized>(
    grid: &HexGrid,
    config: &RulesConfig,
    catalog: Arc<CardCatalog>,
    rng: &mut R,
) -> Position {
    let mut position = Position::new(grid, catalog, config.speed);

    for (s, sector) in Sector::ALL.into_iter().enumerate() {
        let first = (s * config.deck_size) as u16;
        let deck = position.deck_mut(sector);
        deck.cards = (first..first + config.deck_size as u16).map(CardId).collect();
        deck.cards.shuffle(rng);
        deck.unlocked = s < config.initially_unlocked;
    }

    spawn_tokens(grid, &mut position, config.token_spawns_per_round, rng);
    deal_hand(&mut position, config.starting_hand.min(HAND_SIZE));
    position
}

/// Draw `count` cards round-robin from the unlocked decks.
fn deal_hand(position: &mut Position, count: usize) {
    while position.hand.len() < count {
        let mut dealt = false;
        for deck in position.decks.iter_mut().filter(|d| d.unlocked) {
            if position.hand.len() >= count {
                break;
            }
            if let Some(card) = deck.draw() {
                position.hand.push(card);
                dealt = true;
            }
        }
        if !dealt {
            break;
        }
    }
}

/// Place up to `count` random tokens on distinct empty slots.
pub(crate) fn spawn_tokens<R: Rng + ?Sized>(
    grid: &HexGrid,
    position: &mut Position,
    count: usize,
    rng: &mut R,
) {
    if count == 0 {
        return;
    }
    let empty: Vec<(usize, usize)> = grid
        .cells()
        .iter()
        .enumerate()
        .flat_map(|(cell, hex)| {
            let slots = (hex.token_slots() as usize).min(TOKEN_SLOTS);
            (0..slots).map(move |slot| (cell, slot))
        })
        .filter(|&(cell, slot)| position.token_at(cell, slot).is_none())
        .collect();
    let picks: Vec<(usize, usize)> = empty.choose_multiple(rng, count).copied().collect();

    for (cell, slot) in picks {
        let kind = TokenKind::ALL[rng.gen_range(0..TokenKind::ALL.len())];
        position.place_token(grid, cell, slot, kind);
    }
}
