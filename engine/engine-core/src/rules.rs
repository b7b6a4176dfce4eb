//! Legality predicates.
//!
//! This module is the only place that decides whether a move is accepted.
//! Rule engines validate through [`is_legal`] and the action codec builds its
//! mask from the per-shape predicates below, so the two can never disagree.
//!
//! Terminal positions are not special-cased here; rule engines reject moves
//! on a finished game before consulting these predicates.

use crate::moves::Move;
use crate::state::{Position, HAND_SIZE};
use hex_grid::{HexGrid, Path, Sector};

/// Sector whose deck the ship can draw from. `None` on the home cell.
#[inline]
pub fn current_zone(grid: &HexGrid, position: &Position) -> Option<Sector> {
    grid.sector_of(position.ship)
}

/// Moving to grid cell `target` is allowed iff `0 < distance <= speed`.
pub fn can_move_to(grid: &HexGrid, position: &Position, target: usize) -> bool {
    let Some(to) = grid.get(target) else {
        return false;
    };
    let from = grid.cell(position.ship).coord();
    let d = grid.distance(from, to.coord());
    d > 0 && d <= position.speed
}

/// Destination of `path` if following it is a legal move.
pub fn move_destination(grid: &HexGrid, position: &Position, path: &Path) -> Option<usize> {
    if path.len() as u32 > position.speed {
        return None;
    }
    let from = grid.cell(position.ship).coord();
    let to = grid.resolve_path(from, path).ok()?;
    let target = grid.index_at(to)?;
    can_move_to(grid, position, target).then_some(target)
}

/// The card in `slot` is played at its own location with an existing option.
pub fn can_play(position: &Position, slot: usize, option: usize) -> bool {
    match position.hand_card(slot) {
        Some(card) => {
            position.catalog.location_of(card) == position.ship
                && option < position.catalog.options(card).len()
        }
        None => false,
    }
}

/// Drawing from `zone`, optionally discarding hand `discard` first.
///
/// The ship must be in `zone`, whose deck must be unlocked and non-empty. A
/// plain draw needs room in hand; a discard-draw needs a full hand.
pub fn can_draw(grid: &HexGrid, position: &Position, zone: Sector, discard: Option<usize>) -> bool {
    if current_zone(grid, position) != Some(zone) {
        return false;
    }
    let deck = position.deck(zone);
    if !deck.unlocked || deck.is_empty() {
        return false;
    }
    match discard {
        None => position.hand.len() < HAND_SIZE,
        Some(slot) => position.hand.len() == HAND_SIZE && slot < position.hand.len(),
    }
}

/// A token sits in `slot` of the ship's cell.
pub fn can_collect(grid: &HexGrid, position: &Position, slot: usize) -> bool {
    slot < grid.cell(position.ship).token_slots() as usize
        && position.token_at(position.ship, slot).is_some()
}

/// Whole-move legality, composed from the predicates above.
pub fn is_legal(grid: &HexGrid, position: &Position, mv: &Move) -> bool {
    match mv {
        Move::MoveTo(path) => move_destination(grid, position, path).is_some(),
        Move::PlayCard { slot, option } => can_play(position, *slot, *option),
        Move::DrawCard { zone, discard } => can_draw(grid, position, *zone, *discard),
        Move::Collect { slot } => can_collect(grid, position, *slot),
        Move::Pass => true,
    }
}
