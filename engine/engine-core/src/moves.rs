//! Structured moves accepted by a rule engine.

use crate::cards::TokenKind;
use crate::codec::CodecError;
use crate::state::Position;
use hex_grid::{Path, Sector};
use std::fmt;

/// A move, either decoded from an action id or built directly by rules.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Move {
    /// Follow `path` from the ship's cell.
    MoveTo(Path),
    /// Play the card in hand `slot`, choosing its token option `option`.
    PlayCard { slot: usize, option: usize },
    /// Draw the top card of `zone`'s deck, discarding hand `discard` first.
    DrawCard { zone: Sector, discard: Option<usize> },
    /// Pick up the token in `slot` of the ship's cell.
    Collect { slot: usize },
    Pass,
}

impl Move {
    /// Build a `PlayCard` from a token key instead of an option index.
    pub fn play_token(position: &Position, slot: usize, kind: TokenKind) -> Result<Move, CodecError> {
        let card = position
            .hand_card(slot)
            .ok_or(CodecError::UnknownCard { slot })?;
        let option = position
            .catalog
            .options(card)
            .iter()
            .position(|&k| k == kind)
            .ok_or_else(|| {
                CodecError::UnknownToken(format!("{kind} is not an option of hand slot {slot}"))
            })?;
        Ok(Move::PlayCard { slot, option })
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, Move::Pass)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::MoveTo(path) => write!(f, "move {path}"),
            Move::PlayCard { slot, option } => write!(f, "play {slot}/{option}"),
            Move::DrawCard {
                zone,
                discard: None,
            } => write!(f, "draw {zone}"),
            Move::DrawCard {
                zone,
                discard: Some(slot),
            } => write!(f, "draw {zone} discard {slot}"),
            Move::Collect { slot } => write!(f, "collect {slot}"),
            Move::Pass => f.write_str("pass"),
        }
    }
}
