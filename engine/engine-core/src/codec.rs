//! Action codec: a dense integer action space over [`Move`]s.
//!
//! # Layout
//!
//! With `H` board cells, hand size `S` and token-option cap `T`:
//!
//! | ids                         | meaning                                    |
//! |-----------------------------|--------------------------------------------|
//! | `[0, H)`                    | move to cell `i` (cells in name order)     |
//! | `H + k·T + j`               | play hand slot `k` with token option `j`   |
//! | `H + S·T`                   | draw, no discard                           |
//! | next `S` ids                | draw, discarding hand slot `k` first       |
//! | next 2 ids                  | collect from token slot 0 / 1              |
//! | last id                     | pass                                       |
//!
//! The standard board gives `H = 169`, `S = 5`, `T = 4`, so `N = 198`. Cell
//! order is the lexicographic order of cell names, fixed when the codec is
//! built. The layout is the contract external trainers rely on.

use crate::cards::TOKEN_OPTIONS;
use crate::metadata::LayoutMetadata;
use crate::moves::Move;
use crate::rules;
use crate::state::{Position, HAND_SIZE, TOKEN_SLOTS};
use hex_grid::{CubeCoordinate, HexGrid};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Errors from encoding or decoding actions.
///
/// All of these mean "this proposal is rejected"; none is fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("Action id {id} is out of range [0, {len})")]
    InvalidActionId { id: u32, len: usize },

    #[error("Invalid move: {0}")]
    InvalidMove(String),

    #[error("Unknown token: {0}")]
    UnknownToken(String),

    #[error("No card in hand slot {slot}")]
    UnknownCard { slot: usize },

    #[error("Move leaves the board at {0}")]
    OffBoard(CubeCoordinate),
}

/// Integer id of an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionId(pub u32);

impl ActionId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for ActionId {
    fn from(id: u32) -> Self {
        ActionId(id)
    }
}

/// Id ranges of the action space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionLayout {
    cells: u32,
    hand_size: u32,
    token_options: u32,
}

impl ActionLayout {
    pub const fn new(cells: usize, hand_size: usize, token_options: usize) -> Self {
        Self {
            cells: cells as u32,
            hand_size: hand_size as u32,
            token_options: token_options as u32,
        }
    }

    /// Layout for a board of `cells` cells with the game's hand and option caps.
    pub const fn for_cells(cells: usize) -> Self {
        Self::new(cells, HAND_SIZE, TOKEN_OPTIONS)
    }

    #[inline]
    pub fn moves(&self) -> Range<u32> {
        0..self.cells
    }

    #[inline]
    pub fn plays(&self) -> Range<u32> {
        let start = self.moves().end;
        start..start + self.hand_size * self.token_options
    }

    #[inline]
    pub fn draw(&self) -> ActionId {
        ActionId(self.plays().end)
    }

    #[inline]
    pub fn draw_discards(&self) -> Range<u32> {
        let start = self.draw().0 + 1;
        start..start + self.hand_size
    }

    #[inline]
    pub fn collects(&self) -> Range<u32> {
        let start = self.draw_discards().end;
        start..start + TOKEN_SLOTS as u32
    }

    #[inline]
    pub fn pass(&self) -> ActionId {
        ActionId(self.collects().end)
    }

    /// Total number of ids, `N`.
    #[inline]
    pub fn len(&self) -> usize {
        self.pass().index() + 1
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    #[inline]
    pub fn cells(&self) -> usize {
        self.cells as usize
    }

    #[inline]
    pub fn hand_size(&self) -> usize {
        self.hand_size as usize
    }

    #[inline]
    pub fn token_options(&self) -> usize {
        self.token_options as usize
    }

    pub fn play_id(&self, slot: usize, option: usize) -> ActionId {
        ActionId(self.plays().start + slot as u32 * self.token_options + option as u32)
    }

    pub fn draw_discard_id(&self, slot: usize) -> ActionId {
        ActionId(self.draw_discards().start + slot as u32)
    }

    pub fn collect_id(&self, slot: usize) -> ActionId {
        ActionId(self.collects().start + slot as u32)
    }
}

/// One flag per action id, computed for a single position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegalityMask {
    bits: Vec<bool>,
}

impl LegalityMask {
    fn new(len: usize) -> Self {
        Self {
            bits: vec![false; len],
        }
    }

    #[inline]
    fn set(&mut self, id: u32, legal: bool) {
        self.bits[id as usize] = legal;
    }

    /// False for ids outside the action space.
    #[inline]
    pub fn is_legal(&self, id: ActionId) -> bool {
        self.bits.get(id.index()).copied().unwrap_or(false)
    }

    pub fn legal_ids(&self) -> Vec<ActionId> {
        self.bits
            .iter()
            .enumerate()
            .filter(|&(_, &legal)| legal)
            .map(|(i, _)| ActionId(i as u32))
            .collect()
    }

    pub fn count(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    /// True when no action is legal.
    pub fn is_empty(&self) -> bool {
        !self.bits.iter().any(|&b| b)
    }

    /// Size of the action space.
    #[inline]
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    #[inline]
    pub fn as_slice(&self) -> &[bool] {
        &self.bits
    }
}

/// Bijection between [`Move`]s and [`ActionId`]s for one board.
#[derive(Debug, Clone)]
pub struct ActionCodec {
    grid: Arc<HexGrid>,
    layout: ActionLayout,
    /// Move slot -> grid index.
    order: Vec<usize>,
    /// Grid index -> move slot.
    rank: Vec<u32>,
}

impl ActionCodec {
    pub fn new(grid: Arc<HexGrid>) -> Self {
        let mut order: Vec<usize> = (0..grid.len()).collect();
        order.sort_by(|&a, &b| grid.cell(a).name().cmp(grid.cell(b).name()));

        let mut rank = vec![0u32; grid.len()];
        for (slot, &cell) in order.iter().enumerate() {
            rank[cell] = slot as u32;
        }

        let layout = ActionLayout::for_cells(grid.len());
        debug!(
            cells = grid.len(),
            actions = layout.len(),
            "Fixed action cell order"
        );

        Self {
            layout,
            grid,
            order,
            rank,
        }
    }

    #[inline]
    pub fn layout(&self) -> &ActionLayout {
        &self.layout
    }

    #[inline]
    pub fn grid(&self) -> &HexGrid {
        &self.grid
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.layout.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.layout.is_empty()
    }

    /// Move id of grid cell `cell`.
    pub fn move_id(&self, cell: usize) -> Option<ActionId> {
        self.rank.get(cell).map(|&slot| ActionId(slot))
    }

    /// Grid cell targeted by a move id.
    pub fn move_target(&self, id: ActionId) -> Option<usize> {
        if self.layout.moves().contains(&id.0) {
            Some(self.order[id.index()])
        } else {
            None
        }
    }

    /// Cell names in move-id order.
    pub fn cell_names(&self) -> Vec<String> {
        self.order
            .iter()
            .map(|&cell| self.grid.cell(cell).name().to_string())
            .collect()
    }

    /// Serialisable description of this codec's layout.
    pub fn metadata(
        &self,
        env_id: impl Into<String>,
        display_name: impl Into<String>,
    ) -> LayoutMetadata {
        LayoutMetadata::new(env_id, display_name)
            .with_layout(&self.layout)
            .with_cells(self.cell_names())
    }

    /// Id of `mv` from `position`.
    ///
    /// Checks that the move is representable and that what it references
    /// exists (hand card, token option, token). It does not check legality.
    pub fn encode(&self, mv: &Move, position: &Position) -> Result<ActionId, CodecError> {
        let layout = &self.layout;
        match mv {
            Move::MoveTo(path) => {
                let from = self.grid.cell(position.ship).coord();
                let to = path.apply(from);
                let target = self.grid.index_at(to).ok_or(CodecError::OffBoard(to))?;
                if target == position.ship {
                    return Err(CodecError::InvalidMove(format!(
                        "path {path} ends where it starts"
                    )));
                }
                Ok(ActionId(self.rank[target]))
            }
            Move::PlayCard { slot, option } => {
                let card = position
                    .hand_card(*slot)
                    .ok_or(CodecError::UnknownCard { slot: *slot })?;
                if *option >= position.catalog.options(card).len() {
                    return Err(CodecError::UnknownToken(format!(
                        "hand slot {slot} has no token option {option}"
                    )));
                }
                Ok(layout.play_id(*slot, *option))
            }
            Move::DrawCard { zone, discard } => {
                if rules::current_zone(&self.grid, position) != Some(*zone) {
                    return Err(CodecError::InvalidMove(format!(
                        "ship is not in sector {zone}"
                    )));
                }
                match discard {
                    None => Ok(layout.draw()),
                    Some(slot) if *slot < position.hand.len() => Ok(layout.draw_discard_id(*slot)),
                    Some(slot) => Err(CodecError::UnknownCard { slot: *slot }),
                }
            }
            Move::Collect { slot } => {
                if *slot >= TOKEN_SLOTS {
                    return Err(CodecError::InvalidMove(format!("no token slot {slot}")));
                }
                if position.token_at(position.ship, *slot).is_none() {
                    return Err(CodecError::UnknownToken(format!(
                        "token slot {slot} of the ship's cell is empty"
                    )));
                }
                Ok(layout.collect_id(*slot))
            }
            Move::Pass => Ok(layout.pass()),
        }
    }

    /// Move for `id` from `position`.
    ///
    /// Move ids synthesize a greedy shortest path limited to the current
    /// speed; a target beyond speed is rejected rather than truncated, since
    /// a truncated path would land on a different cell.
    pub fn decode(&self, id: ActionId, position: &Position) -> Result<Move, CodecError> {
        let layout = &self.layout;
        let raw = id.0;

        if id.index() >= layout.len() {
            return Err(CodecError::InvalidActionId {
                id: raw,
                len: layout.len(),
            });
        }

        if layout.moves().contains(&raw) {
            let target = self.order[id.index()];
            let from = self.grid.cell(position.ship).coord();
            let to = self.grid.cell(target).coord();
            let d = self.grid.distance(from, to);
            if d == 0 {
                return Err(CodecError::InvalidMove(format!(
                    "ship is already at {}",
                    self.grid.cell(target).name()
                )));
            }
            if d > position.speed {
                return Err(CodecError::InvalidMove(format!(
                    "{} is {d} steps away, speed is {}",
                    self.grid.cell(target).name(),
                    position.speed
                )));
            }
            let path = self
                .grid
                .shortest_path(from, to, position.speed)
                .map_err(|e| CodecError::InvalidMove(e.to_string()))?;
            return Ok(Move::MoveTo(path));
        }

        if layout.plays().contains(&raw) {
            let offset = (raw - layout.plays().start) as usize;
            let slot = offset / layout.token_options();
            let option = offset % layout.token_options();
            let card = position
                .hand_card(slot)
                .ok_or(CodecError::UnknownCard { slot })?;
            if option >= position.catalog.options(card).len() {
                return Err(CodecError::UnknownToken(format!(
                    "hand slot {slot} has no token option {option}"
                )));
            }
            return Ok(Move::PlayCard { slot, option });
        }

        if id == layout.draw() || layout.draw_discards().contains(&raw) {
            let zone = rules::current_zone(&self.grid, position).ok_or_else(|| {
                CodecError::InvalidMove("there is no deck on the home cell".to_string())
            })?;
            if id == layout.draw() {
                return Ok(Move::DrawCard {
                    zone,
                    discard: None,
                });
            }
            let slot = (raw - layout.draw_discards().start) as usize;
            if slot >= position.hand.len() {
                return Err(CodecError::UnknownCard { slot });
            }
            return Ok(Move::DrawCard {
                zone,
                discard: Some(slot),
            });
        }

        if layout.collects().contains(&raw) {
            let slot = (raw - layout.collects().start) as usize;
            if position.token_at(position.ship, slot).is_none() {
                return Err(CodecError::UnknownToken(format!(
                    "token slot {slot} of the ship's cell is empty"
                )));
            }
            return Ok(Move::Collect { slot });
        }

        Ok(Move::Pass)
    }

    /// Legality of every id at `position`, from the shared predicates.
    pub fn legality_mask(&self, position: &Position) -> LegalityMask {
        let layout = &self.layout;
        let mut mask = LegalityMask::new(layout.len());

        for id in layout.moves() {
            mask.set(id, rules::can_move_to(&self.grid, position, self.order[id as usize]));
        }

        for slot in 0..layout.hand_size() {
            for option in 0..layout.token_options() {
                mask.set(
                    layout.play_id(slot, option).0,
                    rules::can_play(position, slot, option),
                );
            }
        }

        if let Some(zone) = rules::current_zone(&self.grid, position) {
            mask.set(
                layout.draw().0,
                rules::can_draw(&self.grid, position, zone, None),
            );
            for slot in 0..layout.hand_size() {
                mask.set(
                    layout.draw_discard_id(slot).0,
                    rules::can_draw(&self.grid, position, zone, Some(slot)),
                );
            }
        }

        for slot in 0..TOKEN_SLOTS {
            mask.set(
                layout.collect_id(slot).0,
                rules::can_collect(&self.grid, position, slot),
            );
        }

        mask.set(layout.pass().0, true);
        mask
    }
}
