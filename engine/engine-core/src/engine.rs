//! The rule engine contract consumed by the codec and by search.

use crate::codec::CodecError;
use crate::moves::Move;
use crate::rules;
use crate::state::Position;
use hex_grid::HexGrid;
use rand_chacha::ChaCha20Rng;
use thiserror::Error;

/// Reasons a rule engine rejects a move.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("Illegal move: {0}")]
    Illegal(Move),

    #[error("Game is over")]
    GameOver,

    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// Rules of a game played on a [`HexGrid`].
///
/// Implementations must be pure with respect to the position they are given:
/// `apply` returns a new position and never touches shared state, so search
/// can branch many futures from one ancestor. The only randomness allowed is
/// drawn from the `rng` argument.
///
/// # Example
///
/// ```rust
/// # use engine_core::{Move, Position, RuleEngine, RuleError};
/// # use hex_grid::HexGrid;
/// # use rand_chacha::ChaCha20Rng;
/// #[derive(Debug)]
/// struct PassOnly {
///     grid: HexGrid,
/// }
///
/// impl RuleEngine for PassOnly {
///     fn grid(&self) -> &HexGrid {
///         &self.grid
///     }
///
///     fn apply(
///         &self,
///         position: &Position,
///         mv: &Move,
///         _rng: &mut ChaCha20Rng,
///     ) -> Result<Position, RuleError> {
///         if !mv.is_pass() {
///             return Err(RuleError::Illegal(mv.clone()));
///         }
///         let mut next = position.clone();
///         next.round += 1;
///         Ok(next)
///     }
///
///     fn terminal_score(&self, position: &Position) -> Option<f32> {
///         (position.round >= 3).then_some(0.0)
///     }
///
///     fn heuristic(&self, _position: &Position) -> f32 {
///         0.0
///     }
/// }
/// ```
pub trait RuleEngine: Send + Sync + std::fmt::Debug {
    /// Board the positions of this game live on.
    fn grid(&self) -> &HexGrid;

    /// Would `apply` accept `mv`? Must agree with the codec's mask, so the
    /// default delegates to [`rules::is_legal`].
    fn is_legal(&self, position: &Position, mv: &Move) -> bool {
        rules::is_legal(self.grid(), position, mv)
    }

    /// Apply `mv`, returning the successor position.
    ///
    /// Rejects illegal moves with [`RuleError::Illegal`] instead of
    /// silently ignoring them, and any move on a finished game with
    /// [`RuleError::GameOver`].
    fn apply(
        &self,
        position: &Position,
        mv: &Move,
        rng: &mut ChaCha20Rng,
    ) -> Result<Position, RuleError>;

    /// Final score in `[0, 1]` if the game is over.
    fn terminal_score(&self, position: &Position) -> Option<f32>;

    /// Estimated score in `[0, 1]` for a non-terminal position.
    fn heuristic(&self, position: &Position) -> f32;
}
