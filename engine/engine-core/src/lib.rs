//! Core game model for the Voyage playtester
//!
//! This crate provides the pieces shared by every rule engine and by search:
//! - `Position`, `Deck`, cards and tokens: the game state model
//! - `Move`: structured moves a rule engine accepts
//! - `rules`: the single definition of move legality
//! - `RuleEngine`: the contract search consumes (legality, apply, terminal)
//! - `ActionCodec`: the bijection between moves and dense integer ids, plus
//!   the legality mask over that id space
//! - `LayoutMetadata`: serialisable description of the action-id layout

pub mod cards;
pub mod codec;
pub mod engine;
pub mod metadata;
pub mod moves;
pub mod rules;
pub mod state;

// Re-export main types for convenience
pub use cards::{token_options, Card, CardCatalog, CardId, Icon, TokenKind, TOKEN_OPTIONS};
pub use codec::{ActionCodec, ActionId, ActionLayout, CodecError, LegalityMask};
pub use engine::{RuleEngine, RuleError};
pub use metadata::LayoutMetadata;
pub use moves::Move;
pub use state::{Deck, Position, HAND_SIZE, TOKEN_SLOTS};
