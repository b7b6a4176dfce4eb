//! Tokens, card icons and the shared card catalog.

use hex_grid::{GridError, HexGrid};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Maximum number of playable token options per card.
pub const TOKEN_OPTIONS: usize = 4;

/// Concrete token keys. Also the cargo slots of a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Amber,
    Cobalt,
    Jade,
    Pearl,
    Onyx,
}

impl TokenKind {
    pub const ALL: [TokenKind; 5] = [
        TokenKind::Amber,
        TokenKind::Cobalt,
        TokenKind::Jade,
        TokenKind::Pearl,
        TokenKind::Onyx,
    ];

    /// Substitutes a wildcard icon expands to, in option order.
    pub const WILD_SUBSTITUTES: [TokenKind; 4] = [
        TokenKind::Amber,
        TokenKind::Cobalt,
        TokenKind::Jade,
        TokenKind::Pearl,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn key(self) -> &'static str {
        match self {
            TokenKind::Amber => "amber",
            TokenKind::Cobalt => "cobalt",
            TokenKind::Jade => "jade",
            TokenKind::Pearl => "pearl",
            TokenKind::Onyx => "onyx",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for TokenKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TokenKind::ALL
            .into_iter()
            .find(|k| k.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown token '{s}'"))
    }
}

/// An icon printed on a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Icon {
    Token(TokenKind),
    Wild,
}

/// Playable token options implied by an icon list.
///
/// Wildcards expand to [`TokenKind::WILD_SUBSTITUTES`]. The result keeps the
/// first occurrence of each key and is cut to [`TOKEN_OPTIONS`] entries.
/// Encode, decode and the legality mask all read options through this one
/// function (cached per card by [`CardCatalog`]).
pub fn token_options(icons: &[Icon]) -> Vec<TokenKind> {
    let mut options = Vec::with_capacity(TOKEN_OPTIONS);
    let expanded = icons.iter().flat_map(|icon| match icon {
        Icon::Token(kind) => std::slice::from_ref(kind),
        Icon::Wild => &TokenKind::WILD_SUBSTITUTES[..],
    });
    for &kind in expanded {
        if options.len() == TOKEN_OPTIONS {
            break;
        }
        if !options.contains(&kind) {
            options.push(kind);
        }
    }
    options
}

/// Index of a card in its [`CardCatalog`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardId(pub u16);

impl CardId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A card definition. `location` names the cell where it can be played.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub key: String,
    pub location: String,
    pub icons: Vec<Icon>,
}

impl Card {
    pub fn new(key: impl Into<String>, location: impl Into<String>, icons: Vec<Icon>) -> Self {
        Self {
            key: key.into(),
            location: location.into(),
            icons,
        }
    }
}

/// Immutable set of cards used by one game, shared between positions.
///
/// Locations are resolved against the board once, and token options are
/// derived once, at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardCatalog {
    cards: Vec<Card>,
    cells: Vec<usize>,
    options: Vec<Vec<TokenKind>>,
}

impl CardCatalog {
    pub fn new(grid: &HexGrid, cards: Vec<Card>) -> Result<Self, GridError> {
        if cards.len() > u16::MAX as usize {
            return Err(GridError::Configuration(format!(
                "{} cards exceed the catalog capacity",
                cards.len()
            )));
        }

        let cells = cards
            .iter()
            .map(|card| {
                grid.index_of(&card.location).ok_or_else(|| {
                    GridError::Configuration(format!(
                        "card {} is located at unknown cell {}",
                        card.key, card.location
                    ))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let options = cards.iter().map(|card| token_options(&card.icons)).collect();

        Ok(Self {
            cards,
            cells,
            options,
        })
    }

    pub fn empty() -> Self {
        Self {
            cards: Vec::new(),
            cells: Vec::new(),
            options: Vec::new(),
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

    #[inline]
    pub fn card(&self, id: CardId) -> &Card {
        &self.cards[id.index()]
    }

    /// Grid index of the cell where `id` can be played.
    #[inline]
    pub fn location_of(&self, id: CardId) -> usize {
        self.cells[id.index()]
    }

    #[inline]
    pub fn options(&self, id: CardId) -> &[TokenKind] {
        &self.options[id.index()]
    }

    pub fn ids(&self) -> impl Iterator<Item = CardId> {
        (0..self.cards.len() as u16).map(CardId)
    }

    pub fn find(&self, key: &str) -> Option<CardId> {
        self.cards
            .iter()
            .position(|c| c.key == key)
            .map(|i| CardId(i as u16))
    }
}
