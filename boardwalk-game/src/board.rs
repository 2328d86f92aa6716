//! Board squares and the backend board document.
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use crate::constants::{DEFAULT_BOARD_SIZE, JAIL_PATTERN};

pub type SquareId = u32;

static JAIL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(JAIL_PATTERN).expect("jail pattern is valid"));

/// True when `text` names the jail ("jail", "cárcel" or "carcel", any case).
#[must_use]
pub fn mentions_jail(text: &str) -> bool {
    JAIL_RE.is_match(text)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SquareKind {
    Property,
    Railroad,
    Utility,
    Special,
    Tax,
    #[default]
    #[serde(other)]
    Other,
}

impl SquareKind {
    /// Squares that can be owned, and therefore mortgaged.
    #[must_use]
    pub const fn is_ownable(self) -> bool {
        matches!(self, Self::Property | Self::Railroad | Self::Utility)
    }
}

/// A single square on the track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Square {
    pub id: SquareId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub price: Option<i64>,
    #[serde(default, alias = "mortgage", alias = "mortgageValue")]
    pub mortgage_value: Option<i64>,
    #[serde(default, rename = "type")]
    pub kind: SquareKind,
    #[serde(default)]
    pub description: Option<String>,
}

impl Square {
    #[must_use]
    pub fn new(id: SquareId, name: impl Into<String>, kind: SquareKind) -> Self {
        Self {
            id,
            name: name.into(),
            color: None,
            price: None,
            mortgage_value: None,
            kind,
            description: None,
        }
    }

    #[must_use]
    pub const fn with_price(mut self, price: i64) -> Self {
        self.price = Some(price);
        self
    }

    #[must_use]
    pub const fn with_mortgage_value(mut self, value: i64) -> Self {
        self.mortgage_value = Some(value);
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// The jail is a special square whose name matches the jail pattern.
    #[must_use]
    pub fn is_jail(&self) -> bool {
        self.kind == SquareKind::Special && mentions_jail(&self.name)
    }
}

#[derive(Debug, Error)]
pub enum BoardError {
    #[error("failed to parse board document: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("square id {0} appears more than once")]
    DuplicateSquareId(SquareId),
}

/// The board as delivered by the backend: squares by position plus the raw
/// card collections, which stay untyped until the catalog maps them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "BoardDocument")]
pub struct Board {
    pub squares: Vec<Square>,
    #[serde(default, rename = "chanceCards", skip_serializing_if = "Option::is_none")]
    pub chance_cards: Option<serde_json::Value>,
    #[serde(
        default,
        rename = "communityCards",
        skip_serializing_if = "Option::is_none"
    )]
    pub community_cards: Option<serde_json::Value>,
}

/// Wire shape of a board. Backends may send the track under several keys at
/// once; `squaresByPosition` wins, then `squares`, then `allSquares`.
#[derive(Deserialize)]
struct BoardDocument {
    #[serde(default, rename = "squaresByPosition")]
    squares_by_position: Option<Vec<Square>>,
    #[serde(default)]
    squares: Option<Vec<Square>>,
    #[serde(default, rename = "allSquares")]
    all_squares: Option<Vec<Square>>,
    #[serde(default, rename = "chanceCards")]
    chance_cards: Option<serde_json::Value>,
    #[serde(default, rename = "communityCards")]
    community_cards: Option<serde_json::Value>,
}

impl From<BoardDocument> for Board {
    fn from(doc: BoardDocument) -> Self {
        Self {
            squares: doc
                .squares_by_position
                .or(doc.squares)
                .or(doc.all_squares)
                .unwrap_or_default(),
            chance_cards: doc.chance_cards,
            community_cards: doc.community_cards,
        }
    }
}

impl Board {
    #[must_use]
    pub const fn from_squares(squares: Vec<Square>) -> Self {
        Self {
            squares,
            chance_cards: None,
            community_cards: None,
        }
    }

    /// Parse and validate a backend board document.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or square ids collide.
    pub fn from_json(json: &str) -> Result<Self, BoardError> {
        let board: Self = serde_json::from_str(json)?;
        board.validate()?;
        Ok(board)
    }

    /// Ensure square ids are unique so id lookups are unambiguous.
    ///
    /// # Errors
    ///
    /// Returns the first duplicated id.
    pub fn validate(&self) -> Result<(), BoardError> {
        let mut seen = HashSet::with_capacity(self.squares.len());
        for square in &self.squares {
            if !seen.insert(square.id) {
                return Err(BoardError::DuplicateSquareId(square.id));
            }
        }
        Ok(())
    }

    /// Track length, or `fallback` when the board exposes no squares.
    #[must_use]
    pub fn size_or(&self, fallback: usize) -> usize {
        if self.squares.is_empty() {
            fallback.max(1)
        } else {
            self.squares.len()
        }
    }

    /// Track length with the house fallback.
    #[must_use]
    pub fn size(&self) -> usize {
        self.size_or(DEFAULT_BOARD_SIZE)
    }

    #[must_use]
    pub fn square_at(&self, position: usize) -> Option<&Square> {
        self.squares.get(position)
    }

    #[must_use]
    pub fn square_by_id(&self, id: SquareId) -> Option<&Square> {
        self.squares.iter().find(|square| square.id == id)
    }

    /// Position of the first jail square, if the board has one.
    #[must_use]
    pub fn jail_position(&self) -> Option<usize> {
        self.squares.iter().position(Square::is_jail)
    }
}
