//! Player state touched by the resolution core.
use serde::{Deserialize, Serialize};

use crate::board::SquareId;

/// Ownership record linking a player to a square.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnedProperty {
    pub square_id: SquareId,
    #[serde(default)]
    pub mortgaged: bool,
    /// Purchase price as recorded on the deed; used when the square carries none.
    #[serde(default)]
    pub price: Option<i64>,
}

impl OwnedProperty {
    #[must_use]
    pub const fn new(square_id: SquareId) -> Self {
        Self {
            square_id,
            mortgaged: false,
            price: None,
        }
    }

    #[must_use]
    pub const fn mortgaged(mut self) -> Self {
        self.mortgaged = true;
        self
    }

    #[must_use]
    pub const fn with_price(mut self, price: i64) -> Self {
        self.price = Some(price);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    /// Index on the track, always kept in `[0, board size)`.
    pub position: usize,
    /// Cash on hand; may go negative, bankruptcy is decided elsewhere.
    pub money: i64,
    #[serde(default)]
    pub properties: Vec<OwnedProperty>,
    #[serde(default)]
    pub in_jail: bool,
    #[serde(default)]
    pub jail_turns: u8,
}

impl Player {
    #[must_use]
    pub fn new(name: impl Into<String>, money: i64) -> Self {
        Self {
            name: name.into(),
            money,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn at(mut self, position: usize) -> Self {
        self.position = position;
        self
    }

    #[must_use]
    pub fn owning(mut self, property: OwnedProperty) -> Self {
        self.properties.push(property);
        self
    }

    #[must_use]
    pub fn property(&self, square_id: SquareId) -> Option<&OwnedProperty> {
        self.properties.iter().find(|p| p.square_id == square_id)
    }

    pub fn property_mut(&mut self, square_id: SquareId) -> Option<&mut OwnedProperty> {
        self.properties.iter_mut().find(|p| p.square_id == square_id)
    }

    #[must_use]
    pub fn owns(&self, square_id: SquareId) -> bool {
        self.property(square_id).is_some()
    }

    /// Jail transition: flags the player as jailed and restarts the jail clock.
    /// Relocating the token is the mover's job.
    pub const fn go_to_jail(&mut self) {
        self.in_jail = true;
        self.jail_turns = 0;
    }

    pub const fn adjust_money(&mut self, delta: i64) {
        self.money = self.money.saturating_add(delta);
    }
}
