//! Tunable rules configuration.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cards::CardKind;
use crate::constants::{
    ALERT_MS_FUNDS, ALERT_MS_OWNERSHIP, CHANCE_ACCENT, CHANCE_LABEL, COMMUNITY_ACCENT,
    COMMUNITY_LABEL, DEFAULT_BOARD_SIZE, DEFAULT_PROPERTY_PRICE, PASS_START_BONUS,
    UNMORTGAGE_INTEREST_PCT,
};

/// Errors raised when rules configuration invariants are violated.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("fallback board size must be at least 1 (got {0})")]
    EmptyBoard(usize),
    #[error("{field} must not be negative (got {value})")]
    Negative { field: &'static str, value: i64 },
    #[error("deck style for {kind} needs a label")]
    MissingLabel { kind: CardKind },
}

/// Label and accent used when a card of one kind is put in front of the player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckStyle {
    pub label: String,
    pub accent: String,
}

impl DeckStyle {
    fn chance() -> Self {
        Self {
            label: CHANCE_LABEL.to_string(),
            accent: CHANCE_ACCENT.to_string(),
        }
    }

    fn community() -> Self {
        Self {
            label: COMMUNITY_LABEL.to_string(),
            accent: COMMUNITY_ACCENT.to_string(),
        }
    }
}

/// How long user-facing alerts stay visible, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertTimings {
    #[serde(default = "AlertTimings::default_ownership_ms")]
    pub ownership_ms: u32,
    #[serde(default = "AlertTimings::default_funds_ms")]
    pub funds_ms: u32,
}

impl AlertTimings {
    const fn default_ownership_ms() -> u32 {
        ALERT_MS_OWNERSHIP
    }

    const fn default_funds_ms() -> u32 {
        ALERT_MS_FUNDS
    }
}

impl Default for AlertTimings {
    fn default() -> Self {
        Self {
            ownership_ms: Self::default_ownership_ms(),
            funds_ms: Self::default_funds_ms(),
        }
    }
}

/// Rules knobs a host may override; every field falls back to the house defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RulesConfig {
    #[serde(default = "RulesConfig::default_fallback_board_size")]
    pub fallback_board_size: usize,
    #[serde(default = "RulesConfig::default_property_price")]
    pub default_property_price: i64,
    #[serde(default = "RulesConfig::default_interest_pct")]
    pub unmortgage_interest_pct: i64,
    #[serde(default = "RulesConfig::default_pass_start_bonus")]
    pub pass_start_bonus: i64,
    #[serde(default = "DeckStyle::chance")]
    pub chance: DeckStyle,
    #[serde(default = "DeckStyle::community")]
    pub community: DeckStyle,
    #[serde(default)]
    pub alerts: AlertTimings,
}

impl RulesConfig {
    const fn default_fallback_board_size() -> usize {
        DEFAULT_BOARD_SIZE
    }

    const fn default_property_price() -> i64 {
        DEFAULT_PROPERTY_PRICE
    }

    const fn default_interest_pct() -> i64 {
        UNMORTGAGE_INTEREST_PCT
    }

    const fn default_pass_start_bonus() -> i64 {
        PASS_START_BONUS
    }

    /// Parse a configuration document, filling omitted fields with defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Check the invariants the resolution core relies on.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fallback_board_size == 0 {
            return Err(ConfigError::EmptyBoard(self.fallback_board_size));
        }
        for (field, value) in [
            ("default_property_price", self.default_property_price),
            ("unmortgage_interest_pct", self.unmortgage_interest_pct),
            ("pass_start_bonus", self.pass_start_bonus),
        ] {
            if value < 0 {
                return Err(ConfigError::Negative { field, value });
            }
        }
        for kind in CardKind::ALL {
            if self.style(kind).label.trim().is_empty() {
                return Err(ConfigError::MissingLabel { kind });
            }
        }
        Ok(())
    }

    /// Presentation style for a deck kind.
    #[must_use]
    pub const fn style(&self, kind: CardKind) -> &DeckStyle {
        match kind {
            CardKind::Chance => &self.chance,
            CardKind::Community => &self.community,
        }
    }
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            fallback_board_size: Self::default_fallback_board_size(),
            default_property_price: Self::default_property_price(),
            unmortgage_interest_pct: Self::default_interest_pct(),
            pass_start_bonus: Self::default_pass_start_bonus(),
            chance: DeckStyle::chance(),
            community: DeckStyle::community(),
            alerts: AlertTimings::default(),
        }
    }
}
