//! Event cards: identity, actions, deck catalog and presentation face.
use serde::{Deserialize, Serialize};
use std::fmt;

mod catalog;
mod face;
mod mapper;

pub use catalog::{CardCatalog, Deck, DeckSource, fallback_deck};
pub use face::{AmountBadge, BadgeTone, CardFace};
pub use mapper::{CardIdMint, RawAction, map_raw_card};

/// The two decks a board draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardKind {
    Chance,
    Community,
}

impl CardKind {
    pub const ALL: [Self; 2] = [Self::Chance, Self::Community];

    /// Stable key used in logs and reports.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Chance => "chance",
            Self::Community => "community",
        }
    }
}

impl fmt::Display for CardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Card identity as supplied by the backend (numeric or textual) or minted locally.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CardId {
    Number(i64),
    Text(String),
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for CardId {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for CardId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// What a card does once acknowledged.
///
/// Decoding an action with a tag this build does not know yields
/// [`Action::Unrecognized`], which the interpreter treats as a no-op.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    MoveAbsolute {
        destination: i64,
        #[serde(default)]
        bonus: i64,
    },
    MoveRelative {
        steps: i64,
    },
    Pay {
        amount: u64,
    },
    Collect {
        amount: u64,
    },
    SendToJail,
    NoOp,
    #[serde(other)]
    Unrecognized,
}

impl Action {
    /// `Collect` for non-negative values, `Pay` of the magnitude otherwise.
    #[must_use]
    pub const fn money(value: i64) -> Self {
        if value >= 0 {
            Self::Collect {
                amount: value.unsigned_abs(),
            }
        } else {
            Self::Pay {
                amount: value.unsigned_abs(),
            }
        }
    }

    /// Stable tag used in logs and reports.
    #[must_use]
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::MoveAbsolute { .. } => "move_absolute",
            Self::MoveRelative { .. } => "move_relative",
            Self::Pay { .. } => "pay",
            Self::Collect { .. } => "collect",
            Self::SendToJail => "send_to_jail",
            Self::NoOp => "no_op",
            Self::Unrecognized => "unrecognized",
        }
    }
}

/// A drawn event card. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub text: String,
    pub action: Action,
    /// Backend descriptor the card was mapped from, kept for diagnostics.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<serde_json::Value>,
}

impl Card {
    #[must_use]
    pub fn new(id: impl Into<CardId>, text: impl Into<String>, action: Action) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            action,
            source: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_sign_selects_pay_or_collect() {
        assert_eq!(Action::money(150), Action::Collect { amount: 150 });
        assert_eq!(Action::money(0), Action::Collect { amount: 0 });
        assert_eq!(Action::money(-75), Action::Pay { amount: 75 });
        assert_eq!(
            Action::money(i64::MIN),
            Action::Pay {
                amount: i64::MIN.unsigned_abs()
            }
        );
    }

    #[test]
    fn unknown_action_tags_decode_as_unrecognized() {
        let action: Action = serde_json::from_str(r#"{ "type": "teleport", "to": 3 }"#).unwrap();
        assert_eq!(action, Action::Unrecognized);

        let action: Action =
            serde_json::from_str(r#"{ "type": "move_absolute", "destination": 5 }"#).unwrap();
        assert_eq!(
            action,
            Action::MoveAbsolute {
                destination: 5,
                bonus: 0
            }
        );
    }

    #[test]
    fn card_ids_keep_backend_shape() {
        let numeric: CardId = serde_json::from_str("12").unwrap();
        let text: CardId = serde_json::from_str(r#""c-12""#).unwrap();
        assert_eq!(numeric, CardId::Number(12));
        assert_eq!(text.to_string(), "c-12");
    }
}
