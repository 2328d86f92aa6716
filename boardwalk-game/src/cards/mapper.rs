//! Mapping of untyped backend card descriptors into [`Card`]s.
//!
//! Backend payloads arrive in several historical shapes, for example:
//!
//! ```json
//! { "id": 4, "description": "Bank error", "type": "chance", "action": { "money": 150 } }
//! { "id": 5, "description": "Fine", "action": { "money": -75 } }
//! { "id": 6, "description": "Busted", "action": { "goTo": "jail" } }
//! { "id": 7, "description": "Back to GO", "action": { "moveTo": 0, "reward": 200 } }
//! ```
//!
//! Field probing is order-sensitive; see [`RawAction::classify`].
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde_json::{Map, Value};

use super::{Action, Card, CardId};
use crate::board::mentions_jail;
use crate::constants::DEFAULT_CARD_TEXT;

const TEXT_FIELDS: [&str; 3] = ["description", "text", "texto"];
const ACTION_FIELDS: [&str; 2] = ["action", "accion"];
const JAIL_FIELDS: [&str; 2] = ["goTo", "goto"];

/// Issues unique ids for descriptors that arrive without one.
///
/// A monotonic counter guarantees uniqueness within a session; the random
/// suffix keeps ids from different sessions apart.
#[derive(Debug, Clone)]
pub struct CardIdMint {
    rng: ChaCha20Rng,
    issued: u64,
}

impl CardIdMint {
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
            issued: 0,
        }
    }

    pub fn next_id(&mut self) -> CardId {
        self.issued = self.issued.saturating_add(1);
        let salt = self.rng.next_u32();
        CardId::Text(format!("card-{:04}-{salt:08x}", self.issued))
    }

    /// Number of ids handed out so far.
    #[must_use]
    pub const fn issued(&self) -> u64 {
        self.issued
    }
}

/// Recognized raw action shapes, in precedence order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawAction {
    /// Direct money transfer; sign decides pay or collect.
    Money(i64),
    /// A destination token naming the jail.
    JailToken,
    /// Absolute move with an optional reward collected on the way.
    MoveTo { destination: i64, reward: i64 },
    /// Relative move.
    Steps(i64),
    /// Reward without a destination.
    Reward(i64),
    /// Nothing recognizable; the card is informational.
    Unrecognized,
}

impl RawAction {
    /// Classify an action object. The first matching rule wins:
    /// `money`, jail token in `goTo`/`goto`, `moveTo`, `steps`, `reward`.
    #[must_use]
    pub fn classify(action: &Map<String, Value>) -> Self {
        if let Some(money) = action.get("money").and_then(numeric) {
            return Self::Money(money);
        }
        if jail_token(action) {
            return Self::JailToken;
        }
        if let Some(destination) = action.get("moveTo").and_then(numeric) {
            let reward = action.get("reward").and_then(numeric).unwrap_or(0);
            return Self::MoveTo {
                destination,
                reward,
            };
        }
        if let Some(steps) = action.get("steps").and_then(numeric) {
            return Self::Steps(steps);
        }
        if let Some(reward) = action.get("reward").and_then(numeric) {
            return Self::Reward(reward);
        }
        Self::Unrecognized
    }

    #[must_use]
    pub const fn into_action(self) -> Action {
        match self {
            Self::Money(value) | Self::Reward(value) => Action::money(value),
            Self::JailToken => Action::SendToJail,
            Self::MoveTo {
                destination,
                reward,
            } => Action::MoveAbsolute {
                destination,
                bonus: reward,
            },
            Self::Steps(steps) => Action::MoveRelative { steps },
            Self::Unrecognized => Action::NoOp,
        }
    }
}

/// Map one backend descriptor. Returns `None` when `raw` is not a JSON object.
pub fn map_raw_card(raw: &Value, ids: &mut CardIdMint) -> Option<Card> {
    let fields = raw.as_object()?;
    let id = fields
        .get("id")
        .and_then(card_id)
        .unwrap_or_else(|| ids.next_id());
    let text = TEXT_FIELDS
        .iter()
        .filter_map(|key| fields.get(*key))
        .filter_map(Value::as_str)
        .find(|text| !text.is_empty())
        .unwrap_or(DEFAULT_CARD_TEXT)
        .to_string();
    let action = ACTION_FIELDS
        .iter()
        .filter_map(|key| fields.get(*key))
        .find(|value| truthy(value))
        .and_then(Value::as_object)
        .map_or(RawAction::Unrecognized, RawAction::classify)
        .into_action();

    Some(Card {
        id,
        text,
        action,
        source: Some(raw.clone()),
    })
}

fn card_id(value: &Value) -> Option<CardId> {
    match value {
        Value::Null => None,
        Value::Number(n) => Some(
            n.as_i64()
                .map_or_else(|| CardId::Text(n.to_string()), CardId::Number),
        ),
        Value::String(s) => Some(CardId::Text(s.clone())),
        other => Some(CardId::Text(other.to_string())),
    }
}

/// Integer view of a JSON number. Fractional values truncate toward zero.
fn numeric(value: &Value) -> Option<i64> {
    let Value::Number(number) = value else {
        return None;
    };
    if let Some(int) = number.as_i64() {
        return Some(int);
    }
    if number.as_u64().is_some() {
        return Some(i64::MAX);
    }
    number
        .as_f64()
        .filter(|f| f.is_finite())
        .map(|f| f.trunc() as i64)
}

/// Loose truthiness: absent-like values (`null`, `false`, `0`, `""`) are skipped
/// when choosing between alias fields.
fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn jail_token(action: &Map<String, Value>) -> bool {
    JAIL_FIELDS
        .iter()
        .filter_map(|key| action.get(*key))
        .find(|value| truthy(value))
        .and_then(Value::as_str)
        .is_some_and(mentions_jail)
}
