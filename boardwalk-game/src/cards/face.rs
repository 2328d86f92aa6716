//! What the presenter shows for a drawn card.
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::{Card, CardId, CardKind};
use crate::config::DeckStyle;

static AMOUNT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\$\d+").expect("amount pattern is valid"));

const PAYMENT_WORDS: [&str; 2] = ["Pay", "Paga"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeTone {
    Positive,
    Negative,
}

/// Highlighted dollar amount lifted from the card text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmountBadge {
    pub text: String,
    pub tone: BadgeTone,
}

impl AmountBadge {
    /// First `$<digits>` token in `text`; negative when the text asks to pay.
    #[must_use]
    pub fn from_text(text: &str) -> Option<Self> {
        let amount = AMOUNT_RE.find(text)?;
        let tone = if PAYMENT_WORDS.iter().any(|word| text.contains(word)) {
            BadgeTone::Negative
        } else {
            BadgeTone::Positive
        };
        Some(Self {
            text: amount.as_str().to_string(),
            tone,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardFace {
    pub kind: CardKind,
    pub card_id: CardId,
    pub label: String,
    pub accent: String,
    pub text: String,
    pub badge: Option<AmountBadge>,
}

impl CardFace {
    #[must_use]
    pub fn new(kind: CardKind, card: &Card, style: &DeckStyle) -> Self {
        Self {
            kind,
            card_id: card.id.clone(),
            label: style.label.clone(),
            accent: style.accent.clone(),
            text: card.text.clone(),
            badge: AmountBadge::from_text(&card.text),
        }
    }
}
