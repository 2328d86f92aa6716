//! Per-session deck cache.
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::mapper::{CardIdMint, map_raw_card};
use super::{Action, Card, CardKind};
use crate::board::Board;
use crate::constants::{LOG_CARD_DROPPED, LOG_DECK_BACKEND, LOG_DECK_FALLBACK};

/// Where a deck's cards came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeckSource {
    Backend,
    Fallback,
}

/// An established deck. Cards are never removed; draws are with replacement.
#[derive(Debug, Clone, PartialEq)]
pub struct Deck {
    kind: CardKind,
    source: DeckSource,
    cards: Vec<Card>,
}

impl Deck {
    #[must_use]
    pub const fn kind(&self) -> CardKind {
        self.kind
    }

    #[must_use]
    pub const fn source(&self) -> DeckSource {
        self.source
    }

    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Pick one card uniformly at random without shrinking the deck.
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&Card> {
        self.cards.choose(rng)
    }

    fn establish(kind: CardKind, raw: Option<&Value>, ids: &mut CardIdMint) -> Self {
        if let Some(cards) = map_collection(kind, raw, ids) {
            log::info!(
                target: LOG_DECK_BACKEND,
                "{kind} deck mapped from backend ({} cards)",
                cards.len()
            );
            return Self {
                kind,
                source: DeckSource::Backend,
                cards,
            };
        }
        log::info!(target: LOG_DECK_FALLBACK, "{kind} deck using built-in fallback");
        Self {
            kind,
            source: DeckSource::Fallback,
            cards: fallback_deck(kind),
        }
    }
}

fn map_collection(kind: CardKind, raw: Option<&Value>, ids: &mut CardIdMint) -> Option<Vec<Card>> {
    let entries = raw?.as_array()?;
    if entries.is_empty() {
        return None;
    }
    let mapped: Vec<Card> = entries
        .iter()
        .filter_map(|entry| {
            let card = map_raw_card(entry, ids);
            if card.is_none() {
                log::debug!(target: LOG_CARD_DROPPED, "dropping unmappable {kind} card: {entry}");
            }
            card
        })
        .collect();
    if mapped.is_empty() { None } else { Some(mapped) }
}

/// Decks cached on a game session, established lazily on first request.
#[derive(Debug, Clone)]
pub struct CardCatalog {
    chance: Option<Deck>,
    community: Option<Deck>,
    ids: CardIdMint,
}

impl CardCatalog {
    #[must_use]
    pub fn new(ids: CardIdMint) -> Self {
        Self {
            chance: None,
            community: None,
            ids,
        }
    }

    /// The deck for `kind`, mapping the board's raw collection on first use.
    /// Later calls return the cached deck and never look at the board again.
    pub fn deck(&mut self, kind: CardKind, board: &Board) -> &Deck {
        let raw = match kind {
            CardKind::Chance => board.chance_cards.as_ref(),
            CardKind::Community => board.community_cards.as_ref(),
        };
        let Self {
            chance,
            community,
            ids,
        } = self;
        let slot = match kind {
            CardKind::Chance => chance,
            CardKind::Community => community,
        };
        slot.get_or_insert_with(|| Deck::establish(kind, raw, ids))
    }

    /// The deck for `kind` if it has already been established.
    #[must_use]
    pub const fn cached(&self, kind: CardKind) -> Option<&Deck> {
        match kind {
            CardKind::Chance => self.chance.as_ref(),
            CardKind::Community => self.community.as_ref(),
        }
    }
}

/// Built-in deck used when the backend supplies nothing usable.
#[must_use]
pub fn fallback_deck(kind: CardKind) -> Vec<Card> {
    match kind {
        CardKind::Chance => vec![
            Card::new(
                9001,
                "Advance to GO and collect $200",
                Action::MoveAbsolute {
                    destination: 0,
                    bonus: 200,
                },
            ),
            Card::new(9002, "Go back 3 spaces", Action::MoveRelative { steps: -3 }),
            Card::new(9003, "Pay a $50 fine", Action::Pay { amount: 50 }),
            Card::new(9004, "Go directly to jail", Action::SendToJail),
        ],
        CardKind::Community => vec![
            Card::new(9101, "You inherit $100", Action::Collect { amount: 100 }),
            Card::new(9102, "Pay $40 doctor's fee", Action::Pay { amount: 40 }),
            Card::new(9103, "Go to jail", Action::SendToJail),
            Card::new(9104, "Advance 2 spaces", Action::MoveRelative { steps: 2 }),
        ],
    }
}
