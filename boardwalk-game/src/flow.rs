//! Card resolution: draw, present, then apply.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cards::{Action, Card, CardFace, CardId, CardKind};
use crate::constants::{
    EMPTY_DECK_MESSAGE, LOG_CARD_DRAWN, LOG_CARD_EMPTY_DECK, LOG_FLOW_ABORTED,
    LOG_STATS_UNAVAILABLE,
};
use crate::host::{BoardHost, HostError, Notice, PresentError, Presenter};
use crate::interpreter::{Mutations, apply_mutations, interpret};
use crate::session::{GameSession, PlayerId};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CardFlowError {
    #[error("no {0} cards available")]
    EmptyDeck(CardKind),
    #[error("unknown player {0}")]
    UnknownPlayer(PlayerId),
    #[error(transparent)]
    Presentation(#[from] PresentError),
    #[error(transparent)]
    Host(#[from] HostError),
}

/// Result of one card resolution. Never fatal to the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CardOutcome {
    Applied {
        kind: CardKind,
        card_id: CardId,
        action: Action,
        mutations: Mutations,
    },
    EmptyDeck {
        kind: CardKind,
    },
    /// The flow stopped before mutating anything; the reason was logged.
    Aborted {
        kind: CardKind,
        reason: String,
    },
}

impl CardOutcome {
    #[must_use]
    pub const fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }
}

/// Pick one card uniformly at random from the session's deck for `kind`.
/// The deck is never shrunk.
pub fn draw_card(session: &mut GameSession, kind: CardKind) -> Option<Card> {
    let (deck, rng, _) = session.draw_parts(kind);
    deck.draw(rng.deck(kind)).cloned()
}

/// Draw a card for `player`, show it, and apply its action once acknowledged.
///
/// The action is only interpreted after the presenter resolves, so the player
/// never sees a mutation before the card that caused it. Failures are logged
/// and reported as [`CardOutcome::Aborted`] with the player left untouched.
pub async fn resolve_card<P, H>(
    session: &mut GameSession,
    player: PlayerId,
    kind: CardKind,
    presenter: &mut P,
    host: &mut H,
) -> CardOutcome
where
    P: Presenter + ?Sized,
    H: BoardHost + ?Sized,
{
    match try_resolve_card(session, player, kind, presenter, host).await {
        Ok(outcome) => outcome,
        Err(CardFlowError::EmptyDeck(kind)) => {
            log::warn!(target: LOG_CARD_EMPTY_DECK, "{kind} deck is empty; nothing drawn");
            let label = session.config().style(kind).label.clone();
            presenter.notify(&Notice::warning(label, EMPTY_DECK_MESSAGE));
            CardOutcome::EmptyDeck { kind }
        }
        Err(err) => {
            log::warn!(target: LOG_FLOW_ABORTED, "{kind} card for player {player} aborted: {err}");
            CardOutcome::Aborted {
                kind,
                reason: err.to_string(),
            }
        }
    }
}

async fn try_resolve_card<P, H>(
    session: &mut GameSession,
    player: PlayerId,
    kind: CardKind,
    presenter: &mut P,
    host: &mut H,
) -> Result<CardOutcome, CardFlowError>
where
    P: Presenter + ?Sized,
    H: BoardHost + ?Sized,
{
    if session.player(player).is_none() {
        return Err(CardFlowError::UnknownPlayer(player));
    }
    let card = draw_card(session, kind).ok_or(CardFlowError::EmptyDeck(kind))?;
    log::info!(
        target: LOG_CARD_DRAWN,
        "player {player} drew {kind} card {} ({})",
        card.id,
        card.action.tag()
    );

    let face = CardFace::new(kind, &card, session.config().style(kind));
    presenter.show_card(&face).await?;

    let board_size = session.board_size();
    let current = session
        .player(player)
        .ok_or(CardFlowError::UnknownPlayer(player))?;
    let mutations = interpret(&card.action, current, session.board(), board_size);

    let mut updated = current.clone();
    apply_mutations(&mut updated, &mutations, board_size, host)?;
    if let Some(slot) = session.player_mut(player) {
        *slot = updated;
    }

    if let Err(err) = presenter.refresh_stats() {
        log::debug!(target: LOG_STATS_UNAVAILABLE, "stats refresh skipped: {err}");
    }

    Ok(CardOutcome::Applied {
        kind,
        card_id: card.id,
        action: card.action,
        mutations,
    })
}
