//! Unmortgage economics: cost, validation and the confirm/apply handshake.
//!
//! Lifting a mortgage costs the square's base mortgage value plus interest,
//! rounded up to the next whole unit. [`validate`] checks ownership, mortgage
//! state and funds and hands back an [`UnmortgageTicket`]; [`apply`] consumes
//! that ticket, so one validation can pay for at most one mortgage lift.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::board::{Square, SquareId};
use crate::config::{AlertTimings, RulesConfig};
use crate::constants::{
    DEFAULT_PROPERTY_DESCRIPTION, DEFAULT_PROPERTY_NAME, LOG_MORTGAGE_APPLIED,
    LOG_MORTGAGE_CANCELLED, LOG_MORTGAGE_REJECTED, LOG_MORTGAGE_STALE, LOG_STATS_UNAVAILABLE,
};
use crate::host::{BoardHost, HostError, Notice, NoticeLevel, PresentError, Presenter, QuoteDecision};
use crate::player::{OwnedProperty, Player};
use crate::session::{GameSession, PlayerId};

const NOTICE_TITLE: &str = "Unmortgage";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MortgageError {
    #[error("You are not the owner.")]
    NotOwned,
    #[error("This property is not mortgaged.")]
    NotMortgaged,
    #[error("You need ${required} to lift the mortgage.")]
    InsufficientFunds { required: i64, available: i64 },
    #[error("square {0} is not on the board")]
    UnknownSquare(SquareId),
    #[error("no square under player {0}")]
    NoSquareUnderPlayer(PlayerId),
    #[error("unknown player {0}")]
    UnknownPlayer(PlayerId),
    #[error(transparent)]
    Host(#[from] HostError),
}

impl MortgageError {
    /// Whether this is one of the three validation refusals shown to the player.
    #[must_use]
    pub const fn is_rule_violation(&self) -> bool {
        matches!(
            self,
            Self::NotOwned | Self::NotMortgaged | Self::InsufficientFunds { .. }
        )
    }

    /// How long the alert for this error stays up.
    #[must_use]
    pub const fn alert_ms(&self, alerts: &AlertTimings) -> u32 {
        match self {
            Self::InsufficientFunds { .. } => alerts.funds_ms,
            _ => alerts.ownership_ms,
        }
    }

    /// User-facing alert for this error.
    #[must_use]
    pub fn notice(&self, alerts: &AlertTimings) -> Notice {
        let level = match self {
            Self::NotMortgaged => NoticeLevel::Info,
            Self::NotOwned | Self::InsufficientFunds { .. } => NoticeLevel::Warning,
            _ => NoticeLevel::Error,
        };
        Notice {
            level,
            title: NOTICE_TITLE.to_string(),
            message: self.to_string(),
            duration_ms: Some(self.alert_ms(alerts)),
        }
    }
}

/// Derived preview of one unmortgage transaction. Never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MortgageQuote {
    pub square_id: SquareId,
    pub base_value: i64,
    pub total_cost: i64,
    pub funds_before: i64,
    pub funds_after: i64,
}

/// Base mortgage value: the square's explicit value, else half the price
/// (square price, then deed price, then the configured default), rounded down.
/// Zero or negative amounts count as missing.
#[must_use]
pub fn base_value(square: &Square, property: &OwnedProperty, default_price: i64) -> i64 {
    if let Some(value) = square.mortgage_value.filter(|v| *v > 0) {
        return value;
    }
    let price = square
        .price
        .filter(|p| *p > 0)
        .or_else(|| property.price.filter(|p| *p > 0))
        .unwrap_or(default_price);
    price.div_euclid(2)
}

/// `ceil(base_value * (100 + interest_pct) / 100)` in integer arithmetic.
#[must_use]
pub const fn unmortgage_cost(base_value: i64, interest_pct: i64) -> i64 {
    let scaled = base_value.saturating_mul(100_i64.saturating_add(interest_pct));
    let whole = scaled.div_euclid(100);
    if scaled.rem_euclid(100) > 0 {
        whole.saturating_add(1)
    } else {
        whole
    }
}

/// Price the unmortgage of `property` for `player`.
#[must_use]
pub fn quote(
    square: &Square,
    property: &OwnedProperty,
    player: &Player,
    config: &RulesConfig,
) -> MortgageQuote {
    let base = base_value(square, property, config.default_property_price);
    let total_cost = unmortgage_cost(base, config.unmortgage_interest_pct);
    MortgageQuote {
        square_id: square.id,
        base_value: base,
        total_cost,
        funds_before: player.money,
        funds_after: player.money.saturating_sub(total_cost),
    }
}

/// Proof that an unmortgage passed validation. Not `Clone`; [`apply`] takes it
/// by value, so each validation authorizes one apply.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "an unmortgage ticket does nothing until applied"]
pub struct UnmortgageTicket {
    quote: MortgageQuote,
}

impl UnmortgageTicket {
    pub const fn quote(&self) -> &MortgageQuote {
        &self.quote
    }
}

/// Check that `player` may lift the mortgage on `square`.
///
/// # Errors
///
/// In order: [`MortgageError::NotOwned`] when the square is not among the
/// player's properties, [`MortgageError::NotMortgaged`] when it is not
/// mortgaged, [`MortgageError::InsufficientFunds`] when the player cannot
/// cover the total cost.
pub fn validate(
    square: &Square,
    player: &Player,
    config: &RulesConfig,
) -> Result<UnmortgageTicket, MortgageError> {
    let property = player.property(square.id).ok_or(MortgageError::NotOwned)?;
    if !property.mortgaged {
        return Err(MortgageError::NotMortgaged);
    }
    let quote = quote(square, property, player, config);
    if player.money < quote.total_cost {
        return Err(MortgageError::InsufficientFunds {
            required: quote.total_cost,
            available: player.money,
        });
    }
    Ok(UnmortgageTicket { quote })
}

/// Pay the quoted cost, clear the mortgage flag and tell the host.
///
/// The ticket's preconditions are checked once more against the player's
/// current state; if the host rejects the ledger change both the payment and
/// the flag are rolled back.
///
/// # Errors
///
/// Returns a validation error if the state moved on since the ticket was
/// issued, or the host's error if it refuses the change. The player is left
/// untouched in both cases.
pub fn apply<H: BoardHost + ?Sized>(
    ticket: UnmortgageTicket,
    player: &mut Player,
    square: &Square,
    host: &mut H,
) -> Result<MortgageQuote, MortgageError> {
    let quote = ticket.quote;
    if square.id != quote.square_id {
        return Err(MortgageError::UnknownSquare(quote.square_id));
    }
    let available = player.money;
    let property = player
        .property_mut(quote.square_id)
        .ok_or(MortgageError::NotOwned)?;
    if !property.mortgaged {
        return Err(MortgageError::NotMortgaged);
    }
    if available < quote.total_cost {
        return Err(MortgageError::InsufficientFunds {
            required: quote.total_cost,
            available,
        });
    }
    property.mortgaged = false;
    player.adjust_money(-quote.total_cost);

    if let Err(err) = host.property_unmortgaged(player, square) {
        player.money = available;
        if let Some(property) = player.property_mut(quote.square_id) {
            property.mortgaged = true;
        }
        return Err(err.into());
    }
    log::info!(
        target: LOG_MORTGAGE_APPLIED,
        "{} lifted mortgage on square {} for {}",
        player.name,
        quote.square_id,
        quote.total_cost
    );
    Ok(MortgageQuote {
        funds_after: player.money,
        ..quote
    })
}

/// What the confirmation dialog shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteView {
    pub square_id: SquareId,
    pub name: String,
    pub description: String,
    /// Group color band; hidden when absent.
    pub color: Option<String>,
    pub base_value: i64,
    pub total_cost: i64,
    pub funds_before: i64,
    pub funds_after: i64,
}

impl QuoteView {
    #[must_use]
    pub fn new(square: &Square, quote: &MortgageQuote) -> Self {
        let name = if square.name.trim().is_empty() {
            DEFAULT_PROPERTY_NAME.to_string()
        } else {
            square.name.clone()
        };
        let description = square
            .description
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .unwrap_or(DEFAULT_PROPERTY_DESCRIPTION)
            .to_string();
        Self {
            square_id: square.id,
            name,
            description,
            color: square.color.clone().filter(|c| !c.is_empty()),
            base_value: quote.base_value,
            total_cost: quote.total_cost,
            funds_before: quote.funds_before,
            funds_after: quote.funds_after,
        }
    }
}

/// Result of pressing confirm on the dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogOutcome {
    Applied(MortgageQuote),
    /// The square or the deed disappeared since opening; the dialog just closed.
    Closed,
    /// Nothing was pending: the dialog was closed or already confirmed.
    Ignored,
    Rejected(MortgageError),
}

#[derive(Debug)]
struct PendingUnmortgage {
    player: PlayerId,
    ticket: UnmortgageTicket,
    view: QuoteView,
}

/// Open/confirm/cancel state for the unmortgage confirmation.
///
/// The validated ticket is taken out on the first confirm, so a second click
/// arriving before the dialog is redrawn finds nothing to apply.
#[derive(Debug, Default)]
pub struct MortgageDialog {
    pending: Option<PendingUnmortgage>,
}

impl MortgageDialog {
    #[must_use]
    pub const fn new() -> Self {
        Self { pending: None }
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.pending.is_some()
    }

    #[must_use]
    pub fn view(&self) -> Option<&QuoteView> {
        self.pending.as_ref().map(|pending| &pending.view)
    }

    /// Validate the square under `player` and open the dialog on success.
    /// Any dialog already open is replaced.
    ///
    /// # Errors
    ///
    /// Returns the validation failure; the dialog stays closed.
    pub fn open(&mut self, session: &GameSession, player: PlayerId) -> Result<&QuoteView, MortgageError> {
        self.pending = None;
        let acting = session
            .player(player)
            .ok_or(MortgageError::UnknownPlayer(player))?;
        let square = session
            .square_under(player)
            .ok_or(MortgageError::NoSquareUnderPlayer(player))?;
        let ticket = validate(square, acting, session.config()).inspect_err(|err| {
            log::info!(
                target: LOG_MORTGAGE_REJECTED,
                "unmortgage of square {} by {} refused: {err}",
                square.id,
                acting.name
            );
        })?;
        let view = QuoteView::new(square, ticket.quote());
        let pending = self.pending.insert(PendingUnmortgage {
            player,
            ticket,
            view,
        });
        Ok(&pending.view)
    }

    /// Apply the pending unmortgage, at most once per [`open`](Self::open).
    pub fn confirm<H: BoardHost + ?Sized>(
        &mut self,
        session: &mut GameSession,
        host: &mut H,
    ) -> DialogOutcome {
        let Some(PendingUnmortgage { player, ticket, .. }) = self.pending.take() else {
            return DialogOutcome::Ignored;
        };
        let square_id = ticket.quote().square_id;
        let Some(square) = session.board().square_by_id(square_id).cloned() else {
            log::info!(target: LOG_MORTGAGE_STALE, "square {square_id} vanished before confirm");
            return DialogOutcome::Closed;
        };
        let Some(acting) = session.player_mut(player) else {
            log::info!(target: LOG_MORTGAGE_STALE, "player {player} vanished before confirm");
            return DialogOutcome::Closed;
        };
        if acting.property(square_id).is_none() {
            log::info!(
                target: LOG_MORTGAGE_STALE,
                "{} no longer holds square {square_id}; closing",
                acting.name
            );
            return DialogOutcome::Closed;
        }
        match apply(ticket, acting, &square, host) {
            Ok(receipt) => DialogOutcome::Applied(receipt),
            Err(err) => {
                log::warn!(target: LOG_MORTGAGE_REJECTED, "unmortgage of square {square_id} failed: {err}");
                DialogOutcome::Rejected(err)
            }
        }
    }

    /// Close without applying. Cancel, the close button and the backdrop all
    /// end up here.
    pub fn cancel(&mut self) {
        if let Some(pending) = self.pending.take() {
            log::debug!(
                target: LOG_MORTGAGE_CANCELLED,
                "unmortgage of square {} cancelled",
                pending.view.square_id
            );
        }
    }
}

/// End state of one [`unmortgage`] run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MortgageOutcome {
    Applied(MortgageQuote),
    Cancelled,
    Rejected(MortgageError),
    Aborted(PresentError),
}

/// Validate, ask the player to confirm, then apply.
///
/// Refusals are sent to the presenter as alerts. A presenter that cannot show
/// the dialog aborts the run with nothing changed.
pub async fn unmortgage<P, H>(
    session: &mut GameSession,
    player: PlayerId,
    presenter: &mut P,
    host: &mut H,
) -> MortgageOutcome
where
    P: Presenter + ?Sized,
    H: BoardHost + ?Sized,
{
    let alerts = session.config().alerts;
    let mut dialog = MortgageDialog::new();
    let view = match dialog.open(session, player) {
        Ok(view) => view.clone(),
        Err(err) => {
            presenter.notify(&err.notice(&alerts));
            return MortgageOutcome::Rejected(err);
        }
    };

    match presenter.confirm_unmortgage(&view).await {
        Ok(QuoteDecision::Confirm) => {}
        Ok(QuoteDecision::Cancel) => {
            dialog.cancel();
            return MortgageOutcome::Cancelled;
        }
        Err(err) => {
            dialog.cancel();
            log::warn!(target: LOG_MORTGAGE_CANCELLED, "unmortgage dialog unavailable: {err}");
            return MortgageOutcome::Aborted(err);
        }
    }

    match dialog.confirm(session, host) {
        DialogOutcome::Applied(receipt) => {
            if let Err(err) = presenter.refresh_stats() {
                log::debug!(target: LOG_STATS_UNAVAILABLE, "stats refresh skipped: {err}");
            }
            MortgageOutcome::Applied(receipt)
        }
        DialogOutcome::Rejected(err) => {
            presenter.notify(&err.notice(&alerts));
            MortgageOutcome::Rejected(err)
        }
        DialogOutcome::Closed | DialogOutcome::Ignored => MortgageOutcome::Cancelled,
    }
}
