//! Seams to the host game: token movement, property bookkeeping and presentation.
//!
//! The resolution core never draws anything or moves tokens itself. Hosts
//! implement [`BoardHost`] and [`Presenter`]; [`WrappingMover`] is a plain
//! reference host for headless use and tests.
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::board::Square;
use crate::cards::CardFace;
use crate::mortgage::QuoteView;
use crate::player::Player;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HostError {
    #[error("token move of {steps} rejected: {reason}")]
    MoveRejected { steps: i64, reason: String },
    #[error("property ledger rejected square {square_id}: {reason}")]
    LedgerRejected { square_id: u32, reason: String },
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PresentError {
    /// The surface (dialog, overlay, panel) does not exist right now.
    #[error("presentation surface unavailable: {0}")]
    Unavailable(String),
    #[error("presentation failed: {0}")]
    Failed(String),
}

/// How the player closed the unmortgage confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteDecision {
    Confirm,
    /// Cancel button, close button and backdrop all land here.
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// A short user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
    /// How long the message should stay up; `None` lets the presenter decide.
    pub duration_ms: Option<u32>,
}

impl Notice {
    #[must_use]
    pub fn warning(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            title: title.into(),
            message: message.into(),
            duration_ms: None,
        }
    }
}

/// Board-side operations owned by the host game loop.
pub trait BoardHost {
    /// Move the player's token by a signed step count. Implementations own the
    /// position update (mod `board_size`) and any pass-through effects.
    ///
    /// # Errors
    ///
    /// Returns an error if the host refuses the move.
    fn move_token(
        &mut self,
        player: &mut Player,
        steps: i64,
        board_size: usize,
    ) -> Result<(), HostError>;

    /// Notification that a property's mortgage has been lifted.
    ///
    /// # Errors
    ///
    /// Returns an error if the host's ledger refuses the change.
    fn property_unmortgaged(&mut self, _player: &Player, _square: &Square) -> Result<(), HostError> {
        Ok(())
    }
}

/// User-facing presentation. Each suspending call resolves exactly once.
#[async_trait(?Send)]
pub trait Presenter {
    /// Show a card and resolve once the player acknowledges it.
    async fn show_card(&mut self, face: &CardFace) -> Result<(), PresentError>;

    /// Show the unmortgage quote and resolve with the player's decision.
    async fn confirm_unmortgage(&mut self, view: &QuoteView) -> Result<QuoteDecision, PresentError>;

    /// Fire-and-forget message sink.
    fn notify(&mut self, notice: &Notice);

    /// Ask the stats panel to redraw.
    ///
    /// # Errors
    ///
    /// Returns [`PresentError::Unavailable`] when there is no panel.
    fn refresh_stats(&mut self) -> Result<(), PresentError> {
        Err(PresentError::Unavailable("stats panel".to_string()))
    }
}

/// Reference mover: wraps positions with `rem_euclid` and credits a bonus each
/// time a forward move reaches or passes the start square.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WrappingMover {
    pub pass_start_bonus: i64,
}

impl WrappingMover {
    #[must_use]
    pub const fn new(pass_start_bonus: i64) -> Self {
        Self { pass_start_bonus }
    }
}

impl BoardHost for WrappingMover {
    fn move_token(
        &mut self,
        player: &mut Player,
        steps: i64,
        board_size: usize,
    ) -> Result<(), HostError> {
        let size = i64::try_from(board_size.max(1)).map_err(|_| HostError::MoveRejected {
            steps,
            reason: format!("board size {board_size} out of range"),
        })?;
        let start = i64::try_from(player.position).unwrap_or(0);
        let raw = start.saturating_add(steps);
        if steps > 0 {
            let laps = raw.div_euclid(size);
            player.adjust_money(laps.saturating_mul(self.pass_start_bonus));
        }
        player.position = usize::try_from(raw.rem_euclid(size)).unwrap_or(0);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrapping_mover_wraps_both_directions() {
        let mut mover = WrappingMover::new(200);
        let mut player = Player::new("Ada", 0).at(1);
        mover.move_token(&mut player, -3, 40).unwrap();
        assert_eq!(player.position, 38);
        assert_eq!(player.money, 0, "moving backwards past start pays nothing");

        mover.move_token(&mut player, 5, 40).unwrap();
        assert_eq!(player.position, 3);
        assert_eq!(player.money, 200);

        mover.move_token(&mut player, 85, 40).unwrap();
        assert_eq!(player.position, 8);
        assert_eq!(player.money, 600);
    }

    #[test]
    fn landing_on_start_counts_as_passing() {
        let mut mover = WrappingMover::new(200);
        let mut player = Player::new("Bo", 0).at(35);
        mover.move_token(&mut player, 5, 40).unwrap();
        assert_eq!(player.position, 0);
        assert_eq!(player.money, 200);
    }

    #[test]
    fn zero_step_move_is_a_no_op() {
        let mut mover = WrappingMover::new(200);
        let mut player = Player::new("Cy", 10).at(0);
        mover.move_token(&mut player, 0, 40).unwrap();
        assert_eq!(player.position, 0);
        assert_eq!(player.money, 10);
    }
}
