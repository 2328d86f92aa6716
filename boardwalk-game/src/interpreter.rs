//! Turning a card [`Action`] into concrete mutations, and applying them.
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::board::Board;
use crate::cards::Action;
use crate::constants::{LOG_CARD_UNKNOWN_ACTION, LOG_JAIL_NO_SQUARE};
use crate::host::{BoardHost, HostError};
use crate::player::Player;

/// One state change requested by a card, applied in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mutation {
    AdjustMoney(i64),
    MoveToken(i64),
    GoToJail,
}

pub type Mutations = SmallVec<[Mutation; 2]>;

/// Forward distance from `from` to `destination` on a track of `board_size`
/// squares. Always in `[0, board_size)`: absolute moves never run backwards.
#[must_use]
pub fn forward_steps(from: usize, destination: i64, board_size: usize) -> i64 {
    let size = i64::try_from(board_size.max(1)).unwrap_or(i64::MAX);
    let target = destination.rem_euclid(size);
    let origin = i64::try_from(from).unwrap_or(0).rem_euclid(size);
    (target - origin).rem_euclid(size)
}

fn amount(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// Work out what `action` does to `player`. Pure: nothing is mutated.
///
/// Absolute moves are normalized to a forward step count and credit their
/// bonus before the move. Relative moves are handed to the mover untouched,
/// negative or oversized counts included.
#[must_use]
pub fn interpret(action: &Action, player: &Player, board: &Board, board_size: usize) -> Mutations {
    let mut mutations = Mutations::new();
    match *action {
        Action::MoveAbsolute { destination, bonus } => {
            if bonus != 0 {
                mutations.push(Mutation::AdjustMoney(bonus));
            }
            mutations.push(Mutation::MoveToken(forward_steps(
                player.position,
                destination,
                board_size,
            )));
        }
        Action::MoveRelative { steps } => mutations.push(Mutation::MoveToken(steps)),
        Action::Pay { amount: value } => mutations.push(Mutation::AdjustMoney(-amount(value))),
        Action::Collect { amount: value } => mutations.push(Mutation::AdjustMoney(amount(value))),
        Action::SendToJail => {
            mutations.push(Mutation::GoToJail);
            if let Some(jail) = board.jail_position() {
                let target = i64::try_from(jail).unwrap_or(0);
                mutations.push(Mutation::MoveToken(forward_steps(
                    player.position,
                    target,
                    board_size,
                )));
            } else {
                log::debug!(target: LOG_JAIL_NO_SQUARE, "no jail square on board; jailing in place");
            }
        }
        Action::NoOp => {}
        Action::Unrecognized => {
            log::warn!(target: LOG_CARD_UNKNOWN_ACTION, "unrecognized card action; ignoring");
        }
    }
    mutations
}

/// Apply mutations in order. Stops at the first host failure, leaving earlier
/// mutations applied; callers that need atomicity work on a copy.
///
/// # Errors
///
/// Returns the host's error if a token move is rejected.
pub fn apply_mutations<H: BoardHost + ?Sized>(
    player: &mut Player,
    mutations: &[Mutation],
    board_size: usize,
    host: &mut H,
) -> Result<(), HostError> {
    for mutation in mutations {
        match *mutation {
            Mutation::AdjustMoney(delta) => player.adjust_money(delta),
            Mutation::MoveToken(steps) => host.move_token(player, steps, board_size)?,
            Mutation::GoToJail => player.go_to_jail(),
        }
    }
    Ok(())
}
