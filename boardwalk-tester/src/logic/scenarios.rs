use anyhow::{Result, bail, ensure};
use boardwalk_game::mortgage::{self, DialogOutcome, MortgageDialog};
use boardwalk_game::{
    Action, Board, CardKind, CardOutcome, DeckSource, GameSession, MortgageError,
    MortgageOutcome, OwnedProperty, Player, QuoteDecision, RulesConfig, Square, SquareKind,
    WrappingMover, draw_card, fallback_deck, resolve_card, unmortgage,
};
use std::collections::HashSet;
use std::hash::Hasher;
use twox_hash::XxHash64;

use super::presenter::HeadlessPresenter;

const STARTING_MONEY: i64 = 1_500;
const CARD_DRAWS: usize = 120;
const FALLBACK_TRIALS: usize = 1_000;

/// Everything a scenario iteration needs besides its seed.
#[derive(Debug, Clone)]
pub struct ScenarioContext {
    pub board: Board,
    pub rules: RulesConfig,
    pub verbose: bool,
}

impl ScenarioContext {
    fn session(&self, seed: u64, players: Vec<Player>) -> GameSession {
        GameSession::new(seed, self.board.clone(), players, self.rules.clone())
    }

    fn mover(&self) -> WrappingMover {
        WrappingMover::new(self.rules.pass_start_bonus)
    }
}

/// What one passing iteration did, for verbose output and reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IterationSummary {
    pub cards_resolved: usize,
    pub mortgages_checked: usize,
    pub signature: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    Smoke,
    CardDraws,
    MortgageRules,
    FallbackIntegrity,
}

impl Scenario {
    pub const ALL: [Self; 4] = [
        Self::Smoke,
        Self::CardDraws,
        Self::MortgageRules,
        Self::FallbackIntegrity,
    ];

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Smoke => "smoke",
            Self::CardDraws => "card-draws",
            Self::MortgageRules => "mortgage-rules",
            Self::FallbackIntegrity => "fallback-integrity",
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Smoke => "One chance and one community card per player",
            Self::CardDraws => "Repeatable draw sequences with positions kept on the board",
            Self::MortgageRules => "Unmortgage cost, refusals and single confirm per ownable square",
            Self::FallbackIntegrity => "Built-in decks only ever yield their fixed card ids",
        }
    }

    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|scenario| scenario.key() == key)
    }

    /// Run one iteration.
    ///
    /// # Errors
    ///
    /// Returns the first violated expectation.
    pub async fn run(self, ctx: &ScenarioContext, seed: u64) -> Result<IterationSummary> {
        match self {
            Self::Smoke => smoke(ctx, seed).await,
            Self::CardDraws => card_draws(ctx, seed).await,
            Self::MortgageRules => mortgage_rules(ctx, seed).await,
            Self::FallbackIntegrity => fallback_integrity(ctx, seed),
        }
    }
}

pub fn list_scenarios() -> impl Iterator<Item = (&'static str, &'static str)> {
    Scenario::ALL
        .into_iter()
        .map(|scenario| (scenario.key(), scenario.description()))
}

fn start_position(board: &Board, rules: &RulesConfig, seed: u64) -> usize {
    let size = board.size_or(rules.fallback_board_size);
    let size_u64 = u64::try_from(size).unwrap_or(1);
    usize::try_from(seed % size_u64).unwrap_or(0)
}

fn roster(ctx: &ScenarioContext, seed: u64) -> Vec<Player> {
    let start = start_position(&ctx.board, &ctx.rules, seed);
    vec![
        Player::new("North", STARTING_MONEY).at(start),
        Player::new("South", STARTING_MONEY).at(0),
    ]
}

fn ensure_on_board(session: &GameSession) -> Result<()> {
    let size = session.board_size();
    for player in session.players() {
        ensure!(
            player.position < size,
            "{} left the board at position {} (size {size})",
            player.name,
            player.position
        );
    }
    Ok(())
}

async fn smoke(ctx: &ScenarioContext, seed: u64) -> Result<IterationSummary> {
    let mut session = ctx.session(seed, roster(ctx, seed));
    let mut presenter = HeadlessPresenter::new(QuoteDecision::Cancel, ctx.verbose);
    let mut mover = ctx.mover();
    let mut resolved = 0;

    for player in 0..session.players().len() {
        for kind in CardKind::ALL {
            match resolve_card(&mut session, player, kind, &mut presenter, &mut mover).await {
                CardOutcome::Applied { .. } => resolved += 1,
                CardOutcome::EmptyDeck { kind } => bail!("{kind} deck came up empty"),
                CardOutcome::Aborted { kind, reason } => bail!("{kind} card aborted: {reason}"),
            }
            ensure_on_board(&session)?;
        }
    }

    ensure!(
        presenter.cards_shown == resolved,
        "{} cards shown for {resolved} resolutions",
        presenter.cards_shown
    );
    ensure!(
        presenter.stats_refreshes == resolved,
        "stats refreshed {} times for {resolved} resolutions",
        presenter.stats_refreshes
    );
    Ok(IterationSummary {
        cards_resolved: resolved,
        ..IterationSummary::default()
    })
}

async fn card_draws(ctx: &ScenarioContext, seed: u64) -> Result<IterationSummary> {
    let first = draw_sequence(ctx, seed).await?;
    let second = draw_sequence(ctx, seed).await?;
    ensure!(
        first == second,
        "draw sequence for seed {seed} is not repeatable ({first:016x} vs {second:016x})"
    );
    Ok(IterationSummary {
        cards_resolved: CARD_DRAWS,
        signature: Some(first),
        ..IterationSummary::default()
    })
}

/// Resolve a fixed number of cards and fold the drawn ids into a signature.
async fn draw_sequence(ctx: &ScenarioContext, seed: u64) -> Result<u64> {
    let mut session = ctx.session(seed, roster(ctx, seed));
    let mut presenter = HeadlessPresenter::new(QuoteDecision::Cancel, false);
    let mut mover = ctx.mover();
    let mut hasher = XxHash64::with_seed(seed);

    for draw in 0..CARD_DRAWS {
        let player = draw % session.players().len();
        let kind = CardKind::ALL[draw % CardKind::ALL.len()];
        let outcome = resolve_card(&mut session, player, kind, &mut presenter, &mut mover).await;
        let (card_id, action) = match outcome {
            CardOutcome::Applied {
                card_id, action, ..
            } => (card_id, action),
            other => bail!("draw {draw} ({kind}) did not apply: {other:?}"),
        };
        let in_deck = session
            .catalog()
            .cached(kind)
            .is_some_and(|deck| deck.cards().iter().any(|card| card.id == card_id));
        ensure!(in_deck, "card {card_id} is not in the {kind} deck");
        if action == Action::SendToJail {
            let jailed = session.player(player).is_some_and(|p| p.in_jail);
            ensure!(jailed, "jail card {card_id} left player {player} free");
        }
        ensure_on_board(&session)?;
        hasher.write(card_id.to_string().as_bytes());
    }
    Ok(hasher.finish())
}

/// Reference cost: `ceil(base * 1.1)` for the house interest rate, or `None`
/// when the product does not fit in an `i64`.
const fn reference_cost(base: i64) -> Option<i64> {
    match base.checked_mul(11) {
        Some(scaled) => match scaled.checked_add(9) {
            Some(rounded) => Some(rounded.div_euclid(10)),
            None => None,
        },
        None => None,
    }
}

fn ownable_squares(board: &Board) -> Vec<(usize, Square)> {
    let squares: Vec<(usize, Square)> = board
        .squares
        .iter()
        .enumerate()
        .filter(|(_, square)| square.kind.is_ownable())
        .map(|(position, square)| (position, square.clone()))
        .collect();
    if !squares.is_empty() {
        return squares;
    }
    vec![
        (
            0,
            Square::new(1, "Reference Avenue", SquareKind::Property).with_price(200),
        ),
        (
            1,
            Square::new(2, "Reference Place", SquareKind::Property).with_mortgage_value(75),
        ),
    ]
}

async fn mortgage_rules(ctx: &ScenarioContext, seed: u64) -> Result<IterationSummary> {
    let targets = ownable_squares(&ctx.board);
    let board = if ctx.board.squares.iter().any(|s| s.kind.is_ownable()) {
        ctx.board.clone()
    } else {
        Board::from_squares(targets.iter().map(|(_, square)| square.clone()).collect())
    };
    let scoped = ScenarioContext {
        board,
        ..ctx.clone()
    };
    let extra = i64::try_from(seed % 50).unwrap_or(0);
    let mut checked = 0;

    for (position, square) in &targets {
        let deed = OwnedProperty::new(square.id).mortgaged();
        let buyer = Player::new("Buyer", 0);
        let quote = mortgage::quote(square, &deed, &buyer, &scoped.rules);
        let (base, cost) = (quote.base_value, quote.total_cost);
        ensure!(
            cost >= base,
            "square {}: unmortgage cost {cost} is below the base value {base}",
            square.id
        );
        let expected = if scoped.rules.unmortgage_interest_pct == 10 {
            reference_cost(base)
        } else {
            None
        };
        if let Some(expected) = expected {
            ensure!(
                cost == expected,
                "square {}: cost {cost} for base {base}",
                square.id
            );
        }

        let holder = |money: i64, deeds: Vec<OwnedProperty>| {
            let mut player = Player::new("Holder", money).at(*position);
            player.properties = deeds;
            scoped.session(seed, vec![player])
        };

        expect_refusal(holder(cost - 1, vec![deed.clone()]), |err| {
            matches!(err, MortgageError::InsufficientFunds { required, .. } if *required == cost)
        })
        .await?;
        expect_refusal(holder(cost, Vec::new()), |err| {
            *err == MortgageError::NotOwned
        })
        .await?;
        expect_refusal(holder(cost, vec![OwnedProperty::new(square.id)]), |err| {
            *err == MortgageError::NotMortgaged
        })
        .await?;

        let mut session = holder(cost + extra, vec![deed.clone()]);
        let mut presenter = HeadlessPresenter::new(QuoteDecision::Confirm, ctx.verbose);
        let outcome = unmortgage(&mut session, 0, &mut presenter, &mut scoped.mover()).await;
        ensure!(
            matches!(outcome, MortgageOutcome::Applied(receipt) if receipt.total_cost == cost),
            "square {}: expected an applied unmortgage, got {outcome:?}",
            square.id
        );
        let after = session.player(0).map(|p| (p.money, p.property(square.id).map(|d| d.mortgaged)));
        ensure!(
            after == Some((extra, Some(false))),
            "square {}: state after unmortgage was {after:?}",
            square.id
        );

        let mut session = holder(cost * 3, vec![deed.clone()]);
        let mut dialog = MortgageDialog::new();
        dialog.open(&session, 0)?;
        let mut mover = scoped.mover();
        let first = dialog.confirm(&mut session, &mut mover);
        let second = dialog.confirm(&mut session, &mut mover);
        ensure!(
            matches!(first, DialogOutcome::Applied(_)) && second == DialogOutcome::Ignored,
            "square {}: double confirm gave {first:?} then {second:?}",
            square.id
        );
        let money = session.player(0).map_or(0, |p| p.money);
        ensure!(money == cost * 2, "square {}: double confirm charged twice", square.id);

        checked += 1;
    }

    Ok(IterationSummary {
        mortgages_checked: checked,
        ..IterationSummary::default()
    })
}

async fn expect_refusal(
    mut session: GameSession,
    expected: impl Fn(&MortgageError) -> bool,
) -> Result<()> {
    let before = session.snapshot();
    let mut presenter = HeadlessPresenter::new(QuoteDecision::Confirm, false);
    let outcome = unmortgage(&mut session, 0, &mut presenter, &mut WrappingMover::new(0)).await;
    match &outcome {
        MortgageOutcome::Rejected(err) if expected(err) => {}
        other => bail!("unexpected unmortgage outcome {other:?}"),
    }
    ensure!(presenter.quotes_shown == 0, "refused unmortgage still showed a quote");
    ensure!(
        presenter.notices.len() == 1,
        "expected one alert, got {}",
        presenter.notices.len()
    );
    ensure!(session.snapshot() == before, "refused unmortgage changed state");
    Ok(())
}

fn fallback_integrity(ctx: &ScenarioContext, seed: u64) -> Result<IterationSummary> {
    let board = Board::from_squares(ctx.board.squares.clone());
    let mut session = GameSession::new(seed, board, Vec::new(), ctx.rules.clone());
    let mut resolved = 0;

    for kind in CardKind::ALL {
        let allowed: HashSet<_> = fallback_deck(kind).into_iter().map(|card| card.id).collect();
        ensure!(
            session.deck(kind).source() == DeckSource::Fallback,
            "{kind} deck did not fall back"
        );
        let mut seen = HashSet::new();
        for _ in 0..FALLBACK_TRIALS {
            let Some(card) = draw_card(&mut session, kind) else {
                bail!("{kind} fallback deck is empty");
            };
            ensure!(allowed.contains(&card.id), "unexpected {kind} card {}", card.id);
            seen.insert(card.id);
            resolved += 1;
        }
        ensure!(
            seen.len() == allowed.len(),
            "{kind}: only {} of {} fallback cards drawn",
            seen.len(),
            allowed.len()
        );
    }

    Ok(IterationSummary {
        cards_resolved: resolved,
        ..IterationSummary::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(board: Board) -> ScenarioContext {
        ScenarioContext {
            board,
            rules: RulesConfig::default(),
            verbose: false,
        }
    }

    #[test]
    fn scenario_keys_round_trip() {
        for scenario in Scenario::ALL {
            assert_eq!(Scenario::from_key(scenario.key()), Some(scenario));
        }
        assert_eq!(Scenario::from_key("nope"), None);
        assert_eq!(list_scenarios().count(), 4);
    }

    #[test]
    fn reference_cost_matches_house_examples() {
        assert_eq!(reference_cost(100), Some(110));
        assert_eq!(reference_cost(75), Some(83));
        assert_eq!(reference_cost(70), Some(77));
    }

    #[test]
    fn reference_cost_is_skipped_for_oversized_bases() {
        assert_eq!(reference_cost(i64::MAX), None);
        assert_eq!(reference_cost(i64::MAX / 11 + 1), None);
        assert!(reference_cost(i64::MAX / 11 - 1).is_some());
    }

    #[tokio::test]
    async fn every_scenario_passes_on_an_empty_board() {
        let ctx = context(Board::default());
        for scenario in Scenario::ALL {
            let summary = scenario.run(&ctx, 1337).await;
            assert!(summary.is_ok(), "{}: {summary:?}", scenario.key());
        }
    }

    #[tokio::test]
    async fn mortgage_rules_cover_each_ownable_square() {
        let board = Board::from_squares(vec![
            Square::new(0, "Go", SquareKind::Special),
            Square::new(1, "Lot", SquareKind::Property).with_price(140),
            Square::new(2, "Line", SquareKind::Railroad).with_mortgage_value(100),
            Square::new(3, "Jail", SquareKind::Special),
        ]);
        let summary = Scenario::MortgageRules.run(&context(board), 7).await.unwrap();
        assert_eq!(summary.mortgages_checked, 2);
    }

    #[tokio::test]
    async fn card_draw_signature_depends_on_seed() {
        let ctx = context(Board::default());
        let a = Scenario::CardDraws.run(&ctx, 1).await.unwrap().signature;
        let b = Scenario::CardDraws.run(&ctx, 2).await.unwrap().signature;
        assert!(a.is_some());
        assert_ne!(a, b);
    }
}
