use async_trait::async_trait;
use boardwalk_game::{
    Action, BadgeTone, Board, BoardHost, CardFace, CardId, CardKind, CardOutcome, DeckSource,
    GameSession, HostError, Mutation, Notice, Player, PresentError, Presenter, QuoteDecision,
    QuoteView, RulesConfig, WrappingMover, draw_card, resolve_card,
};
use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

fn load_board() -> Board {
    Board::from_json(include_str!("fixtures/board.json")).unwrap()
}

fn session(seed: u64, player: Player) -> GameSession {
    GameSession::new(seed, load_board(), vec![player], RulesConfig::default())
}

type Events = Rc<RefCell<Vec<String>>>;

/// Presenter that records what it shows into a journal shared with the host.
#[derive(Default)]
struct Journal {
    events: Events,
    faces: Vec<CardFace>,
    notices: Vec<Notice>,
}

#[async_trait(?Send)]
impl Presenter for Journal {
    async fn show_card(&mut self, face: &CardFace) -> Result<(), PresentError> {
        self.events.borrow_mut().push(format!("show {}", face.card_id));
        self.faces.push(face.clone());
        Ok(())
    }

    async fn confirm_unmortgage(&mut self, _view: &QuoteView) -> Result<QuoteDecision, PresentError> {
        Ok(QuoteDecision::Cancel)
    }

    fn notify(&mut self, notice: &Notice) {
        self.notices.push(notice.clone());
    }
}

/// Host that logs moves into the shared journal and delegates to the wrapping mover.
struct JournalHost {
    events: Events,
    mover: WrappingMover,
}

impl BoardHost for JournalHost {
    fn move_token(
        &mut self,
        player: &mut Player,
        steps: i64,
        board_size: usize,
    ) -> Result<(), HostError> {
        self.events.borrow_mut().push(format!("move {steps}"));
        self.mover.move_token(player, steps, board_size)
    }
}

#[test]
fn backend_decks_are_mapped_with_bad_entries_dropped() {
    let mut session = session(7, Player::new("Ada", 1_500));
    let chance = session.deck(CardKind::Chance).clone();
    assert_eq!(chance.source(), DeckSource::Backend);
    assert_eq!(chance.len(), 4, "the string entry is dropped");
    let ids: Vec<&CardId> = chance.cards().iter().map(|c| &c.id).collect();
    assert_eq!(ids[0], &CardId::Number(11));
    assert!(matches!(ids[3], CardId::Text(text) if text.starts_with("card-")));
    assert_eq!(chance.cards()[1].action, Action::SendToJail);
    assert_eq!(chance.cards()[1].text, "Ve a la cárcel");

    let community = session.deck(CardKind::Community);
    assert_eq!(community.cards()[0].action, Action::Collect { amount: 150 });
    assert_eq!(community.cards()[0].text, "Gain $150");
    assert_eq!(community.cards()[2].action, Action::NoOp);
}

#[test]
fn draws_are_repeatable_per_seed() {
    let sequence = |seed| {
        let mut session = session(seed, Player::new("Ada", 0));
        (0..32)
            .map(|_| draw_card(&mut session, CardKind::Chance).unwrap().id)
            .collect::<Vec<_>>()
    };
    assert_eq!(sequence(99), sequence(99));
    assert_ne!(sequence(99), sequence(100));
}

#[test]
fn draws_never_shrink_the_deck() {
    let mut session = session(3, Player::new("Ada", 0));
    let mut seen = HashSet::new();
    for _ in 0..200 {
        seen.insert(draw_card(&mut session, CardKind::Community).unwrap().id);
    }
    assert_eq!(seen.len(), 3);
    assert_eq!(session.deck(CardKind::Community).len(), 3);
}

#[tokio::test]
async fn every_card_is_shown_before_its_move() {
    let mut session = session(21, Player::new("Ada", 1_500).at(7));
    let mut presenter = Journal::default();
    let mut host = JournalHost {
        events: Rc::clone(&presenter.events),
        mover: WrappingMover::new(200),
    };
    for _ in 0..24 {
        let outcome = resolve_card(&mut session, 0, CardKind::Chance, &mut presenter, &mut host).await;
        let CardOutcome::Applied { card_id, mutations, .. } = outcome else {
            panic!("chance card should apply");
        };
        let moves = mutations
            .iter()
            .filter(|m| matches!(m, Mutation::MoveToken(_)))
            .count();
        let events = presenter.events.borrow();
        let shown_at = events
            .iter()
            .rposition(|e| e.starts_with("show "))
            .unwrap();
        assert_eq!(events[shown_at], format!("show {card_id}"));
        assert_eq!(events.len() - shown_at - 1, moves, "moves follow the card");
        drop(events);
        assert!(session.player(0).unwrap().position < session.board_size());
    }
    assert_eq!(presenter.faces.len(), 24);
}

#[tokio::test]
async fn advance_to_start_from_position_seven_pays_once_for_bonus_and_once_for_passing() {
    // Card 11: moveTo 0 with reward 200. The wrapping mover also pays 200 for
    // reaching the start square.
    let mut session = session(5, Player::new("Ada", 1_000).at(7));
    let mut presenter = Journal::default();
    let mut mover = WrappingMover::new(200);
    for _ in 0..64 {
        let before = session.player(0).cloned().unwrap();
        let outcome = resolve_card(&mut session, 0, CardKind::Chance, &mut presenter, &mut mover).await;
        if let CardOutcome::Applied { card_id: CardId::Number(11), mutations, .. } = outcome {
            assert_eq!(
                mutations.as_slice(),
                &[Mutation::AdjustMoney(200), Mutation::MoveToken(3)]
            );
            let after = session.player(0).unwrap();
            assert_eq!(after.position, 0);
            assert_eq!(after.money, before.money + 400);
            return;
        }
        if let Some(slot) = session.player_mut(0) {
            *slot = Player::new("Ada", 1_000).at(7);
        }
    }
    panic!("advance card never drawn in 64 tries");
}

#[tokio::test]
async fn jail_card_moves_to_the_named_jail_square() {
    let mut session = session(8, Player::new("Ada", 1_000).at(9));
    let mut presenter = Journal::default();
    let mut mover = WrappingMover::new(200);
    for _ in 0..64 {
        if let Some(slot) = session.player_mut(0) {
            *slot = Player::new("Ada", 1_000).at(9);
        }
        let outcome = resolve_card(&mut session, 0, CardKind::Chance, &mut presenter, &mut mover).await;
        if let CardOutcome::Applied { action: Action::SendToJail, .. } = outcome {
            let player = session.player(0).unwrap();
            assert!(player.in_jail);
            assert_eq!(player.position, 8);
            return;
        }
    }
    panic!("jail card never drawn in 64 tries");
}

#[tokio::test]
async fn card_faces_carry_amount_badges() {
    let mut session = session(2, Player::new("Ada", 1_000));
    let mut presenter = Journal::default();
    let mut mover = WrappingMover::new(200);
    for _ in 0..48 {
        resolve_card(&mut session, 0, CardKind::Community, &mut presenter, &mut mover).await;
    }
    let hospital = presenter
        .faces
        .iter()
        .find(|face| face.card_id == CardId::Number(22))
        .expect("hospital card drawn");
    let badge = hospital.badge.as_ref().unwrap();
    assert_eq!(badge.text, "$100");
    assert_eq!(badge.tone, BadgeTone::Negative);
    assert_eq!(hospital.label, "Community Chest");

    let birthday = presenter
        .faces
        .iter()
        .find(|face| face.card_id == CardId::Number(23))
        .expect("birthday card drawn");
    assert!(birthday.badge.is_none());
    assert!(presenter.notices.is_empty());
}
