use serde::{Deserialize, Serialize};

use crate::board::{Board, Square};
use crate::cards::{CardCatalog, CardIdMint, CardKind, Deck};
use crate::config::RulesConfig;
use crate::player::Player;
use crate::rng::RngBundle;

pub type PlayerId = usize;

/// Serializable view of a session's mutable state, for saves and reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub seed: u64,
    pub players: Vec<Player>,
    pub chance_draws: u64,
    pub community_draws: u64,
}

/// Everything one game needs to resolve cards and mortgages.
///
/// Operations take the session explicitly; holding `&mut GameSession` for the
/// length of a flow is what keeps two flows from interleaving.
#[derive(Debug, Clone)]
pub struct GameSession {
    board: Board,
    players: Vec<Player>,
    config: RulesConfig,
    catalog: CardCatalog,
    rng: RngBundle,
}

impl GameSession {
    /// Construct a session from seed, board and roster.
    #[must_use]
    pub fn new(seed: u64, board: Board, players: Vec<Player>, config: RulesConfig) -> Self {
        let rng = RngBundle::from_user_seed(seed);
        let catalog = CardCatalog::new(CardIdMint::from_seed(rng.card_id_seed()));
        Self {
            board,
            players,
            config,
            catalog,
            rng,
        }
    }

    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.rng.seed()
    }

    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// Replace the board data. Decks already established keep their cards.
    pub fn set_board(&mut self, board: Board) {
        self.board = board;
    }

    #[must_use]
    pub const fn config(&self) -> &RulesConfig {
        &self.config
    }

    #[must_use]
    pub fn board_size(&self) -> usize {
        self.board.size_or(self.config.fallback_board_size)
    }

    #[must_use]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id)
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.get_mut(id)
    }

    /// Square under the player's token.
    #[must_use]
    pub fn square_under(&self, id: PlayerId) -> Option<&Square> {
        let player = self.player(id)?;
        self.board.square_at(player.position)
    }

    /// Deck for `kind`, established on first request.
    pub fn deck(&mut self, kind: CardKind) -> &Deck {
        self.catalog.deck(kind, &self.board)
    }

    #[must_use]
    pub const fn catalog(&self) -> &CardCatalog {
        &self.catalog
    }

    /// Split borrow used by the card flow: deck, draw stream and board at once.
    pub(crate) fn draw_parts(&mut self, kind: CardKind) -> (&Deck, &mut RngBundle, &Board) {
        let deck = self.catalog.deck(kind, &self.board);
        (deck, &mut self.rng, &self.board)
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            seed: self.seed(),
            players: self.players.clone(),
            chance_draws: self.rng.draws(CardKind::Chance),
            community_draws: self.rng.draws(CardKind::Community),
        }
    }
}
