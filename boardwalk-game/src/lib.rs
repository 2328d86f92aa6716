//! Boardwalk Rules Core
//!
//! Platform-agnostic resolution of chance/community cards and unmortgage
//! transactions for a property-trading board game. Turn order, dice, trading
//! and bankruptcy belong to the host game loop; this crate resolves one card
//! or one mortgage lift once the loop triggers it.

pub mod board;
pub mod cards;
pub mod config;
pub mod constants;
pub mod flow;
pub mod host;
pub mod interpreter;
pub mod mortgage;
pub mod player;
pub mod rng;
pub mod session;

// Re-export commonly used types
pub use board::{Board, BoardError, Square, SquareId, SquareKind};
pub use cards::{
    Action, AmountBadge, BadgeTone, Card, CardCatalog, CardFace, CardId, CardIdMint, CardKind,
    Deck, DeckSource, fallback_deck, map_raw_card,
};
pub use config::{AlertTimings, ConfigError, DeckStyle, RulesConfig};
pub use flow::{CardFlowError, CardOutcome, draw_card, resolve_card};
pub use host::{
    BoardHost, HostError, Notice, NoticeLevel, PresentError, Presenter, QuoteDecision,
    WrappingMover,
};
pub use interpreter::{Mutation, Mutations, apply_mutations, forward_steps, interpret};
pub use mortgage::{
    DialogOutcome, MortgageDialog, MortgageError, MortgageOutcome, MortgageQuote, QuoteView,
    UnmortgageTicket, unmortgage, unmortgage_cost,
};
pub use player::{OwnedProperty, Player};
pub use rng::{CountingRng, RngBundle};
pub use session::{GameSession, PlayerId, SessionSnapshot};

/// Trait for abstracting where board data comes from
/// Platform-specific implementations should provide this
pub trait BoardLoader {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the board, including any raw card collections
    ///
    /// # Errors
    ///
    /// Returns an error if the board cannot be fetched or parsed.
    fn load_board(&self) -> Result<Board, Self::Error>;

    /// Load rules overrides; the house rules by default
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded or parsed.
    fn load_rules(&self) -> Result<RulesConfig, Self::Error> {
        Ok(RulesConfig::default())
    }
}

/// Main engine for creating game sessions
pub struct GameEngine<L>
where
    L: BoardLoader,
{
    loader: L,
}

impl<L> GameEngine<L>
where
    L: BoardLoader,
{
    /// Create a new engine with the provided board loader
    pub const fn new(loader: L) -> Self {
        Self { loader }
    }

    /// Create a session for `players` with the given seed.
    ///
    /// # Errors
    ///
    /// Returns an error if the board or rules cannot be loaded.
    pub fn create_session(&self, seed: u64, players: Vec<Player>) -> Result<GameSession, L::Error> {
        let board = self.loader.load_board()?;
        let rules = self.loader.load_rules()?;
        Ok(GameSession::new(seed, board, players, rules))
    }

    /// Like [`create_session`](Self::create_session), but also checks the
    /// board and the rules before handing the session out.
    ///
    /// # Errors
    ///
    /// Returns an error if loading fails, square ids collide, or the rules
    /// violate an invariant.
    pub fn create_checked_session(
        &self,
        seed: u64,
        players: Vec<Player>,
    ) -> Result<GameSession, anyhow::Error>
    where
        L::Error: Into<anyhow::Error>,
    {
        let board = self.loader.load_board().map_err(Into::into)?;
        board.validate()?;
        let rules = self.loader.load_rules().map_err(Into::into)?;
        rules.validate()?;
        Ok(GameSession::new(seed, board, players, rules))
    }
}
