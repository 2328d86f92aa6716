//! Centralized rules and tuning constants for Boardwalk game logic.
//!
//! These values define the deterministic math for card resolution and
//! mortgage economics. Anything a host may legitimately tune is mirrored
//! in [`crate::config::RulesConfig`]; the values here are its defaults.

// Logging keys -------------------------------------------------------------
pub(crate) const LOG_DECK_BACKEND: &str = "log.deck.backend";
pub(crate) const LOG_DECK_FALLBACK: &str = "log.deck.fallback";
pub(crate) const LOG_CARD_DRAWN: &str = "log.card.drawn";
pub(crate) const LOG_CARD_DROPPED: &str = "log.card.dropped";
pub(crate) const LOG_CARD_UNKNOWN_ACTION: &str = "log.card.unknown-action";
pub(crate) const LOG_CARD_EMPTY_DECK: &str = "log.card.empty-deck";
pub(crate) const LOG_FLOW_ABORTED: &str = "log.flow.aborted";
pub(crate) const LOG_STATS_UNAVAILABLE: &str = "log.stats.unavailable";
pub(crate) const LOG_JAIL_NO_SQUARE: &str = "log.jail.no-square";
pub(crate) const LOG_MORTGAGE_REJECTED: &str = "log.mortgage.rejected";
pub(crate) const LOG_MORTGAGE_APPLIED: &str = "log.mortgage.applied";
pub(crate) const LOG_MORTGAGE_CANCELLED: &str = "log.mortgage.cancelled";
pub(crate) const LOG_MORTGAGE_STALE: &str = "log.mortgage.stale";

// Board --------------------------------------------------------------------
/// Track length assumed when the board exposes no squares.
pub const DEFAULT_BOARD_SIZE: usize = 40;
/// Case-insensitive name pattern identifying the jail square and jail tokens.
pub(crate) const JAIL_PATTERN: &str = r"(?i)jail|c[aá]rcel";

// Economy ------------------------------------------------------------------
/// Price assumed for a property that carries none when deriving its mortgage value.
pub const DEFAULT_PROPERTY_PRICE: i64 = 100;
/// Interest charged on top of the mortgage value to lift a mortgage, in percent.
pub const UNMORTGAGE_INTEREST_PCT: i64 = 10;
/// Bonus the reference mover credits for passing the start square.
pub const PASS_START_BONUS: i64 = 200;

// Presentation defaults ----------------------------------------------------
pub const DEFAULT_CARD_TEXT: &str = "Card";
pub const DEFAULT_PROPERTY_NAME: &str = "Property";
pub const DEFAULT_PROPERTY_DESCRIPTION: &str = "Mortgaged property.";
pub const CHANCE_LABEL: &str = "Chance";
pub const CHANCE_ACCENT: &str = "#9b59b6";
pub const COMMUNITY_LABEL: &str = "Community Chest";
pub const COMMUNITY_ACCENT: &str = "#27ae60";
pub const EMPTY_DECK_MESSAGE: &str = "No cards available";

// Alert durations (milliseconds) -------------------------------------------
pub const ALERT_MS_OWNERSHIP: u32 = 3_000;
pub const ALERT_MS_FUNDS: u32 = 3_500;

// RNG stream tags ------------------------------------------------------------
pub(crate) const STREAM_CHANCE: &[u8] = b"deck-chance";
pub(crate) const STREAM_COMMUNITY: &[u8] = b"deck-community";
pub(crate) const STREAM_CARD_IDS: &[u8] = b"card-ids";
