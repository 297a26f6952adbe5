//! Game state: the canonical, immutable snapshot of a match.
//!
//! ## GameState
//!
//! Everything needed to continue a match:
//! - Rules and board (fixed for the match)
//! - Players and their companies
//! - Current player, phase, status and turn number
//! - Per-turn scratch state (open offers, last roll)
//! - Market sentiment and event deck
//! - Random-stream cursor
//! - History of log entries
//!
//! Uses `im` persistent vectors so cloning a snapshot is O(1); the engine
//! clones, edits the clone, and hands it back as the next state. Public API
//! is read-only.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::action::LogEntry;
use super::board::{Board, Tile};
use super::config::RulesConfig;
use super::market::Market;
use super::money::Cash;
use super::phase::{GameStatus, Phase};
use super::player::{Player, PlayerId};
use super::rng::{DiceRoll, RngCursor};
use crate::error::EngineError;

/// BLAKE3 digest of a state (history excluded).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StateHash(pub [u8; 32]);

impl StateHash {
    /// Lowercase hex rendering.
    #[must_use]
    pub fn to_hex(&self) -> String {
        blake3::Hash::from(self.0).to_hex().to_string()
    }
}

impl std::fmt::Display for StateHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl std::fmt::Debug for StateHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "StateHash({})", &self.to_hex()[..16])
    }
}

/// Funding round open to the current player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FundingOffer {
    /// Equity points investors will still take.
    pub remaining_stake: u8,
    /// Price relative to valuation, in percent.
    pub terms_pct: u16,
}

/// Product the current player may build this turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BuildOffer {
    /// Cash needed.
    pub cost: Cash,
    /// Value added on completion.
    pub value: Cash,
}

/// Per-turn state, cleared when a turn starts.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TurnState {
    /// This turn's roll, once made.
    pub roll: Option<DiceRoll>,
    /// Open funding round.
    pub funding: Option<FundingOffer>,
    /// Open build opportunity.
    pub build: Option<BuildOffer>,
}

/// Complete match state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub(crate) rules: RulesConfig,
    pub(crate) board: Board,
    pub(crate) players: Vector<Player>,
    pub(crate) current: PlayerId,
    pub(crate) phase: Phase,
    pub(crate) status: GameStatus,
    pub(crate) turn_number: u32,
    pub(crate) turn: TurnState,
    pub(crate) market: Market,
    pub(crate) rng: RngCursor,
    pub(crate) history: Vector<LogEntry>,
}

/// Borrowed view of everything that defines a position, minus history.
#[derive(Serialize)]
struct HashView<'a> {
    rules: &'a RulesConfig,
    board: &'a Board,
    players: &'a Vector<Player>,
    current: PlayerId,
    phase: Phase,
    status: GameStatus,
    turn_number: u32,
    turn: &'a TurnState,
    market: &'a Market,
    rng: &'a RngCursor,
}

impl GameState {
    /// Start a match on the standard board with default rules.
    ///
    /// Seats are assigned in the order names are given.
    ///
    /// # Errors
    ///
    /// See [`super::setup::GameSetup::build`].
    pub fn new<S: Into<String>>(
        names: impl IntoIterator<Item = S>,
        seed: u64,
    ) -> Result<Self, crate::error::SetupError> {
        super::setup::GameSetup::new(seed).players(names).build()
    }

    /// Rules in force.
    #[must_use]
    pub fn rules(&self) -> &RulesConfig {
        &self.rules
    }

    /// The board.
    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Tile at a board position.
    #[must_use]
    pub fn tile_at(&self, position: u8) -> Option<&Tile> {
        self.board.get(position)
    }

    /// All players in seat order, including bankrupt ones.
    #[must_use]
    pub fn players(&self) -> &Vector<Player> {
        &self.players
    }

    /// Number of seats.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Look up a player.
    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id.index())
    }

    /// Players still in the game.
    pub fn active_players(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| p.active)
    }

    /// Whose turn it is.
    #[must_use]
    pub fn current_player_id(&self) -> PlayerId {
        self.current
    }

    /// The current player.
    #[must_use]
    pub fn current_player(&self) -> Option<&Player> {
        self.player(self.current)
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Match status.
    #[must_use]
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Has the match ended?
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Turn number, starting at 1.
    #[must_use]
    pub fn turn_number(&self) -> u32 {
        self.turn_number
    }

    /// Per-turn scratch state.
    #[must_use]
    pub fn turn(&self) -> &TurnState {
        &self.turn
    }

    /// Market conditions.
    #[must_use]
    pub fn market(&self) -> &Market {
        &self.market
    }

    /// Position in the random stream.
    #[must_use]
    pub fn rng_cursor(&self) -> RngCursor {
        self.rng
    }

    /// Every accepted action so far.
    #[must_use]
    pub fn history(&self) -> &Vector<LogEntry> {
        &self.history
    }

    /// Hash of the state, excluding history.
    ///
    /// Two states with the same hash continue identically under the same
    /// actions.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Encoding`] if the state cannot be encoded.
    pub fn state_hash(&self) -> Result<StateHash, EngineError> {
        let view = HashView {
            rules: &self.rules,
            board: &self.board,
            players: &self.players,
            current: self.current,
            phase: self.phase,
            status: self.status,
            turn_number: self.turn_number,
            turn: &self.turn,
            market: &self.market,
            rng: &self.rng,
        };
        let mut hasher = blake3::Hasher::new();
        bincode::serialize_into(&mut hasher, &view)?;
        Ok(StateHash(*hasher.finalize().as_bytes()))
    }

    // === Crate-internal mutation, used on cloned snapshots only ===

    pub(crate) fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.get_mut(id.index())
    }
}
