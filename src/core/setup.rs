//! Match creation.
//!
//! `GameSetup` is the only way to produce a first `GameState`; every later
//! state comes from the transition engine.

use im::Vector;
use rustc_hash::FxHashSet;

use super::board::Board;
use super::config::RulesConfig;
use super::market::Market;
use super::phase::{GameStatus, Phase};
use super::player::{Player, PlayerId};
use super::rng::GameRng;
use super::state::{GameState, TurnState};
use crate::error::SetupError;
use crate::rules::{turn, valuation};

/// Builder for the initial state of a match.
///
/// ```
/// use bubble_engine::core::{GameSetup, RulesConfig};
///
/// let state = GameSetup::new(7)
///     .player("ada")
///     .player("bo")
///     .rules(RulesConfig::default())
///     .build()
///     .unwrap();
///
/// assert_eq!(state.player_count(), 2);
/// ```
#[derive(Clone, Debug)]
pub struct GameSetup {
    seed: u64,
    names: Vec<String>,
    rules: RulesConfig,
    board: Option<Board>,
}

impl GameSetup {
    /// Start a setup with the given random seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            names: Vec::new(),
            rules: RulesConfig::default(),
            board: None,
        }
    }

    /// Add a player. Seats follow call order.
    #[must_use]
    pub fn player(mut self, name: impl Into<String>) -> Self {
        self.names.push(name.into());
        self
    }

    /// Add several players.
    #[must_use]
    pub fn players<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.names.extend(names.into_iter().map(Into::into));
        self
    }

    /// Use a custom rule set.
    #[must_use]
    pub fn rules(mut self, rules: RulesConfig) -> Self {
        self.rules = rules;
        self
    }

    /// Use a custom board. Its length must equal `rules.board_size`.
    #[must_use]
    pub fn board(mut self, board: Board) -> Self {
        self.board = Some(board);
        self
    }

    /// Build the initial state.
    ///
    /// The market deck is shuffled from the match's random stream, so the
    /// stored cursor already reflects that draw.
    ///
    /// # Errors
    ///
    /// - [`SetupError::Config`] if the rules are inconsistent
    /// - [`SetupError::PlayerCount`] outside `min_players..=max_players`
    /// - [`SetupError::DuplicatePlayer`] if two names collide
    /// - [`SetupError::BoardSize`] if the board length is wrong
    pub fn build(self) -> Result<GameState, SetupError> {
        let rules = self.rules;
        rules.validate()?;

        let count = self.names.len();
        if count < usize::from(rules.min_players) || count > usize::from(rules.max_players) {
            return Err(SetupError::PlayerCount {
                count,
                min: rules.min_players,
                max: rules.max_players,
            });
        }

        let mut seen = FxHashSet::default();
        for name in &self.names {
            if !seen.insert(name.as_str()) {
                return Err(SetupError::DuplicatePlayer(name.clone()));
            }
        }

        let board = self.board.unwrap_or_else(Board::standard);
        if board.len() != usize::from(rules.board_size) {
            return Err(SetupError::BoardSize {
                expected: rules.board_size,
                actual: board.len(),
            });
        }
        if let Some((position, tile)) = board.malformed_tiles().next() {
            return Err(SetupError::InvalidTile {
                position,
                tile: *tile,
            });
        }

        let mut rng = GameRng::new(self.seed);
        let market = Market::new(rules.starting_sentiment, &mut rng);

        let players: Vector<Player> = self
            .names
            .into_iter()
            .enumerate()
            .map(|(seat, name)| {
                Player::new(
                    PlayerId::new(seat as u8),
                    name,
                    rules.starting_cash,
                    rules.starting_equity,
                )
            })
            .collect();

        let mut state = GameState {
            rules,
            board,
            players,
            current: PlayerId::new(0),
            phase: Phase::Start,
            status: GameStatus::InProgress,
            turn_number: 1,
            turn: TurnState::default(),
            market,
            rng: rng.cursor(),
            history: Vector::new(),
        };

        valuation::revalue_all(&mut state);
        let mut events = smallvec::SmallVec::new();
        turn::begin_turn(&mut state, &mut events);

        tracing::debug!(
            players = state.player_count(),
            seed = self.seed,
            "match created"
        );

        Ok(state)
    }
}
