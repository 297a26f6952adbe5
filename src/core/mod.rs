//! Core state model: players, money, board, market, actions, state, RNG,
//! configuration.
//!
//! Nothing here decides legality or applies rules; see [`crate::rules`].
//! Public types are immutable from the outside: a `GameState` can be read
//! and serialized, and only the transition engine produces new ones.

pub mod action;
pub mod board;
pub mod config;
pub mod market;
pub mod money;
pub mod phase;
pub mod player;
pub mod rng;
pub mod setup;
pub mod state;

pub use action::{Action, ActionKind, Event, LogEntry};
pub use board::{Board, Tile};
pub use config::{ConfigError, RulesConfig};
pub use market::{Market, MarketCard};
pub use money::Cash;
pub use phase::{GameStatus, Phase};
pub use player::{Company, Player, PlayerId};
pub use rng::{DiceRoll, GameRng, RngCursor};
pub use setup::GameSetup;
pub use state::{BuildOffer, FundingOffer, GameState, StateHash, TurnState};
