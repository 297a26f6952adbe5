//! Error and rejection types.
//!
//! Two families:
//! - [`Rejection`]: an illegal action. Recoverable; the state is untouched.
//! - [`EngineError`], [`SetupError`]: the engine cannot proceed. A
//!   `CorruptState` means the snapshot itself is broken and the host should
//!   stop the match.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::config::ConfigError;
use crate::core::Tile;

/// Why an action was refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum Rejection {
    /// The author is not the current player.
    #[error("not your turn")]
    NotYourTurn,
    /// The action is not allowed in the current phase.
    #[error("action not allowed in this phase")]
    WrongPhase,
    /// Not enough cash.
    #[error("insufficient funds")]
    InsufficientFunds,
    /// Founder equity would drop below the floor.
    #[error("equity would fall below the floor")]
    EquityFloorViolation,
    /// Nothing to act on, or the payload is out of range.
    #[error("invalid target")]
    InvalidTarget,
    /// The game has ended.
    #[error("game already over")]
    GameAlreadyOver,
    /// Valuation is below the IPO threshold.
    #[error("valuation below IPO threshold")]
    BelowIpoThreshold,
}

/// A structural invariant that does not hold.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

impl InvariantViolation {
    /// Create a violation.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Unrecoverable engine failure.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The input snapshot breaks structural invariants.
    #[error("corrupt state: {}", join(.violations))]
    CorruptState {
        /// Everything found wrong.
        violations: Vec<InvariantViolation>,
    },

    /// A state could not be encoded for hashing.
    #[error("state encoding failed: {0}")]
    Encoding(#[from] bincode::Error),
}

fn join(violations: &[InvariantViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// A match could not be created.
#[derive(Debug, Error)]
pub enum SetupError {
    /// Too few or too many players.
    #[error("{count} players given, need {min}..={max}")]
    PlayerCount {
        /// Players given.
        count: usize,
        /// Lower bound.
        min: u8,
        /// Upper bound.
        max: u8,
    },

    /// Two players share a name.
    #[error("duplicate player name {0:?}")]
    DuplicatePlayer(String),

    /// The board does not match the configured size.
    #[error("board has {actual} tiles, rules require {expected}")]
    BoardSize {
        /// Configured size.
        expected: u8,
        /// Provided board length.
        actual: usize,
    },

    /// A tile's parameters are out of range.
    #[error("tile {position} ({tile}) has invalid parameters")]
    InvalidTile {
        /// Board position.
        position: u8,
        /// The offending tile.
        tile: Tile,
    },

    /// The rules are inconsistent.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
