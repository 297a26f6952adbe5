//! Turn phases and game status.

use serde::{Deserialize, Serialize};

use super::player::PlayerId;

/// Phase within a turn.
///
/// Turns run `Start -> Roll -> Resolve -> Act -> End`. `Start`, `Resolve`
/// and `End` are passed through inside a single transition, so a state at
/// rest is always in `Roll` or `Act`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Turn housekeeping.
    Start,
    /// Waiting for the roll.
    Roll,
    /// Applying the landed tile.
    Resolve,
    /// Free actions until the player ends the turn.
    Act,
    /// Bankruptcy and game-end checks.
    End,
}

impl Phase {
    /// Is this a phase where the current player is expected to act?
    #[must_use]
    pub const fn awaits_player(self) -> bool {
        matches!(self, Phase::Roll | Phase::Act)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}

/// Overall state of the match.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    /// Play continues.
    #[default]
    InProgress,
    /// A player won, by valuation or as last founder standing.
    Won(PlayerId),
    /// Nobody won: every founder went bust or the bubble burst.
    Lost,
}

impl GameStatus {
    /// Has the game ended?
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, GameStatus::InProgress)
    }

    /// The winner, if any.
    #[must_use]
    pub const fn winner(self) -> Option<PlayerId> {
        match self {
            GameStatus::Won(player) => Some(player),
            _ => None,
        }
    }
}
