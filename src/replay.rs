//! Deterministic replay and audit.
//!
//! Because `apply` is a pure function of its inputs, an initial state plus
//! the ordered list of accepted actions reproduces a match exactly. Every
//! `LogEntry` carries the hash of the state it produced, so a stored log can
//! be checked step by step against a fresh re-run.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::{Action, GameState, LogEntry, PlayerId, StateHash};
use crate::error::{EngineError, Rejection};
use crate::rules::{self, TransitionResult};

/// Replay failure.
#[derive(Debug, Error)]
pub enum ReplayError {
    /// A recorded action was illegal when re-applied.
    #[error("step {step}: {action} by {player} rejected: {reason}")]
    Rejected {
        /// Index of the failing step.
        step: usize,
        /// Recorded author.
        player: PlayerId,
        /// Recorded action.
        action: Action,
        /// Why it was refused.
        reason: Rejection,
    },

    /// A re-run produced a different state than the log recorded.
    #[error("step {step}: expected state {expected}, got {actual}")]
    HashMismatch {
        /// Index of the failing step.
        step: usize,
        /// Hash in the log.
        expected: StateHash,
        /// Hash of the re-run.
        actual: StateHash,
    },

    /// A log entry is out of sequence.
    #[error("step {step}: log entry has sequence {found}")]
    Sequence {
        /// Index of the failing step.
        step: usize,
        /// Sequence number in the entry.
        found: u32,
    },

    /// The engine refused to continue.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// A recording could not be encoded or decoded.
    #[error("recording encoding failed: {0}")]
    Encoding(#[from] bincode::Error),
}

/// One accepted action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedAction {
    /// Author.
    pub player: PlayerId,
    /// The action.
    pub action: Action,
}

/// A match as a starting state and the actions taken from it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recording {
    /// State before the first action.
    pub initial: GameState,
    /// Accepted actions in order.
    pub actions: Vec<RecordedAction>,
}

impl Recording {
    /// Start an empty recording.
    #[must_use]
    pub fn new(initial: GameState) -> Self {
        Self {
            initial,
            actions: Vec::new(),
        }
    }

    /// Rebuild a recording from a later state's history.
    ///
    /// `initial` must be the state the history started from.
    #[must_use]
    pub fn from_history(initial: GameState, state: &GameState) -> Self {
        let actions = state
            .history()
            .iter()
            .skip(initial.history().len())
            .map(|entry| RecordedAction {
                player: entry.player,
                action: entry.action,
            })
            .collect();
        Self { initial, actions }
    }

    /// Append an action.
    pub fn push(&mut self, player: PlayerId, action: Action) {
        self.actions.push(RecordedAction { player, action });
    }

    /// Encode with bincode.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError::Encoding`] if serialization fails.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ReplayError> {
        Ok(bincode::serialize(self)?)
    }

    /// Decode from bincode.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError::Encoding`] if the bytes are not a recording.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ReplayError> {
        Ok(bincode::deserialize(bytes)?)
    }

    /// Re-run the recording.
    ///
    /// # Errors
    ///
    /// See [`replay`].
    pub fn replay(&self) -> Result<GameState, ReplayError> {
        replay(&self.initial, &self.actions)
    }
}

/// Apply `actions` in order, starting from `initial`.
///
/// # Errors
///
/// Fails on the first rejected action or engine error.
pub fn replay(initial: &GameState, actions: &[RecordedAction]) -> Result<GameState, ReplayError> {
    let mut state = initial.clone();
    for (step, recorded) in actions.iter().enumerate() {
        state = step_once(&state, step, recorded.player, &recorded.action)?.next_state;
    }
    tracing::debug!(steps = actions.len(), "replay complete");
    Ok(state)
}

/// Re-run `log` from `initial` and check every resulting state hash.
///
/// Returns the final state on success.
///
/// # Errors
///
/// Fails at the first entry whose action is rejected, whose sequence number
/// is out of place, or whose recorded hash differs from the re-run.
pub fn verify_log(initial: &GameState, log: &[LogEntry]) -> Result<GameState, ReplayError> {
    let mut state = initial.clone();
    let offset = initial.history().len();

    for (step, entry) in log.iter().enumerate() {
        let expected_sequence = u32::try_from(offset + step).unwrap_or(u32::MAX);
        if entry.sequence != expected_sequence {
            return Err(ReplayError::Sequence {
                step,
                found: entry.sequence,
            });
        }

        let transition = step_once(&state, step, entry.player, &entry.action)?;
        let actual = transition.log_entry.resulting_state_hash;
        if actual != entry.resulting_state_hash {
            tracing::warn!(step, expected = %entry.resulting_state_hash, %actual, "log diverged");
            return Err(ReplayError::HashMismatch {
                step,
                expected: entry.resulting_state_hash,
                actual,
            });
        }
        state = transition.next_state;
    }

    Ok(state)
}

fn step_once(
    state: &GameState,
    step: usize,
    player: PlayerId,
    action: &Action,
) -> Result<rules::Transition, ReplayError> {
    match rules::apply(state, player, action)? {
        TransitionResult::Applied(transition) => Ok(transition),
        TransitionResult::Rejected(reason) => Err(ReplayError::Rejected {
            step,
            player,
            action: *action,
            reason,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GameSetup;

    fn play(initial: &GameState, moves: usize) -> GameState {
        let mut state = initial.clone();
        for _ in 0..moves {
            let player = state.current_player_id();
            let action = rules::legal_actions(&state, player)[0];
            state = rules::apply(&state, player, &action)
                .unwrap()
                .into_result()
                .unwrap()
                .next_state;
        }
        state
    }

    fn initial() -> GameState {
        GameSetup::new(99).players(["a", "b", "c"]).build().unwrap()
    }

    #[test]
    fn test_replay_reproduces_state() {
        let start = initial();
        let end = play(&start, 12);
        let recording = Recording::from_history(start, &end);

        assert_eq!(recording.actions.len(), 12);
        let replayed = recording.replay().unwrap();
        assert_eq!(replayed, end);
    }

    #[test]
    fn test_bytes_round_trip() {
        let start = initial();
        let end = play(&start, 6);
        let recording = Recording::from_history(start, &end);

        let bytes = recording.to_bytes().unwrap();
        let decoded = Recording::from_bytes(&bytes).unwrap();
        assert_eq!(decoded, recording);
    }

    #[test]
    fn test_garbage_bytes() {
        assert!(matches!(
            Recording::from_bytes(&[0xff, 0x01]),
            Err(ReplayError::Encoding(_))
        ));
    }

    #[test]
    fn test_verify_log_accepts_honest_log() {
        let start = initial();
        let end = play(&start, 9);
        let log: Vec<LogEntry> = end.history().iter().cloned().collect();

        let verified = verify_log(&start, &log).unwrap();
        assert_eq!(verified.state_hash().unwrap(), end.state_hash().unwrap());
    }

    #[test]
    fn test_verify_log_detects_tampering() {
        let start = initial();
        let end = play(&start, 5);
        let mut log: Vec<LogEntry> = end.history().iter().cloned().collect();
        log[3].resulting_state_hash = StateHash([7; 32]);

        let err = verify_log(&start, &log).unwrap_err();
        assert!(matches!(err, ReplayError::HashMismatch { step: 3, .. }));
    }

    #[test]
    fn test_verify_log_detects_reordering() {
        let start = initial();
        let end = play(&start, 4);
        let mut log: Vec<LogEntry> = end.history().iter().cloned().collect();
        log.swap(1, 2);

        let err = verify_log(&start, &log).unwrap_err();
        assert!(matches!(err, ReplayError::Sequence { step: 1, found: 2 }));
    }

    #[test]
    fn test_replay_rejects_illegal_step() {
        let mut recording = Recording::new(initial());
        recording.push(PlayerId::new(1), Action::RollAndMove);

        let err = recording.replay().unwrap_err();
        assert!(matches!(
            err,
            ReplayError::Rejected {
                step: 0,
                reason: Rejection::NotYourTurn,
                ..
            }
        ));
    }
}
