//! # bubble-engine
//!
//! Rules engine for Bubble, a turn-based board game about startup founders
//! racing to a unicorn valuation before the bubble bursts.
//!
//! ## Design Principles
//!
//! 1. **Pure Transitions**: `apply(state, player, action)` never mutates its
//!    input. Accepted actions return a new state and a log entry; illegal
//!    ones return a reason code.
//!
//! 2. **Deterministic**: All randomness comes from a seeded ChaCha8 stream
//!    whose cursor lives in the state, so identical inputs give bit-identical
//!    outputs and matches can be replayed from their logs.
//!
//! 3. **Integer Money**: Cash and valuations are whole dollars in `i64`,
//!    scaled through `i128` intermediates.
//!
//! ## Architecture
//!
//! - **Persistent Data Structures**: O(1) cloning via `im-rs`, so every
//!   transition can hand back a fresh snapshot cheaply.
//!
//! - **Hash-Chained Log**: Each log entry records the hash of the state it
//!   produced; `replay::verify_log` checks a log against a re-run.
//!
//! ## Modules
//!
//! - `core`: Players, money, board, market, actions, state, RNG, configuration
//! - `rules`: Validator, transition engine, turn controller, valuation
//! - `replay`: Recordings, replay and log verification
//! - `sim`: Local simulator with pluggable policies
//! - `error`: Rejection codes and engine errors

pub mod core;
pub mod error;
pub mod replay;
pub mod rules;
pub mod sim;

// Re-export commonly used types
pub use crate::core::{
    Action, ActionKind, Board, Cash, Company, Event, GameSetup, GameState, GameStatus, LogEntry,
    Phase, Player, PlayerId, RulesConfig, StateHash, Tile,
};

pub use crate::error::{EngineError, InvariantViolation, Rejection, SetupError};

pub use crate::rules::{
    apply, legal_actions, validate, BubbleRules, RulesEngine, Transition, TransitionResult,
};

pub use crate::replay::{replay, verify_log, Recording, ReplayError};

pub use crate::sim::{GreedyFounder, Policy, RandomPolicy, SimConfig, Simulator};
