//! The Bubble rules.
//!
//! - `validator`: legality of an action, without side effects
//! - `engine`: the transition function and the `RulesEngine` seam
//! - `turn`: phase table, turn passing, game-end detection
//! - `tiles`: tile and market-card effects
//! - `valuation`: company valuation
//! - `invariants`: structural checks on incoming snapshots

pub mod engine;
pub mod invariants;
pub mod tiles;
pub mod turn;
pub mod validator;
pub mod valuation;

pub use engine::{apply, BubbleRules, RulesEngine, Transition, TransitionResult};
pub use invariants::check_invariants;
pub use validator::{candidate_actions, legal_actions, validate};
pub use valuation::company_valuation;
