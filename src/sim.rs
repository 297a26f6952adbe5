//! Local simulator.
//!
//! Plays complete matches in-process with pluggable policies. The simulator
//! is a host like any other: it only sees legal actions, calls `apply`, and
//! keeps the returned state.

use thiserror::Error;

use crate::core::{Action, GameRng, GameState, GameStatus, PlayerId};
use crate::error::{EngineError, Rejection};
use crate::replay::Recording;
use crate::rules::{BubbleRules, RulesEngine, TransitionResult};

/// Chooses an action for the current player.
pub trait Policy {
    /// Pick one of `legal`, which is never empty.
    fn choose(&mut self, state: &GameState, player: PlayerId, legal: &[Action]) -> Action;

    /// Short name for logs.
    fn name(&self) -> &'static str;
}

/// A founder who chases valuation.
///
/// Pays down debt before rolling, goes public when allowed, builds every
/// product it can afford, and sells equity while keeping enough back to
/// float an IPO later.
#[derive(Clone, Copy, Debug, Default)]
pub struct GreedyFounder;

impl Policy for GreedyFounder {
    fn choose(&mut self, state: &GameState, player: PlayerId, legal: &[Action]) -> Action {
        let has = |wanted: Action| legal.contains(&wanted);
        let repay = legal
            .iter()
            .copied()
            .find(|a| matches!(a, Action::PayDebt { .. }));

        if has(Action::RollAndMove) {
            return repay.unwrap_or(Action::RollAndMove);
        }
        if has(Action::DeclareIpo) {
            return Action::DeclareIpo;
        }
        if has(Action::BuildProduct) {
            return Action::BuildProduct;
        }

        let rules = state.rules();
        let reserve = rules.min_equity.saturating_add(rules.ipo_float_pct);
        let equity = state.player(player).map_or(0, |p| p.equity);
        let best_stake = legal
            .iter()
            .filter_map(|a| match a {
                Action::AcceptFunding { stake } if equity.saturating_sub(*stake) >= reserve => {
                    Some(*stake)
                }
                _ => None,
            })
            .max();
        if let Some(stake) = best_stake {
            return Action::AcceptFunding { stake };
        }
        if let Some(repay) = repay {
            return repay;
        }
        if has(Action::EndTurn) {
            return Action::EndTurn;
        }
        legal.first().copied().unwrap_or(Action::EndTurn)
    }

    fn name(&self) -> &'static str {
        "greedy"
    }
}

/// Picks uniformly among legal actions, from its own seeded stream.
#[derive(Clone, Debug)]
pub struct RandomPolicy {
    rng: GameRng,
}

impl RandomPolicy {
    /// Create a policy with its own seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: GameRng::new(seed),
        }
    }
}

impl Policy for RandomPolicy {
    fn choose(&mut self, _state: &GameState, _player: PlayerId, legal: &[Action]) -> Action {
        self.rng.choose(legal).copied().unwrap_or(Action::EndTurn)
    }

    fn name(&self) -> &'static str {
        "random"
    }
}

/// Simulation failure.
#[derive(Debug, Error)]
pub enum SimError {
    /// The engine refused to continue.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// A policy picked an illegal action.
    #[error("{policy} policy chose {action} for {player}: {reason}")]
    IllegalChoice {
        /// Policy name.
        policy: &'static str,
        /// Acting player.
        player: PlayerId,
        /// The action.
        action: Action,
        /// Why it was refused.
        reason: Rejection,
    },

    /// The current player had nothing legal to do.
    #[error("no legal action for {0}")]
    Stuck(PlayerId),
}

/// Simulator settings.
#[derive(Clone, Copy, Debug)]
pub struct SimConfig {
    /// Stop after this many accepted actions even if the game is not over.
    pub max_actions: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            max_actions: 20_000,
        }
    }
}

impl SimConfig {
    /// Create the default config.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the action cap.
    #[must_use]
    pub fn with_max_actions(mut self, max: usize) -> Self {
        self.max_actions = max;
        self
    }
}

/// Result of a simulated match.
#[derive(Clone, Debug)]
pub struct SimOutcome {
    /// State the match started from.
    pub initial: GameState,
    /// State the match ended in.
    pub final_state: GameState,
    /// Accepted actions.
    pub actions: usize,
}

impl SimOutcome {
    /// Final status.
    #[must_use]
    pub fn status(&self) -> GameStatus {
        self.final_state.status()
    }

    /// Did the action cap stop the match before it ended?
    #[must_use]
    pub fn truncated(&self) -> bool {
        !self.final_state.is_terminal()
    }

    /// The match as a replayable recording.
    #[must_use]
    pub fn recording(&self) -> Recording {
        Recording::from_history(self.initial.clone(), &self.final_state)
    }
}

/// Runs matches to completion.
pub struct Simulator<E: RulesEngine = BubbleRules> {
    engine: E,
    config: SimConfig,
}

impl Simulator<BubbleRules> {
    /// Simulator for the standard rules.
    #[must_use]
    pub fn new(config: SimConfig) -> Self {
        Self::with_engine(BubbleRules, config)
    }
}

impl<E: RulesEngine> Simulator<E> {
    /// Simulator for a custom rule set.
    pub fn with_engine(engine: E, config: SimConfig) -> Self {
        Self { engine, config }
    }

    /// Settings in use.
    #[must_use]
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Play `initial` with one policy for every seat.
    ///
    /// # Errors
    ///
    /// Fails if the engine errors, the policy picks an illegal action, or
    /// the current player has no legal action.
    pub fn run<P: Policy>(
        &self,
        initial: GameState,
        policy: &mut P,
    ) -> Result<SimOutcome, SimError> {
        let name = policy.name();
        self.drive(
            initial,
            |_, state, player, legal| policy.choose(state, player, legal),
            move |_| name,
        )
    }

    /// Play `initial` with a policy per seat. Seats beyond `policies` reuse
    /// the last one.
    ///
    /// # Errors
    ///
    /// Fails if the engine errors, a policy picks an illegal action, or the
    /// current player has no legal action.
    pub fn run_seats(
        &self,
        initial: GameState,
        policies: &mut [Box<dyn Policy>],
    ) -> Result<SimOutcome, SimError> {
        if policies.is_empty() {
            return Err(SimError::Stuck(initial.current_player_id()));
        }
        let last = policies.len() - 1;
        let names: Vec<&'static str> = policies.iter().map(|p| p.name()).collect();
        self.drive(
            initial,
            |seat, state, player, legal| policies[seat.min(last)].choose(state, player, legal),
            |seat| names[seat.min(last)],
        )
    }

    fn drive(
        &self,
        initial: GameState,
        mut choose: impl FnMut(usize, &GameState, PlayerId, &[Action]) -> Action,
        name: impl Fn(usize) -> &'static str,
    ) -> Result<SimOutcome, SimError> {
        let mut state = initial.clone();
        let mut actions = 0;

        while !state.is_terminal() && actions < self.config.max_actions {
            let player = state.current_player_id();
            let legal = self.engine.legal_actions(&state, player);
            if legal.is_empty() {
                return Err(SimError::Stuck(player));
            }

            let action = choose(player.index(), &state, player, &legal);
            match self.engine.apply(&state, player, &action)? {
                TransitionResult::Applied(transition) => state = transition.next_state,
                TransitionResult::Rejected(reason) => {
                    return Err(SimError::IllegalChoice {
                        policy: name(player.index()),
                        player,
                        action,
                        reason,
                    })
                }
            }
            actions += 1;
        }

        tracing::info!(
            status = ?state.status(),
            actions,
            turns = state.turn_number(),
            "simulation finished"
        );
        Ok(SimOutcome {
            initial,
            final_state: state,
            actions,
        })
    }
}
