//! The transition engine.
//!
//! `apply` is pure: it never touches its input. The state is cloned (O(1)
//! thanks to `im` sharing), the clone is mutated and returned. A rejected
//! action returns no new state at all.
//!
//! Hosts that want to swap rule sets program against [`RulesEngine`]; the
//! free functions [`apply`], [`validate`] and [`legal_actions`] are the
//! Bubble rules themselves.

use super::turn::{self, Events};
use super::{invariants, tiles, validator, valuation};
use crate::core::{
    Action, Cash, Event, GameRng, GameState, GameStatus, LogEntry, Phase, PlayerId,
};
use crate::error::{EngineError, Rejection};

pub use super::validator::{legal_actions, validate};

/// An accepted action: the new state and its log entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transition {
    /// State after the action.
    pub next_state: GameState,
    /// What happened.
    pub log_entry: LogEntry,
}

/// Outcome of [`apply`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransitionResult {
    /// The action was legal and applied.
    Applied(Transition),
    /// The action was illegal; the input state is unchanged.
    Rejected(Rejection),
}

impl TransitionResult {
    /// Was the action applied?
    #[must_use]
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }

    /// The rejection reason, if any.
    #[must_use]
    pub fn rejection(&self) -> Option<Rejection> {
        match self {
            Self::Applied(_) => None,
            Self::Rejected(reason) => Some(*reason),
        }
    }

    /// Convert into a `Result`.
    ///
    /// # Errors
    ///
    /// Returns the rejection reason if the action was refused.
    pub fn into_result(self) -> Result<Transition, Rejection> {
        match self {
            Self::Applied(transition) => Ok(transition),
            Self::Rejected(reason) => Err(reason),
        }
    }
}

/// Apply `action` by `player` to `state`.
///
/// # Errors
///
/// Returns [`EngineError::CorruptState`] if `state` breaks a structural
/// invariant, and [`EngineError::Encoding`] if the resulting state cannot
/// be hashed. An illegal action is not an error: it comes back as
/// [`TransitionResult::Rejected`].
pub fn apply(
    state: &GameState,
    player: PlayerId,
    action: &Action,
) -> Result<TransitionResult, EngineError> {
    let span = tracing::debug_span!("apply", turn = state.turn_number, %player, %action);
    let _guard = span.enter();

    let violations = invariants::check_invariants(state);
    if !violations.is_empty() {
        tracing::error!(count = violations.len(), "refusing corrupt state");
        return Err(EngineError::CorruptState { violations });
    }

    if let Err(reason) = validator::validate(state, player, action) {
        tracing::debug!(%reason, "action rejected");
        return Ok(TransitionResult::Rejected(reason));
    }

    let mut next = state.clone();
    let mut events = Events::new();
    let mut rng = GameRng::from_cursor(&next.rng);

    execute(&mut next, player, *action, &mut rng, &mut events);
    next.rng = rng.cursor();
    valuation::revalue_all(&mut next);

    if *action == Action::EndTurn {
        turn::end_turn(&mut next, &mut events);
    } else {
        turn::settle_status(&mut next, player, &mut events);
    }

    let resulting_state_hash = next.state_hash()?;
    let log_entry = LogEntry {
        sequence: u32::try_from(next.history.len()).unwrap_or(u32::MAX),
        turn_number: state.turn_number,
        player,
        action: *action,
        events,
        resulting_state_hash,
    };
    next.history.push_back(log_entry.clone());

    if let GameStatus::Won(winner) = next.status {
        tracing::info!(%winner, turn = next.turn_number, "game won");
    }
    tracing::debug!(hash = %resulting_state_hash, phase = %next.phase, "action applied");

    Ok(TransitionResult::Applied(Transition {
        next_state: next,
        log_entry,
    }))
}

/// Carry out a validated action. `EndTurn` is handled by the turn
/// controller after revaluation.
fn execute(
    state: &mut GameState,
    player: PlayerId,
    action: Action,
    rng: &mut GameRng,
    events: &mut Events,
) {
    match action {
        Action::RollAndMove => roll_and_move(state, player, rng, events),
        Action::AcceptFunding { stake } => accept_funding(state, player, stake, events),
        Action::DeclineFunding => {
            state.turn.funding = None;
            events.push(Event::FundingDeclined);
        }
        Action::BuildProduct => build_product(state, player, events),
        Action::PayDebt { amount } => {
            if let Some(p) = state.player_mut(player) {
                p.cash = Cash::new(p.cash.dollars() - amount.dollars());
                p.debt = Cash::new(p.debt.dollars() - amount.dollars());
                events.push(Event::DebtRepaid { player, amount });
            }
        }
        Action::DeclareIpo => declare_ipo(state, player, events),
        Action::EndTurn => {}
    }
}

fn roll_and_move(state: &mut GameState, player: PlayerId, rng: &mut GameRng, events: &mut Events) {
    let roll = rng.roll(state.rules.dice_count, state.rules.dice_sides);
    events.push(Event::Rolled(roll.clone()));

    let Some(from) = state.player(player).map(|p| p.position) else {
        return;
    };
    let (to, laps) = state.board.advance(from, roll.total());
    if let Some(p) = state.player_mut(player) {
        p.position = to;
        p.laps = p.laps.saturating_add(laps);
    }
    events.push(Event::Moved { from, to, laps });
    state.turn.roll = Some(roll);

    state.phase = Phase::Resolve;
    if let Some(tile) = state.board.get(to).copied() {
        events.push(Event::Landed { position: to, tile });
        tiles::resolve_landing(state, player, tile, rng, events);
    }
    state.phase = Phase::Act;
}

fn accept_funding(state: &mut GameState, player: PlayerId, stake: u8, events: &mut Events) {
    let Some(mut offer) = state.turn.funding else {
        return;
    };
    let Some(p) = state.player_mut(player) else {
        return;
    };

    let raised = p
        .company
        .valuation
        .ratio(i128::from(stake) * i128::from(offer.terms_pct), 10_000);
    p.cash = p.cash.saturating_add(raised);
    p.company.funding_raised = p.company.funding_raised.saturating_add(raised);
    p.equity -= stake;

    offer.remaining_stake -= stake;
    state.turn.funding = (offer.remaining_stake > 0).then_some(offer);
    events.push(Event::FundingAccepted { stake, raised });
}

fn build_product(state: &mut GameState, player: PlayerId, events: &mut Events) {
    let Some(build) = state.turn.build.take() else {
        return;
    };
    if let Some(p) = state.player_mut(player) {
        p.cash = p.cash.checked_sub(build.cost).unwrap_or(Cash::ZERO);
        p.company.products += 1;
        p.company.product_value = p.company.product_value.saturating_add(build.value);
        events.push(Event::ProductBuilt {
            cost: build.cost,
            value: build.value,
        });
    }
}

fn declare_ipo(state: &mut GameState, player: PlayerId, events: &mut Events) {
    let float = state.rules.ipo_float_pct;
    let Some(p) = state.player_mut(player) else {
        return;
    };

    let raised = p.company.valuation.percent(u32::from(float));
    p.cash = p.cash.saturating_add(raised);
    p.company.funding_raised = p.company.funding_raised.saturating_add(raised);
    p.company.public = true;
    p.equity -= float;
    tracing::info!(%player, %raised, "company went public");
    events.push(Event::WentPublic { float, raised });
}

/// Rule set seam for hosts and simulators.
///
/// Implementations must be deterministic: the same state and action always
/// produce the same result.
pub trait RulesEngine {
    /// See [`validate`].
    ///
    /// # Errors
    ///
    /// Returns the reason the action is illegal.
    fn validate(&self, state: &GameState, player: PlayerId, action: &Action)
        -> Result<(), Rejection>;

    /// See [`apply`].
    ///
    /// # Errors
    ///
    /// Returns an [`EngineError`] if the state is corrupt.
    fn apply(
        &self,
        state: &GameState,
        player: PlayerId,
        action: &Action,
    ) -> Result<TransitionResult, EngineError>;

    /// Every action worth considering, legal or not.
    fn candidate_actions(&self, state: &GameState, player: PlayerId) -> Vec<Action>;

    // === Convenience Methods ===

    /// Enumerate all legal actions for a player.
    ///
    /// Default implementation filters candidates through `validate`.
    fn legal_actions(&self, state: &GameState, player: PlayerId) -> Vec<Action> {
        self.candidate_actions(state, player)
            .into_iter()
            .filter(|action| self.validate(state, player, action).is_ok())
            .collect()
    }

    /// Match status of a state.
    fn status(&self, state: &GameState) -> GameStatus {
        state.status()
    }
}

/// The standard Bubble rules.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BubbleRules;

impl RulesEngine for BubbleRules {
    fn validate(
        &self,
        state: &GameState,
        player: PlayerId,
        action: &Action,
    ) -> Result<(), Rejection> {
        validator::validate(state, player, action)
    }

    fn apply(
        &self,
        state: &GameState,
        player: PlayerId,
        action: &Action,
    ) -> Result<TransitionResult, EngineError> {
        apply(state, player, action)
    }

    fn candidate_actions(&self, state: &GameState, player: PlayerId) -> Vec<Action> {
        validator::candidate_actions(state, player)
    }
}
