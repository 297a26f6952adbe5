//! Turn and phase controller.
//!
//! Owns the phase table and every phase change. A turn runs
//! `Start -> Roll -> Resolve -> Act -> End`; only `Roll` and `Act` wait for
//! the player, the others run to completion inside one transition.
//!
//! Terminal statuses are absorbing: nothing here ever moves a finished game.

use smallvec::SmallVec;

use crate::core::{ActionKind, Event, GameState, GameStatus, Phase, PlayerId, TurnState};

/// Events collected while applying one action.
pub type Events = SmallVec<[Event; 4]>;

const ROLL_ACTIONS: &[ActionKind] = &[ActionKind::RollAndMove, ActionKind::PayDebt];

const ACT_ACTIONS: &[ActionKind] = &[
    ActionKind::AcceptFunding,
    ActionKind::DeclineFunding,
    ActionKind::BuildProduct,
    ActionKind::PayDebt,
    ActionKind::DeclareIpo,
    ActionKind::EndTurn,
];

/// Action kinds allowed in a phase.
#[must_use]
pub fn allowed_actions(phase: Phase) -> &'static [ActionKind] {
    match phase {
        Phase::Roll => ROLL_ACTIONS,
        Phase::Act => ACT_ACTIONS,
        Phase::Start | Phase::Resolve | Phase::End => &[],
    }
}

/// Is `kind` allowed in `phase`?
#[must_use]
pub fn is_allowed(phase: Phase, kind: ActionKind) -> bool {
    allowed_actions(phase).contains(&kind)
}

/// Next active player after `from` in seat order, wrapping around.
///
/// Returns `from` itself if it is the only active player, and `None` if
/// nobody is active.
#[must_use]
pub fn next_active_after(state: &GameState, from: PlayerId) -> Option<PlayerId> {
    let count = state.player_count();
    (1..=count)
        .map(|offset| (from.index() + offset) % count)
        .filter_map(|seat| state.players.get(seat))
        .find(|p| p.active)
        .map(|p| p.id)
}

/// Run the `Start` phase for the current player and move to `Roll`.
pub(crate) fn begin_turn(state: &mut GameState, events: &mut Events) {
    state.phase = Phase::Start;
    state.turn = TurnState::default();

    let rate = u32::from(state.rules.debt_interest_pct);
    let current = state.current;
    if let Some(player) = state.player_mut(current) {
        let interest = player.debt.percent(rate);
        if !interest.is_zero() {
            player.debt = player.debt.saturating_add(interest);
            events.push(Event::InterestAccrued {
                player: current,
                amount: interest,
            });
        }
    }

    state.phase = Phase::Roll;
}

/// Run the `End` phase: bankruptcy, game-end checks, then pass the turn.
pub(crate) fn end_turn(state: &mut GameState, events: &mut Events) {
    state.phase = Phase::End;

    let current = state.current;
    let ceiling = state.rules.debt_ceiling;
    if let Some(player) = state.player_mut(current) {
        if player.active && player.debt > ceiling {
            player.active = false;
            tracing::info!(player = %current, debt = %player.debt, "founder bankrupt");
            events.push(Event::Bankrupt { player: current });
        }
    }

    if settle_status(state, current, events) {
        return;
    }

    if let Some(limit) = state.rules.max_turns {
        if state.turn_number >= limit {
            tracing::info!(turn = state.turn_number, "turn limit reached, bubble burst");
            finish(state, GameStatus::Lost, events);
            return;
        }
    }

    match next_active_after(state, current) {
        Some(next) => {
            state.current = next;
            state.turn_number += 1;
            events.push(Event::TurnPassed { to: next });
            begin_turn(state, events);
        }
        None => finish(state, GameStatus::Lost, events),
    }
}

/// Decide whether the game has ended and record it.
///
/// Order: a unicorn wins (the acting player first, then lowest seat); then a
/// lone survivor wins; then an empty table loses. Returns true if the game
/// is (now) over.
pub(crate) fn settle_status(state: &mut GameState, actor: PlayerId, events: &mut Events) -> bool {
    if state.status.is_terminal() {
        return true;
    }

    let unicorn = state.rules.unicorn_valuation;
    let is_unicorn = |id: PlayerId| {
        state
            .player(id)
            .is_some_and(|p| p.active && p.company.valuation >= unicorn)
    };
    let winner = if is_unicorn(actor) {
        Some(actor)
    } else {
        state
            .active_players()
            .find(|p| p.company.valuation >= unicorn)
            .map(|p| p.id)
    };
    if let Some(winner) = winner {
        tracing::info!(player = %winner, "unicorn reached");
        finish(state, GameStatus::Won(winner), events);
        return true;
    }

    let active: SmallVec<[PlayerId; 2]> = state.active_players().map(|p| p.id).take(2).collect();
    match active.as_slice() {
        [] => {
            finish(state, GameStatus::Lost, events);
            true
        }
        [survivor] => {
            let survivor = *survivor;
            tracing::info!(player = %survivor, "last founder standing");
            finish(state, GameStatus::Won(survivor), events);
            true
        }
        _ => false,
    }
}

fn finish(state: &mut GameState, status: GameStatus, events: &mut Events) {
    state.status = status;
    match status {
        GameStatus::Won(player) => events.push(Event::GameWon { player }),
        GameStatus::Lost => events.push(Event::GameLost),
        GameStatus::InProgress => {}
    }
}
