//! Action validation.
//!
//! `validate` is a pure function of `(state, player, action)`: no side
//! effects, no randomness, so a server and a predicting client always agree.
//!
//! Checks run in a fixed order, and the first failure is reported:
//! 1. game over
//! 2. turn ownership
//! 3. phase table
//! 4. payload constraints

use super::turn;
use crate::core::{Action, Cash, GameState, PlayerId, Tile};
use crate::error::Rejection;

/// Decide whether `player` may take `action` in `state`.
///
/// # Errors
///
/// Returns the [`Rejection`] reason for the first failed check.
pub fn validate(state: &GameState, player: PlayerId, action: &Action) -> Result<(), Rejection> {
    if state.status.is_terminal() {
        return Err(Rejection::GameAlreadyOver);
    }
    if player != state.current {
        return Err(Rejection::NotYourTurn);
    }
    let Some(founder) = state.player(player).filter(|p| p.active) else {
        return Err(Rejection::NotYourTurn);
    };
    if !turn::is_allowed(state.phase, action.kind()) {
        return Err(Rejection::WrongPhase);
    }

    let rules = &state.rules;
    match *action {
        Action::RollAndMove | Action::EndTurn => Ok(()),

        Action::AcceptFunding { stake } => {
            let offer = state.turn.funding.ok_or(Rejection::InvalidTarget)?;
            if stake == 0 {
                return Err(Rejection::InvalidTarget);
            }
            if founder.equity.checked_sub(stake).map_or(true, |left| left < rules.min_equity) {
                return Err(Rejection::EquityFloorViolation);
            }
            if stake > offer.remaining_stake {
                return Err(Rejection::InvalidTarget);
            }
            Ok(())
        }

        Action::DeclineFunding => state
            .turn
            .funding
            .map(|_| ())
            .ok_or(Rejection::InvalidTarget),

        Action::BuildProduct => {
            let build = state.turn.build.ok_or(Rejection::InvalidTarget)?;
            if founder.cash < build.cost {
                return Err(Rejection::InsufficientFunds);
            }
            Ok(())
        }

        Action::PayDebt { amount } => {
            if amount <= Cash::ZERO || amount > founder.debt {
                return Err(Rejection::InvalidTarget);
            }
            if founder.cash < amount {
                return Err(Rejection::InsufficientFunds);
            }
            Ok(())
        }

        Action::DeclareIpo => {
            if state.tile_at(founder.position) != Some(&Tile::IpoGate) || founder.company.public {
                return Err(Rejection::InvalidTarget);
            }
            if founder.company.valuation < rules.ipo_min_valuation {
                return Err(Rejection::BelowIpoThreshold);
            }
            let float = rules.ipo_float_pct;
            if founder.equity.checked_sub(float).map_or(true, |left| left < rules.min_equity) {
                return Err(Rejection::EquityFloorViolation);
            }
            Ok(())
        }
    }
}

/// Every action worth considering for `player`, legal or not.
///
/// Debt repayment is offered once, for as much as cash allows.
#[must_use]
pub fn candidate_actions(state: &GameState, player: PlayerId) -> Vec<Action> {
    let mut candidates = vec![
        Action::RollAndMove,
        Action::BuildProduct,
        Action::DeclareIpo,
        Action::DeclineFunding,
        Action::EndTurn,
    ];

    if let Some(founder) = state.player(player) {
        let repay = founder.cash.min(founder.debt);
        if repay > Cash::ZERO {
            candidates.push(Action::PayDebt { amount: repay });
        }
    }

    if let Some(offer) = state.turn.funding {
        candidates.extend((1..=offer.remaining_stake).map(|stake| Action::AcceptFunding { stake }));
    }

    candidates
}

/// All legal actions for `player`.
#[must_use]
pub fn legal_actions(state: &GameState, player: PlayerId) -> Vec<Action> {
    candidate_actions(state, player)
        .into_iter()
        .filter(|action| validate(state, player, action).is_ok())
        .collect()
}
