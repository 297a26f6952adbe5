//! Structural invariants of a snapshot.
//!
//! These never fail on a state produced by `GameSetup` and the transition
//! engine. A violation means the snapshot was corrupted in storage or
//! transit, and the engine refuses to continue from it.

use rustc_hash::FxHashSet;

use super::valuation::company_valuation;
use crate::core::{GameState, GameStatus, Phase};
use crate::error::InvariantViolation;

/// Check all structural invariants.
///
/// Returns every violation found, or an empty list if the state is sound.
#[must_use]
pub fn check_invariants(state: &GameState) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    let rules = &state.rules;

    if let Err(err) = rules.validate() {
        violations.push(InvariantViolation::new(err.to_string()));
    }

    if state.board.len() != usize::from(rules.board_size) {
        violations.push(InvariantViolation::new(format!(
            "board has {} tiles, rules require {}",
            state.board.len(),
            rules.board_size
        )));
    }
    for (position, tile) in state.board.malformed_tiles() {
        violations.push(InvariantViolation::new(format!(
            "tile {position} ({tile}) has invalid parameters"
        )));
    }

    let count = state.players.len();
    if count < usize::from(rules.min_players) || count > usize::from(rules.max_players) {
        violations.push(InvariantViolation::new(format!(
            "{count} players outside {}..={}",
            rules.min_players, rules.max_players
        )));
    }

    let mut names = FxHashSet::default();
    for (seat, player) in state.players.iter().enumerate() {
        if player.id.index() != seat {
            violations.push(InvariantViolation::new(format!(
                "seat {seat} holds {}",
                player.id
            )));
        }
        if !names.insert(player.name.as_str()) {
            violations.push(InvariantViolation::new(format!(
                "duplicate player name {:?}",
                player.name
            )));
        }
        if player.cash.is_negative() {
            violations.push(InvariantViolation::new(format!(
                "{} has negative cash {}",
                player.id, player.cash
            )));
        }
        if player.debt.is_negative() {
            violations.push(InvariantViolation::new(format!(
                "{} has negative debt {}",
                player.id, player.debt
            )));
        }
        if player.equity > 100 || player.equity < rules.min_equity {
            violations.push(InvariantViolation::new(format!(
                "{} equity {} outside {}..=100",
                player.id, player.equity, rules.min_equity
            )));
        }
        if player.position >= rules.board_size {
            violations.push(InvariantViolation::new(format!(
                "{} at position {} beyond board",
                player.id, player.position
            )));
        }
        let expected = company_valuation(&player.company, &state.market, rules);
        if player.company.valuation != expected {
            violations.push(InvariantViolation::new(format!(
                "{} valuation {} does not match {}",
                player.id, player.company.valuation, expected
            )));
        }
    }

    match state.status {
        GameStatus::InProgress => {
            match state.player(state.current) {
                Some(p) if p.active => {}
                Some(_) => violations.push(InvariantViolation::new(format!(
                    "current player {} is bankrupt",
                    state.current
                ))),
                None => violations.push(InvariantViolation::new(format!(
                    "current player {} does not exist",
                    state.current
                ))),
            }
            if !state.phase.awaits_player() {
                violations.push(InvariantViolation::new(format!(
                    "game at rest in transient phase {}",
                    state.phase
                )));
            }
            if state.phase == Phase::Roll && state.turn.roll.is_some() {
                violations.push(InvariantViolation::new("roll recorded before rolling"));
            }
        }
        GameStatus::Won(winner) => {
            if state.player(winner).is_none() {
                violations.push(InvariantViolation::new(format!(
                    "winner {winner} does not exist"
                )));
            }
        }
        GameStatus::Lost => {}
    }

    let market = &state.market;
    if !(rules.sentiment_floor..=rules.sentiment_ceiling).contains(&market.sentiment_pct) {
        violations.push(InvariantViolation::new(format!(
            "sentiment {} outside {}..={}",
            market.sentiment_pct, rules.sentiment_floor, rules.sentiment_ceiling
        )));
    }
    if market.next_card > market.deck.len() {
        violations.push(InvariantViolation::new(format!(
            "market cursor {} past deck of {}",
            market.next_card,
            market.deck.len()
        )));
    }

    if let Some(offer) = state.turn.funding {
        if offer.remaining_stake == 0 {
            violations.push(InvariantViolation::new("funding offer with no stake left"));
        }
    }

    violations
}
