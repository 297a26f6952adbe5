//! Property-based tests for the transition engine.
//!
//! Random tables play random (often illegal) action sequences. Whatever
//! happens, accepted transitions keep every structural invariant and
//! rejected ones change nothing.

#![allow(clippy::unwrap_used)]

use proptest::prelude::*;

use bubble_engine::core::{Action, Cash, GameSetup, GameState, PlayerId, RulesConfig};
use bubble_engine::error::Rejection;
use bubble_engine::rules::{apply, candidate_actions, check_invariants, validate, TransitionResult};

const NAMES: [&str; 6] = ["ada", "bea", "cyd", "dot", "eve", "fay"];

fn table(seed: u64, players: usize) -> GameState {
    GameSetup::new(seed)
        .players(NAMES.into_iter().take(players))
        .build()
        .unwrap()
}

/// Pick an action from a raw choice. Mostly candidates for the current
/// player, sometimes out-of-turn or out-of-range ones.
fn pick(state: &GameState, choice: u16) -> (PlayerId, Action) {
    let current = state.current_player_id();
    match choice % 10 {
        0 => {
            let other = (current.index() + 1 + usize::from(choice >> 4)) % state.player_count();
            (PlayerId::new(other as u8), Action::EndTurn)
        }
        1 => (current, Action::AcceptFunding { stake: (choice >> 4) as u8 }),
        2 => (
            current,
            Action::PayDebt {
                amount: Cash::new(i64::from(choice) * 1_000 - 10_000),
            },
        ),
        _ => {
            let candidates = candidate_actions(state, current);
            (current, candidates[usize::from(choice >> 4) % candidates.len()])
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// Accepted transitions preserve every invariant.
    #[test]
    fn prop_invariants_hold(
        seed in any::<u64>(),
        players in 2usize..=6,
        choices in prop::collection::vec(any::<u16>(), 1..300)
    ) {
        let mut state = table(seed, players);

        for choice in choices {
            let (player, action) = pick(&state, choice);
            match apply(&state, player, &action).unwrap() {
                TransitionResult::Applied(t) => {
                    let next = t.next_state;
                    let violations = check_invariants(&next);
                    prop_assert!(violations.is_empty(), "{:?} after {}", violations, action);

                    for p in next.players() {
                        prop_assert!(!p.cash.is_negative());
                        prop_assert!(p.equity >= next.rules().min_equity && p.equity <= 100);
                        prop_assert_eq!(u32::from(p.equity) + u32::from(p.investor_equity()), 100);
                    }
                    prop_assert_eq!(next.player_count(), players);
                    prop_assert_eq!(next.history().len(), state.history().len() + 1);
                    prop_assert_eq!(t.log_entry.resulting_state_hash, next.state_hash().unwrap());
                    state = next;
                }
                TransitionResult::Rejected(reason) => {
                    prop_assert_eq!(validate(&state, player, &action), Err(reason));
                }
            }
        }
    }

    /// Rejections never touch the input.
    #[test]
    fn prop_rejection_is_side_effect_free(
        seed in any::<u64>(),
        stake in any::<u8>(),
        amount in -1_000_000i64..2_000_000
    ) {
        let state = table(seed, 3);
        let before = state.clone();

        for (player, action) in [
            (PlayerId::new(1), Action::RollAndMove),
            (PlayerId::new(0), Action::AcceptFunding { stake }),
            (PlayerId::new(0), Action::PayDebt { amount: Cash::new(amount) }),
            (PlayerId::new(0), Action::DeclareIpo),
        ] {
            let result = apply(&state, player, &action).unwrap();
            prop_assert!(!result.is_applied());
        }
        prop_assert_eq!(state, before);
    }

    /// Same inputs, same outputs.
    #[test]
    fn prop_deterministic(
        seed in any::<u64>(),
        choices in prop::collection::vec(any::<u16>(), 1..60)
    ) {
        let run = || {
            let mut state = table(seed, 2);
            for &choice in &choices {
                let (player, action) = pick(&state, choice);
                if let TransitionResult::Applied(t) = apply(&state, player, &action).unwrap() {
                    state = t.next_state;
                }
            }
            state
        };
        let (a, b) = (run(), run());
        prop_assert_eq!(a.state_hash().unwrap(), b.state_hash().unwrap());
        prop_assert_eq!(a, b);
    }

    /// Once over, always over.
    #[test]
    fn prop_terminal_absorbing(
        seed in any::<u64>(),
        choices in prop::collection::vec(any::<u16>(), 1..40)
    ) {
        let rules = RulesConfig::new().with_max_turns(Some(2));
        let mut state = GameSetup::new(seed).players(["ada", "bea"]).rules(rules).build().unwrap();

        // Roll and pass until the turn limit ends the game.
        while !state.is_terminal() {
            let player = state.current_player_id();
            for action in [Action::RollAndMove, Action::EndTurn] {
                if let TransitionResult::Applied(t) = apply(&state, player, &action).unwrap() {
                    state = t.next_state;
                }
            }
        }

        for choice in choices {
            let (player, action) = pick(&state, choice);
            let result = apply(&state, player, &action).unwrap();
            prop_assert_eq!(result.rejection(), Some(Rejection::GameAlreadyOver));
        }
    }
}
