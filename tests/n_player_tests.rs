//! N-player capability tests.
//!
//! The engine has no hidden 2-player assumptions: every table size from the
//! configured minimum to maximum sets up, rotates turns and finishes.

use bubble_engine::core::{
    Action, Board, Cash, GameSetup, GameState, GameStatus, PlayerId, RulesConfig, Tile,
};
use bubble_engine::error::SetupError;
use bubble_engine::rules::{apply, TransitionResult};
use bubble_engine::sim::{GreedyFounder, RandomPolicy, SimConfig, Simulator};

const NAMES: [&str; 8] = ["ada", "bea", "cyd", "dot", "eve", "fay", "gus", "hal"];

fn table(players: usize, seed: u64) -> Result<GameState, SetupError> {
    GameSetup::new(seed).players(NAMES.into_iter().take(players)).build()
}

fn roll_and_pass(state: &GameState) -> GameState {
    let player = state.current_player_id();
    let mut s = state.clone();
    for action in [Action::RollAndMove, Action::EndTurn] {
        match apply(&s, player, &action).unwrap() {
            TransitionResult::Applied(t) => s = t.next_state,
            TransitionResult::Rejected(r) => panic!("{action} rejected: {r}"),
        }
    }
    s
}

/// Every supported table size sets up with identical starting positions.
#[test]
fn test_setup_all_table_sizes() {
    for players in 2..=6 {
        let state = table(players, 42).unwrap();
        assert_eq!(state.player_count(), players);

        for (seat, player) in state.players().iter().enumerate() {
            assert_eq!(player.id, PlayerId::new(seat as u8));
            assert_eq!(player.cash, Cash::new(500_000));
            assert_eq!(player.equity, 100);
        }
    }
}

#[test]
fn test_table_size_limits() {
    assert!(matches!(table(1, 0), Err(SetupError::PlayerCount { count: 1, .. })));
    assert!(matches!(table(7, 0), Err(SetupError::PlayerCount { count: 7, .. })));
}

#[test]
fn test_duplicate_names_rejected() {
    let result = GameSetup::new(0).players(["ada", "bea", "ada"]).build();
    assert!(matches!(result, Err(SetupError::DuplicatePlayer(name)) if name == "ada"));
}

/// Turns rotate through every seat in order and wrap around.
#[test]
fn test_turn_rotation_6_players() {
    let mut state = table(6, 9).unwrap();
    let mut order = Vec::new();

    for _ in 0..12 {
        order.push(state.current_player_id().index());
        state = roll_and_pass(&state);
    }

    let expected: Vec<usize> = (0..12).map(|i| i % 6).collect();
    assert_eq!(order, expected);
    assert_eq!(state.turn_number(), 13);
}

/// Bankrupt founders drop out one by one; the last one standing wins.
#[test]
fn test_bankruptcies_leave_last_founder() {
    let burns = std::iter::repeat(Tile::Burn {
        amount: Cash::new(600_000),
    })
    .take(39);
    let state = GameSetup::new(17)
        .players(NAMES.into_iter().take(4))
        .rules(RulesConfig::new().with_debt_ceiling(Cash::new(50_000)))
        .board(Board::from_tiles(std::iter::once(Tile::Launchpad).chain(burns)))
        .build()
        .unwrap();

    let s = roll_and_pass(&state);
    assert!(!s.players()[0].active);
    assert_eq!(s.players()[0].cash, Cash::ZERO);
    assert_eq!(s.players()[0].debt, Cash::new(100_000));
    assert_eq!(s.current_player_id(), PlayerId::new(1));

    let s = roll_and_pass(&s);
    assert_eq!(s.current_player_id(), PlayerId::new(2));
    assert_eq!(s.active_players().count(), 2);

    let s = roll_and_pass(&s);
    assert_eq!(s.status(), GameStatus::Won(PlayerId::new(3)));
    assert!(s.history().last().unwrap().ended_game());
}

/// Simulated games finish at every table size.
#[test]
fn test_simulated_games_finish() {
    let simulator = Simulator::new(SimConfig::default());
    for players in 2..=6 {
        let outcome = simulator
            .run(table(players, players as u64).unwrap(), &mut GreedyFounder)
            .unwrap();
        assert!(outcome.status().is_terminal(), "{players} players did not finish");

        if let GameStatus::Won(winner) = outcome.status() {
            assert!(winner.index() < players);
            assert!(outcome.final_state.player(winner).unwrap().active);
        }
    }
}

#[test]
fn test_random_policies_6_players() {
    let simulator = Simulator::new(SimConfig::new().with_max_actions(2_000));
    let outcome = simulator
        .run(table(6, 1234).unwrap(), &mut RandomPolicy::new(99))
        .unwrap();

    assert_eq!(outcome.final_state.player_count(), 6);
    assert!(outcome.actions > 0);
    assert_eq!(outcome.final_state.history().len(), outcome.actions);
}
