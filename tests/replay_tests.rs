//! Replay and audit of complete simulated matches.

use bubble_engine::core::{Action, GameSetup, GameState, PlayerId, StateHash};
use bubble_engine::replay::{replay, verify_log, Recording, ReplayError};
use bubble_engine::sim::{GreedyFounder, RandomPolicy, SimConfig, Simulator};

fn initial(seed: u64) -> GameState {
    GameSetup::new(seed)
        .players(["ada", "bea", "cyd", "dot"])
        .build()
        .unwrap()
}

#[test]
fn test_replay_reproduces_final_hash() {
    let outcome = Simulator::new(SimConfig::default())
        .run(initial(31), &mut GreedyFounder)
        .unwrap();

    let recording = outcome.recording();
    assert_eq!(recording.actions.len(), outcome.actions);

    let replayed = replay(&recording.initial, &recording.actions).unwrap();
    assert_eq!(
        replayed.state_hash().unwrap(),
        outcome.final_state.state_hash().unwrap()
    );
    assert_eq!(replayed.status(), outcome.status());
}

#[test]
fn test_recording_survives_bincode() {
    let outcome = Simulator::new(SimConfig::new().with_max_actions(500))
        .run(initial(32), &mut RandomPolicy::new(5))
        .unwrap();

    let bytes = outcome.recording().to_bytes().unwrap();
    let restored = Recording::from_bytes(&bytes).unwrap();

    assert_eq!(restored.replay().unwrap(), outcome.final_state);
}

#[test]
fn test_full_log_verifies() {
    let outcome = Simulator::new(SimConfig::new().with_max_actions(400))
        .run(initial(33), &mut GreedyFounder)
        .unwrap();
    let log: Vec<_> = outcome.final_state.history().iter().cloned().collect();

    let verified = verify_log(&outcome.initial, &log).unwrap();
    assert_eq!(verified, outcome.final_state);
}

#[test]
fn test_tampered_action_detected() {
    let outcome = Simulator::new(SimConfig::new().with_max_actions(100))
        .run(initial(34), &mut GreedyFounder)
        .unwrap();
    let mut log: Vec<_> = outcome.final_state.history().iter().cloned().collect();

    // Ending a turn before rolling is illegal.
    let index = log
        .iter()
        .position(|e| e.action == Action::RollAndMove && e.sequence > 0)
        .unwrap();
    log[index].action = Action::EndTurn;

    let err = verify_log(&outcome.initial, &log).unwrap_err();
    assert!(matches!(err, ReplayError::Rejected { step, .. } if step == index));
}

#[test]
fn test_tampered_hash_detected() {
    let outcome = Simulator::new(SimConfig::new().with_max_actions(60))
        .run(initial(35), &mut GreedyFounder)
        .unwrap();
    let mut log: Vec<_> = outcome.final_state.history().iter().cloned().collect();
    let last = log.len() - 1;
    log[last].resulting_state_hash = StateHash([0; 32]);

    let err = verify_log(&outcome.initial, &log).unwrap_err();
    assert!(matches!(err, ReplayError::HashMismatch { step, .. } if step == last));
}

#[test]
fn test_different_initial_state_diverges() {
    let outcome = Simulator::new(SimConfig::new().with_max_actions(30))
        .run(initial(36), &mut GreedyFounder)
        .unwrap();
    let log: Vec<_> = outcome.final_state.history().iter().cloned().collect();

    // Same seats, different seed: the first roll already differs.
    let err = verify_log(&initial(37), &log).unwrap_err();
    assert!(matches!(err, ReplayError::HashMismatch { step: 0, .. }));
}

#[test]
fn test_empty_recording_is_identity() {
    let start = initial(38);
    let recording = Recording::new(start.clone());
    assert_eq!(recording.replay().unwrap(), start);

    let mut out_of_turn = Recording::new(start);
    out_of_turn.push(PlayerId::new(3), Action::RollAndMove);
    assert!(out_of_turn.replay().is_err());
}
