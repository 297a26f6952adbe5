//! Benchmarks for single transitions and complete simulated games.

#![allow(missing_docs)]

use std::hint::black_box;

use bubble_engine::core::{Action, GameSetup, GameState, PlayerId};
use bubble_engine::sim::{GreedyFounder, SimConfig, Simulator};
use bubble_engine::{apply, legal_actions, validate};
use criterion::{criterion_group, criterion_main, Criterion};

fn table(players: usize) -> GameState {
    let names = ["a", "b", "c", "d", "e", "f"];
    GameSetup::new(42)
        .players(names.into_iter().take(players))
        .build()
        .expect("valid setup")
}

fn bench_roll(c: &mut Criterion) {
    let state = table(4);

    c.bench_function("apply_roll_4p", |b| {
        b.iter(|| {
            let result = apply(black_box(&state), PlayerId::new(0), &Action::RollAndMove);
            black_box(result)
        });
    });
}

fn bench_validate(c: &mut Criterion) {
    let state = table(4);

    c.bench_function("validate_wrong_turn", |b| {
        b.iter(|| black_box(validate(black_box(&state), PlayerId::new(2), &Action::EndTurn)));
    });
}

fn bench_legal_actions(c: &mut Criterion) {
    let state = table(4);
    let rolled = apply(&state, PlayerId::new(0), &Action::RollAndMove)
        .expect("sound state")
        .into_result()
        .expect("legal roll")
        .next_state;

    c.bench_function("legal_actions_act_phase", |b| {
        b.iter(|| black_box(legal_actions(black_box(&rolled), PlayerId::new(0))));
    });
}

fn bench_state_hash(c: &mut Criterion) {
    let state = table(6);

    c.bench_function("state_hash_6p", |b| {
        b.iter(|| black_box(black_box(&state).state_hash()));
    });
}

fn bench_full_game(c: &mut Criterion) {
    let simulator = Simulator::new(SimConfig::default());

    c.bench_function("greedy_game_4p", |b| {
        b.iter(|| {
            let outcome = simulator.run(table(4), &mut GreedyFounder);
            black_box(outcome)
        });
    });
}

criterion_group!(
    benches,
    bench_roll,
    bench_validate,
    bench_legal_actions,
    bench_state_hash,
    bench_full_game,
);
criterion_main!(benches);
