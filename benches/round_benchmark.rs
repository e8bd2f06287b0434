//! Benchmarks for influence rounds.
//!
//! Round resolution is the hot path: every node gathers its influencers and
//! the whole board is rewritten once per full turn cycle.

#![allow(missing_docs)]

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use evangel::game::{evaluate_all, Board, Color, Coord, GameState, InfluenceConfig, NodeTuning};
use evangel::{run_scenario, Scenario};

/// A square board with four players holding the corners at full health.
fn corners_game(size: u16, config: InfluenceConfig) -> Option<GameState> {
    let board = Board::rectangle(size, size, NodeTuning::default()).ok()?;
    let mut game = GameState::new(board, config);
    let far = i32::from(size) - 1;
    let corners = [(0, 0), (far, far), (0, far), (far, 0)];
    for (id, (x, y)) in (1u8..).zip(corners) {
        let player = game.add_player(Color::for_player(id), 1.0).ok()?;
        game.place_prophet(player, Coord::new(x, y), 1.0).ok()?;
        game.seed_node(Coord::new(x, y), player, 10.0).ok()?;
    }
    // Let the territory spread so rounds have real contests to resolve.
    for _ in 0..20 {
        game.resolve_round();
    }
    Some(game)
}

fn bench_default_scenario(c: &mut Criterion) {
    let scenario = Scenario::default();
    c.bench_function("default_scenario_50_rounds", |b| {
        b.iter(|| black_box(run_scenario(black_box(&scenario), 50)));
    });
}

fn bench_round_by_board_size(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_round");
    for size in [16u16, 64, 128] {
        let Some(game) = corners_game(size, InfluenceConfig::default()) else {
            continue;
        };
        group.bench_with_input(BenchmarkId::from_parameter(size), &game, |b, game| {
            b.iter(|| {
                let mut game = game.clone();
                game.resolve_round();
                black_box(game.round())
            });
        });
    }
    group.finish();
}

fn bench_pass_one_serial_vs_parallel(c: &mut Criterion) {
    let serial = InfluenceConfig {
        parallel_threshold: usize::MAX,
        ..InfluenceConfig::default()
    };
    let parallel = InfluenceConfig {
        parallel_threshold: 0,
        ..InfluenceConfig::default()
    };
    let Some(game) = corners_game(128, serial) else {
        return;
    };

    let mut group = c.benchmark_group("evaluate_all_128");
    for (name, config) in [("serial", serial), ("parallel", parallel)] {
        group.bench_function(name, |b| {
            b.iter(|| {
                black_box(evaluate_all(
                    black_box(game.board()),
                    game.prophets(),
                    game.players(),
                    &config,
                ))
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_default_scenario,
    bench_round_by_board_size,
    bench_pass_one_serial_vs_parallel
);
criterion_main!(benches);
