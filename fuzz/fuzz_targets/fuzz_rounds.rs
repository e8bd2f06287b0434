#![no_main]

//! Influence round fuzzer.
//!
//! Builds a small board from fuzzer-chosen cells and tuning, seeds it, then
//! plays turns with arbitrary move commands. Every command must either
//! succeed or be rejected without changing state, and the invariants must
//! hold after every round.

use arbitrary::Arbitrary;
use evangel::game::{
    check_invariants, Board, Color, Coord, Direction, GameState, InfluenceConfig, NodeTuning,
};
use libfuzzer_sys::fuzz_target;

/// A fuzzer-generated command.
#[derive(Arbitrary, Debug, Clone, Copy)]
enum FuzzCommand {
    /// Move the active player's prophet one step.
    Step { direction: u8 },
    /// Move any player's prophet to any cell.
    Jump { player: u8, x: i8, y: i8 },
    /// End the active player's turn.
    EndTurn,
}

/// Structured input for round fuzzing.
#[derive(Arbitrary, Debug)]
struct RoundInput {
    /// Cells present on the board.
    cells: Vec<(u8, u8)>,
    /// Tuning as (top, evangelism, ownership, strength) in tenths.
    tuning: (u8, u8, u8, u8),
    /// Players as (prophet cell index, conversion multiplier in tenths).
    players: Vec<(u8, u8)>,
    /// Seeds as (cell index, player, health in tenths).
    seeds: Vec<(u8, u8, u16)>,
    /// Commands to play.
    commands: Vec<FuzzCommand>,
}

fuzz_target!(|input: RoundInput| {
    let mut cells: Vec<Coord> = input
        .cells
        .iter()
        .take(64)
        .map(|&(x, y)| Coord::new(i32::from(x % 12), i32::from(y % 12)))
        .collect();
    cells.sort();
    cells.dedup();

    let (top, evangelism, ownership, strength) = input.tuning;
    let tuning = NodeTuning {
        top_health: f64::from(top) / 10.0,
        evangelism_threshold: f64::from(evangelism) / 10.0,
        ownership_threshold: f64::from(ownership) / 10.0,
        conversion_strength: f64::from(strength) / 10.0,
    };

    // Invalid boards are rejected by construction; nothing more to check.
    let Ok(board) = Board::new(cells.iter().map(|&c| (c, tuning))) else {
        return;
    };
    let mut game = GameState::new(board, InfluenceConfig::default());

    for (id, &(cell, rate)) in (1u8..).zip(input.players.iter().take(4)) {
        let Ok(player) = game.add_player(Color::for_player(id), f64::from(rate) / 10.0) else {
            return;
        };
        let start = cells[usize::from(cell) % cells.len()];
        if game.place_prophet(player, start, 1.0).is_err() {
            return;
        }
    }
    let players = game.real_player_count();
    if players == 0 {
        return;
    }

    for &(cell, player, health) in input.seeds.iter().take(16) {
        let coord = cells[usize::from(cell) % cells.len()];
        let _ = game.seed_node(coord, player, f64::from(health) / 10.0);
    }

    for command in input.commands.into_iter().take(200) {
        match command {
            FuzzCommand::Step { direction } => {
                let active = game.active_player();
                let Ok(positions) = game.prophet_positions(active) else {
                    continue;
                };
                let Some(&from) = positions.first() else {
                    continue;
                };
                let direction = Direction::ALL[usize::from(direction) % 6];
                let Some(to) = from.step(direction) else {
                    continue;
                };
                let _ = game.record_move(active, to);
            }
            FuzzCommand::Jump { player, x, y } => {
                let before = game.snapshot();
                let moved = game.has_moved();
                if game
                    .record_move(player, Coord::new(i32::from(x), i32::from(y)))
                    .is_err()
                {
                    assert_eq!(before, game.snapshot(), "rejected move changed state");
                    assert_eq!(moved, game.has_moved());
                }
            }
            FuzzCommand::EndTurn => {
                if game.end_turn() {
                    let violations = check_invariants(&game);
                    assert!(violations.is_empty(), "{violations:?}");
                }
            }
        }
    }
});
