//! Plain-text rendering of the board and scores.

// format! with push_str reads better here than write! with a discarded Result
#![allow(clippy::format_push_string)]

use std::collections::{BTreeSet, HashMap};

use crate::game::{Color, Coord, GameState, NodeView, PlayerId, Snapshot};

/// Width of one rendered cell, including the separating space.
const CELL_WIDTH: usize = 6;

/// Render the current game state.
///
/// See [`render_snapshot`] for the format.
#[must_use]
pub fn render_text(state: &GameState) -> String {
    render_snapshot(&state.snapshot())
}

/// Render a snapshot as text.
///
/// Rows are printed top to bottom (highest `y` first). Each cell shows the
/// owner's color letter and the node's health: uppercase when the node is
/// owned, lowercase when it is held below the ownership threshold, `.` when
/// it is neutral. Missing cells are blank. Rows and columns with no cells at
/// all are left out.
///
/// ```text
/// === ROUND 2 ===
///
///   R10.0 r 1.0 . 0.0
///   . 0.0 . 0.0 G10.0
///
/// PLAYERS:
/// - P1 red: score 2.0, territory 1, prophets [(0, 1)]
/// - P2 green: score 2.0, territory 1, prophets [(2, 0)]
///
/// Next to move: P1
/// ```
#[must_use]
pub fn render_snapshot(snapshot: &Snapshot) -> String {
    let mut output = String::new();
    output.push_str(&format!("=== ROUND {} ===\n\n", snapshot.round));
    render_board(&mut output, snapshot);
    output.push('\n');
    render_players(&mut output, snapshot);
    output.push_str(&format!("\nNext to move: P{}\n", snapshot.active_player));
    output
}

fn render_board(output: &mut String, snapshot: &Snapshot) {
    // Only occupied rows and columns are drawn.
    let columns: BTreeSet<i32> = snapshot.nodes.iter().map(|view| view.coord.x).collect();
    let rows: BTreeSet<i32> = snapshot.nodes.iter().map(|view| view.coord.y).collect();

    let colors: HashMap<PlayerId, Color> = snapshot
        .players
        .iter()
        .map(|player| (player.id, player.color))
        .collect();
    let cells: HashMap<Coord, &NodeView> = snapshot
        .nodes
        .iter()
        .map(|view| (view.coord, view))
        .collect();

    for &y in rows.iter().rev() {
        let mut line = String::from(" ");
        for &x in &columns {
            if let Some(view) = cells.get(&Coord::new(x, y)) {
                line.push_str(&format!(" {}", cell(view, &colors)));
            } else {
                line.push_str(&" ".repeat(CELL_WIDTH));
            }
        }
        output.push_str(line.trim_end());
        output.push('\n');
    }
}

fn cell(view: &NodeView, colors: &HashMap<PlayerId, Color>) -> String {
    let Some(owner) = view.owner else {
        return format!(".{:4.1}", view.current_health);
    };
    let color = colors
        .get(&owner)
        .copied()
        .unwrap_or_else(|| Color::for_player(owner));
    let letter = color.name().chars().next().unwrap_or('?');
    let letter = if view.is_owned {
        letter.to_ascii_uppercase()
    } else {
        letter
    };
    format!("{letter}{:4.1}", view.current_health)
}

fn render_players(output: &mut String, snapshot: &Snapshot) {
    output.push_str("PLAYERS:\n");
    let territory: HashMap<PlayerId, usize> = snapshot.territory().into_iter().collect();
    for player in &snapshot.players {
        let prophets: Vec<String> = player.prophets.iter().map(ToString::to_string).collect();
        output.push_str(&format!(
            "- P{} {}: score {:.1}, territory {}, prophets [{}]\n",
            player.id,
            player.color.name(),
            player.score,
            territory.get(&player.id).copied().unwrap_or(0),
            prophets.join(", ")
        ));
    }
}
