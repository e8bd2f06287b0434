//! Output formatting utilities for CLI.

use evangel::game::{GameEvent, PlayerId};
use evangel::Snapshot;
use serde::Serialize;

/// Totals of the events produced by one round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub(super) struct RoundSummary {
    /// Round number.
    pub(super) round: u32,
    /// Prophet moves made during the round's turns.
    pub(super) moves: usize,
    /// Nodes that evangelized.
    pub(super) emissions: usize,
    /// Nodes whose owner changed.
    pub(super) leader_changes: usize,
}

impl RoundSummary {
    /// Count the events drained after a round.
    pub(super) fn from_events(round: u32, events: &[GameEvent]) -> Self {
        let mut summary = Self {
            round,
            ..Self::default()
        };
        for event in events {
            match event {
                GameEvent::ProphetMoved { .. } => summary.moves += 1,
                GameEvent::Evangelized { .. } => summary.emissions += 1,
                GameEvent::LeaderChanged { .. } => summary.leader_changes += 1,
                GameEvent::RoundResolved { .. } => {}
            }
        }
        summary
    }
}

/// JSON-serializable run result.
#[derive(Debug, Serialize)]
pub(super) struct JsonRunResult<'a> {
    /// Scenario name.
    pub(super) scenario: &'a str,
    /// Per-round event totals.
    pub(super) rounds: &'a [RoundSummary],
    /// Nodes owned by each player at the end.
    pub(super) territory: Vec<(PlayerId, usize)>,
    /// Final state.
    pub(super) snapshot: &'a Snapshot,
}

/// Format a one-line round summary.
pub(super) fn format_round(summary: &RoundSummary) -> String {
    format!(
        "Round {}: {} moves, {} emissions, {} leader changes",
        summary.round, summary.moves, summary.emissions, summary.leader_changes
    )
}

/// Format the final standings, best score first.
pub(super) fn format_standings(snapshot: &Snapshot) -> String {
    let mut output = String::from("Final standings:\n");
    let territory = snapshot.territory();
    let mut players: Vec<_> = snapshot.players.iter().zip(&territory).collect();
    players.sort_by(|(a, _), (b, _)| b.score.total_cmp(&a.score).then(a.id.cmp(&b.id)));

    for (rank, (player, (_, owned))) in players.into_iter().enumerate() {
        output.push_str(&format!(
            "  {}. Player {} ({}): {:.1} points, {owned} nodes\n",
            rank + 1,
            player.id,
            player.color.name(),
            player.score
        ));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use evangel::Coord;

    #[test]
    fn test_round_summary_counts() {
        let events = [
            GameEvent::ProphetMoved {
                player: 1,
                from: Coord::new(0, 0),
                to: Coord::new(0, 1),
            },
            GameEvent::Evangelized {
                coord: Coord::new(0, 0),
                player: 1,
                amount: 1.0,
            },
            GameEvent::RoundResolved { round: 4 },
        ];
        let summary = RoundSummary::from_events(4, &events);
        assert_eq!(summary.moves, 1);
        assert_eq!(summary.emissions, 1);
        assert_eq!(summary.leader_changes, 0);
        assert_eq!(
            format_round(&summary),
            "Round 4: 1 moves, 1 emissions, 0 leader changes"
        );
    }

    #[test]
    fn test_standings_sorted_by_score() {
        let snapshot = evangel::run_scenario(&evangel::Scenario::default(), 1).unwrap();
        let text = format_standings(&snapshot);
        assert!(text.starts_with("Final standings:\n  1. Player 1 (red)"));
        assert_eq!(text.lines().count(), 5);
    }
}
