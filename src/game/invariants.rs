//! Game invariants - sanity checks that detect bugs.
//!
//! A correctly implemented round never triggers these. They are used by the
//! property tests, the fuzz target and the `validate` command.

use crate::game::{GameState, Node};

/// Invariant violation error.
#[derive(Debug, Clone)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invariant violation: {}", self.message)
    }
}

impl std::error::Error for InvariantViolation {}

fn violation(message: String) -> InvariantViolation {
    InvariantViolation { message }
}

fn check_node(node: &Node, violations: &mut Vec<InvariantViolation>) {
    let health = node.current_health();
    let top = node.tuning().top_health;
    if !health.is_finite() || health < 0.0 || health > top {
        violations.push(violation(format!(
            "Node at {} has health {health} outside [0, {top}]",
            node.coord()
        )));
    }
    if health > 0.0 && node.raw_leader().is_none() {
        violations.push(violation(format!(
            "Node at {} has health {health} but no leader",
            node.coord()
        )));
    }
}

/// Check all game invariants.
///
/// Returns a list of violations found, or empty if all invariants hold.
#[must_use]
pub fn check_invariants(state: &GameState) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    let board = state.board();

    for node in board.nodes() {
        check_node(node, &mut violations);
    }

    if let Err(err) = board.check_topology() {
        violations.push(violation(err.to_string()));
    }

    // Prophet placement must agree in both directions.
    for (id, prophet) in state.prophets().iter().enumerate() {
        match board.node(prophet.node) {
            Some(node) if node.prophets().contains(&id) => {}
            Some(node) => violations.push(violation(format!(
                "Prophet {id} stands on {} but the node does not list it",
                node.coord()
            ))),
            None => violations.push(violation(format!(
                "Prophet {id} stands on missing node {}",
                prophet.node
            ))),
        }
    }
    for node in board.nodes() {
        for &id in node.prophets() {
            let here = state
                .prophets()
                .get(id)
                .and_then(|prophet| board.node(prophet.node))
                .is_some_and(|other| other.coord() == node.coord());
            if !here {
                violations.push(violation(format!(
                    "Node at {} lists prophet {id} that stands elsewhere",
                    node.coord()
                )));
            }
        }
    }

    for player in state.players() {
        if !player.score.is_finite() || player.score < 0.0 {
            violations.push(violation(format!(
                "Player {} has score {}",
                player.id, player.score
            )));
        }
        for &id in &player.prophets {
            if state.prophets().get(id).map(|p| p.owner) != Some(player.id) {
                violations.push(violation(format!(
                    "Player {} lists prophet {id} it does not own",
                    player.id
                )));
            }
        }
    }

    violations
}

/// Assert all game invariants hold, panicking if any are violated.
///
/// Only active in debug builds. No-op in release builds.
///
/// # Panics
///
/// Panics with detailed message if any invariant is violated.
#[cfg(debug_assertions)]
pub fn assert_invariants(state: &GameState) {
    let violations = check_invariants(state);
    let messages: Vec<_> = violations.iter().map(|v| v.message.as_str()).collect();
    assert!(
        messages.is_empty(),
        "Game invariant violations:\n  - {}",
        messages.join("\n  - ")
    );
}

/// No-op in release builds.
#[cfg(not(debug_assertions))]
pub fn assert_invariants(_state: &GameState) {}
