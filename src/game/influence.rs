//! Influence propagation and ownership resolution.
//!
//! A round runs in two passes over every node:
//!
//! 1. **Evangelize**: each node gathers its influencers (its own prophets,
//!    its neighbors and the prophets on its neighbors) and computes a pending
//!    health and leader from the board as it stood at round start. Healthy
//!    nodes also credit their leader's score.
//! 2. **Update**: each node clamps its pending health into
//!    `[0, top_health]` and settles it.
//!
//! Pass 1 reads only pre-round state and writes only per-node results, so it
//! is evaluated for all nodes before any of them is written back. The result
//! does not depend on node order, and large boards evaluate it in parallel.
//!
//! # Pressure on a held node (health > 0)
//!
//! Starting from the current health, every active influencer adds
//! `rate(leader) × strength` if it shares the node's leader and subtracts it
//! otherwise. Every influencer that is neither active nor owned erodes
//! `neutral_rate × strength`.
//!
//! # Pressure on a neutral node (health = 0)
//!
//! Active influencers are tallied per leader. The leader with the highest
//! tally (lowest player id on ties) becomes the candidate; every other tally
//! and the neutral erosion are subtracted from its score. The node flips to
//! the candidate only if the remainder is positive.

use std::collections::BTreeMap;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::game::{Board, GameEvent, Influencer, Node, NodeId, Player, PlayerId, Prophet};

/// Erosion per unit of strength from influencers that are neither active nor owned.
pub const NEUTRAL_CONVERSION_RATE: f64 = 0.2;

/// Tunables of the influence round.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InfluenceConfig {
    /// Erosion per unit of strength from unowned, inactive influencers (default: 0.2).
    pub neutral_conversion_rate: f64,
    /// Boards with at least this many nodes evaluate pass 1 on the rayon pool
    /// (default: 1024).
    pub parallel_threshold: usize,
}

impl InfluenceConfig {
    /// Check that the neutral conversion rate is finite and non-negative.
    ///
    /// # Errors
    ///
    /// Returns a description of the problem.
    pub fn validate(&self) -> Result<(), String> {
        let rate = self.neutral_conversion_rate;
        if rate.is_finite() && rate >= 0.0 {
            Ok(())
        } else {
            Err(format!(
                "neutral_conversion_rate must be finite and non-negative, got {rate}"
            ))
        }
    }
}

impl Default for InfluenceConfig {
    fn default() -> Self {
        Self {
            neutral_conversion_rate: NEUTRAL_CONVERSION_RATE,
            parallel_threshold: 1024,
        }
    }
}

/// One influencer as seen at round start.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Source {
    /// Leader the influence is exerted for.
    pub leader: Option<PlayerId>,
    /// Conversion strength.
    pub strength: f64,
    /// Whether the source can evangelize.
    pub active: bool,
    /// Whether the source counts as owned.
    pub owned: bool,
}

impl Source {
    /// Capture the current state of an influencer.
    #[must_use]
    pub fn of<I: Influencer + ?Sized>(influencer: &I) -> Self {
        Self {
            leader: influencer.influencing_leader(),
            strength: influencer.conversion_strength(),
            active: influencer.can_evangelize(),
            owned: influencer.is_owned(),
        }
    }
}

/// Pass 1 result for a single node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    /// Pending health before clamping.
    pub calculated_health: f64,
    /// Leader to record on the node.
    pub leader: Option<PlayerId>,
    /// Score credited by this node's emission, if it emitted.
    pub emission: Option<(PlayerId, f64)>,
}

/// Conversion multiplier of a player. Unknown players count as 1.
fn rate_of(players: &[Player], player: PlayerId) -> f64 {
    players
        .get(usize::from(player))
        .map_or(1.0, |p| p.conversion_rate_multiplier)
}

/// Collect the influencers of node `id`: its own prophets, then each
/// neighbor followed by the prophets on that neighbor.
#[must_use]
pub fn influencers(board: &Board, prophets: &[Prophet], id: NodeId) -> Vec<Source> {
    let Some(node) = board.node(id) else {
        return Vec::new();
    };
    let stationed = |node: &Node| {
        node.prophets()
            .iter()
            .filter_map(|&p| prophets.get(p))
            .map(Source::of)
            .collect::<Vec<_>>()
    };

    let mut sources = stationed(node);
    for neighbor in node.neighbors().iter().filter_map(|&n| board.node(n)) {
        sources.push(Source::of(neighbor));
        sources.extend(stationed(neighbor));
    }
    sources
}

/// Compute a node's pending health and leader from its influencers.
///
/// `current_health` and `leader` are the node's settled health and raw
/// leader. `rate` maps a player to its conversion multiplier.
#[must_use]
pub fn apply_pressure<F>(
    current_health: f64,
    leader: Option<PlayerId>,
    sources: &[Source],
    rate: F,
    neutral_rate: f64,
) -> (f64, Option<PlayerId>)
where
    F: Fn(PlayerId) -> f64,
{
    if current_health > 0.0 {
        let mut health = current_health;
        for source in sources {
            if source.active {
                let Some(source_leader) = source.leader else {
                    continue;
                };
                let amount = rate(source_leader) * source.strength;
                if leader == Some(source_leader) {
                    health += amount;
                } else {
                    health -= amount;
                }
            } else if !source.owned {
                health -= neutral_rate * source.strength;
            }
        }
        return (health, leader);
    }

    let mut scores: BTreeMap<PlayerId, f64> = BTreeMap::new();
    let mut neutral = 0.0;
    for source in sources {
        if source.active {
            if let Some(source_leader) = source.leader {
                *scores.entry(source_leader).or_insert(0.0) +=
                    rate(source_leader) * source.strength;
            }
        } else if !source.owned {
            neutral += neutral_rate * source.strength;
        }
    }

    // Ascending ids with a strict comparison: the lowest id wins ties.
    let mut candidate = None;
    let mut health = 0.0;
    for (&player, &score) in &scores {
        if score > health {
            candidate = Some(player);
            health = score;
        }
    }
    for (&player, &score) in &scores {
        if Some(player) != candidate {
            health -= score;
        }
    }
    health -= neutral;

    if health > 0.0 {
        (health, candidate)
    } else {
        (health, leader)
    }
}

/// Pass 1 for node `id`, reading only the board as it stands.
#[must_use]
pub fn evangelize(
    board: &Board,
    prophets: &[Prophet],
    players: &[Player],
    config: &InfluenceConfig,
    id: NodeId,
) -> Evaluation {
    let Some(node) = board.node(id) else {
        return Evaluation {
            calculated_health: 0.0,
            leader: None,
            emission: None,
        };
    };

    let emission = if node.current_health() > node.tuning().evangelism_threshold {
        node.leader()
            .map(|leader| (leader, rate_of(players, leader) * node.tuning().conversion_strength))
    } else {
        None
    };

    let sources = influencers(board, prophets, id);
    let (calculated_health, leader) = apply_pressure(
        node.current_health(),
        node.raw_leader(),
        &sources,
        |player| rate_of(players, player),
        config.neutral_conversion_rate,
    );

    Evaluation {
        calculated_health,
        leader,
        emission,
    }
}

/// Pass 2 for one node: clamp the pending health and settle it.
pub fn update_health(node: &mut Node) {
    node.settle();
}

/// Run pass 1 for every node without writing anything.
#[must_use]
pub fn evaluate_all(
    board: &Board,
    prophets: &[Prophet],
    players: &[Player],
    config: &InfluenceConfig,
) -> Vec<Evaluation> {
    let evaluate = |id: NodeId| evangelize(board, prophets, players, config, id);
    if board.len() >= config.parallel_threshold {
        (0..board.len()).into_par_iter().map(evaluate).collect()
    } else {
        (0..board.len()).map(evaluate).collect()
    }
}

/// Resolve one full round: pass 1 over every node, then pass 2 over every node.
///
/// Score credits are applied in node order. Returns the emission and
/// ownership-change events of the round.
pub fn resolve_round(
    board: &mut Board,
    prophets: &[Prophet],
    players: &mut [Player],
    config: &InfluenceConfig,
) -> Vec<GameEvent> {
    let evaluations = evaluate_all(board, prophets, players, config);
    let previous: Vec<Option<PlayerId>> = board.nodes().iter().map(Node::leader).collect();
    let mut events = Vec::new();

    for (node, evaluation) in board.nodes_mut().iter_mut().zip(&evaluations) {
        node.set_calculated_health(evaluation.calculated_health);
        node.set_leader(evaluation.leader);

        if let Some((player, amount)) = evaluation.emission {
            if let Some(credited) = players.get_mut(usize::from(player)) {
                credited.add_score(amount);
            }
            events.push(GameEvent::Evangelized {
                coord: node.coord(),
                player,
                amount,
            });
        }
    }
    let emissions = events.len();

    for (node, previous) in board.nodes_mut().iter_mut().zip(previous) {
        update_health(node);
        let leader = node.leader();
        if leader != previous {
            trace!(coord = %node.coord(), ?previous, ?leader, "leader changed");
            events.push(GameEvent::LeaderChanged {
                coord: node.coord(),
                previous,
                leader,
            });
        }
    }

    debug!(
        nodes = board.len(),
        emissions,
        leader_changes = events.len() - emissions,
        "influence round resolved"
    );

    events
}
