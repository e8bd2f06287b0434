//! Board nodes and their tuning constants.

use serde::{Deserialize, Serialize};

use crate::game::{Coord, Direction, PlayerId, Prophet, ProphetId};

/// Index of a node in the board arena.
pub type NodeId = usize;

/// Index of an edge in the board arena.
pub type EdgeId = usize;

/// Per-node tunable constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeTuning {
    /// Health cap (default: 10).
    pub top_health: f64,
    /// Minimum health for the node to act as an active influencer (default: 7).
    pub evangelism_threshold: f64,
    /// Minimum health for the node to count as owned (default: 3).
    pub ownership_threshold: f64,
    /// Influence the node exerts on its neighbors and the score it yields (default: 1).
    pub conversion_strength: f64,
}

impl Default for NodeTuning {
    fn default() -> Self {
        Self {
            top_health: 10.0,
            evangelism_threshold: 7.0,
            ownership_threshold: 3.0,
            conversion_strength: 1.0,
        }
    }
}

impl NodeTuning {
    /// Check that every constant is finite and non-negative and that both
    /// thresholds fit under the health cap.
    ///
    /// # Errors
    ///
    /// Returns a description of the first problem found.
    pub fn validate(&self) -> Result<(), String> {
        let fields = [
            ("top_health", self.top_health),
            ("evangelism_threshold", self.evangelism_threshold),
            ("ownership_threshold", self.ownership_threshold),
            ("conversion_strength", self.conversion_strength),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("{name} must be finite and non-negative, got {value}"));
            }
        }
        if self.evangelism_threshold > self.top_health {
            return Err(format!(
                "evangelism_threshold {} exceeds top_health {}",
                self.evangelism_threshold, self.top_health
            ));
        }
        if self.ownership_threshold > self.top_health {
            return Err(format!(
                "ownership_threshold {} exceeds top_health {}",
                self.ownership_threshold, self.top_health
            ));
        }
        Ok(())
    }
}

/// Anything that exerts influence on a node during a round.
pub trait Influencer {
    /// The player this source works for, ignoring health.
    fn influencing_leader(&self) -> Option<PlayerId>;

    /// Strength multiplied into every contribution of this source.
    fn conversion_strength(&self) -> f64;

    /// Whether this source pushes its leader's influence this round.
    fn can_evangelize(&self) -> bool;

    /// Whether this source is strong enough to count as owned.
    fn is_owned(&self) -> bool;
}

/// A single cell of the board.
#[derive(Debug, Clone)]
pub struct Node {
    coord: Coord,
    tuning: NodeTuning,
    /// Controlling player as last assigned. Only observable while health is positive.
    leader: Option<PlayerId>,
    current_health: f64,
    calculated_health: f64,
    pub(crate) neighbors: Vec<NodeId>,
    pub(crate) edges: [Option<EdgeId>; 6],
    pub(crate) prophets: Vec<ProphetId>,
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.coord == other.coord
    }
}

impl Eq for Node {}

impl Node {
    /// Create a neutral node with zero health.
    #[must_use]
    pub fn new(coord: Coord, tuning: NodeTuning) -> Self {
        Self {
            coord,
            tuning,
            leader: None,
            current_health: 0.0,
            calculated_health: 0.0,
            neighbors: Vec::new(),
            edges: [None; 6],
            prophets: Vec::new(),
        }
    }

    /// Grid position of this node.
    #[must_use]
    pub const fn coord(&self) -> Coord {
        self.coord
    }

    /// Tuning constants of this node.
    #[must_use]
    pub const fn tuning(&self) -> &NodeTuning {
        &self.tuning
    }

    /// The controlling player, or `None` while the node has no health.
    #[must_use]
    pub fn leader(&self) -> Option<PlayerId> {
        if self.current_health > 0.0 {
            self.leader
        } else {
            None
        }
    }

    /// The last assigned leader, even if the node has since decayed to neutral.
    #[must_use]
    pub const fn raw_leader(&self) -> Option<PlayerId> {
        self.leader
    }

    /// Settled health as of the end of the last round.
    #[must_use]
    pub const fn current_health(&self) -> f64 {
        self.current_health
    }

    /// Unclamped health computed by the pending round.
    #[must_use]
    pub const fn calculated_health(&self) -> f64 {
        self.calculated_health
    }

    /// Adjacent nodes.
    #[must_use]
    pub fn neighbors(&self) -> &[NodeId] {
        &self.neighbors
    }

    /// Edge registered under `direction`, if there is a node that way.
    #[must_use]
    pub const fn edge(&self, direction: Direction) -> Option<EdgeId> {
        self.edges[direction.index()]
    }

    /// Prophets stationed here.
    #[must_use]
    pub fn prophets(&self) -> &[ProphetId] {
        &self.prophets
    }

    /// Whether the node is strong enough to count as owned.
    #[must_use]
    pub fn is_owned(&self) -> bool {
        self.current_health >= self.tuning.ownership_threshold
    }

    /// Whether the node is strong enough to act as an active influencer.
    #[must_use]
    pub fn can_evangelize(&self) -> bool {
        self.current_health >= self.tuning.evangelism_threshold
    }

    /// Whether `other` is adjacent to this node.
    #[must_use]
    pub fn is_neighbor(&self, other: NodeId) -> bool {
        self.neighbors.contains(&other)
    }

    pub(crate) fn set_leader(&mut self, leader: Option<PlayerId>) {
        self.leader = leader;
    }

    pub(crate) fn set_calculated_health(&mut self, health: f64) {
        self.calculated_health = health;
    }

    /// Clamp the pending health into `[0, top_health]` and settle it.
    pub(crate) fn settle(&mut self) {
        self.current_health = self.calculated_health.min(self.tuning.top_health).max(0.0);
    }

    /// Overwrite leader and health directly, bypassing the round.
    pub(crate) fn inject(&mut self, leader: PlayerId, health: f64) {
        self.leader = Some(leader);
        self.current_health = health.min(self.tuning.top_health).max(0.0);
        self.calculated_health = self.current_health;
    }
}

impl Influencer for Node {
    fn influencing_leader(&self) -> Option<PlayerId> {
        self.leader
    }

    fn conversion_strength(&self) -> f64 {
        self.tuning.conversion_strength
    }

    fn can_evangelize(&self) -> bool {
        Node::can_evangelize(self)
    }

    fn is_owned(&self) -> bool {
        Node::is_owned(self)
    }
}

impl Influencer for Prophet {
    fn influencing_leader(&self) -> Option<PlayerId> {
        Some(self.owner)
    }

    fn conversion_strength(&self) -> f64 {
        self.conversion_strength
    }

    fn can_evangelize(&self) -> bool {
        true
    }

    fn is_owned(&self) -> bool {
        true
    }
}
