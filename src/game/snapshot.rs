//! Read-only views of the game for rendering and comparison.

use serde::{Deserialize, Serialize};

use crate::game::{Color, Coord, Node, PlayerId};

/// What a renderer needs to know about one node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodeView {
    /// Grid position.
    pub coord: Coord,
    /// Controlling player, if the node has any health.
    pub owner: Option<PlayerId>,
    /// Settled health.
    pub current_health: f64,
    /// Whether health reaches the ownership threshold.
    pub is_owned: bool,
    /// Whether health reaches the evangelism threshold.
    pub can_evangelize: bool,
}

impl From<&Node> for NodeView {
    fn from(node: &Node) -> Self {
        Self {
            coord: node.coord(),
            owner: node.leader(),
            current_health: node.current_health(),
            is_owned: node.is_owned(),
            can_evangelize: node.can_evangelize(),
        }
    }
}

/// What a renderer needs to know about one player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerView {
    /// Player id.
    pub id: PlayerId,
    /// Display color.
    pub color: Color,
    /// Cumulative score.
    pub score: f64,
    /// Positions of the player's prophets, lead prophet first.
    pub prophets: Vec<Coord>,
}

/// The whole observable state between commands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Rounds resolved so far.
    pub round: u32,
    /// Player whose turn it is.
    pub active_player: PlayerId,
    /// Every node, in board order.
    pub nodes: Vec<NodeView>,
    /// Every real player, in id order.
    pub players: Vec<PlayerView>,
}

impl Snapshot {
    /// The node view at `coord`.
    #[must_use]
    pub fn node(&self, coord: Coord) -> Option<&NodeView> {
        self.nodes.iter().find(|view| view.coord == coord)
    }

    /// Number of nodes each real player currently owns, in player order.
    #[must_use]
    pub fn territory(&self) -> Vec<(PlayerId, usize)> {
        self.players
            .iter()
            .map(|player| {
                let owned = self
                    .nodes
                    .iter()
                    .filter(|view| view.is_owned && view.owner == Some(player.id))
                    .count();
                (player.id, owned)
            })
            .collect()
    }
}
