//! Player and prophet records.

use serde::{Deserialize, Serialize};

use crate::game::NodeId;

/// Unique identifier for a player. Id 0 is the neutral player.
pub type PlayerId = u8;

/// Id of the neutral player, which never takes a turn.
pub const NEUTRAL: PlayerId = 0;

/// Maximum number of real (non-neutral) players in a game.
pub const MAX_PLAYERS: usize = 4;

/// Index of a prophet in the game's prophet arena.
pub type ProphetId = usize;

/// Display color of a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    /// Neutral gray.
    Gray,
    /// Red.
    Red,
    /// Green.
    Green,
    /// Blue.
    Blue,
    /// Magenta.
    Magenta,
}

impl Color {
    /// Default palette, indexed by player id.
    pub const PALETTE: [Color; MAX_PLAYERS + 1] = [
        Color::Gray,
        Color::Red,
        Color::Green,
        Color::Blue,
        Color::Magenta,
    ];

    /// Default color for a player id.
    #[must_use]
    pub fn for_player(id: PlayerId) -> Self {
        Self::PALETTE
            .get(usize::from(id))
            .copied()
            .unwrap_or(Color::Gray)
    }

    /// Lowercase color name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Color::Gray => "gray",
            Color::Red => "red",
            Color::Green => "green",
            Color::Blue => "blue",
            Color::Magenta => "magenta",
        }
    }
}

/// State for a single player.
#[derive(Debug, Clone)]
pub struct Player {
    /// Unique identifier for this player.
    pub id: PlayerId,
    /// Display color.
    pub color: Color,
    /// Cumulative score from nodes that evangelize under this player.
    pub score: f64,
    /// Multiplier applied to every influence this player's nodes and prophets exert.
    pub conversion_rate_multiplier: f64,
    /// Prophets owned by this player, lead prophet first.
    pub prophets: Vec<ProphetId>,
}

impl Player {
    /// Create a new player with a zero score and no prophets.
    #[must_use]
    pub fn new(id: PlayerId, color: Color, conversion_rate_multiplier: f64) -> Self {
        Self {
            id,
            color,
            score: 0.0,
            conversion_rate_multiplier,
            prophets: Vec::new(),
        }
    }

    /// The neutral player.
    #[must_use]
    pub fn neutral() -> Self {
        Self::new(NEUTRAL, Color::Gray, 1.0)
    }

    /// Whether this is the neutral player.
    #[must_use]
    pub const fn is_neutral(&self) -> bool {
        self.id == NEUTRAL
    }

    /// The prophet moved by this player's turn command.
    #[must_use]
    pub fn lead_prophet(&self) -> Option<ProphetId> {
        self.prophets.first().copied()
    }

    /// Credit score to this player.
    pub fn add_score(&mut self, amount: f64) {
        self.score += amount;
    }
}

/// A mobile influence source stationed on one node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prophet {
    /// The player this prophet works for.
    pub owner: PlayerId,
    /// The node the prophet currently occupies.
    pub node: NodeId,
    /// Influence strength this prophet exerts on its own and adjacent nodes.
    pub conversion_strength: f64,
}

impl Prophet {
    /// Create a prophet stationed on `node`.
    #[must_use]
    pub const fn new(owner: PlayerId, node: NodeId, conversion_strength: f64) -> Self {
        Self {
            owner,
            node,
            conversion_strength,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_creation() {
        let player = Player::new(2, Color::Green, 1.5);
        assert_eq!(player.id, 2);
        assert_eq!(player.color, Color::Green);
        assert!(player.score.abs() < f64::EPSILON);
        assert!(player.prophets.is_empty());
        assert!(!player.is_neutral());
        assert_eq!(player.lead_prophet(), None);
    }

    #[test]
    fn test_neutral_player() {
        let neutral = Player::neutral();
        assert!(neutral.is_neutral());
        assert_eq!(neutral.color, Color::Gray);
    }

    #[test]
    fn test_lead_prophet_is_first() {
        let mut player = Player::new(1, Color::Red, 1.0);
        player.prophets.push(3);
        player.prophets.push(1);
        assert_eq!(player.lead_prophet(), Some(3));
    }

    #[test]
    fn test_add_score() {
        let mut player = Player::new(1, Color::Red, 1.0);
        player.add_score(1.0);
        player.add_score(0.5);
        assert!((player.score - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_palette() {
        assert_eq!(Color::for_player(0), Color::Gray);
        assert_eq!(Color::for_player(1), Color::Red);
        assert_eq!(Color::for_player(4), Color::Magenta);
        assert_eq!(Color::for_player(9), Color::Gray);
        assert_eq!(Color::Blue.name(), "blue");
    }
}
