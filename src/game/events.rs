//! Notifications emitted by the simulation for a presentation layer.
//!
//! The core never draws anything. Hosts drain these after each command and
//! turn them into sprites, particles or log lines.

use serde::{Deserialize, Serialize};

use crate::game::{Coord, PlayerId};

/// Something observable that happened during a command or round.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    /// A prophet moved to an adjacent node.
    ProphetMoved {
        /// Owner of the prophet.
        player: PlayerId,
        /// Node it left.
        from: Coord,
        /// Node it entered.
        to: Coord,
    },
    /// A node projected influence and credited its leader's score.
    Evangelized {
        /// The emitting node.
        coord: Coord,
        /// Player credited.
        player: PlayerId,
        /// Score added.
        amount: f64,
    },
    /// The observable owner of a node changed at the end of a round.
    LeaderChanged {
        /// The node.
        coord: Coord,
        /// Owner before the round.
        previous: Option<PlayerId>,
        /// Owner after the round.
        leader: Option<PlayerId>,
    },
    /// An influence round finished.
    RoundResolved {
        /// Number of rounds resolved so far, including this one.
        round: u32,
    },
}
