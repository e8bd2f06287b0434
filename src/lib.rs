// Allow unwrap and unreadable literals in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::unreadable_literal))]
//! Evangel: a deterministic influence-propagation engine for hex-board
//! territory games.
//!
//! Nodes on a hex board are held by players with some health. Once per round
//! every node is pressed by its neighbors and by the prophets standing on or
//! next to it; healthy nodes push their owner's influence outward and
//! neutral nodes flip to whoever presses hardest.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │     CLI / host application          │
//! ├─────────────────────────────────────┤
//! │   Scenario loading   │   Rendering  │
//! ├─────────────────────────────────────┤
//! │   Turn controller (GameState)       │
//! ├─────────────────────────────────────┤
//! │   Influence engine  │  Board graph  │
//! └─────────────────────────────────────┘
//! ```
//!
//! The core never draws, reads input or touches the filesystem. Hosts build a
//! [`GameState`], feed it moves with [`GameState::record_move`] and
//! [`GameState::end_turn`], then read back [`Snapshot`]s and [`GameEvent`]s.

pub mod error;
pub mod game;
pub mod render;
pub mod scenario;

pub use error::{BoardError, IllegalMove, ScenarioError, SimError, SimResult};

// Re-export key game types at crate root for convenience
pub use game::{Board, Color, Coord, Direction, GameEvent, GameState, PlayerId, Snapshot};
pub use scenario::{run_scenario, Scenario};
