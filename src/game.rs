//! Game layer for Evangel.
//!
//! Implements the simulation core:
//! - Hex coordinates and the six clock directions
//! - Board graph of nodes and edges
//! - Players, prophets and the nodes they contest
//! - Two-pass influence rounds
//! - Turn sequencing and move validation

mod board;
mod events;
mod hex;
mod influence;
mod invariants;
mod node;
mod player;
mod snapshot;
mod state;

pub use board::{Board, Edge};
pub use events::GameEvent;
pub use hex::{Coord, Direction};
pub use influence::{
    apply_pressure, evaluate_all, evangelize, influencers, resolve_round, update_health,
    Evaluation, InfluenceConfig, Source, NEUTRAL_CONVERSION_RATE,
};
pub use invariants::{assert_invariants, check_invariants, InvariantViolation};
pub use node::{EdgeId, Influencer, Node, NodeId, NodeTuning};
pub use player::{Color, Player, PlayerId, Prophet, ProphetId, MAX_PLAYERS, NEUTRAL};
pub use snapshot::{NodeView, PlayerView, Snapshot};
pub use state::GameState;
