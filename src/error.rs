//! Error types for the simulation.

use std::path::PathBuf;

use thiserror::Error;

use crate::game::{Coord, Direction, PlayerId};

/// Reasons a prophet move is rejected. A rejected move changes no state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IllegalMove {
    /// The player is not the one whose turn it is.
    #[error("player {player} cannot move during player {active}'s turn")]
    NotYourTurn {
        /// The player that tried to move.
        player: PlayerId,
        /// The player whose turn it is.
        active: PlayerId,
    },
    /// The player already moved this turn.
    #[error("player {0} already moved this turn")]
    AlreadyMoved(PlayerId),
    /// The target is not adjacent to the prophet's node.
    #[error("{to} is not adjacent to {from}")]
    NotAdjacent {
        /// Where the prophet stands.
        from: Coord,
        /// Where it was asked to go.
        to: Coord,
    },
    /// The player has no prophet to move.
    #[error("player {0} has no prophet")]
    NoProphet(PlayerId),
}

/// Errors surfaced by the command and query API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SimError {
    /// A move command was rejected.
    #[error("illegal move: {0}")]
    IllegalMove(#[from] IllegalMove),
    /// No node exists at the coordinate.
    #[error("no node at {0}")]
    UnknownCoordinate(Coord),
    /// No player with that id takes part in the game.
    #[error("unknown player {0}")]
    UnknownPlayer(PlayerId),
    /// The game already holds the maximum number of players.
    #[error("too many players (maximum {0})")]
    TooManyPlayers(usize),
    /// A conversion rate or strength is negative or not finite.
    #[error("{0} must be finite and non-negative")]
    InvalidRate(&'static str),
}

/// Errors raised while building a board.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BoardError {
    /// The placement list contained no nodes.
    #[error("board has no nodes")]
    Empty,
    /// Two placements share a coordinate.
    #[error("two nodes placed at {0}")]
    DuplicateCoordinate(Coord),
    /// A node's tuning constants are unusable.
    #[error("invalid tuning at {coord}: {reason}")]
    InvalidTuning {
        /// The offending node.
        coord: Coord,
        /// What is wrong with it.
        reason: String,
    },
    /// An edge is registered on one endpoint but not mirrored on the other.
    /// This is a bug in edge construction, never a runtime condition.
    #[error("edge at {coord} toward {direction} is not mirrored")]
    TopologyInconsistency {
        /// Node holding the unmirrored edge.
        coord: Coord,
        /// Direction the edge is registered under.
        direction: Direction,
    },
}

/// Errors raised while loading or running a scenario.
#[derive(Debug, Error)]
pub enum ScenarioError {
    /// The scenario file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The scenario is not valid JSON or does not match the schema.
    #[error("invalid scenario: {0}")]
    Parse(#[from] serde_json::Error),
    /// The board could not be built.
    #[error("invalid board: {0}")]
    Board(#[from] BoardError),
    /// Setting up players, prophets or seeds failed.
    #[error("invalid setup: {0}")]
    Setup(#[from] SimError),
    /// A tuning override names a coordinate that is not on the board.
    #[error("tuning override for {0}, which is not on the board")]
    UnknownOverride(Coord),
    /// The influence settings are unusable.
    #[error("invalid influence settings: {0}")]
    InvalidInfluence(String),
    /// The scenario has no players.
    #[error("scenario has no players")]
    NoPlayers,
    /// A scripted move was rejected.
    #[error("scripted move of player {player} in round {round} failed: {source}")]
    Script {
        /// Round the move was scheduled for.
        round: u32,
        /// Player that moves.
        player: PlayerId,
        /// Why it was rejected.
        source: SimError,
    },
}

/// Result type for command and query operations.
pub type SimResult<T> = Result<T, SimError>;
