//! Scenario files: board shape, players, seeded nodes and scripted moves.
//!
//! Scenarios are JSON documents. Everything except the board and the player
//! list has a default, so a minimal file is short:
//!
//! ```json
//! {
//!   "board": { "shape": "rectangle", "width": 4, "height": 4 },
//!   "players": [{ "start": { "x": 0, "y": 0 } }, { "start": { "x": 3, "y": 3 } }],
//!   "seeds": [{ "coord": { "x": 0, "y": 0 }, "player": 1, "health": 10.0 }]
//! }
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ScenarioError, SimError};
use crate::game::{
    Board, Color, Coord, GameState, InfluenceConfig, NodeTuning, PlayerId, Snapshot, NEUTRAL,
};

fn one() -> f64 {
    1.0
}

/// Which cells exist on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum BoardShape {
    /// Every cell of a `width` x `height` grid, in row-major order.
    Rectangle {
        /// Number of columns.
        width: u16,
        /// Number of rows.
        height: u16,
    },
    /// Exactly the listed cells, in the listed order.
    Cells {
        /// Cell coordinates.
        coords: Vec<Coord>,
    },
}

impl BoardShape {
    fn coords(&self) -> Vec<Coord> {
        match self {
            Self::Rectangle { width, height } => (0..i32::from(*height))
                .flat_map(|y| (0..i32::from(*width)).map(move |x| Coord::new(x, y)))
                .collect(),
            Self::Cells { coords } => coords.clone(),
        }
    }
}

/// Tuning for a single node that differs from the scenario default.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TuningOverride {
    /// The node.
    pub coord: Coord,
    /// Its tuning.
    pub tuning: NodeTuning,
}

/// One player taking part in the scenario.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerSetup {
    /// Display color (default: the palette color for the player's id).
    #[serde(default)]
    pub color: Option<Color>,
    /// Conversion multiplier (default: 1).
    #[serde(default = "one")]
    pub conversion_rate_multiplier: f64,
    /// Strength of the player's prophet (default: 1).
    #[serde(default = "one")]
    pub prophet_strength: f64,
    /// Where the player's prophet starts. Players without a start have no prophet.
    #[serde(default)]
    pub start: Option<Coord>,
}

/// A node whose leader and health are set before the first turn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Seed {
    /// The node.
    pub coord: Coord,
    /// Its leader.
    pub player: PlayerId,
    /// Its health, clamped to the node's range.
    pub health: f64,
}

/// A prophet move made during a given round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptedMove {
    /// Round the move belongs to, starting at 1. Moves of round `n` are made
    /// during the turns that end with the `n`-th resolution.
    pub round: u32,
    /// Player that moves.
    pub player: PlayerId,
    /// Target node.
    pub to: Coord,
}

/// Complete description of a game setup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Human-readable name.
    #[serde(default)]
    pub name: String,
    /// Cells on the board.
    pub board: BoardShape,
    /// Tuning for every node without an override.
    #[serde(default)]
    pub tuning: NodeTuning,
    /// Per-node tuning overrides.
    #[serde(default)]
    pub overrides: Vec<TuningOverride>,
    /// Influence settings.
    #[serde(default)]
    pub influence: InfluenceConfig,
    /// Players, in turn order. Ids are assigned from 1.
    pub players: Vec<PlayerSetup>,
    /// Nodes set before the first turn.
    #[serde(default)]
    pub seeds: Vec<Seed>,
    /// Moves made while the scenario runs.
    #[serde(default)]
    pub script: Vec<ScriptedMove>,
}

impl Default for Scenario {
    /// Four players on a 10x10 board, each holding a corner at full health
    /// with its prophet standing on it.
    fn default() -> Self {
        let corners = [
            Coord::new(0, 0),
            Coord::new(9, 9),
            Coord::new(0, 9),
            Coord::new(9, 0),
        ];
        let tuning = NodeTuning::default();
        Self {
            name: "four corners".to_string(),
            board: BoardShape::Rectangle {
                width: 10,
                height: 10,
            },
            tuning,
            overrides: Vec::new(),
            influence: InfluenceConfig::default(),
            players: corners
                .iter()
                .map(|&start| PlayerSetup {
                    color: None,
                    conversion_rate_multiplier: 1.0,
                    prophet_strength: 1.0,
                    start: Some(start),
                })
                .collect(),
            seeds: corners
                .iter()
                .zip(1..)
                .map(|(&coord, player)| Seed {
                    coord,
                    player,
                    health: tuning.top_health,
                })
                .collect(),
            script: Vec::new(),
        }
    }
}

impl Scenario {
    /// Parse a scenario from JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid scenario document.
    pub fn from_json(text: &str) -> Result<Self, ScenarioError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Load a scenario file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        let text = std::fs::read_to_string(path).map_err(|source| ScenarioError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let scenario = Self::from_json(&text)?;
        debug!(path = %path.display(), name = %scenario.name, "scenario loaded");
        Ok(scenario)
    }

    /// Serialize the scenario as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, ScenarioError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Build the board with every override applied.
    ///
    /// # Errors
    ///
    /// Returns an error if the board is invalid or an override names a
    /// coordinate that is not on it.
    pub fn build_board(&self) -> Result<Board, ScenarioError> {
        let coords = self.board.coords();
        let mut tunings: HashMap<Coord, NodeTuning> = HashMap::new();
        for over in &self.overrides {
            if !coords.contains(&over.coord) {
                return Err(ScenarioError::UnknownOverride(over.coord));
            }
            tunings.insert(over.coord, over.tuning);
        }
        let placements = coords.into_iter().map(|coord| {
            let tuning = tunings.get(&coord).copied().unwrap_or(self.tuning);
            (coord, tuning)
        });
        Ok(Board::new(placements)?)
    }

    /// Build a game ready for its first turn.
    ///
    /// # Errors
    ///
    /// Returns an error if the board or influence settings are invalid, there
    /// are no players or too many, a rate is negative, a prophet or seed is
    /// placed off the board, or the script names a player that does not exist.
    pub fn build(&self) -> Result<GameState, ScenarioError> {
        if self.players.is_empty() {
            return Err(ScenarioError::NoPlayers);
        }
        self.influence
            .validate()
            .map_err(ScenarioError::InvalidInfluence)?;
        let mut game = GameState::new(self.build_board()?, self.influence);

        for setup in &self.players {
            let next = PlayerId::try_from(game.real_player_count() + 1).unwrap_or(PlayerId::MAX);
            let color = setup.color.unwrap_or_else(|| Color::for_player(next));
            let id = game.add_player(color, setup.conversion_rate_multiplier)?;
            if let Some(start) = setup.start {
                game.place_prophet(id, start, setup.prophet_strength)?;
            }
        }
        for seed in &self.seeds {
            game.seed_node(seed.coord, seed.player, seed.health)?;
        }
        for step in &self.script {
            if step.player == NEUTRAL || game.player(step.player).is_err() {
                return Err(SimError::UnknownPlayer(step.player).into());
            }
        }

        debug!(
            nodes = game.board().len(),
            players = game.real_player_count(),
            "scenario built"
        );
        Ok(game)
    }
}

/// Play `rounds` full rounds of `scenario` and return the final snapshot.
///
/// Each player's scripted moves for the current round are made at the start
/// of its turn, then the turn ends.
///
/// # Errors
///
/// Returns an error if the scenario cannot be built or a scripted move is
/// rejected.
pub fn run_scenario(scenario: &Scenario, rounds: u32) -> Result<Snapshot, ScenarioError> {
    let mut game = scenario.build()?;
    play_rounds(&mut game, &scenario.script, rounds, |_| {})?;
    Ok(game.snapshot())
}

/// Play `rounds` full rounds on an already built game, applying `script` and
/// calling `on_round` after every resolution.
///
/// # Errors
///
/// Returns an error if a scripted move is rejected.
pub fn play_rounds<F>(
    game: &mut GameState,
    script: &[ScriptedMove],
    rounds: u32,
    mut on_round: F,
) -> Result<(), ScenarioError>
where
    F: FnMut(&mut GameState),
{
    for _ in 0..rounds {
        let round = game.round() + 1;
        loop {
            let player = game.active_player();
            for step in script
                .iter()
                .filter(|step| step.round == round && step.player == player)
            {
                game.record_move(player, step.to)
                    .map_err(|source| ScenarioError::Script {
                        round,
                        player,
                        source,
                    })?;
            }
            if game.end_turn() {
                break;
            }
        }
        on_round(game);
    }
    info!(rounds, final_round = game.round(), "scenario finished");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{IllegalMove, SimError};

    #[test]
    fn test_default_scenario_builds() {
        let game = Scenario::default().build().unwrap();
        assert_eq!(game.board().len(), 100);
        assert_eq!(game.real_player_count(), 4);
        assert_eq!(game.player(3).unwrap().color, Color::Blue);

        let corner = game.node(Coord::new(9, 0)).unwrap();
        assert_eq!(corner.owner, Some(4));
        assert!((corner.current_health - 10.0).abs() < f64::EPSILON);
        assert_eq!(game.prophet_positions(2).unwrap(), vec![Coord::new(9, 9)]);
    }

    #[test]
    fn test_minimal_json() {
        let scenario = Scenario::from_json(
            r#"{
                "board": { "shape": "cells", "coords": [{ "x": 0, "y": 0 }, { "x": 0, "y": 1 }] },
                "players": [{ "start": { "x": 0, "y": 0 } }]
            }"#,
        )
        .unwrap();
        assert_eq!(scenario.tuning, NodeTuning::default());
        assert!((scenario.players[0].prophet_strength - 1.0).abs() < f64::EPSILON);

        let game = scenario.build().unwrap();
        assert_eq!(game.board().edges().len(), 1);
    }

    #[test]
    fn test_json_round_trip_of_default() {
        let scenario = Scenario::default();
        let parsed = Scenario::from_json(&scenario.to_json().unwrap()).unwrap();
        assert_eq!(parsed, scenario);
    }

    #[test]
    fn test_override_applies_to_one_node() {
        let mut scenario = Scenario::default();
        let strong = NodeTuning {
            conversion_strength: 3.0,
            ..NodeTuning::default()
        };
        scenario.overrides.push(TuningOverride {
            coord: Coord::new(5, 5),
            tuning: strong,
        });
        let board = scenario.build_board().unwrap();
        let id = board.node_at(Coord::new(5, 5)).unwrap();
        assert_eq!(board.nodes()[id].tuning(), &strong);
        assert_eq!(board.nodes()[0].tuning(), &NodeTuning::default());
    }

    #[test]
    fn test_override_off_board_rejected() {
        let mut scenario = Scenario::default();
        scenario.overrides.push(TuningOverride {
            coord: Coord::new(10, 10),
            tuning: NodeTuning::default(),
        });
        assert!(matches!(
            scenario.build_board(),
            Err(ScenarioError::UnknownOverride(_))
        ));
    }

    #[test]
    fn test_setup_errors() {
        let mut scenario = Scenario::default();
        scenario.players.clear();
        assert!(matches!(scenario.build(), Err(ScenarioError::NoPlayers)));

        let mut scenario = Scenario::default();
        scenario.players.push(scenario.players[0]);
        assert!(matches!(
            scenario.build(),
            Err(ScenarioError::Setup(SimError::TooManyPlayers(4)))
        ));

        let mut scenario = Scenario::default();
        scenario.seeds[0].player = 7;
        assert!(matches!(
            scenario.build(),
            Err(ScenarioError::Setup(SimError::UnknownPlayer(7)))
        ));
    }

    #[test]
    fn test_negative_rates_rejected() {
        let scenario = Scenario::from_json(
            r#"{
                "board": { "shape": "rectangle", "width": 2, "height": 1 },
                "players": [{ "conversion_rate_multiplier": -1.0, "start": { "x": 0, "y": 0 } }],
                "seeds": [{ "coord": { "x": 0, "y": 0 }, "player": 1, "health": 10.0 }]
            }"#,
        )
        .unwrap();
        assert!(matches!(
            scenario.build(),
            Err(ScenarioError::Setup(SimError::InvalidRate(
                "conversion_rate_multiplier"
            )))
        ));

        let mut scenario = Scenario::default();
        scenario.players[2].prophet_strength = -1.0;
        assert!(matches!(
            scenario.build(),
            Err(ScenarioError::Setup(SimError::InvalidRate("conversion_strength")))
        ));

        let mut scenario = Scenario::default();
        scenario.influence.neutral_conversion_rate = -0.2;
        assert!(matches!(
            scenario.build(),
            Err(ScenarioError::InvalidInfluence(_))
        ));
    }

    #[test]
    fn test_script_for_unknown_player_rejected() {
        for player in [NEUTRAL, 5, 7] {
            let mut scenario = Scenario::default();
            scenario.script = vec![ScriptedMove {
                round: 1,
                player,
                to: Coord::new(1, 0),
            }];
            let err = run_scenario(&scenario, 1).unwrap_err();
            assert!(
                matches!(err, ScenarioError::Setup(SimError::UnknownPlayer(id)) if id == player),
                "{err}"
            );
        }
    }

    #[test]
    fn test_scripted_moves_are_applied() {
        let mut scenario = Scenario::default();
        scenario.script = vec![
            ScriptedMove {
                round: 1,
                player: 1,
                to: Coord::new(1, 0),
            },
            ScriptedMove {
                round: 2,
                player: 1,
                to: Coord::new(2, 0),
            },
        ];
        let snapshot = run_scenario(&scenario, 2).unwrap();
        assert_eq!(snapshot.round, 2);
        assert_eq!(snapshot.players[0].prophets, vec![Coord::new(2, 0)]);
    }

    #[test]
    fn test_bad_script_reports_round_and_player() {
        let mut scenario = Scenario::default();
        scenario.script = vec![ScriptedMove {
            round: 1,
            player: 2,
            to: Coord::new(0, 0),
        }];
        let err = run_scenario(&scenario, 1).unwrap_err();
        assert!(matches!(
            err,
            ScenarioError::Script {
                round: 1,
                player: 2,
                source: SimError::IllegalMove(IllegalMove::NotAdjacent { .. }),
            }
        ));
    }

    #[test]
    fn test_on_round_called_each_round() {
        let scenario = Scenario::default();
        let mut game = scenario.build().unwrap();
        let mut seen = Vec::new();
        play_rounds(&mut game, &[], 3, |game| seen.push(game.round())).unwrap();
        assert_eq!(seen, vec![1, 2, 3]);
    }
}
