//! Game session: turn sequencing, prophet movement and queries.

use tracing::{debug, trace};

use crate::error::{IllegalMove, SimError, SimResult};
use crate::game::influence::{self, InfluenceConfig};
use crate::game::{
    Board, Color, Coord, GameEvent, Node, NodeId, NodeView, Player, PlayerId, PlayerView, Prophet,
    ProphetId, Snapshot, MAX_PLAYERS, NEUTRAL,
};

/// Rates and strengths must be finite and non-negative.
fn check_rate(name: &'static str, value: f64) -> SimResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(SimError::InvalidRate(name))
    }
}

/// Complete simulation state, owned by the host application.
///
/// Player 0 is the neutral player and never takes a turn. Real players take
/// turns in id order starting from player 1; when the turn returns to player
/// 1 an influence round is resolved over the whole board.
#[derive(Debug, Clone)]
pub struct GameState {
    board: Board,
    /// Indexed by player id.
    players: Vec<Player>,
    prophets: Vec<Prophet>,
    config: InfluenceConfig,
    /// Offset of the active player among the real players.
    turn_index: usize,
    moved: bool,
    round: u32,
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create a game on `board` with only the neutral player.
    ///
    /// `config` is taken as is; hosts reading it from outside should run
    /// [`InfluenceConfig::validate`] first, as scenarios do.
    #[must_use]
    pub fn new(board: Board, config: InfluenceConfig) -> Self {
        Self {
            board,
            players: vec![Player::neutral()],
            prophets: Vec::new(),
            config,
            turn_index: 0,
            moved: false,
            round: 0,
            events: Vec::new(),
        }
    }

    /// Add a real player and return its id.
    ///
    /// # Errors
    ///
    /// Returns an error if the game already has [`MAX_PLAYERS`] real players
    /// or the multiplier is negative or not finite.
    pub fn add_player(
        &mut self,
        color: Color,
        conversion_rate_multiplier: f64,
    ) -> SimResult<PlayerId> {
        check_rate("conversion_rate_multiplier", conversion_rate_multiplier)?;
        if self.players.len() > MAX_PLAYERS {
            return Err(SimError::TooManyPlayers(MAX_PLAYERS));
        }
        let id = PlayerId::try_from(self.players.len())
            .map_err(|_| SimError::TooManyPlayers(MAX_PLAYERS))?;
        self.players
            .push(Player::new(id, color, conversion_rate_multiplier));
        Ok(id)
    }

    /// Station a new prophet for `player` at `coord`.
    ///
    /// # Errors
    ///
    /// Returns an error if the player or coordinate is unknown, or the
    /// strength is negative or not finite.
    pub fn place_prophet(
        &mut self,
        player: PlayerId,
        coord: Coord,
        conversion_strength: f64,
    ) -> SimResult<ProphetId> {
        check_rate("conversion_strength", conversion_strength)?;
        self.real_player(player)?;
        let node = self.node_id(coord)?;

        let id = self.prophets.len();
        self.prophets
            .push(Prophet::new(player, node, conversion_strength));
        if let Some(target) = self.board.node_mut(node) {
            target.prophets.push(id);
        }
        if let Some(owner) = self.players.get_mut(usize::from(player)) {
            owner.prophets.push(id);
        }
        Ok(id)
    }

    /// Set a node's leader and health directly, outside of any round.
    ///
    /// Health is clamped to the node's range.
    ///
    /// # Errors
    ///
    /// Returns an error if the player or coordinate is unknown.
    pub fn seed_node(&mut self, coord: Coord, player: PlayerId, health: f64) -> SimResult<()> {
        self.real_player(player)?;
        let id = self.node_id(coord)?;
        if let Some(node) = self.board.node_mut(id) {
            node.inject(player, health);
        }
        Ok(())
    }

    /// Player whose turn it is, or the neutral player if nobody has joined.
    #[must_use]
    pub fn active_player(&self) -> PlayerId {
        if self.real_player_count() == 0 {
            return NEUTRAL;
        }
        PlayerId::try_from(self.turn_index + 1).unwrap_or(u8::MAX)
    }

    /// Whether the active player has already moved this turn.
    #[must_use]
    pub const fn has_moved(&self) -> bool {
        self.moved
    }

    /// Number of influence rounds resolved so far.
    #[must_use]
    pub const fn round(&self) -> u32 {
        self.round
    }

    /// Move the active player's lead prophet to the adjacent node at `target`.
    ///
    /// At most one move is accepted per turn. A rejected move changes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::IllegalMove`] if it is not the player's turn, the
    /// player already moved, has no prophet, or the target is not adjacent;
    /// [`SimError::UnknownPlayer`] or [`SimError::UnknownCoordinate`] for ids
    /// and coordinates that do not exist.
    pub fn record_move(&mut self, player: PlayerId, target: Coord) -> SimResult<()> {
        let result = self.try_move(player, target);
        match &result {
            Ok(()) => trace!(player, %target, "move recorded"),
            Err(err) => debug!(player, %target, %err, "move rejected"),
        }
        result
    }

    fn try_move(&mut self, player: PlayerId, target: Coord) -> SimResult<()> {
        let lead = self.real_player(player)?.lead_prophet();
        let target = self.node_id(target)?;

        let active = self.active_player();
        if player != active {
            return Err(IllegalMove::NotYourTurn { player, active }.into());
        }
        if self.moved {
            return Err(IllegalMove::AlreadyMoved(player).into());
        }
        let prophet = lead.ok_or(IllegalMove::NoProphet(player))?;

        self.move_prophet(prophet, target)?;
        self.moved = true;
        Ok(())
    }

    /// Relocate a prophet to a node adjacent to the one it stands on.
    fn move_prophet(&mut self, prophet: ProphetId, target: NodeId) -> Result<(), IllegalMove> {
        let Some(&Prophet { owner, node: from, .. }) = self.prophets.get(prophet) else {
            return Err(IllegalMove::NoProphet(NEUTRAL));
        };
        let coord_of = |board: &Board, id: NodeId| board.node(id).map(Node::coord);
        let (Some(from_coord), Some(to_coord)) =
            (coord_of(&self.board, from), coord_of(&self.board, target))
        else {
            return Err(IllegalMove::NoProphet(owner));
        };
        if !self.board.are_adjacent(from, target) {
            return Err(IllegalMove::NotAdjacent {
                from: from_coord,
                to: to_coord,
            });
        }

        if let Some(node) = self.board.node_mut(from) {
            node.prophets.retain(|&p| p != prophet);
        }
        if let Some(node) = self.board.node_mut(target) {
            node.prophets.push(prophet);
        }
        if let Some(moved) = self.prophets.get_mut(prophet) {
            moved.node = target;
        }

        self.events.push(GameEvent::ProphetMoved {
            player: owner,
            from: from_coord,
            to: to_coord,
        });
        Ok(())
    }

    /// End the active player's turn.
    ///
    /// Returns `true` if the turn passed back to the first player and an
    /// influence round was resolved.
    pub fn end_turn(&mut self) -> bool {
        let count = self.real_player_count();
        self.moved = false;
        if count > 0 {
            self.turn_index = (self.turn_index + 1) % count;
            trace!(active = self.active_player(), "turn passed");
            if self.turn_index != 0 {
                return false;
            }
        }
        self.resolve_round();
        true
    }

    /// Resolve one influence round over the whole board.
    pub fn resolve_round(&mut self) {
        let events = influence::resolve_round(
            &mut self.board,
            &self.prophets,
            &mut self.players,
            &self.config,
        );
        self.events.extend(events);
        self.round += 1;
        self.events.push(GameEvent::RoundResolved { round: self.round });
    }

    /// Drain the events produced since the last call.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// The board.
    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// Influence settings of this game.
    #[must_use]
    pub const fn config(&self) -> &InfluenceConfig {
        &self.config
    }

    /// All players, indexed by id, the neutral player first.
    #[must_use]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// All prophets, indexed by id.
    #[must_use]
    pub fn prophets(&self) -> &[Prophet] {
        &self.prophets
    }

    /// Number of real players.
    #[must_use]
    pub fn real_player_count(&self) -> usize {
        self.players.len() - 1
    }

    /// Get a player by id, including the neutral player.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::UnknownPlayer`] if there is no such player.
    pub fn player(&self, id: PlayerId) -> SimResult<&Player> {
        self.players
            .get(usize::from(id))
            .ok_or(SimError::UnknownPlayer(id))
    }

    fn real_player(&self, id: PlayerId) -> SimResult<&Player> {
        self.player(id)
            .ok()
            .filter(|player| !player.is_neutral())
            .ok_or(SimError::UnknownPlayer(id))
    }

    fn node_id(&self, coord: Coord) -> SimResult<NodeId> {
        self.board
            .node_at(coord)
            .ok_or(SimError::UnknownCoordinate(coord))
    }

    /// The observable state of the node at `coord`.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::UnknownCoordinate`] if no node is there.
    pub fn node(&self, coord: Coord) -> SimResult<NodeView> {
        let id = self.node_id(coord)?;
        self.board
            .node(id)
            .map(NodeView::from)
            .ok_or(SimError::UnknownCoordinate(coord))
    }

    /// Score of a player.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::UnknownPlayer`] if there is no such player.
    pub fn score(&self, player: PlayerId) -> SimResult<f64> {
        self.player(player).map(|p| p.score)
    }

    /// Positions of a player's prophets, lead prophet first.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::UnknownPlayer`] if there is no such player.
    pub fn prophet_positions(&self, player: PlayerId) -> SimResult<Vec<Coord>> {
        let player = self.player(player)?;
        Ok(player
            .prophets
            .iter()
            .filter_map(|&p| self.prophets.get(p))
            .filter_map(|prophet| self.board.node(prophet.node))
            .map(Node::coord)
            .collect())
    }

    /// Mutable access to every part of the state, for corrupting it in tests.
    #[cfg(test)]
    pub(crate) fn parts_mut(&mut self) -> (&mut Board, &mut [Player], &mut [Prophet]) {
        (&mut self.board, &mut self.players, &mut self.prophets)
    }

    /// Capture the observable state.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            round: self.round,
            active_player: self.active_player(),
            nodes: self.board.nodes().iter().map(NodeView::from).collect(),
            players: self
                .players
                .iter()
                .filter(|player| !player.is_neutral())
                .map(|player| PlayerView {
                    id: player.id,
                    color: player.color,
                    score: player.score,
                    prophets: self.prophet_positions(player.id).unwrap_or_default(),
                })
                .collect(),
        }
    }
}
