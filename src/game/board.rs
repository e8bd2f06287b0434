//! Board graph: the node arena and the edges between adjacent nodes.
//!
//! The topology is fixed once the board is built. Edges are discovered by
//! probing only the three forward directions (12, 2 and 4 o'clock) from every
//! node, so each edge is created exactly once and then registered on both of
//! its endpoints under opposite directions.

use std::collections::HashMap;

use tracing::debug;

use crate::error::BoardError;
use crate::game::{Coord, Direction, EdgeId, Node, NodeId, NodeTuning};

/// A connection between two adjacent nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    /// Node the edge was discovered from.
    pub left: NodeId,
    /// Node found in `left_to_right` from `left`.
    pub right: NodeId,
    /// Direction leading from `left` to `right`.
    pub left_to_right: Direction,
}

impl Edge {
    /// Create a new edge.
    #[must_use]
    pub const fn new(left: NodeId, right: NodeId, left_to_right: Direction) -> Self {
        Self {
            left,
            right,
            left_to_right,
        }
    }

    /// The endpoint reached by travelling along the edge in `direction`.
    #[must_use]
    pub fn follow(&self, direction: Direction) -> NodeId {
        if direction == self.left_to_right {
            self.right
        } else {
            self.left
        }
    }
}

/// The board: every node plus the edges joining them.
#[derive(Debug, Clone)]
pub struct Board {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    index: HashMap<Coord, NodeId>,
}

impl Board {
    /// Place nodes at the given coordinates and connect all adjacent pairs.
    ///
    /// Node ids follow placement order.
    ///
    /// # Errors
    ///
    /// Returns an error if there are no placements, a coordinate repeats, or a
    /// node's tuning is invalid.
    pub fn new<I>(placements: I) -> Result<Self, BoardError>
    where
        I: IntoIterator<Item = (Coord, NodeTuning)>,
    {
        let mut board = Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            index: HashMap::new(),
        };

        for (coord, tuning) in placements {
            tuning
                .validate()
                .map_err(|reason| BoardError::InvalidTuning { coord, reason })?;
            if board.index.contains_key(&coord) {
                return Err(BoardError::DuplicateCoordinate(coord));
            }
            board.index.insert(coord, board.nodes.len());
            board.nodes.push(Node::new(coord, tuning));
        }

        if board.nodes.is_empty() {
            return Err(BoardError::Empty);
        }

        for id in 0..board.nodes.len() {
            board.compute_neighbors(id);
        }

        debug!(
            nodes = board.nodes.len(),
            edges = board.edges.len(),
            "board connected"
        );

        Ok(board)
    }

    /// Build a `width` x `height` rectangle of identically tuned nodes, in
    /// row-major order.
    ///
    /// # Errors
    ///
    /// Returns an error if either dimension is zero or the tuning is invalid.
    pub fn rectangle(width: u16, height: u16, tuning: NodeTuning) -> Result<Self, BoardError> {
        Self::new((0..i32::from(height)).flat_map(move |y| {
            (0..i32::from(width)).map(move |x| (Coord::new(x, y), tuning))
        }))
    }

    /// Connect `id` to the nodes found in the forward directions.
    ///
    /// Directions that already hold an edge, or lead off the board, are
    /// skipped, so calling this again on a connected board adds nothing.
    /// Returns how many edges were created.
    pub fn compute_neighbors(&mut self, id: NodeId) -> usize {
        let Some(node) = self.nodes.get(id) else {
            return 0;
        };
        let origin = node.coord();
        let mut created = 0;

        for direction in Direction::FORWARD {
            if self.nodes[id].edge(direction).is_some() {
                continue;
            }
            let Some(&other) = origin
                .step(direction)
                .and_then(|coord| self.index.get(&coord))
            else {
                continue;
            };

            let edge_id: EdgeId = self.edges.len();
            self.edges.push(Edge::new(id, other, direction));
            self.nodes[id].edges[direction.index()] = Some(edge_id);
            self.nodes[other].edges[direction.opposite().index()] = Some(edge_id);

            if !self.nodes[id].neighbors.contains(&other) {
                self.nodes[id].neighbors.push(other);
            }
            if !self.nodes[other].neighbors.contains(&id) {
                self.nodes[other].neighbors.push(id);
            }
            created += 1;
        }

        created
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the board has no nodes. Always `false` for a built board.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes, indexed by id.
    #[must_use]
    #[inline]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// All nodes, mutably.
    #[inline]
    pub(crate) fn nodes_mut(&mut self) -> &mut [Node] {
        &mut self.nodes
    }

    /// All edges, indexed by id.
    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Look up the node id at a coordinate.
    #[must_use]
    pub fn node_at(&self, coord: Coord) -> Option<NodeId> {
        self.index.get(&coord).copied()
    }

    /// Get a node by id.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Get a node by id, mutably.
    pub(crate) fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    /// The edge leaving `id` in `direction`.
    #[must_use]
    pub fn edge(&self, id: NodeId, direction: Direction) -> Option<&Edge> {
        let edge_id = self.nodes.get(id)?.edge(direction)?;
        self.edges.get(edge_id)
    }

    /// The node adjacent to `id` in `direction`.
    #[must_use]
    pub fn neighbor(&self, id: NodeId, direction: Direction) -> Option<NodeId> {
        self.edge(id, direction).map(|edge| edge.follow(direction))
    }

    /// Whether two nodes are adjacent.
    #[must_use]
    pub fn are_adjacent(&self, a: NodeId, b: NodeId) -> bool {
        self.nodes.get(a).is_some_and(|node| node.is_neighbor(b))
    }

    /// Verify that every edge is registered on both endpoints under opposite
    /// directions and that the neighbor relation is symmetric.
    ///
    /// # Errors
    ///
    /// Returns the first inconsistency found.
    pub fn check_topology(&self) -> Result<(), BoardError> {
        for (id, node) in self.nodes.iter().enumerate() {
            for direction in Direction::ALL {
                let Some(edge_id) = node.edge(direction) else {
                    continue;
                };
                let inconsistency = BoardError::TopologyInconsistency {
                    coord: node.coord(),
                    direction,
                };
                let Some(edge) = self.edges.get(edge_id) else {
                    return Err(inconsistency);
                };
                let oriented = (edge.left == id && edge.left_to_right == direction)
                    || (edge.right == id && edge.left_to_right == direction.opposite());
                if !oriented {
                    return Err(inconsistency);
                }
                let other = edge.follow(direction);
                let mirrored = self
                    .nodes
                    .get(other)
                    .is_some_and(|o| o.edge(direction.opposite()) == Some(edge_id));
                if !mirrored || !node.is_neighbor(other) || !self.are_adjacent(other, id) {
                    return Err(inconsistency);
                }
            }

            for &other in node.neighbors() {
                if !self.are_adjacent(other, id) {
                    let direction = Direction::ALL
                        .into_iter()
                        .find(|&d| self.neighbor(id, d) == Some(other))
                        .unwrap_or(Direction::Twelve);
                    return Err(BoardError::TopologyInconsistency {
                        coord: node.coord(),
                        direction,
                    });
                }
            }
        }
        Ok(())
    }
}
