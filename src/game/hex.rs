//! Hex grid coordinates and the six clock directions.
//!
//! Boards use offset coordinates on a flat-topped hex layout: `x` is the
//! column, `y` the row, and `y` grows toward 12 o'clock. Odd columns sit half
//! a cell higher than even columns, so the diagonal neighbors of a cell depend
//! on the parity of its column.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A cell position on the board grid.
///
/// Two nodes are the same node exactly when their coordinates are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
}

impl Coord {
    /// Create a new coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The coordinate one step away in `direction`, or `None` past the edge
    /// of the `i32` grid.
    #[must_use]
    pub fn step(self, direction: Direction) -> Option<Self> {
        let (dx, dy) = direction.offset(self.x & 1 == 1);
        Some(Self::new(self.x.checked_add(dx)?, self.y.checked_add(dy)?))
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One of the six connection directions, named by clock position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Direction {
    /// 12 o'clock.
    Twelve = 0,
    /// 2 o'clock.
    Two = 1,
    /// 4 o'clock.
    Four = 2,
    /// 6 o'clock.
    Six = 3,
    /// 8 o'clock.
    Eight = 4,
    /// 10 o'clock.
    Ten = 5,
}

/// Half of the square root of three, the vertical spacing between rows.
const HALF_ROOT_3: f64 = 0.866_025_403_784_438_6;

impl Direction {
    /// All directions in clock order.
    pub const ALL: [Direction; 6] = [
        Direction::Twelve,
        Direction::Two,
        Direction::Four,
        Direction::Six,
        Direction::Eight,
        Direction::Ten,
    ];

    /// The directions probed when building edges. Each edge is discovered
    /// from exactly one of its endpoints this way.
    pub const FORWARD: [Direction; 3] = [Direction::Twelve, Direction::Two, Direction::Four];

    /// Slot of this direction in a six-element table.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Position on the clock face (0 for 12 o'clock).
    #[must_use]
    pub const fn clock(self) -> u8 {
        (self as u8) * 2
    }

    /// The direction pointing the other way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Direction::Twelve => Direction::Six,
            Direction::Two => Direction::Eight,
            Direction::Four => Direction::Ten,
            Direction::Six => Direction::Twelve,
            Direction::Eight => Direction::Two,
            Direction::Ten => Direction::Four,
        }
    }

    /// Grid offset for this direction from a cell in an odd or even column.
    #[must_use]
    pub const fn offset(self, odd_column: bool) -> (i32, i32) {
        match (self, odd_column) {
            (Direction::Twelve, _) => (0, 1),
            (Direction::Six, _) => (0, -1),
            (Direction::Two, false) | (Direction::Four, true) => (1, 0),
            (Direction::Two, true) => (1, 1),
            (Direction::Four, false) => (1, -1),
            (Direction::Eight, false) => (-1, -1),
            (Direction::Eight, true) | (Direction::Ten, false) => (-1, 0),
            (Direction::Ten, true) => (-1, 1),
        }
    }

    /// World-space vector from a cell to its neighbor in this direction.
    #[must_use]
    pub const fn vector(self) -> (f64, f64) {
        match self {
            Direction::Twelve => (0.0, HALF_ROOT_3),
            Direction::Two => (0.75, HALF_ROOT_3 / 2.0),
            Direction::Four => (0.75, -HALF_ROOT_3 / 2.0),
            Direction::Six => (0.0, -HALF_ROOT_3),
            Direction::Eight => (-0.75, -HALF_ROOT_3 / 2.0),
            Direction::Ten => (-0.75, HALF_ROOT_3 / 2.0),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} o'clock", if self.clock() == 0 { 12 } else { self.clock() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposite_is_involution() {
        for direction in Direction::ALL {
            assert_eq!(direction.opposite().opposite(), direction);
            assert_ne!(direction.opposite(), direction);
        }
    }

    #[test]
    fn test_step_back_returns_home() {
        for x in -3..3 {
            for y in -3..3 {
                let origin = Coord::new(x, y);
                for direction in Direction::ALL {
                    let back = origin
                        .step(direction)
                        .and_then(|c| c.step(direction.opposite()));
                    assert_eq!(back, Some(origin));
                }
            }
        }
    }

    #[test]
    fn test_even_column_neighbors() {
        let around = Direction::ALL.map(|d| Coord::new(2, 2).step(d).unwrap());
        assert_eq!(
            around,
            [
                Coord::new(2, 3),
                Coord::new(3, 2),
                Coord::new(3, 1),
                Coord::new(2, 1),
                Coord::new(1, 1),
                Coord::new(1, 2),
            ]
        );
    }

    #[test]
    fn test_odd_column_neighbors() {
        let around = Direction::ALL.map(|d| Coord::new(3, 2).step(d).unwrap());
        assert_eq!(
            around,
            [
                Coord::new(3, 3),
                Coord::new(4, 3),
                Coord::new(4, 2),
                Coord::new(3, 1),
                Coord::new(2, 2),
                Coord::new(2, 3),
            ]
        );
    }

    #[test]
    fn test_step_past_grid_limits() {
        let top = Coord::new(0, i32::MAX);
        assert_eq!(top.step(Direction::Twelve), None);
        assert_eq!(top.step(Direction::Six), Some(Coord::new(0, i32::MAX - 1)));

        // i32::MAX is an odd column; i32::MIN an even one.
        let right = Coord::new(i32::MAX, 0);
        assert_eq!(right.step(Direction::Two), None);
        assert_eq!(right.step(Direction::Ten), Some(Coord::new(i32::MAX - 1, 1)));
        let left = Coord::new(i32::MIN, 0);
        assert_eq!(left.step(Direction::Eight), None);
        assert_eq!(left.step(Direction::Four), Some(Coord::new(i32::MIN + 1, -1)));
    }

    #[test]
    fn test_vectors_have_equal_length() {
        for direction in Direction::ALL {
            let (dx, dy) = direction.vector();
            let length = (dx * dx + dy * dy).sqrt();
            assert!((length - HALF_ROOT_3).abs() < 1e-9, "{direction}: {length}");
        }
    }

    #[test]
    fn test_vector_matches_offset_geometry() {
        // World position of a cell: odd columns are shifted half a row up.
        let world = |c: Coord| {
            let lift = if c.x & 1 == 1 { HALF_ROOT_3 / 2.0 } else { 0.0 };
            (f64::from(c.x) * 0.75, f64::from(c.y) * HALF_ROOT_3 + lift)
        };
        for origin in [Coord::new(4, 4), Coord::new(5, 4)] {
            let (ox, oy) = world(origin);
            for direction in Direction::ALL {
                let (nx, ny) = world(origin.step(direction).unwrap());
                let (vx, vy) = direction.vector();
                assert!((nx - ox - vx).abs() < 1e-9);
                assert!((ny - oy - vy).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_direction_display() {
        assert_eq!(Direction::Twelve.to_string(), "12 o'clock");
        assert_eq!(Direction::Four.to_string(), "4 o'clock");
    }
}
