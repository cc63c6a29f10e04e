//! Board coordinate representation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the four orthogonal directions.
///
/// North points towards row 0, West towards column 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    /// All directions in clockwise order starting from North.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Returns the `(dx, dy)` step for this direction.
    #[inline]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::East => (1, 0),
            Direction::South => (0, 1),
            Direction::West => (-1, 0),
        }
    }

    /// Returns the opposite direction.
    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::North => "north",
            Direction::East => "east",
            Direction::South => "south",
            Direction::West => "west",
        };
        write!(f, "{}", name)
    }
}

/// A cell coordinate: `x` is the column, `y` the row.
///
/// Coordinates are plain values and may lie outside the board; exit points
/// in particular sit one step beyond the edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    /// Creates a coordinate.
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Coord { x, y }
    }

    /// Returns this coordinate moved by `(dx, dy)`.
    #[inline]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Coord::new(self.x + dx, self.y + dy)
    }

    /// Returns the neighbouring coordinate in `direction`.
    #[inline]
    pub const fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.offset(dx, dy)
    }

    /// Manhattan distance to `other`.
    #[inline]
    pub const fn manhattan(self, other: Coord) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Returns true if `other` shares a row or column with this coordinate.
    #[inline]
    pub const fn is_aligned_with(self, other: Coord) -> bool {
        self.x == other.x || self.y == other.y
    }

    /// Returns the direction from this coordinate towards `other`.
    ///
    /// `None` if the two are equal or not on a common row or column.
    pub fn direction_to(self, other: Coord) -> Option<Direction> {
        match (other.x - self.x, other.y - self.y) {
            (0, dy) if dy < 0 => Some(Direction::North),
            (0, dy) if dy > 0 => Some(Direction::South),
            (dx, 0) if dx > 0 => Some(Direction::East),
            (dx, 0) if dx < 0 => Some(Direction::West),
            _ => None,
        }
    }

    /// The four orthogonal neighbours, in [`Direction::ALL`] order.
    pub fn neighbors(self) -> [Coord; 4] {
        Direction::ALL.map(|d| self.step(d))
    }

    /// Coordinates strictly between this one and `other` along a shared axis.
    ///
    /// Empty if the two are adjacent, equal, or not aligned.
    pub fn cells_between(self, other: Coord) -> Vec<Coord> {
        let Some(direction) = self.direction_to(other) else {
            return Vec::new();
        };
        let mut cells = Vec::new();
        let mut current = self.step(direction);
        while current != other {
            cells.push(current);
            current = current.step(direction);
        }
        cells
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
