//! The six hex directions and paths built from them.

use crate::coord::CubeCoordinate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unit step in cube space (flat-top hexes, clockwise from North).
///
/// The declaration order is the tie-break order for path synthesis and
/// BFS expansion, so it must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    North,
    NorthEast,
    SouthEast,
    South,
    SouthWest,
    NorthWest,
}

impl Direction {
    /// All directions in enumeration order.
    pub const ALL: [Direction; 6] = [
        Direction::North,
        Direction::NorthEast,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::NorthWest,
    ];

    /// `(dq, dr, ds)` for this direction.
    #[inline]
    pub const fn vector(self) -> (i32, i32, i32) {
        match self {
            Direction::North => (0, -1, 1),
            Direction::NorthEast => (1, -1, 0),
            Direction::SouthEast => (1, 0, -1),
            Direction::South => (0, 1, -1),
            Direction::SouthWest => (-1, 1, 0),
            Direction::NorthWest => (-1, 0, 1),
        }
    }

    /// Position of this direction in [`Direction::ALL`].
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Direction at `index % 6`.
    #[inline]
    pub const fn from_index(index: usize) -> Direction {
        Self::ALL[index % 6]
    }

    #[inline]
    pub const fn opposite(self) -> Direction {
        Self::from_index(self.index() + 3)
    }

    /// Turn clockwise by `steps` sixths of a revolution.
    #[inline]
    pub const fn rotate_cw(self, steps: usize) -> Direction {
        Self::from_index(self.index() + steps)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Direction::North => "N",
            Direction::NorthEast => "NE",
            Direction::SouthEast => "SE",
            Direction::South => "S",
            Direction::SouthWest => "SW",
            Direction::NorthWest => "NW",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Direction::ALL
            .into_iter()
            .find(|d| d.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown direction '{s}'"))
    }
}

/// An ordered sequence of unit steps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Path(Vec<Direction>);

impl Path {
    pub fn new(steps: Vec<Direction>) -> Self {
        Self(steps)
    }

    pub fn empty() -> Self {
        Self(Vec::new())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn push(&mut self, dir: Direction) {
        self.0.push(dir);
    }

    pub fn iter(&self) -> impl Iterator<Item = Direction> + '_ {
        self.0.iter().copied()
    }

    pub fn steps(&self) -> &[Direction] {
        &self.0
    }

    /// Destination reached by adding every step to `from`. No board check.
    pub fn apply(&self, from: CubeCoordinate) -> CubeCoordinate {
        self.0.iter().fold(from, |at, &dir| at + dir)
    }
}

impl From<Vec<Direction>> for Path {
    fn from(steps: Vec<Direction>) -> Self {
        Self(steps)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, dir) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{dir}")?;
        }
        Ok(())
    }
}

impl FromStr for Path {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Ok(Path::empty());
        }
        s.split(',')
            .map(str::parse)
            .collect::<Result<Vec<_>, _>>()
            .map(Path)
    }
}
