//! Cube coordinates.

use crate::direction::Direction;
use crate::error::GridError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Add;

/// A hex cell position in cube space. Invariant: `q + r + s == 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawCube")]
pub struct CubeCoordinate {
    q: i32,
    r: i32,
    s: i32,
}

/// Unchecked wire form; deserialization goes through [`CubeCoordinate::try_new`].
#[derive(Deserialize)]
struct RawCube {
    q: i32,
    r: i32,
    s: i32,
}

impl TryFrom<RawCube> for CubeCoordinate {
    type Error = GridError;

    fn try_from(raw: RawCube) -> Result<Self, Self::Error> {
        CubeCoordinate::try_new(raw.q, raw.r, raw.s)
    }
}

impl CubeCoordinate {
    pub const ORIGIN: CubeCoordinate = CubeCoordinate { q: 0, r: 0, s: 0 };

    /// Create a coordinate.
    ///
    /// # Panics
    ///
    /// Panics if the components do not sum to zero. Use [`try_new`](Self::try_new)
    /// for untrusted input.
    pub fn new(q: i32, r: i32, s: i32) -> Self {
        match Self::try_new(q, r, s) {
            Ok(coord) => coord,
            Err(e) => panic!("{e}"),
        }
    }

    /// Create a coordinate, rejecting components that do not sum to zero.
    pub fn try_new(q: i32, r: i32, s: i32) -> Result<Self, GridError> {
        if q + r + s != 0 {
            return Err(GridError::InvalidCoordinate { q, r, s });
        }
        Ok(Self { q, r, s })
    }

    /// Build from axial components; `s` is derived.
    #[inline]
    pub fn from_axial(q: i32, r: i32) -> Self {
        Self { q, r, s: -q - r }
    }

    #[inline]
    pub fn q(self) -> i32 {
        self.q
    }

    #[inline]
    pub fn r(self) -> i32 {
        self.r
    }

    #[inline]
    pub fn s(self) -> i32 {
        self.s
    }

    /// Hex distance: `max(|dq|, |dr|, |ds|)`.
    #[inline]
    pub fn distance(self, other: CubeCoordinate) -> u32 {
        let dq = (self.q - other.q).unsigned_abs();
        let dr = (self.r - other.r).unsigned_abs();
        let ds = (self.s - other.s).unsigned_abs();
        dq.max(dr).max(ds)
    }

    /// Distance from the origin.
    #[inline]
    pub fn length(self) -> u32 {
        self.distance(Self::ORIGIN)
    }

    /// One step in `dir`. Never leaves cube space, but may leave the board.
    #[inline]
    pub fn step(self, dir: Direction) -> Self {
        self + dir
    }

    /// `k` steps in `dir`.
    #[inline]
    pub fn scaled_step(self, dir: Direction, k: i32) -> Self {
        let (dq, dr, ds) = dir.vector();
        Self {
            q: self.q + dq * k,
            r: self.r + dr * k,
            s: self.s + ds * k,
        }
    }
}

impl Add<Direction> for CubeCoordinate {
    type Output = CubeCoordinate;

    fn add(self, dir: Direction) -> CubeCoordinate {
        self.scaled_step(dir, 1)
    }
}

impl fmt::Display for CubeCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.q, self.r, self.s)
    }
}
