//! Geometry error types.

use crate::coord::CubeCoordinate;
use thiserror::Error;

/// Errors raised by board generation and geometry queries.
///
/// `Configuration` and `InvalidCoordinate` indicate programming errors and
/// should abort the operation. `OffBoard` and `Unreachable` are ordinary
/// outcomes that callers treat as "this destination is not available".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("Board configuration error: {0}")]
    Configuration(String),

    #[error("Invalid cube coordinate ({q}, {r}, {s}): components must sum to zero")]
    InvalidCoordinate { q: i32, r: i32, s: i32 },

    #[error("Coordinate {0} is off the board")]
    OffBoard(CubeCoordinate),

    #[error("No path from {from} to {to}")]
    Unreachable {
        from: CubeCoordinate,
        to: CubeCoordinate,
    },
}
