//! Hex board topology for the Voyage playtester
//!
//! This crate owns the board geometry that everything else builds on:
//! - `CubeCoordinate`: `(q, r, s)` value type with `q + r + s = 0`
//! - `Direction` / `Path`: the six unit steps and ordered step sequences
//! - `HexGrid`: the generated board (home cell plus six sectors out to
//!   radius 7), with reverse lookups, adjacency, distance and path queries
//!
//! # Usage
//!
//! ```rust
//! use hex_grid::{Direction, HexGrid, Path};
//!
//! let grid = HexGrid::generate().expect("standard board is well formed");
//! assert_eq!(grid.len(), 169);
//!
//! let home = grid.home().coord();
//! let north_twice = Path::new(vec![Direction::North, Direction::North]);
//! let target = grid.resolve_path(home, &north_twice).unwrap();
//! assert_eq!(grid.cell_at(target).unwrap().name(), "A2-0");
//!
//! let path = grid.shortest_path(home, target, 2).unwrap();
//! assert_eq!(path, north_twice);
//! ```

pub mod coord;
pub mod direction;
pub mod error;
pub mod grid;

pub use coord::CubeCoordinate;
pub use direction::{Direction, Path};
pub use error::GridError;
pub use grid::{HexCell, HexGrid, Sector, BOARD_RADIUS, HOME_CELL};
