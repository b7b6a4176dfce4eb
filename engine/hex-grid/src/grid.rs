//! Board generation and geometry queries.
//!
//! The board is a regular hexagon of radius [`BOARD_RADIUS`] around the home
//! cell, split into six sectors (one per direction). Topology is fixed once
//! generated; only per-cell contents (tokens, markers) change during play and
//! those live in the game position, not here.
//!
//! # Path synthesis
//!
//! [`HexGrid::shortest_path`] is a greedy walk that always steps to the
//! neighbor strictly closest to the target. It is length-optimal here only
//! because the board is a convex hex region with uniform step cost and no
//! obstacles: every on-board cell at distance `d > 0` from the target has an
//! on-board neighbor at distance `d - 1`. If blocked cells or irregular board
//! shapes are ever introduced this must become a real BFS
//! (see [`HexGrid::all_shortest_paths`]).

use crate::coord::CubeCoordinate;
use crate::direction::{Direction, Path};
use crate::error::GridError;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;
use tracing::debug;

/// Maximum distance of any cell from home on the standard board.
pub const BOARD_RADIUS: u32 = 7;

/// Name of the designated origin cell.
pub const HOME_CELL: &str = "HOME";

/// Token slots on the home cell; every other cell has one.
const HOME_TOKEN_SLOTS: u8 = 2;

/// One of the six wedges radiating from home. Sectors are also deck zones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Sector {
    A,
    B,
    C,
    D,
    E,
    F,
}

impl Sector {
    pub const ALL: [Sector; 6] = [
        Sector::A,
        Sector::B,
        Sector::C,
        Sector::D,
        Sector::E,
        Sector::F,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Sector> {
        Self::ALL.get(index).copied()
    }

    /// Direction of the sector's corner ray.
    #[inline]
    pub const fn direction(self) -> Direction {
        Direction::from_index(self.index())
    }

    pub const fn letter(self) -> char {
        match self {
            Sector::A => 'A',
            Sector::B => 'B',
            Sector::C => 'C',
            Sector::D => 'D',
            Sector::E => 'E',
            Sector::F => 'F',
        }
    }
}

impl fmt::Display for Sector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// A board cell. Created once during generation and never destroyed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HexCell {
    name: String,
    coord: CubeCoordinate,
    sector: Option<Sector>,
    ring: u32,
    token_slots: u8,
}

impl HexCell {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn coord(&self) -> CubeCoordinate {
        self.coord
    }

    /// `None` for the home cell.
    pub fn sector(&self) -> Option<Sector> {
        self.sector
    }

    /// Distance from home.
    pub fn ring(&self) -> u32 {
        self.ring
    }

    /// Number of token slots (2 on home, 1 elsewhere).
    pub fn token_slots(&self) -> u8 {
        self.token_slots
    }

    pub fn is_home(&self) -> bool {
        self.sector.is_none()
    }
}

/// The generated board plus reverse indices.
#[derive(Debug, Clone)]
pub struct HexGrid {
    radius: u32,
    cells: Vec<HexCell>,
    by_coord: HashMap<CubeCoordinate, usize>,
    by_name: HashMap<String, usize>,
}

impl HexGrid {
    /// Generate the standard board (radius 7, 169 cells).
    pub fn generate() -> Result<Self, GridError> {
        Self::with_radius(BOARD_RADIUS)
    }

    /// Number of cells a board of `radius` must contain.
    pub const fn expected_cell_count(radius: u32) -> usize {
        1 + 3 * radius as usize * (radius as usize + 1)
    }

    /// Generate a board of the given radius.
    ///
    /// Cell `k·D[c] + j·D[c+2]` for ring `k` and offset `j < k` belongs to
    /// sector `c` and is named `"{letter}{k}-{j}"`.
    pub fn with_radius(radius: u32) -> Result<Self, GridError> {
        let expected = Self::expected_cell_count(radius);
        let mut cells = Vec::with_capacity(expected);

        cells.push(HexCell {
            name: HOME_CELL.to_string(),
            coord: CubeCoordinate::ORIGIN,
            sector: None,
            ring: 0,
            token_slots: HOME_TOKEN_SLOTS,
        });

        for sector in Sector::ALL {
            let corner = sector.direction();
            let edge = corner.rotate_cw(2);
            for ring in 1..=radius {
                for offset in 0..ring {
                    let coord = CubeCoordinate::ORIGIN
                        .scaled_step(corner, ring as i32)
                        .scaled_step(edge, offset as i32);
                    cells.push(HexCell {
                        name: format!("{}{}-{}", sector.letter(), ring, offset),
                        coord,
                        sector: Some(sector),
                        ring,
                        token_slots: 1,
                    });
                }
            }
        }

        let mut by_coord = HashMap::with_capacity(cells.len());
        let mut by_name = HashMap::with_capacity(cells.len());
        for (index, cell) in cells.iter().enumerate() {
            if cell.coord.length() != cell.ring || cell.ring > radius {
                return Err(GridError::Configuration(format!(
                    "cell {} at {} is not on ring {}",
                    cell.name, cell.coord, cell.ring
                )));
            }
            if by_coord.insert(cell.coord, index).is_some() {
                return Err(GridError::Configuration(format!(
                    "duplicate coordinate {} for cell {}",
                    cell.coord, cell.name
                )));
            }
            if by_name.insert(cell.name.clone(), index).is_some() {
                return Err(GridError::Configuration(format!(
                    "duplicate cell name {}",
                    cell.name
                )));
            }
        }

        if cells.len() != expected {
            return Err(GridError::Configuration(format!(
                "generated {} cells, expected {}",
                cells.len(),
                expected
            )));
        }

        debug!(radius, cells = cells.len(), "Generated hex grid");

        Ok(Self {
            radius,
            cells,
            by_coord,
            by_name,
        })
    }

    #[inline]
    pub fn radius(&self) -> u32 {
        self.radius
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    pub fn cells(&self) -> &[HexCell] {
        &self.cells
    }

    /// Cell by index. Indices come from this grid, so out of range is a bug.
    #[inline]
    pub fn cell(&self, index: usize) -> &HexCell {
        &self.cells[index]
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&HexCell> {
        self.cells.get(index)
    }

    #[inline]
    pub fn home_index(&self) -> usize {
        0
    }

    #[inline]
    pub fn home(&self) -> &HexCell {
        &self.cells[self.home_index()]
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    pub fn index_at(&self, coord: CubeCoordinate) -> Option<usize> {
        self.by_coord.get(&coord).copied()
    }

    pub fn cell_at(&self, coord: CubeCoordinate) -> Option<&HexCell> {
        self.index_at(coord).map(|i| &self.cells[i])
    }

    #[inline]
    pub fn contains(&self, coord: CubeCoordinate) -> bool {
        self.by_coord.contains_key(&coord)
    }

    pub fn sector_of(&self, index: usize) -> Option<Sector> {
        self.cells.get(index).and_then(HexCell::sector)
    }

    /// Indices of every cell in `sector`, nearest ring first.
    pub fn cells_in_sector(&self, sector: Sector) -> impl Iterator<Item = usize> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(move |(_, c)| c.sector == Some(sector))
            .map(|(i, _)| i)
    }

    /// Hex distance. The one metric used for movement, heuristics and masks.
    #[inline]
    pub fn distance(&self, a: CubeCoordinate, b: CubeCoordinate) -> u32 {
        a.distance(b)
    }

    /// `coord + dir` if that cell is on the board.
    #[inline]
    pub fn neighbor(&self, coord: CubeCoordinate, dir: Direction) -> Option<CubeCoordinate> {
        let next = coord + dir;
        self.contains(next).then_some(next)
    }

    /// On-board neighbors in direction enumeration order.
    pub fn neighbors(
        &self,
        coord: CubeCoordinate,
    ) -> impl Iterator<Item = (Direction, CubeCoordinate)> + '_ {
        Direction::ALL
            .into_iter()
            .filter_map(move |dir| self.neighbor(coord, dir).map(|c| (dir, c)))
    }

    /// Apply `path` to `from` and resolve the destination to a board cell.
    pub fn resolve_path(
        &self,
        from: CubeCoordinate,
        path: &Path,
    ) -> Result<CubeCoordinate, GridError> {
        if !self.contains(from) {
            return Err(GridError::OffBoard(from));
        }
        let destination = path.apply(from);
        if !self.contains(destination) {
            return Err(GridError::OffBoard(destination));
        }
        Ok(destination)
    }

    /// Greedy walk of at most `max_len` steps from `from` towards `to`.
    ///
    /// Each step takes the first direction (in enumeration order) whose
    /// on-board neighbor strictly minimizes the remaining distance. The walk
    /// stops after `min(distance(from, to), max_len)` steps, so a short
    /// `max_len` yields the closest reachable prefix.
    pub fn shortest_path(
        &self,
        from: CubeCoordinate,
        to: CubeCoordinate,
        max_len: u32,
    ) -> Result<Path, GridError> {
        if !self.contains(from) || !self.contains(to) {
            return Err(GridError::Unreachable { from, to });
        }

        let steps = from.distance(to).min(max_len);
        let mut path = Path::empty();
        let mut at = from;

        for _ in 0..steps {
            let remaining = at.distance(to);
            let mut best: Option<(Direction, CubeCoordinate, u32)> = None;
            for (dir, next) in self.neighbors(at) {
                let d = next.distance(to);
                if d < remaining && best.map_or(true, |(_, _, bd)| d < bd) {
                    best = Some((dir, next, d));
                }
            }
            match best {
                Some((dir, next, _)) => {
                    path.push(dir);
                    at = next;
                }
                None => return Err(GridError::Unreachable { from, to }),
            }
        }

        Ok(path)
    }

    /// First-found (shortest) path to every distinct destination within
    /// `max_len` steps, in BFS discovery order. `from` itself is excluded.
    pub fn all_shortest_paths(
        &self,
        from: CubeCoordinate,
        max_len: u32,
    ) -> Vec<(CubeCoordinate, Path)> {
        let mut found = Vec::new();
        if !self.contains(from) {
            return found;
        }

        let mut seen = HashSet::new();
        seen.insert(from);
        let mut frontier = VecDeque::new();
        frontier.push_back((from, Path::empty()));

        while let Some((at, path)) = frontier.pop_front() {
            if path.len() as u32 >= max_len {
                continue;
            }
            for (dir, next) in self.neighbors(at) {
                if !seen.insert(next) {
                    continue;
                }
                let mut extended = path.clone();
                extended.push(dir);
                found.push((next, extended.clone()));
                frontier.push_back((next, extended));
            }
        }

        found
    }
}
