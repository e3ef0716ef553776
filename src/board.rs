//! Square tile grid shared by the placement engine and the targeting engine.

use alloc::vec;
use alloc::vec::Vec;
use core::fmt;

use crate::common::{EngineError, ShotResult};
use crate::ship::{self, Orientation, ShipId};

/// State of a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum Tile {
    #[default]
    Empty,
    /// Occupied by a ship. `active` marks the selected ship and only matters for display.
    Ship { id: ShipId, active: bool },
    Hit,
    Miss,
}

impl Tile {
    /// Plain occupancy tag for `id`.
    pub fn ship(id: ShipId) -> Self {
        Tile::Ship { id, active: false }
    }

    /// Ship occupying this tile, selected or not.
    pub fn ship_id(&self) -> Option<ShipId> {
        match self {
            Tile::Ship { id, .. } => Some(*id),
            _ => None,
        }
    }

    /// Returns `true` once the tile has been shot.
    pub fn is_shot(&self) -> bool {
        matches!(self, Tile::Hit | Tile::Miss)
    }
}

/// One side's grid of `grid_size × grid_size` tiles, stored row-major.
#[derive(Clone, PartialEq, Eq)]
pub struct Board {
    grid_size: usize,
    tiles: Vec<Tile>,
}

impl Board {
    /// Create an all-`Empty` board. Fails on a zero size.
    pub fn new(grid_size: usize) -> Result<Self, EngineError> {
        let cells = grid_size
            .checked_mul(grid_size)
            .filter(|&n| n > 0)
            .ok_or(EngineError::InvalidGridSize(grid_size))?;
        Ok(Self {
            grid_size,
            tiles: vec![Tile::Empty; cells],
        })
    }

    /// Rebuild a board from rows of tiles. Fails unless the rows form a non-empty square.
    pub fn from_rows(rows: Vec<Vec<Tile>>) -> Result<Self, EngineError> {
        let grid_size = rows.len();
        if grid_size == 0 || rows.iter().any(|r| r.len() != grid_size) {
            return Err(EngineError::InvalidGridSize(grid_size));
        }
        Ok(Self {
            grid_size,
            tiles: rows.into_iter().flatten().collect(),
        })
    }

    pub fn grid_size(&self) -> usize {
        self.grid_size
    }

    pub fn in_bounds(&self, row: usize, col: usize) -> bool {
        row < self.grid_size && col < self.grid_size
    }

    pub fn tile_at(&self, row: usize, col: usize) -> Result<Tile, EngineError> {
        self.index(row, col).map(|i| self.tiles[i])
    }

    /// Overwrite a tile without any rule checks. Out-of-range coordinates are ignored.
    ///
    /// The placement and targeting engines validate before they write; callers
    /// outside those engines should prefer [`Board::shoot`].
    pub fn set_tile(&mut self, row: usize, col: usize, value: Tile) {
        if let Ok(i) = self.index(row, col) {
            self.tiles[i] = value;
        }
    }

    pub fn is_clear(&self, row: usize, col: usize) -> bool {
        matches!(self.tile_at(row, col), Ok(Tile::Empty))
    }

    /// Cells a ship of `size` would occupy anchored at (`row`, `col`).
    pub fn footprint(
        &self,
        row: usize,
        col: usize,
        size: usize,
        rotation: Orientation,
    ) -> Vec<(usize, usize)> {
        ship::footprint(row, col, size, rotation)
    }

    /// Returns `true` if every cell is on the grid and either `Empty` or
    /// already occupied by `own` (the ship being moved).
    pub fn fits(&self, cells: &[(usize, usize)], own: Option<ShipId>) -> bool {
        cells.iter().all(|&(r, c)| match self.tile_at(r, c) {
            Ok(Tile::Empty) => true,
            Ok(Tile::Ship { id, .. }) => Some(id) == own,
            _ => false,
        })
    }

    /// In-bounds orthogonal neighbours in up, down, left, right order.
    pub fn neighbors(&self, row: usize, col: usize) -> Vec<(usize, usize)> {
        let mut out = Vec::with_capacity(4);
        if row > 0 {
            out.push((row - 1, col));
        }
        if row + 1 < self.grid_size {
            out.push((row + 1, col));
        }
        if col > 0 {
            out.push((row, col - 1));
        }
        if col + 1 < self.grid_size {
            out.push((row, col + 1));
        }
        out
    }

    /// Every cell not yet `Hit` or `Miss`, row-major.
    pub fn candidates(&self) -> Vec<(usize, usize)> {
        self.cells()
            .filter(|&(r, c)| !self.tiles[r * self.grid_size + c].is_shot())
            .collect()
    }

    /// Resolve a shot: ship tiles become `Hit`, empty tiles become `Miss`.
    pub fn shoot(&mut self, row: usize, col: usize) -> Result<ShotResult, EngineError> {
        let i = self.index(row, col)?;
        let result = match self.tiles[i] {
            Tile::Hit | Tile::Miss => return Err(EngineError::AlreadyShot { row, col }),
            Tile::Ship { id, .. } => {
                self.tiles[i] = Tile::Hit;
                ShotResult::Hit(id)
            }
            Tile::Empty => {
                self.tiles[i] = Tile::Miss;
                ShotResult::Miss
            }
        };
        log::debug!("shot at ({}, {}): {:?}", row, col, result);
        Ok(result)
    }

    /// Number of ship tiles not yet hit.
    pub fn ships_remaining(&self) -> usize {
        self.tiles.iter().filter(|t| t.ship_id().is_some()).count()
    }

    /// Returns `true` once no ship tile is left standing.
    pub fn is_defeated(&self) -> bool {
        self.ships_remaining() == 0
    }

    /// Reset every tile to `Empty`.
    pub fn clear(&mut self) {
        self.tiles.fill(Tile::Empty);
    }

    /// Iterate over the rows of the grid.
    pub fn rows(&self) -> impl Iterator<Item = &[Tile]> {
        self.tiles.chunks(self.grid_size)
    }

    fn cells(&self) -> impl Iterator<Item = (usize, usize)> {
        let n = self.grid_size;
        (0..n).flat_map(move |r| (0..n).map(move |c| (r, c)))
    }

    fn index(&self, row: usize, col: usize) -> Result<usize, EngineError> {
        if self.in_bounds(row, col) {
            Ok(row * self.grid_size + col)
        } else {
            Err(EngineError::OutOfBounds { row, col })
        }
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Board {{ grid_size: {} }}", self.grid_size)?;
        for row in self.rows() {
            for tile in row {
                let c = match tile {
                    Tile::Empty => '.',
                    Tile::Ship { active: true, .. } => 'A',
                    Tile::Ship { .. } => 'S',
                    Tile::Hit => 'X',
                    Tile::Miss => 'o',
                };
                write!(f, "{}", c)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
