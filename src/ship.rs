//! Ship definitions, orientation and footprints.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

/// Orientation of a ship on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    /// Extends along columns from the anchor.
    #[default]
    Horizontal,
    /// Extends along rows from the anchor.
    Vertical,
}

impl Orientation {
    /// The other orientation.
    pub fn toggled(self) -> Self {
        match self {
            Orientation::Horizontal => Orientation::Vertical,
            Orientation::Vertical => Orientation::Horizontal,
        }
    }

    /// Offset of the `i`-th segment from the anchor.
    fn step(self, i: usize) -> (usize, usize) {
        match self {
            Orientation::Horizontal => (0, i),
            Orientation::Vertical => (i, 0),
        }
    }
}

/// Cells covered by a ship of `size` anchored at (`row`, `col`).
///
/// Cells are produced from the anchor outwards and are not bounds checked.
pub fn footprint(
    row: usize,
    col: usize,
    size: usize,
    orientation: Orientation,
) -> Vec<(usize, usize)> {
    (0..size)
        .map(|i| {
            let (dr, dc) = orientation.step(i);
            (row.saturating_add(dr), col.saturating_add(dc))
        })
        .collect()
}

/// Identifier of a ship within a fleet catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "std", serde(transparent))]
pub struct ShipId(pub u32);

impl fmt::Display for ShipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Immutable catalog entry for a ship.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShipSpec {
    pub id: ShipId,
    /// Length in cells.
    pub size: usize,
    /// Display only.
    pub color: String,
    /// Also the occupancy tag used by the persisted tile alphabet.
    pub name: String,
    /// Orientation a ship starts with when it is (re)offered for placement.
    pub rotation: Orientation,
}

impl ShipSpec {
    pub fn new(id: u32, name: impl Into<String>, size: usize, color: impl Into<String>) -> Self {
        Self {
            id: ShipId(id),
            size,
            color: color.into(),
            name: name.into(),
            rotation: Orientation::default(),
        }
    }
}

/// A ship anchored on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacedShip {
    pub id: ShipId,
    pub size: usize,
    pub row: usize,
    pub col: usize,
    pub rotation: Orientation,
}

impl PlacedShip {
    /// Cells this ship occupies.
    pub fn footprint(&self) -> Vec<(usize, usize)> {
        footprint(self.row, self.col, self.size, self.rotation)
    }

    /// Returns `true` if (`row`, `col`) is one of this ship's cells.
    pub fn covers(&self, row: usize, col: usize) -> bool {
        match self.rotation {
            Orientation::Horizontal => {
                row == self.row && col >= self.col && col - self.col < self.size
            }
            Orientation::Vertical => {
                col == self.col && row >= self.row && row - self.row < self.size
            }
        }
    }
}
