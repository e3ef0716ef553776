//! Common types for the engine: errors and shot results.

use thiserror::Error;

use crate::ship::ShipId;

/// Result of a single shot resolved against a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum ShotResult {
    /// The shot landed on the ship with the given id.
    Hit(ShipId),
    /// The shot landed on open water.
    Miss,
}

impl ShotResult {
    /// Returns `true` for any hit.
    pub fn is_hit(&self) -> bool {
        matches!(self, ShotResult::Hit(_))
    }
}

/// Outcome of a shot once fleet knowledge is taken into account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum ShotOutcome {
    /// Nothing was hit.
    Miss,
    /// The given ship was hit but still floats.
    Hit(ShipId),
    /// The given ship was hit and every one of its cells is now `Hit`.
    Sunk(ShipId),
}

impl ShotOutcome {
    /// Id of the ship that was struck, if any.
    pub fn ship(&self) -> Option<ShipId> {
        match self {
            ShotOutcome::Miss => None,
            ShotOutcome::Hit(id) | ShotOutcome::Sunk(id) => Some(*id),
        }
    }

    /// Returns `true` if a ship was struck.
    pub fn is_hit(&self) -> bool {
        !matches!(self, ShotOutcome::Miss)
    }
}

/// Errors returned by board, fleet, placement, targeting and match operations.
///
/// Every variant is recoverable: an operation that fails leaves the state it was
/// called on untouched.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum EngineError {
    /// Coordinate lies outside the grid.
    #[error("coordinate ({row}, {col}) is outside the grid")]
    OutOfBounds { row: usize, col: usize },
    /// Footprint leaves the grid, overlaps a foreign ship, or the selection is busy.
    #[error("ship cannot be placed there")]
    InvalidPlacement,
    /// Removal requested but no matching ship is placed or active.
    #[error("no ship to remove")]
    NothingToRemove,
    /// Operation acts on the active ship but none is selected.
    #[error("no ship is currently selected")]
    NoActiveShip,
    /// Every cell of the target board has already been shot.
    #[error("no cells left to shoot")]
    NoValidCells,
    /// Referenced ship id is absent from the expected collection.
    #[error("ship {0} not found")]
    NotFound(ShipId),
    /// Cell was already shot.
    #[error("cell ({row}, {col}) was already shot")]
    AlreadyShot { row: usize, col: usize },
    /// Grid size is zero or too small for the catalog.
    #[error("grid size {0} is not usable")]
    InvalidGridSize(usize),
    /// Catalog lists the same ship id or name twice.
    #[error("ship {0} repeats an id or name already in the catalog")]
    DuplicateShip(ShipId),
    /// Catalog entry has no cells, or a name that clashes with a tile tag.
    #[error("ship {0} has a zero size or a reserved name")]
    InvalidShip(ShipId),
    /// Combat cannot start while ships are still waiting to be placed.
    #[error("every ship must be placed before combat starts")]
    FleetIncomplete,
    /// Operation is not allowed in the current match phase.
    #[error("operation not allowed in the current phase")]
    WrongPhase,
}
