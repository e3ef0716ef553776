use alloc::vec::Vec;

use crate::ai::Difficulty;
use crate::common::EngineError;
use crate::ship::ShipSpec;

/// Display data for one entry of the standard fleet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShipDef {
    name: &'static str,
    size: usize,
    color: &'static str,
}

impl ShipDef {
    pub const fn new(name: &'static str, size: usize, color: &'static str) -> Self {
        Self { name, size, color }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn color(&self) -> &'static str {
        self.color
    }
}

pub const DEFAULT_GRID_SIZE: usize = 10;
pub const NUM_SHIPS: usize = 5;
pub const STANDARD_FLEET: [ShipDef; NUM_SHIPS] = [
    ShipDef::new("Carrier", 5, "#E4572E"),
    ShipDef::new("Battleship", 4, "#F3A712"),
    ShipDef::new("Cruiser", 3, "#29335C"),
    ShipDef::new("Submarine", 3, "#669BBC"),
    ShipDef::new("Destroyer", 2, "#A8C686"),
];

/// Total number of ship segments in the standard fleet.
pub const TOTAL_SHIP_CELLS: usize = 5 + 4 + 3 + 3 + 2;

/// Build the standard catalog, ids numbered from 1 in fleet order.
pub fn standard_catalog() -> Vec<ShipSpec> {
    STANDARD_FLEET
        .iter()
        .zip(1u32..)
        .map(|(def, id)| ShipSpec::new(id, def.name(), def.size(), def.color()))
        .collect()
}

/// Per-match settings chosen before planning starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct MatchSettings {
    #[cfg_attr(feature = "std", serde(rename = "gridSize"))]
    pub grid_size: usize,
    pub difficulty: Difficulty,
}

impl MatchSettings {
    pub fn new(grid_size: usize, difficulty: Difficulty) -> Self {
        Self {
            grid_size,
            difficulty,
        }
    }

    /// Check that every ship of `catalog` fits on the configured grid.
    pub fn validate(&self, catalog: &[ShipSpec]) -> Result<(), EngineError> {
        let longest = catalog.iter().map(|s| s.size).max().unwrap_or(0);
        if self.grid_size == 0 || longest > self.grid_size {
            return Err(EngineError::InvalidGridSize(self.grid_size));
        }
        Ok(())
    }
}

impl Default for MatchSettings {
    fn default() -> Self {
        Self::new(DEFAULT_GRID_SIZE, Difficulty::Medium)
    }
}
