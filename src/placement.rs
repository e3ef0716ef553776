//! Planning-phase rules: selecting, placing, moving, rotating and removing ships.
//!
//! Every operation validates against the board before writing, so a rejected
//! call leaves both the board and the fleet exactly as they were.

use alloc::vec::Vec;
use rand::Rng;

use crate::board::{Board, Tile};
use crate::common::{EngineError, ShotOutcome, ShotResult};
use crate::fleet::{Fleet, Location, Selection};
use crate::ship::{Orientation, PlacedShip, ShipId};

/// Attempts per ship before random deployment gives up.
const RANDOM_PLACEMENT_ATTEMPTS: usize = 100;

/// One side's board together with the fleet laid out on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementEngine {
    board: Board,
    fleet: Fleet,
}

impl PlacementEngine {
    /// Empty board of `grid_size` with every ship of `fleet` available.
    ///
    /// Fails if the grid is empty or the longest ship would not fit on it.
    pub fn new(grid_size: usize, fleet: Fleet) -> Result<Self, EngineError> {
        let longest = fleet.catalog().iter().map(|s| s.size).max().unwrap_or(0);
        if longest > grid_size {
            return Err(EngineError::InvalidGridSize(grid_size));
        }
        let board = Board::new(grid_size)?;
        let mut engine = Self { board, fleet };
        // A fleet handed over mid-planning starts again from the pool.
        engine.clear_board();
        Ok(engine)
    }

    /// Reassemble an engine from a board and fleet that already agree with each other.
    pub(crate) fn from_parts(board: Board, fleet: Fleet) -> Self {
        Self { board, fleet }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn fleet(&self) -> &Fleet {
        &self.fleet
    }

    /// Pick an available ship up for placement. It leaves the available pool
    /// and becomes the active, unanchored selection.
    pub fn select_for_placement(&mut self, id: ShipId) -> Result<(), EngineError> {
        if let Some(current) = self.fleet.active_id() {
            log::warn!("cannot select {}: {} is still active", id, current);
            return Err(EngineError::InvalidPlacement);
        }
        self.fleet.hold(id)?;
        log::debug!("selected {} for placement", id);
        Ok(())
    }

    /// Make the placed ship covering (`row`, `col`) the active one. Picking the
    /// ship that is already active drops the selection instead.
    ///
    /// Returns the active ship afterwards. Empty water changes nothing and
    /// returns `None`.
    pub fn select_placed(&mut self, row: usize, col: usize) -> Result<Option<ShipId>, EngineError> {
        if !self.board.in_bounds(row, col) {
            return Err(EngineError::OutOfBounds { row, col });
        }
        let Some(ship) = self.fleet.ship_at(row, col) else {
            return Ok(None);
        };
        let toggled_off = self.fleet.active_id() == Some(ship.id);
        self.deselect_active();
        if toggled_off {
            log::debug!("deselected {} at ({}, {})", ship.id, row, col);
            return Ok(None);
        }
        self.paint(&ship, true);
        self.fleet.set_active(Some(ship.id));
        log::debug!("selected placed ship {} at ({}, {})", ship.id, row, col);
        Ok(Some(ship.id))
    }

    /// Drop the current selection. An unanchored ship goes back to the available
    /// pool; an anchored one stays where it is. No-op without a selection.
    pub fn deselect_active(&mut self) {
        match self.fleet.active() {
            Some(Selection::Unanchored { id, .. }) => self.fleet.release(id),
            Some(Selection::Anchored(ship)) => {
                self.paint(&ship, false);
                self.fleet.set_active(None);
            }
            None => self.fleet.set_active(None),
        }
    }

    /// Place a new ship or move an already placed one so that it is anchored at
    /// (`row`, `col`) with `rotation`. The ship's own cells count as free.
    ///
    /// On success the selection is cleared.
    pub fn place_or_move(
        &mut self,
        id: ShipId,
        row: usize,
        col: usize,
        rotation: Orientation,
    ) -> Result<(), EngineError> {
        let size = self.fleet.spec(id).ok_or(EngineError::NotFound(id))?.size;
        let current = self.fleet.placement(id);
        let cells = self.board.footprint(row, col, size, rotation);
        if !self.board.fits(&cells, current.map(|s| s.id)) {
            log::warn!(
                "rejected {} at ({}, {}) {:?}: out of bounds or overlapping",
                id,
                row,
                col,
                rotation
            );
            return Err(EngineError::InvalidPlacement);
        }

        if self.fleet.active_id().is_some_and(|active| active != id) {
            self.deselect_active();
        }
        if let Some(old) = current {
            self.erase(&old);
        }
        for &(r, c) in &cells {
            self.board.set_tile(r, c, Tile::ship(id));
        }
        self.fleet.anchor(id, row, col, rotation);
        self.fleet.set_active(None);
        if current.is_some() {
            log::debug!("moved {} to ({}, {}) {:?}", id, row, col, rotation);
        } else {
            log::debug!("placed {} at ({}, {}) {:?}", id, row, col, rotation);
        }
        Ok(())
    }

    /// Toggle the rotation of `id`, or of the active ship when `id` is `None`,
    /// keeping the anchor cell fixed.
    pub fn rotate(&mut self, id: Option<ShipId>) -> Result<Orientation, EngineError> {
        let id = id
            .or(self.fleet.active_id())
            .ok_or(EngineError::NoActiveShip)?;
        match self.fleet.location(id) {
            Some(Location::Held) => {
                let rotation = self
                    .fleet
                    .active()
                    .map(|s| s.rotation())
                    .unwrap_or_default()
                    .toggled();
                self.fleet.set_rotation(id, rotation);
                Ok(rotation)
            }
            Some(Location::Placed) => {
                let ship = self.fleet.placement(id).ok_or(EngineError::NotFound(id))?;
                let rotation = ship.rotation.toggled();
                let cells = self.board.footprint(ship.row, ship.col, ship.size, rotation);
                if !self.board.fits(&cells, Some(id)) {
                    log::warn!("rejected rotation of {} to {:?}", id, rotation);
                    return Err(EngineError::InvalidPlacement);
                }
                let active = self.fleet.active_id() == Some(id);
                self.erase(&ship);
                for &(r, c) in &cells {
                    self.board.set_tile(r, c, Tile::Ship { id, active });
                }
                self.fleet.set_rotation(id, rotation);
                log::debug!("rotated {} to {:?}", id, rotation);
                Ok(rotation)
            }
            Some(Location::Available) | None => Err(EngineError::NotFound(id)),
        }
    }

    /// Take `id`, or the active ship when `id` is `None`, off the board and
    /// return it to the available pool with its default rotation.
    pub fn remove_from_board(&mut self, id: Option<ShipId>) -> Result<ShipId, EngineError> {
        let id = id
            .or(self.fleet.active_id())
            .ok_or(EngineError::NothingToRemove)?;
        match self.fleet.location(id) {
            Some(Location::Placed) => {
                if let Some(ship) = self.fleet.placement(id) {
                    self.erase(&ship);
                }
            }
            Some(Location::Held) => {}
            Some(Location::Available) | None => return Err(EngineError::NothingToRemove),
        }
        self.fleet.unplace(id);
        log::debug!("removed {} from the board", id);
        Ok(id)
    }

    /// Empty the board and return every ship to the available pool.
    pub fn clear_board(&mut self) {
        self.board.clear();
        if let Some(Selection::Unanchored { id, .. }) = self.fleet.active() {
            self.fleet.unplace(id);
        }
        for ship in self.fleet.placed() {
            self.fleet.unplace(ship.id);
        }
        self.fleet.set_active(None);
        log::debug!("board cleared");
    }

    /// Re-offer placed ships to the available pool.
    ///
    /// A placed ship keeps its single berth, so nothing is duplicated into the
    /// pool and neither the board nor the placed ships change. Returns the size
    /// of the available pool afterwards.
    pub fn restore_available(&mut self) -> usize {
        for ship in self.fleet.placed() {
            log::debug!("{} stays placed, not duplicated into the pool", ship.id);
        }
        self.fleet.available().len()
    }

    /// Place every remaining ship at a random legal footprint.
    pub fn deploy_randomly<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), EngineError> {
        self.deselect_active();
        let pending: Vec<(ShipId, usize)> = self
            .fleet
            .available()
            .iter()
            .map(|a| (a.spec.id, a.spec.size))
            .collect();
        let n = self.board.grid_size();
        for (id, size) in pending {
            if size > n {
                return Err(EngineError::InvalidPlacement);
            }
            let mut placed = false;
            for _ in 0..RANDOM_PLACEMENT_ATTEMPTS {
                let rotation = if rng.random() {
                    Orientation::Horizontal
                } else {
                    Orientation::Vertical
                };
                let (max_r, max_c) = match rotation {
                    Orientation::Horizontal => (n - 1, n - size),
                    Orientation::Vertical => (n - size, n - 1),
                };
                let r = rng.random_range(0..=max_r);
                let c = rng.random_range(0..=max_c);
                if self.place_or_move(id, r, c, rotation).is_ok() {
                    placed = true;
                    break;
                }
            }
            if !placed {
                log::warn!("could not find room for {}", id);
                return Err(EngineError::InvalidPlacement);
            }
        }
        Ok(())
    }

    /// Resolve an incoming shot and report whether it sank a ship.
    pub fn receive_shot(&mut self, row: usize, col: usize) -> Result<ShotOutcome, EngineError> {
        Ok(match self.board.shoot(row, col)? {
            ShotResult::Miss => ShotOutcome::Miss,
            ShotResult::Hit(id) if self.is_sunk(id) => ShotOutcome::Sunk(id),
            ShotResult::Hit(id) => ShotOutcome::Hit(id),
        })
    }

    /// Returns `true` if `id` is placed and every one of its cells is `Hit`.
    pub fn is_sunk(&self, id: ShipId) -> bool {
        self.fleet.placement(id).is_some_and(|ship| {
            ship.footprint()
                .into_iter()
                .all(|(r, c)| self.board.tile_at(r, c) == Ok(Tile::Hit))
        })
    }

    /// Returns `true` once every placed ship is sunk.
    pub fn is_defeated(&self) -> bool {
        self.board.is_defeated()
    }

    /// Rewrite a ship's occupied tiles with or without the active tag.
    fn paint(&mut self, ship: &PlacedShip, active: bool) {
        for (r, c) in ship.footprint() {
            if self.board.tile_at(r, c).ok().and_then(|t| t.ship_id()) == Some(ship.id) {
                self.board.set_tile(r, c, Tile::Ship { id: ship.id, active });
            }
        }
    }

    /// Clear the tiles a ship still occupies. Shot tiles are left alone.
    fn erase(&mut self, ship: &PlacedShip) {
        for (r, c) in ship.footprint() {
            if self.board.tile_at(r, c).ok().and_then(|t| t.ship_id()) == Some(ship.id) {
                self.board.set_tile(r, c, Tile::Empty);
            }
        }
    }
}
