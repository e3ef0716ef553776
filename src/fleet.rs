//! Fleet registry: the ship catalog and where each ship currently is.
//!
//! Every catalog entry owns exactly one berth, so a ship can never be both
//! available and placed. The active selection is an id pointing at a held or
//! placed berth, never a copy of it.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

use crate::common::EngineError;
use crate::config::standard_catalog;
use crate::ship::{Orientation, PlacedShip, ShipId, ShipSpec};

/// Where a ship currently lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    /// Waiting in the pool of ships to place.
    Available,
    /// Selected for placement but not yet anchored on the board.
    Held,
    /// Anchored on the board.
    Placed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Berth {
    Available {
        since: u64,
        rotation: Orientation,
    },
    Held {
        rotation: Orientation,
    },
    Placed {
        since: u64,
        row: usize,
        col: usize,
        rotation: Orientation,
    },
}

/// An available ship together with the rotation it will be placed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvailableShip<'a> {
    pub spec: &'a ShipSpec,
    pub rotation: Orientation,
}

/// The currently selected ship.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Picked from the available pool, not on the board yet.
    Unanchored { id: ShipId, rotation: Orientation },
    /// A placed ship picked up for moving or rotating.
    Anchored(PlacedShip),
}

impl Selection {
    pub fn id(&self) -> ShipId {
        match self {
            Selection::Unanchored { id, .. } => *id,
            Selection::Anchored(ship) => ship.id,
        }
    }

    pub fn rotation(&self) -> Orientation {
        match self {
            Selection::Unanchored { rotation, .. } => *rotation,
            Selection::Anchored(ship) => ship.rotation,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fleet {
    catalog: Vec<ShipSpec>,
    berths: Vec<Berth>,
    active: Option<ShipId>,
    clock: u64,
}

impl Fleet {
    /// Build a fleet with every catalog ship available, in catalog order.
    ///
    /// Names double as tile tags, so they must be unique and must not look like
    /// one of the other tags.
    pub fn new(catalog: Vec<ShipSpec>) -> Result<Self, EngineError> {
        for (i, spec) in catalog.iter().enumerate() {
            if spec.size == 0 || is_reserved_name(&spec.name) {
                return Err(EngineError::InvalidShip(spec.id));
            }
            if catalog[..i]
                .iter()
                .any(|s| s.id == spec.id || s.name == spec.name)
            {
                return Err(EngineError::DuplicateShip(spec.id));
            }
        }
        Ok(Self::fresh(catalog))
    }

    /// Fleet built from [`standard_catalog`].
    pub fn standard() -> Self {
        Self::fresh(standard_catalog())
    }

    fn fresh(catalog: Vec<ShipSpec>) -> Self {
        let berths = catalog
            .iter()
            .zip(0u64..)
            .map(|(spec, since)| Berth::Available {
                since,
                rotation: spec.rotation,
            })
            .collect();
        Self {
            clock: catalog.len() as u64,
            catalog,
            berths,
            active: None,
        }
    }

    /// Every ship definition, in catalog order.
    pub fn catalog(&self) -> &[ShipSpec] {
        &self.catalog
    }

    pub fn spec(&self, id: ShipId) -> Option<&ShipSpec> {
        self.slot(id).map(|i| &self.catalog[i])
    }

    /// Look a ship up by its name tag.
    pub fn spec_by_name(&self, name: &str) -> Option<&ShipSpec> {
        self.catalog.iter().find(|s| s.name == name)
    }

    pub fn location(&self, id: ShipId) -> Option<Location> {
        self.slot(id).map(|i| match self.berths[i] {
            Berth::Available { .. } => Location::Available,
            Berth::Held { .. } => Location::Held,
            Berth::Placed { .. } => Location::Placed,
        })
    }

    /// Ships waiting to be placed, oldest first.
    pub fn available(&self) -> Vec<AvailableShip<'_>> {
        let mut out: Vec<(u64, AvailableShip<'_>)> = self
            .catalog
            .iter()
            .zip(&self.berths)
            .filter_map(|(spec, berth)| match *berth {
                Berth::Available { since, rotation } => {
                    Some((since, AvailableShip { spec, rotation }))
                }
                _ => None,
            })
            .collect();
        out.sort_by_key(|(since, _)| *since);
        out.into_iter().map(|(_, ship)| ship).collect()
    }

    /// Ships on the board, in the order they were first placed.
    pub fn placed(&self) -> Vec<PlacedShip> {
        let mut out: Vec<(u64, PlacedShip)> = self
            .catalog
            .iter()
            .zip(&self.berths)
            .filter_map(|(spec, berth)| match *berth {
                Berth::Placed {
                    since,
                    row,
                    col,
                    rotation,
                } => Some((
                    since,
                    PlacedShip {
                        id: spec.id,
                        size: spec.size,
                        row,
                        col,
                        rotation,
                    },
                )),
                _ => None,
            })
            .collect();
        out.sort_by_key(|(since, _)| *since);
        out.into_iter().map(|(_, ship)| ship).collect()
    }

    pub fn placement(&self, id: ShipId) -> Option<PlacedShip> {
        let i = self.slot(id)?;
        match self.berths[i] {
            Berth::Placed {
                row, col, rotation, ..
            } => Some(PlacedShip {
                id,
                size: self.catalog[i].size,
                row,
                col,
                rotation,
            }),
            _ => None,
        }
    }

    /// Placed ship whose footprint covers (`row`, `col`).
    pub fn ship_at(&self, row: usize, col: usize) -> Option<PlacedShip> {
        self.placed().into_iter().find(|s| s.covers(row, col))
    }

    pub fn active_id(&self) -> Option<ShipId> {
        self.active
    }

    /// Current selection, resolved against the berth it points at.
    pub fn active(&self) -> Option<Selection> {
        let id = self.active?;
        let i = self.slot(id)?;
        match self.berths[i] {
            Berth::Held { rotation } => Some(Selection::Unanchored { id, rotation }),
            Berth::Placed { .. } => self.placement(id).map(Selection::Anchored),
            Berth::Available { .. } => None,
        }
    }

    /// Returns `true` once every ship is on the board.
    pub fn is_ready(&self) -> bool {
        self.berths.iter().all(|b| matches!(b, Berth::Placed { .. }))
    }

    /// Ship name to display color.
    pub fn colors(&self) -> BTreeMap<String, String> {
        self.catalog
            .iter()
            .map(|s| (s.name.clone(), s.color.clone()))
            .collect()
    }

    pub(crate) fn hold(&mut self, id: ShipId) -> Result<(), EngineError> {
        let i = self.slot(id).ok_or(EngineError::NotFound(id))?;
        match self.berths[i] {
            Berth::Available { rotation, .. } => {
                self.berths[i] = Berth::Held { rotation };
                self.active = Some(id);
                Ok(())
            }
            _ => Err(EngineError::NotFound(id)),
        }
    }

    /// Return a held ship to the back of the available pool.
    pub(crate) fn release(&mut self, id: ShipId) {
        if let Some(i) = self.slot(id) {
            if let Berth::Held { rotation } = self.berths[i] {
                self.berths[i] = Berth::Available {
                    since: self.tick(),
                    rotation,
                };
            }
        }
        if self.active == Some(id) {
            self.active = None;
        }
    }

    /// Anchor a ship, keeping its place in the placement order if it was already placed.
    pub(crate) fn anchor(&mut self, id: ShipId, row: usize, col: usize, rotation: Orientation) {
        if let Some(i) = self.slot(id) {
            let since = match self.berths[i] {
                Berth::Placed { since, .. } => since,
                _ => self.tick(),
            };
            self.berths[i] = Berth::Placed {
                since,
                row,
                col,
                rotation,
            };
        }
    }

    /// Send a ship back to the available pool with its default rotation.
    pub(crate) fn unplace(&mut self, id: ShipId) {
        if let Some(i) = self.slot(id) {
            self.berths[i] = Berth::Available {
                since: self.tick(),
                rotation: self.catalog[i].rotation,
            };
        }
        if self.active == Some(id) {
            self.active = None;
        }
    }

    pub(crate) fn set_rotation(&mut self, id: ShipId, rotation: Orientation) {
        if let Some(i) = self.slot(id) {
            match &mut self.berths[i] {
                Berth::Available { rotation: r, .. }
                | Berth::Held { rotation: r }
                | Berth::Placed { rotation: r, .. } => *r = rotation,
            }
        }
    }

    pub(crate) fn set_active(&mut self, id: Option<ShipId>) {
        self.active = id;
    }

    fn slot(&self, id: ShipId) -> Option<usize> {
        self.catalog.iter().position(|s| s.id == id)
    }

    fn tick(&mut self) -> u64 {
        let now = self.clock;
        self.clock += 1;
        now
    }
}

fn is_reserved_name(name: &str) -> bool {
    const TAGS: [&str; 3] = ["empty", "hit", "miss"];
    const PREFIXES: [&str; 2] = ["active-", "ship-"];
    name.is_empty()
        || TAGS.contains(&name)
        || PREFIXES.iter().any(|p| name.starts_with(p))
}

impl Default for Fleet {
    fn default() -> Self {
        Self::standard()
    }
}
