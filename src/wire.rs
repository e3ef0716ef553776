//! JSON snapshots of planning and match state.
//!
//! The planning blob keeps the persisted layout of the web client: a
//! `player_grid` of string tiles plus `all_ships`, `available_ships`,
//! `placed_ships` and `active_ship`. Tiles are `"empty"`, `"hit"`, `"miss"`,
//! a ship name, or an `"active-"` prefixed ship name for the selected ship. The
//! opponent grid tags ship tiles with a `"ship-"` prefix instead.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ai::AiMemory;
use crate::board::{Board, Tile};
use crate::common::EngineError;
use crate::config::{standard_catalog, MatchSettings};
use crate::fleet::{Fleet, Location, Selection};
use crate::game::{GameEngine, Phase, Side};
use crate::placement::PlacementEngine;
use crate::ship::{Orientation, PlacedShip, ShipId, ShipSpec};

const EMPTY: &str = "empty";
const HIT: &str = "hit";
const MISS: &str = "miss";
const ACTIVE_PREFIX: &str = "active-";
const OPPONENT_PREFIX: &str = "ship-";
/// Row and column of a ship that is not anchored on the board.
const UNANCHORED: i64 = -1;

#[derive(Debug, Error)]
pub enum WireError {
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown tile {0:?}")]
    UnknownTile(String),
    #[error("ship id {0:?} is not a number")]
    BadShipId(String),
    #[error("rotation {0} is neither 0 nor 90")]
    BadRotation(i64),
    #[error("grid declares size {declared} but has {actual} rows")]
    GridMismatch { declared: usize, actual: usize },
    #[error("ship {0} must be listed exactly once across available, placed and active")]
    InconsistentFleet(ShipId),
    #[error("tiles disagree with the recorded position of ship {0}")]
    MisplacedShip(ShipId),
    #[error("active tag on the tiles of ship {0} disagrees with the selection")]
    ActiveTagMismatch(ShipId),
    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Which tile alphabet a grid uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Style {
    Planning,
    Opponent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSnapshot {
    #[serde(rename = "gridSize")]
    pub grid_size: usize,
    pub tiles: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipRecord {
    pub id: String,
    pub size: usize,
    pub color: String,
    pub rotation: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedRecord {
    #[serde(flatten)]
    pub ship: ShipRecord,
    pub row: i64,
    pub col: i64,
}

/// The planning blob of one side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanningSnapshot {
    pub player_grid: GridSnapshot,
    pub all_ships: Option<Vec<ShipRecord>>,
    pub available_ships: Option<Vec<ShipRecord>>,
    pub placed_ships: Option<Vec<PlacedRecord>>,
    pub active_ship: Option<PlacedRecord>,
}

/// The computer side's board. Ship positions are kept so sinking can be reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpponentSnapshot {
    pub grid: GridSnapshot,
    pub placed_ships: Vec<PlacedRecord>,
}

/// A whole match, resumable with [`GameEngine::try_from`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSnapshot {
    pub settings: MatchSettings,
    pub phase: Phase,
    pub next_to_fire: Side,
    pub planning: PlanningSnapshot,
    pub opponent: OpponentSnapshot,
    pub ai: AiMemory,
}

fn encode_rotation(rotation: Orientation) -> i64 {
    match rotation {
        Orientation::Horizontal => 0,
        Orientation::Vertical => 90,
    }
}

fn decode_rotation(value: i64) -> Result<Orientation, WireError> {
    match value {
        0 => Ok(Orientation::Horizontal),
        90 => Ok(Orientation::Vertical),
        other => Err(WireError::BadRotation(other)),
    }
}

impl ShipRecord {
    fn new(spec: &ShipSpec, rotation: Orientation) -> Self {
        Self {
            id: spec.id.0.to_string(),
            size: spec.size,
            color: spec.color.clone(),
            rotation: encode_rotation(rotation),
            name: spec.name.clone(),
        }
    }

    pub fn ship_id(&self) -> Result<ShipId, WireError> {
        self.id
            .trim()
            .parse::<u32>()
            .map(ShipId)
            .map_err(|_| WireError::BadShipId(self.id.clone()))
    }

    fn to_spec(&self) -> Result<ShipSpec, WireError> {
        let id = self.ship_id()?;
        let mut spec = ShipSpec::new(id.0, self.name.clone(), self.size, self.color.clone());
        spec.rotation = decode_rotation(self.rotation)?;
        Ok(spec)
    }
}

impl PlacedRecord {
    fn placed(spec: &ShipSpec, ship: &PlacedShip) -> Self {
        Self {
            ship: ShipRecord::new(spec, ship.rotation),
            row: ship.row as i64,
            col: ship.col as i64,
        }
    }

    fn unanchored(spec: &ShipSpec, rotation: Orientation) -> Self {
        Self {
            ship: ShipRecord::new(spec, rotation),
            row: UNANCHORED,
            col: UNANCHORED,
        }
    }

    /// Anchor cell, or `None` for a ship that is not on the board.
    fn anchor(&self) -> Option<(usize, usize)> {
        let row = usize::try_from(self.row).ok()?;
        let col = usize::try_from(self.col).ok()?;
        Some((row, col))
    }
}

fn encode_tile(tile: Tile, fleet: &Fleet, style: Style) -> String {
    match tile {
        Tile::Empty => EMPTY.to_string(),
        Tile::Hit => HIT.to_string(),
        Tile::Miss => MISS.to_string(),
        Tile::Ship { id, active } => {
            let name = fleet.spec(id).map(|s| s.name.as_str()).unwrap_or_default();
            match style {
                Style::Opponent => format!("{}{}", OPPONENT_PREFIX, name),
                Style::Planning if active => format!("{}{}", ACTIVE_PREFIX, name),
                Style::Planning => name.to_string(),
            }
        }
    }
}

fn decode_tile(raw: &str, fleet: &Fleet, style: Style) -> Result<Tile, WireError> {
    match raw {
        EMPTY => return Ok(Tile::Empty),
        HIT => return Ok(Tile::Hit),
        MISS => return Ok(Tile::Miss),
        _ => {}
    }
    let (name, active) = match style {
        Style::Opponent => (raw.strip_prefix(OPPONENT_PREFIX), false),
        Style::Planning => match raw.strip_prefix(ACTIVE_PREFIX) {
            Some(name) => (Some(name), true),
            None => (Some(raw), false),
        },
    };
    name.and_then(|n| fleet.spec_by_name(n))
        .map(|spec| Tile::Ship { id: spec.id, active })
        .ok_or_else(|| WireError::UnknownTile(raw.to_string()))
}

fn encode_grid(board: &Board, fleet: &Fleet, style: Style) -> GridSnapshot {
    GridSnapshot {
        grid_size: board.grid_size(),
        tiles: board
            .rows()
            .map(|row| row.iter().map(|&t| encode_tile(t, fleet, style)).collect())
            .collect(),
    }
}

fn decode_grid(grid: &GridSnapshot, fleet: &Fleet, style: Style) -> Result<Board, WireError> {
    if grid.tiles.len() != grid.grid_size {
        return Err(WireError::GridMismatch {
            declared: grid.grid_size,
            actual: grid.tiles.len(),
        });
    }
    let rows = grid
        .tiles
        .iter()
        .map(|row| {
            row.iter()
                .map(|raw| decode_tile(raw, fleet, style))
                .collect::<Result<Vec<_>, _>>()
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Board::from_rows(rows)?)
}

fn claim(seen: &mut BTreeSet<ShipId>, id: ShipId) -> Result<(), WireError> {
    if seen.insert(id) {
        Ok(())
    } else {
        Err(WireError::InconsistentFleet(id))
    }
}

/// Anchor every record in `fleet` after checking that the board agrees with it.
fn anchor_all(
    records: &[PlacedRecord],
    board: &Board,
    fleet: &mut Fleet,
    seen: &mut BTreeSet<ShipId>,
) -> Result<(), WireError> {
    for record in records {
        let id = record.ship.ship_id()?;
        claim(seen, id)?;
        let size = fleet.spec(id).ok_or(EngineError::NotFound(id))?.size;
        let (row, col) = record.anchor().ok_or(WireError::MisplacedShip(id))?;
        let rotation = decode_rotation(record.ship.rotation)?;
        let cells = board.footprint(row, col, size, rotation);
        let intact = cells.iter().all(|&(r, c)| match board.tile_at(r, c) {
            Ok(Tile::Ship { id: other, .. }) => other == id,
            Ok(Tile::Hit) => true,
            _ => false,
        });
        if !intact {
            return Err(WireError::MisplacedShip(id));
        }
        fleet.anchor(id, row, col, rotation);
    }
    Ok(())
}

/// Every ship tile must lie under the recorded footprint of that ship, and
/// carry the active tag exactly when that ship is the selection.
fn check_stray_tiles(board: &Board, fleet: &Fleet) -> Result<(), WireError> {
    for (r, row) in board.rows().enumerate() {
        for (c, tile) in row.iter().enumerate() {
            let Tile::Ship { id, active } = *tile else {
                continue;
            };
            if fleet.placement(id).map_or(true, |s| !s.covers(r, c)) {
                return Err(WireError::MisplacedShip(id));
            }
            if active != (fleet.active_id() == Some(id)) {
                return Err(WireError::ActiveTagMismatch(id));
            }
        }
    }
    Ok(())
}

impl From<&PlacementEngine> for PlanningSnapshot {
    fn from(engine: &PlacementEngine) -> Self {
        let fleet = engine.fleet();
        let placed = fleet
            .placed()
            .iter()
            .filter_map(|ship| Some(PlacedRecord::placed(fleet.spec(ship.id)?, ship)))
            .collect();
        let active = fleet.active().and_then(|selection| {
            let spec = fleet.spec(selection.id())?;
            Some(match selection {
                Selection::Unanchored { rotation, .. } => PlacedRecord::unanchored(spec, rotation),
                Selection::Anchored(ship) => PlacedRecord::placed(spec, &ship),
            })
        });
        Self {
            player_grid: encode_grid(engine.board(), fleet, Style::Planning),
            all_ships: Some(
                fleet
                    .catalog()
                    .iter()
                    .map(|spec| ShipRecord::new(spec, spec.rotation))
                    .collect(),
            ),
            available_ships: Some(
                fleet
                    .available()
                    .iter()
                    .map(|a| ShipRecord::new(a.spec, a.rotation))
                    .collect(),
            ),
            placed_ships: Some(placed),
            active_ship: active,
        }
    }
}

impl PlanningSnapshot {
    fn catalog(&self) -> Result<Vec<ShipSpec>, WireError> {
        match &self.all_ships {
            Some(ships) => ships.iter().map(ShipRecord::to_spec).collect(),
            None => Ok(standard_catalog()),
        }
    }
}

impl TryFrom<&PlanningSnapshot> for PlacementEngine {
    type Error = WireError;

    /// Rebuild planning state. Each ship must be listed exactly once across
    /// `available_ships`, `placed_ships` and an unanchored `active_ship`.
    fn try_from(snapshot: &PlanningSnapshot) -> Result<Self, Self::Error> {
        let mut fleet = Fleet::new(snapshot.catalog()?)?;
        let board = decode_grid(&snapshot.player_grid, &fleet, Style::Planning)?;
        let mut seen = BTreeSet::new();

        let placed = snapshot.placed_ships.as_deref().unwrap_or_default();
        anchor_all(placed, &board, &mut fleet, &mut seen)?;

        for record in snapshot.available_ships.as_deref().unwrap_or_default() {
            let id = record.ship_id()?;
            claim(&mut seen, id)?;
            fleet.spec(id).ok_or(EngineError::NotFound(id))?;
            // Requeue in listed order.
            fleet.unplace(id);
            fleet.set_rotation(id, decode_rotation(record.rotation)?);
        }

        if let Some(record) = &snapshot.active_ship {
            let id = record.ship.ship_id()?;
            match record.anchor() {
                Some((row, col)) if fleet.location(id) == Some(Location::Placed) => {
                    let rotation = decode_rotation(record.ship.rotation)?;
                    let same = fleet
                        .placement(id)
                        .is_some_and(|s| (s.row, s.col, s.rotation) == (row, col, rotation));
                    if !same {
                        return Err(WireError::MisplacedShip(id));
                    }
                    fleet.set_active(Some(id));
                }
                Some(_) => return Err(WireError::InconsistentFleet(id)),
                None => {
                    claim(&mut seen, id)?;
                    fleet.hold(id)?;
                    fleet.set_rotation(id, decode_rotation(record.ship.rotation)?);
                }
            }
        }

        if let Some(missing) = fleet.catalog().iter().find(|s| !seen.contains(&s.id)) {
            return Err(WireError::InconsistentFleet(missing.id));
        }
        check_stray_tiles(&board, &fleet)?;
        Ok(PlacementEngine::from_parts(board, fleet))
    }
}

impl From<&PlacementEngine> for OpponentSnapshot {
    fn from(engine: &PlacementEngine) -> Self {
        let fleet = engine.fleet();
        Self {
            grid: encode_grid(engine.board(), fleet, Style::Opponent),
            placed_ships: fleet
                .placed()
                .iter()
                .filter_map(|ship| Some(PlacedRecord::placed(fleet.spec(ship.id)?, ship)))
                .collect(),
        }
    }
}

impl OpponentSnapshot {
    /// Rebuild the opponent side over the same catalog as the player.
    fn restore(&self, catalog: Vec<ShipSpec>) -> Result<PlacementEngine, WireError> {
        let mut fleet = Fleet::new(catalog)?;
        let board = decode_grid(&self.grid, &fleet, Style::Opponent)?;
        let mut seen = BTreeSet::new();
        anchor_all(&self.placed_ships, &board, &mut fleet, &mut seen)?;
        check_stray_tiles(&board, &fleet)?;
        Ok(PlacementEngine::from_parts(board, fleet))
    }
}

impl From<&GameEngine> for MatchSnapshot {
    fn from(game: &GameEngine) -> Self {
        Self {
            settings: game.settings(),
            phase: game.phase(),
            next_to_fire: game.next_to_fire(),
            planning: PlanningSnapshot::from(game.player()),
            opponent: OpponentSnapshot::from(game.opponent()),
            ai: game.ai_memory().clone(),
        }
    }
}

impl TryFrom<&MatchSnapshot> for GameEngine {
    type Error = WireError;

    fn try_from(snapshot: &MatchSnapshot) -> Result<Self, Self::Error> {
        let player = PlacementEngine::try_from(&snapshot.planning)?;
        let opponent = snapshot.opponent.restore(player.fleet().catalog().to_vec())?;
        let declared = snapshot.settings.grid_size;
        for actual in [player.board().grid_size(), opponent.board().grid_size()] {
            if actual != declared {
                return Err(WireError::GridMismatch { declared, actual });
            }
        }
        Ok(GameEngine::from_parts(
            snapshot.settings,
            player,
            opponent,
            snapshot.ai.clone(),
            snapshot.phase,
            snapshot.next_to_fire,
        ))
    }
}

/// Serialize the planning state of `engine` to the persisted JSON blob.
pub fn planning_to_json(engine: &PlacementEngine) -> Result<String, WireError> {
    Ok(serde_json::to_string(&PlanningSnapshot::from(engine))?)
}

/// Parse and validate a persisted planning blob.
pub fn planning_from_json(json: &str) -> Result<PlacementEngine, WireError> {
    let snapshot: PlanningSnapshot = serde_json::from_str(json)?;
    PlacementEngine::try_from(&snapshot)
}

pub fn match_to_json(game: &GameEngine) -> Result<String, WireError> {
    Ok(serde_json::to_string(&MatchSnapshot::from(game))?)
}

pub fn match_from_json(json: &str) -> Result<GameEngine, WireError> {
    let snapshot: MatchSnapshot = serde_json::from_str(json)?;
    GameEngine::try_from(&snapshot)
}
