use alloc::vec::Vec;
use rand::rngs::SmallRng;

use crate::{
    ai::AiMemory,
    board::Board,
    common::{EngineError, ShotOutcome},
    config::{standard_catalog, MatchSettings},
    fleet::Fleet,
    placement::PlacementEngine,
    player::Player,
    player_ai::AiPlayer,
    ship::ShipSpec,
};

/// Lifecycle of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "lowercase"))]
pub enum Phase {
    /// The human side is laying out ships.
    Planning,
    /// Shots are being exchanged.
    Combat,
    /// One fleet is fully sunk.
    Finished,
}

/// Who fires next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "lowercase"))]
pub enum Side {
    Player,
    Opponent,
}

/// Current status of a game, from the human side's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum GameStatus {
    InProgress,
    Won,
    Lost,
}

/// One human-vs-computer match: both boards, the computer's targeting memory
/// and the turn order. Callers serialize access to a single instance.
#[derive(Debug, Clone)]
pub struct GameEngine {
    settings: MatchSettings,
    player: PlacementEngine,
    opponent: PlacementEngine,
    ai: AiPlayer,
    phase: Phase,
    next: Side,
}

impl GameEngine {
    /// Start a match in the planning phase. The opponent fleet is deployed at random.
    pub fn new(
        settings: MatchSettings,
        catalog: Vec<ShipSpec>,
        rng: &mut SmallRng,
    ) -> Result<Self, EngineError> {
        settings.validate(&catalog)?;
        let player = PlacementEngine::new(settings.grid_size, Fleet::new(catalog.clone())?)?;
        let mut opponent = PlacementEngine::new(settings.grid_size, Fleet::new(catalog)?)?;
        let mut ai = AiPlayer::new(settings.difficulty);
        ai.place_ships(rng, &mut opponent)?;
        log::info!(
            "new match on a {0}x{0} grid, {1} opponent",
            settings.grid_size,
            settings.difficulty
        );
        Ok(Self {
            settings,
            player,
            opponent,
            ai,
            phase: Phase::Planning,
            next: Side::Player,
        })
    }

    /// Start a match with the standard fleet.
    pub fn standard(settings: MatchSettings, rng: &mut SmallRng) -> Result<Self, EngineError> {
        Self::new(settings, standard_catalog(), rng)
    }

    /// Reassemble a match from saved parts.
    pub fn from_parts(
        settings: MatchSettings,
        player: PlacementEngine,
        opponent: PlacementEngine,
        memory: AiMemory,
        phase: Phase,
        next: Side,
    ) -> Self {
        Self {
            ai: AiPlayer::with_memory(settings.difficulty, memory),
            settings,
            player,
            opponent,
            phase,
            next,
        }
    }

    pub fn settings(&self) -> MatchSettings {
        self.settings
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn next_to_fire(&self) -> Side {
        self.next
    }

    /// The human side's board and fleet.
    pub fn player(&self) -> &PlacementEngine {
        &self.player
    }

    /// The computer side's board and fleet.
    pub fn opponent(&self) -> &PlacementEngine {
        &self.opponent
    }

    pub fn opponent_board(&self) -> &Board {
        self.opponent.board()
    }

    pub fn ai_memory(&self) -> &AiMemory {
        self.ai.memory()
    }

    /// Mutable access to the human side's placement engine while planning.
    pub fn planning(&mut self) -> Result<&mut PlacementEngine, EngineError> {
        match self.phase {
            Phase::Planning => Ok(&mut self.player),
            _ => Err(EngineError::WrongPhase),
        }
    }

    /// Leave planning once every ship is placed. Any selection is dropped.
    pub fn start_combat(&mut self) -> Result<(), EngineError> {
        if self.phase != Phase::Planning {
            return Err(EngineError::WrongPhase);
        }
        if !self.player.fleet().is_ready() {
            return Err(EngineError::FleetIncomplete);
        }
        self.player.deselect_active();
        self.phase = Phase::Combat;
        self.next = Side::Player;
        log::info!("combat started");
        Ok(())
    }

    /// Fire the human side's shot at the opponent board.
    pub fn player_fire(&mut self, row: usize, col: usize) -> Result<ShotOutcome, EngineError> {
        self.ensure_turn(Side::Player)?;
        let outcome = self.opponent.receive_shot(row, col)?;
        self.next = Side::Opponent;
        self.finish_if_over();
        Ok(outcome)
    }

    /// Let the computer choose and fire its shot at the human side's board.
    pub fn opponent_fire(
        &mut self,
        rng: &mut SmallRng,
    ) -> Result<((usize, usize), ShotOutcome), EngineError> {
        self.ensure_turn(Side::Opponent)?;
        let (row, col) = self.ai.select_target(rng, self.player.board())?;
        let outcome = self.player.receive_shot(row, col)?;
        self.ai.handle_shot_result(self.player.board(), (row, col), outcome);
        self.next = Side::Player;
        self.finish_if_over();
        Ok(((row, col), outcome))
    }

    /// Evaluate the current game status.
    pub fn status(&self) -> GameStatus {
        if self.phase == Phase::Planning {
            GameStatus::InProgress
        } else if self.player.is_defeated() {
            GameStatus::Lost
        } else if self.opponent.is_defeated() {
            GameStatus::Won
        } else {
            GameStatus::InProgress
        }
    }

    fn ensure_turn(&self, side: Side) -> Result<(), EngineError> {
        if self.phase != Phase::Combat || self.next != side {
            return Err(EngineError::WrongPhase);
        }
        Ok(())
    }

    fn finish_if_over(&mut self) {
        match self.status() {
            GameStatus::InProgress => {}
            status => {
                self.phase = Phase::Finished;
                log::info!("match finished: {:?}", status);
            }
        }
    }
}
