use rand::rngs::SmallRng;

use crate::{
    ai::{self, AiMemory, Difficulty},
    board::Board,
    common::{EngineError, ShotOutcome},
    placement::PlacementEngine,
    player::Player,
};

/// Computer player backed by the targeting engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AiPlayer {
    difficulty: Difficulty,
    memory: AiMemory,
}

impl AiPlayer {
    pub fn new(difficulty: Difficulty) -> Self {
        Self::with_memory(difficulty, AiMemory::new())
    }

    /// Resume a player from previously saved memory.
    pub fn with_memory(difficulty: Difficulty, memory: AiMemory) -> Self {
        Self { difficulty, memory }
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn memory(&self) -> &AiMemory {
        &self.memory
    }
}

impl Player for AiPlayer {
    fn place_ships(
        &mut self,
        rng: &mut SmallRng,
        engine: &mut PlacementEngine,
    ) -> Result<(), EngineError> {
        engine.deploy_randomly(rng)
    }

    fn select_target(
        &mut self,
        rng: &mut SmallRng,
        target: &Board,
    ) -> Result<(usize, usize), EngineError> {
        ai::choose_target(target, self.difficulty, &mut self.memory, rng)
    }

    fn handle_shot_result(
        &mut self,
        target: &Board,
        coord: (usize, usize),
        outcome: ShotOutcome,
    ) {
        let hit = outcome.is_hit();
        ai::record_result(target, self.difficulty, &mut self.memory, coord, hit);
    }
}
