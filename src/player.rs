use rand::rngs::SmallRng;

use crate::{
    board::Board,
    common::{EngineError, ShotOutcome},
    placement::PlacementEngine,
};

/// Interface implemented by the sides of a match.
pub trait Player {
    /// Lay out every remaining ship on the planning board.
    fn place_ships(
        &mut self,
        rng: &mut SmallRng,
        engine: &mut PlacementEngine,
    ) -> Result<(), EngineError>;

    /// Choose the next cell to fire at on the target board.
    fn select_target(
        &mut self,
        rng: &mut SmallRng,
        target: &Board,
    ) -> Result<(usize, usize), EngineError>;

    /// Inform the player of the outcome of its last shot.
    fn handle_shot_result(
        &mut self,
        _target: &Board,
        _coord: (usize, usize),
        _outcome: ShotOutcome,
    ) {
    }
}
