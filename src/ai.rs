// Opponent shot selection with three difficulty tiers.
//
// Medium and Hard keep a small per-match memory: after a hit, the orthogonal
// neighbours of that cell are queued and tried before any random search.

use alloc::collections::VecDeque;
use alloc::vec::Vec;
use core::fmt;
use core::str::FromStr;

use rand::Rng;
use thiserror::Error;

use crate::board::Board;
use crate::common::{EngineError, ShotResult};

/// How hard the computer opponent plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "lowercase"))]
pub enum Difficulty {
    /// Uniform random over unshot cells, no memory.
    Easy,
    /// Follows up on hits, otherwise random.
    Medium,
    /// Follows up on hits, otherwise searches one checkerboard colour first.
    Hard,
}

impl Difficulty {
    fn uses_memory(self) -> bool {
        !matches!(self, Difficulty::Easy)
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        })
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown difficulty, expected easy, medium or hard")]
pub struct ParseDifficultyError;

impl FromStr for Difficulty {
    type Err = ParseDifficultyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            s if s.eq_ignore_ascii_case("easy") => Ok(Difficulty::Easy),
            s if s.eq_ignore_ascii_case("medium") => Ok(Difficulty::Medium),
            s if s.eq_ignore_ascii_case("hard") => Ok(Difficulty::Hard),
            _ => Err(ParseDifficultyError),
        }
    }
}

/// Cross-shot memory of the targeting engine, scoped to one target board.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct AiMemory {
    queue: VecDeque<(usize, usize)>,
    hunting: bool,
    last_hit: Option<(usize, usize)>,
}

impl AiMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` while queued follow-up cells are pending.
    pub fn is_hunting(&self) -> bool {
        self.hunting
    }

    pub fn last_hit(&self) -> Option<(usize, usize)> {
        self.last_hit
    }

    /// Follow-up cells in the order they will be tried. May contain stale cells.
    pub fn queue(&self) -> impl Iterator<Item = &(usize, usize)> {
        self.queue.iter()
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// Pop queued cells until one that is still unshot turns up.
    fn next_queued(&mut self, board: &Board) -> Option<(usize, usize)> {
        while let Some((r, c)) = self.queue.pop_front() {
            if board.tile_at(r, c).is_ok_and(|t| !t.is_shot()) {
                return Some((r, c));
            }
        }
        None
    }
}

/// Pick the next cell to shoot on `board`.
///
/// Fails with [`EngineError::NoValidCells`] once every cell has been shot.
pub fn choose_target<R: Rng + ?Sized>(
    board: &Board,
    difficulty: Difficulty,
    memory: &mut AiMemory,
    rng: &mut R,
) -> Result<(usize, usize), EngineError> {
    let candidates = board.candidates();
    if candidates.is_empty() {
        return Err(EngineError::NoValidCells);
    }
    if difficulty.uses_memory() {
        if let Some(cell) = memory.next_queued(board) {
            log::debug!("{} AI follows up at {:?}", difficulty, cell);
            return Ok(cell);
        }
    }
    let pool = match difficulty {
        Difficulty::Easy | Difficulty::Medium => candidates,
        Difficulty::Hard => {
            let parity: Vec<(usize, usize)> = candidates
                .iter()
                .copied()
                .filter(|&(r, c)| (r + c) % 2 == 0)
                .collect();
            if parity.is_empty() {
                candidates
            } else {
                parity
            }
        }
    };
    Ok(pool[rng.random_range(0..pool.len())])
}

/// Update `memory` with the result of the shot at `cell`.
///
/// Easy never touches memory. On a hit, Medium and Hard queue the in-bounds
/// orthogonal neighbours of `cell`; once the queue is empty hunting stops.
pub fn record_result(
    board: &Board,
    difficulty: Difficulty,
    memory: &mut AiMemory,
    cell: (usize, usize),
    hit: bool,
) {
    if !difficulty.uses_memory() {
        return;
    }
    if hit {
        memory.queue.extend(board.neighbors(cell.0, cell.1));
        memory.hunting = true;
        memory.last_hit = Some(cell);
    }
    if memory.queue.is_empty() {
        memory.hunting = false;
        memory.last_hit = None;
    }
}

/// Choose a cell, shoot it and record the result in one step.
pub fn fire<R: Rng + ?Sized>(
    board: &mut Board,
    difficulty: Difficulty,
    memory: &mut AiMemory,
    rng: &mut R,
) -> Result<((usize, usize), ShotResult), EngineError> {
    let cell = choose_target(board, difficulty, memory, rng)?;
    let result = board.shoot(cell.0, cell.1)?;
    record_result(board, difficulty, memory, cell, result.is_hit());
    Ok((cell, result))
}
