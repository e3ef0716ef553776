#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod ai;
mod board;
mod common;
mod config;
mod fleet;
mod game;
#[cfg(feature = "std")]
mod logging;
mod placement;
mod player;
mod player_ai;
mod ship;
#[cfg(feature = "std")]
pub mod wire;

pub use ai::{AiMemory, Difficulty, ParseDifficultyError};
pub use board::*;
pub use common::*;
pub use config::*;
pub use fleet::*;
pub use game::*;
#[cfg(feature = "std")]
pub use logging::{init_logging, level_from, LOG_ENV};
pub use placement::*;
pub use player::*;
pub use player_ai::*;
pub use ship::*;
#[cfg(feature = "std")]
pub use wire::{MatchSnapshot, OpponentSnapshot, PlanningSnapshot, WireError};
