//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! States are values: each tick produces a new `GameState` from the previous one.

pub mod config;
pub mod direction;
pub mod engine;
pub mod session;
pub mod state;

// Re-export commonly used types
pub use config::{GameConfig, MAX_TICK_RATE_HZ};
pub use direction::Direction;
pub use engine::{GameEngine, MAX_FOOD_SAMPLES, StepResult, TickEvent};
pub use session::GameSession;
pub use state::{BoardSize, GameOutcome, GameState, Position, Snake};
