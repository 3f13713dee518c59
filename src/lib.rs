//! Toroid Snake - a terminal Snake game on a wraparound grid
//!
//! This library provides:
//! - Core game logic: states, the tick function and the lazy game sequence (game module)
//! - Keyboard mapping and the no-reversal rule (input module)
//! - TUI rendering (render module)
//! - The interactive game loop (modes module)

pub mod error;
pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;

pub use error::GameError;
