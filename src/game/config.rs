use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::state::BoardSize;
use crate::error::{GameError, Result};

/// Fastest clock the game loop accepts
pub const MAX_TICK_RATE_HZ: u32 = 1_000;

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the game grid
    pub board_width: usize,
    /// Height of the game grid
    pub board_height: usize,
    /// Initial length of the snake
    pub initial_snake_length: usize,
    /// Simulation ticks per second, fixed for the whole session
    pub tick_rate_hz: u32,
    /// Seed for food placement; drawn from entropy when absent
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_width: 20,
            board_height: 20,
            initial_snake_length: 3,
            tick_rate_hz: 10,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            board_width: width,
            board_height: height,
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(10, 10)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn board(&self) -> BoardSize {
        BoardSize::new(self.board_width, self.board_height)
    }

    /// Period of the fixed-rate game clock. Only meaningful on a validated config.
    pub fn tick_period(&self) -> Duration {
        Duration::from_secs(1) / self.tick_rate_hz.max(1)
    }

    /// Load a JSON config; missing fields fall back to the defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: GameConfig = serde_json::from_str(&raw)?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let max_side = i32::MAX as usize;
        if self.board_width == 0 || self.board_height == 0 {
            return Err(GameError::InvalidConfig(format!(
                "board must be at least 1x1, got {}x{}",
                self.board_width, self.board_height
            )));
        }
        if self.board_width > max_side || self.board_height > max_side {
            return Err(GameError::InvalidConfig(
                "board dimensions exceed the coordinate range".to_string(),
            ));
        }
        if self.tick_rate_hz == 0 || self.tick_rate_hz > MAX_TICK_RATE_HZ {
            return Err(GameError::InvalidConfig(format!(
                "tick rate must be between 1 and {MAX_TICK_RATE_HZ} Hz, got {}",
                self.tick_rate_hz
            )));
        }
        if self.initial_snake_length == 0 {
            return Err(GameError::InvalidConfig(
                "snake needs at least one segment".to_string(),
            ));
        }
        // The starting snake is laid out vertically below the head.
        if self.initial_snake_length > self.board_height {
            return Err(GameError::InvalidConfig(format!(
                "snake of length {} does not fit a board {} cells high",
                self.initial_snake_length, self.board_height
            )));
        }
        if self.initial_snake_length >= self.board().cell_count() {
            return Err(GameError::InvalidConfig(
                "board leaves no room for food".to_string(),
            ));
        }
        Ok(())
    }
}
