use log::{debug, error};

use super::{
    direction::Direction,
    engine::{GameEngine, TickEvent},
    state::GameState,
};
use crate::error::Result;
use crate::input::InputMapper;

/// One game as a finite sequence of states.
///
/// Iterating yields the opening state first, then one successor per call,
/// ending after the terminal state. Steering between calls changes the
/// heading used by the next tick.
pub struct GameSession {
    engine: GameEngine,
    current: GameState,
    mapper: InputMapper,
    started: bool,
}

impl GameSession {
    /// Start a fresh game from the engine's configuration
    pub fn new(mut engine: GameEngine) -> Result<Self> {
        let current = engine.new_game()?;
        Ok(Self::from_state(engine, current))
    }

    /// Continue from an arbitrary state
    pub fn from_state(engine: GameEngine, state: GameState) -> Self {
        Self {
            engine,
            current: state,
            mapper: InputMapper::new(),
            started: false,
        }
    }

    pub fn current(&self) -> &GameState {
        &self.current
    }

    pub fn is_over(&self) -> bool {
        self.current.gameover
    }

    /// Queue a direction change for the next tick. Reversals are ignored.
    pub fn steer(&mut self, requested: Direction) -> bool {
        let accepted = self.mapper.request(self.current.direction, requested);
        if !accepted {
            debug!(
                "Ignoring {:?} while heading {:?}",
                requested, self.current.direction
            );
        }
        accepted
    }

    /// Apply any pending turn and advance one tick
    pub fn tick(&mut self) -> Result<TickEvent> {
        if let Some(direction) = self.mapper.take() {
            self.current.direction = direction;
        }

        let result = self.engine.advance(&self.current)?;
        self.current = result.state;
        Ok(result.event)
    }
}

impl Iterator for GameSession {
    type Item = GameState;

    fn next(&mut self) -> Option<GameState> {
        if !self.started {
            self.started = true;
            return Some(self.current.clone());
        }
        if self.current.gameover {
            return None;
        }

        match self.tick() {
            Ok(_) => Some(self.current.clone()),
            Err(err) => {
                error!("Session stopped: {err}");
                None
            }
        }
    }
}
