use log::{debug, info};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::{
    config::GameConfig,
    direction::Direction,
    state::{GameOutcome, GameState, Position, Snake},
};
use crate::error::{GameError, Result};

/// Random draws tried before food placement falls back to listing free cells
pub const MAX_FOOD_SAMPLES: usize = 64;

/// What happened during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickEvent {
    /// Snake translated by one cell
    Moved,
    /// Snake ate, grew by one and new food was placed
    Ate,
    /// Head ran into the body; the game is over
    Collided,
    /// Snake ate and now covers the whole board; the game is over
    BoardFilled,
}

/// Result of a game step
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// Successor state
    pub state: GameState,
    pub event: TickEvent,
}

/// The game engine that handles all game logic
pub struct GameEngine {
    config: GameConfig,
    rng: StdRng,
}

impl GameEngine {
    /// Create a new game engine with the given configuration
    pub fn new(config: GameConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }

    pub fn with_rng(config: GameConfig, rng: StdRng) -> Self {
        Self { config, rng }
    }

    /// Build the opening state: head at the board centre with the body
    /// trailing below it, heading right, food somewhere off the snake.
    pub fn new_game(&mut self) -> Result<GameState> {
        self.config.validate()?;

        let board = self.config.board();
        let snake = Snake::new(
            board.center(),
            Direction::Down,
            self.config.initial_snake_length,
            board,
        );

        let mut state = GameState::new(board, snake, board.center(), Direction::Right);
        state.food = self.spawn_food(&state).ok_or(GameError::NoFreeCell)?;

        info!(
            "New game on {}x{} board, food at ({}, {})",
            board.width, board.height, state.food.x, state.food.y
        );
        Ok(state)
    }

    /// Compute the successor of `state` for one tick.
    ///
    /// The input is left untouched. Calling this on a finished game is a
    /// usage error and returns [`GameError::AdvanceAfterGameOver`].
    pub fn advance(&mut self, state: &GameState) -> Result<StepResult> {
        if state.gameover {
            return Err(GameError::AdvanceAfterGameOver);
        }

        let new_head = state.projected_head();
        let mut next = state.clone();
        next.steps += 1;

        // Landing on the current tail counts too: the original rule checks
        // every segment but the head.
        if state.snake.collides_with_body(new_head) {
            info!(
                "Collision at ({}, {}) after {} steps, score {}",
                new_head.x, new_head.y, next.steps, next.score
            );
            next.gameover = true;
            next.outcome = Some(GameOutcome::SelfCollision);
            return Ok(StepResult {
                state: next,
                event: TickEvent::Collided,
            });
        }

        let ate_food = new_head == state.food;
        next.snake.move_to(new_head, ate_food);

        if !ate_food {
            return Ok(StepResult {
                state: next,
                event: TickEvent::Moved,
            });
        }

        next.score += 1;
        let event = match self.spawn_food(&next) {
            Some(food) => {
                debug!("Score {}, new food at ({}, {})", next.score, food.x, food.y);
                next.food = food;
                TickEvent::Ate
            }
            None => {
                info!("Snake fills the board with score {}", next.score);
                next.gameover = true;
                next.outcome = Some(GameOutcome::BoardFilled);
                TickEvent::BoardFilled
            }
        };

        debug_assert!(next.is_consistent());
        Ok(StepResult { state: next, event })
    }

    /// Pick a cell uniformly among those not covered by the snake.
    /// Returns `None` when the snake occupies the whole board.
    fn spawn_food(&mut self, state: &GameState) -> Option<Position> {
        let board = state.board;
        if state.snake.len() < board.cell_count() {
            for _ in 0..MAX_FOOD_SAMPLES {
                let x = self.rng.gen_range(0..board.width) as i32;
                let y = self.rng.gen_range(0..board.height) as i32;
                let pos = Position::new(x, y);

                if !state.is_occupied_by_snake(pos) {
                    return Some(pos);
                }
            }
            debug!(
                "No free cell after {} samples, scanning the board",
                MAX_FOOD_SAMPLES
            );
        }

        state.free_cells().choose(&mut self.rng).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::BoardSize;

    fn seeded(seed: u64) -> GameEngine {
        GameEngine::new(GameConfig::small().with_seed(seed))
    }

    fn state_on(
        width: usize,
        height: usize,
        snake: &[(i32, i32)],
        direction: Direction,
        food: (i32, i32),
    ) -> GameState {
        GameState::new(
            BoardSize::new(width, height),
            Snake::from_segments(snake.iter().copied()),
            Position::from(food),
            direction,
        )
    }

    #[test]
    fn test_new_game() {
        let mut engine = GameEngine::new(GameConfig::default().with_seed(1));
        let state = engine.new_game().unwrap();

        assert!(!state.gameover);
        assert_eq!(state.score, 0);
        assert_eq!(state.steps, 0);
        assert_eq!(state.direction, Direction::Right);
        assert_eq!(
            state.snake.body,
            vec![
                Position::new(10, 10),
                Position::new(10, 11),
                Position::new(10, 12)
            ]
        );
        assert!(!state.snake.contains(state.food));
        assert!(state.is_consistent());
    }

    #[test]
    fn test_new_game_rejects_invalid_config() {
        let mut engine = GameEngine::new(GameConfig::new(0, 5));
        assert!(matches!(
            engine.new_game(),
            Err(GameError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_basic_movement() {
        let mut engine = seeded(3);
        let state = state_on(5, 5, &[(2, 2), (2, 3), (2, 4)], Direction::Right, (0, 0));

        let result = engine.advance(&state).unwrap();

        assert_eq!(result.event, TickEvent::Moved);
        assert_eq!(
            result.state.snake.body,
            vec![Position::new(3, 2), Position::new(2, 2), Position::new(2, 3)]
        );
        assert_eq!(result.state.score, 0);
        assert_eq!(result.state.food, state.food);
        assert_eq!(result.state.steps, 1);
        assert!(!result.state.gameover);
        // The input state is not mutated
        assert_eq!(state.snake.head(), Position::new(2, 2));
    }

    #[test]
    fn test_wraparound_right_edge() {
        let mut engine = seeded(3);
        let state = state_on(5, 5, &[(4, 1), (3, 1)], Direction::Right, (2, 2));

        let result = engine.advance(&state).unwrap();
        assert_eq!(result.state.snake.head(), Position::new(0, 1));
    }

    #[test]
    fn test_wraparound_top_edge() {
        let mut engine = seeded(3);
        let state = state_on(5, 5, &[(3, 0), (3, 1)], Direction::Up, (2, 2));

        let result = engine.advance(&state).unwrap();
        assert_eq!(result.state.snake.head(), Position::new(3, 4));
    }

    #[test]
    fn test_food_consumption() {
        let mut engine = seeded(11);
        let state = state_on(10, 10, &[(5, 5), (4, 5), (3, 5)], Direction::Right, (6, 5));

        let result = engine.advance(&state).unwrap();

        assert_eq!(result.event, TickEvent::Ate);
        assert_eq!(result.state.score, 1);
        assert_eq!(result.state.snake.len(), 4);
        assert_eq!(result.state.snake.head(), Position::new(6, 5));
        assert_eq!(result.state.snake.tail(), Position::new(3, 5));
        assert!(!result.state.snake.contains(result.state.food));
        assert!(result.state.is_consistent());
    }

    #[test]
    fn test_food_never_lands_on_snake() {
        let mut engine = seeded(5);
        let mut state = state_on(10, 10, &[(0, 0)], Direction::Right, (1, 0));

        for eaten in 1..=9u32 {
            state.food = state.projected_head();
            let result = engine.advance(&state).unwrap();
            assert_eq!(result.event, TickEvent::Ate);
            state = result.state;

            assert_eq!(state.score, eaten);
            assert_eq!(state.snake.len(), eaten as usize + 1);
            assert!(!state.snake.contains(state.food));
            assert!(state.is_consistent());
        }
    }

    #[test]
    fn test_food_goes_to_only_free_cell() {
        let mut engine = seeded(9);
        let state = state_on(3, 1, &[(0, 0)], Direction::Right, (1, 0));

        let result = engine.advance(&state).unwrap();

        assert_eq!(result.event, TickEvent::Ate);
        assert_eq!(result.state.food, Position::new(2, 0));
    }

    #[test]
    fn test_self_collision() {
        let mut engine = seeded(3);
        let state = state_on(
            5,
            5,
            &[(2, 2), (3, 2), (3, 3), (2, 3)],
            Direction::Right,
            (0, 0),
        );

        let result = engine.advance(&state).unwrap();

        assert_eq!(result.event, TickEvent::Collided);
        assert!(result.state.gameover);
        assert_eq!(result.state.outcome, Some(GameOutcome::SelfCollision));
        assert_eq!(result.state.snake, state.snake);
        assert_eq!(result.state.food, state.food);
        assert_eq!(result.state.score, state.score);
    }

    #[test]
    fn test_collision_with_tail_cell() {
        // Head moving into the cell the tail occupies still collides
        let mut engine = seeded(3);
        let state = state_on(
            5,
            5,
            &[(1, 1), (2, 1), (2, 2), (1, 2)],
            Direction::Down,
            (4, 4),
        );

        let result = engine.advance(&state).unwrap();
        assert_eq!(result.event, TickEvent::Collided);
    }

    #[test]
    fn test_collision_across_wrap() {
        let mut engine = seeded(3);
        let state = state_on(3, 3, &[(2, 0), (0, 0), (0, 1)], Direction::Right, (1, 2));

        let result = engine.advance(&state).unwrap();
        assert!(result.state.gameover);
    }

    #[test]
    fn test_board_filled_ends_game() {
        let mut engine = seeded(3);
        let state = state_on(3, 1, &[(1, 0), (0, 0)], Direction::Right, (2, 0));

        let result = engine.advance(&state).unwrap();

        assert_eq!(result.event, TickEvent::BoardFilled);
        assert!(result.state.gameover);
        assert_eq!(result.state.outcome, Some(GameOutcome::BoardFilled));
        assert_eq!(result.state.score, 1);
        assert_eq!(result.state.snake.len(), 3);
    }

    #[test]
    fn test_advance_after_game_over_is_an_error() {
        let mut engine = seeded(3);
        let mut state = state_on(5, 5, &[(2, 2), (1, 2)], Direction::Right, (0, 0));
        state.gameover = true;
        state.outcome = Some(GameOutcome::SelfCollision);

        let err = engine.advance(&state).unwrap_err();
        assert!(matches!(err, GameError::AdvanceAfterGameOver));
    }

    #[test]
    fn test_same_seed_same_food() {
        let mut first = GameEngine::new(GameConfig::default().with_seed(42));
        let mut second = GameEngine::new(GameConfig::default().with_seed(42));

        assert_eq!(first.new_game().unwrap(), second.new_game().unwrap());
    }
}
