use std::collections::HashSet;

use super::direction::Direction;

/// A position on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position in a direction, without wrapping
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }

    /// Fold the position back onto the board, re-entering from the opposite edge
    pub fn wrapped(&self, board: BoardSize) -> Self {
        Self {
            x: self.x.rem_euclid(board.width as i32),
            y: self.y.rem_euclid(board.height as i32),
        }
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

/// Dimensions of the toroidal board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoardSize {
    pub width: usize,
    pub height: usize,
}

impl BoardSize {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < self.width as i32 && pos.y >= 0 && pos.y < self.height as i32
    }

    pub fn cell_count(&self) -> usize {
        self.width * self.height
    }

    /// Every cell of the board, row by row
    pub fn cells(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.height).flat_map(move |y| {
            (0..self.width).map(move |x| Position::new(x as i32, y as i32))
        })
    }

    pub fn center(&self) -> Position {
        Position::new((self.width / 2) as i32, (self.height / 2) as i32)
    }
}

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at index 0
    pub body: Vec<Position>,
}

impl Snake {
    /// Lay out `length` segments starting at `head` and stepping towards
    /// `trailing`, wrapping around the board edges.
    pub fn new(head: Position, trailing: Direction, length: usize, board: BoardSize) -> Self {
        let mut body = Vec::with_capacity(length.max(1));
        let mut segment = head.wrapped(board);
        body.push(segment);

        for _ in 1..length {
            segment = segment.moved_in_direction(trailing).wrapped(board);
            body.push(segment);
        }

        Self { body }
    }

    /// Build a snake from explicit segments, head first
    pub fn from_segments<I, P>(segments: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Position>,
    {
        Self {
            body: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Get the tail position (last segment)
    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    /// Get body segments (excluding head)
    pub fn body_segments(&self) -> &[Position] {
        &self.body[1..]
    }

    /// Check if position collides with snake body (excluding head)
    pub fn collides_with_body(&self, pos: Position) -> bool {
        self.body_segments().contains(&pos)
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Put the head on `new_head`, dropping the tail unless the snake grows
    pub fn move_to(&mut self, new_head: Position, should_grow: bool) {
        self.body.insert(0, new_head);

        if !should_grow {
            self.body.pop();
        }
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Check if the snake is empty (should never happen in practice)
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Why a game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    /// The head ran into the body
    SelfCollision,
    /// The snake covers every cell, so no food can be placed
    BoardFilled,
}

/// Complete game state for one tick
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub board: BoardSize,
    pub snake: Snake,
    pub food: Position,
    pub score: u32,
    /// Heading used by the next tick
    pub direction: Direction,
    pub gameover: bool,
    pub outcome: Option<GameOutcome>,
    pub steps: u32,
}

impl GameState {
    /// Create a new game state
    pub fn new(board: BoardSize, snake: Snake, food: Position, direction: Direction) -> Self {
        Self {
            board,
            snake,
            food,
            score: 0,
            direction,
            gameover: false,
            outcome: None,
            steps: 0,
        }
    }

    /// Check if a position is occupied by the snake
    pub fn is_occupied_by_snake(&self, pos: Position) -> bool {
        self.snake.contains(pos)
    }

    /// Where the head lands next tick given the current heading
    pub fn projected_head(&self) -> Position {
        self.snake
            .head()
            .moved_in_direction(self.direction)
            .wrapped(self.board)
    }

    /// Cells not covered by the snake
    pub fn free_cells(&self) -> Vec<Position> {
        let occupied: HashSet<Position> = self.snake.body.iter().copied().collect();
        self.board
            .cells()
            .filter(|pos| !occupied.contains(pos))
            .collect()
    }

    /// Check the data-model invariants
    pub fn is_consistent(&self) -> bool {
        if self.board.width == 0 || self.board.height == 0 || self.snake.is_empty() {
            return false;
        }
        if !self.snake.body.iter().all(|pos| self.board.contains(*pos)) {
            return false;
        }
        if self.gameover != self.outcome.is_some() {
            return false;
        }
        if self.gameover {
            return true;
        }

        let unique: HashSet<Position> = self.snake.body.iter().copied().collect();
        unique.len() == self.snake.len()
            && self.board.contains(self.food)
            && !self.snake.contains(self.food)
    }
}
