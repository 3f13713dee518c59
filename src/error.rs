use thiserror::Error;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("advance called on a finished game")]
    AdvanceAfterGameOver,
    #[error("invalid game configuration: {0}")]
    InvalidConfig(String),
    #[error("no free cell left on the board for food")]
    NoFreeCell,
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("malformed config file: {0}")]
    ConfigFormat(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GameError>;
