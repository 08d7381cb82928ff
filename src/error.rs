use thiserror::Error;

/// Configuration failures detected before a session starts.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid configuration: board dimensions must be positive, got {width}x{height}")]
    EmptyBoard { width: usize, height: usize },
    #[error("Invalid configuration: a {width}x{height} board exceeds the {max}-cell side limit or the address space")]
    BoardTooLarge { width: usize, height: usize, max: usize },
    #[error("Invalid configuration: {nb_bombs} mines requested but the board only has {capacity} cells")]
    TooManyMines { nb_bombs: usize, capacity: usize },
    #[error("Invalid configuration: mine at ({row}, {col}) lies outside the {width}x{height} board")]
    MineOutOfBounds { row: usize, col: usize, width: usize, height: usize },
}

pub type Result<T> = std::result::Result<T, GameError>;
