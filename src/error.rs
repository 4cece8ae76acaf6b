//! Error types for the line 'em up crate

use thiserror::Error;

use crate::board::{Player, Pos};

/// Invalid construction parameters. Always reported before any game state exists.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("invalid board size {n}: n should be in the range [3..10]")]
    BoardSize { n: usize },

    #[error("invalid block count {count}: b should be in the range [0..{max}]")]
    BlockCount { count: usize, max: usize },

    #[error("invalid run length {s}: s should be in the range [3..{n}]")]
    RunLength { s: usize, n: usize },

    #[error("blocked cell ({x}, {y}) is outside the {n}x{n} board")]
    BlockOutOfBounds { x: i32, y: i32, n: usize },

    #[error("blocked cell {pos} is listed more than once")]
    DuplicateBlock { pos: Pos },

    #[error("search depth for player {player} must be at least 1")]
    ZeroDepth { player: Player },

    #[error("invalid coordinate '{input}' (expected format: 'x,y')")]
    ParsePosition { input: String },

    #[error("coordinate ({x}, {y}) is outside the largest {max}x{max} board")]
    PositionOutOfRange { x: u8, y: u8, max: usize },
}

/// Rejected move. Recoverable: the caller asks again.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum MoveError {
    #[error("the move ({x}, {y}) is not valid")]
    Illegal { x: i32, y: i32 },

    #[error("game already over")]
    GameOver,

    #[error("player {player} is not controlled by a human")]
    NotHumanTurn { player: Player },

    #[error("player {player} is not controlled by the AI")]
    NotAiTurn { player: Player },
}

/// Main error type for the crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Move(#[from] MoveError),

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "write trace record".to_string(),
            source,
        }
    }
}
