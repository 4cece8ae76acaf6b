//! Board representation for line 'em up

pub mod bitboard;
pub mod board;


// Re-exports
pub use bitboard::Bitboard;
pub use board::Board;

use serde::{Deserialize, Serialize};

/// Smallest supported board side
pub const MIN_SIZE: usize = 3;
/// Largest supported board side (10x10 = 100 cells fits one u128)
pub const MAX_SIZE: usize = 10;
pub const MAX_CELLS: usize = MAX_SIZE * MAX_SIZE; // 100

/// The two seats of a game.
///
/// `A` plays `◦` and moves first by convention, `B` plays `•`.
/// The search always maximizes for `B` and minimizes for `A`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    A,
    B,
}

impl Player {
    /// Get the other seat
    #[inline]
    pub fn opponent(self) -> Player {
        match self {
            Player::A => Player::B,
            Player::B => Player::A,
        }
    }

    /// Cell state written by this player
    #[inline]
    pub fn mark(self) -> Cell {
        match self {
            Player::A => Cell::PlayerA,
            Player::B => Cell::PlayerB,
        }
    }

    /// Seat index (A = 0, B = 1)
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Player::A => 0,
            Player::B => 1,
        }
    }

    pub fn glyph(self) -> char {
        self.mark().glyph()
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.glyph())
    }
}

/// State of a single cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    PlayerA,
    PlayerB,
    Blocked,
}

impl Cell {
    /// Owner of the mark, if the cell holds one
    #[inline]
    pub fn owner(self) -> Option<Player> {
        match self {
            Cell::PlayerA => Some(Player::A),
            Cell::PlayerB => Some(Player::B),
            Cell::Empty | Cell::Blocked => None,
        }
    }

    /// Signed value used by the heuristics (+1 for A, -1 for B)
    #[inline]
    pub fn sign(self) -> i64 {
        match self {
            Cell::PlayerA => 1,
            Cell::PlayerB => -1,
            Cell::Empty | Cell::Blocked => 0,
        }
    }

    pub fn glyph(self) -> char {
        match self {
            Cell::Empty => '□',
            Cell::PlayerA => '◦',
            Cell::PlayerB => '•',
            Cell::Blocked => '⊠',
        }
    }
}

/// Position on the board.
///
/// `x` selects the column and `y` the row of the rendered grid. Ordering is
/// x-major, which is the scan order used by move generation and search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Pos {
    pub x: u8,
    pub y: u8,
}

impl Pos {
    #[inline]
    pub fn new(x: u8, y: u8) -> Self {
        debug_assert!((x as usize) < MAX_SIZE && (y as usize) < MAX_SIZE);
        Self { x, y }
    }

    /// Linear index on a board of side `n`
    #[inline]
    pub fn to_index(self, n: usize) -> usize {
        self.x as usize * n + self.y as usize
    }

    #[inline]
    pub fn from_index(idx: usize, n: usize) -> Self {
        Self {
            x: (idx / n) as u8,
            y: (idx % n) as u8,
        }
    }

    /// Check signed coordinates against a board of side `n`
    #[inline]
    pub fn is_valid(x: i32, y: i32, n: usize) -> bool {
        x >= 0 && (x as usize) < n && y >= 0 && (y as usize) < n
    }
}

impl std::fmt::Display for Pos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl std::str::FromStr for Pos {
    type Err = crate::error::ConfigError;

    /// Parse `"x,y"` (whitespace around either number is ignored)
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let err = || crate::error::ConfigError::ParsePosition {
            input: input.to_string(),
        };
        let (x, y) = input.split_once(',').ok_or_else(err)?;
        let x: u8 = x.trim().parse().map_err(|_| err())?;
        let y: u8 = y.trim().parse().map_err(|_| err())?;
        if x as usize >= MAX_SIZE || y as usize >= MAX_SIZE {
            return Err(crate::error::ConfigError::PositionOutOfRange {
                x,
                y,
                max: MAX_SIZE,
            });
        }
        Ok(Pos { x, y })
    }
}
