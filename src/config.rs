//! Configuration types for games and AI seats.
//!
//! Configurations are plain values with a builder-style API. They are
//! validated once, before any board exists, and stay immutable for the
//! lifetime of a game.
//!
//! # Examples
//!
//! ```
//! use line_em_up::{Algorithm, GameConfig, Player, SearchConfig, Seat};
//!
//! let config = GameConfig::new(4, 3)
//!     .with_random_blocks(2)
//!     .with_seat(Player::A, Seat::Ai(SearchConfig::new(Algorithm::AlphaBeta).with_depth(3)))
//!     .with_seat(Player::B, Seat::Human)
//!     .with_seed(7);
//! assert!(config.validate().is_ok());
//! ```

use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::board::board::{max_blocks, validate_dimensions};
use crate::board::{Board, Player, Pos};
use crate::error::ConfigError;

/// Tree search algorithm of an AI seat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Algorithm {
    Minimax,
    AlphaBeta,
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Algorithm::Minimax => write!(f, "minimax"),
            Algorithm::AlphaBeta => write!(f, "alphabeta"),
        }
    }
}

impl std::str::FromStr for Algorithm {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.to_ascii_lowercase().as_str() {
            "minimax" | "mm" => Ok(Algorithm::Minimax),
            "alphabeta" | "alpha-beta" | "ab" => Ok(Algorithm::AlphaBeta),
            _ => Err(format!(
                "invalid algorithm '{input}'. Expected one of: minimax, alphabeta"
            )),
        }
    }
}

/// Per-seat search parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    pub algorithm: Algorithm,
    /// Depth limit; `None` searches to the end of the game
    pub max_depth: Option<u32>,
    /// Wall-clock budget for one move
    pub time_budget: Duration,
}

impl SearchConfig {
    /// Defaults: depth 4, five-second budget
    pub fn new(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            max_depth: Some(4),
            time_budget: Duration::from_secs(5),
        }
    }

    pub fn with_depth(mut self, depth: u32) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Search without a depth limit
    pub fn exhaustive(mut self) -> Self {
        self.max_depth = None;
        self
    }

    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget = budget;
        self
    }

    /// Depth passed to the root call for `board`.
    ///
    /// Without a limit this is one more than the number of empty cells, so the
    /// heuristic cutoff is never reached before the game ends.
    pub fn depth_for(&self, board: &Board) -> u32 {
        self.max_depth
            .unwrap_or_else(|| board.empty_count() as u32 + 1)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self::new(Algorithm::AlphaBeta)
    }
}

/// Who controls a seat
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Seat {
    Human,
    Ai(SearchConfig),
}

impl Seat {
    pub fn is_ai(&self) -> bool {
        matches!(self, Seat::Ai(_))
    }

    pub fn search_config(&self) -> Option<&SearchConfig> {
        match self {
            Seat::Ai(config) => Some(config),
            Seat::Human => None,
        }
    }
}

/// How blocked cells are chosen for each new board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockSpec {
    /// Sample this many cells at random
    Random(usize),
    /// Use exactly these cells
    Explicit(Vec<Pos>),
}

impl BlockSpec {
    pub fn count(&self) -> usize {
        match self {
            BlockSpec::Random(count) => *count,
            BlockSpec::Explicit(cells) => cells.len(),
        }
    }
}

impl Default for BlockSpec {
    fn default() -> Self {
        BlockSpec::Random(0)
    }
}

/// Parameters of a game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Board side
    pub n: usize,
    /// Run length to win
    pub s: usize,
    pub blocks: BlockSpec,
    /// Seats indexed by `Player::index`
    pub seats: [Seat; 2],
    /// Show the AI's suggestion before a human moves
    pub recommend: bool,
    /// Search used for suggestions on human seats
    pub advisor: SearchConfig,
    /// Seed for block sampling and timeout fallbacks
    pub seed: Option<u64>,
}

impl GameConfig {
    /// Two alpha-beta seats, no blocks, recommendations on
    pub fn new(n: usize, s: usize) -> Self {
        Self {
            n,
            s,
            blocks: BlockSpec::default(),
            seats: [
                Seat::Ai(SearchConfig::default()),
                Seat::Ai(SearchConfig::default()),
            ],
            recommend: true,
            advisor: SearchConfig::default(),
            seed: None,
        }
    }

    pub fn with_random_blocks(mut self, count: usize) -> Self {
        self.blocks = BlockSpec::Random(count);
        self
    }

    pub fn with_blocks(mut self, cells: Vec<Pos>) -> Self {
        self.blocks = BlockSpec::Explicit(cells);
        self
    }

    pub fn with_seat(mut self, player: Player, seat: Seat) -> Self {
        self.seats[player.index()] = seat;
        self
    }

    pub fn with_recommend(mut self, recommend: bool) -> Self {
        self.recommend = recommend;
        self
    }

    pub fn with_advisor(mut self, advisor: SearchConfig) -> Self {
        self.advisor = advisor;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn seat(&self, player: Player) -> &Seat {
        &self.seats[player.index()]
    }

    /// Reject out-of-range parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_dimensions(self.n, self.s)?;

        let count = self.blocks.count();
        if count > max_blocks(self.n) {
            return Err(ConfigError::BlockCount {
                count,
                max: max_blocks(self.n),
            });
        }
        if let BlockSpec::Explicit(cells) = &self.blocks {
            for (i, pos) in cells.iter().enumerate() {
                if pos.x as usize >= self.n || pos.y as usize >= self.n {
                    return Err(ConfigError::BlockOutOfBounds {
                        x: i32::from(pos.x),
                        y: i32::from(pos.y),
                        n: self.n,
                    });
                }
                if cells[..i].contains(pos) {
                    return Err(ConfigError::DuplicateBlock { pos: *pos });
                }
            }
        }

        for player in [Player::A, Player::B] {
            if let Some(search) = self.seat(player).search_config() {
                if search.max_depth == Some(0) {
                    return Err(ConfigError::ZeroDepth { player });
                }
            }
        }
        if self.recommend && self.advisor.max_depth == Some(0) {
            return Err(ConfigError::ZeroDepth { player: Player::A });
        }
        Ok(())
    }

    /// Fresh board with blocks placed per `self.blocks`
    pub fn build_board<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Board, ConfigError> {
        match &self.blocks {
            BlockSpec::Random(count) => Board::with_random_blocks(self.n, self.s, *count, rng),
            BlockSpec::Explicit(cells) => Board::with_blocks(self.n, self.s, cells),
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new(3, 3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn test_board_size_out_of_range() {
        assert_eq!(
            GameConfig::new(2, 3).validate(),
            Err(ConfigError::BoardSize { n: 2 })
        );
        assert_eq!(
            GameConfig::new(11, 3).validate(),
            Err(ConfigError::BoardSize { n: 11 })
        );
    }

    #[test]
    fn test_run_length_out_of_range() {
        assert_eq!(
            GameConfig::new(5, 6).validate(),
            Err(ConfigError::RunLength { s: 6, n: 5 })
        );
        assert_eq!(
            GameConfig::new(5, 2).validate(),
            Err(ConfigError::RunLength { s: 2, n: 5 })
        );
    }

    #[test]
    fn test_too_many_blocks() {
        assert_eq!(
            GameConfig::new(4, 3).with_random_blocks(9).validate(),
            Err(ConfigError::BlockCount { count: 9, max: 8 })
        );
        assert!(GameConfig::new(4, 3).with_random_blocks(8).validate().is_ok());
    }

    #[test]
    fn test_explicit_block_checks() {
        let out_of_bounds = GameConfig::new(4, 3).with_blocks(vec![Pos::new(4, 0)]);
        assert!(matches!(
            out_of_bounds.validate(),
            Err(ConfigError::BlockOutOfBounds { x: 4, y: 0, n: 4 })
        ));

        let duplicate = GameConfig::new(4, 3).with_blocks(vec![Pos::new(1, 1), Pos::new(1, 1)]);
        assert_eq!(
            duplicate.validate(),
            Err(ConfigError::DuplicateBlock { pos: Pos::new(1, 1) })
        );
    }

    #[test]
    fn test_zero_depth_rejected() {
        let config = GameConfig::new(3, 3).with_seat(
            Player::B,
            Seat::Ai(SearchConfig::new(Algorithm::Minimax).with_depth(0)),
        );
        assert_eq!(
            config.validate(),
            Err(ConfigError::ZeroDepth { player: Player::B })
        );
    }

    #[test]
    fn test_algorithm_parsing() {
        assert_eq!("minimax".parse::<Algorithm>(), Ok(Algorithm::Minimax));
        assert_eq!("AlphaBeta".parse::<Algorithm>(), Ok(Algorithm::AlphaBeta));
        assert_eq!("ab".parse::<Algorithm>(), Ok(Algorithm::AlphaBeta));
        assert!("negamax".parse::<Algorithm>().is_err());
    }

    #[test]
    fn test_exhaustive_depth_covers_remaining_cells() {
        let board = Board::with_blocks(3, 3, &[Pos::new(1, 1)]).unwrap();
        let config = SearchConfig::new(Algorithm::Minimax).exhaustive();
        assert_eq!(config.depth_for(&board), 9);
        assert_eq!(SearchConfig::default().depth_for(&board), 4);
    }
}
