//! Line 'em up: a generalized m,n,k game with a game-tree search AI
//!
//! Two players take turns placing marks on an n×n board (3 ≤ n ≤ 10) that may
//! contain pre-placed blocked cells. The first to line up `s` marks in a row,
//! column or diagonal wins; a full board without such a run is a tie.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//! - [`board`]: Board representation with bitboards
//! - [`rules`]: Line enumeration and win/tie detection
//! - [`eval`]: Heuristic scores used at the search cutoff
//! - [`search`]: Minimax and alpha-beta search, visit counters, deadline guard
//! - [`engine`]: Per-seat AI engine combining the above
//! - [`game`]: Turn controller and game loop
//! - [`trace`] and [`scoreboard`]: structured records and batch statistics
//! - [`ui`]: egui front end
//!
//! # Quick Start
//!
//! ```
//! use line_em_up::{AIEngine, Algorithm, Board, Player, Pos, SearchConfig};
//!
//! let mut board = Board::new(3, 3).unwrap();
//! board.place(Pos::new(1, 1), Player::A);
//! board.set_active_player(Player::B);
//!
//! // Full-depth search from here: optimal play ends in a tie
//! let config = SearchConfig::new(Algorithm::AlphaBeta).exhaustive();
//! let mut engine = AIEngine::with_seed(config, 0);
//! let result = engine.get_move_with_stats(&mut board);
//! assert_eq!(result.value, Some(0.0));
//!
//! if let Some(pos) = result.best_move {
//!     board.place(pos, Player::B);
//!     println!("AI plays at {pos}");
//! }
//! ```

pub mod board;
pub mod config;
pub mod engine;
pub mod error;
pub mod eval;
pub mod game;
pub mod rules;
pub mod scoreboard;
pub mod search;
pub mod trace;
pub mod ui;

// Re-export commonly used types for convenience
pub use board::{Board, Cell, Player, Pos};
pub use config::{Algorithm, BlockSpec, GameConfig, SearchConfig, Seat};
pub use engine::{AIEngine, MoveResult, SearchType};
pub use error::{ConfigError, Error, MoveError, Result};
pub use game::{Game, HumanInput, MoveOutcome, TurnState};
pub use rules::TerminalStatus;
pub use scoreboard::Scoreboard;
pub use trace::{GameSummary, MoveTrace, TraceSink};
