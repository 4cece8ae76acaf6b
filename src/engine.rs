//! AI engine for one seat
//!
//! Combines a seat's [`SearchConfig`], the [`Searcher`] and the
//! [`DeadlineGuard`] into a single call that returns the move to play along
//! with the statistics the trace layer records.
//!
//! The search always maximizes for `Player::B`, so the root is a maximizing
//! node exactly when B is to move.
//!
//! # Example
//!
//! ```
//! use line_em_up::{AIEngine, Algorithm, Board, Player, Pos, SearchConfig};
//!
//! let mut engine = AIEngine::new(SearchConfig::new(Algorithm::AlphaBeta).with_depth(2));
//! let mut board = Board::new(3, 3).unwrap();
//! board.place(Pos::new(1, 1), Player::A);
//! board.set_active_player(Player::B);
//!
//! let result = engine.get_move_with_stats(&mut board);
//! assert!(result.best_move.is_some());
//! println!("Search type: {:?}", result.search_type);
//! println!("Time: {}ms", result.time_ms);
//! ```

use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::board::{Board, Player, Pos};
use crate::config::{Algorithm, SearchConfig};
use crate::search::{DeadlineGuard, EvalStats, Guarded, Searcher};

/// How the returned move was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchType {
    /// Completed minimax search
    Minimax,
    /// Completed alpha-beta search
    AlphaBeta,
    /// Deadline expired; uniformly random legal move
    RandomFallback,
}

impl From<Algorithm> for SearchType {
    fn from(algorithm: Algorithm) -> Self {
        match algorithm {
            Algorithm::Minimax => SearchType::Minimax,
            Algorithm::AlphaBeta => SearchType::AlphaBeta,
        }
    }
}

/// Result of a move search with detailed statistics.
#[derive(Debug, Clone)]
pub struct MoveResult {
    /// Move to play; `None` only on a board without empty cells
    pub best_move: Option<Pos>,
    /// Search value of the root, absent after a timeout
    pub value: Option<f64>,
    pub search_type: SearchType,
    /// Root depth the search was started with
    pub depth: u32,
    pub elapsed: Duration,
    /// Elapsed time in milliseconds
    pub time_ms: u64,
    /// Nodes entered, including aborted work
    pub nodes: u64,
    /// Visits per remaining depth
    pub stats: EvalStats,
    /// Deepest ply below the root that was entered
    pub deepest_ply: u32,
}

impl MoveResult {
    pub fn timed_out(&self) -> bool {
        self.search_type == SearchType::RandomFallback
    }

    /// Total heuristic-search visits of this move
    pub fn evaluations(&self) -> u64 {
        self.stats.total()
    }
}

/// Search engine bound to one seat's configuration.
pub struct AIEngine {
    config: SearchConfig,
    searcher: Searcher,
    guard: DeadlineGuard,
    rng: StdRng,
}

impl AIEngine {
    /// Engine with an entropy-seeded fallback generator
    pub fn new(config: SearchConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Engine with a reproducible fallback generator
    pub fn with_seed(config: SearchConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: SearchConfig, rng: StdRng) -> Self {
        Self {
            guard: DeadlineGuard::new(config.time_budget),
            config,
            searcher: Searcher::default(),
            rng,
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Best move for the player whose turn it is on `board`
    pub fn get_move(&mut self, board: &mut Board) -> Option<Pos> {
        self.get_move_with_stats(board).best_move
    }

    /// Search the position and report how the move was found.
    ///
    /// The board is identical to the input when this returns.
    pub fn get_move_with_stats(&mut self, board: &mut Board) -> MoveResult {
        let start = Instant::now();
        let algorithm = self.config.algorithm;
        let depth = self.config.depth_for(board);
        let maximizing = board.active_player() == Player::B;

        self.searcher.reset();
        let searcher = &mut self.searcher;
        let outcome = self.guard.run(board, &mut self.rng, |board, deadline| {
            searcher.set_deadline(deadline);
            searcher.run(algorithm, board, depth, maximizing)
        });

        let (best_move, value, search_type) = match outcome {
            Guarded::Completed(result) => match result.best_move {
                Some(pos) => (Some(pos), Some(result.value), SearchType::from(algorithm)),
                // Terminal or exhausted root: nothing was searched below it
                None => (
                    board.legal_moves().choose(&mut self.rng).copied(),
                    Some(result.value),
                    SearchType::RandomFallback,
                ),
            },
            Guarded::TimedOut { fallback, .. } => (fallback, None, SearchType::RandomFallback),
        };

        let elapsed = start.elapsed();
        log::debug!(
            "{} depth {} for {}: move {:?}, value {:?}, {} nodes, {} evaluations in {:.3}s",
            algorithm,
            depth,
            board.active_player(),
            best_move,
            value,
            self.searcher.nodes(),
            self.searcher.stats().total(),
            elapsed.as_secs_f64(),
        );

        MoveResult {
            best_move,
            value,
            search_type,
            depth,
            elapsed,
            time_ms: elapsed.as_millis() as u64,
            nodes: self.searcher.nodes(),
            stats: self.searcher.take_stats(),
            deepest_ply: self.searcher.deepest_ply(),
        }
    }
}
