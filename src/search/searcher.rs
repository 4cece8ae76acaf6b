//! Depth-limited minimax and alpha-beta search
//!
//! Both algorithms share one recursive routine, [`Searcher::search`], which is
//! parameterized by a [`Pruning`] strategy:
//!
//! - [`Minimax`] visits every child and charges the visit counter before the
//!   depth-zero cutoff test
//! - [`AlphaBeta`] keeps an `(alpha, beta)` window, skips remaining siblings
//!   once the window closes, and charges the visit counter after the cutoff test
//!
//! The search always maximizes for `Player::B` and minimizes for `Player::A`.
//! Terminal leaves are worth `-1` (A wins), `0` (tie) and `+1` (B wins); at the
//! cutoff depth the evaluator's score is returned instead.
//!
//! The board is mutated in place: every speculative `place` is undone with
//! `clear` before the parent looks at the next move.
//!
//! # Example
//!
//! ```
//! use line_em_up::{Board, Player, Pos};
//! use line_em_up::search::Searcher;
//!
//! let mut board = Board::new(3, 3).unwrap();
//! for (x, y) in [(0, 0), (2, 0), (0, 1), (2, 2)] {
//!     board.place(Pos::new(x, y), Player::A);
//! }
//! for (x, y) in [(1, 0), (1, 1), (2, 1)] {
//!     board.place(Pos::new(x, y), Player::B);
//! }
//!
//! // B completes column x = 1; searched to the end of the game
//! let depth = board.empty_count() as u32 + 1;
//! let mut searcher = Searcher::default();
//! let result = searcher.alphabeta(&mut board, depth, true).unwrap();
//! assert_eq!(result.value, 1.0);
//! assert_eq!(result.best_move, Some(Pos::new(1, 2)));
//! ```

use std::time::Instant;

use crate::board::{Board, Player, Pos};
use crate::config::Algorithm;
use crate::eval::{Evaluator, TurnKeyedEvaluator};
use crate::rules::TerminalStatus;

use super::stats::EvalStats;

/// Deadline is polled on every node whose count matches this mask
const TIME_CHECK_MASK: u64 = 63;

/// Value and move chosen at one node
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchResult {
    /// -1 / 0 / +1 at terminal leaves, heuristic score at the cutoff
    pub value: f64,
    /// `None` only at leaves
    pub best_move: Option<Pos>,
}

impl SearchResult {
    #[inline]
    fn leaf(value: f64) -> Self {
        Self {
            value,
            best_move: None,
        }
    }
}

/// The deadline passed before the search finished.
///
/// The board is left wherever the recursion stopped; callers restore their own
/// snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Aborted {
    /// Deepest ply below the root entered before the abort
    pub deepest_ply: u32,
}

/// Search window carried down the tree
#[derive(Debug, Clone, Copy)]
pub struct Window {
    pub alpha: f64,
    pub beta: f64,
}

impl Window {
    pub const FULL: Window = Window {
        alpha: f64::NEG_INFINITY,
        beta: f64::INFINITY,
    };
}

/// Sibling-pruning strategy of the shared search routine
pub trait Pruning {
    const ALGORITHM: Algorithm;

    /// Whether a visit is recorded before the depth-zero cutoff test
    const COUNT_BEFORE_CUTOFF: bool;

    /// Update the window after a child; `true` skips the remaining siblings.
    fn prune(window: &mut Window, best: f64, maximizing: bool) -> bool;
}

/// Plain minimax: every child is explored
#[derive(Debug, Clone, Copy, Default)]
pub struct Minimax;

impl Pruning for Minimax {
    const ALGORITHM: Algorithm = Algorithm::Minimax;
    const COUNT_BEFORE_CUTOFF: bool = true;

    #[inline]
    fn prune(_window: &mut Window, _best: f64, _maximizing: bool) -> bool {
        false
    }
}

/// Alpha-beta pruning
#[derive(Debug, Clone, Copy, Default)]
pub struct AlphaBeta;

impl Pruning for AlphaBeta {
    const ALGORITHM: Algorithm = Algorithm::AlphaBeta;
    const COUNT_BEFORE_CUTOFF: bool = false;

    #[inline]
    fn prune(window: &mut Window, best: f64, maximizing: bool) -> bool {
        if maximizing {
            if best >= window.beta {
                return true;
            }
            window.alpha = window.alpha.max(best);
        } else {
            if best <= window.alpha {
                return true;
            }
            window.beta = window.beta.min(best);
        }
        false
    }
}

/// Recursive game-tree searcher with visit instrumentation.
pub struct Searcher<E = TurnKeyedEvaluator> {
    evaluator: E,
    stats: EvalStats,
    nodes: u64,
    root_depth: u32,
    deepest_ply: u32,
    deadline: Option<Instant>,
}

impl Default for Searcher<TurnKeyedEvaluator> {
    fn default() -> Self {
        Self::new(TurnKeyedEvaluator)
    }
}

impl<E: Evaluator> Searcher<E> {
    pub fn new(evaluator: E) -> Self {
        Self {
            evaluator,
            stats: EvalStats::new(),
            nodes: 0,
            root_depth: 0,
            deepest_ply: 0,
            deadline: None,
        }
    }

    /// Abort the next search once `deadline` has passed (`None` disables it)
    pub fn set_deadline(&mut self, deadline: Option<Instant>) {
        self.deadline = deadline;
    }

    /// Forget the counters of the previous move
    pub fn reset(&mut self) {
        self.stats.clear();
        self.nodes = 0;
        self.deepest_ply = 0;
    }

    /// Visit counters of the searches since the last `reset`
    pub fn stats(&self) -> &EvalStats {
        &self.stats
    }

    pub fn take_stats(&mut self) -> EvalStats {
        std::mem::take(&mut self.stats)
    }

    /// Nodes entered since the last `reset`
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    /// Deepest ply below the root that was entered
    pub fn deepest_ply(&self) -> u32 {
        self.deepest_ply
    }

    pub fn minimax(
        &mut self,
        board: &mut Board,
        depth: u32,
        maximizing: bool,
    ) -> Result<SearchResult, Aborted> {
        self.search::<Minimax>(board, depth, maximizing)
    }

    pub fn alphabeta(
        &mut self,
        board: &mut Board,
        depth: u32,
        maximizing: bool,
    ) -> Result<SearchResult, Aborted> {
        self.search::<AlphaBeta>(board, depth, maximizing)
    }

    /// Dispatch on a runtime algorithm choice
    pub fn run(
        &mut self,
        algorithm: Algorithm,
        board: &mut Board,
        depth: u32,
        maximizing: bool,
    ) -> Result<SearchResult, Aborted> {
        match algorithm {
            Algorithm::Minimax => self.minimax(board, depth, maximizing),
            Algorithm::AlphaBeta => self.alphabeta(board, depth, maximizing),
        }
    }

    /// Search `depth` plies from `board` with the full window.
    ///
    /// Counters accumulate until `reset`. On success the board is exactly
    /// as it was on entry.
    pub fn search<P: Pruning>(
        &mut self,
        board: &mut Board,
        depth: u32,
        maximizing: bool,
    ) -> Result<SearchResult, Aborted> {
        self.root_depth = depth;
        let result = self.node::<P>(board, depth, Window::FULL, maximizing);
        if result.is_ok() {
            log::trace!(
                "{} depth {}: {} nodes, {} visits",
                P::ALGORITHM,
                depth,
                self.nodes,
                self.stats.total()
            );
        }
        result
    }

    #[inline]
    fn check_deadline(&self) -> Result<(), Aborted> {
        if self.nodes & TIME_CHECK_MASK == 0 {
            if let Some(deadline) = self.deadline {
                if Instant::now() >= deadline {
                    return Err(Aborted {
                        deepest_ply: self.deepest_ply,
                    });
                }
            }
        }
        Ok(())
    }

    fn node<P: Pruning>(
        &mut self,
        board: &mut Board,
        depth: u32,
        mut window: Window,
        maximizing: bool,
    ) -> Result<SearchResult, Aborted> {
        self.check_deadline()?;
        self.nodes += 1;
        self.deepest_ply = self.deepest_ply.max(self.root_depth - depth);

        if P::COUNT_BEFORE_CUTOFF {
            self.stats.record(depth);
        }
        if depth == 0 {
            return Ok(SearchResult::leaf(self.evaluator.evaluate(board)));
        }
        if !P::COUNT_BEFORE_CUTOFF {
            self.stats.record(depth);
        }

        match board.terminal_status() {
            TerminalStatus::Win(Player::A) => return Ok(SearchResult::leaf(-1.0)),
            TerminalStatus::Win(Player::B) => return Ok(SearchResult::leaf(1.0)),
            TerminalStatus::Tie => return Ok(SearchResult::leaf(0.0)),
            TerminalStatus::InProgress => {}
        }

        let (mover, mut best) = if maximizing {
            (Player::B, SearchResult::leaf(f64::NEG_INFINITY))
        } else {
            (Player::A, SearchResult::leaf(f64::INFINITY))
        };

        let empty = board.empty_cells();
        debug_assert!(!empty.is_empty(), "non-terminal board without legal moves");

        let n = board.size();
        for idx in empty.iter_ones() {
            let pos = Pos::from_index(idx, n);
            board.place(pos, mover);
            let child = self.node::<P>(board, depth - 1, window, !maximizing)?;
            board.clear(pos);

            let improves = if maximizing {
                child.value > best.value
            } else {
                child.value < best.value
            };
            if improves {
                best = SearchResult {
                    value: child.value,
                    best_move: Some(pos),
                };
            }

            if P::prune(&mut window, best.value, maximizing) {
                return Ok(best);
            }
        }
        Ok(best)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::RowColumnHeuristic;

    fn board_from(n: usize, s: usize, a: &[(u8, u8)], b: &[(u8, u8)]) -> Board {
        let mut board = Board::new(n, s).unwrap();
        for &(x, y) in a {
            board.place(Pos::new(x, y), Player::A);
        }
        for &(x, y) in b {
            board.place(Pos::new(x, y), Player::B);
        }
        board
    }

    /// Two empty cells, (0, 2) and (1, 2); B wins at (1, 2)
    fn near_end() -> Board {
        board_from(3, 3, &[(0, 0), (2, 0), (0, 1), (2, 2)], &[(1, 0), (1, 1), (2, 1)])
    }

    #[test]
    fn test_terminal_values() {
        let mut searcher = Searcher::default();

        let mut a_won = board_from(3, 3, &[(0, 0), (0, 1), (0, 2)], &[(1, 0), (1, 1)]);
        let result = searcher.minimax(&mut a_won, 3, true).unwrap();
        assert_eq!(result, SearchResult { value: -1.0, best_move: None });

        let mut b_won = board_from(3, 3, &[(0, 0), (1, 1)], &[(2, 0), (2, 1), (2, 2)]);
        let result = searcher.alphabeta(&mut b_won, 3, false).unwrap();
        assert_eq!(result, SearchResult { value: 1.0, best_move: None });
    }

    #[test]
    fn test_finds_immediate_win_for_minimizer() {
        // A to move completes column x = 0; the win is seen one ply below
        let mut board = board_from(3, 3, &[(0, 0), (0, 1)], &[(1, 1), (2, 2)]);
        let mut searcher = Searcher::default();
        let result = searcher.minimax(&mut board, 2, false).unwrap();
        assert_eq!(result.value, -1.0);
        assert_eq!(result.best_move, Some(Pos::new(0, 2)));
    }

    #[test]
    fn test_board_restored_after_search() {
        let mut board = board_from(4, 3, &[(1, 1)], &[(2, 2)]);
        let before = board.clone();
        let mut searcher = Searcher::default();
        searcher.minimax(&mut board, 3, true).unwrap();
        assert_eq!(board, before);
        searcher.alphabeta(&mut board, 3, true).unwrap();
        assert_eq!(board, before);
    }

    #[test]
    fn test_depth_zero_returns_heuristic() {
        let mut board = board_from(4, 3, &[(0, 0), (1, 1)], &[(3, 3)]);
        let mut searcher = Searcher::new(RowColumnHeuristic);
        let result = searcher.minimax(&mut board, 0, true).unwrap();
        assert_eq!(result, SearchResult { value: 2.0, best_move: None });
    }

    #[test]
    fn test_minimax_counts_cutoff_visits() {
        // 2 empty cells, depth 1: root + 2 leaves at depth 0
        let mut board = near_end();
        let mut searcher = Searcher::default();
        searcher.minimax(&mut board, 1, true).unwrap();
        assert_eq!(searcher.stats().get(1), 1);
        assert_eq!(searcher.stats().get(0), 2);
        assert_eq!(searcher.nodes(), 3);
    }

    #[test]
    fn test_alphabeta_skips_cutoff_visits() {
        let mut board = near_end();
        let mut searcher = Searcher::default();
        searcher.alphabeta(&mut board, 1, true).unwrap();
        assert_eq!(searcher.stats().get(1), 1);
        assert_eq!(searcher.stats().get(0), 0);
    }

    #[test]
    fn test_alphabeta_matches_minimax() {
        let positions = [
            board_from(3, 3, &[(1, 1)], &[]),
            board_from(3, 3, &[(0, 0)], &[(1, 1)]),
            board_from(3, 3, &[(0, 0), (2, 2)], &[(1, 1)]),
            near_end(),
        ];
        for start in positions {
            for maximizing in [true, false] {
                let depth = start.empty_count() as u32 + 1;
                let mut mm_board = start.clone();
                let mut ab_board = start.clone();
                let mut mm = Searcher::default();
                let mut ab = Searcher::default();

                let mm_result = mm.minimax(&mut mm_board, depth, maximizing).unwrap();
                let ab_result = ab.alphabeta(&mut ab_board, depth, maximizing).unwrap();

                assert_eq!(mm_result.value, ab_result.value);
                assert!(ab.stats().total() <= mm.stats().total());
                assert!(ab.nodes() <= mm.nodes());
            }
        }
    }

    #[test]
    fn test_exhaustive_search_near_end() {
        let mut board = near_end();
        let mut searcher = Searcher::default();
        let result = searcher.minimax(&mut board, 3, true).unwrap();
        assert_eq!(result.value, 1.0);
        assert_eq!(result.best_move, Some(Pos::new(1, 2)));

        // A to move completes column x = 0 first
        let result = searcher.minimax(&mut board, 3, false).unwrap();
        assert_eq!(result.value, -1.0);
        assert_eq!(result.best_move, Some(Pos::new(0, 2)));
    }

    #[test]
    fn test_ties_keep_first_move_in_scan_order() {
        // With A's turn keying the evaluator every reply scores the same
        let mut board = Board::new(3, 3).unwrap();
        let mut searcher = Searcher::default();
        let result = searcher.minimax(&mut board, 1, true).unwrap();
        assert_eq!(result.value, -2.0);
        assert_eq!(result.best_move, Some(Pos::new(0, 0)));
    }

    #[test]
    fn test_expired_deadline_aborts() {
        let mut board = Board::new(4, 3).unwrap();
        let mut searcher = Searcher::default();
        searcher.set_deadline(Some(Instant::now()));
        assert_eq!(
            searcher.minimax(&mut board, 3, false),
            Err(Aborted { deepest_ply: 0 })
        );
    }

    #[test]
    fn test_deepest_ply_tracks_recursion() {
        let mut board = Board::new(3, 3).unwrap();
        let mut searcher = Searcher::default();
        searcher.alphabeta(&mut board, 2, false).unwrap();
        assert_eq!(searcher.deepest_ply(), 2);
    }
}
