//! Wall-clock budget around one move's search
//!
//! The guard snapshots the board, hands the search a deadline and, when the
//! search reports [`Aborted`], restores the snapshot wholesale instead of
//! trusting whatever undo work the unwound recursion managed to do. A uniformly
//! random legal move of the snapshot is then substituted for the search result.

use std::time::{Duration, Instant};

use rand::seq::SliceRandom;
use rand::Rng;

use crate::board::{Board, Pos};

use super::searcher::{Aborted, SearchResult};

/// Outcome of a guarded search
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Guarded {
    /// The search finished inside the budget
    Completed(SearchResult),
    /// The budget ran out; `fallback` is a random legal move of the
    /// pre-search board (`None` only when that board had no empty cell)
    TimedOut {
        fallback: Option<Pos>,
        /// Deepest ply the search reached before the deadline
        deepest_ply: u32,
    },
}

impl Guarded {
    pub fn timed_out(&self) -> bool {
        matches!(self, Guarded::TimedOut { .. })
    }

    /// Move to play, whichever way it was obtained
    pub fn best_move(&self) -> Option<Pos> {
        match self {
            Guarded::Completed(result) => result.best_move,
            Guarded::TimedOut { fallback, .. } => *fallback,
        }
    }

    /// Search value, when the search completed
    pub fn value(&self) -> Option<f64> {
        match self {
            Guarded::Completed(result) => Some(result.value),
            Guarded::TimedOut { .. } => None,
        }
    }
}

/// Per-move time budget with snapshot restore and random fallback
#[derive(Debug, Clone, Copy)]
pub struct DeadlineGuard {
    budget: Duration,
}

impl DeadlineGuard {
    pub fn new(budget: Duration) -> Self {
        Self { budget }
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }

    /// Run `search` against `board` with a deadline `budget` from now.
    ///
    /// `search` receives the deadline to poll; a budget too large to represent
    /// as an `Instant` means no deadline. On return the board equals the
    /// pre-search board in both outcomes.
    pub fn run<R, F>(&self, board: &mut Board, rng: &mut R, search: F) -> Guarded
    where
        R: Rng + ?Sized,
        F: FnOnce(&mut Board, Option<Instant>) -> Result<SearchResult, Aborted>,
    {
        let snapshot = board.clone();
        let start = Instant::now();
        let deadline = start.checked_add(self.budget);

        match search(board, deadline) {
            Ok(result) => {
                debug_assert!(*board == snapshot, "search left the board modified");
                Guarded::Completed(result)
            }
            Err(Aborted { deepest_ply }) => {
                *board = snapshot;
                let fallback = board.legal_moves().choose(rng).copied();
                log::warn!(
                    "search exceeded {:.3}s budget after {:.3}s at ply {}, playing random move {}",
                    self.budget.as_secs_f64(),
                    start.elapsed().as_secs_f64(),
                    deepest_ply,
                    fallback.map_or_else(|| "none".to_string(), |pos| pos.to_string()),
                );
                Guarded::TimedOut {
                    fallback,
                    deepest_ply,
                }
            }
        }
    }
}

impl Default for DeadlineGuard {
    fn default() -> Self {
        Self::new(Duration::from_secs(5))
    }
}
