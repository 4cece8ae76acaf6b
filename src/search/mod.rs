//! Search module for line 'em up
//!
//! Contains:
//! - Minimax and alpha-beta over one shared recursive routine
//! - Per-depth visit counters
//! - Deadline guard with snapshot restore and random fallback

pub mod deadline;
pub mod searcher;
pub mod stats;

pub use deadline::{DeadlineGuard, Guarded};
pub use searcher::{AlphaBeta, Aborted, Minimax, Pruning, SearchResult, Searcher, Window};
pub use stats::EvalStats;
