//! Evaluation module for line 'em up positions
//!
//! Heuristic scores replace exhaustive lookahead once the search reaches its
//! cutoff depth.

pub mod heuristic;

pub use heuristic::{Evaluator, LineHeuristic, RowColumnHeuristic, TurnKeyedEvaluator};
