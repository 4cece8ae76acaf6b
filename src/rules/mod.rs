//! Game rules for line 'em up
//!
//! This module implements:
//! - Line enumeration (rows, columns, diagonals, anti-diagonals)
//! - Win and tie detection for a run length `s`

pub mod lines;
pub mod win;

// Re-exports for convenient access
pub use lines::{all_lines, anti_diagonals, columns, diagonals, rows, Line, Orientation, RunScan};
pub use win::{terminal_status, winning_run, TerminalStatus};
