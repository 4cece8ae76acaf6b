//! GUI module for line 'em up
//!
//! This module provides a native Rust GUI using egui/eframe.

mod app;
mod board_view;
mod game_state;
mod theme;

pub use app::LineEmUpApp;
pub use game_state::{GameOver, GameState, SeatKind, Settings};
