//! Theme constants for the line 'em up GUI

use egui::Color32;

// Board colors
pub const BOARD_BG: Color32 = Color32::from_rgb(222, 184, 135);
pub const CELL_BG: Color32 = Color32::from_rgb(236, 204, 160);
pub const GRID_LINE: Color32 = Color32::from_rgb(60, 40, 20);

// Marks
pub const MARK_A: Color32 = Color32::from_rgb(250, 250, 252);
pub const MARK_A_SHADOW: Color32 = Color32::from_rgb(190, 190, 195);
pub const MARK_B: Color32 = Color32::from_rgb(25, 25, 30);
pub const MARK_B_HIGHLIGHT: Color32 = Color32::from_rgb(70, 70, 80);
pub const BLOCKED_CELL: Color32 = Color32::from_rgb(95, 70, 50);
pub const BLOCKED_CROSS: Color32 = Color32::from_rgb(160, 130, 100);

// Markers
pub const LAST_MOVE_MARKER: Color32 = Color32::from_rgb(230, 60, 60);
pub const WIN_HIGHLIGHT: Color32 = Color32::from_rgb(50, 220, 50);

pub fn hover_valid() -> Color32 {
    Color32::from_rgba_unmultiplied(80, 80, 80, 100)
}

pub fn hover_invalid() -> Color32 {
    Color32::from_rgba_unmultiplied(255, 50, 50, 100)
}

// Panel colors
pub const PANEL_BG: Color32 = Color32::from_rgb(25, 27, 31);
pub const CARD_BG: Color32 = Color32::from_rgb(35, 38, 43);
pub const BOARD_AREA_BG: Color32 = Color32::from_rgb(40, 42, 46);
pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(240, 240, 245);
pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(160, 165, 175);
pub const TEXT_MUTED: Color32 = Color32::from_rgb(120, 125, 135);

// Timer colors
pub const TIMER_NORMAL: Color32 = Color32::from_rgb(80, 200, 120);
pub const TIMER_WARNING: Color32 = Color32::from_rgb(255, 180, 50);
pub const TIMER_CRITICAL: Color32 = Color32::from_rgb(255, 70, 70);

// Sizes
pub const BOARD_MARGIN: f32 = 32.0;
pub const CELL_GAP: f32 = 3.0;
pub const MARK_RADIUS_RATIO: f32 = 0.36;
pub const LAST_MOVE_MARKER_RADIUS: f32 = 4.0;
