//! Board rendering for the line 'em up GUI

use egui::{Color32, CornerRadius, Painter, Pos2, Rect, Sense, Stroke, Vec2};

use crate::{Board, Cell, Player, Pos};

use super::theme::*;

/// Board view handles rendering and input for the game board
pub struct BoardView {
    /// Cached cell size for coordinate calculations
    cell_size: f32,
    /// Board drawing area
    board_rect: Rect,
    /// Board side of the last frame
    n: usize,
}

impl Default for BoardView {
    fn default() -> Self {
        Self {
            cell_size: 60.0,
            board_rect: Rect::NOTHING,
            n: 3,
        }
    }
}

impl BoardView {
    /// Render the board and return click position if any
    #[allow(clippy::too_many_arguments)]
    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        board: &Board,
        current_turn: Player,
        last_move: Option<Pos>,
        suggested_move: Option<Pos>,
        winning_run: Option<&[Pos]>,
        accepts_input: bool,
    ) -> Option<Pos> {
        let available_size = ui.available_size();

        // Square cells fitted to the available space
        let board_size = available_size.x.min(available_size.y) - 20.0;
        self.n = board.size();
        self.cell_size = (board_size - 2.0 * BOARD_MARGIN) / self.n as f32;

        let (response, painter) =
            ui.allocate_painter(Vec2::new(board_size, board_size), Sense::click());
        self.board_rect = response.rect;

        painter.rect_filled(self.board_rect, CornerRadius::same(4), BOARD_BG);
        self.draw_coordinates(&painter);
        self.draw_cells(&painter, board);

        if let Some(pos) = last_move {
            self.draw_last_move_marker(&painter, pos);
        }
        if let Some(run) = winning_run {
            self.draw_winning_run(&painter, run);
        }
        if let Some(pos) = suggested_move {
            self.draw_suggestion(&painter, pos, current_turn);
        }

        let mut clicked_pos = None;
        if accepts_input {
            if let Some(pointer_pos) = response.hover_pos() {
                if let Some(board_pos) = self.screen_to_board(pointer_pos) {
                    let is_valid = board.is_empty(board_pos);
                    self.draw_hover_preview(&painter, board_pos, current_turn, is_valid);

                    if response.clicked() && is_valid {
                        clicked_pos = Some(board_pos);
                    }
                }
            }
        }
        clicked_pos
    }

    /// Column numbers (x) along the top, row numbers (y) along the left
    fn draw_coordinates(&self, painter: &Painter) {
        let font = egui::FontId::proportional(13.0);
        for i in 0..self.n {
            let offset = BOARD_MARGIN + (i as f32 + 0.5) * self.cell_size;

            let top = Pos2::new(self.board_rect.min.x + offset, self.board_rect.min.y + BOARD_MARGIN * 0.5);
            painter.text(top, egui::Align2::CENTER_CENTER, i.to_string(), font.clone(), GRID_LINE);

            let left = Pos2::new(self.board_rect.min.x + BOARD_MARGIN * 0.5, self.board_rect.min.y + offset);
            painter.text(left, egui::Align2::CENTER_CENTER, i.to_string(), font.clone(), GRID_LINE);
        }
    }

    /// Draw every cell with its content
    fn draw_cells(&self, painter: &Painter, board: &Board) {
        for x in 0..self.n {
            for y in 0..self.n {
                let pos = Pos::new(x as u8, y as u8);
                let rect = self.cell_rect(pos);
                match board.get(pos) {
                    Cell::Blocked => self.draw_blocked(painter, rect),
                    cell => {
                        painter.rect_filled(rect, CornerRadius::same(3), CELL_BG);
                        if let Some(player) = cell.owner() {
                            self.draw_mark(painter, rect.center(), player);
                        }
                    }
                }
            }
        }
    }

    fn draw_blocked(&self, painter: &Painter, rect: Rect) {
        painter.rect_filled(rect, CornerRadius::same(3), BLOCKED_CELL);
        let inset = rect.shrink(rect.width() * 0.25);
        let stroke = Stroke::new(3.0, BLOCKED_CROSS);
        painter.line_segment([inset.left_top(), inset.right_bottom()], stroke);
        painter.line_segment([inset.right_top(), inset.left_bottom()], stroke);
    }

    /// `A` is a hollow ring, `B` a filled disc
    fn draw_mark(&self, painter: &Painter, center: Pos2, player: Player) {
        let radius = self.cell_size * MARK_RADIUS_RATIO;
        let shadow_offset = Vec2::new(2.0, 2.0);

        match player {
            Player::A => {
                painter.circle_stroke(
                    center + shadow_offset,
                    radius,
                    Stroke::new(radius * 0.3, Color32::from_rgba_unmultiplied(0, 0, 0, 40)),
                );
                painter.circle_stroke(center, radius, Stroke::new(radius * 0.3, MARK_A));
                painter.circle_stroke(center, radius * 0.82, Stroke::new(1.0, MARK_A_SHADOW));
            }
            Player::B => {
                painter.circle_filled(
                    center + shadow_offset,
                    radius,
                    Color32::from_rgba_unmultiplied(0, 0, 0, 60),
                );
                painter.circle_filled(center, radius, MARK_B);
                let highlight_offset = Vec2::new(-radius * 0.3, -radius * 0.3);
                painter.circle_filled(center + highlight_offset, radius * 0.2, MARK_B_HIGHLIGHT);
            }
        }
    }

    fn draw_last_move_marker(&self, painter: &Painter, pos: Pos) {
        let rect = self.cell_rect(pos);
        let corner = rect.right_top() + Vec2::new(-8.0, 8.0);
        painter.circle_filled(corner, LAST_MOVE_MARKER_RADIUS, LAST_MOVE_MARKER);
    }

    fn draw_winning_run(&self, painter: &Painter, run: &[Pos]) {
        let stroke = Stroke::new(4.0, WIN_HIGHLIGHT);
        for pair in run.windows(2) {
            let start = self.board_to_screen(pair[0]);
            let end = self.board_to_screen(pair[1]);
            painter.line_segment([start, end], stroke);
        }
        for pos in run {
            let radius = self.cell_size * MARK_RADIUS_RATIO + 5.0;
            painter.circle_stroke(self.board_to_screen(*pos), radius, stroke);
        }
    }

    fn draw_suggestion(&self, painter: &Painter, pos: Pos, turn: Player) {
        let center = self.board_to_screen(pos);
        let radius = self.cell_size * MARK_RADIUS_RATIO;
        let (fill, text) = match turn {
            Player::A => (Color32::from_rgba_unmultiplied(240, 240, 240, 100), MARK_B),
            Player::B => (Color32::from_rgba_unmultiplied(20, 20, 20, 100), MARK_A),
        };
        painter.circle_filled(center, radius, fill);
        painter.text(
            center,
            egui::Align2::CENTER_CENTER,
            "?",
            egui::FontId::proportional(radius),
            text,
        );
    }

    fn draw_hover_preview(&self, painter: &Painter, pos: Pos, turn: Player, is_valid: bool) {
        let center = self.board_to_screen(pos);
        let radius = self.cell_size * MARK_RADIUS_RATIO;
        let color = if !is_valid {
            hover_invalid()
        } else {
            match turn {
                Player::A => Color32::from_rgba_unmultiplied(240, 240, 240, 80),
                Player::B => hover_valid(),
            }
        };
        painter.circle_filled(center, radius, color);
    }

    fn cell_rect(&self, pos: Pos) -> Rect {
        let min = self.board_rect.min
            + Vec2::new(
                BOARD_MARGIN + pos.x as f32 * self.cell_size,
                BOARD_MARGIN + pos.y as f32 * self.cell_size,
            );
        Rect::from_min_size(min, Vec2::splat(self.cell_size)).shrink(CELL_GAP * 0.5)
    }

    /// Convert screen coordinates to board position
    pub fn screen_to_board(&self, screen_pos: Pos2) -> Option<Pos> {
        let relative = screen_pos - self.board_rect.min;
        let x = ((relative.x - BOARD_MARGIN) / self.cell_size).floor() as i32;
        let y = ((relative.y - BOARD_MARGIN) / self.cell_size).floor() as i32;

        if Pos::is_valid(x, y, self.n) {
            Some(Pos::new(x as u8, y as u8))
        } else {
            None
        }
    }

    /// Center of a cell on screen
    pub fn board_to_screen(&self, pos: Pos) -> Pos2 {
        self.cell_rect(pos).center()
    }
}
