//! Main application for the line 'em up GUI

use eframe::egui;
use egui::{CentralPanel, Context, CornerRadius, Frame, RichText, SidePanel, TopBottomPanel, Vec2};

use super::board_view::BoardView;
use super::game_state::{GameOver, GameState, SeatKind, Settings};
use super::theme::*;
use crate::{Algorithm, ConfigError, Player, SearchType, TerminalStatus};

/// Main line 'em up application
pub struct LineEmUpApp {
    state: GameState,
    board_view: BoardView,
    show_debug: bool,
}

impl LineEmUpApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Result<Self, ConfigError> {
        Ok(Self {
            state: GameState::new(Settings::default())?,
            board_view: BoardView::default(),
            show_debug: true,
        })
    }

    /// Render the top menu bar
    fn render_menu_bar(&mut self, ctx: &Context) {
        TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("Game", |ui| {
                    if ui.button("New Game (N)").clicked() {
                        self.state.new_game();
                        ui.close_menu();
                    }
                    if ui.button("Replay Board (R)").clicked() {
                        self.state.reset();
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Hint (H)").clicked() {
                        self.state.request_suggestion();
                        ui.close_menu();
                    }
                });

                ui.menu_button("View", |ui| {
                    ui.checkbox(&mut self.show_debug, "Debug Panel (D)");
                });

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let board = self.state.game.board();
                    ui.label(format!(
                        "{}x{} board, {} in a row, {} blocked",
                        board.size(),
                        board.size(),
                        board.run_length(),
                        board.blocked_count()
                    ));
                });
            });
        });
    }

    /// Render the side panel with game info and settings
    fn render_side_panel(&mut self, ctx: &Context) {
        SidePanel::right("info_panel")
            .min_width(260.0)
            .max_width(300.0)
            .frame(Frame::new().fill(PANEL_BG))
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    ui.add_space(12.0);
                    self.render_title_card(ui);
                    ui.add_space(12.0);

                    self.render_turn_card(ui);
                    ui.add_space(10.0);

                    self.render_timer_card(ui);
                    ui.add_space(10.0);

                    if let Some(result) = self.state.game_over.clone() {
                        self.render_game_over_card(ui, &result);
                        ui.add_space(10.0);
                    }

                    self.render_settings_card(ui);
                    ui.add_space(10.0);

                    self.render_scoreboard_card(ui);

                    if self.show_debug {
                        ui.add_space(10.0);
                        self.render_debug_card(ui);
                    }

                    if let Some(msg) = &self.state.message {
                        ui.add_space(10.0);
                        Self::render_message_card(ui, msg);
                    }
                });
            });
    }

    /// Helper to create a card frame
    fn card_frame() -> Frame {
        Frame::new()
            .fill(CARD_BG)
            .corner_radius(CornerRadius::same(8))
            .inner_margin(12.0)
    }

    fn render_title_card(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.add_space(8.0);
            ui.label(RichText::new("◦•").size(20.0).color(TEXT_SECONDARY));
            ui.add_space(4.0);
            ui.label(RichText::new("LINE 'EM UP").size(22.0).strong().color(TEXT_PRIMARY));
        });
    }

    fn render_turn_card(&self, ui: &mut egui::Ui) {
        Self::card_frame().show(ui, |ui| {
            let player = self.state.current_turn();
            let (accent, glyph_color) = match player {
                Player::A => (egui::Color32::from_rgb(220, 220, 225), egui::Color32::from_rgb(30, 30, 35)),
                Player::B => (egui::Color32::from_rgb(70, 70, 75), TEXT_PRIMARY),
            };

            ui.horizontal(|ui| {
                let (rect, _) = ui.allocate_exact_size(Vec2::new(48.0, 48.0), egui::Sense::hover());
                ui.painter().circle_filled(rect.center(), 22.0, accent);
                ui.painter().text(
                    rect.center(),
                    egui::Align2::CENTER_CENTER,
                    player.glyph(),
                    egui::FontId::proportional(28.0),
                    glyph_color,
                );

                ui.add_space(12.0);

                ui.vertical(|ui| {
                    ui.add_space(4.0);
                    ui.label(RichText::new(format!("PLAYER {player}")).size(18.0).strong().color(TEXT_PRIMARY));

                    let status = if self.state.game_over.is_some() {
                        ("Game Over", WIN_HIGHLIGHT)
                    } else if self.state.is_ai_turn() {
                        ("AI thinking...", TIMER_WARNING)
                    } else {
                        ("Your turn", TIMER_NORMAL)
                    };
                    ui.label(RichText::new(status.0).size(12.0).color(status.1));
                });
            });

            ui.add_space(6.0);
            ui.label(
                RichText::new(format!("Move #{}", self.state.game.ply()))
                    .size(11.0)
                    .color(TEXT_SECONDARY),
            );
        });
    }

    fn render_timer_card(&self, ui: &mut egui::Ui) {
        Self::card_frame().show(ui, |ui| {
            ui.label(RichText::new("TIMER").size(10.0).color(TEXT_MUTED));
            ui.add_space(6.0);

            if let Some(elapsed) = self.state.ai_thinking_elapsed() {
                let secs = elapsed.as_secs_f32();
                let budget = self
                    .state
                    .ai_budget()
                    .map_or(f32::INFINITY, |budget| budget.as_secs_f32());
                let color = if secs < budget * 0.5 {
                    TIMER_NORMAL
                } else if secs < budget * 0.9 {
                    TIMER_WARNING
                } else {
                    TIMER_CRITICAL
                };
                ui.label(RichText::new(format!("{secs:.2}s")).size(28.0).strong().color(color));
            } else {
                let elapsed = self.state.move_timer.elapsed();
                ui.label(
                    RichText::new(format!("{:.1}s", elapsed.as_secs_f32()))
                        .size(24.0)
                        .color(TEXT_PRIMARY),
                );
            }

            if let Some(ai_time) = self.state.move_timer.ai_thinking_time {
                ui.add_space(4.0);
                ui.label(
                    RichText::new(format!("Last search: {:.3}s", ai_time.as_secs_f32()))
                        .size(10.0)
                        .color(TEXT_SECONDARY),
                );
            }
        });
    }

    fn render_settings_card(&mut self, ui: &mut egui::Ui) {
        Self::card_frame().show(ui, |ui| {
            ui.label(RichText::new("NEXT GAME").size(10.0).color(TEXT_MUTED));
            ui.add_space(6.0);

            let settings = &mut self.state.settings;
            ui.add(egui::Slider::new(&mut settings.n, 3..=10).text("board size"));
            let n = settings.n;
            ui.add(egui::Slider::new(&mut settings.s, 3..=n).text("run length"));
            ui.add(egui::Slider::new(&mut settings.blocks, 0..=2 * n).text("blocked cells"));
            ui.checkbox(&mut settings.recommend, "Recommend moves to humans");

            for player in [Player::A, Player::B] {
                let i = player.index();
                ui.add_space(6.0);
                ui.label(RichText::new(format!("Player {player}")).strong().color(TEXT_PRIMARY));
                ui.horizontal(|ui| {
                    ui.radio_value(&mut settings.seats[i], SeatKind::Human, "Human");
                    ui.radio_value(&mut settings.seats[i], SeatKind::Ai, "AI");
                });
                ui.horizontal(|ui| {
                    ui.radio_value(&mut settings.algorithms[i], Algorithm::Minimax, "Minimax");
                    ui.radio_value(&mut settings.algorithms[i], Algorithm::AlphaBeta, "Alpha-beta");
                });
                ui.checkbox(&mut settings.exhaustive[i], "Search to the end");
                if !settings.exhaustive[i] {
                    ui.add(egui::Slider::new(&mut settings.depths[i], 1..=10).text("depth"));
                }
                ui.add(
                    egui::Slider::new(&mut settings.budget_secs[i], 0.1..=30.0)
                        .text("seconds")
                        .logarithmic(true),
                );
            }

            ui.add_space(8.0);
            if ui.button("Start").clicked() {
                self.state.new_game();
            }
        });
    }

    fn render_scoreboard_card(&self, ui: &mut egui::Ui) {
        let scoreboard = &self.state.scoreboard;
        if scoreboard.games == 0 {
            return;
        }
        Self::card_frame().show(ui, |ui| {
            ui.label(RichText::new("SCOREBOARD").size(10.0).color(TEXT_MUTED));
            ui.add_space(6.0);
            for player in [Player::A, Player::B] {
                ui.label(
                    RichText::new(format!(
                        "{player}: {} wins ({:.0}%)",
                        scoreboard.wins[player.index()],
                        scoreboard.win_rate(player) * 100.0
                    ))
                    .size(12.0)
                    .color(TEXT_PRIMARY),
                );
            }
            ui.label(
                RichText::new(format!(
                    "Ties: {}, average moves: {:.1}",
                    scoreboard.ties,
                    scoreboard.average_plies()
                ))
                .size(11.0)
                .color(TEXT_SECONDARY),
            );
        });
    }

    fn render_debug_card(&self, ui: &mut egui::Ui) {
        Frame::new()
            .fill(egui::Color32::from_rgb(30, 33, 38))
            .corner_radius(CornerRadius::same(8))
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.label(RichText::new("AI DEBUG").size(10.0).color(TEXT_MUTED));
                ui.add_space(6.0);

                let Some(result) = &self.state.last_ai_result else {
                    ui.label(RichText::new("Waiting for AI...").size(10.0).color(TEXT_MUTED));
                    return;
                };

                let type_color = if result.search_type == SearchType::RandomFallback {
                    TIMER_CRITICAL
                } else {
                    TIMER_NORMAL
                };
                ui.horizontal(|ui| {
                    ui.vertical(|ui| {
                        ui.label(RichText::new(format!("{:?}", result.search_type)).size(11.0).strong().color(type_color));
                        let value = result.value.map_or_else(|| "-".to_string(), |v| format!("{v}"));
                        ui.label(RichText::new(format!("Value: {value}")).size(10.0).color(TEXT_SECONDARY));
                        ui.label(RichText::new(format!("Depth: {}", result.depth)).size(10.0).color(TEXT_SECONDARY));
                    });
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::TOP), |ui| {
                        ui.vertical(|ui| {
                            ui.label(RichText::new(format!("{}ms", result.time_ms)).size(10.0).color(TEXT_SECONDARY));
                            ui.label(RichText::new(format!("{} nodes", result.nodes)).size(10.0).color(TEXT_MUTED));
                            ui.label(RichText::new(format!("{} evals", result.evaluations())).size(10.0).color(TEXT_MUTED));
                        });
                    });
                });

                for (depth, count) in result.stats.per_depth().iter().rev() {
                    ui.label(RichText::new(format!("  depth {depth}: {count}")).size(10.0).color(TEXT_MUTED));
                }

                if let Some(pos) = result.best_move {
                    ui.add_space(4.0);
                    ui.label(RichText::new(format!("→ {pos}")).size(12.0).strong().color(WIN_HIGHLIGHT));
                }
            });
    }

    fn render_game_over_card(&mut self, ui: &mut egui::Ui, result: &GameOver) {
        let headline = match result.status {
            TerminalStatus::Win(player) => format!("PLAYER {player} WINS!"),
            _ => "IT'S A TIE".to_string(),
        };

        Frame::new()
            .fill(egui::Color32::from_rgb(45, 80, 55))
            .corner_radius(CornerRadius::same(8))
            .inner_margin(16.0)
            .show(ui, |ui| {
                ui.vertical_centered(|ui| {
                    ui.label(RichText::new("GAME OVER").size(12.0).color(egui::Color32::from_rgb(180, 255, 180)));
                    ui.add_space(8.0);
                    ui.label(RichText::new(headline).size(18.0).strong().color(TEXT_PRIMARY));
                    ui.add_space(4.0);
                    ui.label(
                        RichText::new(format!("after {} moves", self.state.game.ply()))
                            .size(11.0)
                            .color(TEXT_SECONDARY),
                    );
                    ui.add_space(12.0);

                    Frame::new()
                        .fill(egui::Color32::from_rgb(60, 100, 70))
                        .corner_radius(CornerRadius::same(6))
                        .inner_margin(10.0)
                        .show(ui, |ui| {
                            let label = egui::Label::new(
                                RichText::new("Play Again").size(14.0).strong().color(TEXT_PRIMARY),
                            );
                            if ui.add(label.sense(egui::Sense::click())).clicked() {
                                self.state.reset();
                            }
                        });
                });
            });
    }

    fn render_message_card(ui: &mut egui::Ui, msg: &str) {
        Frame::new()
            .fill(egui::Color32::from_rgb(80, 60, 30))
            .corner_radius(CornerRadius::same(8))
            .inner_margin(10.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.label(RichText::new("⚠").size(14.0));
                    ui.add_space(4.0);
                    ui.label(RichText::new(msg).size(11.0).color(TEXT_PRIMARY));
                });
            });
    }

    /// Render the main board
    fn render_board(&mut self, ctx: &Context) {
        CentralPanel::default()
            .frame(Frame::new().fill(BOARD_AREA_BG).inner_margin(10.0))
            .show(ctx, |ui| {
                let winning_run = self
                    .state
                    .game_over
                    .as_ref()
                    .and_then(|over| over.winning_run.as_deref());

                let clicked = self.board_view.show(
                    ui,
                    self.state.game.board(),
                    self.state.current_turn(),
                    self.state.last_move,
                    self.state.suggested_move,
                    winning_run,
                    self.state.is_human_turn(),
                );

                if let Some(pos) = clicked {
                    if let Err(msg) = self.state.try_place(pos) {
                        self.state.message = Some(msg);
                    }
                }
            });
    }

    /// Handle keyboard shortcuts
    fn handle_input(&mut self, ctx: &Context) {
        let (debug, hint, replay, new_game) = ctx.input(|i| {
            (
                i.key_pressed(egui::Key::D),
                i.key_pressed(egui::Key::H),
                i.key_pressed(egui::Key::R),
                i.key_pressed(egui::Key::N),
            )
        });
        if debug {
            self.show_debug = !self.show_debug;
        }
        if hint {
            self.state.request_suggestion();
        }
        if replay {
            self.state.reset();
        }
        if new_game {
            self.state.new_game();
        }
    }
}

impl eframe::App for LineEmUpApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.handle_input(ctx);

        self.state.check_ai_result();

        if !self.state.is_ai_thinking() {
            if self.state.is_ai_turn() {
                self.state.start_ai_thinking();
            } else if self.state.is_human_turn() {
                self.state.auto_recommend();
            }
        }

        self.render_menu_bar(ctx);
        self.render_side_panel(ctx);
        self.render_board(ctx);

        // Keep polling the worker and ticking the timer
        if self.state.is_ai_thinking() {
            ctx.request_repaint();
        } else if self.state.game_over.is_none() {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }
    }
}
