//! Line 'em up GUI
//!
//! A graphical interface for playing line 'em up against the AI or another player.

use line_em_up::ui::LineEmUpApp;

fn main() -> Result<(), eframe::Error> {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 750.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("Line 'em up"),
        ..Default::default()
    };

    eframe::run_native(
        "Line 'em up",
        options,
        Box::new(|cc| Ok(Box::new(LineEmUpApp::new(cc)?))),
    )
}
