//! NBA Player Stats Explorer - web-scraped per-game stats with filters,
//! CSV export and an intercorrelation heatmap.

use eframe::egui;
use nba_stats_explorer::config::{AppConfig, CONFIG_FILE_NAME};
use nba_stats_explorer::gui::ExplorerApp;
use std::path::Path;

fn main() -> eframe::Result<()> {
    env_logger::init();

    let config = match AppConfig::load(Path::new(CONFIG_FILE_NAME)) {
        Ok(config) => config,
        Err(e) => {
            log::error!("Ignoring {}: {}", CONFIG_FILE_NAME, e);
            AppConfig::default()
        }
    };

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 850.0])
            .with_min_inner_size([1000.0, 650.0])
            .with_title("NBA Player Stats Explorer"),
        ..Default::default()
    };

    eframe::run_native(
        "NBA Player Stats Explorer",
        options,
        Box::new(move |cc| Ok(Box::new(ExplorerApp::new(cc, config)))),
    )
}
