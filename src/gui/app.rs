//! NBA Player Stats Explorer Main Application
//! Main window with control panel, stats table and heatmap.

use crate::config::AppConfig;
use crate::data::{
    load_stats, CsvExporter, DataLoader, DataProcessor, Stage, StatsFetcher, EXPORT_FILE_NAME,
};
use crate::gui::{ControlPanel, ControlPanelAction, HeatmapViewer, TableViewer};
use crate::charts::HeatmapRenderer;
use crate::stats::StatsCalculator;
use anyhow::Context;
use egui::{RichText, SidePanel};
use polars::prelude::DataFrame;
use std::collections::HashMap;
use std::sync::mpsc::{channel, Receiver};
use std::thread;

const TABLE_HEIGHT: f32 = 380.0;

/// Season loading result from background thread
enum LoadResult {
    Progress(String),
    Complete {
        year: i32,
        stage: Stage,
        df: DataFrame,
    },
    Error {
        year: i32,
        stage: Stage,
        message: String,
    },
}

/// Main application window.
pub struct ExplorerApp {
    config: AppConfig,
    loader: DataLoader,
    cache: HashMap<(i32, Stage), DataFrame>,
    filtered: Option<DataFrame>,

    control_panel: ControlPanel,
    table_viewer: TableViewer,
    heatmap_viewer: HeatmapViewer,

    // Async season loading
    load_rx: Option<Receiver<LoadResult>>,
    is_loading: bool,
}

impl ExplorerApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: AppConfig) -> Self {
        let mut app = Self::with_config(config);
        app.handle_source_changed();
        app
    }

    fn with_config(config: AppConfig) -> Self {
        let control_panel = ControlPanel::new(config.years(), config.positions.clone());
        Self {
            config,
            loader: DataLoader::new(),
            cache: HashMap::new(),
            filtered: None,
            control_panel,
            table_viewer: TableViewer::new(),
            heatmap_viewer: HeatmapViewer::new(),
            load_rx: None,
            is_loading: false,
        }
    }

    /// Year or stage changed: serve from cache or load in the background.
    fn handle_source_changed(&mut self) {
        let settings = self.control_panel.settings();
        let (year, stage) = (settings.year, settings.stage);

        if !self.config.contains_year(year) {
            self.control_panel.set_progress(
                0.0,
                &format!(
                    "Error: {} is outside {}-{}",
                    year, self.config.first_year, self.config.last_year
                ),
            );
            return;
        }

        if let Some(df) = self.cache.get(&(year, stage)).cloned() {
            log::debug!("Serving {} {} from cache", year, stage);
            // Any in-flight load is for another season
            self.load_rx = None;
            self.is_loading = false;
            self.apply_loaded(df, year, stage);
            return;
        }

        self.table_viewer.clear();
        self.heatmap_viewer.clear();
        self.filtered = None;
        self.control_panel.has_data = false;
        self.control_panel.has_heatmap = false;
        self.control_panel
            .set_progress(10.0, &format!("Loading {} {}...", year, stage));
        self.is_loading = true;

        // A newer request replaces the receiver; stale results are dropped
        let (tx, rx) = channel();
        self.load_rx = Some(rx);
        let source = self.config.source.clone();

        thread::spawn(move || {
            let _ = tx.send(LoadResult::Progress(format!(
                "Downloading {} {} per-game stats...",
                year, stage
            )));

            let result = StatsFetcher::new(&source)
                .context("creating HTTP client")
                .and_then(|fetcher| {
                    load_stats(&fetcher, year, stage)
                        .with_context(|| format!("loading {} {} stats", year, stage))
                });

            match result {
                Ok(df) => {
                    let _ = tx.send(LoadResult::Complete { year, stage, df });
                }
                Err(e) => {
                    log::error!("{:#}", e);
                    let _ = tx.send(LoadResult::Error {
                        year,
                        stage,
                        message: format!("{:#}", e),
                    });
                }
            }
        });
    }

    fn is_selected(&self, year: i32, stage: Stage) -> bool {
        self.control_panel.year == year && self.control_panel.stage == stage
    }

    /// Check for season loading results
    fn check_load_results(&mut self) {
        let rx = self.load_rx.take();
        if let Some(rx) = rx {
            let mut should_keep_receiver = true;

            while let Ok(result) = rx.try_recv() {
                match result {
                    LoadResult::Progress(status) => {
                        self.control_panel.set_progress(40.0, &status);
                    }
                    LoadResult::Complete { year, stage, df } => {
                        self.cache.insert((year, stage), df.clone());
                        if self.is_selected(year, stage) {
                            self.apply_loaded(df, year, stage);
                            self.is_loading = false;
                            should_keep_receiver = false;
                        } else {
                            log::debug!("Cached {} {} without showing it", year, stage);
                        }
                    }
                    LoadResult::Error {
                        year,
                        stage,
                        message,
                    } => {
                        if self.is_selected(year, stage) {
                            self.control_panel
                                .set_progress(0.0, &format!("Error: {}", message));
                            self.is_loading = false;
                            should_keep_receiver = false;
                        }
                    }
                }
            }

            if should_keep_receiver {
                self.load_rx = Some(rx);
            }
        }
    }

    fn apply_loaded(&mut self, df: DataFrame, year: i32, stage: Stage) {
        let rows = df.height();
        self.loader.set_dataframe(df, year, stage);
        self.control_panel.update_teams(self.loader.get_teams());
        self.control_panel.set_progress(
            100.0,
            &format!("Loaded {} {}: {} players", year, stage, rows),
        );
        self.handle_filter_changed();
    }

    /// Re-apply team/position filters to the loaded table.
    fn handle_filter_changed(&mut self) {
        self.heatmap_viewer.clear();
        self.control_panel.has_heatmap = false;

        let Some(df) = self.loader.get_dataframe() else {
            return;
        };
        let settings = self.control_panel.settings();

        match DataProcessor::filter_by_team_and_position(df, &settings.teams, &settings.positions)
        {
            Ok(filtered) => {
                self.table_viewer.set_table(&filtered);
                self.filtered = Some(filtered);
            }
            Err(e) => {
                log::error!("Filter failed: {}", e);
                self.control_panel
                    .set_progress(0.0, &format!("Error: filtering failed: {}", e));
            }
        }
    }

    fn handle_show_heatmap(&mut self) {
        let Some(df) = &self.filtered else {
            self.control_panel.set_progress(0.0, "No data loaded");
            return;
        };

        match StatsCalculator::correlation_matrix(df) {
            Ok(matrix) if matrix.len() >= 2 => {
                log::info!("Showing {}x{} correlation heatmap", matrix.len(), matrix.len());
                self.heatmap_viewer.set_matrix(matrix);
                self.control_panel.has_heatmap = true;
            }
            Ok(_) => {
                self.control_panel
                    .set_progress(0.0, "Heatmap needs at least two numeric columns");
            }
            Err(e) => {
                self.control_panel
                    .set_progress(0.0, &format!("Error: correlation failed: {}", e));
            }
        }
    }

    fn handle_download_csv(&mut self) {
        let Some(df) = &self.filtered else {
            return;
        };

        let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .set_file_name(EXPORT_FILE_NAME)
            .save_file()
        else {
            return; // User cancelled
        };

        match CsvExporter::write_csv(df, &path) {
            Ok(()) => {
                self.control_panel.set_progress(
                    100.0,
                    &format!("Saved {} rows to {}", df.height(), path.display()),
                );
                self.control_panel.last_export = Some(path);
            }
            Err(e) => {
                log::error!("CSV export failed: {}", e);
                self.control_panel
                    .set_progress(0.0, &format!("Error: {}", e));
            }
        }
    }

    fn handle_copy_link(&mut self, ctx: &egui::Context) {
        let Some(df) = &self.filtered else {
            return;
        };

        match CsvExporter::download_link(df) {
            Ok(link) => {
                ctx.copy_text(link);
                self.control_panel
                    .set_progress(100.0, "Download link copied to clipboard");
            }
            Err(e) => {
                self.control_panel
                    .set_progress(0.0, &format!("Error: {}", e));
            }
        }
    }

    fn handle_save_heatmap(&mut self) {
        let Some(matrix) = &self.heatmap_viewer.matrix else {
            return;
        };

        let Some(path) = rfd::FileDialog::new()
            .add_filter("PNG Image", &["png"])
            .set_file_name("correlation_heatmap.png")
            .save_file()
        else {
            return;
        };

        let (width, height) = (self.config.heatmap.width, self.config.heatmap.height);
        match HeatmapRenderer::save_png(matrix, &path, width, height) {
            Ok(()) => {
                self.control_panel
                    .set_progress(100.0, &format!("Saved heatmap to {}", path.display()));
                self.control_panel.last_export = Some(path);
            }
            Err(e) => {
                log::error!("Heatmap export failed: {}", e);
                self.control_panel
                    .set_progress(0.0, &format!("Error: {}", e));
            }
        }
    }

    fn handle_open_export(&mut self) {
        if let Some(path) = self.control_panel.last_export.clone() {
            if let Err(e) = open::that(&path) {
                self.control_panel
                    .set_progress(0.0, &format!("Error: cannot open {}: {}", path.display(), e));
            }
        }
    }

    fn show_header(ui: &mut egui::Ui) {
        ui.label(RichText::new("NBA Player Stats Explorer").size(26.0).strong());
        ui.add_space(4.0);
        ui.label("This app performs simple web-scraping of NBA player stats data!");
        ui.horizontal(|ui| {
            ui.label("Data source:");
            ui.hyperlink_to(
                "Basketball-reference.com",
                "https://www.basketball-reference.com/",
            );
        });
        ui.add_space(10.0);
    }
}

impl eframe::App for ExplorerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check for background results
        self.check_load_results();

        // Request repaint while loading
        if self.is_loading {
            ctx.request_repaint();
        }

        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(280.0)
            .max_width(340.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui);

                    match action {
                        ControlPanelAction::SourceChanged => self.handle_source_changed(),
                        ControlPanelAction::FilterChanged => self.handle_filter_changed(),
                        ControlPanelAction::ShowHeatmap => self.handle_show_heatmap(),
                        ControlPanelAction::DownloadCsv => self.handle_download_csv(),
                        ControlPanelAction::CopyLink => self.handle_copy_link(ctx),
                        ControlPanelAction::SaveHeatmap => self.handle_save_heatmap(),
                        ControlPanelAction::OpenExport => self.handle_open_export(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - table and heatmap
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                Self::show_header(ui);

                ui.label(
                    RichText::new("Display Player Stats of Selected Team(s)")
                        .size(18.0)
                        .strong(),
                );
                ui.add_space(6.0);

                if self.is_loading {
                    ui.spinner();
                } else {
                    self.table_viewer.show(ui, TABLE_HEIGHT);
                }

                self.heatmap_viewer.show(ui);
            });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{parse_stats_table, TEAM_COL};

    fn loaded_app() -> ExplorerApp {
        let html = r#"<table>
            <tr><th>Rk</th><th>Player</th><th>Pos</th><th>Age</th><th>Tm</th><th>PTS</th><th>AST</th></tr>
            <tr><th>1</th><td>A</td><td>C</td><td>24</td><td>BOS</td><td>20.1</td><td>1.5</td></tr>
            <tr><th>2</th><td>B</td><td>PG</td><td>29</td><td>LAL</td><td>14.0</td><td>8.2</td></tr>
            <tr><th>3</th><td>C</td><td>SG</td><td>22</td><td>LAL</td><td>9.3</td><td>2.2</td></tr>
        </table>"#;
        let df = DataProcessor::clean_stats(&parse_stats_table(html).unwrap()).unwrap();

        let mut app = ExplorerApp::with_config(AppConfig::default());
        app.control_panel.year = 2021;
        app.cache.insert((2021, Stage::RegularSeason), df.clone());
        app.apply_loaded(df, 2021, Stage::RegularSeason);
        app
    }

    fn single_team_season(team: &str) -> DataFrame {
        let html = format!(
            "<table><tr><th>Player</th><th>Pos</th><th>Age</th><th>Tm</th><th>PTS</th></tr>\
             <tr><td>Z</td><td>C</td><td>30</td><td>{team}</td><td>5.0</td></tr></table>"
        );
        DataProcessor::clean_stats(&parse_stats_table(&html).unwrap()).unwrap()
    }

    #[test]
    fn loading_selects_every_team_and_shows_all_rows() {
        let app = loaded_app();
        assert_eq!(app.control_panel.teams.options, vec!["BOS", "LAL"]);
        assert_eq!(app.table_viewer.rows.len(), 3);
        assert!(app.control_panel.has_data);
    }

    #[test]
    fn clearing_teams_empties_the_table() {
        let mut app = loaded_app();
        app.control_panel.teams.set_all(false);
        app.handle_filter_changed();
        assert_eq!(app.table_viewer.rows.len(), 0);
        assert_eq!(app.filtered.as_ref().map(|df| df.height()), Some(0));
    }

    #[test]
    fn heatmap_is_cleared_when_filter_changes() {
        let mut app = loaded_app();
        app.handle_show_heatmap();
        assert!(app.heatmap_viewer.matrix.is_some());
        assert!(app.control_panel.has_heatmap);

        app.control_panel.positions.set_all(false);
        app.handle_filter_changed();
        assert!(app.heatmap_viewer.matrix.is_none());
        assert!(!app.control_panel.has_heatmap);
    }

    #[test]
    fn cached_season_is_reused_without_loading() {
        let mut app = loaded_app();
        app.control_panel.teams.set_all(false);
        app.handle_filter_changed();

        app.handle_source_changed();
        assert!(!app.is_loading);
        assert!(app.load_rx.is_none());
        assert_eq!(app.table_viewer.rows.len(), 3);
        assert_eq!(
            app.loader.get_teams(),
            DataProcessor::unique_values(app.filtered.as_ref().unwrap(), TEAM_COL)
        );
    }

    #[test]
    fn switching_back_to_cached_season_abandons_pending_load() {
        let mut app = loaded_app();

        // 2020 starts loading, then the user goes back to 2021
        let (tx, rx) = channel();
        app.control_panel.year = 2020;
        app.load_rx = Some(rx);
        app.is_loading = true;

        app.control_panel.year = 2021;
        app.handle_source_changed();
        assert!(!app.is_loading);
        assert!(app.load_rx.is_none());
        assert_eq!(app.table_viewer.rows.len(), 3);

        let late = tx.send(LoadResult::Complete {
            year: 2020,
            stage: Stage::RegularSeason,
            df: single_team_season("OLD"),
        });
        assert!(late.is_err());
        app.check_load_results();
        assert_eq!(app.loader.get_source(), Some((2021, Stage::RegularSeason)));
        assert_eq!(app.control_panel.teams.options, vec!["BOS", "LAL"]);
    }

    #[test]
    fn result_for_another_season_is_cached_not_shown() {
        let mut app = loaded_app();
        let (tx, rx) = channel();
        app.load_rx = Some(rx);
        app.is_loading = true;

        tx.send(LoadResult::Complete {
            year: 2020,
            stage: Stage::RegularSeason,
            df: single_team_season("OLD"),
        })
        .unwrap();
        tx.send(LoadResult::Error {
            year: 2019,
            stage: Stage::Playoffs,
            message: "boom".to_string(),
        })
        .unwrap();
        app.check_load_results();

        assert_eq!(app.loader.get_source(), Some((2021, Stage::RegularSeason)));
        assert_eq!(app.control_panel.teams.options, vec!["BOS", "LAL"]);
        assert!(!app.control_panel.status.contains("Error"));
        assert!(app.cache.contains_key(&(2020, Stage::RegularSeason)));
        assert!(app.load_rx.is_some());

        tx.send(LoadResult::Complete {
            year: 2021,
            stage: Stage::RegularSeason,
            df: single_team_season("NEW"),
        })
        .unwrap();
        app.check_load_results();
        assert!(!app.is_loading);
        assert!(app.load_rx.is_none());
        assert_eq!(app.control_panel.teams.options, vec!["NEW"]);
    }

    #[test]
    fn year_outside_configured_range_is_not_loaded() {
        let mut app = loaded_app();
        app.control_panel.year = 1900;
        app.handle_source_changed();

        assert!(!app.is_loading);
        assert!(app.load_rx.is_none());
        assert!(app.control_panel.status.starts_with("Error"));
        assert_eq!(app.loader.get_source(), Some((2021, Stage::RegularSeason)));
    }
}
