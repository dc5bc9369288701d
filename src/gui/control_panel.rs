//! Control Panel Widget
//! Left side panel with season, team and position selection plus export actions.

use crate::data::Stage;
use egui::{Color32, ComboBox, RichText, ScrollArea};
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Current selection driving the table.
#[derive(Clone, Debug, PartialEq)]
pub struct UserSettings {
    pub year: i32,
    pub stage: Stage,
    pub teams: BTreeSet<String>,
    pub positions: BTreeSet<String>,
}

/// A labelled set of checkboxes with a "Select all" toggle.
#[derive(Default, Clone)]
pub struct MultiSelect {
    pub options: Vec<String>,
    pub selected: Vec<bool>,
}

impl MultiSelect {
    /// Replace the options, all selected.
    pub fn set_options(&mut self, options: Vec<String>) {
        self.selected = vec![true; options.len()];
        self.options = options;
    }

    pub fn set_all(&mut self, value: bool) {
        self.selected.iter_mut().for_each(|v| *v = value);
    }

    pub fn all_selected(&self) -> bool {
        self.selected.iter().all(|&v| v)
    }

    pub fn selected_set(&self) -> BTreeSet<String> {
        self.options
            .iter()
            .zip(self.selected.iter())
            .filter(|(_, &selected)| selected)
            .map(|(option, _)| option.clone())
            .collect()
    }

    /// Draw the toggle and checkboxes. Returns true when the selection changed.
    fn show(&mut self, ui: &mut egui::Ui, id: &str) -> bool {
        let mut changed = false;

        let mut all = self.all_selected() && !self.options.is_empty();
        if ui.checkbox(&mut all, "Select all").changed() {
            self.set_all(all);
            changed = true;
        }

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(5.0)
            .show(ui, |ui| {
                ScrollArea::vertical()
                    .id_salt(id)
                    .max_height(140.0)
                    .show(ui, |ui| {
                        ui.horizontal_wrapped(|ui| {
                            for (option, selected) in
                                self.options.iter().zip(self.selected.iter_mut())
                            {
                                if ui.checkbox(selected, option).changed() {
                                    changed = true;
                                }
                            }
                        });
                    });
            });

        changed
    }
}

/// Left side control panel.
pub struct ControlPanel {
    pub years: Vec<i32>,
    pub year: i32,
    pub stage: Stage,
    pub teams: MultiSelect,
    pub positions: MultiSelect,
    pub has_data: bool,
    pub has_heatmap: bool,
    pub last_export: Option<PathBuf>,
    pub progress: f32,
    pub status: String,
}

impl ControlPanel {
    pub fn new(years: Vec<i32>, positions: Vec<String>) -> Self {
        let mut position_select = MultiSelect::default();
        position_select.set_options(positions);

        Self {
            year: years.first().copied().unwrap_or_default(),
            years,
            stage: Stage::default(),
            teams: MultiSelect::default(),
            positions: position_select,
            has_data: false,
            has_heatmap: false,
            last_export: None,
            progress: 0.0,
            status: "Ready".to_string(),
        }
    }

    /// Snapshot of the current selection.
    pub fn settings(&self) -> UserSettings {
        UserSettings {
            year: self.year,
            stage: self.stage,
            teams: self.teams.selected_set(),
            positions: self.positions.selected_set(),
        }
    }

    /// Update team options after a season loads; every team starts selected.
    pub fn update_teams(&mut self, teams: Vec<String>) {
        self.teams.set_options(teams);
        self.has_data = true;
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("🏀 User Input Features")
                    .size(20.0)
                    .color(Color32::from_rgb(237, 125, 49)),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Season Section =====
        ui.label(RichText::new("📅 Season").size(14.0).strong());
        ui.add_space(5.0);

        let label_width = 60.0;
        ui.horizontal(|ui| {
            ui.add_sized([label_width, 20.0], egui::Label::new("Year:"));
            ComboBox::from_id_salt("year")
                .width(120.0)
                .selected_text(self.year.to_string())
                .show_ui(ui, |ui| {
                    for &year in &self.years {
                        if ui.selectable_label(self.year == year, year.to_string()).clicked()
                            && self.year != year
                        {
                            self.year = year;
                            action = ControlPanelAction::SourceChanged;
                        }
                    }
                });
        });

        ui.add_space(5.0);
        ui.horizontal(|ui| {
            for stage in Stage::ALL {
                if ui.radio_value(&mut self.stage, stage, stage.label()).changed() {
                    action = ControlPanelAction::SourceChanged;
                }
            }
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Filter Section =====
        ui.label(RichText::new("👥 Team").size(14.0).strong());
        ui.add_space(5.0);
        if self.teams.options.is_empty() {
            ui.label(RichText::new("No teams loaded").color(Color32::GRAY));
        } else if self.teams.show(ui, "team_select") {
            action = ControlPanelAction::FilterChanged;
        }

        ui.add_space(10.0);
        ui.label(RichText::new("🎯 Position").size(14.0).strong());
        ui.add_space(5.0);
        if self.positions.show(ui, "position_select") {
            action = ControlPanelAction::FilterChanged;
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Action Buttons =====
        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(self.has_data, |ui| {
                let button =
                    egui::Button::new(RichText::new("▶ Intercorrelation Heatmap").size(15.0))
                        .min_size(egui::vec2(220.0, 32.0));
                if ui.add(button).clicked() {
                    action = ControlPanelAction::ShowHeatmap;
                }

                ui.add_space(8.0);

                ui.horizontal(|ui| {
                    if ui.button("💾 Download CSV").clicked() {
                        action = ControlPanelAction::DownloadCsv;
                    }
                    if ui.button("🔗 Copy download link").clicked() {
                        action = ControlPanelAction::CopyLink;
                    }
                });
            });

            ui.add_space(5.0);
            ui.add_enabled_ui(self.has_heatmap, |ui| {
                if ui.button("🖼 Save heatmap PNG").clicked() {
                    action = ControlPanelAction::SaveHeatmap;
                }
            });

            if let Some(path) = &self.last_export {
                ui.add_space(5.0);
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default();
                if ui.small_button(format!("📂 Open {}", name)).clicked() {
                    action = ControlPanelAction::OpenExport;
                }
            }
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Progress Section =====
        ui.label(RichText::new("📊 Status").size(14.0).strong());
        ui.add_space(5.0);

        ui.add(
            egui::ProgressBar::new(self.progress / 100.0)
                .animate(self.progress > 0.0 && self.progress < 100.0),
        );

        ui.add_space(5.0);

        let status_color = if self.status.contains("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.contains("Loaded") || self.status.contains("Saved") {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    /// Set progress and status
    pub fn set_progress(&mut self, progress: f32, status: &str) {
        self.progress = progress;
        self.status = status.to_string();
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    SourceChanged,
    FilterChanged,
    ShowHeatmap,
    DownloadCsv,
    CopyLink,
    SaveHeatmap,
    OpenExport,
}
