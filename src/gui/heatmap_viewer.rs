//! Heatmap Viewer Widget
//! Shows the correlation heatmap once requested for the current filter.

use crate::charts::HeatmapPlotter;
use crate::stats::CorrelationMatrix;
use egui::RichText;

const HEATMAP_HEIGHT: f32 = 480.0;

#[derive(Default)]
pub struct HeatmapViewer {
    pub matrix: Option<CorrelationMatrix>,
}

impl HeatmapViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_matrix(&mut self, matrix: CorrelationMatrix) {
        self.matrix = Some(matrix);
    }

    pub fn clear(&mut self) {
        self.matrix = None;
    }

    pub fn show(&self, ui: &mut egui::Ui) {
        let Some(matrix) = &self.matrix else {
            return;
        };

        ui.add_space(15.0);
        ui.label(RichText::new("Intercorrelation Matrix Heatmap").size(18.0).strong());
        ui.add_space(8.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(8.0)
            .inner_margin(12.0)
            .show(ui, |ui| {
                HeatmapPlotter::draw(ui, matrix, HEATMAP_HEIGHT);
            });
    }
}
