//! Heatmap Plotter Module
//! Interactive correlation heatmap drawn with egui_plot.

use super::colormap::{heat_color, scale_bounds};
use crate::stats::CorrelationMatrix;
use egui::{Color32, RichText, Stroke};
use egui_plot::{GridMark, Plot, PlotPoints, Polygon};

pub fn to_color32(rgb: [u8; 3]) -> Color32 {
    Color32::from_rgb(rgb[0], rgb[1], rgb[2])
}

/// Cell under a plot coordinate. Row 0 is drawn at the top.
pub fn cell_at(x: f64, y: f64, n: usize) -> Option<(usize, usize)> {
    if x < 0.0 || y > 0.0 {
        return None;
    }
    let col = x.floor() as usize;
    let row = (-y).floor() as usize;
    (row < n && col < n).then_some((row, col))
}

/// Column index for an axis mark placed at a cell center.
fn label_index(center: f64, n: usize) -> Option<usize> {
    let idx = center - 0.5;
    if idx < -1e-6 || (idx - idx.round()).abs() > 1e-6 {
        return None;
    }
    let idx = idx.round() as usize;
    (idx < n).then_some(idx)
}

fn center_marks(n: usize, sign: f64) -> Vec<GridMark> {
    (0..n)
        .map(|i| GridMark {
            value: sign * (i as f64 + 0.5),
            step_size: 1.0,
        })
        .collect()
}

/// Creates the interactive heatmap view.
pub struct HeatmapPlotter;

impl HeatmapPlotter {
    /// Draw the lower triangle of `matrix`. Masked and NaN cells are skipped.
    pub fn draw(ui: &mut egui::Ui, matrix: &CorrelationMatrix, height: f32) {
        let n = matrix.len();
        let (vmin, vmax) = scale_bounds(matrix.visible_range());

        let x_names = matrix.columns.clone();
        let y_names = matrix.columns.clone();
        let hover_names = matrix.columns.clone();
        let hover_values = matrix.values.clone();

        Plot::new("correlation_heatmap")
            .height(height)
            .data_aspect(1.0)
            .allow_scroll(false)
            .show_grid(false)
            .include_x(0.0)
            .include_x(n as f64)
            .include_y(0.0)
            .include_y(-(n as f64))
            .x_grid_spacer(move |_input| center_marks(n, 1.0))
            .y_grid_spacer(move |_input| center_marks(n, -1.0))
            .x_axis_formatter(move |mark, _range| {
                label_index(mark.value, x_names.len())
                    .map(|i| x_names[i].clone())
                    .unwrap_or_default()
            })
            .y_axis_formatter(move |mark, _range| {
                label_index(-mark.value, y_names.len())
                    .map(|i| y_names[i].clone())
                    .unwrap_or_default()
            })
            .label_formatter(move |_name, point| {
                match cell_at(point.x, point.y, hover_names.len()) {
                    Some((row, col)) if col < row => {
                        let r = hover_values[row][col];
                        let r = if r.is_finite() {
                            format!("{:.3}", r)
                        } else {
                            "n/a".to_string()
                        };
                        format!("{} / {}\nr = {}", hover_names[row], hover_names[col], r)
                    }
                    _ => String::new(),
                }
            })
            .show(ui, |plot_ui| {
                for row in 0..n {
                    for col in 0..n {
                        let value = matrix.get(row, col);
                        if matrix.is_masked(row, col) || !value.is_finite() {
                            continue;
                        }

                        let color = to_color32(heat_color(value, vmin, vmax));
                        let (x, y) = (col as f64, -(row as f64));
                        let corners = vec![[x, y], [x + 1.0, y], [x + 1.0, y - 1.0], [x, y - 1.0]];

                        plot_ui.polygon(
                            Polygon::new(PlotPoints::from(corners))
                                .fill_color(color)
                                .stroke(Stroke::new(0.5, color)),
                        );
                    }
                }
            });

        ui.add_space(6.0);
        Self::draw_colorbar(ui, vmin, vmax);
    }

    /// Horizontal color scale under the plot.
    fn draw_colorbar(ui: &mut egui::Ui, vmin: f64, vmax: f64) {
        ui.horizontal(|ui| {
            ui.label(RichText::new(format!("{:.2}", vmin)).size(11.0));

            let (rect, _) = ui.allocate_exact_size(egui::vec2(240.0, 14.0), egui::Sense::hover());
            let steps = 60;
            let step_w = rect.width() / steps as f32;
            for i in 0..steps {
                let t = i as f64 / (steps - 1) as f64;
                let color = to_color32(heat_color(vmin + t * (vmax - vmin), vmin, vmax));
                let x = rect.left() + i as f32 * step_w;
                let cell = egui::Rect::from_min_max(
                    egui::pos2(x, rect.top()),
                    egui::pos2(x + step_w + 0.5, rect.bottom()),
                );
                ui.painter().rect_filled(cell, 0.0, color);
            }

            ui.label(RichText::new(format!("{:.2}", vmax)).size(11.0));
        });
    }
}
