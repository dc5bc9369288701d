//! Table Viewer Widget
//! Displays the filtered stats table with its dimensions.

use egui::RichText;
use egui_extras::{Column as TableColumn, TableBuilder};
use polars::prelude::*;

const ROW_HEIGHT: f32 = 18.0;

/// Render a cell the way the table shows it.
pub fn format_cell(value: &AnyValue) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        AnyValue::Float64(v) => format_float(*v),
        AnyValue::Float32(v) => format_float(*v as f64),
        other => other.to_string(),
    }
}

fn format_float(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{:.0}", v)
    } else {
        let s = format!("{:.3}", v);
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

/// Cached string view of the filtered table.
#[derive(Default)]
pub struct TableViewer {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TableViewer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the cached cells from `df`.
    pub fn set_table(&mut self, df: &DataFrame) {
        self.headers = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();

        let columns: Vec<Vec<String>> = df
            .get_columns()
            .iter()
            .map(|col| {
                col.as_materialized_series()
                    .rechunk()
                    .iter()
                    .map(|v| format_cell(&v))
                    .collect()
            })
            .collect();

        self.rows = (0..df.height())
            .map(|i| columns.iter().map(|col| col[i].clone()).collect())
            .collect();
    }

    pub fn clear(&mut self) {
        self.headers.clear();
        self.rows.clear();
    }

    /// "Data Dimension: N rows and M columns."
    pub fn dimension_text(&self) -> String {
        format!(
            "Data Dimension: {} rows and {} columns.",
            self.rows.len(),
            self.headers.len()
        )
    }

    pub fn show(&self, ui: &mut egui::Ui, max_height: f32) {
        if self.headers.is_empty() {
            ui.label(RichText::new("No Data").size(16.0));
            return;
        }

        ui.label(self.dimension_text());
        ui.add_space(5.0);

        ui.push_id(("stats_table", self.headers.len()), |ui| {
            egui::ScrollArea::horizontal().show(ui, |ui| {
                TableBuilder::new(ui)
                    .striped(true)
                    .max_scroll_height(max_height)
                    .columns(TableColumn::auto().at_least(40.0).resizable(true), self.headers.len())
                    .header(ROW_HEIGHT + 2.0, |mut header| {
                        for name in &self.headers {
                            header.col(|ui| {
                                ui.strong(name);
                            });
                        }
                    })
                    .body(|body| {
                        body.rows(ROW_HEIGHT, self.rows.len(), |mut row| {
                            let cells = &self.rows[row.index()];
                            for cell in cells {
                                row.col(|ui| {
                                    ui.label(cell);
                                });
                            }
                        });
                    });
            });
        });
    }
}
