//! GUI module - User interface components

mod app;
mod control_panel;
mod heatmap_viewer;
mod table_viewer;

pub use app::ExplorerApp;
pub use control_panel::{ControlPanel, ControlPanelAction, MultiSelect, UserSettings};
pub use heatmap_viewer::HeatmapViewer;
pub use table_viewer::{format_cell, TableViewer};
