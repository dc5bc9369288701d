//! Charts module - Correlation heatmap rendering

mod colormap;
mod plotter;
mod renderer;

pub use colormap::{heat_color, scale_bounds};
pub use plotter::HeatmapPlotter;
pub use renderer::{HeatmapRenderer, RenderError};
