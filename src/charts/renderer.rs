//! Static Heatmap Renderer
//! Draws the correlation matrix into an RGB bitmap with plotters.
//!
//! Layout:
//! 1. Row labels on the left, column labels below the grid
//! 2. Square cells; the upper triangle and diagonal stay blank
//! 3. Vertical colorbar on the right with vmin / vmax ticks

use super::colormap::{heat_color, scale_bounds};
use crate::stats::CorrelationMatrix;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::FontStyle;
use std::path::Path;
use std::sync::OnceLock;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Heatmap needs at least two numeric columns, got {0}")]
    NotEnoughColumns(usize),
    #[error("Image size {0}x{1} is too small")]
    TooSmall(u32, u32),
    #[error("Image size {0}x{1} exceeds 8192px per side")]
    TooLarge(u32, u32),
    #[error("Drawing failed: {0}")]
    Draw(String),
    #[error("Failed to encode image: {0}")]
    Image(#[from] image::ImageError),
}

const FONT_FAMILY: &str = "sans-serif";

// Fonts tried in order when labels are requested.
const FONT_CANDIDATES: [&str; 6] = [
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

const LEFT_MARGIN: u32 = 70;
const BOTTOM_MARGIN: u32 = 50;
const TOP_MARGIN: u32 = 15;
const COLORBAR_AREA: u32 = 70;
const MAX_SIDE: u32 = 8192;

/// Register a system font with plotters once. Returns false when none is usable.
fn font_available() -> bool {
    static FONT: OnceLock<bool> = OnceLock::new();
    *FONT.get_or_init(|| {
        for path in FONT_CANDIDATES {
            let Ok(bytes) = std::fs::read(path) else {
                continue;
            };
            // Registered fonts live for the rest of the process
            let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
            if plotters::style::register_font(FONT_FAMILY, FontStyle::Normal, bytes).is_ok() {
                log::debug!("Using {} for heatmap labels", path);
                return true;
            }
        }
        log::warn!("No usable font found, heatmap labels disabled");
        false
    })
}

fn draw_err<E: std::error::Error + Send + Sync>(e: DrawingAreaErrorKind<E>) -> RenderError {
    RenderError::Draw(e.to_string())
}

pub struct HeatmapRenderer;

impl HeatmapRenderer {
    /// Render into a `width * height * 3` RGB buffer.
    pub fn render_rgb(
        matrix: &CorrelationMatrix,
        width: u32,
        height: u32,
        labels: bool,
    ) -> Result<Vec<u8>, RenderError> {
        let n = matrix.len();
        if n < 2 {
            return Err(RenderError::NotEnoughColumns(n));
        }
        if width > MAX_SIDE || height > MAX_SIDE {
            return Err(RenderError::TooLarge(width, height));
        }

        let grid_w = width.saturating_sub(LEFT_MARGIN + COLORBAR_AREA);
        let grid_h = height.saturating_sub(TOP_MARGIN + BOTTOM_MARGIN);
        let cell = grid_w.min(grid_h) / n as u32;
        if cell == 0 {
            return Err(RenderError::TooSmall(width, height));
        }

        let labels = labels && font_available();
        let (vmin, vmax) = scale_bounds(matrix.visible_range());

        let mut buf = vec![0u8; width as usize * height as usize * 3];
        {
            let root = BitMapBackend::with_buffer(&mut buf, (width, height)).into_drawing_area();
            root.fill(&WHITE).map_err(draw_err)?;

            let x0 = LEFT_MARGIN as i32;
            let y0 = TOP_MARGIN as i32;
            let cell = cell as i32;

            for row in 0..n {
                for col in 0..n {
                    let value = matrix.get(row, col);
                    if matrix.is_masked(row, col) || !value.is_finite() {
                        continue;
                    }
                    let [r, g, b] = heat_color(value, vmin, vmax);
                    let top_left = (x0 + col as i32 * cell, y0 + row as i32 * cell);
                    let bottom_right = (top_left.0 + cell, top_left.1 + cell);
                    root.draw(&Rectangle::new(
                        [top_left, bottom_right],
                        RGBColor(r, g, b).filled(),
                    ))
                    .map_err(draw_err)?;
                }
            }

            // Colorbar spans the grid height
            let bar_x = x0 + n as i32 * cell + 20;
            let bar_w = 15;
            let bar_h = n as i32 * cell;
            for step in 0..bar_h {
                let t = 1.0 - step as f64 / (bar_h - 1).max(1) as f64;
                let [r, g, b] = heat_color(vmin + t * (vmax - vmin), vmin, vmax);
                root.draw(&Rectangle::new(
                    [(bar_x, y0 + step), (bar_x + bar_w, y0 + step + 1)],
                    RGBColor(r, g, b).filled(),
                ))
                .map_err(draw_err)?;
            }

            if labels {
                let label_style = (FONT_FAMILY, 11).into_font().color(&BLACK);

                for (i, name) in matrix.columns.iter().enumerate() {
                    let center = i as i32 * cell + cell / 2;

                    root.draw(&Text::new(
                        name.clone(),
                        (x0 - 6, y0 + center),
                        label_style.pos(Pos::new(HPos::Right, VPos::Center)),
                    ))
                    .map_err(draw_err)?;

                    // Stagger column labels so neighbours do not collide
                    let stagger = if i % 2 == 0 { 6 } else { 20 };
                    root.draw(&Text::new(
                        name.clone(),
                        (x0 + center, y0 + n as i32 * cell + stagger),
                        label_style.pos(Pos::new(HPos::Center, VPos::Top)),
                    ))
                    .map_err(draw_err)?;
                }

                for (value, y) in [(vmax, y0), (vmin, y0 + bar_h)] {
                    root.draw(&Text::new(
                        format!("{:.1}", value),
                        (bar_x + bar_w + 5, y),
                        label_style.pos(Pos::new(HPos::Left, VPos::Center)),
                    ))
                    .map_err(draw_err)?;
                }
            }

            root.present().map_err(draw_err)?;
        }

        Ok(buf)
    }

    /// Render with labels and save as an image file (format from extension).
    pub fn save_png(
        matrix: &CorrelationMatrix,
        path: &Path,
        width: u32,
        height: u32,
    ) -> Result<(), RenderError> {
        let buf = Self::render_rgb(matrix, width, height, true)?;
        let img = image::RgbImage::from_raw(width, height, buf)
            .ok_or(RenderError::TooSmall(width, height))?;
        img.save(path)?;
        log::info!("Saved {}x{} heatmap to {}", width, height, path.display());
        Ok(())
    }
}
