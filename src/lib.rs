//! NBA Player Stats Explorer
//!
//! Scrapes basketball-reference per-game stats, filters them by team and
//! position, exports CSV and renders a correlation heatmap.

pub mod charts;
pub mod config;
pub mod data;
pub mod gui;
pub mod stats;
