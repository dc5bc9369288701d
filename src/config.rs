//! Application Configuration
//! Optional JSON overrides for the data source, selectable years and export sizes.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// File looked up in the working directory at startup.
pub const CONFIG_FILE_NAME: &str = "nba_explorer.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Invalid config {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
    #[error("Year range {first}..={last} is empty")]
    EmptyYearRange { first: i32, last: i32 },
}

/// Where and how the stats pages are fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub base_url: String,
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.basketball-reference.com".to_string(),
            user_agent: "Mozilla/5.0 (compatible; nba-stats-explorer/0.1)".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Static heatmap export size in pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeatmapConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for HeatmapConfig {
    fn default() -> Self {
        // 7x5 inch figure at 100 dpi
        Self {
            width: 700,
            height: 500,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub source: SourceConfig,
    pub first_year: i32,
    pub last_year: i32,
    pub positions: Vec<String>,
    pub heatmap: HeatmapConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            source: SourceConfig::default(),
            first_year: 1950,
            last_year: 2025,
            positions: ["C", "PF", "SF", "PG", "SG"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            heatmap: HeatmapConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load config from `path`, falling back to defaults when the file does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::warn!("{} not found, using default configuration", path.display());
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_json(&text).map_err(|e| match e {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.display().to_string(),
                source,
            },
            other => other,
        })?;

        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parse config from a JSON string. Missing fields keep their defaults.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text).map_err(|source| ConfigError::Parse {
            path: "<inline>".to_string(),
            source,
        })?;
        if config.first_year > config.last_year {
            return Err(ConfigError::EmptyYearRange {
                first: config.first_year,
                last: config.last_year,
            });
        }
        Ok(config)
    }

    /// Selectable seasons, newest first.
    pub fn years(&self) -> Vec<i32> {
        (self.first_year..=self.last_year).rev().collect()
    }

    pub fn contains_year(&self, year: i32) -> bool {
        (self.first_year..=self.last_year).contains(&year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = AppConfig::from_json(r#"{ "last_year": 2021, "source": { "timeout_secs": 5 } }"#)
            .unwrap();
        assert_eq!(config.last_year, 2021);
        assert_eq!(config.first_year, 1950);
        assert_eq!(config.source.timeout_secs, 5);
        assert_eq!(config.source.base_url, SourceConfig::default().base_url);
        assert_eq!(config.positions, vec!["C", "PF", "SF", "PG", "SG"]);
    }

    #[test]
    fn years_are_listed_newest_first() {
        let config = AppConfig {
            first_year: 2019,
            last_year: 2021,
            ..Default::default()
        };
        assert_eq!(config.years(), vec![2021, 2020, 2019]);
        assert!(config.contains_year(2020));
        assert!(!config.contains_year(2022));
    }

    #[test]
    fn inverted_year_range_is_rejected() {
        let err = AppConfig::from_json(r#"{ "first_year": 2000, "last_year": 1990 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyYearRange { .. }));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = AppConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = AppConfig::load(Path::new("definitely/not/here/nba_explorer.json")).unwrap();
        assert_eq!(config, AppConfig::default());
    }
}
