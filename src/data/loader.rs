//! Stats Table Loader Module
//! Turns a per-game stats page into a polars DataFrame and keeps the loaded table.

use super::fetcher::{FetchError, Stage, StatsFetcher};
use super::processor::{DataProcessor, ProcessorError};
use super::{AGE_COL, PLAYER_COL, POSITION_COL, TEAM_ALIAS_COL, TEAM_COL};
use polars::prelude::*;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("Failed to clean stats table: {0}")]
    Process(#[from] ProcessorError),
    #[error("Failed to build DataFrame: {0}")]
    Polars(#[from] PolarsError),
    #[error("Invalid selector {0}")]
    Selector(String),
    #[error("No table found in page")]
    NoTable,
    #[error("Stats table has no header row")]
    NoHeader,
    #[error("Stats table is missing the {0} column")]
    MissingColumn(String),
}

fn selector(css: &str) -> Result<Selector, LoaderError> {
    Selector::parse(css).map_err(|e| LoaderError::Selector(format!("{css}: {e}")))
}

fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text().collect::<String>().trim().to_string()
}

/// Make header labels usable as column names: blank labels get a
/// placeholder and duplicates get a numeric suffix.
fn normalize_headers(raw: Vec<String>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let has_tm = raw.iter().any(|h| h == TEAM_COL);

    raw.into_iter()
        .enumerate()
        .map(|(i, header)| {
            let header = if header.is_empty() {
                format!("Unnamed: {}", i)
            } else if header == TEAM_ALIAS_COL && !has_tm {
                TEAM_COL.to_string()
            } else {
                header
            };

            let count = seen.entry(header.clone()).or_insert(0);
            let name = if *count == 0 {
                header
            } else {
                format!("{}.{}", header, count)
            };
            *count += 1;
            name
        })
        .collect()
}

/// Parse the first `<table>` of a page into an all-string DataFrame.
///
/// The first row is the header. Every following row that has at least one
/// `th`/`td` cell becomes a data row, including the header rows the site
/// repeats inside the body; those are removed by
/// [`DataProcessor::clean_stats`]. Empty cells become nulls.
pub fn parse_stats_table(html: &str) -> Result<DataFrame, LoaderError> {
    let document = Html::parse_document(html);
    let table_sel = selector("table")?;
    let row_sel = selector("tr")?;
    let cell_sel = selector("th, td")?;

    let table = document.select(&table_sel).next().ok_or(LoaderError::NoTable)?;
    let mut rows = table.select(&row_sel);

    let header_row = rows.next().ok_or(LoaderError::NoHeader)?;
    let headers = normalize_headers(header_row.select(&cell_sel).map(cell_text).collect());
    if headers.is_empty() {
        return Err(LoaderError::NoHeader);
    }

    for required in [PLAYER_COL, POSITION_COL, TEAM_COL, AGE_COL] {
        if !headers.iter().any(|h| h == required) {
            return Err(LoaderError::MissingColumn(required.to_string()));
        }
    }

    let mut columns: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];
    for row in rows {
        let cells: Vec<String> = row.select(&cell_sel).map(cell_text).collect();
        if cells.is_empty() {
            continue;
        }

        for (i, column) in columns.iter_mut().enumerate() {
            let value = cells.get(i).filter(|v| !v.is_empty()).cloned();
            column.push(value);
        }
    }

    let df = DataFrame::new(
        headers
            .iter()
            .zip(columns)
            .map(|(name, values)| Column::new(name.as_str().into(), values))
            .collect(),
    )?;

    log::debug!("Parsed stats table: {} rows, {} columns", df.height(), df.width());
    Ok(df)
}

/// Fetch, parse and clean the per-game table for a season.
pub fn load_stats(fetcher: &StatsFetcher, year: i32, stage: Stage) -> Result<DataFrame, LoaderError> {
    let html = fetcher.fetch_html(year, stage)?;
    let raw = parse_stats_table(&html)?;
    let cleaned = DataProcessor::clean_stats(&raw)?;
    log::info!(
        "Loaded {} {}: {} rows, {} columns",
        year,
        stage,
        cleaned.height(),
        cleaned.width()
    );
    Ok(cleaned)
}

/// Holds the cleaned table of the currently selected season.
pub struct DataLoader {
    df: Option<DataFrame>,
    source: Option<(i32, Stage)>,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    pub fn new() -> Self {
        Self {
            df: None,
            source: None,
        }
    }

    /// Replace the loaded table.
    pub fn set_dataframe(&mut self, df: DataFrame, year: i32, stage: Stage) {
        self.df = Some(df);
        self.source = Some((year, stage));
    }

    /// Get list of column names from loaded DataFrame.
    pub fn get_columns(&self) -> Vec<String> {
        self.df
            .as_ref()
            .map(|df| {
                df.get_column_names()
                    .iter()
                    .map(|s| s.to_string())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Sorted team codes present in the loaded table.
    pub fn get_teams(&self) -> Vec<String> {
        self.df
            .as_ref()
            .map(|df| DataProcessor::unique_values(df, TEAM_COL))
            .unwrap_or_default()
    }

    pub fn get_row_count(&self) -> usize {
        self.df.as_ref().map(|df| df.height()).unwrap_or(0)
    }

    pub fn get_dataframe(&self) -> Option<&DataFrame> {
        self.df.as_ref()
    }

    /// Season and stage of the loaded table.
    pub fn get_source(&self) -> Option<(i32, Stage)> {
        self.source
    }
}
