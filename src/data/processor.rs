//! Data Processor Module
//! Handles data cleaning and filtering of the per-game stats table.

use super::{AGE_COL, DROPPED_COLS, IDENTIFIER_COLS, POSITION_COL, TEAM_COL};
use polars::prelude::*;
use std::collections::BTreeSet;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Column {0} not found")]
    MissingColumn(String),
}

/// Handles data cleaning and filtering operations.
pub struct DataProcessor;

impl DataProcessor {
    /// Clean a freshly parsed table.
    ///
    /// Drops the repeated header rows (`Age == "Age"`) and the non-stat
    /// columns, then converts every non-identifier column to `Float64`
    /// with nulls filled by `0.0`. A non-empty cell that does not parse as
    /// a number fails the whole conversion.
    pub fn clean_stats(raw: &DataFrame) -> Result<DataFrame, ProcessorError> {
        if raw.column(AGE_COL).is_err() {
            return Err(ProcessorError::MissingColumn(AGE_COL.to_string()));
        }

        let mut df = raw.clone();
        for name in DROPPED_COLS {
            if df.column(name).is_ok() {
                df = df.drop(name)?;
            }
        }

        let numeric: Vec<Expr> = df
            .get_column_names()
            .iter()
            .filter(|name| !IDENTIFIER_COLS.contains(&name.as_str()))
            .map(|name| {
                col(name.as_str())
                    .strict_cast(DataType::Float64)
                    .fill_null(lit(0.0))
            })
            .collect();

        let before = df.height();
        let cleaned = df
            .lazy()
            .filter(col(AGE_COL).neq_missing(lit(AGE_COL)))
            .with_columns(numeric)
            .collect()?;

        let dropped = before - cleaned.height();
        if dropped > 0 {
            log::warn!("Dropped {} repeated header rows", dropped);
        }

        Ok(cleaned)
    }

    /// Rows whose team and position are both accepted.
    ///
    /// Empty accepted sets select nothing. The column set is unchanged.
    pub fn filter_by_team_and_position(
        df: &DataFrame,
        teams: &BTreeSet<String>,
        positions: &BTreeSet<String>,
    ) -> Result<DataFrame, ProcessorError> {
        let team_col = df
            .column(TEAM_COL)
            .map_err(|_| ProcessorError::MissingColumn(TEAM_COL.to_string()))?;
        let pos_col = df
            .column(POSITION_COL)
            .map_err(|_| ProcessorError::MissingColumn(POSITION_COL.to_string()))?;

        let mask: BooleanChunked = team_col
            .str()?
            .into_iter()
            .zip(pos_col.str()?.into_iter())
            .map(|(team, pos)| match (team, pos) {
                (Some(team), Some(pos)) => teams.contains(team) && positions.contains(pos),
                _ => false,
            })
            .collect();

        Ok(df.filter(&mask)?)
    }

    /// Names of numeric columns.
    pub fn numeric_columns(df: &DataFrame) -> Vec<String> {
        df.get_columns()
            .iter()
            .filter(|col| {
                matches!(
                    col.dtype(),
                    DataType::Float32
                        | DataType::Float64
                        | DataType::Int8
                        | DataType::Int16
                        | DataType::Int32
                        | DataType::Int64
                        | DataType::UInt8
                        | DataType::UInt16
                        | DataType::UInt32
                        | DataType::UInt64
                )
            })
            .map(|col| col.name().to_string())
            .collect()
    }

    /// Sorted unique non-null values of a string column.
    pub fn unique_values(df: &DataFrame, column: &str) -> Vec<String> {
        let Ok(ca) = df.column(column).and_then(|c| c.str()) else {
            return Vec::new();
        };

        ca.into_iter()
            .flatten()
            .map(|s| s.to_string())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}
