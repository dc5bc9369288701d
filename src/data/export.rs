//! CSV Export Module
//! Serializes the filtered table to CSV, a base64 data URI, or a file.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use polars::prelude::*;
use std::io::Cursor;
use std::path::Path;
use thiserror::Error;

/// Default name of the downloaded file.
pub const EXPORT_FILE_NAME: &str = "player_stats.csv";

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] PolarsError),
    #[error("CSV output is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("Failed to write {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

pub struct CsvExporter;

impl CsvExporter {
    /// Header line plus one line per row, standard CSV quoting, no index column.
    pub fn to_csv_string(df: &DataFrame) -> Result<String, ExportError> {
        let mut buf: Vec<u8> = Vec::new();
        let mut df = df.clone();
        CsvWriter::new(&mut buf)
            .include_header(true)
            .finish(&mut df)?;
        Ok(String::from_utf8(buf)?)
    }

    /// `data:file/csv;base64,...` payload for an embeddable download link.
    pub fn to_data_uri(df: &DataFrame) -> Result<String, ExportError> {
        let csv = Self::to_csv_string(df)?;
        Ok(format!("data:file/csv;base64,{}", STANDARD.encode(csv.as_bytes())))
    }

    /// HTML anchor that downloads the table as `player_stats.csv`.
    pub fn download_link(df: &DataFrame) -> Result<String, ExportError> {
        Ok(format!(
            r#"<a href="{}" download="{}">Download CSV File</a>"#,
            Self::to_data_uri(df)?,
            EXPORT_FILE_NAME
        ))
    }

    /// Write the CSV text to `path`.
    pub fn write_csv(df: &DataFrame, path: &Path) -> Result<(), ExportError> {
        let csv = Self::to_csv_string(df)?;
        std::fs::write(path, csv).map_err(|source| ExportError::Io {
            path: path.display().to_string(),
            source,
        })?;
        log::info!("Exported {} rows to {}", df.height(), path.display());
        Ok(())
    }

    /// Read exported CSV text back into a DataFrame.
    pub fn parse_csv(text: &str) -> Result<DataFrame, ExportError> {
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .into_reader_with_file_handle(Cursor::new(text.as_bytes().to_vec()))
            .finish()?;
        Ok(df)
    }
}
