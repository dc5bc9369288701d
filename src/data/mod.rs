//! Data module - scraping, cleaning, filtering and CSV export

mod export;
mod fetcher;
mod loader;
mod processor;

pub use export::{CsvExporter, ExportError, EXPORT_FILE_NAME};
pub use fetcher::{FetchError, Stage, StatsFetcher};
pub use loader::{load_stats, parse_stats_table, DataLoader, LoaderError};
pub use processor::{DataProcessor, ProcessorError};

pub const PLAYER_COL: &str = "Player";
pub const POSITION_COL: &str = "Pos";
pub const TEAM_COL: &str = "Tm";
/// Newer pages label the team column "Team".
pub const TEAM_ALIAS_COL: &str = "Team";
pub const AGE_COL: &str = "Age";
pub const RANK_COL: &str = "Rk";

/// Columns kept as strings; everything else is numeric after cleaning.
pub const IDENTIFIER_COLS: [&str; 3] = [PLAYER_COL, POSITION_COL, TEAM_COL];

/// Non-statistical columns removed during cleaning.
pub const DROPPED_COLS: [&str; 3] = [RANK_COL, "Awards", "Player-additional"];
