use nba_stats_explorer::charts::HeatmapRenderer;
use nba_stats_explorer::data::{
    parse_stats_table, CsvExporter, DataProcessor, AGE_COL, POSITION_COL, TEAM_COL,
};
use nba_stats_explorer::stats::StatsCalculator;
use polars::prelude::*;
use std::collections::BTreeSet;

const SAMPLE_PAGE: &str = include_str!("fixtures/per_game_sample.html");

fn cleaned() -> DataFrame {
    let raw = parse_stats_table(SAMPLE_PAGE).unwrap();
    DataProcessor::clean_stats(&raw).unwrap()
}

fn set(values: &[&str]) -> BTreeSet<String> {
    values.iter().map(|s| s.to_string()).collect()
}

#[test]
fn parsed_page_keeps_repeated_header_until_cleaning() {
    let raw = parse_stats_table(SAMPLE_PAGE).unwrap();
    assert_eq!(raw.height(), 9);
    assert!(raw.column("Rk").is_ok());

    let df = cleaned();
    assert_eq!(df.height(), 8);
    assert!(df.column("Rk").is_err());
    assert!(df
        .column(AGE_COL)
        .unwrap()
        .f64()
        .unwrap()
        .into_iter()
        .all(|age| age.is_some()));
}

#[test]
fn stat_columns_are_floats_without_nulls() {
    let df = cleaned();
    for column in df.get_columns() {
        let name = column.name().as_str();
        if ["Player", POSITION_COL, TEAM_COL].contains(&name) {
            assert_eq!(column.dtype(), &DataType::String, "{name}");
        } else {
            assert_eq!(column.dtype(), &DataType::Float64, "{name}");
            assert_eq!(column.null_count(), 0, "{name}");
        }
    }

    // Empty percentage cells become zero
    let three_pct = df.column("3P%").unwrap().f64().unwrap();
    assert_eq!(three_pct.get(6), Some(0.0));
    assert_eq!(three_pct.get(0), Some(0.25));
}

#[test]
fn filtering_by_every_team_and_position_keeps_all_rows() {
    let df = cleaned();
    let teams: BTreeSet<String> = DataProcessor::unique_values(&df, TEAM_COL).into_iter().collect();
    let positions: BTreeSet<String> =
        DataProcessor::unique_values(&df, POSITION_COL).into_iter().collect();

    let filtered = DataProcessor::filter_by_team_and_position(&df, &teams, &positions).unwrap();
    assert_eq!(filtered.height(), df.height());
    assert_eq!(filtered.get_column_names(), df.get_column_names());
}

#[test]
fn default_positions_exclude_combined_positions() {
    let df = cleaned();
    let teams = set(&["BOS", "LAL", "MIA"]);
    let positions = set(&["C", "PF", "SF", "PG", "SG"]);

    let filtered = DataProcessor::filter_by_team_and_position(&df, &teams, &positions).unwrap();
    assert_eq!(filtered.height(), 7);
    assert!(!DataProcessor::unique_values(&filtered, POSITION_COL).contains(&"SF-PF".to_string()));
}

#[test]
fn team_and_position_filters_combine() {
    let df = cleaned();
    let filtered =
        DataProcessor::filter_by_team_and_position(&df, &set(&["LAL"]), &set(&["PG"])).unwrap();
    assert_eq!(filtered.height(), 1);

    let player = filtered.column("Player").unwrap().str().unwrap().get(0);
    assert_eq!(player, Some("LeBron James"));
}

#[test]
fn empty_team_selection_gives_empty_table_and_header_only_csv() {
    let df = cleaned();
    let filtered =
        DataProcessor::filter_by_team_and_position(&df, &BTreeSet::new(), &set(&["C"])).unwrap();
    assert_eq!(filtered.height(), 0);
    assert_eq!(filtered.width(), df.width());

    let csv = CsvExporter::to_csv_string(&filtered).unwrap();
    assert_eq!(csv.lines().count(), 1);
    assert!(csv.starts_with("Player,Pos,Age,Tm,"));
}

#[test]
fn exported_csv_reads_back() {
    let df = cleaned();
    let csv = CsvExporter::to_csv_string(&df).unwrap();
    let back = CsvExporter::parse_csv(&csv).unwrap();

    assert_eq!(back.shape(), df.shape());
    assert!(back.equals(&df));
}

#[test]
fn correlation_matrix_of_page_is_symmetric_with_unit_diagonal() {
    let df = cleaned();
    let matrix = StatsCalculator::correlation_matrix(&df).unwrap();

    assert_eq!(matrix.columns, DataProcessor::numeric_columns(&df));
    assert_eq!(matrix.len(), 11);
    for i in 0..matrix.len() {
        assert_eq!(matrix.get(i, i), 1.0);
        for j in 0..matrix.len() {
            let (a, b) = (matrix.get(i, j), matrix.get(j, i));
            assert!(a == b || (a.is_nan() && b.is_nan()));
            assert!(a.is_nan() || (-1.0..=1.0).contains(&a));
        }
    }

    let (lo, hi) = matrix.visible_range().unwrap();
    assert!(lo <= hi && hi <= 1.0);
}

#[test]
fn heatmap_renders_for_filtered_table() {
    let df = cleaned();
    let matrix = StatsCalculator::correlation_matrix(&df).unwrap();
    let buf = HeatmapRenderer::render_rgb(&matrix, 700, 500, false).unwrap();
    assert_eq!(buf.len(), 700 * 500 * 3);
}
