//! Statistics Calculator Module
//! Pairwise Pearson correlation over the numeric columns of a table.

use crate::data::DataProcessor;
use polars::prelude::*;
use rayon::prelude::*;
use statrs::statistics::Statistics;

/// Square correlation matrix, row-major, labelled by column name.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[row][col]
    }

    /// Upper triangle including the diagonal is hidden from display.
    pub fn is_masked(&self, row: usize, col: usize) -> bool {
        col >= row
    }

    /// Min and max over visible finite cells.
    pub fn visible_range(&self) -> Option<(f64, f64)> {
        let mut range: Option<(f64, f64)> = None;
        for row in 0..self.len() {
            for col in 0..row {
                let v = self.values[row][col];
                if !v.is_finite() {
                    continue;
                }
                range = Some(match range {
                    Some((lo, hi)) => (lo.min(v), hi.max(v)),
                    None => (v, v),
                });
            }
        }
        range
    }
}

pub struct StatsCalculator;

impl StatsCalculator {
    /// Sample Pearson correlation. NaN when fewer than two values or either
    /// side has zero variance.
    pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
        if x.len() != y.len() || x.len() < 2 {
            return f64::NAN;
        }

        let std_x = x.iter().std_dev();
        let std_y = y.iter().std_dev();
        if std_x == 0.0 || std_y == 0.0 || std_x.is_nan() || std_y.is_nan() {
            return f64::NAN;
        }

        let r = x.iter().covariance(y.iter()) / (std_x * std_y);
        r.clamp(-1.0, 1.0)
    }

    /// Numeric column values as f64, nulls as NaN.
    fn column_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<f64>> {
        let column = df.column(name)?.cast(&DataType::Float64)?;
        Ok(column
            .f64()?
            .into_iter()
            .map(|v| v.unwrap_or(f64::NAN))
            .collect())
    }

    /// Correlation matrix over the numeric columns of `df`.
    pub fn correlation_matrix(df: &DataFrame) -> PolarsResult<CorrelationMatrix> {
        let columns = DataProcessor::numeric_columns(df);
        let data = columns
            .iter()
            .map(|name| Self::column_values(df, name))
            .collect::<PolarsResult<Vec<_>>>()?;

        let n = columns.len();
        let pairs: Vec<(usize, usize)> = (0..n)
            .flat_map(|i| (i..n).map(move |j| (i, j)))
            .collect();

        let results: Vec<(usize, usize, f64)> = pairs
            .par_iter()
            .map(|&(i, j)| {
                let r = Self::pearson(&data[i], &data[j]);
                // r of a non-constant column with itself is exactly one
                let r = if i == j && r.is_finite() { 1.0 } else { r };
                (i, j, r)
            })
            .collect();

        let mut values = vec![vec![f64::NAN; n]; n];
        for (i, j, r) in results {
            values[i][j] = r;
            values[j][i] = r;
        }

        log::debug!("Computed {}x{} correlation matrix over {} rows", n, n, df.height());
        Ok(CorrelationMatrix { columns, values })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> DataFrame {
        df![
            "Player" => ["a", "b", "c", "d", "e"],
            "PTS" => [10.0, 20.0, 30.0, 40.0, 50.0],
            "TOV" => [5.0, 4.0, 3.0, 2.0, 1.0],
            "AST" => [1.0, 3.0, 2.0, 5.0, 4.0],
            "GS" => [0.0, 0.0, 0.0, 0.0, 0.0],
        ]
        .unwrap()
    }

    #[test]
    fn pearson_of_linear_series() {
        let x = [1.0, 2.0, 3.0, 4.0];
        assert!((StatsCalculator::pearson(&x, &[2.0, 4.0, 6.0, 8.0]) - 1.0).abs() < 1e-12);
        assert!((StatsCalculator::pearson(&x, &[8.0, 6.0, 4.0, 2.0]) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn pearson_of_degenerate_input_is_nan() {
        assert!(StatsCalculator::pearson(&[1.0], &[2.0]).is_nan());
        assert!(StatsCalculator::pearson(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0]).is_nan());
        assert!(StatsCalculator::pearson(&[1.0, 2.0], &[1.0, 2.0, 3.0]).is_nan());
    }

    #[test]
    fn matrix_skips_string_columns() {
        let m = StatsCalculator::correlation_matrix(&frame()).unwrap();
        assert_eq!(m.columns, vec!["PTS", "TOV", "AST", "GS"]);
        assert_eq!(m.len(), 4);
    }

    #[test]
    fn matrix_is_symmetric_with_unit_diagonal() {
        let m = StatsCalculator::correlation_matrix(&frame()).unwrap();
        for i in 0..3 {
            assert_eq!(m.get(i, i), 1.0);
            for j in 0..3 {
                assert_eq!(m.get(i, j), m.get(j, i));
            }
        }
        assert!((m.get(0, 1) + 1.0).abs() < 1e-12);
        assert!((m.get(0, 2) - 0.8).abs() < 1e-12);
    }

    #[test]
    fn constant_column_correlates_to_nan() {
        let m = StatsCalculator::correlation_matrix(&frame()).unwrap();
        assert!(m.get(3, 3).is_nan());
        assert!(m.get(0, 3).is_nan());
        assert!(m.get(3, 0).is_nan());
    }

    #[test]
    fn mask_hides_upper_triangle_and_diagonal() {
        let m = StatsCalculator::correlation_matrix(&frame()).unwrap();
        assert!(m.is_masked(0, 0));
        assert!(m.is_masked(1, 2));
        assert!(!m.is_masked(2, 1));

        let (lo, hi) = m.visible_range().unwrap();
        assert!((lo + 1.0).abs() < 1e-12);
        assert!(hi < 1.0);
    }

    #[test]
    fn empty_frame_gives_empty_matrix() {
        let df = df!["Player" => ["a"]].unwrap();
        let m = StatsCalculator::correlation_matrix(&df).unwrap();
        assert!(m.is_empty());
        assert_eq!(m.visible_range(), None);
    }
}
