//! Dataset Profiler Module
//! Read-only reporting: shape, dtypes, missing counts and summary statistics.

use polars::prelude::*;
use serde::Serialize;

use crate::stats::{ColumnSummary, StatsCalculator};

/// Snapshot of a frame's shape, schema and summary statistics.
#[derive(Debug, Clone, Serialize)]
pub struct DatasetProfile {
    pub rows: usize,
    pub columns: usize,
    /// (column, dtype) in frame order.
    pub dtypes: Vec<(String, String)>,
    /// (column, null count) in frame order.
    pub missing: Vec<(String, usize)>,
    pub summary: Vec<ColumnSummary>,
}

impl DatasetProfile {
    pub fn of(df: &DataFrame) -> Self {
        let dtypes = df
            .get_columns()
            .iter()
            .map(|col| (col.name().to_string(), col.dtype().to_string()))
            .collect();
        let missing = df
            .get_columns()
            .iter()
            .map(|col| {
                (
                    col.name().to_string(),
                    col.as_materialized_series().null_count(),
                )
            })
            .collect();

        Self {
            rows: df.height(),
            columns: df.width(),
            dtypes,
            missing,
            summary: StatsCalculator::describe(df),
        }
    }

    /// Print the profile to stdout under a heading, in a fixed order:
    /// shape, dtypes, missing counts, summary statistics.
    pub fn print(&self, heading: &str) {
        println!("\n{heading}");
        println!("Shape: {} rows x {} columns", self.rows, self.columns);

        println!("\nColumn dtypes:");
        for (name, dtype) in &self.dtypes {
            println!("  {name:<22} {dtype}");
        }

        println!("\nMissing values per column:");
        for (name, count) in &self.missing {
            println!("  {name:<22} {count}");
        }

        println!("\nSummary statistics (numeric columns):");
        println!(
            "  {:<22} {:>6} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10}",
            "column", "count", "mean", "std", "min", "25%", "50%", "75%", "max"
        );
        for s in &self.summary {
            println!(
                "  {:<22} {:>6} {:>10.3} {:>10.3} {:>10.3} {:>10.3} {:>10.3} {:>10.3} {:>10.3}",
                s.name, s.count, s.mean, s.std, s.min, s.q25, s.median, s.q75, s.max
            );
        }
    }

    /// Total missing cells across all columns.
    pub fn total_missing(&self) -> usize {
        self.missing.iter().map(|(_, n)| n).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_counts_shape_and_nulls() {
        let df = df![
            "Age" => [Some(20.0f64), None, Some(22.0)],
            "Gender" => ["Male", "Female", "Male"],
        ]
        .unwrap();

        let profile = DatasetProfile::of(&df);
        assert_eq!(profile.rows, 3);
        assert_eq!(profile.columns, 2);
        assert_eq!(profile.missing[0], ("Age".to_string(), 1));
        assert_eq!(profile.missing[1], ("Gender".to_string(), 0));
        assert_eq!(profile.total_missing(), 1);
        // Only the numeric column gets a summary row.
        assert_eq!(profile.summary.len(), 1);
        assert_eq!(profile.summary[0].count, 2);
    }
}
