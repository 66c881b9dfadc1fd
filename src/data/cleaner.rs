//! Data Cleaner Module
//! Mean/mode imputation and duplicate removal.

use polars::prelude::*;
use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;

use crate::data::DataLoader;

#[derive(Error, Debug)]
pub enum CleanerError {
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
}

/// What the cleaning pass actually did, for the console report and the
/// JSON summary.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CleanReport {
    /// (column, fill value, cells filled)
    pub numeric_imputed: Vec<(String, f64, usize)>,
    /// (column, fill value, cells filled)
    pub categorical_imputed: Vec<(String, String, usize)>,
    pub duplicates_removed: usize,
}

/// Handles missing-value imputation and deduplication.
pub struct DataCleaner;

impl DataCleaner {
    /// Clean the frame in three ordered steps: mean-impute numeric columns,
    /// mode-impute categorical columns, drop exact-duplicate rows (first
    /// occurrence kept). Each column is imputed from its own original
    /// values, so column order does not matter.
    pub fn clean(df: DataFrame) -> Result<(DataFrame, CleanReport), CleanerError> {
        let mut report = CleanReport::default();
        let mut fills: Vec<Expr> = Vec::new();

        for name in DataLoader::numeric_columns(&df) {
            let series = df.column(&name)?.as_materialized_series();
            let nulls = series.null_count();
            if nulls == 0 {
                continue;
            }
            if let Some(mean) = series.mean() {
                fills.push(col(name.as_str()).fill_null(lit(mean)));
                report.numeric_imputed.push((name, mean, nulls));
            }
        }

        for name in DataLoader::categorical_columns(&df) {
            let series = df.column(&name)?.as_materialized_series();
            let nulls = series.null_count();
            if nulls == 0 {
                continue;
            }
            if let Some(mode) = Self::mode(series.str()?) {
                fills.push(col(name.as_str()).fill_null(lit(mode.clone())));
                report.categorical_imputed.push((name, mode, nulls));
            }
        }

        let df = if fills.is_empty() {
            df
        } else {
            df.lazy().with_columns(fills).collect()?
        };

        let before = df.height();
        let df = df.unique_stable(None, UniqueKeepStrategy::First, None)?;
        report.duplicates_removed = before - df.height();

        Ok((df, report))
    }

    /// Most frequent value of a string column. Ties are broken
    /// deterministically: the lexicographically smallest value wins.
    fn mode(ca: &StringChunked) -> Option<String> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for v in ca.into_iter().flatten() {
            *counts.entry(v).or_insert(0) += 1;
        }
        counts
            .into_iter()
            .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(a.0)))
            .map(|(v, _)| v.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_imputation_preserves_column_mean() {
        let df = df![
            "Age" => [Some(20.0f64), None, Some(30.0), Some(25.0)],
            "Gender" => ["Male", "Female", "Male", "Female"],
        ]
        .unwrap();

        let (cleaned, report) = DataCleaner::clean(df).unwrap();
        let age = cleaned.column("Age").unwrap().as_materialized_series();
        assert_eq!(age.null_count(), 0);
        // Original mean of the three non-null values.
        let expected = (20.0 + 30.0 + 25.0) / 3.0;
        assert!((age.mean().unwrap() - expected).abs() < 1e-12);
        assert_eq!(report.numeric_imputed.len(), 1);
        assert_eq!(report.numeric_imputed[0].2, 1);
    }

    #[test]
    fn mode_imputation_uses_most_frequent_value() {
        let df = df![
            "Age" => [20.0f64, 21.0, 22.0, 23.0],
            "Gender" => [Some("Male"), Some("Male"), None, Some("Female")],
        ]
        .unwrap();

        let (cleaned, report) = DataCleaner::clean(df).unwrap();
        let gender = cleaned.column("Gender").unwrap().as_materialized_series();
        assert_eq!(gender.null_count(), 0);
        assert_eq!(gender.str().unwrap().get(2), Some("Male"));
        assert_eq!(report.categorical_imputed[0].1, "Male");
    }

    #[test]
    fn mode_tie_breaks_lexicographically() {
        let values: Vec<Option<&str>> =
            vec![Some("beta"), Some("alpha"), Some("beta"), Some("alpha")];
        let ca = StringChunked::new("x".into(), values);
        assert_eq!(DataCleaner::mode(&ca), Some("alpha".to_string()));
    }

    #[test]
    fn duplicates_removed_first_kept() {
        let df = df![
            "Age" => [20.0f64, 20.0, 21.0],
            "Gender" => ["Male", "Male", "Female"],
        ]
        .unwrap();

        let (cleaned, report) = DataCleaner::clean(df).unwrap();
        assert_eq!(cleaned.height(), 2);
        assert_eq!(report.duplicates_removed, 1);
        let age = cleaned.column("Age").unwrap().as_materialized_series();
        assert_eq!(age.f64().unwrap().get(0), Some(20.0));
    }

    #[test]
    fn clean_is_noop_on_complete_data() {
        let df = df![
            "Age" => [20.0f64, 21.0],
            "Gender" => ["Male", "Female"],
        ]
        .unwrap();

        let (cleaned, report) = DataCleaner::clean(df.clone()).unwrap();
        assert!(cleaned.equals(&df));
        assert!(report.numeric_imputed.is_empty());
        assert!(report.categorical_imputed.is_empty());
        assert_eq!(report.duplicates_removed, 0);
    }
}
