//! Data Processor Module
//! Row filtering, grouped aggregation, derived columns and pivot summaries.

use polars::prelude::*;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
    #[error("Column {0} has no mean (empty or all-null)")]
    EmptyColumn(String),
}

/// Handles the transformation operations of the pipeline.
pub struct DataProcessor;

impl DataProcessor {
    /// Rows where `column` is strictly below `threshold`.
    pub fn filter_lt(
        df: &DataFrame,
        column: &str,
        threshold: f64,
    ) -> Result<DataFrame, ProcessorError> {
        let filtered = df
            .clone()
            .lazy()
            .filter(col(column).lt(lit(threshold)))
            .collect()?;
        Ok(filtered)
    }

    /// Mean of `value` grouped by `by`, sorted by the group key.
    pub fn group_mean(df: &DataFrame, by: &str, value: &str) -> Result<DataFrame, ProcessorError> {
        let grouped = df
            .clone()
            .lazy()
            .group_by([col(by)])
            .agg([col(value).mean()])
            .sort([by], Default::default())
            .collect()?;
        Ok(grouped)
    }

    /// Pivot summary: one row per distinct `index` value with the mean of
    /// `values`. With a single value column and mean aggregation this is a
    /// sorted group-mean table.
    pub fn pivot_mean(
        df: &DataFrame,
        index: &str,
        values: &str,
    ) -> Result<DataFrame, ProcessorError> {
        Self::group_mean(df, index, values)
    }

    /// Add the derived Sleep_Efficiency column:
    /// `Sleep_Duration / ((Weekday_Sleep_End - Weekday_Sleep_Start)
    ///   + (Weekend_Sleep_End - Weekend_Sleep_Start)) * 2`.
    ///
    /// The denominator is taken as-is: start/end times that are not
    /// wraparound-adjusted produce negative or non-finite results, which
    /// propagate unchanged.
    pub fn with_sleep_efficiency(df: DataFrame) -> Result<DataFrame, ProcessorError> {
        let weekday = col("Weekday_Sleep_End").cast(DataType::Float64)
            - col("Weekday_Sleep_Start").cast(DataType::Float64);
        let weekend = col("Weekend_Sleep_End").cast(DataType::Float64)
            - col("Weekend_Sleep_Start").cast(DataType::Float64);
        let efficiency = (col("Sleep_Duration").cast(DataType::Float64) / (weekday + weekend)
            * lit(2.0))
        .alias("Sleep_Efficiency");

        let df = df.lazy().with_column(efficiency).collect()?;
        Ok(df)
    }

    /// Partition rows by comparing `column` against its own mean:
    /// strictly greater in the first frame, less-or-equal in the second.
    pub fn split_by_mean(
        df: &DataFrame,
        column: &str,
    ) -> Result<(DataFrame, DataFrame), ProcessorError> {
        let mean = df
            .column(column)?
            .as_materialized_series()
            .mean()
            .ok_or_else(|| ProcessorError::EmptyColumn(column.to_string()))?;

        let above = df
            .clone()
            .lazy()
            .filter(col(column).gt(lit(mean)))
            .collect()?;
        let below = df
            .clone()
            .lazy()
            .filter(col(column).lt_eq(lit(mean)))
            .collect()?;
        Ok((above, below))
    }

    /// Non-null values of a column as f64, in row order.
    pub fn numeric_values(df: &DataFrame, column: &str) -> Result<Vec<f64>, ProcessorError> {
        let series = df
            .column(column)?
            .as_materialized_series()
            .cast(&DataType::Float64)?;
        Ok(series.f64()?.into_iter().flatten().collect())
    }

    /// Non-null values of a string column, in row order.
    pub fn string_values(df: &DataFrame, column: &str) -> Result<Vec<String>, ProcessorError> {
        let series = df.column(column)?.as_materialized_series();
        Ok(series
            .str()?
            .into_iter()
            .flatten()
            .map(str::to_string)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_keeps_rows_below_threshold() {
        let df = df![
            "Sleep_Duration" => [5.0f64, 6.0, 7.5, 4.5],
        ]
        .unwrap();

        let low = DataProcessor::filter_lt(&df, "Sleep_Duration", 6.0).unwrap();
        assert_eq!(low.height(), 2);
        assert_eq!(
            DataProcessor::numeric_values(&low, "Sleep_Duration").unwrap(),
            vec![5.0, 4.5]
        );
    }

    #[test]
    fn group_mean_by_gender() {
        let df = df![
            "Gender" => ["M", "M", "F"],
            "Sleep_Quality" => [6.0f64, 8.0, 7.0],
        ]
        .unwrap();

        let grouped = DataProcessor::group_mean(&df, "Gender", "Sleep_Quality").unwrap();
        assert_eq!(
            DataProcessor::string_values(&grouped, "Gender").unwrap(),
            vec!["F", "M"]
        );
        assert_eq!(
            DataProcessor::numeric_values(&grouped, "Sleep_Quality").unwrap(),
            vec![7.0, 7.0]
        );
    }

    #[test]
    fn pivot_mean_study_hours_by_year() {
        let df = df![
            "University_Year" => ["1st Year", "1st Year", "2nd Year"],
            "Study_Hours" => [5.0f64, 7.0, 3.0],
        ]
        .unwrap();

        let pivot = DataProcessor::pivot_mean(&df, "University_Year", "Study_Hours").unwrap();
        assert_eq!(
            DataProcessor::numeric_values(&pivot, "Study_Hours").unwrap(),
            vec![6.0, 3.0]
        );
    }

    #[test]
    fn sleep_efficiency_formula() {
        let df = df![
            "Sleep_Duration" => [8.0f64],
            "Weekday_Sleep_Start" => [22.0f64],
            "Weekday_Sleep_End" => [6.0f64],
            "Weekend_Sleep_Start" => [23.0f64],
            "Weekend_Sleep_End" => [8.0f64],
        ]
        .unwrap();

        let df = DataProcessor::with_sleep_efficiency(df).unwrap();
        let eff = DataProcessor::numeric_values(&df, "Sleep_Efficiency").unwrap();
        // 8 / ((6 - 22) + (8 - 23)) * 2 = 8 / -31 * 2
        let expected = 8.0 / ((6.0 - 22.0) + (8.0 - 23.0)) * 2.0;
        assert!((eff[0] - expected).abs() < 1e-12);
        // Non-wraparound-adjusted times yield a negative value, unguarded.
        assert!(eff[0] < 0.0);
    }

    #[test]
    fn split_by_mean_is_a_partition() {
        let df = df![
            "Caffeine_Intake" => [1.0f64, 2.0, 3.0, 6.0],
            "Sleep_Quality" => [8.0f64, 7.0, 6.0, 4.0],
        ]
        .unwrap();

        // mean = 3.0; strictly greater vs less-or-equal
        let (above, below) = DataProcessor::split_by_mean(&df, "Caffeine_Intake").unwrap();
        assert_eq!(above.height(), 1);
        assert_eq!(below.height(), 3);
        assert_eq!(above.height() + below.height(), df.height());
    }
}
