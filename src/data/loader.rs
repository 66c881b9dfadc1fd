//! CSV Data Loader Module
//! Handles CSV file loading and schema checks using Polars.

use polars::prelude::*;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load CSV: {0}")]
    Csv(#[from] PolarsError),
    #[error("Required column missing from input: {0}")]
    MissingColumn(String),
}

/// Columns the analysis references by name. Checked once at load time so a
/// schema mismatch fails up front instead of at the point of first use.
pub const REQUIRED_COLUMNS: [&str; 12] = [
    "Age",
    "Gender",
    "University_Year",
    "Sleep_Duration",
    "Study_Hours",
    "Caffeine_Intake",
    "Physical_Activity",
    "Sleep_Quality",
    "Weekday_Sleep_Start",
    "Weekday_Sleep_End",
    "Weekend_Sleep_Start",
    "Weekend_Sleep_End",
];

/// Handles CSV file loading with Polars.
pub struct DataLoader;

impl DataLoader {
    /// Load a CSV file with inferred column types.
    pub fn load_csv(file_path: &str) -> Result<DataFrame, LoaderError> {
        let df = LazyCsvReader::new(file_path)
            .with_infer_schema_length(Some(10000))
            .finish()?
            .collect()?;
        Ok(df)
    }

    /// Verify every column the pipeline references exists in the frame.
    pub fn check_required_columns(df: &DataFrame) -> Result<(), LoaderError> {
        for name in REQUIRED_COLUMNS {
            if df.column(name).is_err() {
                return Err(LoaderError::MissingColumn(name.to_string()));
            }
        }
        Ok(())
    }

    /// Get list of numeric column names.
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

    /// Get list of categorical (string) column names.
    pub fn categorical_columns(df: &DataFrame) -> Vec<String> {
        df.get_columns()
            .iter()
            .filter(|col| matches!(col.dtype(), DataType::String))
            .map(|col| col.name().to_string())
            .collect()
    }
}
