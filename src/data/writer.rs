//! CSV Data Writer Module
//! Serializes the final frame back to disk.

use polars::prelude::*;
use std::fs::File;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WriterError {
    #[error("Failed to create output file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to write CSV: {0}")]
    Csv(#[from] PolarsError),
}

/// Handles CSV output with Polars.
pub struct DataWriter;

impl DataWriter {
    /// Write the frame as comma-delimited CSV with a header row and no
    /// index column. Overwrites any existing file at `path`.
    pub fn write_csv(df: &mut DataFrame, path: &Path) -> Result<(), WriterError> {
        let file = File::create(path)?;
        CsvWriter::new(file).include_header(true).finish(df)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DataLoader;

    #[test]
    fn round_trip_preserves_shape_and_columns() {
        let mut df = df![
            "Age" => [20.0f64, 21.0, 22.0],
            "Gender" => ["Male", "Female", "Male"],
            "Sleep_Efficiency" => [0.9f64, 1.1, 0.8],
        ]
        .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cleaned_student_data.csv");
        DataWriter::write_csv(&mut df, &path).unwrap();

        let reloaded = DataLoader::load_csv(path.to_str().unwrap()).unwrap();
        assert_eq!(reloaded.height(), df.height());
        assert_eq!(reloaded.get_column_names(), df.get_column_names());
    }

    #[test]
    fn unwritable_destination_fails() {
        let mut df = df!["Age" => [20.0f64]].unwrap();
        let err = DataWriter::write_csv(&mut df, Path::new("/no/such/dir/out.csv"));
        assert!(err.is_err());
    }
}
