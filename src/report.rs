//! Analysis Summary Report
//! Machine-readable counterpart of the console output, written as JSON
//! next to the cleaned CSV.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::data::CleanReport;
use crate::stats::TTestResult;

#[derive(Debug, Serialize)]
pub struct AnalysisSummary {
    pub input: String,
    pub output: String,
    pub rows: usize,
    pub columns: usize,
    pub cleaning: CleanReport,
    pub low_sleep_rows: usize,
    /// (Gender, mean Sleep_Quality)
    pub avg_sleep_quality_by_gender: Vec<(String, f64)>,
    /// (University_Year, mean Study_Hours)
    pub avg_study_hours_by_year: Vec<(String, f64)>,
    /// None when either caffeine group is too small to test.
    pub caffeine_sleep_quality_ttest: Option<TTestResult>,
}

pub fn write_summary(summary: &AnalysisSummary, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("creating summary file {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), summary)
        .with_context(|| format!("writing summary to {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_serializes_and_writes() {
        let summary = AnalysisSummary {
            input: "in.csv".to_string(),
            output: "out.csv".to_string(),
            rows: 10,
            columns: 4,
            cleaning: CleanReport::default(),
            low_sleep_rows: 2,
            avg_sleep_quality_by_gender: vec![("Female".to_string(), 7.0)],
            avg_study_hours_by_year: vec![("1st Year".to_string(), 6.0)],
            caffeine_sleep_quality_ttest: None,
        };

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("analysis_summary.json");
        write_summary(&summary, &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed["rows"], 10);
        assert_eq!(parsed["avg_sleep_quality_by_gender"][0][0], "Female");
    }
}
