//! Pipeline orchestration
//! Runs the analysis stages in their fixed order: load, profile, clean,
//! profile again, render charts, transform, t-test, pivot, write.

use anyhow::{Context, Result};
use log::{info, warn};
use std::path::PathBuf;

use crate::charts::ChartRenderer;
use crate::data::{DataCleaner, DataLoader, DataProcessor, DataWriter};
use crate::report::{self, AnalysisSummary};
use crate::stats::{DatasetProfile, StatsCalculator, VarianceAssumption};

const LOW_SLEEP_THRESHOLD: f64 = 6.0;

pub struct PipelineConfig {
    pub input: String,
    pub output: PathBuf,
    pub charts_dir: PathBuf,
    pub render_charts: bool,
    pub variance: VarianceAssumption,
}

pub fn run(config: &PipelineConfig) -> Result<()> {
    info!("Loading {}", config.input);
    let df = DataLoader::load_csv(&config.input)
        .with_context(|| format!("loading {}", config.input))?;
    DataLoader::check_required_columns(&df)?;

    DatasetProfile::of(&df).print("Dataset Information:");

    let (df, clean_report) = DataCleaner::clean(df)?;
    for (name, mean, n) in &clean_report.numeric_imputed {
        info!("Imputed {n} missing value(s) in {name} with mean {mean:.3}");
    }
    for (name, mode, n) in &clean_report.categorical_imputed {
        info!("Imputed {n} missing value(s) in {name} with mode {mode:?}");
    }
    info!(
        "Removed {} duplicate row(s)",
        clean_report.duplicates_removed
    );

    let profile = DatasetProfile::of(&df);
    profile.print("Dataset Information after Cleaning:");
    debug_assert_eq!(profile.total_missing(), 0);

    if config.render_charts {
        let rendered = ChartRenderer::new(&config.charts_dir).render_all(&df);
        info!(
            "Rendered {rendered} chart(s) into {}",
            config.charts_dir.display()
        );
    }

    // Inspection subset, printed only.
    let low_sleep = DataProcessor::filter_lt(&df, "Sleep_Duration", LOW_SLEEP_THRESHOLD)?;
    println!(
        "\nStudents with Sleep Duration less than {LOW_SLEEP_THRESHOLD} hours ({} total):",
        low_sleep.height()
    );
    println!("{}", low_sleep.head(Some(5)));

    let by_gender = DataProcessor::group_mean(&df, "Gender", "Sleep_Quality")?;
    println!("\nAverage Sleep Quality by Gender:");
    println!("{by_gender}");

    // The only mutation of the canonical table after cleaning.
    let df = DataProcessor::with_sleep_efficiency(df)?;
    println!("\nSample of data with new Sleep_Efficiency column:");
    println!("{}", df.head(Some(5)));

    let (high_caffeine, low_caffeine) = DataProcessor::split_by_mean(&df, "Caffeine_Intake")?;
    let high_quality = DataProcessor::numeric_values(&high_caffeine, "Sleep_Quality")?;
    let low_quality = DataProcessor::numeric_values(&low_caffeine, "Sleep_Quality")?;
    let ttest = StatsCalculator::ttest_ind(&high_quality, &low_quality, config.variance);

    println!("\nT-Test Results for Caffeine Intake and Sleep Quality:");
    match &ttest {
        Some(r) => println!(
            "T-statistic: {:.6}, P-value: {:.6} (df = {:.1}, n = {}/{}, {:?} variance)",
            r.t_stat, r.p_value, r.df, r.n_a, r.n_b, r.variance
        ),
        None => warn!("Caffeine groups too small for a t-test"),
    }

    let pivot = DataProcessor::pivot_mean(&df, "University_Year", "Study_Hours")?;
    println!("\nPivot Table - Average Study Hours by University Year:");
    println!("{pivot}");

    let mut final_df = df;
    DataWriter::write_csv(&mut final_df, &config.output)
        .with_context(|| format!("writing {}", config.output.display()))?;

    let summary = AnalysisSummary {
        input: config.input.clone(),
        output: config.output.display().to_string(),
        rows: final_df.height(),
        columns: final_df.width(),
        cleaning: clean_report,
        low_sleep_rows: low_sleep.height(),
        avg_sleep_quality_by_gender: key_mean_pairs(&by_gender, "Gender", "Sleep_Quality")?,
        avg_study_hours_by_year: key_mean_pairs(&pivot, "University_Year", "Study_Hours")?,
        caffeine_sleep_quality_ttest: ttest,
    };
    let summary_path = config.output.with_file_name("analysis_summary.json");
    report::write_summary(&summary, &summary_path)?;

    println!(
        "\nAnalysis completed. The cleaned dataset has been saved as '{}'.",
        config.output.display()
    );
    Ok(())
}

/// Flatten a two-column grouped frame into (key, mean) pairs.
fn key_mean_pairs(
    df: &polars::prelude::DataFrame,
    key: &str,
    value: &str,
) -> Result<Vec<(String, f64)>> {
    let keys = DataProcessor::string_values(df, key)?;
    let means = DataProcessor::numeric_values(df, value)?;
    Ok(keys.into_iter().zip(means).collect())
}
