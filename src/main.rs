//! sleeplens - Student sleep pattern EDA
//!
//! Loads a CSV of student sleep records, cleans it (mean/mode imputation,
//! deduplication), prints descriptive statistics, renders charts, runs a
//! caffeine/sleep-quality t-test and writes the cleaned dataset back out.

mod charts;
mod data;
mod pipeline;
mod report;
mod stats;

use clap::Parser;
use std::path::PathBuf;

use pipeline::PipelineConfig;
use stats::VarianceAssumption;

#[derive(Parser, Debug)]
#[command(name = "sleeplens")]
#[command(version, about, long_about = None)]
struct Args {
    /// Input CSV of student sleep records
    #[arg(short, long, default_value = "student_sleep_patterns.csv")]
    input: String,

    /// Destination for the cleaned dataset
    #[arg(short, long, default_value = "cleaned_student_data.csv")]
    output: PathBuf,

    /// Directory the chart PNGs are written to
    #[arg(long, default_value = "charts")]
    charts_dir: PathBuf,

    /// Skip chart rendering
    #[arg(long)]
    no_charts: bool,

    /// Use Welch's t-test (unequal variances) instead of the pooled-variance
    /// Student's t-test
    #[arg(long)]
    welch: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = PipelineConfig {
        input: args.input,
        output: args.output,
        charts_dir: args.charts_dir,
        render_charts: !args.no_charts,
        variance: if args.welch {
            VarianceAssumption::Unequal
        } else {
            VarianceAssumption::Pooled
        },
    };

    pipeline::run(&config)
}
