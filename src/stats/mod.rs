//! Statistics module - descriptive stats, correlation, t-test and profiling

mod calculator;
mod profiler;

pub use calculator::{ColumnSummary, StatsCalculator, TTestResult, VarianceAssumption};
pub use profiler::DatasetProfile;
