//! Statistics Calculator Module
//! Descriptive statistics, Pearson correlation and the two-sample t-test.

use polars::prelude::*;
use rayon::prelude::*;
use serde::Serialize;
use statrs::distribution::{ContinuousCDF, StudentsT};

use crate::data::{DataLoader, DataProcessor};

/// Summary statistics for one numeric column, in the order the console
/// report prints them.
#[derive(Debug, Clone, Serialize)]
pub struct ColumnSummary {
    pub name: String,
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

/// Variance assumption for the independent two-sample t-test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum VarianceAssumption {
    /// Student's t-test with pooled variance.
    #[default]
    Pooled,
    /// Welch's t-test, no equal-variance assumption.
    Unequal,
}

/// Result of an independent two-sample t-test.
#[derive(Debug, Clone, Serialize)]
pub struct TTestResult {
    pub t_stat: f64,
    pub df: f64,
    pub p_value: f64,
    pub n_a: usize,
    pub n_b: usize,
    pub mean_a: f64,
    pub mean_b: f64,
    pub variance: VarianceAssumption,
}

/// Handles statistical calculations.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Compute summary statistics for a slice of values.
    pub fn summarize(name: &str, values: &[f64]) -> ColumnSummary {
        let n = values.len();
        if n == 0 {
            return ColumnSummary {
                name: name.to_string(),
                count: 0,
                mean: f64::NAN,
                std: f64::NAN,
                min: f64::NAN,
                q25: f64::NAN,
                median: f64::NAN,
                q75: f64::NAN,
                max: f64::NAN,
            };
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let mean = values.iter().sum::<f64>() / n as f64;
        let variance = if n > 1 {
            values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64
        } else {
            0.0
        };

        ColumnSummary {
            name: name.to_string(),
            count: n,
            mean,
            std: variance.sqrt(),
            min: sorted[0],
            q25: Self::percentile(&sorted, 25.0),
            median: Self::percentile(&sorted, 50.0),
            q75: Self::percentile(&sorted, 75.0),
            max: sorted[n - 1],
        }
    }

    /// Summary statistics for every numeric column of the frame.
    pub fn describe(df: &DataFrame) -> Vec<ColumnSummary> {
        let columns: Vec<(String, Vec<f64>)> = DataLoader::numeric_columns(df)
            .into_iter()
            .filter_map(|name| {
                DataProcessor::numeric_values(df, &name)
                    .ok()
                    .map(|values| (name, values))
            })
            .collect();

        columns
            .par_iter()
            .map(|(name, values)| Self::summarize(name, values))
            .collect()
    }

    /// Calculate percentile using linear interpolation (NumPy compatible).
    fn percentile(sorted_values: &[f64], p: f64) -> f64 {
        let n = sorted_values.len();
        if n == 0 {
            return f64::NAN;
        }
        if n == 1 {
            return sorted_values[0];
        }

        let rank = (p / 100.0) * (n - 1) as f64;
        let lower = rank.floor() as usize;
        let upper = (rank.ceil() as usize).min(n - 1);
        let frac = rank - lower as f64;

        if lower == upper {
            sorted_values[lower]
        } else {
            sorted_values[lower] * (1.0 - frac) + sorted_values[upper] * frac
        }
    }

    /// Pearson correlation coefficient of two equal-length samples.
    pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
        let n = x.len().min(y.len());
        if n < 2 {
            return f64::NAN;
        }

        let mean_x = x[..n].iter().sum::<f64>() / n as f64;
        let mean_y = y[..n].iter().sum::<f64>() / n as f64;

        let mut cov = 0.0;
        let mut var_x = 0.0;
        let mut var_y = 0.0;
        for i in 0..n {
            let dx = x[i] - mean_x;
            let dy = y[i] - mean_y;
            cov += dx * dy;
            var_x += dx * dx;
            var_y += dy * dy;
        }

        let denom = (var_x * var_y).sqrt();
        if denom == 0.0 {
            f64::NAN
        } else {
            cov / denom
        }
    }

    /// Pairwise Pearson correlation matrix over the numeric columns.
    /// Returns the column names and the square matrix in that order.
    pub fn correlation_matrix(df: &DataFrame) -> (Vec<String>, Vec<Vec<f64>>) {
        let names = DataLoader::numeric_columns(df);
        let columns: Vec<Vec<f64>> = names
            .iter()
            .map(|name| DataProcessor::numeric_values(df, name).unwrap_or_default())
            .collect();

        let matrix: Vec<Vec<f64>> = (0..columns.len())
            .into_par_iter()
            .map(|i| {
                (0..columns.len())
                    .map(|j| {
                        if i == j {
                            1.0
                        } else {
                            Self::pearson(&columns[i], &columns[j])
                        }
                    })
                    .collect()
            })
            .collect();

        (names, matrix)
    }

    /// Independent two-sample t-test, two-tailed. Returns `None` when either
    /// sample has fewer than two observations.
    pub fn ttest_ind(
        a: &[f64],
        b: &[f64],
        variance: VarianceAssumption,
    ) -> Option<TTestResult> {
        let n1 = a.len() as f64;
        let n2 = b.len() as f64;
        if n1 < 2.0 || n2 < 2.0 {
            return None;
        }

        let mean1 = a.iter().sum::<f64>() / n1;
        let mean2 = b.iter().sum::<f64>() / n2;
        let var1 = a.iter().map(|x| (x - mean1).powi(2)).sum::<f64>() / (n1 - 1.0);
        let var2 = b.iter().map(|x| (x - mean2).powi(2)).sum::<f64>() / (n2 - 1.0);

        let (t, df) = match variance {
            VarianceAssumption::Pooled => {
                let df = n1 + n2 - 2.0;
                let pooled = ((n1 - 1.0) * var1 + (n2 - 1.0) * var2) / df;
                let se = (pooled * (1.0 / n1 + 1.0 / n2)).sqrt();
                if se == 0.0 {
                    // Both samples constant and equal; no evidence either way.
                    return Some(TTestResult {
                        t_stat: 0.0,
                        df,
                        p_value: 1.0,
                        n_a: a.len(),
                        n_b: b.len(),
                        mean_a: mean1,
                        mean_b: mean2,
                        variance,
                    });
                }
                ((mean1 - mean2) / se, df)
            }
            VarianceAssumption::Unequal => {
                let se = (var1 / n1 + var2 / n2).sqrt();
                if se == 0.0 {
                    return Some(TTestResult {
                        t_stat: 0.0,
                        df: n1 + n2 - 2.0,
                        p_value: 1.0,
                        n_a: a.len(),
                        n_b: b.len(),
                        mean_a: mean1,
                        mean_b: mean2,
                        variance,
                    });
                }
                let t = (mean1 - mean2) / se;
                // Welch-Satterthwaite degrees of freedom
                let df_num = (var1 / n1 + var2 / n2).powi(2);
                let df_denom =
                    (var1 / n1).powi(2) / (n1 - 1.0) + (var2 / n2).powi(2) / (n2 - 1.0);
                (t, df_num / df_denom)
            }
        };

        let dist = StudentsT::new(0.0, 1.0, df).ok()?;
        let p_value = 2.0 * (1.0 - dist.cdf(t.abs()));

        Some(TTestResult {
            t_stat: t,
            df,
            p_value,
            n_a: a.len(),
            n_b: b.len(),
            mean_a: mean1,
            mean_b: mean2,
            variance,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summarize_basic() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        let s = StatsCalculator::summarize("x", &values);
        assert_eq!(s.count, 5);
        assert!((s.mean - 3.0).abs() < 1e-12);
        assert!((s.median - 3.0).abs() < 1e-12);
        assert!((s.q25 - 2.0).abs() < 1e-12);
        assert!((s.q75 - 4.0).abs() < 1e-12);
        assert_eq!(s.min, 1.0);
        assert_eq!(s.max, 5.0);
        // Sample std of 1..5 is sqrt(2.5).
        assert!((s.std - 2.5f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn percentile_interpolates() {
        let sorted = [10.0, 20.0, 30.0, 40.0];
        // rank = 0.5 * 3 = 1.5 -> halfway between 20 and 30
        assert!((StatsCalculator::percentile(&sorted, 50.0) - 25.0).abs() < 1e-12);
        assert_eq!(StatsCalculator::percentile(&sorted, 0.0), 10.0);
        assert_eq!(StatsCalculator::percentile(&sorted, 100.0), 40.0);
    }

    #[test]
    fn pearson_of_linear_data_is_one() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let y = [2.0, 4.0, 6.0, 8.0];
        assert!((StatsCalculator::pearson(&x, &y) - 1.0).abs() < 1e-12);
        let neg = [8.0, 6.0, 4.0, 2.0];
        assert!((StatsCalculator::pearson(&x, &neg) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn correlation_matrix_is_symmetric_with_unit_diagonal() {
        let df = df![
            "a" => [1.0f64, 2.0, 3.0, 4.0],
            "b" => [2.0f64, 4.0, 6.0, 8.0],
            "c" => [4.0f64, 3.0, 2.0, 1.0],
        ]
        .unwrap();

        let (names, m) = StatsCalculator::correlation_matrix(&df);
        assert_eq!(names.len(), 3);
        for i in 0..3 {
            assert!((m[i][i] - 1.0).abs() < 1e-12);
            for j in 0..3 {
                assert!((m[i][j] - m[j][i]).abs() < 1e-12);
            }
        }
        assert!((m[0][2] + 1.0).abs() < 1e-12);
    }

    #[test]
    fn ttest_identical_samples_not_significant() {
        let a = [5.0, 6.0, 7.0, 8.0, 9.0];
        let r = StatsCalculator::ttest_ind(&a, &a, VarianceAssumption::Pooled).unwrap();
        assert!(r.t_stat.abs() < 1e-12);
        assert!(r.p_value > 0.99);
    }

    #[test]
    fn ttest_separated_samples_significant() {
        let a = [1.0, 1.1, 0.9, 1.05, 0.95];
        let b = [10.0, 10.1, 9.9, 10.05, 9.95];
        for variance in [VarianceAssumption::Pooled, VarianceAssumption::Unequal] {
            let r = StatsCalculator::ttest_ind(&a, &b, variance).unwrap();
            assert!(r.p_value < 1e-6);
            assert!(r.t_stat < 0.0);
        }
    }

    #[test]
    fn ttest_pooled_degrees_of_freedom() {
        let a = [1.0, 2.0, 3.0];
        let b = [2.0, 3.0, 4.0, 5.0];
        let r = StatsCalculator::ttest_ind(&a, &b, VarianceAssumption::Pooled).unwrap();
        assert_eq!(r.df, 5.0);
    }

    #[test]
    fn ttest_undersized_sample_is_none() {
        assert!(StatsCalculator::ttest_ind(&[1.0], &[1.0, 2.0], VarianceAssumption::Pooled)
            .is_none());
    }
}
