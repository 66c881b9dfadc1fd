//! Static Chart Renderer
//! Renders the six analysis charts as PNG files using plotters.
//!
//! Charts:
//! 1. Age distribution (histogram + density)
//! 2. Sleep duration distribution (histogram + density)
//! 3. Study hours vs sleep duration (scatter)
//! 4. Correlation heatmap of numeric columns
//! 5. Sleep duration by university year and gender (grouped box plot)
//! 6. Mean physical activity by university year (bar chart)
//!
//! Each chart renders independently; a failure is logged by the caller and
//! must not abort the pipeline.

use anyhow::{Context, Result};
use log::{info, warn};
use plotters::prelude::*;
use polars::prelude::DataFrame;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::data::DataProcessor;
use crate::stats::StatsCalculator;

const CHART_SIZE: (u32, u32) = (1000, 700);
const HIST_BINS: usize = 10;

/// Color palette for categorical series (genders in the box plot).
const PALETTE: [RGBColor; 5] = [
    RGBColor(52, 152, 219),  // Blue
    RGBColor(231, 76, 60),   // Red
    RGBColor(46, 204, 113),  // Green
    RGBColor(155, 89, 182),  // Purple
    RGBColor(243, 156, 18),  // Orange
];

/// Renders analysis charts to PNG files in an output directory.
pub struct ChartRenderer {
    out_dir: PathBuf,
}

impl ChartRenderer {
    pub fn new(out_dir: &Path) -> Self {
        Self {
            out_dir: out_dir.to_path_buf(),
        }
    }

    /// Render all charts, isolating per-chart failures. Returns the number
    /// of charts written.
    pub fn render_all(&self, df: &DataFrame) -> usize {
        if let Err(e) = std::fs::create_dir_all(&self.out_dir) {
            warn!("Cannot create chart directory {:?}: {e}", self.out_dir);
            return 0;
        }

        let charts: [(&str, Result<()>); 6] = [
            ("age_distribution.png", self.age_distribution(df)),
            (
                "sleep_duration_distribution.png",
                self.sleep_duration_distribution(df),
            ),
            ("study_vs_sleep.png", self.study_vs_sleep(df)),
            ("correlation_heatmap.png", self.correlation_heatmap(df)),
            ("sleep_by_year_gender.png", self.sleep_by_year_gender(df)),
            ("activity_by_year.png", self.activity_by_year(df)),
        ];

        let mut rendered = 0;
        for (name, result) in charts {
            match result {
                Ok(()) => {
                    info!("Rendered {}", self.out_dir.join(name).display());
                    rendered += 1;
                }
                Err(e) => warn!("Skipping chart {name}: {e:#}"),
            }
        }
        rendered
    }

    fn age_distribution(&self, df: &DataFrame) -> Result<()> {
        let values = DataProcessor::numeric_values(df, "Age")?;
        self.histogram_with_density(&values, "Age Distribution", "Age", "age_distribution.png")
    }

    fn sleep_duration_distribution(&self, df: &DataFrame) -> Result<()> {
        let values = DataProcessor::numeric_values(df, "Sleep_Duration")?;
        self.histogram_with_density(
            &values,
            "Sleep Duration Distribution",
            "Sleep Duration (hours)",
            "sleep_duration_distribution.png",
        )
    }

    /// Histogram with a Gaussian-KDE density curve scaled to bin counts.
    fn histogram_with_density(
        &self,
        values: &[f64],
        title: &str,
        x_label: &str,
        file: &str,
    ) -> Result<()> {
        anyhow::ensure!(!values.is_empty(), "no values to plot");

        let (mut min, mut max) = value_range(values);
        if min == max {
            min -= 0.5;
            max += 0.5;
        }
        let bin_width = (max - min) / HIST_BINS as f64;

        let mut counts = vec![0usize; HIST_BINS];
        for &v in values {
            let idx = (((v - min) / bin_width) as usize).min(HIST_BINS - 1);
            counts[idx] += 1;
        }
        let y_max = *counts.iter().max().unwrap_or(&1) as f64 * 1.15;

        let path = self.out_dir.join(file);
        let root = BitMapBackend::new(&path, CHART_SIZE).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(title, ("sans-serif", 30))
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(60)
            .build_cartesian_2d(min..max, 0f64..y_max)?;
        chart
            .configure_mesh()
            .x_desc(x_label)
            .y_desc("Count")
            .draw()?;

        chart.draw_series(counts.iter().enumerate().map(|(i, &c)| {
            let x0 = min + i as f64 * bin_width;
            let x1 = x0 + bin_width;
            Rectangle::new([(x0, 0.0), (x1, c as f64)], BLUE.mix(0.4).filled())
        }))?;
        chart.draw_series(counts.iter().enumerate().map(|(i, &c)| {
            let x0 = min + i as f64 * bin_width;
            let x1 = x0 + bin_width;
            Rectangle::new([(x0, 0.0), (x1, c as f64)], BLUE.stroke_width(1))
        }))?;

        // Density curve, scaled from probability density to expected counts.
        if let Some(density) = gaussian_kde(values, min, max, 200) {
            let scale = values.len() as f64 * bin_width;
            chart
                .draw_series(LineSeries::new(
                    density.into_iter().map(|(x, d)| (x, d * scale)),
                    RED.stroke_width(2),
                ))?
                .label("density")
                .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED.stroke_width(2)));
            chart
                .configure_series_labels()
                .border_style(BLACK)
                .draw()?;
        }

        root.present().context("present chart")?;
        Ok(())
    }

    fn study_vs_sleep(&self, df: &DataFrame) -> Result<()> {
        let x = DataProcessor::numeric_values(df, "Study_Hours")?;
        let y = DataProcessor::numeric_values(df, "Sleep_Duration")?;
        anyhow::ensure!(!x.is_empty() && x.len() == y.len(), "mismatched columns");

        let (x_min, x_max) = padded(value_range(&x));
        let (y_min, y_max) = padded(value_range(&y));

        let path = self.out_dir.join("study_vs_sleep.png");
        let root = BitMapBackend::new(&path, CHART_SIZE).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(
                "Relationship Between Study Hours and Sleep Duration",
                ("sans-serif", 28),
            )
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(60)
            .build_cartesian_2d(x_min..x_max, y_min..y_max)?;
        chart
            .configure_mesh()
            .x_desc("Study Hours")
            .y_desc("Sleep Duration (hours)")
            .draw()?;

        chart.draw_series(
            x.iter()
                .zip(y.iter())
                .map(|(&sx, &sy)| Circle::new((sx, sy), 3, BLUE.mix(0.6).filled())),
        )?;

        root.present().context("present chart")?;
        Ok(())
    }

    fn correlation_heatmap(&self, df: &DataFrame) -> Result<()> {
        let (names, matrix) = StatsCalculator::correlation_matrix(df);
        anyhow::ensure!(!names.is_empty(), "no numeric columns to correlate");
        let n = names.len();

        let path = self.out_dir.join("correlation_heatmap.png");
        let root = BitMapBackend::new(&path, (1100, 900)).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption("Correlation Matrix", ("sans-serif", 30))
            .margin(15)
            .x_label_area_size(120)
            .y_label_area_size(160)
            .build_cartesian_2d(0f64..n as f64, 0f64..n as f64)?;

        let x_names = names.clone();
        let y_names = names.clone();
        chart
            .configure_mesh()
            .disable_x_mesh()
            .disable_y_mesh()
            .x_labels(n)
            .y_labels(n)
            .x_label_formatter(&move |v| {
                x_names
                    .get(v.floor() as usize)
                    .cloned()
                    .unwrap_or_default()
            })
            .y_label_formatter(&move |v| {
                y_names
                    .get(v.floor() as usize)
                    .cloned()
                    .unwrap_or_default()
            })
            .draw()?;

        for (i, row) in matrix.iter().enumerate() {
            for (j, &r) in row.iter().enumerate() {
                let (x, y) = (i as f64, j as f64);
                chart.draw_series(std::iter::once(Rectangle::new(
                    [(x, y), (x + 1.0, y + 1.0)],
                    heat_color(r).filled(),
                )))?;
                let label = if r.is_nan() {
                    "-".to_string()
                } else {
                    format!("{r:.2}")
                };
                chart.draw_series(std::iter::once(Text::new(
                    label,
                    (x + 0.3, y + 0.55),
                    ("sans-serif", 14),
                )))?;
            }
        }

        root.present().context("present chart")?;
        Ok(())
    }

    fn sleep_by_year_gender(&self, df: &DataFrame) -> Result<()> {
        let rows = year_gender_values(df, "Sleep_Duration")?;
        anyhow::ensure!(!rows.is_empty(), "no rows to plot");

        let years: Vec<String> = rows
            .iter()
            .map(|(y, _, _)| y.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let genders: Vec<String> = rows
            .iter()
            .map(|(_, g, _)| g.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let values: Vec<f64> = rows.iter().map(|(_, _, v)| *v).collect();
        let (y_min, y_max) = padded(value_range(&values));

        let path = self.out_dir.join("sleep_by_year_gender.png");
        let root = BitMapBackend::new(&path, CHART_SIZE).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(
                "Sleep Duration by University Year and Gender",
                ("sans-serif", 28),
            )
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(60)
            .build_cartesian_2d(-0.5f64..years.len() as f64 - 0.5, y_min as f32..y_max as f32)?;

        let year_labels = years.clone();
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(years.len())
            .x_label_formatter(&move |v| {
                let idx = v.round();
                if (v - idx).abs() < 0.25 && idx >= 0.0 {
                    year_labels
                        .get(idx as usize)
                        .cloned()
                        .unwrap_or_default()
                } else {
                    String::new()
                }
            })
            .x_desc("University Year")
            .y_desc("Sleep Duration (hours)")
            .draw()?;

        let group_width = 0.8 / genders.len() as f64;
        for (gi, gender) in genders.iter().enumerate() {
            let color = PALETTE[gi % PALETTE.len()];
            let offset = (gi as f64 + 0.5) * group_width - 0.4;

            let mut drew_any = false;
            for (yi, year) in years.iter().enumerate() {
                let group: Vec<f64> = rows
                    .iter()
                    .filter(|(y, g, _)| y == year && g == gender)
                    .map(|(_, _, v)| *v)
                    .collect();
                if group.is_empty() {
                    continue;
                }

                let quartiles = Quartiles::new(&group);
                let series = chart.draw_series(std::iter::once(
                    Boxplot::new_vertical(yi as f64 + offset, &quartiles)
                        .width(22)
                        .whisker_width(0.6)
                        .style(color),
                ))?;
                if !drew_any {
                    series.label(gender.clone()).legend(move |(x, y)| {
                        PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(3))
                    });
                    drew_any = true;
                }
            }
        }

        chart
            .configure_series_labels()
            .border_style(BLACK)
            .background_style(WHITE.mix(0.9))
            .draw()?;

        root.present().context("present chart")?;
        Ok(())
    }

    fn activity_by_year(&self, df: &DataFrame) -> Result<()> {
        let grouped = DataProcessor::group_mean(df, "University_Year", "Physical_Activity")?;
        let years = DataProcessor::string_values(&grouped, "University_Year")?;
        let means = DataProcessor::numeric_values(&grouped, "Physical_Activity")?;
        anyhow::ensure!(!years.is_empty(), "no rows to plot");

        let y_max = means.iter().cloned().fold(0.0f64, f64::max) * 1.15;

        let path = self.out_dir.join("activity_by_year.png");
        let root = BitMapBackend::new(&path, CHART_SIZE).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption("Physical Activity by University Year", ("sans-serif", 28))
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(60)
            .build_cartesian_2d(-0.5f64..years.len() as f64 - 0.5, 0f64..y_max)?;

        let year_labels = years.clone();
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(years.len())
            .x_label_formatter(&move |v| {
                let idx = v.round();
                if (v - idx).abs() < 0.25 && idx >= 0.0 {
                    year_labels
                        .get(idx as usize)
                        .cloned()
                        .unwrap_or_default()
                } else {
                    String::new()
                }
            })
            .x_desc("University Year")
            .y_desc("Mean Physical Activity")
            .draw()?;

        chart.draw_series(means.iter().enumerate().map(|(i, &m)| {
            Rectangle::new(
                [(i as f64 - 0.35, 0.0), (i as f64 + 0.35, m)],
                PALETTE[0].mix(0.7).filled(),
            )
        }))?;

        root.present().context("present chart")?;
        Ok(())
    }
}

/// (University_Year, Gender, value) triples with all three fields present.
fn year_gender_values(df: &DataFrame, value_col: &str) -> Result<Vec<(String, String, f64)>> {
    let years = df
        .column("University_Year")?
        .as_materialized_series()
        .clone();
    let genders = df.column("Gender")?.as_materialized_series().clone();
    let values = df
        .column(value_col)?
        .as_materialized_series()
        .cast(&polars::prelude::DataType::Float64)?;

    let mut rows = Vec::with_capacity(df.height());
    for ((year, gender), value) in years
        .str()?
        .into_iter()
        .zip(genders.str()?.into_iter())
        .zip(values.f64()?.into_iter())
    {
        if let (Some(y), Some(g), Some(v)) = (year, gender, value) {
            rows.push((y.to_string(), g.to_string(), v));
        }
    }
    Ok(rows)
}

fn value_range(values: &[f64]) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &v in values {
        if v.is_finite() {
            min = min.min(v);
            max = max.max(v);
        }
    }
    if min.is_infinite() {
        (0.0, 1.0)
    } else {
        (min, max)
    }
}

fn padded((min, max): (f64, f64)) -> (f64, f64) {
    let pad = ((max - min) * 0.05).max(0.5);
    (min - pad, max + pad)
}

/// Gaussian kernel density estimate with Silverman bandwidth, sampled at
/// `points` positions across [min, max]. `None` when the data has no spread.
fn gaussian_kde(values: &[f64], min: f64, max: f64, points: usize) -> Option<Vec<(f64, f64)>> {
    let n = values.len();
    if n < 2 {
        return None;
    }
    let mean = values.iter().sum::<f64>() / n as f64;
    let std =
        (values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64).sqrt();
    if std == 0.0 {
        return None;
    }
    let bandwidth = 1.06 * std * (n as f64).powf(-0.2);
    let norm = 1.0 / ((n as f64) * bandwidth * (2.0 * std::f64::consts::PI).sqrt());

    let step = (max - min) / (points - 1) as f64;
    let curve = (0..points)
        .map(|i| {
            let x = min + i as f64 * step;
            let d = values
                .iter()
                .map(|&v| (-0.5 * ((x - v) / bandwidth).powi(2)).exp())
                .sum::<f64>()
                * norm;
            (x, d)
        })
        .collect();
    Some(curve)
}

/// Map a correlation coefficient in [-1, 1] onto a blue-white-red ramp.
fn heat_color(r: f64) -> RGBColor {
    if r.is_nan() {
        return RGBColor(230, 230, 230);
    }
    let t = r.clamp(-1.0, 1.0);
    if t >= 0.0 {
        let fade = (255.0 * (1.0 - t)) as u8;
        RGBColor(255, fade, fade)
    } else {
        let fade = (255.0 * (1.0 + t)) as u8;
        RGBColor(fade, fade, 255)
    }
}
