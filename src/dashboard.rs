//! Dashboard pipeline: load -> normalize -> aggregate.
//!
//! `build_dashboard` is run from scratch for every load request and keeps
//! nothing between runs.

use crate::config::DashboardConfig;
use crate::data::schema::MONTH_ORDER;
use crate::data::{DataLoader, Delimiter, Normalizer};
use crate::stats::{MonthMean, SeasonDistribution, StatsCalculator, YearMean};
use anyhow::{Context, Result};
use log::{info, warn};
use polars::prelude::DataFrame;
use std::path::{Path, PathBuf};

/// Where the measurements for one pass come from.
#[derive(Debug, Clone, PartialEq)]
pub enum DataSource {
    /// A file picked by the user; the separator is sniffed.
    Uploaded(PathBuf),
    /// The archived dataset named in the configuration.
    Default(PathBuf),
}

impl DataSource {
    pub fn path(&self) -> &Path {
        match self {
            DataSource::Uploaded(path) | DataSource::Default(path) => path,
        }
    }
}

/// Horizontal reference lines drawn on the yearly chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub who: f64,
    pub national: f64,
}

/// Everything the dashboard view needs for one dataset.
#[derive(Debug, Clone)]
pub struct DashboardSummary {
    pub source: DataSource,
    pub row_count: usize,
    pub overall_mean: Option<f64>,
    pub yearly: Vec<YearMean>,
    pub monthly: Vec<MonthMean>,
    pub seasons: Vec<SeasonDistribution>,
    pub thresholds: Thresholds,
}

/// Read `source` and compute every aggregate shown on a page.
pub fn build_dashboard(source: &DataSource, config: &DashboardConfig) -> Result<DashboardSummary> {
    let delimiter = match source {
        DataSource::Uploaded(_) => Delimiter::Auto,
        DataSource::Default(_) => config.dataset_delimiter()?,
    };

    let raw = DataLoader::load_csv(source.path(), delimiter)
        .with_context(|| format!("Could not read {}", source.path().display()))?;

    summarize(&raw, source.clone(), config)
}

/// Normalize an already-loaded frame and aggregate it.
pub fn summarize(raw: &DataFrame, source: DataSource, config: &DashboardConfig) -> Result<DashboardSummary> {
    let table = Normalizer::normalize(raw).context("Could not clean the dataset")?;
    if table.is_empty() {
        warn!("No rows left after cleaning {}", source.path().display());
    }

    let summary = DashboardSummary {
        row_count: table.height(),
        overall_mean: StatsCalculator::overall_mean(&table)?,
        yearly: StatsCalculator::yearly_means(&table)?,
        monthly: StatsCalculator::monthly_means(&table, &MONTH_ORDER)?,
        seasons: StatsCalculator::season_distributions(&table, &config.season_order)?,
        thresholds: Thresholds {
            who: config.who_limit,
            national: config.national_limit,
        },
        source,
    };

    info!(
        "Summarized {} rows across {} years",
        summary.row_count,
        summary.yearly.len()
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn csv_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn uploaded_file_end_to_end() {
        let file = csv_file(
            "Year,Month,Season,PM10\n\"2,020\",January,Summer,\"10,5\"\n2021,February,Autumn,20.0\n2021,Feb,Autumn,99\n",
        );
        let source = DataSource::Uploaded(file.path().to_path_buf());

        let summary = build_dashboard(&source, &DashboardConfig::default()).unwrap();
        assert_eq!(summary.row_count, 2);
        assert_eq!(
            StatsCalculator::format_concentration(summary.overall_mean),
            "15.25 µg/m³"
        );
        let years: Vec<i64> = summary.yearly.iter().map(|y| y.year).collect();
        assert_eq!(years, vec![2020, 2021]);
        assert_eq!(summary.thresholds, Thresholds { who: 15.0, national: 40.0 });
        assert_eq!(summary.source, source);
    }

    #[test]
    fn default_dataset_uses_configured_separator() {
        let file = csv_file("Year;Month;Season;PM10\n2019;June;Winter;45,5\n2019;December;Summer;12,5\n");
        let source = DataSource::Default(file.path().to_path_buf());

        let summary = build_dashboard(&source, &DashboardConfig::default()).unwrap();
        assert_eq!(summary.overall_mean, Some(29.0));
        let seasons: Vec<&str> = summary.seasons.iter().map(|s| s.season.as_str()).collect();
        assert_eq!(seasons, vec!["Summer", "Winter"]);
        let months: Vec<&str> = summary.monthly.iter().map(|m| m.month.as_str()).collect();
        assert_eq!(months, vec!["June", "December"]);
    }

    #[test]
    fn bundled_default_dataset_loads() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/pm10_default.csv");
        let summary = build_dashboard(&DataSource::Default(path), &DashboardConfig::default()).unwrap();

        assert_eq!(summary.row_count, 48);
        assert_eq!(summary.yearly.len(), 4);
        assert_eq!(summary.monthly.len(), 12);
        let seasons: Vec<&str> = summary.seasons.iter().map(|s| s.season.as_str()).collect();
        assert_eq!(seasons, vec!["Summer", "Autumn", "Winter", "Spring"]);
    }

    #[test]
    fn bad_year_halts_the_pipeline() {
        let file = csv_file("Year;Month;Season;PM10\nunknown;June;Winter;45\n");
        let source = DataSource::Uploaded(file.path().to_path_buf());

        let err = build_dashboard(&source, &DashboardConfig::default()).unwrap_err();
        assert!(format!("{err:#}").contains("not an integer"));
    }

    #[test]
    fn missing_file_is_reported() {
        let source = DataSource::Default(PathBuf::from("/nonexistent/pm10.csv"));
        let err = build_dashboard(&source, &DashboardConfig::default()).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/pm10.csv"));
    }
}
