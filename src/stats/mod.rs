//! Stats module - aggregations behind the dashboard charts

mod calculator;

pub use calculator::{MonthMean, SeasonDistribution, StatsCalculator, YearMean};
