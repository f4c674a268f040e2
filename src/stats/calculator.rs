//! Statistics Calculator Module
//! Aggregations over a measurement table: overall, yearly and monthly means,
//! and the per-season distributions behind the boxplot.

use crate::data::schema::{rank_in, CONCENTRATION_UNIT, MONTH, PM10, YEAR};
use crate::data::MeasurementTable;
use polars::prelude::*;

/// Mean PM10 for one year.
#[derive(Debug, Clone, PartialEq)]
pub struct YearMean {
    pub year: i64,
    /// `None` when every value for the year is missing.
    pub mean: Option<f64>,
}

/// Mean PM10 for one calendar month, across all years.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthMean {
    pub month: String,
    pub mean: Option<f64>,
}

/// A single `(season, pm10)` pair.
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonObservation {
    pub season: String,
    pub pm10: Option<f64>,
}

/// Five-number summary with whiskers at the data extremes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxStats {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

/// All non-missing values for one season.
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonDistribution {
    pub season: String,
    pub values: Vec<f64>,
    pub box_stats: Option<BoxStats>,
}

/// Handles aggregate calculations over a `MeasurementTable`.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Arithmetic mean of every non-null PM10 value.
    pub fn overall_mean(table: &MeasurementTable) -> PolarsResult<Option<f64>> {
        Ok(table.frame().column(PM10)?.f64()?.mean())
    }

    /// Mean PM10 per year, ascending by year.
    pub fn yearly_means(table: &MeasurementTable) -> PolarsResult<Vec<YearMean>> {
        let grouped = Self::mean_by(table, YEAR)?;
        let years = grouped.column(YEAR)?.i64()?;
        let means = grouped.column(PM10)?.f64()?;

        let mut result: Vec<YearMean> = years
            .into_iter()
            .zip(means.into_iter())
            .filter_map(|(year, mean)| Some(YearMean { year: year?, mean }))
            .collect();
        result.sort_by_key(|m| m.year);

        Ok(result)
    }

    /// Mean PM10 per month, in `month_order`. Months with no rows are omitted.
    pub fn monthly_means<S: AsRef<str>>(
        table: &MeasurementTable,
        month_order: &[S],
    ) -> PolarsResult<Vec<MonthMean>> {
        let grouped = Self::mean_by(table, MONTH)?;
        let months = grouped.column(MONTH)?.str()?;
        let means = grouped.column(PM10)?.f64()?;

        let mut result: Vec<MonthMean> = months
            .into_iter()
            .zip(means.into_iter())
            .filter_map(|(month, mean)| {
                Some(MonthMean {
                    month: month?.to_string(),
                    mean,
                })
            })
            .collect();
        result.sort_by(|a, b| {
            rank_in(month_order, &a.month)
                .cmp(&rank_in(month_order, &b.month))
                .then_with(|| a.month.cmp(&b.month))
        });

        Ok(result)
    }

    /// Every row's season and PM10 value. Rows whose season is in
    /// `season_order` come first in that order; the rest keep table order.
    pub fn season_observations<S: AsRef<str>>(
        table: &MeasurementTable,
        season_order: &[S],
    ) -> PolarsResult<Vec<SeasonObservation>> {
        let mut observations: Vec<SeasonObservation> = table
            .rows()?
            .into_iter()
            .map(|row| SeasonObservation {
                season: row.season,
                pm10: row.pm10,
            })
            .collect();
        observations.sort_by_key(|obs| rank_in(season_order, &obs.season));

        Ok(observations)
    }

    /// Group season observations into boxplot-ready distributions.
    ///
    /// Known seasons appear in `season_order`; unknown ones follow in order of
    /// first appearance. Missing PM10 values are left out of each distribution.
    pub fn season_distributions<S: AsRef<str>>(
        table: &MeasurementTable,
        season_order: &[S],
    ) -> PolarsResult<Vec<SeasonDistribution>> {
        let mut distributions: Vec<SeasonDistribution> = Vec::new();

        for obs in Self::season_observations(table, season_order)? {
            let idx = match distributions.iter().position(|d| d.season == obs.season) {
                Some(idx) => idx,
                None => {
                    distributions.push(SeasonDistribution {
                        season: obs.season.clone(),
                        values: Vec::new(),
                        box_stats: None,
                    });
                    distributions.len() - 1
                }
            };
            if let Some(value) = obs.pm10 {
                distributions[idx].values.push(value);
            }
        }

        for dist in &mut distributions {
            dist.box_stats = Self::compute_box_stats(&dist.values);
        }

        Ok(distributions)
    }

    /// Min, quartiles and max of `values`. `None` for an empty slice.
    pub fn compute_box_stats(values: &[f64]) -> Option<BoxStats> {
        if values.is_empty() {
            return None;
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        Some(BoxStats {
            min: sorted[0],
            q1: Self::percentile(&sorted, 25.0),
            median: Self::percentile(&sorted, 50.0),
            q3: Self::percentile(&sorted, 75.0),
            max: sorted[sorted.len() - 1],
        })
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

    /// Render a concentration for display, e.g. `"15.25 µg/m³"`.
    pub fn format_concentration(value: Option<f64>) -> String {
        match value {
            Some(v) => format!("{v:.2} {CONCENTRATION_UNIT}"),
            None => "n/a".to_string(),
        }
    }

    /// Group by `key` and average PM10, skipping nulls.
    fn mean_by(table: &MeasurementTable, key: &str) -> PolarsResult<DataFrame> {
        table
            .frame()
            .clone()
            .lazy()
            .group_by([col(key)])
            .agg([col(PM10).mean()])
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::schema::{MONTH_ORDER, SEASON_ORDER};
    use crate::data::MeasurementRow;

    fn table(rows: &[(i64, &str, &str, Option<f64>)]) -> MeasurementTable {
        let rows: Vec<MeasurementRow> = rows
            .iter()
            .map(|&(year, month, season, pm10)| MeasurementRow {
                year,
                month: month.to_string(),
                season: season.to_string(),
                pm10,
            })
            .collect();
        MeasurementTable::from_rows(&rows).unwrap()
    }

    #[test]
    fn overall_mean_of_scenario() {
        let t = table(&[
            (2020, "January", "Summer", Some(10.5)),
            (2021, "February", "Autumn", Some(20.0)),
        ]);
        let mean = StatsCalculator::overall_mean(&t).unwrap();
        assert_eq!(mean, Some(15.25));
        assert_eq!(StatsCalculator::format_concentration(mean), "15.25 µg/m³");
    }

    #[test]
    fn missing_values_shrink_the_denominator() {
        let t = table(&[
            (2020, "January", "Summer", Some(10.0)),
            (2020, "February", "Summer", None),
            (2020, "March", "Autumn", Some(20.0)),
        ]);
        assert_eq!(StatsCalculator::overall_mean(&t).unwrap(), Some(15.0));
    }

    #[test]
    fn overall_mean_of_nothing() {
        let empty = table(&[]);
        assert_eq!(StatsCalculator::overall_mean(&empty).unwrap(), None);

        let all_missing = table(&[(2020, "May", "Autumn", None)]);
        assert_eq!(StatsCalculator::overall_mean(&all_missing).unwrap(), None);
        assert_eq!(StatsCalculator::format_concentration(None), "n/a");
    }

    #[test]
    fn format_rounds_to_two_places() {
        assert_eq!(
            StatsCalculator::format_concentration(Some(1.0 / 3.0)),
            "0.33 µg/m³"
        );
    }

    #[test]
    fn yearly_means_ascend() {
        let t = table(&[
            (2022, "January", "Summer", Some(30.0)),
            (2020, "January", "Summer", Some(10.0)),
            (2020, "June", "Winter", Some(20.0)),
            (2021, "June", "Winter", None),
        ]);

        let yearly = StatsCalculator::yearly_means(&t).unwrap();
        assert_eq!(
            yearly,
            vec![
                YearMean { year: 2020, mean: Some(15.0) },
                YearMean { year: 2021, mean: None },
                YearMean { year: 2022, mean: Some(30.0) },
            ]
        );
    }

    #[test]
    fn monthly_means_follow_calendar() {
        let t = table(&[
            (2020, "December", "Summer", Some(5.0)),
            (2020, "March", "Autumn", Some(8.0)),
            (2021, "March", "Autumn", Some(12.0)),
            (2020, "January", "Summer", Some(1.0)),
        ]);

        let monthly = StatsCalculator::monthly_means(&t, &MONTH_ORDER).unwrap();
        let months: Vec<&str> = monthly.iter().map(|m| m.month.as_str()).collect();
        assert_eq!(months, vec!["January", "March", "December"]);
        assert_eq!(monthly[1].mean, Some(10.0));
    }

    #[test]
    fn season_observations_keep_every_row() {
        let t = table(&[
            (2020, "June", "Winter", Some(40.0)),
            (2020, "July", "Monsoon", Some(1.0)),
            (2020, "January", "Summer", None),
            (2020, "April", "Autumn", Some(12.0)),
        ]);

        let obs = StatsCalculator::season_observations(&t, &SEASON_ORDER).unwrap();
        let seasons: Vec<&str> = obs.iter().map(|o| o.season.as_str()).collect();
        assert_eq!(seasons, vec!["Summer", "Autumn", "Winter", "Monsoon"]);
        assert_eq!(obs[0].pm10, None);
    }

    #[test]
    fn season_distributions_group_and_summarize() {
        let t = table(&[
            (2020, "June", "Winter", Some(40.0)),
            (2020, "July", "Winter", Some(20.0)),
            (2020, "August", "Dry", Some(5.0)),
            (2020, "January", "Summer", Some(10.0)),
            (2020, "February", "Summer", None),
            (2020, "March", "Wet", Some(7.0)),
        ]);

        let dists = StatsCalculator::season_distributions(&t, &SEASON_ORDER).unwrap();
        let seasons: Vec<&str> = dists.iter().map(|d| d.season.as_str()).collect();
        assert_eq!(seasons, vec!["Summer", "Winter", "Dry", "Wet"]);

        assert_eq!(dists[0].values, vec![10.0]);
        let winter = dists[1].box_stats.unwrap();
        assert_eq!(winter.min, 20.0);
        assert_eq!(winter.median, 30.0);
        assert_eq!(winter.q1, 25.0);
        assert_eq!(winter.q3, 35.0);
        assert_eq!(winter.max, 40.0);
    }

    #[test]
    fn season_with_only_missing_values_has_no_box() {
        let t = table(&[(2020, "June", "Winter", None)]);
        let dists = StatsCalculator::season_distributions(&t, &SEASON_ORDER).unwrap();
        assert_eq!(dists.len(), 1);
        assert!(dists[0].values.is_empty());
        assert_eq!(dists[0].box_stats, None);
    }

    #[test]
    fn box_stats_interpolate_quartiles() {
        let stats = StatsCalculator::compute_box_stats(&[5.0, 1.0, 4.0, 2.0, 3.0]).unwrap();
        assert_eq!(
            stats,
            BoxStats {
                min: 1.0,
                q1: 2.0,
                median: 3.0,
                q3: 4.0,
                max: 5.0,
            }
        );
        assert_eq!(StatsCalculator::compute_box_stats(&[]), None);
    }
}
