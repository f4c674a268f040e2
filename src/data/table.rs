//! Measurement Table
//! Typed wrapper around the cleaned DataFrame.

use super::schema::{MONTH, PM10, SEASON, YEAR};
use polars::prelude::*;

/// One cleaned observation.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementRow {
    pub year: i64,
    pub month: String,
    pub season: String,
    /// `None` when the raw value could not be read as a number.
    pub pm10: Option<f64>,
}

/// The cleaned dataset consumed by every aggregation and chart.
///
/// The wrapped frame always has exactly the columns `Year` (Int64),
/// `month` (String), `Season` (String) and `PM10` (nullable Float64),
/// and every `month` value is a canonical month name.
#[derive(Debug, Clone)]
pub struct MeasurementTable {
    frame: DataFrame,
}

impl MeasurementTable {
    /// Build a table from already-cleaned rows.
    pub fn from_rows(rows: &[MeasurementRow]) -> PolarsResult<Self> {
        let frame = DataFrame::new(vec![
            Column::new(
                YEAR.into(),
                rows.iter().map(|r| r.year).collect::<Vec<i64>>(),
            ),
            Column::new(
                MONTH.into(),
                rows.iter().map(|r| r.month.as_str()).collect::<Vec<&str>>(),
            ),
            Column::new(
                SEASON.into(),
                rows.iter().map(|r| r.season.as_str()).collect::<Vec<&str>>(),
            ),
            Column::new(
                PM10.into(),
                rows.iter().map(|r| r.pm10).collect::<Vec<Option<f64>>>(),
            ),
        ])?;

        Ok(Self { frame })
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn height(&self) -> usize {
        self.frame.height()
    }

    pub fn is_empty(&self) -> bool {
        self.frame.height() == 0
    }

    /// Materialize the table back into rows.
    pub fn rows(&self) -> PolarsResult<Vec<MeasurementRow>> {
        let years = self.frame.column(YEAR)?.i64()?;
        let months = self.frame.column(MONTH)?.str()?;
        let seasons = self.frame.column(SEASON)?.str()?;
        let pm10 = self.frame.column(PM10)?.f64()?;

        let rows = years
            .into_iter()
            .zip(months.into_iter())
            .zip(seasons.into_iter())
            .zip(pm10.into_iter())
            .filter_map(|(((year, month), season), pm10)| {
                Some(MeasurementRow {
                    year: year?,
                    month: month?.to_string(),
                    season: season.unwrap_or_default().to_string(),
                    pm10,
                })
            })
            .collect();

        Ok(rows)
    }
}
