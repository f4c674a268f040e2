//! Dataset Normalizer Module
//! Turns a raw, all-text measurement frame into a `MeasurementTable`.
//!
//! Policy per column:
//! - `Year`: commas removed, parsed as an integer. Any failure is fatal.
//! - `PM10`: decimal commas become periods; unparseable values become null.
//! - `month` (or `Month`): trimmed; rows outside the 12 canonical names are dropped.
//! - `Season`: trimmed and kept as-is.

use super::schema::{is_canonical_month, MONTH, MONTH_ALIAS, PM10, SEASON, YEAR};
use super::table::{MeasurementRow, MeasurementTable};
use log::debug;
use polars::prelude::*;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NormalizeError {
    #[error("Missing required column '{0}'")]
    MissingColumn(String),
    #[error("Column '{0}' appears more than once")]
    DuplicateColumn(String),
    #[error("Row {row}: Year value '{value}' is not an integer")]
    InvalidYear { row: usize, value: String },
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// Cleans raw measurement frames. Holds no state.
pub struct Normalizer;

impl Normalizer {
    /// Normalize a raw frame. The input is never modified.
    pub fn normalize(raw: &DataFrame) -> Result<MeasurementTable, NormalizeError> {
        let years = Self::text_values(Self::find_column(raw, &[YEAR])?)?;
        let months = Self::text_values(Self::find_column(raw, &[MONTH, MONTH_ALIAS])?)?;
        let seasons = Self::text_values(Self::find_column(raw, &[SEASON])?)?;
        let pm10 = Self::text_values(Self::find_column(raw, &[PM10])?)?;

        // Every Year is checked, including rows the month filter drops later
        let years = years
            .iter()
            .enumerate()
            .map(|(row, value)| {
                value
                    .as_deref()
                    .and_then(Self::parse_year)
                    .ok_or_else(|| NormalizeError::InvalidYear {
                        row,
                        value: value.clone().unwrap_or_else(|| "null".to_string()),
                    })
            })
            .collect::<Result<Vec<i64>, _>>()?;

        let rows: Vec<MeasurementRow> = years
            .into_iter()
            .zip(months)
            .zip(seasons)
            .zip(pm10)
            .filter_map(|(((year, month), season), pm10)| {
                let month = month?.trim().to_string();
                if !is_canonical_month(&month) {
                    return None;
                }
                Some(MeasurementRow {
                    year,
                    month,
                    season: season.as_deref().unwrap_or_default().trim().to_string(),
                    pm10: pm10.as_deref().and_then(Self::parse_pm10),
                })
            })
            .collect();

        let dropped = raw.height() - rows.len();
        if dropped > 0 {
            debug!("Dropped {dropped} rows with unrecognized month labels");
        }

        Ok(MeasurementTable::from_rows(&rows)?)
    }

    /// Parse a year such as `"2,020"` or `" 2021 "`.
    pub fn parse_year(value: &str) -> Option<i64> {
        value.replace(',', "").trim().parse().ok()
    }

    /// Parse a concentration such as `"10,5"` or `"20.0"`. NaN counts as missing.
    pub fn parse_pm10(value: &str) -> Option<f64> {
        value
            .replace(',', ".")
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| !v.is_nan())
    }

    /// Find the single column whose whitespace-stripped name is one of `names`.
    fn find_column<'a>(raw: &'a DataFrame, names: &[&str]) -> Result<&'a Column, NormalizeError> {
        let mut matches = raw
            .get_columns()
            .iter()
            .filter(|column| names.contains(&column.name().trim()));

        let found = matches
            .next()
            .ok_or_else(|| NormalizeError::MissingColumn(names[0].to_string()))?;
        if matches.next().is_some() {
            return Err(NormalizeError::DuplicateColumn(names[0].to_string()));
        }
        Ok(found)
    }

    /// Read any column as optional text values.
    fn text_values(column: &Column) -> PolarsResult<Vec<Option<String>>> {
        let text = column.cast(&DataType::String)?;
        let values = text
            .str()?
            .into_iter()
            .map(|value| value.map(str::to_string))
            .collect();
        Ok(values)
    }
}
