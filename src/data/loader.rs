//! CSV Data Loader Module
//! Reads measurement files with Polars into an all-text DataFrame.
//!
//! Every column is read as a string so that locale-specific numbers
//! ("2,020", "10,5") reach the normalizer untouched.

use log::{debug, info};
use polars::prelude::*;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to read '{path}'")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("CSV file is empty")]
    Empty,
}

/// Field separator selection for a CSV file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    /// Sniff the separator from the first lines of the file.
    Auto,
    /// Always split on this byte.
    Fixed(u8),
}

/// Separators considered during detection, in tie-break order.
const CANDIDATE_DELIMITERS: [u8; 4] = [b',', b';', b'\t', b'|'];

/// Number of non-blank lines inspected when sniffing.
const SNIFF_LINES: usize = 10;

const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// Handles CSV file loading with Polars.
pub struct DataLoader;

impl DataLoader {
    /// Load a CSV file from disk.
    pub fn load_csv(path: &Path, delimiter: Delimiter) -> Result<DataFrame, LoaderError> {
        let bytes = std::fs::read(path).map_err(|source| LoaderError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let df = Self::read_csv_bytes(bytes, delimiter)?;
        info!(
            "Loaded {} rows, {} columns from {}",
            df.height(),
            df.width(),
            path.display()
        );
        Ok(df)
    }

    /// Parse CSV content already held in memory.
    pub fn read_csv_bytes(mut bytes: Vec<u8>, delimiter: Delimiter) -> Result<DataFrame, LoaderError> {
        if bytes.starts_with(&UTF8_BOM) {
            bytes.drain(..UTF8_BOM.len());
        }
        if bytes.iter().all(|b| b.is_ascii_whitespace()) {
            return Err(LoaderError::Empty);
        }

        let separator = match delimiter {
            Delimiter::Fixed(sep) => sep,
            Delimiter::Auto => Self::detect_delimiter(&String::from_utf8_lossy(&bytes)),
        };
        debug!("Reading CSV with separator {:?}", separator as char);

        // Schema inference length 0 keeps every column as String
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .map_parse_options(|opts| opts.with_separator(separator))
            .into_reader_with_file_handle(Cursor::new(bytes))
            .finish()?;

        Ok(df)
    }

    /// Pick the separator that splits the leading lines into a constant,
    /// non-zero number of fields. Falls back to the most frequent candidate
    /// in the header, then to a comma.
    pub fn detect_delimiter(sample: &str) -> u8 {
        let lines: Vec<&str> = sample
            .lines()
            .filter(|line| !line.trim().is_empty())
            .take(SNIFF_LINES)
            .collect();

        let mut best: Option<(u8, usize)> = None;
        for &candidate in &CANDIDATE_DELIMITERS {
            let counts: Vec<usize> = lines
                .iter()
                .map(|line| Self::count_unquoted(line, candidate))
                .collect();

            let Some(&first) = counts.first() else {
                continue;
            };
            if first == 0 || counts.iter().any(|&c| c != first) {
                continue;
            }
            if best.map_or(true, |(_, n)| first > n) {
                best = Some((candidate, first));
            }
        }

        if let Some((sep, _)) = best {
            return sep;
        }

        let header = lines.first().copied().unwrap_or_default();
        CANDIDATE_DELIMITERS
            .iter()
            .copied()
            .map(|candidate| (candidate, Self::count_unquoted(header, candidate)))
            .filter(|&(_, count)| count > 0)
            .fold(None, |acc: Option<(u8, usize)>, (candidate, count)| match acc {
                Some((_, n)) if n >= count => acc,
                _ => Some((candidate, count)),
            })
            .map(|(sep, _)| sep)
            .unwrap_or(b',')
    }

    /// Count occurrences of `sep` outside double-quoted fields.
    fn count_unquoted(line: &str, sep: u8) -> usize {
        let mut in_quotes = false;
        let mut count = 0;
        for &b in line.as_bytes() {
            if b == b'"' {
                in_quotes = !in_quotes;
            } else if b == sep && !in_quotes {
                count += 1;
            }
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn detects_semicolon_with_decimal_commas() {
        let sample = "Year;Month;Season;PM10\n2020;January;Summer;10,5\n2020;February;Summer;12,25\n";
        assert_eq!(DataLoader::detect_delimiter(sample), b';');
    }

    #[test]
    fn detects_comma_with_quoted_thousands() {
        let sample = "Year,Month,Season,PM10\n\"2,020\",January,Summer,10.5\n2021,March,Autumn,9\n";
        assert_eq!(DataLoader::detect_delimiter(sample), b',');
    }

    #[test]
    fn detects_tab() {
        let sample = "Year\tMonth\tSeason\tPM10\n2020\tJanuary\tSummer\t10,5\n";
        assert_eq!(DataLoader::detect_delimiter(sample), b'\t');
    }

    #[test]
    fn falls_back_to_header_then_comma() {
        // Ragged rows: no candidate is consistent, header decides
        let ragged = "Year;Month;Season;PM10\n2020;January\n";
        assert_eq!(DataLoader::detect_delimiter(ragged), b';');
        assert_eq!(DataLoader::detect_delimiter("PM10\n12\n"), b',');
    }

    #[test]
    fn reads_every_column_as_text() {
        let csv = " Year ;Month;Season;PM10\n2020;January;Summer;10,5\n2021;May;Autumn;abc\n";
        let df = DataLoader::read_csv_bytes(csv.as_bytes().to_vec(), Delimiter::Auto).unwrap();

        assert_eq!(df.height(), 2);
        let names: Vec<String> = df.get_column_names().iter().map(|s| s.to_string()).collect();
        assert_eq!(names, vec![" Year ", "Month", "Season", "PM10"]);
        for column in df.get_columns() {
            assert_eq!(column.dtype(), &DataType::String);
        }
        let pm10 = df.column("PM10").unwrap().str().unwrap();
        assert_eq!(pm10.get(0), Some("10,5"));
        assert_eq!(pm10.get(1), Some("abc"));
    }

    #[test]
    fn fixed_delimiter_is_respected() {
        let csv = "Year;Month;Season;PM10\n2020;January;Summer;10\n";
        let df = DataLoader::read_csv_bytes(csv.as_bytes().to_vec(), Delimiter::Fixed(b',')).unwrap();
        assert_eq!(df.width(), 1);
    }

    #[test]
    fn strips_byte_order_mark() {
        let mut bytes = UTF8_BOM.to_vec();
        bytes.extend_from_slice(b"Year,Month,Season,PM10\n2020,June,Winter,30\n");
        let df = DataLoader::read_csv_bytes(bytes, Delimiter::Auto).unwrap();
        assert!(df.column("Year").is_ok());
    }

    #[test]
    fn empty_input_is_rejected() {
        let result = DataLoader::read_csv_bytes(b"  \n".to_vec(), Delimiter::Auto);
        assert!(matches!(result, Err(LoaderError::Empty)));
    }

    #[test]
    fn loads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Year;Month;Season;PM10").unwrap();
        writeln!(file, "2019;July;Winter;45,1").unwrap();

        let df = DataLoader::load_csv(file.path(), Delimiter::Fixed(b';')).unwrap();
        assert_eq!(df.shape(), (1, 4));
    }

    #[test]
    fn missing_file_reports_path() {
        let result = DataLoader::load_csv(Path::new("/nonexistent/pm10.csv"), Delimiter::Auto);
        assert!(matches!(result, Err(LoaderError::Io { .. })));
    }
}
