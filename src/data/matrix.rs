//! Validated, cleaned view of one cumulative time-series CSV.
//!
//! Layout of the source file:
//!
//! ```text
//! sub-region, region, latitude, longitude, date_1, date_2, ..., date_n
//! ```
//!
//! Date headers use `month/day/2-digit-year` (e.g. `3/19/20`) in ascending order.
//! Every other row is the cumulative count series of one sub-region/region pair.

use std::collections::BTreeSet;
use std::io::Read;

use chrono::NaiveDate;
use csv::StringRecord;
use tracing::debug;

use crate::error::{AppError, ErrorKind};

/// Date format of the header columns.
pub const HEADER_DATE_FORMAT: &str = "%m/%d/%y";

const REGION_COL: usize = 1;
const LATITUDE_COL: usize = 2;
const FIRST_DATE_COL: usize = 4;

const MIN_ROWS: usize = 2;
const MIN_COLS: usize = FIRST_DATE_COL + 1;

/// Immutable table of cumulative counts, one row per sub-region.
///
/// A refresh of the underlying resource builds a new matrix; nothing here
/// mutates after construction.
#[derive(Debug, Clone)]
pub struct TimeSeriesMatrix {
    header: StringRecord,
    dates: Vec<NaiveDate>,
    rows: Vec<StringRecord>,
}

impl TimeSeriesMatrix {
    /// Parse, validate and clean a CSV stream.
    pub fn from_reader(reader: impl Read) -> Result<Self, AppError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut records = Vec::new();
        for result in csv_reader.records() {
            let record = result
                .map_err(|e| AppError::new(ErrorKind::MalformedData, format!("CSV parse error: {e}")))?;
            records.push(record);
        }

        validate_shape(&records)?;

        let mut records = records.into_iter();
        let Some(header) = records.next() else {
            return Err(AppError::new(ErrorKind::MalformedData, "results should have at least 2 rows"));
        };
        let dates = parse_header_dates(&header)?;

        let rows_read = records.len();
        let rows: Vec<StringRecord> = records.filter(has_numeric_latitude).collect();
        if rows.len() < rows_read {
            debug!(dropped = rows_read - rows.len(), kept = rows.len(), "dropped rows without a latitude");
        }

        Ok(Self { header, dates, rows })
    }

    /// Sum of the counts reported for `region` on `date`.
    ///
    /// An empty `region` sums every row (global total). Region names compare
    /// case-insensitively after trimming; a region can span several rows.
    ///
    /// A `date` outside the header yields `Ok(0)`, the same value as a genuine
    /// zero. Callers that need to tell the two apart should check
    /// [`TimeSeriesMatrix::column_of`] first.
    pub fn cases(&self, region: &str, date: NaiveDate) -> Result<i64, AppError> {
        let Some(col) = self.column_of(date) else {
            debug!(%date, "date not in series; counting as zero");
            return Ok(0);
        };

        let wanted = region.to_lowercase();
        let mut sum = 0i64;
        for row in &self.rows {
            if !wanted.is_empty() {
                let name = row.get(REGION_COL).unwrap_or("").trim();
                if name.to_lowercase() != wanted {
                    continue;
                }
            }
            let cell = row.get(col).unwrap_or("").trim();
            if cell.is_empty() {
                continue;
            }
            let column = self.header.get(col).unwrap_or("");
            let n: i64 = cell.parse().map_err(|_| {
                AppError::new(
                    ErrorKind::MalformedData,
                    format!("invalid count '{cell}' in column '{column}'"),
                )
            })?;
            sum = sum.checked_add(n).ok_or_else(|| {
                AppError::new(ErrorKind::MalformedData, format!("count overflow in column '{column}'"))
            })?;
        }

        Ok(sum)
    }

    /// Distinct region names, trimmed and sorted.
    pub fn countries(&self) -> Vec<String> {
        let set: BTreeSet<String> = self
            .rows
            .iter()
            .map(|row| row.get(REGION_COL).unwrap_or("").trim().to_string())
            .collect();
        set.into_iter().collect()
    }

    /// Date of the last header column.
    pub fn latest(&self) -> NaiveDate {
        // Shape validation guarantees at least one date column.
        self.dates[self.dates.len() - 1]
    }

    /// Header dates in column order.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Column index holding `date`; first match wins.
    pub fn column_of(&self, date: NaiveDate) -> Option<usize> {
        self.dates
            .iter()
            .position(|d| *d == date)
            .map(|i| i + FIRST_DATE_COL)
    }

    /// Number of data rows kept after cleaning.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn validate_shape(records: &[StringRecord]) -> Result<(), AppError> {
    if records.len() < MIN_ROWS {
        return Err(AppError::new(
            ErrorKind::MalformedData,
            format!("results should have at least {MIN_ROWS} rows"),
        ));
    }
    if records[0].len() < MIN_COLS {
        return Err(AppError::new(
            ErrorKind::MalformedData,
            format!("results should have at least {MIN_COLS} columns"),
        ));
    }
    Ok(())
}

fn parse_header_dates(header: &StringRecord) -> Result<Vec<NaiveDate>, AppError> {
    header
        .iter()
        .skip(FIRST_DATE_COL)
        .map(|raw| {
            NaiveDate::parse_from_str(raw.trim(), HEADER_DATE_FORMAT).map_err(|e| {
                AppError::new(ErrorKind::MalformedData, format!("invalid header date '{raw}': {e}"))
            })
        })
        .collect()
}

fn has_numeric_latitude(row: &StringRecord) -> bool {
    row.get(LATITUDE_COL)
        .is_some_and(|lat| lat.parse::<f64>().is_ok())
}
