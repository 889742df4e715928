//! Daily activity tables.
//!
//! Remote files are pipe-delimited with a header row:
//!
//! ```text
//! agg_day_period|activity_index_total|geography
//! 2021-07-01|0.012|23010310211013
//! ```
//!
//! `geography` is the fine quadkey with its leading zeros stripped, so it
//! is padded back before the fine and coarse grouping columns are added.

use std::cmp::Ordering;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use super::DownloadError;
use crate::catalog::split_record;

/// Column holding the fine quadkey.
pub const GEOGRAPHY_COLUMN: &str = "geography";

/// Column holding the activity measure, checked numeric when present.
pub const ACTIVITY_COLUMN: &str = "activity_index_total";

/// Column holding the day of the record, checked to be a date when present.
pub const DAY_COLUMN: &str = "agg_day_period";

const SOURCE_DELIMITER: char = '|';

/// A parsed activity file with its derived quadkey columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityTable {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
    #[serde(skip)]
    fine_zoom: u8,
}

impl ActivityTable {
    /// Parses a downloaded body and appends `z{fine}_quadkey` and
    /// `z{coarse}_quadkey` columns.
    pub fn parse(body: &[u8], fine_zoom: u8, coarse_zoom: u8) -> Result<Self, DownloadError> {
        if coarse_zoom == 0 || coarse_zoom > fine_zoom {
            return Err(DownloadError::ZoomOrder {
                fine: fine_zoom,
                coarse: coarse_zoom,
            });
        }

        let text = std::str::from_utf8(body).map_err(|e| DownloadError::InvalidRecord {
            line: 0,
            message: format!("body is not UTF-8: {}", e),
        })?;

        let mut lines = text
            .lines()
            .enumerate()
            .map(|(i, line)| (i + 1, line.trim_end_matches('\r')))
            .filter(|(_, line)| !line.trim().is_empty());

        let mut columns = match lines.next() {
            Some((line, header)) => split_line(line, header)?,
            None => return Err(DownloadError::MissingColumn(GEOGRAPHY_COLUMN.to_string())),
        };
        let width = columns.len();

        let geography = columns
            .iter()
            .position(|c| c == GEOGRAPHY_COLUMN)
            .ok_or_else(|| DownloadError::MissingColumn(GEOGRAPHY_COLUMN.to_string()))?;
        let activity = columns.iter().position(|c| c == ACTIVITY_COLUMN);
        let day = columns.iter().position(|c| c == DAY_COLUMN);

        let mut rows = Vec::new();
        for (line, raw) in lines {
            let mut row = split_line(line, raw)?;
            if row.len() != width {
                return Err(DownloadError::InvalidRecord {
                    line,
                    message: format!("expected {} fields, found {}", width, row.len()),
                });
            }

            if let Some(index) = activity {
                let value = row[index].trim();
                if value.parse::<f64>().is_err() {
                    return Err(DownloadError::InvalidRecord {
                        line,
                        message: format!("non-numeric {} '{}'", ACTIVITY_COLUMN, value),
                    });
                }
            }

            if let Some(index) = day {
                let value = row[index].trim();
                if parse_day(value).is_none() {
                    return Err(DownloadError::InvalidRecord {
                        line,
                        message: format!("invalid {} '{}'", DAY_COLUMN, value),
                    });
                }
            }

            let fine = pad_quadkey(line, row[geography].trim(), fine_zoom)?;
            let coarse = fine[..coarse_zoom as usize].to_string();
            row.push(fine);
            row.push(coarse);
            rows.push(row);
        }

        columns.push(format!("z{}_quadkey", fine_zoom));
        columns.push(format!("z{}_quadkey", coarse_zoom));

        Ok(Self {
            columns,
            rows,
            fine_zoom,
        })
    }

    /// Adds the rows of `other`, which must have the same columns.
    pub fn append(&mut self, other: ActivityTable) -> Result<(), DownloadError> {
        if other.columns != self.columns {
            return Err(DownloadError::ColumnMismatch {
                expected: self.columns.join(","),
                found: other.columns.join(","),
            });
        }
        self.rows.extend(other.rows);
        Ok(())
    }

    /// Sorts rows by day, then by fine quadkey.
    ///
    /// Tables without a day column sort by fine quadkey only.
    pub fn sort_by_day_and_quadkey(&mut self) {
        let day = self.column_index(DAY_COLUMN);
        let fine = self.column_index(&format!("z{}_quadkey", self.fine_zoom));

        self.rows.sort_by(|a, b| {
            let by_day = match day {
                Some(i) => parse_day(a[i].trim()).cmp(&parse_day(b[i].trim())),
                None => Ordering::Equal,
            };
            by_day.then_with(|| match fine {
                Some(i) => a[i].cmp(&b[i]),
                None => Ordering::Equal,
            })
        });
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Renders the table comma-delimited with a header row.
    pub fn to_csv(&self) -> String {
        let mut out = String::new();
        push_csv_line(&mut out, &self.columns);
        for row in &self.rows {
            push_csv_line(&mut out, row);
        }
        out
    }
}

/// Parses a day value, either a plain date or a date with a time.
fn parse_day(text: &str) -> Option<NaiveDateTime> {
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }
    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
}

fn split_line(line: usize, raw: &str) -> Result<Vec<String>, DownloadError> {
    split_record(raw, SOURCE_DELIMITER).ok_or_else(|| DownloadError::InvalidRecord {
        line,
        message: "unterminated quoted field".to_string(),
    })
}

/// Left-pads a stripped quadkey back to `zoom` digits.
fn pad_quadkey(line: usize, geography: &str, zoom: u8) -> Result<String, DownloadError> {
    let zoom = zoom as usize;
    if geography.is_empty()
        || geography.len() > zoom
        || !geography.bytes().all(|b| (b'0'..=b'3').contains(&b))
    {
        return Err(DownloadError::InvalidRecord {
            line,
            message: format!("invalid {} '{}'", GEOGRAPHY_COLUMN, geography),
        });
    }
    Ok(format!("{:0>width$}", geography, width = zoom))
}

fn push_csv_line(out: &mut String, fields: &[String]) {
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        if field.contains([',', '"', '\n', '\r']) {
            out.push('"');
            out.push_str(&field.replace('"', "\"\""));
            out.push('"');
        } else {
            out.push_str(field);
        }
    }
    out.push('\n');
}
