//! Parser for delimited point-of-interest files.
//!
//! The expected input is a flat file with a header row, in the shape of
//! the OurAirports `airports.csv` export:
//!
//! ```text
//! id,ident,type,name,latitude_deg,longitude_deg,...,iso_country,iso_region,...,iata_code
//! 3878,KSFO,large_airport,"San Francisco International Airport",37.6189,-122.375,...
//! ```
//!
//! Only the coordinate columns are required. Fields may be wrapped in
//! double quotes, in which case the delimiter loses its meaning and `""`
//! stands for a literal quote. A quoted field may span lines.

use std::io::{BufRead, BufReader, Read};

use super::{CatalogError, PointOfInterest};
use crate::coord::GeoPoint;

const LATITUDE_COLUMNS: &[&str] = &["latitude_deg", "latitude", "lat"];
const LONGITUDE_COLUMNS: &[&str] = &["longitude_deg", "longitude", "lon", "lng"];
const IDENT_COLUMNS: &[&str] = &["ident"];
const NAME_COLUMNS: &[&str] = &["name", "city"];
const KIND_COLUMNS: &[&str] = &["type"];
const COUNTRY_COLUMNS: &[&str] = &["iso_country", "country"];
const REGION_COLUMNS: &[&str] = &["iso_region"];
const IATA_COLUMNS: &[&str] = &["iata_code"];

/// Parser for delimited catalogue files.
pub struct CatalogParser;

impl CatalogParser {
    /// Reads the header and returns an iterator over the records.
    ///
    /// Fails straight away if the header lacks a latitude or longitude
    /// column. Each record is then yielded as it is read.
    pub fn parse<R: Read>(
        reader: R,
        delimiter: char,
    ) -> Result<impl Iterator<Item = Result<PointOfInterest, CatalogError>>, CatalogError> {
        let mut records = RecordReader::new(BufReader::new(reader), delimiter);
        let header = match records.next_record()? {
            Some((_, fields)) => fields,
            None => return Err(CatalogError::MissingColumn("latitude_deg".to_string())),
        };
        let columns = Columns::from_header(&header)?;

        Ok(CatalogIterator { records, columns })
    }

    /// Parses every record, skipping rows that fail with a warning.
    ///
    /// I/O errors still abort the parse.
    pub fn parse_all<R: Read>(
        reader: R,
        delimiter: char,
    ) -> Result<Vec<PointOfInterest>, CatalogError> {
        let mut points = Vec::new();
        for result in Self::parse(reader, delimiter)? {
            match result {
                Ok(point) => points.push(point),
                Err(e @ CatalogError::InvalidRecord { .. }) => {
                    tracing::warn!("Skipping catalogue row: {}", e);
                }
                Err(e) => return Err(e),
            }
        }
        Ok(points)
    }
}

/// Splits one logical record into fields.
///
/// Returns `None` when a quoted field is still open at the end of `line`,
/// meaning the record continues on the next physical line.
pub(crate) fn split_record(line: &str, delimiter: char) -> Option<Vec<String>> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    field.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(c);
            }
        } else if c == '"' {
            in_quotes = true;
        } else if c == delimiter {
            fields.push(std::mem::take(&mut field));
        } else {
            field.push(c);
        }
    }

    if in_quotes {
        return None;
    }
    fields.push(field);
    Some(fields)
}

/// Column positions resolved from the header row.
#[derive(Debug)]
struct Columns {
    lat: usize,
    lon: usize,
    ident: Option<usize>,
    name: Option<usize>,
    kind: Option<usize>,
    country: Option<usize>,
    region: Option<usize>,
    iata: Option<usize>,
}

impl Columns {
    fn from_header(header: &[String]) -> Result<Self, CatalogError> {
        let find = |aliases: &[&str]| {
            aliases.iter().find_map(|alias| {
                header
                    .iter()
                    .position(|h| h.trim().eq_ignore_ascii_case(alias))
            })
        };

        let lat = find(LATITUDE_COLUMNS)
            .ok_or_else(|| CatalogError::MissingColumn(LATITUDE_COLUMNS[0].to_string()))?;
        let lon = find(LONGITUDE_COLUMNS)
            .ok_or_else(|| CatalogError::MissingColumn(LONGITUDE_COLUMNS[0].to_string()))?;

        Ok(Self {
            lat,
            lon,
            ident: find(IDENT_COLUMNS),
            name: find(NAME_COLUMNS),
            kind: find(KIND_COLUMNS),
            country: find(COUNTRY_COLUMNS),
            region: find(REGION_COLUMNS),
            iata: find(IATA_COLUMNS),
        })
    }

    fn build(&self, line: usize, fields: &[String]) -> Result<PointOfInterest, CatalogError> {
        let invalid = |message: String| CatalogError::InvalidRecord { line, message };

        let lat_text = fields
            .get(self.lat)
            .ok_or_else(|| invalid("missing latitude field".to_string()))?;
        let lon_text = fields
            .get(self.lon)
            .ok_or_else(|| invalid("missing longitude field".to_string()))?;

        let lat: f64 = lat_text
            .trim()
            .parse()
            .map_err(|_| invalid(format!("unparsable latitude '{}'", lat_text)))?;
        let lon: f64 = lon_text
            .trim()
            .parse()
            .map_err(|_| invalid(format!("unparsable longitude '{}'", lon_text)))?;
        let location = GeoPoint::new(lat, lon).map_err(|e| invalid(e.to_string()))?;

        let text = |index: Option<usize>| {
            index
                .and_then(|i| fields.get(i))
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        let ident = text(self.ident);
        let name = text(self.name)
            .or_else(|| ident.clone())
            .unwrap_or_default();

        Ok(PointOfInterest {
            ident,
            name,
            kind: text(self.kind),
            country: text(self.country),
            region: text(self.region),
            iata_code: text(self.iata),
            location,
        })
    }
}

/// Reads logical records, joining physical lines inside quoted fields.
struct RecordReader<R: BufRead> {
    reader: R,
    delimiter: char,
    line_buffer: String,
    line_number: usize,
}

impl<R: BufRead> RecordReader<R> {
    fn new(reader: R, delimiter: char) -> Self {
        Self {
            reader,
            delimiter,
            line_buffer: String::new(),
            line_number: 0,
        }
    }

    /// Returns the starting line number and fields of the next non-blank
    /// record, or `None` at end of input.
    fn next_record(&mut self) -> Result<Option<(usize, Vec<String>)>, CatalogError> {
        let mut pending = String::new();
        let mut start = 0;

        loop {
            self.line_buffer.clear();
            if self.reader.read_line(&mut self.line_buffer)? == 0 {
                if pending.is_empty() {
                    return Ok(None);
                }
                return Err(CatalogError::InvalidRecord {
                    line: start,
                    message: "unterminated quoted field".to_string(),
                });
            }
            self.line_number += 1;

            let line = self.line_buffer.trim_end_matches(['\n', '\r']);
            if pending.is_empty() {
                if line.trim().is_empty() {
                    continue;
                }
                start = self.line_number;
            } else {
                pending.push('\n');
            }
            pending.push_str(line);

            if let Some(fields) = split_record(&pending, self.delimiter) {
                return Ok(Some((start, fields)));
            }
        }
    }
}

struct CatalogIterator<R: BufRead> {
    records: RecordReader<R>,
    columns: Columns,
}

impl<R: BufRead> Iterator for CatalogIterator<R> {
    type Item = Result<PointOfInterest, CatalogError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.records.next_record() {
            Ok(Some((line, fields))) => Some(self.columns.build(line, &fields)),
            Ok(None) => None,
            Err(e) => Some(Err(e)),
        }
    }
}
