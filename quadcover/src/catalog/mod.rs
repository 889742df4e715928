//! Point-of-interest catalogue.
//!
//! Loads a delimited flat file of named locations (airports, cities, ...)
//! and picks coverage targets from it.
//!
//! # Example
//!
//! ```
//! use quadcover::catalog::{Catalog, CatalogFilter};
//!
//! let data = "name,type,iso_country,iso_region,iata_code,latitude_deg,longitude_deg\n\
//!             Denver International Airport,large_airport,US,US-CO,DEN,39.86,-104.67\n\
//!             San Francisco International Airport,large_airport,US,US-CA,SFO,37.62,-122.37\n";
//!
//! let catalog = Catalog::from_reader(data.as_bytes(), ',').unwrap();
//! let large = catalog.filter(&CatalogFilter::new().country("US").kind("large_airport"));
//! assert_eq!(large.records()[0].iata_code.as_deref(), Some("SFO"));
//! ```

mod parser;
mod selector;

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use crate::coord::GeoPoint;

pub use parser::CatalogParser;
pub(crate) use parser::split_record;
pub use selector::{Target, TargetSelector};

/// Errors from loading a catalogue or resolving targets in it.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Catalogue not found at: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Catalogue has no '{0}' column")]
    MissingColumn(String),

    #[error("Invalid record at line {line}: {message}")]
    InvalidRecord { line: usize, message: String },

    #[error("Invalid target selector '{0}'")]
    InvalidSelector(String),

    #[error("Target '{0}' needs a catalogue but none is configured")]
    CatalogRequired(String),

    #[error("No catalogue entry matches target '{0}'")]
    TargetNotFound(String),
}

/// One named location from the catalogue.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointOfInterest {
    pub ident: Option<String>,
    pub name: String,
    /// Category, e.g. `large_airport`
    pub kind: Option<String>,
    pub country: Option<String>,
    pub region: Option<String>,
    pub iata_code: Option<String>,
    pub location: GeoPoint,
}

/// Record filter. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogFilter {
    pub country: Option<String>,
    pub kind: Option<String>,
}

impl CatalogFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    /// Whether `point` passes every set criterion (case-insensitive).
    pub fn matches(&self, point: &PointOfInterest) -> bool {
        fn field_matches(wanted: &Option<String>, actual: &Option<String>) -> bool {
            match (wanted, actual) {
                (None, _) => true,
                (Some(w), Some(a)) => w.eq_ignore_ascii_case(a),
                (Some(_), None) => false,
            }
        }

        field_matches(&self.country, &point.country) && field_matches(&self.kind, &point.kind)
    }
}

/// An ordered collection of points of interest.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    records: Vec<PointOfInterest>,
}

impl Catalog {
    pub fn new(records: Vec<PointOfInterest>) -> Self {
        Self { records }
    }

    /// Loads a catalogue file.
    ///
    /// Files ending in `.gz` are decompressed on the fly.
    pub fn from_path<P: AsRef<Path>>(path: P, delimiter: char) -> Result<Self, CatalogError> {
        use flate2::read::GzDecoder;

        let path = path.as_ref();
        if !path.exists() {
            return Err(CatalogError::NotFound(path.to_path_buf()));
        }

        let file = File::open(path)?;
        let catalog = if path.extension().is_some_and(|ext| ext == "gz") {
            tracing::debug!(path = %path.display(), "Loading gzip compressed catalogue");
            Self::from_reader(GzDecoder::new(file), delimiter)?
        } else {
            Self::from_reader(BufReader::new(file), delimiter)?
        };

        tracing::info!(
            path = %path.display(),
            count = catalog.len(),
            "Loaded catalogue"
        );
        Ok(catalog)
    }

    pub fn from_reader<R: Read>(reader: R, delimiter: char) -> Result<Self, CatalogError> {
        Ok(Self::new(CatalogParser::parse_all(reader, delimiter)?))
    }

    /// Records passing `filter`, sorted by region.
    ///
    /// The sort is stable, so records within a region keep file order.
    /// Records without a region sort first.
    pub fn filter(&self, filter: &CatalogFilter) -> Catalog {
        let mut records: Vec<PointOfInterest> = self
            .records
            .iter()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect();
        records.sort_by(|a, b| a.region.cmp(&b.region));
        Catalog { records }
    }

    /// First record with the given IATA code (case-insensitive).
    pub fn find_by_iata(&self, code: &str) -> Option<&PointOfInterest> {
        self.records.iter().find(|p| {
            p.iata_code
                .as_deref()
                .is_some_and(|c| c.eq_ignore_ascii_case(code))
        })
    }

    /// First record whose name contains `fragment` (case-insensitive).
    pub fn find_by_name(&self, fragment: &str) -> Option<&PointOfInterest> {
        let needle = fragment.to_lowercase();
        self.records
            .iter()
            .find(|p| p.name.to_lowercase().contains(&needle))
    }

    pub fn records(&self) -> &[PointOfInterest] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PointOfInterest> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
