//! Target selection.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::{Catalog, CatalogError};
use crate::coord::GeoPoint;

/// How a coverage target is picked.
///
/// Parsed from text:
///
/// | Input                  | Selector                      |
/// |------------------------|-------------------------------|
/// | `SFO`, `iata:sfo`      | `Iata("SFO")`                 |
/// | `Denver`, `name:Den`   | `NameContains(..)`            |
/// | `47.6,-122.3`          | `Point` labelled by its coords |
/// | `home=47.6,-122.3`     | `Point` labelled `home`       |
#[derive(Debug, Clone, PartialEq)]
pub enum TargetSelector {
    Iata(String),
    NameContains(String),
    Point { label: String, location: GeoPoint },
}

/// A resolved target: a label and the disc center.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Target {
    pub label: String,
    pub location: GeoPoint,
}

impl TargetSelector {
    /// Looks the selector up in `catalog`.
    ///
    /// `Point` selectors resolve without a catalogue; the others fail with
    /// `CatalogRequired` when `catalog` is `None`.
    pub fn resolve(&self, catalog: Option<&Catalog>) -> Result<Target, CatalogError> {
        let (found, catalog_needed) = match self {
            TargetSelector::Point { label, location } => {
                return Ok(Target {
                    label: label.clone(),
                    location: *location,
                })
            }
            TargetSelector::Iata(code) => (catalog.map(|c| c.find_by_iata(code)), code),
            TargetSelector::NameContains(text) => (catalog.map(|c| c.find_by_name(text)), text),
        };

        match found {
            None => Err(CatalogError::CatalogRequired(catalog_needed.clone())),
            Some(None) => Err(CatalogError::TargetNotFound(self.to_string())),
            Some(Some(point)) => {
                let label = point
                    .iata_code
                    .clone()
                    .unwrap_or_else(|| point.name.clone());
                tracing::debug!(
                    selector = %self,
                    name = %point.name,
                    lat = point.location.lat(),
                    lon = point.location.lon(),
                    "Resolved target"
                );
                Ok(Target {
                    label,
                    location: point.location,
                })
            }
        }
    }
}

fn parse_point(text: &str) -> Option<GeoPoint> {
    let (lat, lon) = text.split_once(',')?;
    let lat: f64 = lat.trim().parse().ok()?;
    let lon: f64 = lon.trim().parse().ok()?;
    GeoPoint::new(lat, lon).ok()
}

fn looks_like_iata(text: &str) -> bool {
    text.len() == 3
        && text
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
}

impl FromStr for TargetSelector {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let invalid = || CatalogError::InvalidSelector(s.to_string());

        if text.is_empty() {
            return Err(invalid());
        }

        if let Some(code) = text.strip_prefix("iata:") {
            let code = code.trim();
            if code.is_empty() {
                return Err(invalid());
            }
            return Ok(TargetSelector::Iata(code.to_ascii_uppercase()));
        }

        if let Some(fragment) = text.strip_prefix("name:") {
            let fragment = fragment.trim();
            if fragment.is_empty() {
                return Err(invalid());
            }
            return Ok(TargetSelector::NameContains(fragment.to_string()));
        }

        if let Some((label, coords)) = text.split_once('=') {
            let label = label.trim();
            let location = parse_point(coords).ok_or_else(invalid)?;
            if label.is_empty() {
                return Err(invalid());
            }
            return Ok(TargetSelector::Point {
                label: label.to_string(),
                location,
            });
        }

        if text.contains(',') {
            let location = parse_point(text).ok_or_else(invalid)?;
            return Ok(TargetSelector::Point {
                label: format!("{:.4},{:.4}", location.lat(), location.lon()),
                location,
            });
        }

        if looks_like_iata(text) {
            return Ok(TargetSelector::Iata(text.to_string()));
        }

        Ok(TargetSelector::NameContains(text.to_string()))
    }
}

impl fmt::Display for TargetSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetSelector::Iata(code) => write!(f, "iata:{}", code),
            TargetSelector::NameContains(text) => write!(f, "name:{}", text),
            TargetSelector::Point { label, location } => {
                write!(f, "{}={},{}", label, location.lat(), location.lon())
            }
        }
    }
}
