//! Coordinate type definitions

use serde::Serialize;
use thiserror::Error;

/// Web Mercator valid latitude range
pub const MIN_LAT: f64 = -85.051129;
pub const MAX_LAT: f64 = 85.051129;

/// Valid longitude range
pub const MIN_LON: f64 = -180.0;
pub const MAX_LON: f64 = 180.0;

/// Quadkeys need at least one digit, and 23 is the deepest level any
/// quadkey-addressed tile service publishes.
pub const MIN_ZOOM: u8 = 1;
pub const MAX_ZOOM: u8 = 23;

/// A WGS84 position in decimal degrees.
///
/// Fields are private so a constructed point is always in range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoPoint {
    lat: f64,
    lon: f64,
}

impl GeoPoint {
    /// Creates a point, rejecting latitudes outside [-90, 90], longitudes
    /// outside [-180, 180] and NaN.
    pub fn new(lat: f64, lon: f64) -> Result<Self, CoordError> {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(CoordError::InvalidLatitude(lat));
        }
        if !(MIN_LON..=MAX_LON).contains(&lon) {
            return Err(CoordError::InvalidLongitude(lon));
        }
        Ok(Self { lat, lon })
    }

    /// Builds a point from an already-computed position, folding the
    /// longitude back into [-180, 180] and clamping the latitude.
    pub(crate) fn normalized(lat: f64, lon: f64) -> Self {
        Self {
            lat: lat.clamp(-90.0, 90.0),
            lon: wrap_longitude(lon),
        }
    }

    /// Latitude in degrees.
    #[inline]
    pub fn lat(&self) -> f64 {
        self.lat
    }

    /// Longitude in degrees.
    #[inline]
    pub fn lon(&self) -> f64 {
        self.lon
    }
}

/// Folds any longitude into [-180, 180].
pub(crate) fn wrap_longitude(lon: f64) -> f64 {
    if (MIN_LON..=MAX_LON).contains(&lon) {
        return lon;
    }
    (lon + 180.0).rem_euclid(360.0) - 180.0
}

/// A latitude/longitude rectangle.
///
/// `west > east` means the rectangle crosses the antimeridian.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoBounds {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl GeoBounds {
    pub fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self {
            west,
            south,
            east,
            north,
        }
    }

    /// Returns true when the rectangle wraps across the 180° meridian.
    #[inline]
    pub fn crosses_antimeridian(&self) -> bool {
        self.west > self.east
    }

    /// Splits an antimeridian-crossing rectangle into its western and
    /// eastern halves. Other rectangles are returned unchanged.
    pub fn split_at_antimeridian(&self) -> Vec<GeoBounds> {
        if !self.crosses_antimeridian() {
            return vec![*self];
        }
        vec![
            GeoBounds::new(MIN_LON, self.south, self.east, self.north),
            GeoBounds::new(self.west, self.south, MAX_LON, self.north),
        ]
    }
}

/// Tile coordinates in Web Mercator / Slippy Map system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TileCoord {
    /// Y coordinate (north-south), 0 at north
    pub row: u32,
    /// X coordinate (east-west), 0 at west
    pub col: u32,
    /// Zoom level
    pub zoom: u8,
}

impl TileCoord {
    /// Number of tiles along one axis at this tile's zoom.
    #[inline]
    pub fn tiles_per_axis(&self) -> u32 {
        1u32 << self.zoom
    }

    /// Returns the tile one level up that contains this tile.
    ///
    /// Returns `None` at zoom 0.
    pub fn parent(&self) -> Option<TileCoord> {
        if self.zoom == 0 {
            return None;
        }
        Some(TileCoord {
            row: self.row >> 1,
            col: self.col >> 1,
            zoom: self.zoom - 1,
        })
    }
}

/// Errors that can occur during coordinate conversion.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordError {
    /// Latitude is outside the accepted range
    #[error("Invalid latitude: {0}")]
    InvalidLatitude(f64),
    /// Longitude is outside valid range (-180.0 to 180.0)
    #[error("Invalid longitude: {0} (must be between {min} and {max})", min = MIN_LON, max = MAX_LON)]
    InvalidLongitude(f64),
    /// Zoom level is outside valid range
    #[error("Invalid zoom level: {0} (must be between {min} and {max})", min = MIN_ZOOM, max = MAX_ZOOM)]
    InvalidZoom(u8),
    /// Quadkey contains invalid characters or is too long
    #[error("Invalid quadkey: '{0}' (must contain only digits 0-3 and length <= {max})", max = MAX_ZOOM)]
    InvalidQuadkey(String),
}
