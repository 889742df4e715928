//! Coordinate conversion module
//!
//! Provides conversions between geographic coordinates (latitude/longitude),
//! Web Mercator tile coordinates and quadkeys.

mod quadkey;
mod types;

pub use quadkey::{quadkey_to_tile, tile_to_quadkey, Quadkey};
pub use types::{
    CoordError, GeoBounds, GeoPoint, TileCoord, MAX_LAT, MAX_LON, MAX_ZOOM, MIN_LAT, MIN_LON,
    MIN_ZOOM,
};

use std::f64::consts::PI;

/// Nudge applied before flooring so values that land a hair under a tile
/// edge from float error still resolve to the tile on the far side.
const TILE_EPSILON: f64 = 1e-14;

/// Converts geographic coordinates to tile coordinates.
///
/// # Arguments
///
/// * `lat` - Latitude in degrees (-85.051129 to 85.051129)
/// * `lon` - Longitude in degrees (-180.0 to 180.0)
/// * `zoom` - Zoom level (1 to 23)
///
/// # Returns
///
/// A `Result` containing the tile coordinates or an error if inputs are invalid.
#[inline]
pub fn to_tile_coords(lat: f64, lon: f64, zoom: u8) -> Result<TileCoord, CoordError> {
    // Validate inputs
    if !(MIN_LAT..=MAX_LAT).contains(&lat) {
        return Err(CoordError::InvalidLatitude(lat));
    }
    if !(MIN_LON..=MAX_LON).contains(&lon) {
        return Err(CoordError::InvalidLongitude(lon));
    }
    if !(MIN_ZOOM..=MAX_ZOOM).contains(&zoom) {
        return Err(CoordError::InvalidZoom(zoom));
    }

    Ok(tile_containing(lat, lon, zoom))
}

/// Returns the tile containing a position, clamping to the edge tiles.
///
/// Positions beyond the Web Mercator limits or exactly on the eastern or
/// southern world edge fall into the outermost tile instead of failing.
pub(crate) fn tile_containing(lat: f64, lon: f64, zoom: u8) -> TileCoord {
    let n = 2.0_f64.powi(zoom as i32);
    let last = (1u32 << zoom) - 1;

    // Normalised Web Mercator x/y in [0, 1]
    let x = lon / 360.0 + 0.5;
    let sin_lat = lat.to_radians().sin();
    let y = 0.5 - 0.25 * ((1.0 + sin_lat) / (1.0 - sin_lat)).ln() / PI;

    let to_index = |v: f64| -> u32 {
        if v.is_nan() || v <= 0.0 {
            0
        } else if v >= 1.0 {
            last
        } else {
            (((v + TILE_EPSILON) * n).floor() as u32).min(last)
        }
    };

    TileCoord {
        row: to_index(y),
        col: to_index(x),
        zoom,
    }
}

/// Converts tile coordinates back to geographic coordinates.
///
/// Returns the latitude/longitude of the tile's northwest corner.
#[inline]
pub fn tile_to_lat_lon(tile: &TileCoord) -> (f64, f64) {
    let n = 2.0_f64.powi(tile.zoom as i32);

    // Convert tile X coordinate to longitude
    let lon = tile.col as f64 / n * 360.0 - 180.0;

    // Convert tile Y coordinate to latitude using inverse Web Mercator
    let y = tile.row as f64 / n;
    let lat_rad = (PI * (1.0 - 2.0 * y)).sinh().atan();
    let lat = lat_rad * 180.0 / PI;

    (lat, lon)
}

/// Geographic rectangle covered by a tile.
pub fn tile_bounds(tile: &TileCoord) -> GeoBounds {
    let (north, west) = tile_to_lat_lon(tile);
    let (south, east) = tile_to_lat_lon(&TileCoord {
        row: tile.row + 1,
        col: tile.col + 1,
        zoom: tile.zoom,
    });
    GeoBounds::new(west, south, east, north)
}
