//! Quadkey newtype and tile ↔ quadkey conversion.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::types::{CoordError, TileCoord, MAX_ZOOM, MIN_ZOOM};

/// Converts tile coordinates to a quadkey string.
///
/// Digit `i` (most significant first) is `2 * y_bit + x_bit` for bit
/// `zoom - 1 - i` of the row and column.
pub fn tile_to_quadkey(tile: &TileCoord) -> String {
    let mut quadkey = String::with_capacity(tile.zoom as usize);
    for level in (1..=tile.zoom).rev() {
        let mask = 1u32 << (level - 1);
        let mut digit = b'0';
        if tile.col & mask != 0 {
            digit += 1;
        }
        if tile.row & mask != 0 {
            digit += 2;
        }
        quadkey.push(digit as char);
    }
    quadkey
}

/// Converts a quadkey string back to tile coordinates.
pub fn quadkey_to_tile(quadkey: &str) -> Result<TileCoord, CoordError> {
    if quadkey.len() > MAX_ZOOM as usize {
        return Err(CoordError::InvalidQuadkey(quadkey.to_string()));
    }

    let zoom = quadkey.len() as u8;
    let mut row = 0u32;
    let mut col = 0u32;

    for (i, c) in quadkey.chars().enumerate() {
        let mask = 1u32 << (zoom as usize - 1 - i);
        match c {
            '0' => {}
            '1' => col |= mask,
            '2' => row |= mask,
            '3' => {
                col |= mask;
                row |= mask;
            }
            _ => return Err(CoordError::InvalidQuadkey(quadkey.to_string())),
        }
    }

    Ok(TileCoord { row, col, zoom })
}

/// A validated quadkey: between [`MIN_ZOOM`] and [`MAX_ZOOM`] digits, each 0-3.
///
/// Ordering is lexicographic, so a parent sorts directly before its
/// descendants.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Quadkey(String);

impl Quadkey {
    /// Builds the quadkey of a tile.
    pub fn from_tile(tile: &TileCoord) -> Result<Self, CoordError> {
        if !(MIN_ZOOM..=MAX_ZOOM).contains(&tile.zoom) {
            return Err(CoordError::InvalidZoom(tile.zoom));
        }
        Ok(Self(tile_to_quadkey(tile)))
    }

    /// Zoom level, which is the number of digits.
    #[inline]
    pub fn zoom(&self) -> u8 {
        self.0.len() as u8
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Keeps the first `zoom` digits, giving the ancestor tile's quadkey.
    pub fn truncate(&self, zoom: u8) -> Result<Quadkey, CoordError> {
        if zoom < MIN_ZOOM || zoom > self.zoom() {
            return Err(CoordError::InvalidZoom(zoom));
        }
        Ok(Quadkey(self.0[..zoom as usize].to_string()))
    }

    /// Returns true when `other` lies inside this quadkey's tile.
    pub fn contains(&self, other: &Quadkey) -> bool {
        other.0.starts_with(&self.0)
    }

    /// Tile addressed by this quadkey.
    pub fn to_tile(&self) -> TileCoord {
        // Digits were validated on construction.
        quadkey_to_tile(&self.0).unwrap_or(TileCoord {
            row: 0,
            col: 0,
            zoom: 0,
        })
    }
}

impl FromStr for Quadkey {
    type Err = CoordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || s.len() > MAX_ZOOM as usize {
            return Err(CoordError::InvalidQuadkey(s.to_string()));
        }
        if !s.bytes().all(|b| (b'0'..=b'3').contains(&b)) {
            return Err(CoordError::InvalidQuadkey(s.to_string()));
        }
        Ok(Quadkey(s.to_string()))
    }
}

impl fmt::Display for Quadkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Quadkey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
