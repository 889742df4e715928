//! Tile enumeration over a geographic rectangle.

use crate::coord::{tile_containing, GeoBounds, TileCoord, MAX_LAT, MAX_LON, MIN_LAT, MIN_LON};

/// Inset applied to the east and south edges so a box ending exactly on a
/// tile boundary does not pull in the next row or column.
const EDGE_EPSILON: f64 = 1e-11;

/// A rectangular block of tiles at one zoom level, inclusive on all sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileRange {
    pub min_col: u32,
    pub max_col: u32,
    pub min_row: u32,
    pub max_row: u32,
    pub zoom: u8,
}

impl TileRange {
    /// Number of tiles in the block.
    pub fn len(&self) -> u64 {
        (self.max_col - self.min_col + 1) as u64 * (self.max_row - self.min_row + 1) as u64
    }

    /// A range always holds at least one tile.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Iterates the block column by column.
    pub fn iter(&self) -> impl Iterator<Item = TileCoord> + '_ {
        (self.min_col..=self.max_col).flat_map(move |col| {
            (self.min_row..=self.max_row).map(move |row| TileCoord {
                row,
                col,
                zoom: self.zoom,
            })
        })
    }
}

/// Returns the tile blocks intersecting `bounds` at `zoom`.
///
/// Latitudes are clamped to the Web Mercator limits. An
/// antimeridian-crossing box yields two blocks.
pub fn tiles_in_bounds(bounds: &GeoBounds, zoom: u8) -> Vec<TileRange> {
    bounds
        .split_at_antimeridian()
        .iter()
        .map(|part| {
            let west = part.west.max(MIN_LON);
            let south = part.south.max(MIN_LAT);
            let east = part.east.min(MAX_LON);
            let north = part.north.min(MAX_LAT);

            let upper_left = tile_containing(north, west, zoom);
            let lower_right = tile_containing(south + EDGE_EPSILON, east - EDGE_EPSILON, zoom);

            TileRange {
                min_col: upper_left.col,
                max_col: lower_right.col.max(upper_left.col),
                min_row: upper_left.row,
                max_row: lower_right.row.max(upper_left.row),
                zoom,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::{tile_bounds, to_tile_coords};

    #[test]
    fn test_single_tile_box() {
        let tile = to_tile_coords(51.5074, -0.1278, 10).unwrap();
        let b = tile_bounds(&tile);
        // Shrink slightly inside the tile
        let inner = GeoBounds::new(b.west + 1e-6, b.south + 1e-6, b.east - 1e-6, b.north - 1e-6);

        let ranges = tiles_in_bounds(&inner, 10);
        assert_eq!(ranges.len(), 1);
        assert_eq!(ranges[0].len(), 1);
        assert_eq!(ranges[0].iter().next(), Some(tile));
    }

    #[test]
    fn test_box_on_tile_edges_stays_inside() {
        // A box that exactly matches one tile must not spill into neighbours
        let tile = TileCoord {
            row: 5,
            col: 3,
            zoom: 3,
        };
        let ranges = tiles_in_bounds(&tile_bounds(&tile), 3);

        assert_eq!(ranges.len(), 1);
        assert_eq!(ranges[0].iter().collect::<Vec<_>>(), vec![tile]);
    }

    #[test]
    fn test_whole_world_at_zoom_two() {
        let world = GeoBounds::new(-180.0, -90.0, 180.0, 90.0);
        let ranges = tiles_in_bounds(&world, 2);

        assert_eq!(ranges.len(), 1);
        assert_eq!(ranges[0].len(), 16);
    }

    #[test]
    fn test_antimeridian_box_splits() {
        let bounds = GeoBounds::new(179.0, -1.0, -179.0, 1.0);
        let ranges = tiles_in_bounds(&bounds, 4);

        assert_eq!(ranges.len(), 2);
        let cols: Vec<u32> = ranges.iter().flat_map(|r| r.iter()).map(|t| t.col).collect();
        assert!(cols.contains(&0));
        assert!(cols.contains(&15));
        assert!(cols.iter().all(|&c| c == 0 || c == 15));
    }

    #[test]
    fn test_iter_count_matches_len() {
        let range = TileRange {
            min_col: 10,
            max_col: 13,
            min_row: 7,
            max_row: 8,
            zoom: 6,
        };
        assert_eq!(range.iter().count() as u64, range.len());
        assert_eq!(range.len(), 8);
    }
}
