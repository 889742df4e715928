//! Disc-to-quadkey coverage computation.

use tracing::debug;

use super::set::CoverageSet;
use super::tiles::tiles_in_bounds;
use super::CoverageError;
use crate::coord::{GeoPoint, Quadkey, MAX_ZOOM, MIN_ZOOM};
use crate::geodesic::{DiscApproximation, MetricDisc};

/// Largest number of tiles one coverage set may hold.
///
/// A 50 km disc at zoom 18 needs about 820 000 tiles; this allows five
/// times that before refusing.
pub const MAX_COVERAGE_TILES: u64 = 1 << 22;

/// Computes the quadkeys covering a true-distance disc.
///
/// The computer is stateless apart from the disc approximation, so one
/// instance can be shared freely across threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct CoverageComputer {
    approximation: DiscApproximation,
}

impl CoverageComputer {
    pub fn new(approximation: DiscApproximation) -> Self {
        Self { approximation }
    }

    /// Uses `segments` polygon sides per quarter circle.
    pub fn with_quadrant_segments(segments: u32) -> Self {
        Self::new(DiscApproximation::new(segments))
    }

    pub fn approximation(&self) -> &DiscApproximation {
        &self.approximation
    }

    /// Returns every tile at `zoom` intersecting the bounding box of the
    /// disc of `radius_m` metres around `center`.
    ///
    /// The box is a superset of the disc, so tiles near the box corners
    /// may not touch the disc itself.
    pub fn compute(
        &self,
        center: GeoPoint,
        radius_m: f64,
        zoom: u8,
    ) -> Result<CoverageSet, CoverageError> {
        if !(MIN_ZOOM..=MAX_ZOOM).contains(&zoom) {
            return Err(CoverageError::InvalidZoom(zoom));
        }

        let disc = MetricDisc::new(center, radius_m)?;
        let bounds = disc.bounds(&self.approximation)?;

        let ranges = tiles_in_bounds(&bounds, zoom);
        let tiles: u64 = ranges.iter().map(|range| range.len()).sum();
        if tiles > MAX_COVERAGE_TILES {
            return Err(CoverageError::InvalidGeometry(format!(
                "disc of {} m needs {} tiles at zoom {}, limit is {}",
                radius_m, tiles, zoom, MAX_COVERAGE_TILES
            )));
        }

        let mut set = CoverageSet::new(zoom)?;
        for range in ranges {
            for tile in range.iter() {
                set.insert(Quadkey::from_tile(&tile)?)?;
            }
        }

        debug!(
            lat = center.lat(),
            lon = center.lon(),
            radius_m,
            zoom,
            quadkeys = set.len(),
            "Computed disc coverage"
        );

        Ok(set)
    }

    /// Same as [`compute`](Self::compute) for raw degrees.
    ///
    /// Out-of-range coordinates fail with `InvalidGeometry`.
    pub fn compute_at(
        &self,
        lat: f64,
        lon: f64,
        radius_m: f64,
        zoom: u8,
    ) -> Result<CoverageSet, CoverageError> {
        let center = GeoPoint::new(lat, lon)
            .map_err(|e| CoverageError::InvalidGeometry(format!("center: {}", e)))?;
        self.compute(center, radius_m, zoom)
    }
}

/// Computes coverage with the default disc approximation.
pub fn compute_coverage(
    center: GeoPoint,
    radius_m: f64,
    zoom: u8,
) -> Result<CoverageSet, CoverageError> {
    CoverageComputer::default().compute(center, radius_m, zoom)
}
