//! Quadkey coverage of true-distance discs.
//!
//! [`CoverageComputer`] turns a center point and a radius in metres into
//! the set of quadkeys, at one zoom level, whose tiles intersect the
//! disc's bounding box:
//!
//! ```text
//! center ──► azimuthal projection ──► planar disc polygon
//!                                            │
//!          quadkeys ◄── tiles in box ◄── lat/lon bounding box
//! ```
//!
//! [`CoverageSet::coarsen`] derives coarser grouping keys from a finished
//! set by prefix truncation.
//!
//! # Example
//!
//! ```
//! use quadcover::coord::GeoPoint;
//! use quadcover::coverage::compute_coverage;
//!
//! let toronto = GeoPoint::new(43.6532, -79.3832).unwrap();
//! let fine = compute_coverage(toronto, 1_000.0, 16).unwrap();
//! let coarse = fine.coarsen(7).unwrap();
//! assert!(coarse.len() <= fine.len());
//! ```

mod computer;
mod set;
mod tiles;

pub use computer::{compute_coverage, CoverageComputer, MAX_COVERAGE_TILES};
pub use set::CoverageSet;
pub use tiles::{tiles_in_bounds, TileRange};

use thiserror::Error;

use crate::coord::CoordError;
use crate::geodesic::GeometryError;

/// Errors from coverage computation and set manipulation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoverageError {
    /// Radius or center is unusable
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    /// The geodesic projection could not be built
    #[error("Projection failure: {0}")]
    ProjectionFailure(String),

    /// Zoom level outside the supported range, or finer than the source set
    #[error("Invalid zoom level: {0}")]
    InvalidZoom(u8),

    /// A quadkey or set at one zoom was combined with another zoom
    #[error("Zoom mismatch: expected {expected}, got {actual}")]
    ZoomMismatch { expected: u8, actual: u8 },
}

impl From<GeometryError> for CoverageError {
    fn from(e: GeometryError) -> Self {
        match e {
            GeometryError::InvalidGeometry(msg) => CoverageError::InvalidGeometry(msg),
            GeometryError::ProjectionFailure(msg) => CoverageError::ProjectionFailure(msg),
        }
    }
}

impl From<CoordError> for CoverageError {
    fn from(e: CoordError) -> Self {
        match e {
            CoordError::InvalidZoom(zoom) => CoverageError::InvalidZoom(zoom),
            other => CoverageError::InvalidGeometry(other.to_string()),
        }
    }
}
