//! Geodesic buffering.
//!
//! Builds a true ground-distance disc around a point by buffering in a
//! local azimuthal equidistant projection, then maps the disc outline
//! back to latitude/longitude. Buffering directly in degrees would
//! stretch the disc east-west by 1/cos(latitude).

mod aeqd;
mod disc;

pub use aeqd::AzimuthalEquidistant;
pub use disc::{DiscApproximation, MetricDisc, DEFAULT_QUADRANT_SEGMENTS};

use thiserror::Error;

/// Mean Earth radius used for the spherical projection, in metres.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Latitudes closer than this to ±90° are treated as a pole.
pub const POLE_EPSILON_DEG: f64 = 1e-9;

/// Errors raised while building a disc or its projection.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    /// Input geometry is not usable (bad radius, out-of-range center)
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    /// The projection cannot be constructed or evaluated
    #[error("Projection failure: {0}")]
    ProjectionFailure(String),
}
