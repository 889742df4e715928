//! Spherical azimuthal equidistant projection.
//!
//! Planar coordinates are metres east (`x`) and north (`y`) of the
//! projection origin. Distance from the origin is preserved exactly, so a
//! planar circle of radius `r` maps to the set of points at great-circle
//! distance `r` from the origin.

use geo::Coord;

use super::{GeometryError, EARTH_RADIUS_M, POLE_EPSILON_DEG};
use crate::coord::GeoPoint;

/// Azimuthal equidistant projection centred on a fixed origin.
#[derive(Debug, Clone, Copy)]
pub struct AzimuthalEquidistant {
    origin: GeoPoint,
    sin_lat0: f64,
    cos_lat0: f64,
    radius_m: f64,
}

impl AzimuthalEquidistant {
    /// Creates a projection centred on `origin` for a sphere of
    /// [`EARTH_RADIUS_M`].
    ///
    /// Fails with [`GeometryError::ProjectionFailure`] when the origin is a
    /// pole, where azimuths are undefined.
    pub fn new(origin: GeoPoint) -> Result<Self, GeometryError> {
        Self::with_radius(origin, EARTH_RADIUS_M)
    }

    /// Creates a projection on a sphere of the given radius.
    pub fn with_radius(origin: GeoPoint, radius_m: f64) -> Result<Self, GeometryError> {
        if 90.0 - origin.lat().abs() < POLE_EPSILON_DEG {
            return Err(GeometryError::ProjectionFailure(format!(
                "azimuthal projection is degenerate at pole (lat {})",
                origin.lat()
            )));
        }
        if !(radius_m.is_finite() && radius_m > 0.0) {
            return Err(GeometryError::ProjectionFailure(format!(
                "sphere radius must be positive, got {}",
                radius_m
            )));
        }

        let lat0 = origin.lat().to_radians();
        Ok(Self {
            origin,
            sin_lat0: lat0.sin(),
            cos_lat0: lat0.cos(),
            radius_m,
        })
    }

    /// Projection origin.
    #[inline]
    pub fn origin(&self) -> GeoPoint {
        self.origin
    }

    /// Projects a geographic point to planar metres.
    ///
    /// The antipode of the origin has no unique image and fails with
    /// [`GeometryError::ProjectionFailure`].
    pub fn forward(&self, point: GeoPoint) -> Result<Coord<f64>, GeometryError> {
        let lat = point.lat().to_radians();
        let dlon = (point.lon() - self.origin.lon()).to_radians();
        let (sin_lat, cos_lat) = lat.sin_cos();
        let (sin_dlon, cos_dlon) = dlon.sin_cos();

        // Unscaled east/north components; their length is sin(c)
        let east = cos_lat * sin_dlon;
        let north = self.cos_lat0 * sin_lat - self.sin_lat0 * cos_lat * cos_dlon;
        let sin_c = east.hypot(north);
        let cos_c = self.sin_lat0 * sin_lat + self.cos_lat0 * cos_lat * cos_dlon;

        if sin_c < 1e-15 {
            if cos_c > 0.0 {
                return Ok(Coord { x: 0.0, y: 0.0 });
            }
            return Err(GeometryError::ProjectionFailure(format!(
                "point ({}, {}) is antipodal to the projection origin",
                point.lat(),
                point.lon()
            )));
        }

        // atan2 keeps the angular distance accurate close to the origin
        let c = sin_c.atan2(cos_c);
        let scale = self.radius_m * c / sin_c;
        Ok(Coord {
            x: scale * east,
            y: scale * north,
        })
    }

    /// Maps planar metres back to a geographic point.
    pub fn inverse(&self, coord: Coord<f64>) -> GeoPoint {
        let rho = coord.x.hypot(coord.y);
        if rho < 1e-9 {
            return self.origin;
        }

        let c = rho / self.radius_m;
        let (sin_c, cos_c) = c.sin_cos();

        let lat = (cos_c * self.sin_lat0 + coord.y * sin_c * self.cos_lat0 / rho)
            .clamp(-1.0, 1.0)
            .asin();
        let dlon = (coord.x * sin_c)
            .atan2(rho * self.cos_lat0 * cos_c - coord.y * self.sin_lat0 * sin_c);

        GeoPoint::normalized(lat.to_degrees(), self.origin.lon() + dlon.to_degrees())
    }
}
