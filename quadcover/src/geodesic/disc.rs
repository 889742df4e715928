//! True-distance disc around a point and its geographic bounding box.

use std::f64::consts::PI;

use geo::{BoundingRect, Coord, LineString, Polygon};
use serde::Serialize;

use super::aeqd::AzimuthalEquidistant;
use super::{GeometryError, EARTH_RADIUS_M};
use crate::coord::{GeoBounds, GeoPoint, MAX_LON, MIN_LON};

/// Default number of polygon segments per quarter circle.
///
/// 16 per quadrant (64 sides) is the usual circular buffer resolution.
pub const DEFAULT_QUADRANT_SEGMENTS: u32 = 16;

/// How finely the disc outline is approximated by a regular polygon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DiscApproximation {
    quadrant_segments: u32,
}

impl DiscApproximation {
    /// Creates an approximation with `quadrant_segments` sides per quarter
    /// circle. Values below 1 are raised to 1.
    pub fn new(quadrant_segments: u32) -> Self {
        Self {
            quadrant_segments: quadrant_segments.max(1),
        }
    }

    #[inline]
    pub fn quadrant_segments(&self) -> u32 {
        self.quadrant_segments
    }

    /// Total number of polygon sides.
    #[inline]
    pub fn sides(&self) -> u32 {
        self.quadrant_segments * 4
    }

    /// Builds a closed regular polygon of radius `radius` around `center`
    /// in planar coordinates. The first vertex points due east and one
    /// vertex falls on each compass point.
    pub fn polygon(&self, center: Coord<f64>, radius: f64) -> Polygon<f64> {
        let sides = self.sides();
        let ring: Vec<Coord<f64>> = (0..=sides)
            .map(|i| {
                let theta = 2.0 * PI * (i % sides) as f64 / sides as f64;
                Coord {
                    x: center.x + radius * theta.cos(),
                    y: center.y + radius * theta.sin(),
                }
            })
            .collect();
        Polygon::new(LineString::from(ring), vec![])
    }
}

impl Default for DiscApproximation {
    fn default() -> Self {
        Self::new(DEFAULT_QUADRANT_SEGMENTS)
    }
}

/// A center point and a ground-distance radius in metres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricDisc {
    center: GeoPoint,
    radius_m: f64,
}

impl MetricDisc {
    /// Creates a disc.
    ///
    /// The radius must be positive, finite and shorter than half the
    /// Earth's circumference.
    pub fn new(center: GeoPoint, radius_m: f64) -> Result<Self, GeometryError> {
        if !radius_m.is_finite() || radius_m <= 0.0 {
            return Err(GeometryError::InvalidGeometry(format!(
                "radius must be a positive number of metres, got {}",
                radius_m
            )));
        }
        if radius_m >= PI * EARTH_RADIUS_M {
            return Err(GeometryError::InvalidGeometry(format!(
                "radius {} m reaches the antipode",
                radius_m
            )));
        }
        Ok(Self { center, radius_m })
    }

    #[inline]
    pub fn center(&self) -> GeoPoint {
        self.center
    }

    #[inline]
    pub fn radius_m(&self) -> f64 {
        self.radius_m
    }

    /// Outline of the disc in geographic coordinates.
    ///
    /// The polygon is built in a projection centred on the disc and each
    /// vertex is mapped back through the same projection's inverse. The
    /// ring is closed (first vertex repeated at the end).
    pub fn outline(&self, approximation: &DiscApproximation) -> Result<Vec<GeoPoint>, GeometryError> {
        let projection = AzimuthalEquidistant::new(self.center)?;
        let origin = projection.forward(self.center)?;
        let polygon = approximation.polygon(origin, self.radius_m);

        Ok(polygon
            .exterior()
            .coords()
            .map(|c| projection.inverse(*c))
            .collect())
    }

    /// Bounding box of the disc outline.
    ///
    /// Longitudes are measured relative to the center so a disc that
    /// straddles the antimeridian yields `west > east` instead of a
    /// world-wide box. A disc reaching a pole extends to that pole and
    /// spans every longitude.
    pub fn bounds(&self, approximation: &DiscApproximation) -> Result<GeoBounds, GeometryError> {
        let outline = self.outline(approximation)?;
        let center_lon = self.center.lon();

        let unwrapped: LineString<f64> = outline
            .iter()
            .map(|p| Coord {
                x: center_lon + relative_longitude(p.lon(), center_lon),
                y: p.lat(),
            })
            .collect();

        let rect = unwrapped.bounding_rect().ok_or_else(|| {
            GeometryError::InvalidGeometry("disc outline has no vertices".to_string())
        })?;

        let mut south = rect.min().y;
        let mut north = rect.max().y;
        let mut west = rect.min().x;
        let mut east = rect.max().x;

        let reaches_north_pole = self.polar_distance_m(90.0) <= self.radius_m;
        let reaches_south_pole = self.polar_distance_m(-90.0) <= self.radius_m;
        if reaches_north_pole {
            north = 90.0;
        }
        if reaches_south_pole {
            south = -90.0;
        }

        if reaches_north_pole || reaches_south_pole || east - west >= 360.0 {
            west = MIN_LON;
            east = MAX_LON;
        } else {
            if west < MIN_LON {
                west += 360.0;
            }
            if east > MAX_LON {
                east -= 360.0;
            }
        }

        Ok(GeoBounds::new(west, south, east, north))
    }

    /// Great-circle distance from the center to the pole at `pole_lat`.
    fn polar_distance_m(&self, pole_lat: f64) -> f64 {
        EARTH_RADIUS_M * (pole_lat - self.center.lat()).abs().to_radians()
    }
}

/// Longitude difference folded into [-180, 180].
fn relative_longitude(lon: f64, reference: f64) -> f64 {
    (lon - reference + 180.0).rem_euclid(360.0) - 180.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(lat: f64, lon: f64) -> GeoPoint {
        GeoPoint::new(lat, lon).unwrap()
    }

    #[test]
    fn test_polygon_vertex_count_and_closure() {
        let approx = DiscApproximation::default();
        let polygon = approx.polygon(Coord { x: 0.0, y: 0.0 }, 10.0);
        let ring = polygon.exterior();

        assert_eq!(ring.0.len(), 65, "64 sides plus the closing vertex");
        assert_eq!(ring.0.first(), ring.0.last());
    }

    #[test]
    fn test_polygon_vertices_on_circle() {
        let approx = DiscApproximation::new(4);
        let polygon = approx.polygon(Coord { x: 5.0, y: -3.0 }, 100.0);

        for c in polygon.exterior().coords() {
            let r = (c.x - 5.0).hypot(c.y + 3.0);
            assert!((r - 100.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_approximation_floor() {
        assert_eq!(DiscApproximation::new(0).quadrant_segments(), 1);
        assert_eq!(DiscApproximation::new(0).sides(), 4);
    }

    #[test]
    fn test_rejects_non_positive_radius() {
        let center = point(0.0, 0.0);
        for radius in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let result = MetricDisc::new(center, radius);
            assert!(
                matches!(result, Err(GeometryError::InvalidGeometry(_))),
                "radius {} should be rejected",
                radius
            );
        }
    }

    #[test]
    fn test_rejects_antipodal_radius() {
        let result = MetricDisc::new(point(0.0, 0.0), PI * EARTH_RADIUS_M);
        assert!(matches!(result, Err(GeometryError::InvalidGeometry(_))));
    }

    #[test]
    fn test_pole_center_fails_projection() {
        let disc = MetricDisc::new(point(90.0, 0.0), 1000.0).unwrap();
        let result = disc.bounds(&DiscApproximation::default());
        assert!(matches!(result, Err(GeometryError::ProjectionFailure(_))));
    }

    #[test]
    fn test_outline_vertices_are_radius_away() {
        let center = point(43.6532, -79.3832);
        let disc = MetricDisc::new(center, 50_000.0).unwrap();
        let projection = AzimuthalEquidistant::new(center).unwrap();

        for vertex in disc.outline(&DiscApproximation::default()).unwrap() {
            let xy = projection.forward(vertex).unwrap();
            assert!((xy.x.hypot(xy.y) - 50_000.0).abs() < 1e-3);
        }
    }

    #[test]
    fn test_equator_bounds_are_symmetric() {
        let disc = MetricDisc::new(point(0.0, 0.0), 111_194.9).unwrap();
        let bounds = disc.bounds(&DiscApproximation::default()).unwrap();

        // ~1 degree of arc on a 6371 km sphere
        assert!((bounds.north - 1.0).abs() < 1e-3);
        assert!((bounds.south + 1.0).abs() < 1e-3);
        assert!((bounds.east - 1.0).abs() < 1e-3);
        assert!((bounds.west + 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_bounds_widen_in_longitude_at_high_latitude() {
        let approx = DiscApproximation::default();
        let equator = MetricDisc::new(point(0.0, 0.0), 50_000.0)
            .unwrap()
            .bounds(&approx)
            .unwrap();
        let north = MetricDisc::new(point(60.0, 0.0), 50_000.0)
            .unwrap()
            .bounds(&approx)
            .unwrap();

        let equator_width = equator.east - equator.west;
        let north_width = north.east - north.west;
        assert!(
            north_width > 1.9 * equator_width,
            "cos(60°) halves metres per degree of longitude"
        );
    }

    #[test]
    fn test_bounds_cross_antimeridian() {
        let disc = MetricDisc::new(point(-17.0, 179.9), 40_000.0).unwrap();
        let bounds = disc.bounds(&DiscApproximation::default()).unwrap();

        assert!(bounds.crosses_antimeridian());
        assert!(bounds.west > 179.0 && bounds.west < 179.9);
        assert!(bounds.east < -179.0 && bounds.east > -180.0);
    }

    #[test]
    fn test_bounds_include_reached_pole() {
        // 89.5°N with a 100 km radius reaches the pole (~55.6 km away)
        let disc = MetricDisc::new(point(89.5, 10.0), 100_000.0).unwrap();
        let bounds = disc.bounds(&DiscApproximation::default()).unwrap();

        assert_eq!(bounds.north, 90.0);
        assert_eq!(bounds.west, -180.0);
        assert_eq!(bounds.east, 180.0);
        assert!(bounds.south < 89.5);
    }
}
