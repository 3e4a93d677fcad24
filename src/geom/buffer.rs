use std::f64::consts::FRAC_PI_2;

use geo::{Coord, LineString, MultiPolygon, Point, Polygon};

use crate::{error::{CoverageError, Result}, geom::{join::checked_point, require_planar, PointTable}};

/// Number of segments used to approximate a quarter circle.
pub const DEFAULT_QUADRANT_SEGMENTS: usize = 16;

/// Approximate the disc of `radius` around `center` by a regular polygon with
/// `4 * quadrant_segments` vertices lying on the circle.
pub fn disc(center: Point<f64>, radius: f64, quadrant_segments: usize) -> Polygon<f64> {
    debug_assert!(quadrant_segments >= 1, "quadrant_segments must be at least 1");

    let n = 4 * quadrant_segments.max(1);
    let step = FRAC_PI_2 / quadrant_segments.max(1) as f64;
    let mut ring = (0..n)
        .map(|i| {
            let theta = step * i as f64;
            Coord { x: center.x() + radius * theta.cos(), y: center.y() + radius * theta.sin() }
        })
        .collect::<Vec<_>>();
    ring.push(ring[0]); // close the ring

    Polygon::new(LineString(ring), vec![])
}

/// Expand each point of `points` into a catchment disc of `radius` CRS units.
/// Returns one shape per row, in row order.
pub fn buffer_points<T: PointTable>(points: &T, radius: f64, quadrant_segments: usize) -> Result<Vec<MultiPolygon<f64>>> {
    require_planar(points.epsg())?;
    if !(radius.is_finite() && radius > 0.0) {
        return Err(CoverageError::InvalidConfig(format!("buffer radius must be positive, got {radius}")));
    }

    (0..points.len())
        .map(|row| checked_point(points, row)
            .map(|point| MultiPolygon(vec![disc(point, radius, quadrant_segments)])))
        .collect()
}
