use std::collections::HashSet;

use geo::{Intersects, Point};

use crate::{error::{CoverageError, Result}, geom::{require_same_crs, Geometries}};

/// A table of rows carrying one point geometry each, keyed by a unique string id.
pub trait PointTable: Sized {
    /// Table name used in error messages.
    const NAME: &'static str;

    /// Number of rows.
    fn len(&self) -> usize;

    /// Check if there are no rows.
    fn is_empty(&self) -> bool { self.len() == 0 }

    /// Per-row point geometry; `None` marks a null geometry.
    fn points(&self) -> &[Option<Point<f64>>];

    /// EPSG code of the point coordinates.
    fn epsg(&self) -> u32;

    /// Per-row unit keys.
    fn keys(&self) -> Result<Vec<Option<&str>>>;

    /// A new table holding the given rows (repeats allowed), in the given order.
    fn take(&self, rows: &[usize]) -> Result<Self>;
}

/// One point-polygon pair produced by the spatial join.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Match {
    pub point: usize,   // Row in the point table
    pub polygon: usize, // Index in the polygon collection
}

/// Get the point at `row`, failing on null, empty or non-finite geometry.
pub(super) fn checked_point<T: PointTable>(table: &T, row: usize) -> Result<Point<f64>> {
    match table.points().get(row).copied().flatten() {
        Some(point) if point.x().is_finite() && point.y().is_finite() => Ok(point),
        _ => Err(CoverageError::InvalidGeometry {
            table: T::NAME,
            index: row,
            key: table.keys().ok()
                .and_then(|keys| keys.get(row).copied().flatten().map(str::to_string)),
        }),
    }
}

/// Every (point, polygon) pair where the point intersects the polygon, boundary included.
/// Pairs are ordered by point row, then polygon index.
pub fn match_points_in_polygons<T: PointTable>(points: &T, polygons: &Geometries) -> Result<Vec<Match>> {
    require_same_crs(points.epsg(), polygons.epsg())?;

    let mut matches = Vec::new();
    for row in 0..points.len() {
        let point = checked_point(points, row)?;

        let mut hits = polygons.candidates(&point)
            .filter(|&i| polygons.shapes()[i].intersects(&point))
            .collect::<Vec<_>>();
        hits.sort_unstable();

        matches.extend(hits.into_iter().map(|polygon| Match { point: row, polygon }));
    }

    Ok(matches)
}

/// Rows of `points` that intersect at least one polygon, one row per match.
/// Only the point table's own columns are kept. An empty result is valid.
pub fn find_points_in_polygons<T: PointTable>(points: &T, polygons: &Geometries) -> Result<T> {
    let rows = match_points_in_polygons(points, polygons)?.into_iter()
        .map(|m| m.point)
        .collect::<Vec<_>>();

    log::trace!("{}: {} of {} rows matched {} polygons ({} pairs)",
        T::NAME, rows.iter().collect::<HashSet<_>>().len(), points.len(), polygons.len(), rows.len());

    points.take(&rows)
}

/// Keep the first row for each unit key, preserving row order.
pub fn dedup_by_key<T: PointTable>(table: &T) -> Result<T> {
    let keys = table.keys()?;
    let mut seen = HashSet::with_capacity(keys.len());
    let mut rows = Vec::with_capacity(keys.len());

    for (row, key) in keys.into_iter().enumerate() {
        let key = key.ok_or(CoverageError::NullKey { table: T::NAME, index: row })?;
        if seen.insert(key) { rows.push(row) }
    }

    table.take(&rows)
}

#[cfg(test)]
mod tests {
    use geo::{polygon, MultiPolygon};

    use super::*;

    #[derive(Debug, Clone)]
    struct Pins {
        keys: Vec<Option<String>>,
        points: Vec<Option<Point<f64>>>,
        epsg: u32,
    }

    impl Pins {
        fn new(rows: &[(&str, f64, f64)]) -> Self {
            Self {
                keys: rows.iter().map(|(k, _, _)| Some(k.to_string())).collect(),
                points: rows.iter().map(|&(_, x, y)| Some(Point::new(x, y))).collect(),
                epsg: 27700,
            }
        }
    }

    impl PointTable for Pins {
        const NAME: &'static str = "pins";
        fn len(&self) -> usize { self.points.len() }
        fn points(&self) -> &[Option<Point<f64>>] { &self.points }
        fn epsg(&self) -> u32 { self.epsg }
        fn keys(&self) -> Result<Vec<Option<&str>>> {
            Ok(self.keys.iter().map(|k| k.as_deref()).collect())
        }
        fn take(&self, rows: &[usize]) -> Result<Self> {
            Ok(Self {
                keys: rows.iter().map(|&r| self.keys[r].clone()).collect(),
                points: rows.iter().map(|&r| self.points[r]).collect(),
                epsg: self.epsg,
            })
        }
    }

    fn square(x0: f64, y0: f64, side: f64) -> MultiPolygon<f64> {
        MultiPolygon(vec![polygon![
            (x: x0, y: y0), (x: x0 + side, y: y0), (x: x0 + side, y: y0 + side), (x: x0, y: y0 + side),
        ]])
    }

    fn two_squares() -> Geometries {
        // Overlap on x in [5, 10].
        Geometries::new(vec![square(0.0, 0.0, 10.0), square(5.0, 0.0, 10.0)], 27700, "squares").unwrap()
    }

    #[test]
    fn join_keeps_multiplicity() {
        let pins = Pins::new(&[("a", 2.0, 2.0), ("b", 7.0, 2.0), ("c", 50.0, 50.0)]);
        let matches = match_points_in_polygons(&pins, &two_squares()).unwrap();
        assert_eq!(matches, vec![
            Match { point: 0, polygon: 0 },
            Match { point: 1, polygon: 0 },
            Match { point: 1, polygon: 1 },
        ]);

        let found = find_points_in_polygons(&pins, &two_squares()).unwrap();
        assert_eq!(found.keys().unwrap(), vec![Some("a"), Some("b"), Some("b")]);
    }

    #[test]
    fn boundary_points_intersect() {
        let pins = Pins::new(&[("edge", 0.0, 5.0), ("corner", 15.0, 10.0)]);
        let found = find_points_in_polygons(&pins, &two_squares()).unwrap();
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn empty_result_is_not_an_error() {
        let pins = Pins::new(&[("far", 100.0, 100.0)]);
        assert!(find_points_in_polygons(&pins, &two_squares()).unwrap().is_empty());
        let none = Geometries::empty(27700).unwrap();
        assert!(find_points_in_polygons(&pins, &none).unwrap().is_empty());
    }

    #[test]
    fn dedup_keeps_first_match() {
        let pins = Pins::new(&[("a", 7.0, 2.0), ("b", 8.0, 2.0)]);
        let found = find_points_in_polygons(&pins, &two_squares()).unwrap();
        assert_eq!(found.len(), 4);
        let unique = dedup_by_key(&found).unwrap();
        assert_eq!(unique.keys().unwrap(), vec![Some("a"), Some("b")]);
    }

    #[test]
    fn rejoining_contained_points_is_idempotent() {
        let pins = Pins::new(&[("a", 2.0, 2.0), ("b", 7.0, 2.0), ("c", 12.0, 2.0)]);
        let once = dedup_by_key(&find_points_in_polygons(&pins, &two_squares()).unwrap()).unwrap();
        let twice = dedup_by_key(&find_points_in_polygons(&once, &two_squares()).unwrap()).unwrap();
        assert_eq!(once.keys().unwrap(), twice.keys().unwrap());
        assert_eq!(once.points, twice.points);
    }

    #[test]
    fn null_geometry_fails_with_key() {
        let mut pins = Pins::new(&[("a", 2.0, 2.0), ("b", 7.0, 2.0)]);
        pins.points[1] = None;
        let err = match_points_in_polygons(&pins, &two_squares()).unwrap_err();
        match err {
            CoverageError::InvalidGeometry { table, index, key } => {
                assert_eq!((table, index, key.as_deref()), ("pins", 1, Some("b")));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn nan_geometry_is_invalid() {
        let pins = Pins::new(&[("nan", f64::NAN, 0.0)]);
        assert!(matches!(
            match_points_in_polygons(&pins, &two_squares()),
            Err(CoverageError::InvalidGeometry { index: 0, .. })
        ));
    }

    #[test]
    fn crs_mismatch_is_fatal() {
        let mut pins = Pins::new(&[("a", 2.0, 2.0)]);
        pins.epsg = 2157;
        assert!(matches!(
            find_points_in_polygons(&pins, &two_squares()),
            Err(CoverageError::CrsMismatch { left: 2157, right: 27700 })
        ));
    }
}
