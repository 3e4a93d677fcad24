use geo::{BoundingRect, MultiPolygon, Point};
use rstar::{RTree, AABB};

use crate::{error::{CoverageError, Result}, geom::{require_planar, BoundingBox}};

/// A collection of (possibly overlapping) MultiPolygons indexed by an R-tree of their bounds.
#[derive(Debug, Clone)]
pub struct Geometries {
    shapes: Vec<MultiPolygon<f64>>,
    rtree: RTree<BoundingBox>,
    epsg: u32,
}

impl Geometries {
    /// Construct a Geometries object from a vector of MultiPolygons in a planar CRS.
    /// Every shape must be non-empty; `table` names the source in the error.
    pub fn new(shapes: Vec<MultiPolygon<f64>>, epsg: u32, table: &'static str) -> Result<Self> {
        require_planar(epsg)?;

        let boxes = shapes.iter().enumerate()
            .map(|(i, shape)| shape.bounding_rect()
                .filter(|rect| [rect.min().x, rect.min().y, rect.max().x, rect.max().y].iter().all(|v| v.is_finite()))
                .map(|rect| BoundingBox::new(i, rect))
                .ok_or(CoverageError::InvalidGeometry { table, index: i, key: None }))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { rtree: RTree::bulk_load(boxes), shapes, epsg })
    }

    /// An empty collection in the given CRS.
    pub fn empty(epsg: u32) -> Result<Self> {
        Self::new(Vec::new(), epsg, "empty")
    }

    /// Get the number of MultiPolygons.
    #[inline] pub fn len(&self) -> usize { self.shapes.len() }

    /// Check if there are no MultiPolygons.
    #[inline] pub fn is_empty(&self) -> bool { self.shapes.is_empty() }

    /// Get a reference to the list of MultiPolygons.
    #[inline] pub fn shapes(&self) -> &[MultiPolygon<f64>] { &self.shapes }

    /// Get the EPSG code of the working CRS.
    #[inline] pub fn epsg(&self) -> u32 { self.epsg }

    /// Indices of shapes whose bounding box contains (or touches) the point, unordered.
    #[inline]
    pub(super) fn candidates(&self, point: &Point<f64>) -> impl Iterator<Item = usize> + '_ {
        self.rtree
            .locate_in_envelope_intersecting(&AABB::from_point([point.x(), point.y()]))
            .map(|bbox| bbox.idx())
    }
}
