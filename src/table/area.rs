use std::collections::HashSet;

use geo::MultiPolygon;

use crate::{error::{CoverageError, Result}, geom::Geometries};

/// Administrative-area boundaries: one dissolved polygon per named area.
#[derive(Debug, Clone)]
pub struct AreaTable {
    names: Vec<String>,
    geoms: Geometries,
}

impl AreaTable {
    pub(crate) const TABLE: &'static str = "areas";

    pub fn new(names: Vec<String>, shapes: Vec<MultiPolygon<f64>>, epsg: u32) -> Result<Self> {
        if names.len() != shapes.len() {
            return Err(CoverageError::InvalidConfig(format!(
                "area table has {} names but {} shapes", names.len(), shapes.len()
            )));
        }

        let mut seen = HashSet::new();
        if let Some(dup) = names.iter().find(|name| !seen.insert(name.as_str())) {
            return Err(CoverageError::InvalidConfig(format!("duplicate area name {dup:?}")));
        }

        Ok(Self { names, geoms: Geometries::new(shapes, epsg, Self::TABLE)? })
    }

    #[inline] pub fn len(&self) -> usize { self.names.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.names.is_empty() }

    #[inline] pub fn names(&self) -> &[String] { &self.names }

    #[inline] pub fn epsg(&self) -> u32 { self.geoms.epsg() }

    /// Index of the area called `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// The boundary of area `i` as a single-shape collection, ready for the matcher.
    pub fn boundary(&self, i: usize) -> Result<Geometries> {
        Geometries::new(vec![self.geoms.shapes()[i].clone()], self.geoms.epsg(), Self::TABLE)
    }
}
