use crate::error::{CoverageError, Result};

/// Geographic (degree-based) coordinate systems commonly found in census and transit feeds.
const GEOGRAPHIC_EPSG: [u32; 10] = [
    4326, // WGS 84
    4258, // ETRS89
    4269, // NAD83
    4267, // NAD27
    4283, // GDA94
    4617, // NAD83(CSRS)
    4167, // NZGD2000
    4230, // ED50
    4277, // OSGB36 lon/lat
    4979, // WGS 84 (3D)
];

/// Whether `epsg` names a known degree-based coordinate system.
#[inline]
pub fn is_geographic(epsg: u32) -> bool {
    GEOGRAPHIC_EPSG.contains(&epsg)
}

/// Error unless `epsg` is usable for metric distances.
pub fn require_planar(epsg: u32) -> Result<()> {
    if is_geographic(epsg) { return Err(CoverageError::GeographicCrs { epsg }) }
    Ok(())
}

/// Error unless both tables share one CRS.
pub fn require_same_crs(left: u32, right: u32) -> Result<()> {
    if left != right { return Err(CoverageError::CrsMismatch { left, right }) }
    Ok(())
}
