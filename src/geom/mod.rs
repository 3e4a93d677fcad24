mod bbox;
mod buffer;
mod crs;
mod geom;
mod join;

use bbox::BoundingBox;
pub use buffer::{buffer_points, disc, DEFAULT_QUADRANT_SEGMENTS};
pub use crs::{is_geographic, require_planar, require_same_crs};
pub use geom::Geometries;
pub use join::{dedup_by_key, find_points_in_polygons, match_points_in_polygons, Match, PointTable};
