#![doc = "Population served by public transport, disaggregated by age, sex, disability and urban/rural class"]
pub mod cli;
pub mod commands;

mod common;
mod config;
mod coverage;
mod error;
mod geom;
mod table;

#[doc(inline)]
pub use config::CoverageConfig;

#[doc(inline)]
pub use error::{CoverageError, Result};

#[doc(inline)]
pub use coverage::{
    axis_specs, build_catchments, compute_coverage, compute_records, format_count, format_percent, percentage,
    records_to_dataframe, reshape_for_output, served_proportions, AreaCoverage, Axis, AxisSpec, Category,
    CoverageInputs, DisaggregationTable, OutputRecord, RecordMeta, Series, ServedMetrics, UnitMeasure,
    OUTPUT_COLUMNS, UNDEFINED_VALUE,
};

#[doc(inline)]
pub use geom::{
    buffer_points, dedup_by_key, disc, find_points_in_polygons, is_geographic, match_points_in_polygons,
    require_planar, require_same_crs, Geometries, Match, PointTable, DEFAULT_QUADRANT_SEGMENTS,
};

#[doc(inline)]
pub use table::{columns, AgeBins, AreaTable, Capacity, DisabilityTable, LandUse, PopulationTable, StopTable};
