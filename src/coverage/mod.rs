mod aggregate;
mod axis;
mod orchestrate;
mod record;
mod reshape;

pub use aggregate::{percentage, served_proportions, DisaggregationTable, ServedMetrics};
pub use axis::{axis_specs, Axis, AxisSpec, Category};
pub use orchestrate::{build_catchments, compute_coverage, compute_records, AreaCoverage, CoverageInputs};
pub use record::{
    format_count, format_percent, records_to_dataframe, OutputRecord, RecordMeta, Series, UnitMeasure,
    OUTPUT_COLUMNS, UNDEFINED_VALUE,
};
pub use reshape::reshape_for_output;
