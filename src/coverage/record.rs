use polars::prelude::*;

use crate::{config::CoverageConfig, coverage::Axis};

/// Placeholder written where a percentage is undefined (zero-population category).
pub const UNDEFINED_VALUE: &str = "None";

/// Output column names, in order.
pub const OUTPUT_COLUMNS: [&str; 9] = [
    "Year", "Area", "Disaggregation", "Category", "Series",
    "Observation status", "Unit multiplier", "Unit measure", "Value",
];

/// Reporting series of an output row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Series {
    /// The area's total population row; carries no series name.
    Blank,
    Served,
    Unserved,
}

impl Series {
    pub fn as_str(&self) -> &'static str {
        match self {
            Series::Blank => "",
            Series::Served => "Served",
            Series::Unserved => "Unserved",
        }
    }
}

/// Unit of the numeric value of an output row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitMeasure {
    Individual,
    Percent,
}

impl UnitMeasure {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitMeasure::Individual => "individual",
            UnitMeasure::Percent => "percent",
        }
    }
}

/// Per-run constants stamped onto every record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordMeta {
    pub year: u16,
    pub observation_status: String,
    pub unit_multiplier: String,
}

impl From<&CoverageConfig> for RecordMeta {
    fn from(config: &CoverageConfig) -> Self {
        Self {
            year: config.year,
            observation_status: config.observation_status.clone(),
            unit_multiplier: config.unit_multiplier.clone(),
        }
    }
}

/// One row of the long-format output table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRecord {
    pub year: u16,
    pub area: String,
    pub axis: Axis,
    pub category: String,
    pub series: Series,
    pub observation_status: String,
    pub unit_multiplier: String,
    pub unit_measure: UnitMeasure,
    pub value: String,
}

/// Format a population count.
pub fn format_count(count: i64) -> String {
    count.to_string()
}

/// Format a percentage with two decimals, or the undefined placeholder.
pub fn format_percent(pct: Option<f64>) -> String {
    pct.map_or_else(|| UNDEFINED_VALUE.to_string(), |v| format!("{v:.2}"))
}

/// Collect records into a DataFrame with the output columns.
pub fn records_to_dataframe(records: &[OutputRecord]) -> PolarsResult<DataFrame> {
    fn text<'a>(records: &'a [OutputRecord], f: impl Fn(&'a OutputRecord) -> &'a str) -> Vec<&'a str> {
        records.iter().map(f).collect()
    }

    let [year, area, axis, category, series, status, multiplier, measure, value] = OUTPUT_COLUMNS;
    DataFrame::new(vec![
        Column::new(year.into(), records.iter().map(|r| r.year as i32).collect::<Vec<_>>()),
        Column::new(area.into(), text(records, |r| r.area.as_str())),
        Column::new(axis.into(), text(records, |r| r.axis.label())),
        Column::new(category.into(), text(records, |r| r.category.as_str())),
        Column::new(series.into(), text(records, |r| r.series.as_str())),
        Column::new(status.into(), text(records, |r| r.observation_status.as_str())),
        Column::new(multiplier.into(), text(records, |r| r.unit_multiplier.as_str())),
        Column::new(measure.into(), text(records, |r| r.unit_measure.as_str())),
        Column::new(value.into(), text(records, |r| r.value.as_str())),
    ])
}
