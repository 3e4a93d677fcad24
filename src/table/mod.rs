mod age;
mod area;
mod disability;
mod population;
mod stops;

pub use age::AgeBins;
pub use area::AreaTable;
pub use disability::DisabilityTable;
pub use population::{LandUse, PopulationTable};
pub use stops::{Capacity, StopTable};

use geo::Point;
use polars::prelude::*;

use crate::error::{CoverageError, Result};

/// Column names shared by the input tables.
pub mod columns {
    /// Unique population unit key (census output area code).
    pub const UNIT_KEY: &str = "area_code";
    pub const TOTAL_POP: &str = "total_pop";
    pub const LAND_USE: &str = "urban_rural";
    pub const ADMIN_AREA: &str = "admin_area";
    pub const MALE: &str = "male";
    pub const FEMALE: &str = "female";
    /// Prefix of single-year age columns (`age_0`, `age_1`, ...).
    pub const AGE_PREFIX: &str = "age_";

    /// Derived per-unit counts.
    pub const DISABLED: &str = "number_disabled";
    pub const NON_DISABLED: &str = "number_non-disabled";

    /// Disability survey proportions.
    pub const DISABLED_PROP: &str = "disabled";
    pub const NON_DISABLED_PROP: &str = "non_disabled";

    pub const STOP_KEY: &str = "stop_id";
    pub const CAPACITY: &str = "capacity";
    pub const HIGHLY_SERVICED: &str = "highly_serviced";
}

/// Check that `df` has a column called `name`.
pub(crate) fn require_column(df: &DataFrame, name: &str, table: &'static str) -> Result<()> {
    match df.get_column_index(name) {
        Some(_) => Ok(()),
        None => Err(CoverageError::missing_column(name, table)),
    }
}

/// Convert a key column to String type (numeric codes are read as integers by the CSV reader).
pub(crate) fn ensure_str_column(mut df: DataFrame, name: &str, table: &'static str) -> Result<DataFrame> {
    require_column(&df, name, table)?;
    if *df.column(name)?.dtype() != DataType::String {
        let as_str = df.column(name)?.cast(&DataType::String)?;
        df.replace(name, as_str.take_materialized_series())?;
    }
    Ok(df)
}

/// Select rows (repeats allowed) from a DataFrame.
pub(crate) fn take_rows(df: &DataFrame, rows: &[usize]) -> Result<DataFrame> {
    let idx = IdxCa::from_vec("rows".into(), rows.iter().map(|&r| r as IdxSize).collect());
    Ok(df.take(&idx)?)
}

/// Read a string column as optional borrowed values.
pub(crate) fn str_values<'a>(df: &'a DataFrame, name: &str, table: &'static str) -> Result<Vec<Option<&'a str>>> {
    require_column(df, name, table)?;
    Ok(df.column(name)?.str()?.into_iter().collect())
}

/// Read a population count column as integers.
/// Floating-point counts are rounded to the nearest person; nulls in the source count as zero.
/// Any other cell that is not a finite number is an error naming the row.
pub(crate) fn count_values(df: &DataFrame, name: &str, table: &'static str) -> Result<Vec<i64>> {
    require_column(df, name, table)?;
    let column = df.column(name)?;
    let invalid = |index: usize| CoverageError::InvalidCount {
        table,
        column: name.to_string(),
        index,
        value: column.get(index).map(|v| v.to_string()).unwrap_or_default(),
    };

    if column.dtype().is_float() {
        let values = column.cast(&DataType::Float64)?;
        values.f64()?.into_iter().enumerate()
            .map(|(index, v)| match v {
                None => Ok(0),
                Some(v) if v.is_finite() => Ok(v.round() as i64),
                Some(_) => Err(invalid(index)),
            })
            .collect()
    } else {
        // Non-strict cast: unparseable cells come back null, told apart by the source null mask.
        let values = column.cast(&DataType::Int64)?;
        let source_nulls = column.is_null();
        values.i64()?.into_iter().zip(source_nulls.into_iter()).enumerate()
            .map(|(index, (v, was_null))| match v {
                Some(v) => Ok(v),
                None if was_null.unwrap_or(false) => Ok(0),
                None => Err(invalid(index)),
            })
            .collect()
    }
}

/// Build point geometries from two coordinate columns; a null in either makes a null point.
pub(crate) fn points_from_columns(df: &DataFrame, x: &str, y: &str, table: &'static str) -> Result<Vec<Option<Point<f64>>>> {
    require_column(df, x, table)?;
    require_column(df, y, table)?;
    let xs = df.column(x)?.cast(&DataType::Float64)?;
    let ys = df.column(y)?.cast(&DataType::Float64)?;

    Ok(xs.f64()?.into_iter()
        .zip(ys.f64()?.into_iter())
        .map(|(x, y)| Some(Point::new(x?, y?)))
        .collect())
}

/// Sum a population count column.
pub(crate) fn sum_counts(df: &DataFrame, name: &str, table: &'static str) -> Result<i64> {
    Ok(count_values(df, name, table)?.into_iter().sum())
}
