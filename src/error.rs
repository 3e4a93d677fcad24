use polars::error::PolarsError;
use thiserror::Error;

/// Errors raised by the coverage engine.
#[derive(Debug, Error)]
pub enum CoverageError {
    /// A point geometry is null, empty or has non-finite coordinates.
    #[error("invalid geometry in {table} table at row {index} (key {key:?})")]
    InvalidGeometry {
        table: &'static str,
        index: usize,
        key: Option<String>,
    },

    /// A distance operation was requested in a degree-based coordinate system.
    #[error("EPSG:{epsg} is a geographic CRS; distances require a planar, metre-based CRS")]
    GeographicCrs { epsg: u32 },

    /// Two tables were supplied in different coordinate systems.
    #[error("CRS mismatch: EPSG:{left} vs EPSG:{right}")]
    CrsMismatch { left: u32, right: u32 },

    /// A requested column is absent from a table.
    #[error("missing column {column:?} in {table} table")]
    MissingColumn {
        column: String,
        table: &'static str,
    },

    /// A row has a null value in the table's key column.
    #[error("null key in {table} table at row {index}")]
    NullKey { table: &'static str, index: usize },

    /// A categorical value could not be classified.
    #[error("unrecognised {column} value {value:?} in {table} table at row {index}")]
    InvalidCategory {
        table: &'static str,
        column: &'static str,
        index: usize,
        value: String,
    },

    /// A population count cell is neither null nor a finite number.
    #[error("invalid count {value} in column {column:?} of {table} table at row {index}")]
    InvalidCount {
        table: &'static str,
        column: String,
        index: usize,
        value: String,
    },

    /// A table's data rows and point geometries differ in number.
    #[error("{table} table has {rows} data rows but {points} point geometries")]
    LengthMismatch {
        table: &'static str,
        rows: usize,
        points: usize,
    },

    /// A proportion lies outside [0, 1].
    #[error("proportion {column} = {value} for unit {key:?} is outside [0, 1]")]
    InvalidProportion {
        key: String,
        column: &'static str,
        value: f64,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Polars(#[from] PolarsError),
}

impl CoverageError {
    pub(crate) fn missing_column(column: &str, table: &'static str) -> Self {
        Self::MissingColumn { column: column.to_string(), table }
    }
}

pub type Result<T, E = CoverageError> = std::result::Result<T, E>;
