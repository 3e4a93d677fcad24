use geo::Point;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{
    error::{CoverageError, Result},
    geom::{require_planar, PointTable},
    table::{columns::*, ensure_str_column, points_from_columns, require_column, str_values, take_rows},
};

/// Capacity class of a transit stop (e.g. rail is high, bus is low).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Capacity {
    High,
    Low,
}

impl Capacity {
    pub fn classify(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "high" => Some(Self::High),
            "low" => Some(Self::Low),
            _ => None,
        }
    }
}

/// Transit stops with point geometry and an upstream "highly serviced" flag.
#[derive(Debug, Clone)]
pub struct StopTable {
    data: DataFrame,
    points: Vec<Option<Point<f64>>>,
    epsg: u32,
}

impl StopTable {
    pub(crate) const TABLE: &'static str = "stops";

    pub fn new(data: DataFrame, points: Vec<Option<Point<f64>>>, epsg: u32) -> Result<Self> {
        require_planar(epsg)?;
        let data = ensure_str_column(data, STOP_KEY, Self::TABLE)?;

        if data.height() != points.len() {
            return Err(CoverageError::LengthMismatch {
                table: Self::TABLE, rows: data.height(), points: points.len(),
            });
        }

        Ok(Self { data, points, epsg })
    }

    /// Build stop points from coordinate columns (e.g. easting/northing).
    pub fn from_coordinates(data: DataFrame, x: &str, y: &str, epsg: u32) -> Result<Self> {
        let points = points_from_columns(&data, x, y, Self::TABLE)?;
        Self::new(data, points, epsg)
    }

    #[inline] pub fn data(&self) -> &DataFrame { &self.data }

    /// The stops flagged as highly serviced; null flags count as not serviced.
    pub fn highly_serviced(&self) -> Result<Self> {
        require_column(&self.data, HIGHLY_SERVICED, Self::TABLE)?;
        let flags = self.data.column(HIGHLY_SERVICED)?.cast(&DataType::Boolean)?;

        let rows = flags.bool()?.into_iter().enumerate()
            .filter_map(|(i, flag)| flag.unwrap_or(false).then_some(i))
            .collect::<Vec<_>>();

        self.take(&rows)
    }

    /// The stops of one capacity class.
    pub fn by_capacity(&self, class: Capacity) -> Result<Self> {
        let rows = str_values(&self.data, CAPACITY, Self::TABLE)?.into_iter().enumerate()
            .map(|(index, value)| {
                let value = value.unwrap_or_default();
                Capacity::classify(value)
                    .map(|found| (index, found == class))
                    .ok_or_else(|| CoverageError::InvalidCategory {
                        table: Self::TABLE, column: CAPACITY, index, value: value.to_string(),
                    })
            })
            .filter(|result| !matches!(result, Ok((_, false))))
            .map(|result| result.map(|(index, _)| index))
            .collect::<Result<Vec<_>>>()?;

        self.take(&rows)
    }
}

impl PointTable for StopTable {
    const NAME: &'static str = Self::TABLE;

    #[inline] fn len(&self) -> usize { self.points.len() }

    #[inline] fn points(&self) -> &[Option<Point<f64>>] { &self.points }

    #[inline] fn epsg(&self) -> u32 { self.epsg }

    fn keys(&self) -> Result<Vec<Option<&str>>> {
        str_values(&self.data, STOP_KEY, Self::TABLE)
    }

    fn take(&self, rows: &[usize]) -> Result<Self> {
        Ok(Self {
            data: take_rows(&self.data, rows)?,
            points: rows.iter().map(|&r| self.points[r]).collect(),
            epsg: self.epsg,
        })
    }
}
