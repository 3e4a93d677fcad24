use std::fmt;

use geo::Point;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{
    error::{CoverageError, Result},
    geom::{require_planar, PointTable},
    table::{
        columns::*, count_values, ensure_str_column, points_from_columns, require_column, str_values,
        sum_counts, take_rows, AgeBins, DisabilityTable,
    },
};

/// Urban/rural land-use class of a population unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LandUse {
    Urban,
    Rural,
}

impl LandUse {
    pub const ALL: [LandUse; 2] = [LandUse::Urban, LandUse::Rural];

    /// Classify a land-use value by prefix, so that e.g. "Urban major conurbation"
    /// and "Rural village" fall into their broad class.
    pub fn classify(value: &str) -> Option<Self> {
        let value = value.trim().to_ascii_lowercase();
        if value.starts_with("urban") { Some(Self::Urban) }
        else if value.starts_with("rural") { Some(Self::Rural) }
        else { None }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LandUse::Urban => "Urban",
            LandUse::Rural => "Rural",
        }
    }
}

/// Population units (census output areas) with centroids and sub-population counts.
/// Transformations return new tables; the underlying data is never mutated in place.
#[derive(Clone)]
pub struct PopulationTable {
    data: DataFrame,
    centroids: Vec<Option<Point<f64>>>,
    epsg: u32,
}

impl PopulationTable {
    pub(crate) const TABLE: &'static str = "population";

    /// Wrap a DataFrame and its per-row centroids (population-weighted, planar CRS).
    pub fn new(data: DataFrame, centroids: Vec<Option<Point<f64>>>, epsg: u32) -> Result<Self> {
        require_planar(epsg)?;
        let data = ensure_str_column(data, UNIT_KEY, Self::TABLE)?;
        require_column(&data, TOTAL_POP, Self::TABLE)?;

        if data.height() != centroids.len() {
            return Err(CoverageError::LengthMismatch {
                table: Self::TABLE, rows: data.height(), points: centroids.len(),
            });
        }

        Ok(Self { data, centroids, epsg })
    }

    /// Build centroids from coordinate columns (e.g. easting/northing).
    pub fn from_coordinates(data: DataFrame, x: &str, y: &str, epsg: u32) -> Result<Self> {
        let centroids = points_from_columns(&data, x, y, Self::TABLE)?;
        Self::new(data, centroids, epsg)
    }

    #[inline] pub fn data(&self) -> &DataFrame { &self.data }

    #[inline] pub fn centroids(&self) -> &[Option<Point<f64>>] { &self.centroids }

    /// Sum of `total_pop` over all rows.
    pub fn total_population(&self) -> Result<i64> {
        sum_counts(&self.data, TOTAL_POP, Self::TABLE)
    }

    /// A new table with the given column appended (or replaced).
    fn with_column(&self, column: Column) -> Result<Self> {
        let mut data = self.data.clone();
        data.with_column(column)?;
        Ok(Self { data, centroids: self.centroids.clone(), epsg: self.epsg })
    }

    /// A new table carrying one count column per age band.
    ///
    /// Band columns already present are used as-is; otherwise they are summed
    /// from single-year columns `age_0`, `age_1`, ..., where the highest
    /// single-year column is taken to mean "that age and over".
    pub fn with_age_bins(&self, bins: &AgeBins) -> Result<Self> {
        let labels = bins.labels();
        if labels.iter().all(|label| self.data.get_column_index(label).is_some()) {
            return Ok(self.clone());
        }

        let single_years = self.data.get_column_names().into_iter()
            .filter_map(|name| Some((
                name.as_str().strip_prefix(AGE_PREFIX)?.parse::<u32>().ok()?,
                name.to_string(),
            )))
            .collect::<Vec<_>>();

        let mut out = self.clone();
        for (i, label) in labels.iter().enumerate() {
            let sources = single_years.iter()
                .filter(|(age, _)| bins.bin_of(*age) == Some(i))
                .collect::<Vec<_>>();

            if sources.is_empty() {
                let (lo, _) = bins.range(i);
                return Err(CoverageError::missing_column(&format!("{AGE_PREFIX}{lo}"), Self::TABLE));
            }

            let mut counts = vec![0i64; self.len()];
            for (_, name) in sources {
                for (acc, n) in counts.iter_mut().zip(count_values(&self.data, name, Self::TABLE)?) {
                    *acc += n;
                }
            }
            out = out.with_column(Column::new(label.as_str().into(), counts))?;
        }

        Ok(out)
    }

    /// A new table carrying derived `number_disabled` / `number_non-disabled` counts:
    /// each unit's proportions times its total population, rounded to whole people.
    /// Units without proportions contribute zero to both counts.
    pub fn with_disability_counts(&self, disability: &DisabilityTable) -> Result<Self> {
        let keys = self.keys()?;
        let totals = count_values(&self.data, TOTAL_POP, Self::TABLE)?;

        let mut missing = 0usize;
        let (disabled, non_disabled): (Vec<i64>, Vec<i64>) = keys.iter().zip(&totals)
            .map(|(key, &total)| match key.and_then(|key| disability.get(key)) {
                Some((p_dis, p_non)) => (
                    (p_dis * total as f64).round() as i64,
                    (p_non * total as f64).round() as i64,
                ),
                None => { missing += 1; (0, 0) }
            })
            .unzip();

        if missing > 0 {
            log::warn!("{missing} of {} population units have no disability proportions", keys.len());
        }

        self.with_column(Column::new(DISABLED.into(), disabled))?
            .with_column(Column::new(NON_DISABLED.into(), non_disabled))
    }

    /// The rows whose land-use value falls in `class`.
    pub fn filter_land_use(&self, class: LandUse) -> Result<Self> {
        let rows = str_values(&self.data, LAND_USE, Self::TABLE)?.into_iter().enumerate()
            .map(|(index, value)| {
                let value = value.unwrap_or_default();
                LandUse::classify(value)
                    .map(|found| (index, found))
                    .ok_or_else(|| CoverageError::InvalidCategory {
                        table: Self::TABLE, column: LAND_USE, index, value: value.to_string(),
                    })
            })
            .filter(|result| !matches!(result, Ok((_, found)) if *found != class))
            .map(|result| result.map(|(index, _)| index))
            .collect::<Result<Vec<_>>>()?;

        self.take(&rows)
    }
}

impl PointTable for PopulationTable {
    const NAME: &'static str = Self::TABLE;

    #[inline] fn len(&self) -> usize { self.centroids.len() }

    #[inline] fn points(&self) -> &[Option<Point<f64>>] { &self.centroids }

    #[inline] fn epsg(&self) -> u32 { self.epsg }

    fn keys(&self) -> Result<Vec<Option<&str>>> {
        str_values(&self.data, UNIT_KEY, Self::TABLE)
    }

    fn take(&self, rows: &[usize]) -> Result<Self> {
        Ok(Self {
            data: take_rows(&self.data, rows)?,
            centroids: rows.iter().map(|&r| self.centroids[r]).collect(),
            epsg: self.epsg,
        })
    }
}

impl fmt::Debug for PopulationTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cols = self.data.get_column_names().iter()
            .zip(self.data.dtypes())
            .map(|(name, dtype)| format!("{name}: {dtype:?}"))
            .collect::<Vec<_>>();

        f.debug_struct("PopulationTable")
            .field("rows", &self.data.height())
            .field("epsg", &self.epsg)
            .field("null_centroids", &self.centroids.iter().filter(|c| c.is_none()).count())
            .field("columns", &cols)
            .finish()
    }
}
