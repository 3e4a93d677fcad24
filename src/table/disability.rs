use std::collections::HashMap;

use polars::prelude::*;

use crate::{
    error::{CoverageError, Result},
    table::{columns::*, ensure_str_column, require_column, str_values},
};

/// Per-unit proportions of disabled and non-disabled residents, keyed by unit code.
#[derive(Debug, Clone, Default)]
pub struct DisabilityTable {
    proportions: HashMap<String, (f64, f64)>,
}

impl DisabilityTable {
    const TABLE: &'static str = "disability";

    /// Read `area_code`, `disabled` and `non_disabled` columns; proportions lie in [0, 1].
    /// Rows with a null key or null proportion are skipped.
    pub fn from_dataframe(df: DataFrame) -> Result<Self> {
        let df = ensure_str_column(df, UNIT_KEY, Self::TABLE)?;
        require_column(&df, DISABLED_PROP, Self::TABLE)?;
        require_column(&df, NON_DISABLED_PROP, Self::TABLE)?;

        let disabled = df.column(DISABLED_PROP)?.cast(&DataType::Float64)?;
        let non_disabled = df.column(NON_DISABLED_PROP)?.cast(&DataType::Float64)?;

        let mut proportions = HashMap::with_capacity(df.height());
        for ((key, p_dis), p_non) in str_values(&df, UNIT_KEY, Self::TABLE)?.into_iter()
            .zip(disabled.f64()?.into_iter())
            .zip(non_disabled.f64()?.into_iter())
        {
            let (Some(key), Some(p_dis), Some(p_non)) = (key, p_dis, p_non) else { continue };

            for (column, value) in [(DISABLED_PROP, p_dis), (NON_DISABLED_PROP, p_non)] {
                if !(0.0..=1.0).contains(&value) {
                    return Err(CoverageError::InvalidProportion { key: key.to_string(), column, value });
                }
            }
            proportions.insert(key.to_string(), (p_dis, p_non));
        }

        Ok(Self { proportions })
    }

    /// (disabled, non-disabled) proportions for a unit.
    #[inline]
    pub fn get(&self, key: &str) -> Option<(f64, f64)> {
        self.proportions.get(key).copied()
    }

    #[inline] pub fn len(&self) -> usize { self.proportions.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.proportions.is_empty() }
}
