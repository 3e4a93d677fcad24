use crate::error::{CoverageError, Result};

/// Ordered age bands defined by their lower bounds; the last band is open-ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgeBins {
    lower: Vec<u32>,
}

impl AgeBins {
    /// Build bands from strictly increasing lower bounds, e.g. `[0, 5, ..., 90]`.
    pub fn from_boundaries(lower: &[u32]) -> Result<Self> {
        if lower.is_empty() {
            return Err(CoverageError::InvalidConfig("age boundaries must not be empty".into()));
        }
        if lower.windows(2).any(|w| w[0] >= w[1]) {
            return Err(CoverageError::InvalidConfig(format!("age boundaries must be strictly increasing: {lower:?}")));
        }
        Ok(Self { lower: lower.to_vec() })
    }

    /// Five-year bands from 0-4 through 90+.
    pub fn five_year() -> Self {
        Self { lower: (0..=90).step_by(5).collect() }
    }

    #[inline] pub fn len(&self) -> usize { self.lower.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.lower.is_empty() }

    /// Inclusive age range of band `i`; `None` upper bound for the open band.
    pub fn range(&self, i: usize) -> (u32, Option<u32>) {
        (self.lower[i], self.lower.get(i + 1).map(|next| next - 1))
    }

    /// Band labels in order: `"0-4"`, `"5-9"`, ..., `"90+"`.
    pub fn labels(&self) -> Vec<String> {
        (0..self.len())
            .map(|i| match self.range(i) {
                (lo, Some(hi)) if lo == hi => format!("{lo}"),
                (lo, Some(hi)) => format!("{lo}-{hi}"),
                (lo, None) => format!("{lo}+"),
            })
            .collect()
    }

    /// Index of the band containing `age`, if any.
    pub fn bin_of(&self, age: u32) -> Option<usize> {
        self.lower.iter().rposition(|&lo| lo <= age)
    }
}

impl Default for AgeBins {
    fn default() -> Self { Self::five_year() }
}
