use std::{fs::File, io::BufReader, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::{error::CoverageError, geom::{require_planar, DEFAULT_QUADRANT_SEGMENTS}, table::AgeBins};

/// Run configuration for the coverage computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CoverageConfig {
    /// Catchment radius around low-capacity stops, in CRS units (metres).
    pub radius_m: f64,
    /// Catchment radius around high-capacity stops; `None` uses `radius_m` for every stop.
    pub high_capacity_radius_m: Option<f64>,
    /// Segments per quarter circle when approximating a catchment disc.
    pub quadrant_segments: usize,
    /// Lower bounds of the age bands.
    pub age_boundaries: Vec<u32>,
    /// Calculation year written to every output record.
    pub year: u16,
    /// EPSG code of the planar CRS every input table is expressed in.
    pub epsg: u32,
    pub observation_status: String,
    pub unit_multiplier: String,
    /// Restrict the run to these areas (empty means every area).
    pub areas: Vec<String>,
}

impl Default for CoverageConfig {
    fn default() -> Self {
        Self {
            radius_m: 500.0,
            high_capacity_radius_m: None,
            quadrant_segments: DEFAULT_QUADRANT_SEGMENTS,
            age_boundaries: (0..=90).step_by(5).collect(),
            year: 2021,
            epsg: 27700, // British National Grid
            observation_status: "Undefined".to_string(),
            unit_multiplier: "Units".to_string(),
            areas: Vec::new(),
        }
    }
}

impl CoverageConfig {
    /// Load a configuration from a JSON file; missing keys take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;
        let config: Self = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the computation cannot use.
    pub fn validate(&self) -> Result<(), CoverageError> {
        for radius in std::iter::once(self.radius_m).chain(self.high_capacity_radius_m) {
            if !(radius.is_finite() && radius > 0.0) {
                return Err(CoverageError::InvalidConfig(format!("catchment radius must be positive, got {radius}")));
            }
        }
        if self.quadrant_segments == 0 {
            return Err(CoverageError::InvalidConfig("quadrant_segments must be at least 1".into()));
        }
        self.age_bins()?;
        require_planar(self.epsg)
    }

    /// The configured age bands.
    pub fn age_bins(&self) -> Result<AgeBins, CoverageError> {
        AgeBins::from_boundaries(&self.age_boundaries)
    }
}
