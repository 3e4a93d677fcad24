use std::{borrow::Cow, collections::HashSet};

use anyhow::{anyhow, Context, Result};
use rayon::prelude::*;

use crate::{
    config::CoverageConfig,
    coverage::{
        axis_specs, reshape_for_output, served_proportions, Axis, AxisSpec, DisaggregationTable, OutputRecord,
        RecordMeta,
    },
    geom::{buffer_points, dedup_by_key, find_points_in_polygons, Geometries, PointTable},
    table::{AreaTable, Capacity, DisabilityTable, PopulationTable, StopTable},
};

/// The read-only input snapshot shared by every area of a run.
#[derive(Debug, Clone)]
pub struct CoverageInputs {
    pub population: PopulationTable,
    pub stops: StopTable,
    pub areas: AreaTable,
    pub disability: DisabilityTable,
}

impl CoverageInputs {
    /// Derive the run-wide tables: age-band columns on the population and
    /// the highly serviced subset of stops.
    fn prepare(self, config: &CoverageConfig) -> Result<Self> {
        let bins = config.age_bins()?;
        Ok(Self {
            population: self.population.with_age_bins(&bins).context("binning ages")?,
            stops: self.stops.highly_serviced().context("selecting highly serviced stops")?,
            ..self
        })
    }
}

/// The per-axis disaggregation tables of one area.
#[derive(Debug, Clone, PartialEq)]
pub struct AreaCoverage {
    pub area: String,
    pub tables: Vec<(Axis, DisaggregationTable)>,
}

impl AreaCoverage {
    /// The table of one axis.
    pub fn table(&self, axis: Axis) -> Option<&DisaggregationTable> {
        self.tables.iter().find(|(a, _)| *a == axis).map(|(_, t)| t)
    }

    /// Long-format records for every axis, in axis order.
    pub fn records(&self, meta: &RecordMeta) -> Vec<OutputRecord> {
        self.tables.iter()
            .flat_map(|(axis, table)| reshape_for_output(table, *axis, &self.area, meta))
            .collect()
    }
}

/// Catchment discs around every stop, one shape per stop.
/// High-capacity stops use `high_capacity_radius_m` when it is configured.
pub fn build_catchments(stops: &StopTable, config: &CoverageConfig) -> Result<Geometries> {
    let shapes = match config.high_capacity_radius_m {
        None => buffer_points(stops, config.radius_m, config.quadrant_segments)?,
        Some(high_radius) => {
            let mut shapes = buffer_points(&stops.by_capacity(Capacity::High)?, high_radius, config.quadrant_segments)?;
            shapes.extend(buffer_points(&stops.by_capacity(Capacity::Low)?, config.radius_m, config.quadrant_segments)?);
            shapes
        }
    };

    Ok(Geometries::new(shapes, stops.epsg(), "catchments")?)
}

/// The table of one aggregation step, after its land-use filter if it has one.
fn axis_table(population: &PopulationTable, served: &PopulationTable, spec: &AxisSpec) -> Result<DisaggregationTable> {
    let (population, served) = match spec.land_use {
        Some(class) => (
            Cow::Owned(population.filter_land_use(class)?),
            Cow::Owned(served.filter_land_use(class)?),
        ),
        None => (Cow::Borrowed(population), Cow::Borrowed(served)),
    };

    let mut table = DisaggregationTable::default();
    for category in &spec.categories {
        table.extend(served_proportions(&population, &served, std::slice::from_ref(category))
            .with_context(|| format!("category `{}`", category.label))?);
    }
    Ok(table)
}

/// Compute every axis table for area `index` of `inputs.areas`.
fn compute_area(inputs: &CoverageInputs, index: usize, specs: &[AxisSpec], config: &CoverageConfig) -> Result<AreaCoverage> {
    let boundary = inputs.areas.boundary(index)?;

    let population = dedup_by_key(&find_points_in_polygons(&inputs.population, &boundary)?)?
        .with_disability_counts(&inputs.disability)
        .with_context(|| format!("axis `{}`", Axis::Disability))?;
    let stops = dedup_by_key(&find_points_in_polygons(&inputs.stops, &boundary)?)?;

    let catchments = build_catchments(&stops, config)?;
    let matched = find_points_in_polygons(&population, &catchments)?;
    let served = dedup_by_key(&matched)?;

    log::debug!("{}: {} units, {} stops, {} unit-catchment matches, {} units served",
        inputs.areas.names()[index], population.len(), stops.len(), matched.len(), served.len());

    let mut tables: Vec<(Axis, DisaggregationTable)> = Vec::new();
    for spec in specs {
        let table = axis_table(&population, &served, spec)
            .with_context(|| format!("axis `{}`", spec.axis))?;

        match tables.last_mut() {
            Some((axis, existing)) if *axis == spec.axis => existing.extend(table),
            _ => tables.push((spec.axis, table)),
        }
    }

    Ok(AreaCoverage { area: inputs.areas.names()[index].clone(), tables })
}

/// Compute served/unserved tables for every requested area.
///
/// Areas are independent and computed in parallel; results keep area order.
/// Every area is attempted; if any fail, each failure is logged and the first
/// one (in area order) is returned.
pub fn compute_coverage(inputs: CoverageInputs, config: &CoverageConfig) -> Result<Vec<AreaCoverage>> {
    config.validate()?;
    let specs = axis_specs(&config.age_bins()?);
    let inputs = inputs.prepare(config)?;

    let indices = if config.areas.is_empty() {
        (0..inputs.areas.len()).collect::<Vec<_>>()
    } else {
        let mut seen = HashSet::new();
        config.areas.iter()
            .map(|name| inputs.areas.position(name)
                .ok_or_else(|| anyhow!("area {name:?} not found in boundary table")))
            .filter(|index| index.as_ref().map_or(true, |&i| seen.insert(i)))
            .collect::<Result<Vec<_>>>()?
    };

    log::info!("computing coverage for {} areas ({} units, {} highly serviced stops)",
        indices.len(), inputs.population.len(), inputs.stops.len());

    let results = indices.par_iter()
        .map(|&i| compute_area(&inputs, i, &specs, config)
            .with_context(|| format!("area `{}`", inputs.areas.names()[i])))
        .collect::<Vec<_>>();

    let mut coverages = Vec::with_capacity(results.len());
    let mut first_error = None;
    for result in results {
        match result {
            Ok(coverage) => {
                if let Some(total) = coverage.table(Axis::Total).and_then(|t| t.iter().next()) {
                    log::info!("{}: {} of {} residents served", coverage.area, total.1.served, total.1.total);
                }
                coverages.push(coverage);
            }
            Err(err) => {
                log::error!("{err:#}");
                first_error.get_or_insert(err);
            }
        }
    }

    match first_error {
        Some(err) => Err(err),
        None => Ok(coverages),
    }
}

/// Compute coverage and melt it into one long-format table of records.
pub fn compute_records(inputs: CoverageInputs, config: &CoverageConfig) -> Result<Vec<OutputRecord>> {
    let meta = RecordMeta::from(config);
    Ok(compute_coverage(inputs, config)?.iter()
        .flat_map(|coverage| coverage.records(&meta))
        .collect())
}
