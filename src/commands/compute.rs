use std::path::Path;

use anyhow::{Context, Result};

use crate::{
    cli::{Cli, ComputeArgs},
    common::{prepare_output_file, read_from_csv, read_named_polygons_from_geojson, require_file_exists, write_to_csv, write_to_geojson_file},
    config::CoverageConfig,
    coverage::{build_catchments, compute_records, records_to_dataframe, CoverageInputs},
    geom::PointTable,
    table::{AreaTable, DisabilityTable, PopulationTable, StopTable},
};

/// Coordinate columns of the point tables.
const EASTING: &str = "easting";
const NORTHING: &str = "northing";

/// Load the configuration file (or defaults) and apply command-line overrides.
fn load_config(args: &ComputeArgs) -> Result<CoverageConfig> {
    let mut config = match &args.config {
        Some(path) => CoverageConfig::from_json_file(path)?,
        None => CoverageConfig::default(),
    };
    if let Some(radius) = args.radius { config.radius_m = radius }
    if let Some(year) = args.year { config.year = year }
    if !args.areas_filter.is_empty() { config.areas = args.areas_filter.clone() }
    config.validate()?;
    Ok(config)
}

/// Read every input file into typed tables.
fn load_inputs(args: &ComputeArgs, epsg: u32) -> Result<CoverageInputs> {
    for path in [&args.population, &args.stops, &args.areas, &args.disability] {
        require_file_exists(path)?;
    }

    let population = PopulationTable::from_coordinates(read_from_csv(&args.population)?, EASTING, NORTHING, epsg)
        .with_context(|| format!("Invalid population table: {}", args.population.display()))?;
    let stops = StopTable::from_coordinates(read_from_csv(&args.stops)?, EASTING, NORTHING, epsg)
        .with_context(|| format!("Invalid stops table: {}", args.stops.display()))?;
    let disability = DisabilityTable::from_dataframe(read_from_csv(&args.disability)?)
        .with_context(|| format!("Invalid disability table: {}", args.disability.display()))?;

    let (names, shapes): (Vec<_>, Vec<_>) = read_named_polygons_from_geojson(&args.areas, &args.area_name_property)?
        .into_iter()
        .unzip();
    let areas = AreaTable::new(names, shapes, epsg)
        .with_context(|| format!("Invalid area boundaries: {}", args.areas.display()))?;

    log::info!("loaded {} units, {} stops, {} areas, {} disability rows",
        population.len(), stops.len(), areas.len(), disability.len());

    Ok(CoverageInputs { population, stops, areas, disability })
}

/// Write the catchment discs of every highly serviced stop.
fn write_catchments(path: &Path, stops: &StopTable, config: &CoverageConfig) -> Result<()> {
    let catchments = build_catchments(&stops.highly_serviced()?, config)?;
    write_to_geojson_file(path, catchments.shapes())?;
    log::info!("wrote {} catchments to {}", catchments.len(), path.display());
    Ok(())
}

pub fn run(_cli: &Cli, args: &ComputeArgs) -> Result<()> {
    prepare_output_file(&args.output, args.force)?;
    if let Some(path) = &args.catchments {
        prepare_output_file(path, args.force)?;
    }

    let config = load_config(args)?;
    let inputs = load_inputs(args, config.epsg)?;

    if let Some(path) = &args.catchments {
        write_catchments(path, &inputs.stops, &config)?;
    }

    let records = compute_records(inputs, &config)?;
    let df = records_to_dataframe(&records)?;
    write_to_csv(&args.output, &df)?;

    log::info!("wrote {} records to {}", records.len(), args.output.display());
    Ok(())
}
