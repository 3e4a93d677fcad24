use clap::{Args, Parser, Subcommand, ValueHint};
use std::path::PathBuf;

/// Population served by public transport
#[derive(Parser, Debug)]
#[command(name = "transitcover", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute served/unserved population tables for each area
    Compute(ComputeArgs),
}

#[derive(Args, Debug)]
pub struct ComputeArgs {
    /// Population units CSV (one row per unit, centroid in easting/northing columns)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub population: PathBuf,

    /// Stops CSV (stop_id, capacity, highly_serviced, easting, northing)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub stops: PathBuf,

    /// Area boundaries GeoJSON FeatureCollection (Polygon/MultiPolygon features)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub areas: PathBuf,

    /// Feature property holding the area name
    #[arg(long, default_value = "name")]
    pub area_name_property: String,

    /// Disability proportions CSV (area_code, disabled, non_disabled)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub disability: PathBuf,

    /// JSON configuration file; command-line flags override its values
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Catchment radius in metres; applies to every stop unless the config sets
    /// `high_capacity_radius_m`, in which case it applies to low-capacity stops only
    #[arg(long)]
    pub radius: Option<f64>,

    /// Calculation year stamped on every output row
    #[arg(long)]
    pub year: Option<u16>,

    /// Restrict the run to this area (repeatable)
    #[arg(long = "area")]
    pub areas_filter: Vec<String>,

    /// Output CSV of long-format records
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub output: PathBuf,

    /// Also write the catchment polygons as GeoJSON
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub catchments: Option<PathBuf>,

    /// Overwrite output files if they exist
    #[arg(long)]
    pub force: bool,
}
