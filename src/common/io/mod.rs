mod csv;
mod geojson;

pub(crate) use csv::*;
pub(crate) use geojson::*;
