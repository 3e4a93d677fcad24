use std::{fs::File, io::BufWriter, path::Path};

use anyhow::{Context, Result};
use polars::prelude::*;

/// Reads a CSV file (with header) from `path` into a Polars DataFrame.
pub(crate) fn read_from_csv(path: &Path) -> Result<DataFrame> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open CSV file: {}", path.display()))?;
    CsvReader::new(file)
        .finish()
        .with_context(|| format!("Failed to parse CSV file: {}", path.display()))
}

/// Writes a Polars DataFrame to a CSV file (with header) at `path`.
pub(crate) fn write_to_csv(path: &Path, df: &DataFrame) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    CsvWriter::new(&mut writer)
        .include_header(true)
        .finish(&mut df.clone())?;
    Ok(())
}
