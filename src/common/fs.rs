use std::{fs, path::Path};

use anyhow::{bail, Context, Result};

/// Create the directory if it doesn’t exist; error if a non-directory exists there.
pub(crate) fn ensure_dir_exists(path: &Path) -> Result<()> {
    if path.exists() {
        if !path.is_dir() {
            bail!("Path exists but is not a directory: {}", path.display());
        }
    } else {
        fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory {}", path.display()))?;
    }
    Ok(())
}

/// Error unless the file exists.
pub(crate) fn require_file_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        bail!("File does not exist: {}", path.display());
    }
    if !path.is_file() {
        bail!("Path exists but is not a file: {}", path.display());
    }
    Ok(())
}

/// Prepare `path` for writing: refuse to clobber an existing file unless `force`
/// is set, and create the parent directory if needed.
pub(crate) fn prepare_output_file(path: &Path, force: bool) -> Result<()> {
    if path.is_dir() {
        bail!("Output path is a directory: {}", path.display());
    }
    if path.exists() && !force {
        bail!("Output file already exists (use --force to overwrite): {}", path.display());
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_dir_exists(parent)?;
    }
    Ok(())
}
