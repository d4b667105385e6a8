//! Copies the scripting-environment files out of an installed dependency
//! into the workspace root, where the forecast run starts.

use crate::config::EnvironmentFiles;
use crate::error::assembly::AssemblyError;

use common::ErrorLocation;

use std::panic::Location;
use std::path::{Path, PathBuf};

use log::{debug, info};

const PARTIAL_SUFFIX: &str = "partial";

/// Copy every configured file verbatim into `root`, overwriting same-named files.
///
/// All sources are checked before the first copy, so a missing file leaves the
/// workspace as it was. Each copy goes through a temporary file and a rename.
///
/// # Returns
///
/// The destination paths, in configured order.
pub fn assemble_environment(
    root: &Path,
    environment: &EnvironmentFiles,
) -> Result<Vec<PathBuf>, AssemblyError> {
    info!("Copying environment files");

    let source_dir = environment.source_dir(root);
    let sources: Vec<PathBuf> = environment
        .files
        .iter()
        .map(|file| source_dir.join(file))
        .collect();

    if let Some(missing) = sources.iter().find(|source| !source.is_file()) {
        return Err(AssemblyError::MissingSource {
            path: missing.clone(),
            location: ErrorLocation::from(Location::caller()),
        });
    }

    let mut copied = Vec::with_capacity(sources.len());
    for (file, source) in environment.files.iter().zip(&sources) {
        let destination = root.join(file);
        copy_file(source, &destination)?;
        debug!("Copied {} -> {}", source.display(), destination.display());
        copied.push(destination);
    }

    Ok(copied)
}

#[track_caller]
fn copy_file(source: &Path, destination: &Path) -> Result<(), AssemblyError> {
    let temp_path = destination.with_extension(match destination.extension() {
        Some(ext) => format!("{}.{PARTIAL_SUFFIX}", ext.to_string_lossy()),
        None => PARTIAL_SUFFIX.to_string(),
    });

    let copy_error = |e: std::io::Error| AssemblyError::Copy {
        source_path: source.to_path_buf(),
        destination: destination.to_path_buf(),
        location: ErrorLocation::from(Location::caller()),
        source: e,
    };

    std::fs::copy(source, &temp_path).map_err(copy_error)?;

    // Atomic rename (POSIX guarantees atomicity)
    std::fs::rename(&temp_path, destination).map_err(|e| {
        let _ = std::fs::remove_file(&temp_path);
        copy_error(e)
    })
}
