//! Persists the retrieved data, the only durable artifact of a run.

use crate::error::CoreError;
use crate::error::data_warehouse::DataWarehouseError;
use crate::error::output::OutputError;

use common::ErrorLocation;
use models::RetrievalResult;

use std::io::Write;
use std::panic::Location;
use std::path::{Path, PathBuf};

use log::{error, info};
use serde::Serialize;
use serde_json::Value;
use serde_json::ser::PrettyFormatter;

/// Logged, and carried in the error, when the warehouse rejects the request.
pub const BAD_REQUEST_HINT: &str = "Bad request: please check if the requested keys exist";

/// Indentation of the retrieved-data artifact.
pub const OUTPUT_INDENT: &[u8] = b"    ";

/// Indentation of processed request documents.
pub const REQUEST_INDENT: &[u8] = b"  ";

const TEMP_SUFFIX: &str = "tmp";

/// Write a successful outcome to `output_path`; turn anything else into an error.
///
/// On failure nothing is written. The body of an unclassified failure is
/// copied to `error_sink` before the error is returned.
pub fn persist_outcome<W: Write>(
    outcome: RetrievalResult,
    output_path: &Path,
    error_sink: &mut W,
) -> Result<PathBuf, CoreError> {
    match outcome {
        RetrievalResult::Success(payload) => {
            info!("Successfully retrieved forecast input data");
            write_json(output_path, &payload, OUTPUT_INDENT)?;
            info!("Forecast input data written to {}", output_path.display());
            Ok(output_path.to_path_buf())
        }
        RetrievalResult::BadRequest(body) => {
            error!("{BAD_REQUEST_HINT}");
            Err(DataWarehouseError::BadRequest {
                message: BAD_REQUEST_HINT.to_string(),
                body,
                location: ErrorLocation::from(Location::caller()),
            }
            .into())
        }
        RetrievalResult::OtherFailure { status, body } => {
            // The sink is best effort; the error below carries the body as well.
            let _ = writeln!(error_sink, "{body}");
            error!("Data request failed with HTTP {status}");
            Err(DataWarehouseError::UnclassifiedFailure {
                status_code: status,
                body,
                location: ErrorLocation::from(Location::caller()),
            }
            .into())
        }
    }
}

/// Serialize `value` with the given indent and replace `path` atomically.
pub fn write_json(path: &Path, value: &Value, indent: &[u8]) -> Result<(), OutputError> {
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(indent);
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    value
        .serialize(&mut serializer)
        .map_err(|e| OutputError::Serialize {
            message: e.to_string(),
            location: ErrorLocation::from(Location::caller()),
        })?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let temp_path = path.with_file_name(format!("{file_name}.{TEMP_SUFFIX}"));

    std::fs::write(&temp_path, &buffer).map_err(|e| OutputError::Write {
        path: temp_path.clone(),
        location: ErrorLocation::from(Location::caller()),
        source: e,
    })?;

    // Atomic rename (POSIX guarantees atomicity)
    std::fs::rename(&temp_path, path).map_err(|e| {
        let _ = std::fs::remove_file(&temp_path);
        OutputError::Write {
            path: path.to_path_buf(),
            location: ErrorLocation::from(Location::caller()),
            source: e,
        }
    })
}
