//! Reading and preparing data-request documents.

use crate::error::CoreError;
use crate::error::request::RequestError;
use crate::output::{REQUEST_INDENT, write_json};

use common::ErrorLocation;
use models::DataRequestBatch;

use std::panic::Location;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use humantime::format_rfc3339_millis;
use log::info;
use serde_json::{Map, Value};

const ADJUSTED_PREFIX: &str = "adjusted-";

/// Load the request batch stored at `path`.
pub fn load_request_batch(path: &Path) -> Result<DataRequestBatch, RequestError> {
    let contents = std::fs::read_to_string(path).map_err(|e| RequestError::Read {
        path: path.to_path_buf(),
        location: ErrorLocation::from(Location::caller()),
        source: e,
    })?;

    let document: Value = serde_json::from_str(&contents).map_err(|e| RequestError::Parse {
        path: path.to_path_buf(),
        reason: e.to_string(),
        location: ErrorLocation::from(Location::caller()),
    })?;

    let batch = DataRequestBatch::from_value(document)?;
    info!("Loaded {} data requests from {}", batch.len(), path.display());
    Ok(batch)
}

/// UTC time with millisecond precision and a `Z` suffix.
pub fn snapshot_time(now: SystemTime) -> String {
    format_rfc3339_millis(now).to_string()
}

/// `adjusted-<name>` next to the input file.
pub fn default_output_path(input: &Path) -> PathBuf {
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    input.with_file_name(format!("{ADJUSTED_PREFIX}{name}"))
}

/// Parse `--params-json`. It must be a JSON object.
#[track_caller]
pub fn parse_params(params_json: &str) -> Result<Map<String, Value>, RequestError> {
    match serde_json::from_str::<Value>(params_json) {
        Ok(Value::Object(params)) => Ok(params),
        Ok(_) => Err(RequestError::Validation {
            message: String::from("Request parameters must be a JSON object"),
            location: ErrorLocation::from(Location::caller()),
        }),
        Err(e) => Err(RequestError::Validation {
            message: format!("Request parameters are not valid JSON: {e}"),
            location: ErrorLocation::from(Location::caller()),
        }),
    }
}

/// Prepare a request document for a workflow step.
///
/// Every key of `params` is written onto every item; afterwards any
/// `snapshot_time` that is present but empty gets `now`. The document keeps
/// its shape and is written to `output`.
pub fn stamp_request_file(
    input: &Path,
    output: &Path,
    params: &Map<String, Value>,
    now: SystemTime,
) -> Result<DataRequestBatch, CoreError> {
    let mut batch = load_request_batch(input)?;

    batch.apply_params(params);
    batch.fill_empty_snapshot_times(&snapshot_time(now));

    let document = batch.clone().into_document();
    write_json(output, &document, REQUEST_INDENT)?;

    info!(
        "Processed {} requests from {} into {}",
        batch.len(),
        input.display(),
        output.display()
    );
    Ok(batch)
}
