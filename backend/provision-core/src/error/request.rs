use common::ErrorLocation;
use models::ModelError;

use std::panic::Location;
use std::path::PathBuf;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum RequestError {
    #[error("Request Read Error: {path}: {source} {location}")]
    Read {
        path: PathBuf,
        location: ErrorLocation,
        #[source]
        source: std::io::Error,
    },

    #[error("Request Parse Error: {path}: {reason} {location}")]
    Parse {
        path: PathBuf,
        reason: String,
        location: ErrorLocation,
    },

    #[error("Request Validation Error: {message} {location}")]
    Validation {
        message: String,
        location: ErrorLocation,
    },
}

impl From<ModelError> for RequestError {
    #[track_caller]
    fn from(error: ModelError) -> Self {
        RequestError::Validation {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
