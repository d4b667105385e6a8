use common::ErrorLocation;

use std::path::PathBuf;

use thiserror::Error as ThisError;

/// Failures while materializing dependency repositories.
///
/// Messages never contain a clone token; git output is scrubbed before it is
/// stored here.
#[derive(Debug, ThisError)]
pub enum ProvisioningError {
    #[error("Remove Directory Error: {path}: {source} {location}")]
    RemoveDirectory {
        path: PathBuf,
        location: ErrorLocation,
        #[source]
        source: std::io::Error,
    },

    #[error("Install Target Error: {path} exists and is not a directory {location}")]
    OccupiedTarget {
        path: PathBuf,
        location: ErrorLocation,
    },

    #[error("Spawn Error: {message} {location}")]
    Spawn {
        message: String,
        location: ErrorLocation,
        #[source]
        source: std::io::Error,
    },

    #[error("Clone Error: {name}: {message} {location}")]
    Clone {
        name: String,
        message: String,
        location: ErrorLocation,
    },

    #[error("Checkout Error: {name} at {revision}: {message} {location}")]
    Checkout {
        name: String,
        revision: String,
        message: String,
        location: ErrorLocation,
    },

    #[error("Credentials Error: {message} {location}")]
    Credentials {
        message: String,
        location: ErrorLocation,
    },
}
