use common::ErrorLocation;
use models::ModelError;

use std::panic::Location;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config Read Error: {path}: {source} {location}")]
    ReadError {
        location: ErrorLocation,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Config Parse Error: {path}: {reason} {location}")]
    ParseError {
        location: ErrorLocation,
        path: PathBuf,
        reason: String,
    },

    #[error("Config Validation Error: {reason} {location}")]
    ValidationError {
        location: ErrorLocation,
        reason: String,
    },

    #[error("Root Directory Error: {reason} {location}")]
    RootDirectory {
        location: ErrorLocation,
        reason: String,
    },
}

impl ConfigError {
    #[track_caller]
    pub fn validation(reason: impl Into<String>) -> Self {
        ConfigError::ValidationError {
            location: ErrorLocation::from(Location::caller()),
            reason: reason.into(),
        }
    }
}

impl From<ModelError> for ConfigError {
    #[track_caller]
    fn from(error: ModelError) -> Self {
        ConfigError::ValidationError {
            location: ErrorLocation::from(Location::caller()),
            reason: error.to_string(),
        }
    }
}
