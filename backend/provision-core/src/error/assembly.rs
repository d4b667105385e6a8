use common::ErrorLocation;

use std::path::PathBuf;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum AssemblyError {
    #[error("Missing Environment File Error: {path} {location}")]
    MissingSource {
        path: PathBuf,
        location: ErrorLocation,
    },

    #[error("Copy Error: {source_path} -> {destination}: {source} {location}")]
    Copy {
        source_path: PathBuf,
        destination: PathBuf,
        location: ErrorLocation,
        #[source]
        source: std::io::Error,
    },
}
