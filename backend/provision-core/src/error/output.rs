use common::ErrorLocation;

use std::path::PathBuf;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum OutputError {
    #[error("Output Write Error: {path}: {source} {location}")]
    Write {
        path: PathBuf,
        location: ErrorLocation,
        #[source]
        source: std::io::Error,
    },

    #[error("Output Serialize Error: {message} {location}")]
    Serialize {
        message: String,
        location: ErrorLocation,
    },
}
