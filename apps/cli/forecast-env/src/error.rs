use common::ErrorLocation;
use provision_core::error::CoreError;

use thiserror::Error;

/// Errors surfaced by the command-line front end.
///
/// Everything here ends the process with a failure status.
#[derive(Debug, Error)]
pub enum ForecastEnvError {
    /// Error from this App
    #[error("Forecast Env Error: {message} {location}")]
    ForecastEnv {
        message: String,
        location: ErrorLocation,
    },

    /// Error from provision-core (config, install, retrieval, etc.)
    #[error(transparent)]
    Core(#[from] CoreError),
}
