use common::{ErrorLocation, HttpStatusCode};
use models::ModelError;

use std::panic::Location;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum DataWarehouseError {
    #[error("HTTP Error: {message} {location}")]
    Http {
        message: String,
        location: ErrorLocation,
    },

    #[error("JSON Error: {message} {location}")]
    Json {
        message: String,
        location: ErrorLocation,
    },

    #[error("URL Parse Error: {message} {location}")]
    UrlParse {
        message: String,
        location: ErrorLocation,
    },

    #[error("Authentication Error: HTTP {status_code} - {message} {location}")]
    Authentication {
        status_code: HttpStatusCode,
        message: String,
        location: ErrorLocation,
    },

    /// 400 from the retrieve endpoint.
    #[error("Bad Request Error: {message} {location}")]
    BadRequest {
        message: String,
        body: String,
        location: ErrorLocation,
    },

    /// Any other non-200 from the retrieve endpoint.
    #[error("Unclassified Failure Error: HTTP {status_code} - {body} {location}")]
    UnclassifiedFailure {
        status_code: HttpStatusCode,
        body: String,
        location: ErrorLocation,
    },
}

impl From<url::ParseError> for DataWarehouseError {
    #[track_caller]
    fn from(error: url::ParseError) -> Self {
        DataWarehouseError::UrlParse {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<reqwest::Error> for DataWarehouseError {
    #[track_caller]
    fn from(error: reqwest::Error) -> Self {
        DataWarehouseError::Http {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<serde_json::Error> for DataWarehouseError {
    #[track_caller]
    fn from(error: serde_json::Error) -> Self {
        DataWarehouseError::Json {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<ModelError> for DataWarehouseError {
    #[track_caller]
    fn from(error: ModelError) -> Self {
        DataWarehouseError::Json {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
