//! Classified outcome of one data-retrieval round trip.

use crate::{ErrorLocation, ModelError};

use common::HttpStatusCode;

use std::panic::Location;

use serde_json::Value;

/// What the retrieve endpoint answered.
///
/// Built once per retrieval attempt and consumed by the result writer.
#[derive(Debug, Clone, PartialEq)]
pub enum RetrievalResult {
    /// 200: the retrieved series payload.
    Success(Value),
    /// 400: one or more requested keys were rejected. Holds the response body.
    BadRequest(String),
    /// Anything else.
    OtherFailure { status: HttpStatusCode, body: String },
}

impl RetrievalResult {
    /// Classify a retrieve response by status code.
    ///
    /// Only a 200 body has to be JSON; failure bodies are kept as text.
    #[track_caller]
    pub fn classify(status: HttpStatusCode, body: String) -> Result<Self, ModelError> {
        match status {
            HttpStatusCode::OK => {
                let payload = serde_json::from_str(&body).map_err(|e| ModelError::Validation {
                    message: format!("Retrieve response is not valid JSON: {e}"),
                    location: ErrorLocation::from(Location::caller()),
                })?;
                Ok(RetrievalResult::Success(payload))
            }
            HttpStatusCode::BAD_REQUEST => Ok(RetrievalResult::BadRequest(body)),
            status => Ok(RetrievalResult::OtherFailure { status, body }),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, RetrievalResult::Success(_))
    }
}
