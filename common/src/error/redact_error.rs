use crate::ErrorLocation;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum RedactError {
    /// A secret reached a serializer. Secrets leave the process only through
    /// an explicit `expose()` call.
    #[error("Serialization Error: {message} {location}")]
    Serialization {
        message: String,
        location: ErrorLocation,
    },
}
