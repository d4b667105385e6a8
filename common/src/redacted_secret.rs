//! Credential handling with redacted Debug/Display output.
//!
//! Used for the data-warehouse password, the bearer token returned by the
//! authenticate endpoint, and the personal access token used for cloning.

use crate::{ErrorLocation, RedactError};

use std::fmt;
use std::panic::Location;

use serde::ser::Error;
use zeroize::Zeroize;

/// Placeholder written wherever a secret would otherwise appear in text.
pub const REDACTED_PLACEHOLDER: &str = "[REDACTED]";

/// A secret string that never exposes its value in logs or debug output.
#[derive(Clone, PartialEq, Eq)]
pub struct RedactedSecret {
    inner: String,
}

impl RedactedSecret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            inner: secret.into(),
        }
    }

    /// Get the actual value for transmission.
    ///
    /// # Security Note
    /// Only call this when handing the secret to the server or to git.
    #[inline]
    pub fn expose(&self) -> &str {
        &self.inner
    }

    /// Get the secret length (safe to log).
    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Replace every occurrence of the secret in `text` with the placeholder.
    ///
    /// Used on subprocess output that may echo a credential-bearing URL back.
    pub fn scrub(&self, text: &str) -> String {
        if self.inner.is_empty() {
            return text.to_string();
        }
        text.replace(&self.inner, REDACTED_PLACEHOLDER)
    }
}

impl fmt::Debug for RedactedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RedactedSecret({REDACTED_PLACEHOLDER})")
    }
}

impl fmt::Display for RedactedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{REDACTED_PLACEHOLDER}")
    }
}

impl Drop for RedactedSecret {
    fn drop(&mut self) {
        self.inner.zeroize();
    }
}

// Prevent accidental serialization
impl serde::Serialize for RedactedSecret {
    #[track_caller]
    fn serialize<S>(&self, _serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        Err(S::Error::custom(RedactError::Serialization {
            message: String::from("RedactedSecret cannot be serialized - use expose() explicitly"),
            location: ErrorLocation::from(Location::caller()),
        }))
    }
}

impl<'de> serde::Deserialize<'de> for RedactedSecret {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        String::deserialize(deserializer).map(RedactedSecret::new)
    }
}
