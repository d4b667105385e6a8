//! HTTP status code utilities for response classification.

/// HTTP status code for error categorization.
///
/// Stored directly rather than parsed from error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpStatusCode(pub u16);

impl HttpStatusCode {
    pub const OK: HttpStatusCode = HttpStatusCode(200);
    pub const BAD_REQUEST: HttpStatusCode = HttpStatusCode(400);

    /// Any 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.0)
    }
}

impl From<u16> for HttpStatusCode {
    fn from(code: u16) -> Self {
        HttpStatusCode(code)
    }
}

impl std::fmt::Display for HttpStatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
