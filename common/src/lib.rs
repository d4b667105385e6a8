//! Shared building blocks for the forecast environment workspace.
//!
//! Nothing in here knows about dependencies, forecasts or data warehouses.
//! It holds the small pieces every other crate leans on:
//!
//! - **ErrorLocation**: file/line/column captured at the point an error is built
//! - **RedactedSecret**: passwords and tokens that never reach logs
//! - **HttpStatusCode**: status classification without string parsing
//!
//! ## Architecture
//!
//! - **common** (this crate): Cross-cutting primitives
//! - **models**: Pure data structures
//! - **provision-core**: Business logic operating on models
//! - **forecast-env**: CLI wiring everything together

pub mod error;
pub mod http_status;
pub mod redacted_secret;

pub use error::error_location::ErrorLocation;
pub use error::redact_error::RedactError;
pub use http_status::HttpStatusCode;
pub use redacted_secret::RedactedSecret;

#[cfg(test)]
mod tests;
