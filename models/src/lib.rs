//! Domain models for forecast environment provisioning.
//!
//! This crate contains pure data structures representing the core
//! concepts of a forecast run: the pinned dependencies it needs, the batch
//! of data requests it sends, and the classified answer it gets back.
//! Models do no I/O - they're just data that can be passed between layers.

pub mod dependency;
pub mod error;
pub mod request_batch;
pub mod retrieval;

pub use common::ErrorLocation;
pub use dependency::builder::DependencySpecBuilder;
pub use dependency::set::DependencySet;
pub use dependency::{DependencyRecord, DependencySpec};
pub use error::model_error::ModelError;
pub use request_batch::DataRequestBatch;
pub use retrieval::RetrievalResult;

#[cfg(test)]
mod tests;
