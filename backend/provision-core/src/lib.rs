//! Provisioning of a forecast-run workspace.
//!
//! Turns a declarative `config.json` into a ready-to-run directory: pinned
//! dependency repositories, the scripting environment copied to the root,
//! and the input data retrieved from the data warehouse.
//!
//! [`pipeline::run`] drives the phases; each phase is usable on its own.

pub mod assembler;
pub mod config;
pub mod data_warehouse;
pub mod error;
pub mod installer;
pub mod output;
pub mod pipeline;
pub mod request;
pub mod vcs;

#[cfg(test)]
mod tests;
