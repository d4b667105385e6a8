mod assembler;
mod config;
mod credentials;
mod data_warehouse;
mod error;
mod installer;
mod output;
mod pipeline;
mod request;
mod support;
mod vcs;
