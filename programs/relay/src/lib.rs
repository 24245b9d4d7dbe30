//! The header relay bot binary.

#![deny(
    clippy::nursery,
    clippy::pedantic,
    warnings,
    missing_docs,
    unused_crate_dependencies
)]

pub mod cli;

// Binary-only dependencies, referenced so the lint sees them.
use anyhow as _;
use header_relay_chain as _;
use header_relay_core as _;
use serde_json as _;
use tokio as _;
use tracing as _;
use tracing_subscriber as _;

#[cfg(test)]
use tempfile as _;
