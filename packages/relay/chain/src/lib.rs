//! Chain plumbing for the header relay bot: the source chain client, the
//! destination bridge client, and the `ChainApi` implementation over them.

#![deny(
    clippy::nursery,
    clippy::pedantic,
    warnings,
    missing_docs,
    unused_crate_dependencies
)]

pub mod api;
pub mod bridge;
pub mod config;
pub mod error;
pub mod keyring;
pub mod source;
