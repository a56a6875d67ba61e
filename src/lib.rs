//! healthflux library crate.
//!
//! Re-exports the importer modules so that integration tests can reach
//! them. The binary entry point is in `main.rs`.

pub mod cli;
pub mod core;
pub mod sink;
pub mod util;
