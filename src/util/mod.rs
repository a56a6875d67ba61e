//! Shared helpers: constants, the crate error type and timestamp parsing.

pub mod constants;
pub mod error;
pub mod time;
