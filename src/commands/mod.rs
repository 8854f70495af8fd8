//! CLI command implementations.

pub mod config;
pub mod merge;
pub mod parse;
pub mod sources;
