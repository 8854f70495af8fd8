//! Error types for rulemerge.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MergeError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("File system error: {0}")]
    FileSystem(String),

    #[error("Only {count} rules merged (minimum {minimum}), output not written")]
    BelowFloor { count: usize, minimum: usize },

    #[error("Another run holds the lock on {0:?}")]
    Locked(PathBuf),
}
