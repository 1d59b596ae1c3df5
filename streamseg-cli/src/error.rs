//! Error handling for the CLI application

use std::fmt;

/// CLI-specific failures that are not plain I/O
#[derive(Debug)]
pub enum CliError {
    /// Chunk size must be positive
    InvalidChunkSize(usize),
    /// More than one input refers to stdin
    DuplicateStdin,
    /// Configuration error
    ConfigError(String),
    /// A stream stopped with an error
    SegmentationFailed { source: String, reason: String },
    /// Validation found a problem
    ValidationFailed(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::InvalidChunkSize(size) => {
                write!(f, "Invalid chunk size: {size} (must be at least 1)")
            }
            CliError::DuplicateStdin => write!(f, "Standard input ('-') can only be read once"),
            CliError::ConfigError(msg) => write!(f, "Configuration error: {msg}"),
            CliError::SegmentationFailed { source, reason } => {
                write!(f, "Segmentation of {source} failed: {reason}")
            }
            CliError::ValidationFailed(msg) => write!(f, "Validation failed: {msg}"),
        }
    }
}

impl std::error::Error for CliError {}

/// Result type alias for CLI operations
pub type CliResult<T> = Result<T, anyhow::Error>;
