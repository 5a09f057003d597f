//! # Runner Error Types

use backdrop_field::FieldError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while configuring or running a field.
#[derive(Error, Debug)]
pub enum AppError {
    /// A file could not be read or written.
    #[error("failed to access {}: {}", .path.display(), .source)]
    Io {
        /// The file involved.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML or has unknown keys.
    #[error("invalid config file: {0}")]
    Config(#[from] toml::de::Error),

    /// The field rejected its configuration.
    #[error(transparent)]
    Field(#[from] FieldError),

    /// Runner settings out of range.
    #[error("invalid runner settings: {0}")]
    InvalidRunner(String),

    /// Bad command line.
    #[error("invalid arguments: {0}")]
    Arguments(String),

    /// The runner thread panicked.
    #[error("runner thread panicked")]
    RunnerPanicked,
}

/// Result type for runner operations.
pub type AppResult<T> = Result<T, AppError>;
