//! # Field Error Types
//!
//! All errors that can occur while building or driving a particle field.

use thiserror::Error;

/// Errors that can occur in the particle field.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FieldError {
    /// Invalid configuration file.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A sampling range is empty, negative or out of bounds.
    #[error("invalid range for {name}: [{min}, {max})")]
    InvalidRange {
        /// Which attribute the range belongs to.
        name: &'static str,
        /// Lower bound (inclusive).
        min: f32,
        /// Upper bound (exclusive).
        max: f32,
    },

    /// The container already holds its target count.
    #[error("container full: capacity {capacity}")]
    ContainerFull {
        /// Container capacity.
        capacity: usize,
    },

    /// The container has been detached from its page.
    #[error("container detached from page")]
    Detached,
}

/// Result type for field operations.
pub type FieldResult<T> = Result<T, FieldError>;
