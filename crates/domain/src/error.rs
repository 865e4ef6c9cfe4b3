//! Unified error types for the domain layer
//!
//! Provides a common error type for value-object validation and path
//! encoding, so adapters never have to fall back to String or anyhow.

use thiserror::Error;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Validation failed (e.g., invalid field values)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Invalid ID format
    #[error("Invalid ID format: {0}")]
    InvalidId(String),

    /// Materialized path invariant violated
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Ancestor requested below the end of a path
    #[error("Depth {depth} out of range for path of length {len}")]
    DepthOutOfRange { depth: usize, len: usize },

    /// Parse error (for value objects)
    #[error("Parse error: {0}")]
    Parse(String),
}

impl DomainError {
    /// Creates a validation error for business rule violations.
    ///
    /// Use this when a value object cannot be constructed from its input:
    /// - Required fields are empty or missing
    /// - Values are outside allowed lengths
    /// - Values contain characters the type does not allow
    ///
    /// # Example
    /// ```ignore
    /// if name.is_empty() {
    ///     return Err(DomainError::validation("Node name cannot be empty"));
    /// }
    /// ```
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create an invalid ID error
    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    /// Create an invalid path error
    pub fn invalid_path(msg: impl Into<String>) -> Self {
        Self::InvalidPath(msg.into())
    }

    /// Create a depth out of range error
    pub fn depth_out_of_range(depth: usize, len: usize) -> Self {
        Self::DepthOutOfRange { depth, len }
    }

    /// Creates a parse error for string-to-type conversion failures.
    ///
    /// # Example
    /// ```ignore
    /// impl FromStr for ShortfallPolicy {
    ///     type Err = DomainError;
    ///     fn from_str(s: &str) -> Result<Self, Self::Err> {
    ///         match s {
    ///             "shallowest" => Ok(Self::ShallowestAvailable),
    ///             _ => Err(DomainError::parse(format!("Unknown shortfall policy: {}", s))),
    ///         }
    ///     }
    /// }
    /// ```
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }
}
