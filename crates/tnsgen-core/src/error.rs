//! Unified error types for tensor construction, packing, and interchange
//!
//! This module provides a centralized error handling system for the tnsgen
//! pipeline.
//!
//! # Design
//!
//! - **`TnsError`**: Top-level enum covering all error cases
//! - **`ParseError`**: User-facing failures while parsing dimension/format
//!   specs or `.tns` files (recoverable at the process-exit level)
//! - **`ConsistencyError`**: Internal invariant breaches that should never
//!   occur if the parser contracts hold (fatal, never produce an artifact)
//! - **I/O errors**: Propagated `std::io::Error` from file writing/reading
//!
//! # Examples
//!
//! ```
//! use tnsgen_core::error::{ConsistencyError, TnsError};
//!
//! fn validate_shape(shape: &[usize]) -> Result<(), TnsError> {
//!     if shape.is_empty() {
//!         return Err(ConsistencyError::EmptyShape.into());
//!     }
//!     if shape.contains(&0) {
//!         return Err(ConsistencyError::ZeroInShape.into());
//!     }
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// Top-level error type for the tnsgen pipeline
#[derive(Error, Debug)]
pub enum TnsError {
    /// Parse errors (dimension specs, format specs, `.tns` content)
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Internal invariant breaches
    #[error("Consistency error: {0}")]
    Consistency(#[from] ConsistencyError),

    /// File read/write failures
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Command slots that are accepted but carry no implementation
    #[error("Not implemented: {0}")]
    Unimplemented(&'static str),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

/// User-facing parse errors for text specs and interchange files
#[derive(Error, Debug, Clone)]
pub enum ParseError {
    #[error("Invalid dimension token {token:?}: {source}")]
    InvalidDimension {
        token: String,
        source: std::num::ParseIntError,
    },

    #[error("Extent at mode {mode} must be positive")]
    ZeroExtent { mode: usize },

    #[error("Unknown mode format token {token:?} (expected one of s, d, c, g)")]
    UnknownFormat { token: String },

    #[error("Rank mismatch: {dims} dimensions but {formats} mode formats")]
    RankMismatch { dims: usize, formats: usize },

    #[error("Density must be in (0, 1], got {value}")]
    InvalidDensity { value: f64 },

    #[error("Malformed .tns content: {reason}")]
    Malformed { reason: String },
}

/// Fatal internal-consistency errors
///
/// These indicate an invariant breach upstream of the failing component and
/// abort the pipeline rather than produce a malformed artifact.
#[derive(Error, Debug, Clone)]
pub enum ConsistencyError {
    #[error("Shape cannot be empty")]
    EmptyShape,

    #[error("Shape cannot contain zeros")]
    ZeroInShape,

    #[error("Shape and mode formats must have the same length: {shape} vs {formats}")]
    FormatCountMismatch { shape: usize, formats: usize },

    #[error("Index out of bounds: index {index:?} exceeds shape {shape:?}")]
    IndexOutOfBounds {
        index: Vec<usize>,
        shape: Vec<usize>,
    },

    #[error("Index rank mismatch: expected {expected} coordinates, got {got}")]
    IndexRankMismatch { expected: usize, got: usize },

    #[error("Indices and values must have same length: {indices} indices vs {values} values")]
    LengthMismatch { indices: usize, values: usize },

    #[error("Duplicate coordinate {index:?}")]
    DuplicateIndex { index: Vec<usize> },

    #[error("Singleton mode {mode} has more than one child under prefix {prefix:?}")]
    SingletonCardinality { mode: usize, prefix: Vec<usize> },

    #[error("Packed index arrays are inconsistent at level {level}: {reason}")]
    InvalidPackedIndex { level: usize, reason: String },
}

/// Result type alias for tnsgen operations
pub type TnsResult<T> = Result<T, TnsError>;

// Convenience constructors for common error patterns
impl TnsError {
    /// Create a malformed-content parse error with a message
    pub fn malformed(reason: impl Into<String>) -> Self {
        TnsError::Parse(ParseError::Malformed {
            reason: reason.into(),
        })
    }

    /// Create an index out of bounds error
    pub fn index_out_of_bounds(index: Vec<usize>, shape: Vec<usize>) -> Self {
        TnsError::Consistency(ConsistencyError::IndexOutOfBounds { index, shape })
    }

    /// Create a generic error with a message
    pub fn other(msg: impl Into<String>) -> Self {
        TnsError::Other(msg.into())
    }
}
