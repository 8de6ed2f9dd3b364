//! Error types for the lowpoly pipeline

use thiserror::Error;

/// Main error type for lowpoly operations
#[derive(Error, Debug)]
pub enum Error {
    /// A merge input lacks a required vertex attribute or its component
    /// arity/length disagrees with the position attribute.
    #[error("attribute mismatch: {0}")]
    AttributeMismatch(String),

    /// A decimation request would drive the triangle count below zero.
    #[error("invalid decimation target: requested removal of {requested} faces but only {available} exist")]
    InvalidTarget { requested: usize, available: usize },

    /// The single-step simplifier produced degenerate results too many times
    /// in a row and the decimation loop cannot make progress.
    #[error("simplification stalled after {0} consecutive degenerate steps")]
    SimplificationStalled(usize),

    /// The mesh has zero (or non-finite) vertical extent, so a height-based
    /// rescale would produce an infinite or NaN scale factor.
    #[error("mesh has zero vertical extent")]
    ZeroExtent,

    /// A progress callback requested cancellation.
    #[error("operation cancelled by progress callback")]
    Cancelled,

    /// Structurally invalid mesh data (out-of-range index, ragged arrays).
    #[error("invalid mesh data: {0}")]
    InvalidData(String),
}

/// Result type alias for lowpoly operations
pub type Result<T> = std::result::Result<T, Error>;
