//! Error types for the spatial pooler crate.
//!
//! This module provides a unified error type for all operations in the
//! crate, using the `thiserror` crate for ergonomic error handling.

use thiserror::Error;

/// Violated configuration constraint, one variant per field or cross-field
/// rule named in the configuration schema.
///
/// Kept separate from [`PoolerError`] so callers validating a configuration
/// (e.g. a UI form) can match on *which* field failed without parsing a
/// message string.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// `input_width` or `column_count` was zero.
    #[error("{field} must be > 0, got {value}")]
    NonPositiveDimension {
        /// Name of the offending field.
        field: &'static str,
        /// Value that was rejected.
        value: usize,
    },

    /// A ratio-like field fell outside its documented range.
    #[error("{field} must be in [{min}, {max}], got {value}")]
    OutOfRange {
        /// Name of the offending field.
        field: &'static str,
        /// Value that was rejected.
        value: f64,
        /// Lower bound of the valid range (inclusive).
        min: f64,
        /// Upper bound of the valid range (inclusive).
        max: f64,
    },

    /// `similar_input_min_overlap` did not exceed `different_input_max_overlap`.
    #[error(
        "similar_input_min_overlap ({similar}) must be > different_input_max_overlap ({different})"
    )]
    ThresholdOrdering {
        /// Configured `similar_input_min_overlap`.
        similar: f64,
        /// Configured `different_input_max_overlap`.
        different: f64,
    },

    /// Attempted to change a structural dimension via `update_config`.
    #[error("{field} is structural and cannot be changed after construction (was {old}, got {new})")]
    StructuralChange {
        /// Name of the offending field.
        field: &'static str,
        /// Value at construction time.
        old: usize,
        /// Value rejected by the update.
        new: usize,
    },
}

/// The main error type for spatial pooler operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PoolerError {
    /// Configuration failed validation at construction or update time.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The SDR constructor was given out-of-range or malformed active bits.
    #[error("invalid SDR: {0}")]
    InvalidSdr(String),

    /// Pooling input failed validation before any state mutation occurred.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A post-phase invariant was violated; indicates an internal bug.
    #[error("processing fault: {0}")]
    ProcessingFault(String),

    /// Dimension mismatch during permanence update; no partial mutation occurred.
    #[error("learning fault: expected dimension {expected}, got {actual}")]
    LearningFault {
        /// Expected vector/row length.
        expected: usize,
        /// Actual length encountered.
        actual: usize,
    },

    /// The engine has transitioned to `Faulted` and cannot process further input.
    #[error("engine is faulted: {0}")]
    Faulted(String),
}

/// A specialized `Result` type used throughout the crate.
pub type Result<T> = std::result::Result<T, PoolerError>;
