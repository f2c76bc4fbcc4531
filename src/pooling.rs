//! Pooling input/result schemas exchanged with [`crate::SpatialPooler::process`].

use crate::error::{PoolerError, Result};
use crate::sdr::Sdr;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// An encoder's output: the width of its bit space and the sorted, unique
/// active-bit indices within it, plus the sparsity it was produced at
/// (redundant with `active_bits.len() / width`, carried across the wire so
/// the pooler doesn't have to recompute it to validate it).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncoderOutput {
    pub width: usize,
    pub active_bits: Vec<usize>,
    pub sparsity: f64,
}

impl EncoderOutput {
    /// Build an `EncoderOutput`, computing `sparsity` from `active_bits`.
    pub fn new(width: usize, active_bits: Vec<usize>) -> Self {
        let sparsity = if width == 0 {
            0.0
        } else {
            active_bits.len() as f64 / width as f64
        };
        Self {
            width,
            active_bits,
            sparsity,
        }
    }
}

/// Input to one `process()` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolingInput {
    pub encoder_output: EncoderOutput,
    pub input_width: usize,
    pub input_id: String,
    pub learning_enabled: bool,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl PoolingInput {
    /// Validate width agreement, a non-empty active set, in-range and
    /// sorted indices, and a non-empty `input_id`. Called at phase 1 of
    /// `process()`, before any state mutation.
    pub fn validate(&self, engine_input_width: usize) -> Result<()> {
        if self.input_id.is_empty() {
            return Err(PoolerError::InvalidInput(
                "input_id must be non-empty".to_string(),
            ));
        }
        if self.input_width != engine_input_width || self.encoder_output.width != engine_input_width
        {
            return Err(PoolerError::InvalidInput(format!(
                "width mismatch: engine expects {}, input_width={}, encoder_output.width={}",
                engine_input_width, self.input_width, self.encoder_output.width
            )));
        }
        if self.encoder_output.active_bits.is_empty() {
            return Err(PoolerError::InvalidInput(
                "encoder output must have active bits".to_string(),
            ));
        }
        if let Some(&bad) = self
            .encoder_output
            .active_bits
            .iter()
            .find(|&&b| b >= engine_input_width)
        {
            return Err(PoolerError::InvalidInput(format!(
                "active bit {} out of range for width {}",
                bad, engine_input_width
            )));
        }
        if !self
            .encoder_output
            .active_bits
            .windows(2)
            .all(|w| w[0] < w[1])
        {
            return Err(PoolerError::InvalidInput(
                "active bits must be sorted and unique".to_string(),
            ));
        }
        Ok(())
    }
}

/// Result of one `process()` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolingResult {
    pub normalized_sdr: Sdr,
    pub input_id: String,
    pub processing_time_ms: u64,
    pub active_columns: Vec<usize>,
    pub avg_overlap: f64,
    pub sparsity_level: f64,
    pub learning_occurred: bool,
    pub boosting_applied: bool,
    /// Soft `PerformanceWarning`: true iff `processing_time_ms` exceeded
    /// the configured `max_processing_time_ms`. Does not, by itself, make
    /// the call an error.
    pub performance_warning: bool,
}
