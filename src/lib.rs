//! htm-spatial-pooler - Hierarchical Temporal Memory spatial pooler
//!
//! A spatial pooler transforms a sparse binary encoder output into a
//! stable, sparse column activation pattern via competitive inhibition and
//! homeostatic Hebbian learning. It is the same cortical-language idea
//! this crate's lineage was built around: continuous or discrete signals
//! encoded into sparse distributed representations (SDRs), pooled through
//! learned synaptic permanences, and normalized back into an SDR on the
//! output side.
//!
//! # Architecture
//!
//! - [`sdr`]: the [`Sdr`] value type and its set-algebra (overlap, union,
//!   intersection, similarity measures).
//! - [`config`]: [`PoolerConfig`], the closed enumeration of every tunable
//!   parameter, plus named presets and capacity-estimation helpers.
//! - [`permanence`]: [`PermanenceMatrix`], the dense synapse-permanence
//!   matrix and its derived connected mask.
//! - [`inhibition`]: global and local k-winners-take-all column selection.
//! - [`learning`]: [`ColumnStats`], the per-column duty cycles, boost
//!   factors, and adaptive overlap thresholds.
//! - [`metrics`]: [`EngineMetrics`] and the [`PoolerObserver`] capability.
//! - [`pooling`]: the [`PoolingInput`]/[`PoolingResult`]/[`EncoderOutput`]
//!   schemas exchanged with the engine.
//! - [`engine`]: [`SpatialPooler`], the stateful engine tying the above
//!   together behind a single `process()` call.
//!
//! # Example
//!
//! ```
//! use htm_spatial_pooler::{EncoderOutput, PoolerConfig, PoolingInput, SpatialPooler};
//! use std::collections::HashMap;
//!
//! let mut pooler = SpatialPooler::new(PoolerConfig::standard()).unwrap();
//!
//! let input = PoolingInput {
//!     encoder_output: EncoderOutput::new(1024, (0..40).collect()),
//!     input_width: 1024,
//!     input_id: "example".to_string(),
//!     learning_enabled: true,
//!     metadata: HashMap::new(),
//! };
//!
//! let result = pooler.process(input).unwrap();
//! assert!(!result.active_columns.is_empty());
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod inhibition;
pub mod learning;
pub mod metrics;
pub mod permanence;
pub mod pooling;
pub mod sdr;

pub use config::{
    estimate_memory_bytes, estimate_processing_complexity, ComplexityEstimate, Mode, PoolerConfig,
    DETERMINISTIC_SEED,
};
pub use engine::SpatialPooler;
pub use error::{ConfigError, PoolerError, Result};
pub use inhibition::{apply_boost, global_kwta, global_kwta_with_tiebreak, local_kwta, NeighborhoodCache};
pub use learning::{ColumnStats, DUTY_CYCLE_ALPHA};
pub use metrics::{EngineMetrics, PoolerObserver};
pub use permanence::{PermanenceMatrix, CONNECTED_THRESHOLD};
pub use pooling::{EncoderOutput, PoolingInput, PoolingResult};
pub use sdr::{
    Sdr, HTM_COMPLIANCE_MAX_SPARSITY, HTM_COMPLIANCE_MIN_SPARSITY, POOLER_OUTPUT_MAX_SPARSITY,
    POOLER_OUTPUT_MIN_SPARSITY,
};

/// Crate version, re-exported from `Cargo.toml`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_re_exports_are_wired() {
        let pooler = SpatialPooler::new(PoolerConfig::standard()).unwrap();
        assert_eq!(pooler.input_width(), 1024);
        assert!(!VERSION.is_empty());
    }
}
