//! Configuration schema, validation, and capacity/complexity helpers.
//!
//! `PoolerConfig` replaces the free-form "config with custom params" map a
//! dynamically-typed implementation would reach for with a closed
//! enumeration of recognized fields (see the spec's REDESIGN FLAGS):
//! unknown fields are rejected by construction since there is no bag left
//! to put them in, and every named field is validated by [`PoolerConfig::validate`].

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;

/// Tie-breaking and RNG-seeding mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Fixed RNG seed (42); overlap ties break by ascending column index.
    Deterministic,
    /// RNG seeded from the clock; overlap ties break by an RNG draw.
    Randomized,
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Deterministic
    }
}

/// The fixed RNG seed used in [`Mode::Deterministic`].
pub const DETERMINISTIC_SEED: u64 = 42;

/// Spatial pooler configuration.
///
/// Structural fields (`input_width`, `column_count`) are fixed for the
/// lifetime of an engine; every other field may be changed in place via
/// [`crate::SpatialPooler::update_config`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolerConfig {
    /// Number of input bits the engine accepts. Structural.
    pub input_width: usize,
    /// Number of output columns. Structural.
    pub column_count: usize,

    /// Target fraction of columns active in the output, in `[0.02, 0.05]`.
    pub sparsity_ratio: f64,

    /// Tie-breaking / RNG-seeding mode.
    pub mode: Mode,

    /// Whether learning is enabled by default (ANDed with the per-call flag).
    pub learning_enabled: bool,
    /// Hebbian learning rate, in `[0, 1]`.
    pub learning_rate: f64,
    /// Boost-factor sensitivity, in `[0, 1]`.
    pub boost_strength: f64,
    /// Ceiling on `boost_factor`, in `[1, 10]`.
    pub max_boost: f64,

    /// 1-D inhibition neighborhood radius (columns on each side). `0` means
    /// each column's neighborhood is itself.
    pub inhibition_radius: usize,
    /// Target local activity density for local k-WTA, in `[0, 1]`.
    pub local_area_density: f64,
    /// Minimum raw overlap required for a column to be a candidate.
    pub min_overlap_threshold: usize,

    /// Soft processing-time budget in milliseconds.
    pub max_processing_time_ms: u64,

    /// Minimum input overlap above which outputs are expected to overlap
    /// at least this much too, in `[0.3, 0.7]`.
    pub similar_input_min_overlap: f64,
    /// Maximum input overlap below which outputs are expected to overlap
    /// at most this much, in `[0, 0.2]`.
    pub different_input_max_overlap: f64,

    /// How often (in learning calls) threshold adaptation runs. `1` means
    /// every call. See the Open Questions resolution in DESIGN.md.
    pub threshold_adapt_period: NonZeroU32,

    /// Homeostatic permanence rescaling rate; `0.0` disables it (the
    /// documented default — homeostatic scaling is off by default).
    pub plasticity_rate: f64,
}

impl PoolerConfig {
    /// Validate every field against its documented range and the
    /// cross-field threshold-ordering rule.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] encountered; fields are checked in
    /// declaration order.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.input_width == 0 {
            return Err(ConfigError::NonPositiveDimension {
                field: "input_width",
                value: self.input_width,
            });
        }
        if self.column_count == 0 {
            return Err(ConfigError::NonPositiveDimension {
                field: "column_count",
                value: self.column_count,
            });
        }

        check_range("sparsity_ratio", self.sparsity_ratio, 0.02, 0.05)?;
        check_range("learning_rate", self.learning_rate, 0.0, 1.0)?;
        check_range("boost_strength", self.boost_strength, 0.0, 1.0)?;
        check_range("max_boost", self.max_boost, 1.0, 10.0)?;
        check_range("local_area_density", self.local_area_density, 0.0, 1.0)?;
        check_range(
            "similar_input_min_overlap",
            self.similar_input_min_overlap,
            0.3,
            0.7,
        )?;
        check_range(
            "different_input_max_overlap",
            self.different_input_max_overlap,
            0.0,
            0.2,
        )?;

        if self.similar_input_min_overlap <= self.different_input_max_overlap {
            return Err(ConfigError::ThresholdOrdering {
                similar: self.similar_input_min_overlap,
                different: self.different_input_max_overlap,
            });
        }

        if self.min_overlap_threshold > self.input_width {
            return Err(ConfigError::OutOfRange {
                field: "min_overlap_threshold",
                value: self.min_overlap_threshold as f64,
                min: 0.0,
                max: self.input_width as f64,
            });
        }

        if self.plasticity_rate < 0.0 {
            return Err(ConfigError::OutOfRange {
                field: "plasticity_rate",
                value: self.plasticity_rate,
                min: 0.0,
                max: f64::INFINITY,
            });
        }

        Ok(())
    }

    /// Validate that `new` differs from `self` only in non-structural
    /// fields, for use by [`crate::SpatialPooler::update_config`].
    pub fn check_structural_unchanged(&self, new: &PoolerConfig) -> Result<(), ConfigError> {
        if self.input_width != new.input_width {
            return Err(ConfigError::StructuralChange {
                field: "input_width",
                old: self.input_width,
                new: new.input_width,
            });
        }
        if self.column_count != new.column_count {
            return Err(ConfigError::StructuralChange {
                field: "column_count",
                old: self.column_count,
                new: new.column_count,
            });
        }
        Ok(())
    }

    /// A small configuration suitable for unit tests and examples: 1024
    /// columns over a 256-bit input space at 2% sparsity.
    pub fn small() -> Self {
        Self {
            input_width: 256,
            column_count: 1024,
            ..Self::standard()
        }
    }

    /// The configuration implied by the worked examples of the spec:
    /// 2048 columns over a 1024-bit input space at 2% sparsity,
    /// deterministic mode.
    pub fn standard() -> Self {
        Self {
            input_width: 1024,
            column_count: 2048,
            sparsity_ratio: 0.02,
            mode: Mode::Deterministic,
            learning_enabled: true,
            learning_rate: 1.0,
            boost_strength: 0.0,
            max_boost: 3.0,
            inhibition_radius: 0,
            local_area_density: 0.02,
            min_overlap_threshold: 0,
            max_processing_time_ms: 50,
            similar_input_min_overlap: 0.5,
            different_input_max_overlap: 0.1,
            threshold_adapt_period: NonZeroU32::new(1).unwrap(),
            plasticity_rate: 0.0,
        }
    }

    /// A larger configuration for capacity/throughput experiments: 16384
    /// columns over an 8192-bit input space.
    pub fn large() -> Self {
        Self {
            input_width: 8192,
            column_count: 16384,
            ..Self::standard()
        }
    }
}

impl Default for PoolerConfig {
    fn default() -> Self {
        Self::standard()
    }
}

fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<(), ConfigError> {
    if value < min || value > max {
        return Err(ConfigError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}

/// Estimated dominant memory footprint in bytes: the permanence matrix `P`
/// plus the connected mask `C`, per §5 (`2 * column_count * input_width *
/// 8` for the `f64` permanence matrix; the connected mask is packed as
/// bits, not bytes, so it is cheap in comparison and folded into the
/// estimate as a fixed fraction).
pub fn estimate_memory_bytes(column_count: usize, input_width: usize) -> u64 {
    let permanence_bytes = (column_count as u64) * (input_width as u64) * 8;
    let connected_mask_bytes = (column_count as u64) * (input_width as u64).div_ceil(8);
    let per_column_vectors_bytes = (column_count as u64) * 4 * 8; // 4 f64-ish vectors
    permanence_bytes + connected_mask_bytes + per_column_vectors_bytes
}

/// A rough cost model for one `process()` call, dominated by the
/// column-by-input overlap pass and the inhibition sort.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComplexityEstimate {
    /// Multiply-accumulate operations in the overlap phase:
    /// `column_count * input_width`.
    pub overlap_ops: u64,
    /// Comparisons in the inhibition sort: `column_count * log2(column_count)`.
    pub inhibition_ops: u64,
}

/// Estimate the per-call cost of overlap computation and inhibition.
pub fn estimate_processing_complexity(
    column_count: usize,
    input_width: usize,
) -> ComplexityEstimate {
    let overlap_ops = column_count as u64 * input_width as u64;
    let log2_columns = (column_count.max(1) as f64).log2().ceil().max(1.0) as u64;
    let inhibition_ops = column_count as u64 * log2_columns;
    ComplexityEstimate {
        overlap_ops,
        inhibition_ops,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_config_is_valid() {
        assert!(PoolerConfig::standard().validate().is_ok());
    }

    #[test]
    fn test_small_and_large_presets_valid() {
        assert!(PoolerConfig::small().validate().is_ok());
        assert!(PoolerConfig::large().validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_dimensions() {
        let mut cfg = PoolerConfig::standard();
        cfg.input_width = 0;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::NonPositiveDimension { .. })
        ));
    }

    #[test]
    fn test_rejects_sparsity_out_of_range() {
        let mut cfg = PoolerConfig::standard();
        cfg.sparsity_ratio = 0.5;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::OutOfRange { field: "sparsity_ratio", .. })
        ));
    }

    #[test]
    fn test_rejects_threshold_ordering_violation() {
        let mut cfg = PoolerConfig::standard();
        cfg.similar_input_min_overlap = 0.3;
        cfg.different_input_max_overlap = 0.4;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::ThresholdOrdering { .. })
        ));
    }

    #[test]
    fn test_structural_change_rejected() {
        let cfg = PoolerConfig::standard();
        let mut new_cfg = cfg.clone();
        new_cfg.column_count += 1;
        assert!(matches!(
            cfg.check_structural_unchanged(&new_cfg),
            Err(ConfigError::StructuralChange { .. })
        ));
    }

    #[test]
    fn test_non_structural_change_accepted() {
        let cfg = PoolerConfig::standard();
        let mut new_cfg = cfg.clone();
        new_cfg.learning_rate = 0.5;
        assert!(cfg.check_structural_unchanged(&new_cfg).is_ok());
    }

    #[test]
    fn test_memory_estimate_matches_formula() {
        let bytes = estimate_memory_bytes(2048, 1024);
        // Dominant term per the spec's worked example: ~33 MB at 2048x1024.
        assert!(bytes > 33_000_000 && bytes < 34_000_000);
    }

    #[test]
    fn test_complexity_estimate_scales() {
        let small = estimate_processing_complexity(1024, 512);
        let large = estimate_processing_complexity(2048, 1024);
        assert!(large.overlap_ops > small.overlap_ops);
    }

    #[test]
    fn test_serde_round_trip() {
        let cfg = PoolerConfig::standard();
        let json = serde_json::to_string(&cfg).unwrap();
        let restored: PoolerConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(cfg, restored);
    }
}
