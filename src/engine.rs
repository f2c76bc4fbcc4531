//! The spatial pooler engine: owns the mutable learning state and
//! orchestrates one `encode -> overlap -> boost -> inhibit -> learn -> emit`
//! pass per `process()` call.

use crate::config::{Mode, PoolerConfig, DETERMINISTIC_SEED};
use crate::error::{PoolerError, Result};
use crate::inhibition::{apply_boost, global_kwta, global_kwta_with_tiebreak};
use crate::learning::ColumnStats;
use crate::metrics::{EngineMetrics, PoolerObserver};
use crate::permanence::PermanenceMatrix;
use crate::pooling::{PoolingInput, PoolingResult};
use crate::sdr::Sdr;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::{Instant, SystemTime, UNIX_EPOCH};
use tracing::{debug, error, info_span};

/// Lifecycle state of an engine instance: `Uninitialized -> Ready <->
/// Processing`, with `Ready -> Faulted` on an unrecoverable internal
/// invariant violation.
#[derive(Debug, Clone, PartialEq)]
enum EngineState {
    Ready,
    Processing,
    Faulted(String),
}

/// The spatial pooler engine.
///
/// Owns the permanence matrix `P`, its derived connected mask `C`, every
/// per-column homeostatic vector, the RNG, the iteration counter, and the
/// metrics aggregate. The spec places the cross-call mutual-exclusion lock
/// in the surrounding service, out of scope here — `process()` takes
/// `&mut self` and callers are responsible for not calling it concurrently.
pub struct SpatialPooler {
    config: PoolerConfig,
    state: EngineState,
    permanence: PermanenceMatrix,
    stats: ColumnStats,
    rng: StdRng,
    metrics: EngineMetrics,
    observers: Vec<Box<dyn PoolerObserver>>,
    iteration: u64,
}

impl SpatialPooler {
    /// Construct a new engine: validates `config`, seeds the RNG per
    /// [`Mode`], draws permanences from `uniform(0.4, 0.6)`, and derives the
    /// connected mask. All per-column vectors start at their documented
    /// defaults (see §4.4 of the spec).
    pub fn new(config: PoolerConfig) -> Result<Self> {
        config.validate()?;

        let mut rng = match config.mode {
            Mode::Deterministic => StdRng::seed_from_u64(DETERMINISTIC_SEED),
            Mode::Randomized => {
                let seed = SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .map(|d| d.as_nanos() as u64)
                    .unwrap_or(0);
                StdRng::seed_from_u64(seed)
            }
        };

        let permanence = PermanenceMatrix::init(config.column_count, config.input_width, &mut rng);
        let stats = ColumnStats::new(config.column_count, config.min_overlap_threshold);

        Ok(Self {
            config,
            state: EngineState::Ready,
            permanence,
            stats,
            rng,
            metrics: EngineMetrics::default(),
            observers: Vec::new(),
            iteration: 0,
        })
    }

    /// Register an observer sink. Hooks fire synchronously from within
    /// `process()`/`update_config()`; a sink must not call back into this
    /// engine.
    pub fn add_observer(&mut self, observer: Box<dyn PoolerObserver>) {
        self.observers.push(observer);
    }

    /// Configured input width (structural, fixed for the engine's lifetime).
    pub fn input_width(&self) -> usize {
        self.config.input_width
    }

    /// Configured column count (structural, fixed for the engine's lifetime).
    pub fn column_count(&self) -> usize {
        self.config.column_count
    }

    /// Number of calls that actually ran learning, since construction.
    pub fn iteration(&self) -> u64 {
        self.iteration
    }

    /// Defensive copy of the current configuration.
    pub fn get_config(&self) -> PoolerConfig {
        self.config.clone()
    }

    /// Apply a non-structural configuration change in place.
    ///
    /// # Errors
    ///
    /// Returns [`PoolerError::Config`] if `new_config` fails validation or
    /// changes `input_width`/`column_count`.
    pub fn update_config(&mut self, new_config: PoolerConfig) -> Result<()> {
        new_config.validate()?;
        self.config.check_structural_unchanged(&new_config)?;

        self.config = new_config;

        for observer in self.observers.iter_mut() {
            observer.on_config_changed(&self.config);
        }
        Ok(())
    }

    /// Defensive copy of accumulated metrics.
    pub fn get_metrics(&self) -> EngineMetrics {
        self.metrics
    }

    /// Reset accumulated metrics to zero.
    pub fn reset_metrics(&mut self) {
        self.metrics = EngineMetrics::default();
    }

    /// Returns `Ok(())` if the engine is not `Faulted`.
    pub fn health_check(&self) -> Result<()> {
        match &self.state {
            EngineState::Faulted(reason) => Err(PoolerError::Faulted(reason.clone())),
            _ => Ok(()),
        }
    }

    /// Run one `encode -> overlap -> boost -> inhibit -> learn -> emit` pass.
    ///
    /// Validation failures (phase 1) abort before any state mutation. A
    /// post-phase invariant violation (phase 8) transitions the engine to
    /// `Faulted` and returns [`PoolerError::ProcessingFault`]; everything
    /// else returns `Ok` with the result's `performance_warning` field set
    /// when the soft time budget was exceeded.
    pub fn process(&mut self, input: PoolingInput) -> Result<PoolingResult> {
        let span = info_span!("spatial_pooler.process", input_id = %input.input_id);
        let _enter = span.enter();

        self.health_check()?;

        for observer in self.observers.iter_mut() {
            observer.on_started(&input.input_id);
        }

        let started = Instant::now();

        let outcome = self.process_inner(&input, started);

        match &outcome {
            Ok(result) => {
                for observer in self.observers.iter_mut() {
                    observer.on_completed(&input.input_id, &result.normalized_sdr);
                    observer.on_metrics_updated(&self.metrics);
                }
            }
            Err(err) => {
                for observer in self.observers.iter_mut() {
                    observer.on_failed(&input.input_id, err);
                }
            }
        }

        outcome
    }

    fn process_inner(&mut self, input: &PoolingInput, started: Instant) -> Result<PoolingResult> {
        // Phase 1: validate (no mutation before this point).
        input.validate(self.config.input_width)?;
        debug!(phase = "validate", input_width = self.config.input_width, "validated pooling input");

        self.state = EngineState::Processing;

        // Phase 2/3: densify is implicit — overlap is computed directly
        // against the sparse active-bit list, which is equivalent to a
        // matrix-vector product against a densified 0/1 input vector.
        let active_bits = &input.encoder_output.active_bits;
        let column_count = self.config.column_count;

        let mut raw_overlap = vec![0.0f64; column_count];
        for c in 0..column_count {
            let raw = self.permanence.overlap(c, active_bits) as f64;
            raw_overlap[c] = if raw < self.stats.min_overlap_threshold[c] as f64 {
                0.0
            } else {
                raw
            };
        }
        debug!(phase = "overlap", column_count, "computed per-column overlap");

        // Phase 4: boost.
        let learning_this_call = self.config.learning_enabled && input.learning_enabled;
        let boosting_applied = learning_this_call && self.config.boost_strength > 0.0;
        let mut boosted_overlap = raw_overlap.clone();
        if boosting_applied {
            apply_boost(&mut boosted_overlap, &self.stats.boost_factor);
        }
        debug!(phase = "boost", boosting_applied, "applied boost factors");

        // Phase 5: inhibit.
        let active_columns = match self.config.mode {
            Mode::Deterministic => global_kwta(&boosted_overlap, self.config.sparsity_ratio),
            Mode::Randomized => {
                let tiebreak: Vec<f64> = (0..column_count)
                    .map(|_| self.rng.gen::<f64>())
                    .collect();
                global_kwta_with_tiebreak(&boosted_overlap, self.config.sparsity_ratio, &tiebreak)
            }
        };
        debug!(phase = "inhibit", winners = active_columns.len(), "selected winning columns");

        // Phase 6: learn.
        if learning_this_call {
            for &c in &active_columns {
                self.permanence.learn(c, active_bits, self.config.learning_rate);
            }

            self.stats.update_duty_cycles(&active_columns, &raw_overlap);

            let target = homeostatic_target(&self.config);
            self.stats
                .recompute_boost_factors(target, self.config.boost_strength, self.config.max_boost);
            self.stats
                .maybe_adapt_thresholds(target, self.config.threshold_adapt_period.get());

            if self.config.plasticity_rate > 0.0 {
                for c in 0..column_count {
                    let factor =
                        self.stats
                            .homeostatic_scale_factor(c, target, self.config.plasticity_rate);
                    self.permanence.homeostatic_scale(c, factor);
                }
            }

            self.iteration += 1;
            debug!(phase = "learn", iteration = self.iteration, "applied Hebbian update and homeostasis");
        }

        // Phase 7: emit.
        let normalized_sdr = Sdr::new(column_count, active_columns.clone())?;
        let avg_overlap = if active_columns.is_empty() {
            0.0
        } else {
            active_columns.iter().map(|&c| raw_overlap[c]).sum::<f64>() / active_columns.len() as f64
        };
        let sparsity_level = normalized_sdr.sparsity();
        let processing_time_ms = started.elapsed().as_millis() as u64;
        let performance_warning = processing_time_ms > self.config.max_processing_time_ms;
        debug!(phase = "emit", sparsity_level, processing_time_ms, "emitted pooling result");

        // Phase 8: post-validate.
        let ascending = active_columns.windows(2).all(|w| w[0] < w[1]);
        if !ascending {
            let reason = "active columns not strictly ascending".to_string();
            error!(phase = "post_validate", %reason, "engine transitioned to Faulted");
            self.state = EngineState::Faulted(reason.clone());
            return Err(PoolerError::ProcessingFault(reason));
        }
        if !self.permanence.connected_mask_consistent() || !self.permanence.all_in_unit_range() {
            let reason = "permanence/connected-mask invariant violated".to_string();
            error!(phase = "post_validate", %reason, "engine transitioned to Faulted");
            self.state = EngineState::Faulted(reason.clone());
            return Err(PoolerError::ProcessingFault(reason));
        }

        // A degenerate (empty or under-band) result is a valid outcome, not
        // an error — see the Open Questions resolution in DESIGN.md. It is
        // still recorded as a soft fault in the metrics.
        let degenerate = !(crate::sdr::POOLER_OUTPUT_MIN_SPARSITY..=crate::sdr::POOLER_OUTPUT_MAX_SPARSITY)
            .contains(&sparsity_level);

        self.metrics.record_call(
            learning_this_call,
            processing_time_ms,
            self.config.max_processing_time_ms,
            degenerate,
            sparsity_level,
            avg_overlap,
        );

        self.state = EngineState::Ready;

        Ok(PoolingResult {
            normalized_sdr,
            input_id: input.input_id.clone(),
            processing_time_ms,
            active_columns,
            avg_overlap,
            sparsity_level,
            learning_occurred: learning_this_call,
            boosting_applied,
            performance_warning,
        })
    }
}

/// The homeostatic target `T` used by both boost recomputation and
/// threshold adaptation: `local_area_density` if set, else
/// `sparsity_ratio` (the same fallback [`crate::inhibition::local_kwta`]
/// uses).
fn homeostatic_target(config: &PoolerConfig) -> f64 {
    if config.local_area_density > 0.0 {
        config.local_area_density
    } else {
        config.sparsity_ratio
    }
}
