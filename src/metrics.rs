//! Per-engine metrics aggregate and the observer-sink capability.
//!
//! Per the spec's REDESIGN FLAGS, dynamic-dispatch observer *lists* are
//! replaced with a single closed capability, [`PoolerObserver`], with a
//! default no-op for every hook so a sink only overrides what it cares
//! about. Notification is synchronous, from within the same call that
//! mutates engine state — sinks must not re-enter the engine.

use crate::config::PoolerConfig;
use crate::error::PoolerError;
use crate::sdr::Sdr;

/// Snapshot of accumulated engine metrics. Returned by value from
/// `get_metrics()` so callers cannot observe (or race) the engine's live
/// counters.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EngineMetrics {
    /// Total `process()` calls since construction or the last `reset_metrics()`.
    pub total_calls: u64,
    /// Calls where learning actually ran.
    pub learning_calls: u64,
    /// Calls that completed successfully but produced a degenerate result
    /// (sparsity outside `[POOLER_OUTPUT_MIN_SPARSITY, POOLER_OUTPUT_MAX_SPARSITY]`,
    /// most commonly an empty winner set). A valid outcome, not an error —
    /// see the Open Questions resolution in DESIGN.md.
    pub fault_count: u64,
    /// Calls whose `processing_time_ms` exceeded `max_processing_time_ms`.
    pub performance_warning_count: u64,
    /// Sum of `processing_time_ms` across all calls (for computing an average).
    pub total_processing_time_ms: u64,
    /// `processing_time_ms` of the most recent call.
    pub last_processing_time_ms: u64,
    /// `sparsity_level` of the most recent successful result.
    pub last_sparsity_level: f64,
    /// `avg_overlap` of the most recent successful result.
    pub last_avg_overlap: f64,
}

impl EngineMetrics {
    /// Mean `processing_time_ms` across all recorded calls, or `0.0` if none
    /// have been recorded.
    pub fn mean_processing_time_ms(&self) -> f64 {
        if self.total_calls == 0 {
            0.0
        } else {
            self.total_processing_time_ms as f64 / self.total_calls as f64
        }
    }

    pub(crate) fn record_call(
        &mut self,
        learning_occurred: bool,
        processing_time_ms: u64,
        max_processing_time_ms: u64,
        degenerate: bool,
        sparsity_level: f64,
        avg_overlap: f64,
    ) {
        self.total_calls += 1;
        if learning_occurred {
            self.learning_calls += 1;
        }
        if degenerate {
            self.fault_count += 1;
        }
        if processing_time_ms > max_processing_time_ms {
            self.performance_warning_count += 1;
        }
        self.total_processing_time_ms += processing_time_ms;
        self.last_processing_time_ms = processing_time_ms;
        self.last_sparsity_level = sparsity_level;
        self.last_avg_overlap = avg_overlap;
    }
}

/// Observer capability for engine lifecycle events.
///
/// Every method has a no-op default; implement only the hooks a given sink
/// cares about. All hooks fire synchronously inside the engine's
/// single-threaded call path — a sink must not call back into the engine
/// that invoked it.
pub trait PoolerObserver {
    /// Fired at the start of `process()`, before any state mutation.
    fn on_started(&mut self, _input_id: &str) {}

    /// Fired after a successful `process()` call with the emitted result.
    fn on_completed(&mut self, _input_id: &str, _result_sdr: &Sdr) {}

    /// Fired when `process()` returns an error.
    fn on_failed(&mut self, _input_id: &str, _error: &PoolerError) {}

    /// Fired after a successful `update_config()` call.
    fn on_config_changed(&mut self, _new_config: &PoolerConfig) {}

    /// Fired after metrics are updated at the end of `process()`.
    fn on_metrics_updated(&mut self, _metrics: &EngineMetrics) {}
}
