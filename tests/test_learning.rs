//! Integration tests for homeostatic learning state.

use htm_spatial_pooler::{ColumnStats, PermanenceMatrix};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn test_permanence_learn_then_overlap_increases_for_repeated_input() {
    let mut rng = StdRng::seed_from_u64(1);
    let mut matrix = PermanenceMatrix::init(4, 16, &mut rng);
    let active_bits: Vec<usize> = (0..8).collect();

    let before = matrix.overlap(0, &active_bits);
    for _ in 0..10 {
        matrix.learn(0, &active_bits, 1.0);
    }
    let after = matrix.overlap(0, &active_bits);

    assert!(after >= before);
    assert!(matrix.all_in_unit_range());
    assert!(matrix.connected_mask_consistent());
}

#[test]
fn test_duty_cycles_and_boost_factors_track_activity() {
    let mut stats = ColumnStats::new(4, 0);

    for _ in 0..200 {
        stats.update_duty_cycles(&[0], &[5.0, 0.0, 0.0, 0.0]);
    }
    stats.recompute_boost_factors(0.02, 0.5, 3.0);

    // Column 0 is active every call, so its duty cycle settles near 1 and
    // its boost factor should be driven toward the floor.
    assert!(stats.active_duty_cycle[0] > 0.9);
    assert!(stats.boost_factor[0] < stats.boost_factor[1]);
    // Never-active columns get the ceiling.
    assert_eq!(stats.boost_factor[1], 3.0);
}

#[test]
fn test_threshold_adaptation_tracks_overlap_duty_cycle() {
    let mut stats = ColumnStats::new(1, 5);
    for _ in 0..5 {
        stats.overlap_duty_cycle[0] = 0.001;
        stats.maybe_adapt_thresholds(0.05, 1);
    }
    assert!(stats.min_overlap_threshold[0] < 5);
}
