//! Integration tests for `Sdr` set algebra and similarity metrics.

use htm_spatial_pooler::Sdr;

#[test]
fn test_worked_overlap_example() {
    let a = Sdr::new(10, vec![1, 3, 5, 7]).unwrap();
    let b = Sdr::new(10, vec![3, 5, 9]).unwrap();

    assert_eq!(a.overlap(&b), 2);
    assert!((a.overlap_ratio(&b) - 2.0 / 3.0).abs() < 1e-12);
    assert!((a.jaccard(&b) - 2.0 / 5.0).abs() < 1e-12);
    assert!((a.cosine(&b) - 2.0 / 12.0_f64.sqrt()).abs() < 1e-12);
    assert_eq!(a.hamming(&b), 3);
}

#[test]
fn test_union_and_intersection_widths_must_match() {
    let a = Sdr::new(10, vec![1, 2, 3]).unwrap();
    let b = Sdr::new(5, vec![1]).unwrap();
    assert!(a.union(&b).is_err());
    assert!(a.intersection(&b).is_err());
}

#[test]
fn test_union_and_intersection_contents() {
    let a = Sdr::new(10, vec![1, 3, 5]).unwrap();
    let b = Sdr::new(10, vec![3, 5, 7]).unwrap();

    let union = a.union(&b).unwrap();
    assert_eq!(union.active_bits(), &[1, 3, 5, 7]);

    let intersection = a.intersection(&b).unwrap();
    assert_eq!(intersection.active_bits(), &[3, 5]);
}

#[test]
fn test_normalize_sparsity_downsamples() {
    let wide = Sdr::new(100, (0..40).collect()).unwrap();
    let normalized = wide.normalize_sparsity(20).unwrap();
    assert_eq!(normalized.num_active(), 20);
}

#[test]
fn test_normalize_sparsity_rejects_expansion() {
    let sparse = Sdr::new(100, vec![1, 2, 3]).unwrap();
    assert!(sparse.normalize_sparsity(10).is_err());
}

#[test]
fn test_rejects_out_of_range_bits() {
    assert!(Sdr::new(10, vec![10]).is_err());
}

#[test]
fn test_constructor_sorts_and_dedups() {
    let sdr = Sdr::new(10, vec![5, 1, 5, 3]).unwrap();
    assert_eq!(sdr.active_bits(), &[1, 3, 5]);
}

#[test]
fn test_display_shows_width_and_count() {
    let sdr = Sdr::new(10, vec![1, 2]).unwrap();
    let text = format!("{}", sdr);
    assert!(text.contains('2'));
    assert!(text.contains("10"));
}
