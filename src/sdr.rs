//! SDR - Sparse Distributed Representation with set algebra and similarity metrics.
//!
//! This module provides the [`Sdr`] type: an immutable-by-convention sparse
//! bit set represented as a sorted, deduplicated list of active indices
//! rather than a dense bit array. Two sparse SDRs of width 2048 at 2%
//! sparsity hold 40 `usize`s apiece instead of 2048 bits, and every set
//! operation below runs as a single linear merge over the two sorted lists
//! (the same two-pointer technique `BitField`'s word-level AND/OR uses at
//! the word granularity, here applied at the index granularity).
//!
//! # Examples
//!
//! ```
//! use htm_spatial_pooler::Sdr;
//!
//! let a = Sdr::new(10, vec![1, 3, 5, 7]).unwrap();
//! let b = Sdr::new(10, vec![3, 5, 9]).unwrap();
//!
//! assert_eq!(a.overlap(&b), 2);
//! assert_eq!(a.jaccard(&b), 2.0 / 5.0);
//! ```

use crate::error::{PoolerError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// HTM-compliance sparsity band: any SDR meant to be consumed by downstream
/// HTM machinery should fall within `[0.01, 0.10]`.
pub const HTM_COMPLIANCE_MIN_SPARSITY: f64 = 0.01;
/// See [`HTM_COMPLIANCE_MIN_SPARSITY`].
pub const HTM_COMPLIANCE_MAX_SPARSITY: f64 = 0.10;

/// Spatial-pooler-output sparsity band: the [`Sdr`] a [`crate::SpatialPooler`]
/// emits must fall within `[0.02, 0.05]`.
pub const POOLER_OUTPUT_MIN_SPARSITY: f64 = 0.02;
/// See [`POOLER_OUTPUT_MIN_SPARSITY`].
pub const POOLER_OUTPUT_MAX_SPARSITY: f64 = 0.05;

/// A Sparse Distributed Representation: `width` total bits, with
/// `active_bits` holding the strictly ascending, duplicate-free indices of
/// the bits that are set.
///
/// `Sdr` is a value type. Every operation that would "mutate" an SDR
/// (`union`, `intersection`, `normalize_sparsity`) instead returns a new
/// one; there is no in-place mutator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sdr {
    width: usize,
    active_bits: Vec<usize>,
}

impl Sdr {
    /// Construct an SDR, validating that every index is in `[0, width)`,
    /// then sorting and deduplicating.
    ///
    /// # Errors
    ///
    /// Returns [`PoolerError::InvalidSdr`] if `width == 0` or any index is
    /// `>= width`.
    ///
    /// # Examples
    ///
    /// ```
    /// use htm_spatial_pooler::Sdr;
    ///
    /// let sdr = Sdr::new(8, vec![5, 1, 1, 3]).unwrap();
    /// assert_eq!(sdr.active_bits(), &[1, 3, 5]);
    /// ```
    pub fn new(width: usize, mut active_bits: Vec<usize>) -> Result<Self> {
        if width == 0 {
            return Err(PoolerError::InvalidSdr("width must be > 0".to_string()));
        }
        if let Some(&bad) = active_bits.iter().find(|&&b| b >= width) {
            return Err(PoolerError::InvalidSdr(format!(
                "active bit {} out of range for width {}",
                bad, width
            )));
        }

        active_bits.sort_unstable();
        active_bits.dedup();

        Ok(Self { width, active_bits })
    }

    /// Construct an empty SDR of the given width (no active bits).
    pub fn empty(width: usize) -> Result<Self> {
        Self::new(width, Vec::new())
    }

    /// Total bit count.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Sorted, deduplicated active-bit indices.
    #[inline]
    pub fn active_bits(&self) -> &[usize] {
        &self.active_bits
    }

    /// Number of active bits.
    #[inline]
    pub fn num_active(&self) -> usize {
        self.active_bits.len()
    }

    /// `|active_bits| / width`.
    #[inline]
    pub fn sparsity(&self) -> f64 {
        self.active_bits.len() as f64 / self.width as f64
    }

    /// Alias of [`Sdr::sparsity`] for call sites that think in terms of
    /// "how full" rather than "what fraction is active."
    #[inline]
    pub fn density(&self) -> f64 {
        self.sparsity()
    }

    /// Whether `sparsity()` falls within the HTM-compliance band
    /// `[0.01, 0.10]`.
    pub fn is_htm_compliant(&self) -> bool {
        let s = self.sparsity();
        (HTM_COMPLIANCE_MIN_SPARSITY..=HTM_COMPLIANCE_MAX_SPARSITY).contains(&s)
    }

    /// Whether `sparsity()` falls within the spatial-pooler output band
    /// `[0.02, 0.05]`.
    pub fn is_pooler_output_compliant(&self) -> bool {
        let s = self.sparsity();
        (POOLER_OUTPUT_MIN_SPARSITY..=POOLER_OUTPUT_MAX_SPARSITY).contains(&s)
    }

    /// Binary search for whether bit `i` is active.
    pub fn is_active(&self, i: usize) -> bool {
        self.active_bits.binary_search(&i).is_ok()
    }

    /// Count of shared active indices, via a two-pointer merge over the
    /// sorted lists. Returns 0 if the widths differ.
    pub fn overlap(&self, other: &Sdr) -> usize {
        if self.width != other.width {
            return 0;
        }
        merge_count(&self.active_bits, &other.active_bits)
    }

    /// `overlap / min(|a.active|, |b.active|)`; 0 if either side is empty.
    pub fn overlap_ratio(&self, other: &Sdr) -> f64 {
        let denom = self.num_active().min(other.num_active());
        if denom == 0 {
            return 0.0;
        }
        self.overlap(other) as f64 / denom as f64
    }

    /// `overlap / (|a| + |b| - overlap)`; 1 if both are empty.
    pub fn jaccard(&self, other: &Sdr) -> f64 {
        let ov = self.overlap(other);
        let denom = self.num_active() + other.num_active() - ov;
        if denom == 0 {
            return 1.0;
        }
        ov as f64 / denom as f64
    }

    /// `overlap / sqrt(|a| * |b|)` (cosine similarity of the binary vectors).
    pub fn cosine(&self, other: &Sdr) -> f64 {
        let denom = (self.num_active() as f64 * other.num_active() as f64).sqrt();
        if denom == 0.0 {
            return 0.0;
        }
        self.overlap(other) as f64 / denom
    }

    /// `|a| + |b| - 2*overlap`.
    pub fn hamming(&self, other: &Sdr) -> usize {
        let ov = self.overlap(other);
        self.num_active() + other.num_active() - 2 * ov
    }

    /// Set union, via a two-pointer merge. Errors if widths differ.
    pub fn union(&self, other: &Sdr) -> Result<Sdr> {
        self.require_same_width(other)?;
        let merged = merge_union(&self.active_bits, &other.active_bits);
        Sdr::new(self.width, merged)
    }

    /// Set intersection, via a two-pointer merge. Errors if widths differ.
    pub fn intersection(&self, other: &Sdr) -> Result<Sdr> {
        self.require_same_width(other)?;
        let merged = merge_intersection(&self.active_bits, &other.active_bits);
        Sdr::new(self.width, merged)
    }

    /// If `num_active() > target`, down-sample by striding every
    /// `num_active()/target`-th element, preserving ascending order.
    ///
    /// Expansion (fewer active bits than `target`) is not this type's
    /// responsibility — it fails rather than silently fabricate bits, since
    /// deciding *which* bits to add is the engine's job, not the SDR's.
    ///
    /// # Errors
    ///
    /// Returns [`PoolerError::InvalidSdr`] if `num_active() < target`.
    pub fn normalize_sparsity(&self, target: usize) -> Result<Sdr> {
        let n = self.num_active();
        if n < target {
            return Err(PoolerError::InvalidSdr(format!(
                "cannot normalize to {} active bits: only {} present (expansion is not supported)",
                target, n
            )));
        }
        if n == target {
            return Sdr::new(self.width, self.active_bits.clone());
        }
        if target == 0 {
            return Sdr::new(self.width, Vec::new());
        }

        let stride = n as f64 / target as f64;
        let mut sampled = Vec::with_capacity(target);
        let mut i = 0usize;
        while sampled.len() < target {
            let idx = ((i as f64) * stride).floor() as usize;
            let idx = idx.min(n - 1);
            sampled.push(self.active_bits[idx]);
            i += 1;
        }
        sampled.dedup();
        Sdr::new(self.width, sampled)
    }

    fn require_same_width(&self, other: &Sdr) -> Result<()> {
        if self.width != other.width {
            return Err(PoolerError::InvalidSdr(format!(
                "width mismatch: {} vs {}",
                self.width, other.width
            )));
        }
        Ok(())
    }
}

impl fmt::Display for Sdr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Sdr(width={}, active={}, sparsity={:.4})",
            self.width,
            self.num_active(),
            self.sparsity()
        )
    }
}

/// Two-pointer merge counting indices common to both sorted slices.
fn merge_count(a: &[usize], b: &[usize]) -> usize {
    let (mut i, mut j) = (0, 0);
    let mut count = 0;
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                count += 1;
                i += 1;
                j += 1;
            }
        }
    }
    count
}

/// Two-pointer merge producing the sorted union of two sorted slices.
fn merge_union(a: &[usize], b: &[usize]) -> Vec<usize> {
    let mut out = Vec::with_capacity(a.len() + b.len());
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Less => {
                out.push(a[i]);
                i += 1;
            }
            std::cmp::Ordering::Greater => {
                out.push(b[j]);
                j += 1;
            }
            std::cmp::Ordering::Equal => {
                out.push(a[i]);
                i += 1;
                j += 1;
            }
        }
    }
    out.extend_from_slice(&a[i..]);
    out.extend_from_slice(&b[j..]);
    out
}

/// Two-pointer merge producing the sorted intersection of two sorted slices.
fn merge_intersection(a: &[usize], b: &[usize]) -> Vec<usize> {
    let mut out = Vec::new();
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                out.push(a[i]);
                i += 1;
                j += 1;
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_sorts_and_dedups() {
        let sdr = Sdr::new(10, vec![5, 1, 5, 3, 1]).unwrap();
        assert_eq!(sdr.active_bits(), &[1, 3, 5]);
    }

    #[test]
    fn test_new_rejects_out_of_range() {
        let err = Sdr::new(4, vec![0, 4]).unwrap_err();
        assert!(matches!(err, PoolerError::InvalidSdr(_)));
    }

    #[test]
    fn test_new_rejects_zero_width() {
        assert!(Sdr::new(0, vec![]).is_err());
    }

    #[test]
    fn test_s2_round_trip_algebra() {
        let a = Sdr::new(10, vec![1, 3, 5, 7]).unwrap();
        let b = Sdr::new(10, vec![3, 5, 9]).unwrap();

        assert_eq!(a.overlap(&b), 2);
        assert!((a.overlap_ratio(&b) - 2.0 / 3.0).abs() < 1e-9);
        assert!((a.jaccard(&b) - 2.0 / 5.0).abs() < 1e-9);
        assert!((a.cosine(&b) - 2.0 / 12f64.sqrt()).abs() < 1e-9);
        assert_eq!(a.hamming(&b), 3);
    }

    #[test]
    fn test_overlap_symmetric() {
        let a = Sdr::new(20, vec![1, 2, 3, 4]).unwrap();
        let b = Sdr::new(20, vec![3, 4, 5, 6]).unwrap();
        assert_eq!(a.overlap(&b), b.overlap(&a));
    }

    #[test]
    fn test_overlap_self_equals_cardinality() {
        let a = Sdr::new(20, vec![1, 2, 3, 4]).unwrap();
        assert_eq!(a.overlap(&a), a.num_active());
    }

    #[test]
    fn test_jaccard_self_is_one() {
        let a = Sdr::new(20, vec![1, 2, 3, 4]).unwrap();
        assert_eq!(a.jaccard(&a), 1.0);
    }

    #[test]
    fn test_jaccard_empty_both_is_one() {
        let a = Sdr::empty(10).unwrap();
        let b = Sdr::empty(10).unwrap();
        assert_eq!(a.jaccard(&b), 1.0);
    }

    #[test]
    fn test_overlap_width_mismatch_is_zero() {
        let a = Sdr::new(10, vec![1, 2]).unwrap();
        let b = Sdr::new(20, vec![1, 2]).unwrap();
        assert_eq!(a.overlap(&b), 0);
    }

    #[test]
    fn test_union_and_intersection() {
        let a = Sdr::new(10, vec![1, 2, 3]).unwrap();
        let b = Sdr::new(10, vec![2, 3, 4]).unwrap();

        assert_eq!(a.union(&b).unwrap().active_bits(), &[1, 2, 3, 4]);
        assert_eq!(a.intersection(&b).unwrap().active_bits(), &[2, 3]);
    }

    #[test]
    fn test_union_width_mismatch_errors() {
        let a = Sdr::new(10, vec![1]).unwrap();
        let b = Sdr::new(20, vec![1]).unwrap();
        assert!(a.union(&b).is_err());
    }

    #[test]
    fn test_is_active() {
        let a = Sdr::new(10, vec![2, 5, 8]).unwrap();
        assert!(a.is_active(5));
        assert!(!a.is_active(6));
    }

    #[test]
    fn test_normalize_sparsity_downsamples_ascending() {
        let a = Sdr::new(100, (0..40).collect()).unwrap();
        let normalized = a.normalize_sparsity(20).unwrap();
        assert_eq!(normalized.num_active(), 20);
        let bits = normalized.active_bits();
        assert!(bits.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_normalize_sparsity_rejects_expansion() {
        let a = Sdr::new(100, vec![1, 2, 3]).unwrap();
        assert!(a.normalize_sparsity(10).is_err());
    }

    #[test]
    fn test_normalize_sparsity_noop_when_equal() {
        let a = Sdr::new(100, vec![1, 2, 3]).unwrap();
        let normalized = a.normalize_sparsity(3).unwrap();
        assert_eq!(normalized.active_bits(), a.active_bits());
    }

    #[test]
    fn test_sparsity_bands() {
        let sdr = Sdr::new(2048, (0..41).collect()).unwrap();
        assert!(sdr.is_htm_compliant());
        assert!(sdr.is_pooler_output_compliant());
    }

    #[test]
    fn test_display() {
        let sdr = Sdr::new(10, vec![1, 2]).unwrap();
        let text = format!("{}", sdr);
        assert!(text.contains("width=10"));
        assert!(text.contains("active=2"));
    }
}
