//! Competitive inhibition: global and local k-winners-take-all.
//!
//! Both selection strategies take a caller-supplied vector of per-column
//! overlap scores and return the ascending list of winning column indices.
//! Neither strategy treats "no column has positive overlap" as an error —
//! per the spec, an empty result is a valid degenerate outcome.

/// Global k-winners-take-all.
///
/// `k = round(column_count * sparsity_ratio)`. Candidates are columns with
/// `overlap > 0`, ranked by `(-overlap, column_index)` so that ties break
/// by ascending index; the first `min(k, |candidates|)` are returned in
/// ascending column-index order.
///
/// Deterministic-mode tie-breaking; see [`global_kwta_with_tiebreak`] for
/// randomized-mode tie-breaking by an RNG draw instead of column index.
pub fn global_kwta(overlap: &[f64], sparsity_ratio: f64) -> Vec<usize> {
    let tiebreak: Vec<f64> = (0..overlap.len()).map(|c| c as f64).collect();
    global_kwta_with_tiebreak(overlap, sparsity_ratio, &tiebreak)
}

/// Global k-winners-take-all with a caller-supplied tie-break key per
/// column: among columns with equal overlap, the one with the *smaller*
/// `tiebreak` value ranks higher. [`global_kwta`] passes the column index
/// itself (deterministic-mode tie-breaking); randomized mode instead passes
/// a fresh RNG draw per call.
pub fn global_kwta_with_tiebreak(
    overlap: &[f64],
    sparsity_ratio: f64,
    tiebreak: &[f64],
) -> Vec<usize> {
    debug_assert_eq!(overlap.len(), tiebreak.len());
    let column_count = overlap.len();
    let k = (column_count as f64 * sparsity_ratio).round() as usize;

    let mut candidates: Vec<usize> = (0..column_count).filter(|&c| overlap[c] > 0.0).collect();
    candidates.sort_by(|&a, &b| {
        overlap[b]
            .partial_cmp(&overlap[a])
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(
                tiebreak[a]
                    .partial_cmp(&tiebreak[b])
                    .unwrap_or(std::cmp::Ordering::Equal),
            )
    });
    candidates.truncate(k.min(candidates.len()));
    candidates.sort_unstable();
    candidates
}

/// Multiply `overlap[c]` by `boost_factor[c]` in place, the boost-aware
/// inhibition step. Callers apply this only when learning is enabled and
/// `boost_strength > 0`, per the spec; this function itself is unconditional.
pub fn apply_boost(overlap: &mut [f64], boost_factor: &[f64]) {
    debug_assert_eq!(overlap.len(), boost_factor.len());
    for (o, &b) in overlap.iter_mut().zip(boost_factor.iter()) {
        *o *= b;
    }
}

/// Precomputed 1-D inhibition neighborhoods, one `[lo, hi]` inclusive range
/// per column, so [`local_kwta`] doesn't recompute clamped bounds on every
/// call.
pub struct NeighborhoodCache {
    column_count: usize,
    radius: usize,
    ranges: Vec<(usize, usize)>,
}

impl NeighborhoodCache {
    /// Build the neighborhood cache for `column_count` columns at the given
    /// `radius`. `radius == 0` makes every column its own neighborhood.
    pub fn new(column_count: usize, radius: usize) -> Self {
        let ranges = (0..column_count)
            .map(|c| {
                let lo = c.saturating_sub(radius);
                let hi = (c + radius).min(column_count.saturating_sub(1));
                (lo, hi)
            })
            .collect();
        Self {
            column_count,
            radius,
            ranges,
        }
    }

    /// The `[lo, hi]` inclusive neighborhood range for column `c`.
    #[inline]
    pub fn range(&self, c: usize) -> (usize, usize) {
        self.ranges[c]
    }

    /// Configured radius.
    #[inline]
    pub fn radius(&self) -> usize {
        self.radius
    }

    /// Number of columns this cache was built for.
    #[inline]
    pub fn column_count(&self) -> usize {
        self.column_count
    }
}

/// Local k-winners-take-all.
///
/// For each column `c`, computes its neighborhood `N(c)` from `neighborhoods`,
/// desired local activity `d = max(1, ceil(|N(c)| * local_area_density))`
/// (or `|N(c)| * sparsity_ratio` if `local_area_density == 0`), ranks `N(c)`
/// by `(-overlap, index)`, and activates `c` iff it lands in the first `d`
/// ranks. Returns the ascending list of active columns.
pub fn local_kwta(
    overlap: &[f64],
    neighborhoods: &NeighborhoodCache,
    local_area_density: f64,
    sparsity_ratio: f64,
) -> Vec<usize> {
    let column_count = overlap.len();
    debug_assert_eq!(column_count, neighborhoods.column_count());

    let mut active = Vec::new();
    for c in 0..column_count {
        let (lo, hi) = neighborhoods.range(c);
        let neighborhood_size = hi - lo + 1;

        let density = if local_area_density > 0.0 {
            local_area_density
        } else {
            sparsity_ratio
        };
        let d = ((neighborhood_size as f64 * density).ceil() as usize).max(1);

        let mut ranked: Vec<usize> = (lo..=hi).collect();
        ranked.sort_by(|&a, &b| {
            overlap[b]
                .partial_cmp(&overlap[a])
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.cmp(&b))
        });

        if overlap[c] > 0.0 && ranked.iter().take(d).any(|&idx| idx == c) {
            active.push(c);
        }
    }
    active
}
