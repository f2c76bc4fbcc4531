//! Permanence matrix `P` and its derived connected mask `C`.
//!
//! `P` is a dense `column_count x input_width` matrix of synapse
//! permanences in `[0.0, 1.0]`. `C[c, i] = 1 iff P[c, i] >=
//! CONNECTED_THRESHOLD`, stored packed as bits (one [`bitvec::vec::BitVec`]
//! row per column) so that overlap computation against a densified input is
//! a word-level AND + popcount — the same trick `BlockMemory`'s
//! `overlap_conn` plays via `BitField::num_similar`, generalized here from a
//! sparse pooled-receptor model to the dense per-column mask the spec
//! requires.

use bitvec::prelude::*;
use rand::Rng;

/// Fixed connected-synapse threshold: `C[c, i] = 1 iff P[c, i] >= 0.5`.
pub const CONNECTED_THRESHOLD: f64 = 0.5;

/// Dense permanence matrix plus its derived connected mask.
pub struct PermanenceMatrix {
    column_count: usize,
    input_width: usize,
    /// Row-major: `permanences[c * input_width + i]`.
    permanences: Vec<f64>,
    /// One packed bit-row per column.
    connected: Vec<BitVec<u32, Lsb0>>,
}

impl PermanenceMatrix {
    /// Allocate and randomly initialize `P` with `uniform(0.4, 0.6)` jitter,
    /// then derive `C`.
    pub fn init<R: Rng>(column_count: usize, input_width: usize, rng: &mut R) -> Self {
        let mut permanences = vec![0.0f64; column_count * input_width];
        for p in permanences.iter_mut() {
            *p = rng.gen_range(0.4..=0.6);
        }

        let mut matrix = Self {
            column_count,
            input_width,
            permanences,
            connected: vec![BitVec::repeat(false, input_width); column_count],
        };
        for c in 0..column_count {
            matrix.refresh_connected_row(c);
        }
        matrix
    }

    /// Number of columns (rows of `P`).
    #[inline]
    pub fn column_count(&self) -> usize {
        self.column_count
    }

    /// Width of each row (number of input bits).
    #[inline]
    pub fn input_width(&self) -> usize {
        self.input_width
    }

    /// Read `P[c, i]`.
    #[inline]
    pub fn permanence(&self, c: usize, i: usize) -> f64 {
        self.permanences[c * self.input_width + i]
    }

    /// Read `C[c, i]` as a bool.
    #[inline]
    pub fn is_connected(&self, c: usize, i: usize) -> bool {
        self.connected[c][i]
    }

    /// Raw overlap of column `c` against a densified input: the count of
    /// input bits that are both set and connected to `c`.
    ///
    /// Implemented as a word-level AND + popcount over the packed connected
    /// row and a packed bit-row built from `active_bits`, mirroring
    /// `BitField::num_similar`.
    pub fn overlap(&self, c: usize, active_bits: &[usize]) -> usize {
        let row = &self.connected[c];
        active_bits.iter().filter(|&&i| row[i]).count()
    }

    /// Apply the Hebbian update to column `c`'s permanence row given the
    /// densified input's active bits, then refresh `C`'s row for `c`.
    ///
    /// - Active input bit: `P[c,i] <- min(1, P[c,i] + learning_rate * 0.1)`.
    /// - Inactive input bit: `P[c,i] <- max(0, P[c,i] - learning_rate * 0.05)`.
    ///
    /// The 2x potentiation/depression asymmetry is part of the contract and
    /// is not configurable.
    pub fn learn(&mut self, c: usize, active_bits: &[usize], learning_rate: f64) {
        let width = self.input_width;
        let base = c * width;
        let mut is_active = bitvec![0; width];
        for &i in active_bits {
            is_active.set(i, true);
        }

        for i in 0..width {
            let p = &mut self.permanences[base + i];
            if is_active[i] {
                *p = (*p + learning_rate * 0.1).min(1.0);
            } else {
                *p = (*p - learning_rate * 0.05).max(0.0);
            }
        }

        self.refresh_connected_row(c);
    }

    /// Multiply every permanence in column `c`'s row by `1 + plasticity_rate
    /// * (target - active_duty_cycle)`, clamp to `[0, 1]`, and refresh `C`.
    /// Used by optional homeostatic scaling.
    pub fn homeostatic_scale(&mut self, c: usize, factor: f64) {
        let width = self.input_width;
        let base = c * width;
        for i in 0..width {
            let p = &mut self.permanences[base + i];
            *p = (*p * factor).clamp(0.0, 1.0);
        }
        self.refresh_connected_row(c);
    }

    /// Assert `P[c,i] in [0,1]` for every entry (invariant check used by
    /// property tests and post-validation).
    pub fn all_in_unit_range(&self) -> bool {
        self.permanences.iter().all(|&p| (0.0..=1.0).contains(&p))
    }

    /// Assert `C[c,i] == (P[c,i] >= CONNECTED_THRESHOLD)` for every entry.
    pub fn connected_mask_consistent(&self) -> bool {
        for c in 0..self.column_count {
            for i in 0..self.input_width {
                let expected = self.permanence(c, i) >= CONNECTED_THRESHOLD;
                if self.connected[c][i] != expected {
                    return false;
                }
            }
        }
        true
    }

    fn refresh_connected_row(&mut self, c: usize) {
        let width = self.input_width;
        let base = c * width;
        let row = &mut self.connected[c];
        for i in 0..width {
            row.set(i, self.permanences[base + i] >= CONNECTED_THRESHOLD);
        }
    }
}
