use super::config::ConfigError;
use super::error::DesignError;
use super::set::SequenceSet;
use crate::core::alphabet::{self, is_strong, is_weak};
use crate::core::matrix::SeqMatrix;
use nalgebra::DMatrix;
use rand::Rng;
use rustc_hash::FxHashSet;
use tracing::{debug, info, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Longest forbidden substring whose base-4 window value fits in an `i64`.
pub const MAX_SUBSTRING_LEN: usize = 31;

/// Rows per Toeplitz product block in [`SequenceSet::filter_substring`].
const WINDOW_BLOCK: usize = 8192;

/// Number of positions at which two equal-length rows differ.
#[inline]
pub fn hamming_distance(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b).filter(|(x, y)| x != y).count()
}

/// Base-4 value of a window: `sum(code[k] * 4^k)`.
fn window_value(codes: &[u8]) -> i64 {
    codes
        .iter()
        .rev()
        .fold(0i64, |acc, &code| acc * 4 + code as i64)
}

/// Banded coefficient matrix; row `w` holds `4^k` at column `w + k`.
fn toeplitz(seqlen: usize, sublen: usize) -> DMatrix<i64> {
    let windows = seqlen - sublen + 1;
    DMatrix::from_fn(windows, seqlen, |w, c| {
        if c >= w && c < w + sublen {
            4i64.pow((c - w) as u32)
        } else {
            0
        }
    })
}

/// For each row in `start..end`, whether no window value is forbidden.
fn block_passes(
    matrix: &SeqMatrix,
    coefficients: &DMatrix<i64>,
    forbidden: &FxHashSet<i64>,
    start: usize,
    end: usize,
) -> Vec<bool> {
    let transposed = DMatrix::from_fn(matrix.ncols(), end - start, |c, r| {
        matrix.get(start + r, c) as i64
    });
    let windows = coefficients * transposed;
    windows
        .column_iter()
        .map(|column| column.iter().all(|value| !forbidden.contains(value)))
        .collect()
}

impl SequenceSet {
    fn retain_where(&self, keep: impl Fn(&[u8]) -> bool) -> SequenceSet {
        let mask: Vec<bool> = self.matrix().rows().map(keep).collect();
        self.derive(self.matrix().select(&mask))
    }

    fn require_length(&self, operation: &'static str, required: usize) -> Result<(), DesignError> {
        if self.seqlen() < required {
            return Err(DesignError::SequenceTooShort {
                operation,
                required,
                found: self.seqlen(),
            });
        }
        Ok(())
    }

    /// Keeps rows whose duplex energy lies in `[low, high]`.
    #[instrument(skip(self), fields(numseqs = self.numseqs()))]
    pub fn filter_energy(&self, low: f64, high: f64, temperature: f64) -> SequenceSet {
        let energies = self.energies(temperature);
        let mask: Vec<bool> = energies.iter().map(|&e| low <= e && e <= high).collect();
        let filtered = self.derive(self.matrix().select(&mask));
        info!(
            kept = filtered.numseqs(),
            "Energy filter [{:.2}, {:.2}] applied.", low, high
        );
        filtered
    }

    /// Greedy in-place reduction to rows at pairwise Hamming distance `>= threshold`.
    ///
    /// Rows are shuffled with the set's own random source first, so the result
    /// is reproducible only for a fixed seed.
    pub fn filter_hamming(&mut self, threshold: usize) {
        let mut rng = self.rng_mut().clone();
        self.filter_hamming_with_rng(threshold, &mut rng);
        *self.rng_mut() = rng;
    }

    /// [`filter_hamming`](Self::filter_hamming) with an injected random source.
    ///
    /// The working set is shuffled, then rows are popped from the end. The
    /// first popped row seeds the retained set; every later row is retained
    /// only if its minimum distance to the retained rows is at least
    /// `threshold`. Retained rows hold their pop order.
    #[instrument(skip(self, rng), fields(numseqs = self.numseqs()))]
    pub fn filter_hamming_with_rng<R: Rng + ?Sized>(&mut self, threshold: usize, rng: &mut R) {
        let mut working = self.matrix().clone();
        working.shuffle_rows(rng);

        let ncols = working.ncols();
        let mut retained: Vec<u8> = Vec::new();
        while let Some(candidate) = working.pop_row() {
            let far_enough = retained
                .chunks_exact(ncols.max(1))
                .all(|kept| hamming_distance(kept, &candidate) >= threshold);
            if far_enough {
                retained.extend_from_slice(&candidate);
            }
        }
        let kept = if ncols == 0 { 0 } else { retained.len() / ncols };
        let retained = SeqMatrix::from_raw_parts(kept, ncols, retained);

        info!(
            threshold,
            before = self.numseqs(),
            kept = retained.nrows(),
            "Hamming filter applied."
        );
        self.replace_matrix(retained);
    }

    /// Removes every row containing any of `substrings`.
    ///
    /// Each window value is computed for all rows at once as the product of a
    /// banded coefficient matrix with the transposed sequence block; a row is
    /// rejected when any window equals any forbidden value. Substrings longer
    /// than the sequences cannot occur, so every row passes.
    #[instrument(skip_all, fields(numseqs = self.numseqs(), substrings = substrings.len()))]
    pub fn filter_substring<S: AsRef<str>>(&self, substrings: &[S]) -> Result<SequenceSet, DesignError> {
        if substrings.is_empty() {
            return Err(ConfigError::EmptySubstringList.into());
        }
        let encoded = substrings
            .iter()
            .map(|s| alphabet::encode(s.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        let mut lengths: Vec<usize> = encoded.iter().map(Vec::len).collect();
        lengths.sort_unstable();
        lengths.dedup();
        let sublen = match lengths[..] {
            [0] => return Err(ConfigError::EmptySubstringList.into()),
            [len] => len,
            _ => return Err(ConfigError::MixedSubstringLengths(lengths).into()),
        };
        if sublen > MAX_SUBSTRING_LEN {
            return Err(ConfigError::SubstringTooLong {
                length: sublen,
                max: MAX_SUBSTRING_LEN,
            }
            .into());
        }

        if sublen > self.seqlen() || self.is_empty() {
            return Ok(self.derive(self.matrix().clone()));
        }

        let forbidden: FxHashSet<i64> = encoded.iter().map(|s| window_value(s)).collect();
        let coefficients = toeplitz(self.seqlen(), sublen);
        let matrix = self.matrix();
        let starts: Vec<usize> = (0..matrix.nrows()).step_by(WINDOW_BLOCK).collect();
        let block = |&start: &usize| {
            let end = (start + WINDOW_BLOCK).min(matrix.nrows());
            block_passes(matrix, &coefficients, &forbidden, start, end)
        };

        #[cfg(feature = "parallel")]
        let blocks: Vec<Vec<bool>> = starts.par_iter().map(block).collect();
        #[cfg(not(feature = "parallel"))]
        let blocks: Vec<Vec<bool>> = starts.iter().map(block).collect();

        let mask = blocks.concat();
        let filtered = self.derive(matrix.select(&mask));
        debug!(sublen, kept = filtered.numseqs(), "Substring filter applied.");
        Ok(filtered)
    }

    /// Keeps rows with `low <= count(symbol) <= high`.
    pub fn filter_base_count(&self, symbol: char, low: usize, high: usize) -> Result<SequenceSet, DesignError> {
        let code = alphabet::symbol_to_code(symbol)?;
        Ok(self.retain_where(|row| {
            let count = row.iter().filter(|&&c| c == code).count();
            low <= count && count <= high
        }))
    }

    pub fn filter_base_at_pos(&self, position: usize, symbol: char) -> Result<SequenceSet, DesignError> {
        let code = alphabet::symbol_to_code(symbol)?;
        if position >= self.seqlen() {
            return Err(DesignError::OutOfBounds {
                index: position,
                len: self.seqlen(),
            });
        }
        Ok(self.retain_where(|row| row[position] == code))
    }

    pub fn filter_base_nowhere(&self, symbol: char) -> Result<SequenceSet, DesignError> {
        let code = alphabet::symbol_to_code(symbol)?;
        Ok(self.retain_where(|row| !row.contains(&code)))
    }

    /// Keeps rows with C or G at both ends and an A or T one or two positions in from each end.
    ///
    /// A domain ending in `{C,G}^3` placed next to one starting with C or G
    /// would form a `{C,G}^4` run.
    pub fn filter_end_gc(&self) -> Result<SequenceSet, DesignError> {
        self.require_length("filter_end_gc", 3)?;
        let last = self.seqlen() - 1;
        Ok(self.retain_where(|row| {
            is_strong(row[0])
                && is_strong(row[last])
                && (is_weak(row[1]) || is_weak(row[2]))
                && (is_weak(row[last - 1]) || is_weak(row[last - 2]))
        }))
    }

    /// Keeps rows with A or T at both ends.
    ///
    /// With `gc_near_end`, additionally requires a C or G one or two positions
    /// in from each end to limit breathing.
    pub fn filter_end_at(&self, gc_near_end: bool) -> Result<SequenceSet, DesignError> {
        self.require_length("filter_end_at", 3)?;
        let last = self.seqlen() - 1;
        Ok(self.retain_where(|row| {
            let ends = is_weak(row[0]) && is_weak(row[last]);
            if !gc_near_end {
                return ends;
            }
            ends && (is_strong(row[1]) || is_strong(row[2]))
                && (is_strong(row[last - 1]) || is_strong(row[last - 2]))
        }))
    }

    /// Removes rows containing a G-quadruplex run `GGGG`.
    pub fn filter_g_quad(&self) -> Result<SequenceSet, DesignError> {
        self.filter_substring(&["GGGG"])
    }

    /// Removes rows containing `GGGG` or `CCCC`.
    pub fn filter_g_quad_c_quad(&self) -> Result<SequenceSet, DesignError> {
        self.filter_substring(&["GGGG", "CCCC"])
    }
}
