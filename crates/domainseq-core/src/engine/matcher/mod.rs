//! Best aligned common substring between code rows.
//!
//! Two scoring modes share one dynamic-programming shape over the
//! `(m + 1) x (n + 1)` table of match lengths: [`longest`] maximizes the
//! length of the window, [`strongest`] maximizes the cumulative stacking
//! energy of the window. Each mode comes in four batching shapes: one pair,
//! one row against many, row-wise pairs of two batches, and the full cross
//! product of two batches.
//!
//! Ties are broken by the first occurrence of the best cell in row-major
//! order over the flattened table. The tie-break carries no meaning beyond
//! determinism.
//!
//! The DP keeps two rolling rows per pair, so working memory is `O(n)` per
//! pair regardless of batch shape. Batches run in parallel with the
//! `parallel` feature.

pub mod longest;
pub mod reference;
pub mod strongest;

use super::error::DesignError;
use crate::core::matrix::SeqMatrix;
use itertools::Itertools;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// A common window `a[a_start..a_start + length] == b[b_start..b_start + length]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SubstringMatch {
    pub a_start: i64,
    pub b_start: i64,
    pub length: usize,
}

impl SubstringMatch {
    /// Single-pair result when nothing matches.
    pub const NONE: SubstringMatch = SubstringMatch {
        a_start: -1,
        b_start: -1,
        length: 0,
    };

    #[inline]
    pub fn is_match(&self) -> bool {
        self.length > 0
    }
}

/// The window of highest cumulative stacking energy, with its length.
///
/// `energy` is in the sign convention of the table used for scoring.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StrongestMatch {
    pub a_start: i64,
    pub b_start: i64,
    pub length: usize,
    pub energy: f64,
}

impl StrongestMatch {
    pub const NONE: StrongestMatch = StrongestMatch {
        a_start: -1,
        b_start: -1,
        length: 0,
        energy: 0.0,
    };

    #[inline]
    pub fn is_match(&self) -> bool {
        self.length > 0
    }
}

/// Row-major `rows x cols` grid of per-pair results.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchGrid<T> {
    rows: usize,
    cols: usize,
    cells: Vec<T>,
}

impl<T> MatchGrid<T> {
    pub(crate) fn from_cells(rows: usize, cols: usize, cells: Vec<T>) -> Self {
        debug_assert_eq!(cells.len(), rows * cols);
        Self { rows, cols, cells }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Result for `(A[i], B[j])`.
    pub fn get(&self, i: usize, j: usize) -> Option<&T> {
        if i >= self.rows || j >= self.cols {
            return None;
        }
        self.cells.get(i * self.cols + j)
    }

    pub fn row(&self, i: usize) -> &[T] {
        &self.cells[i * self.cols..(i + 1) * self.cols]
    }

    /// Cells with their `(i, j)` coordinates, row-major.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &T)> + '_ {
        let cols = self.cols.max(1);
        self.cells
            .iter()
            .enumerate()
            .map(move |(k, cell)| (k / cols, k % cols, cell))
    }

    pub fn into_cells(self) -> Vec<T> {
        self.cells
    }
}

/// All index pairs `(i, j)` with `i < j < n`, in lexicographic order.
pub fn pair_indices(n: usize) -> Vec<(usize, usize)> {
    (0..n).tuple_combinations().collect()
}

/// End cell `(i, j)` of the best window and its length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct BestCell {
    pub i: usize,
    pub j: usize,
    pub length: usize,
    pub energy: f64,
}

impl BestCell {
    const ORIGIN: BestCell = BestCell {
        i: 0,
        j: 0,
        length: 0,
        energy: 0.0,
    };

    #[inline]
    pub(crate) fn is_origin(&self) -> bool {
        self.i == 0 && self.j == 0
    }

    #[inline]
    pub(crate) fn starts(&self) -> (i64, i64) {
        (
            self.i as i64 - self.length as i64,
            self.j as i64 - self.length as i64,
        )
    }
}

/// Rolling-row longest-common-substring DP.
///
/// `cur[j + 1] = prev[j] + 1` when `a[i] == b[j]`, else `0`. The best cell is
/// updated only on a strictly greater length, which yields the first
/// row-major occurrence of the maximum.
pub(crate) fn longest_kernel(a: &[u8], b: &[u8]) -> BestCell {
    let n = b.len();
    let mut prev = vec![0usize; n + 1];
    let mut cur = vec![0usize; n + 1];
    let mut best = BestCell::ORIGIN;

    for (i, &ai) in a.iter().enumerate() {
        for (j, &bj) in b.iter().enumerate() {
            cur[j + 1] = if ai == bj { prev[j] + 1 } else { 0 };
            if cur[j + 1] > best.length {
                best = BestCell {
                    i: i + 1,
                    j: j + 1,
                    length: cur[j + 1],
                    energy: 0.0,
                };
            }
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    best
}

/// Energy-weighted DP sharing the length recurrence of [`longest_kernel`].
///
/// A cell's energy grows only when the match extends a match at the
/// diagonal predecessor; the added term is the stacking energy of
/// `(a[i - 1], a[i])`. The best cell is the first row-major maximum of the
/// energy, starting from the origin cell at `0.0`.
pub(crate) fn strongest_kernel(a: &[u8], b: &[u8], stacks: &[f64; 16]) -> BestCell {
    let n = b.len();
    let mut prev_len = vec![0usize; n + 1];
    let mut cur_len = vec![0usize; n + 1];
    let mut prev_energy = vec![0.0f64; n + 1];
    let mut cur_energy = vec![0.0f64; n + 1];
    let mut best = BestCell::ORIGIN;

    for (i, &ai) in a.iter().enumerate() {
        let stack = if i > 0 {
            stacks[((a[i - 1] << 2) | ai) as usize]
        } else {
            0.0
        };
        for (j, &bj) in b.iter().enumerate() {
            if ai == bj {
                cur_len[j + 1] = prev_len[j] + 1;
                cur_energy[j + 1] = if prev_len[j] > 0 {
                    prev_energy[j] + stack
                } else {
                    0.0
                };
            } else {
                cur_len[j + 1] = 0;
                cur_energy[j + 1] = 0.0;
            }
            if cur_energy[j + 1] > best.energy {
                best = BestCell {
                    i: i + 1,
                    j: j + 1,
                    length: cur_len[j + 1],
                    energy: cur_energy[j + 1],
                };
            }
        }
        std::mem::swap(&mut prev_len, &mut cur_len);
        std::mem::swap(&mut prev_energy, &mut cur_energy);
    }
    best
}

pub(crate) fn require_paired(a_rows: &SeqMatrix, b_rows: &SeqMatrix) -> Result<(), DesignError> {
    if a_rows.nrows() != b_rows.nrows() {
        return Err(DesignError::RowCountMismatch {
            left: a_rows.nrows(),
            right: b_rows.nrows(),
        });
    }
    Ok(())
}

/// Applies `kernel` to every row `k` pairing `a_row(k)` with `b_rows.row(k)`.
pub(crate) fn map_rows<'a, T, A, K>(count: usize, a_row: A, b_rows: &'a SeqMatrix, kernel: K) -> Vec<T>
where
    T: Send,
    A: Fn(usize) -> &'a [u8] + Sync,
    K: Fn(&[u8], &[u8]) -> T + Sync,
{
    #[cfg(feature = "parallel")]
    let results: Vec<T> = (0..count)
        .into_par_iter()
        .map(|k| kernel(a_row(k), b_rows.row(k)))
        .collect();
    #[cfg(not(feature = "parallel"))]
    let results: Vec<T> = (0..count)
        .map(|k| kernel(a_row(k), b_rows.row(k)))
        .collect();
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_indices_are_lexicographic_combinations() {
        assert_eq!(
            pair_indices(4),
            vec![(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)]
        );
        assert!(pair_indices(1).is_empty());
    }

    #[test]
    fn grid_indexes_row_major() {
        let grid = MatchGrid::from_cells(2, 3, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(grid.get(1, 0), Some(&3));
        assert_eq!(grid.get(2, 0), None);
        assert_eq!(grid.row(1), &[3, 4, 5]);
        let coords: Vec<_> = grid.iter().map(|(i, j, _)| (i, j)).collect();
        assert_eq!(coords[4], (1, 1));
    }

    #[test]
    fn longest_kernel_prefers_first_row_major_maximum() {
        // "AC" occurs twice in b; the earlier end cell in row-major order wins.
        let best = longest_kernel(&[0, 1], &[0, 1, 3, 0, 1]);
        assert_eq!((best.i, best.j, best.length), (2, 2, 2));
    }

    #[test]
    fn kernels_report_origin_when_nothing_matches() {
        assert!(longest_kernel(&[0, 0], &[3, 3]).is_origin());
        let stacks = [1.0; 16];
        assert!(strongest_kernel(&[0, 1], &[2, 3], &stacks).is_origin());
    }
}
