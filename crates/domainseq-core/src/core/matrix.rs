use super::alphabet::{ALPHABET_SIZE, CodecError, complement};
use rand::Rng;
use rand::seq::SliceRandom;
use rustc_hash::FxHasher;
use std::hash::Hasher;

/// Row-major matrix of 2-bit symbol codes, one byte per base.
///
/// Rows are sequences, columns are positions. Every row has exactly
/// `ncols` entries for the lifetime of the matrix.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SeqMatrix {
    data: Vec<u8>,
    nrows: usize,
    ncols: usize,
}

impl SeqMatrix {
    /// A matrix with no rows and `ncols` columns.
    pub fn empty(ncols: usize) -> Self {
        Self {
            data: Vec::new(),
            nrows: 0,
            ncols,
        }
    }

    pub fn zeros(nrows: usize, ncols: usize) -> Self {
        Self {
            data: vec![0; nrows * ncols],
            nrows,
            ncols,
        }
    }

    /// Builds a matrix from a flat row-major buffer, checking shape and codes.
    pub fn from_vec(nrows: usize, ncols: usize, data: Vec<u8>) -> Result<Self, CodecError> {
        if data.len() != nrows * ncols {
            return Err(CodecError::LengthMismatch {
                index: 0,
                expected: nrows * ncols,
                found: data.len(),
            });
        }
        if let Some(&bad) = data.iter().find(|&&c| c as usize >= ALPHABET_SIZE) {
            return Err(CodecError::InvalidCode(bad));
        }
        Ok(Self { data, nrows, ncols })
    }

    /// Builds a matrix from equal-length rows.
    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R]) -> Result<Self, CodecError> {
        let Some(first) = rows.first() else {
            return Ok(Self::empty(0));
        };
        let ncols = first.as_ref().len();
        let mut data = Vec::with_capacity(ncols * rows.len());
        for (index, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != ncols {
                return Err(CodecError::LengthMismatch {
                    index,
                    expected: ncols,
                    found: row.len(),
                });
            }
            data.extend_from_slice(row);
        }
        Self::from_vec(rows.len(), ncols, data)
    }

    pub(crate) fn from_raw_parts(nrows: usize, ncols: usize, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), nrows * ncols);
        Self { data, nrows, ncols }
    }

    #[inline]
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    #[inline]
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nrows == 0
    }

    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    pub fn row(&self, index: usize) -> &[u8] {
        let start = index * self.ncols;
        &self.data[start..start + self.ncols]
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> u8 {
        self.data[row * self.ncols + col]
    }

    pub fn rows(&self) -> impl ExactSizeIterator<Item = &[u8]> + '_ {
        (0..self.nrows).map(move |i| self.row(i))
    }

    pub fn column(&self, col: usize) -> Vec<u8> {
        self.rows().map(|row| row[col]).collect()
    }

    pub(crate) fn set_column(&mut self, col: usize, values: &[u8]) {
        debug_assert_eq!(values.len(), self.nrows);
        for (row, &value) in values.iter().enumerate() {
            self.data[row * self.ncols + col] = value;
        }
    }

    pub fn push_row(&mut self, row: &[u8]) -> Result<(), CodecError> {
        if row.len() != self.ncols {
            return Err(CodecError::LengthMismatch {
                index: self.nrows,
                expected: self.ncols,
                found: row.len(),
            });
        }
        if let Some(&bad) = row.iter().find(|&&c| c as usize >= ALPHABET_SIZE) {
            return Err(CodecError::InvalidCode(bad));
        }
        self.data.extend_from_slice(row);
        self.nrows += 1;
        Ok(())
    }

    pub fn pop_row(&mut self) -> Option<Vec<u8>> {
        if self.nrows == 0 {
            return None;
        }
        let start = (self.nrows - 1) * self.ncols;
        let row = self.data.split_off(start);
        self.nrows -= 1;
        Some(row)
    }

    pub fn contains_row(&self, row: &[u8]) -> bool {
        row.len() == self.ncols && self.rows().any(|r| r == row)
    }

    /// Keeps the rows whose mask entry is `true`, preserving order.
    pub fn select(&self, mask: &[bool]) -> Self {
        debug_assert_eq!(mask.len(), self.nrows);
        let kept = mask.iter().filter(|&&keep| keep).count();
        let mut data = Vec::with_capacity(kept * self.ncols);
        for (row, _) in self.rows().zip(mask).filter(|(_, keep)| **keep) {
            data.extend_from_slice(row);
        }
        Self::from_raw_parts(kept, self.ncols, data)
    }

    /// Reverse complement of every row: columns reversed, every code complemented.
    pub fn reverse_complement(&self) -> Self {
        let mut data = Vec::with_capacity(self.data.len());
        for row in self.rows() {
            data.extend(row.iter().rev().map(|&c| complement(c)));
        }
        Self::from_raw_parts(self.nrows, self.ncols, data)
    }

    /// Repeats each row `times` times in place (`r0, r0, r1, r1, ...`).
    pub fn repeat_rows(&self, times: usize) -> Self {
        let mut data = Vec::with_capacity(self.data.len() * times);
        for row in self.rows() {
            for _ in 0..times {
                data.extend_from_slice(row);
            }
        }
        Self::from_raw_parts(self.nrows * times, self.ncols, data)
    }

    /// Concatenates the whole matrix `times` times (`r0, r1, r0, r1, ...`).
    pub fn tile_rows(&self, times: usize) -> Self {
        Self::from_raw_parts(self.nrows * times, self.ncols, self.data.repeat(times))
    }

    /// Joins `self` and `other` side by side; both must have the same row count.
    pub fn hstack(&self, other: &Self) -> Result<Self, CodecError> {
        if self.nrows != other.nrows {
            return Err(CodecError::LengthMismatch {
                index: 0,
                expected: self.nrows,
                found: other.nrows,
            });
        }
        let ncols = self.ncols + other.ncols;
        let mut data = Vec::with_capacity(self.nrows * ncols);
        for (left, right) in self.rows().zip(other.rows()) {
            data.extend_from_slice(left);
            data.extend_from_slice(right);
        }
        Ok(Self::from_raw_parts(self.nrows, ncols, data))
    }

    /// Stacks the rows of `other` below `self`; column counts must agree.
    pub fn vstack(&self, other: &Self) -> Result<Self, CodecError> {
        if self.ncols != other.ncols {
            return Err(CodecError::LengthMismatch {
                index: self.nrows,
                expected: self.ncols,
                found: other.ncols,
            });
        }
        let mut data = Vec::with_capacity(self.data.len() + other.data.len());
        data.extend_from_slice(&self.data);
        data.extend_from_slice(&other.data);
        Ok(Self::from_raw_parts(self.nrows + other.nrows, self.ncols, data))
    }

    pub fn shuffle_rows<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let mut order: Vec<usize> = (0..self.nrows).collect();
        order.shuffle(rng);
        let mut data = Vec::with_capacity(self.data.len());
        for i in order {
            data.extend_from_slice(self.row(i));
        }
        self.data = data;
    }

    /// Sorts rows lexicographically and removes duplicates.
    pub fn sort_dedup_rows(&mut self) {
        let mut rows: Vec<&[u8]> = self.rows().collect();
        rows.sort_unstable();
        rows.dedup();
        let nrows = rows.len();
        let data = rows.concat();
        self.data = data;
        self.nrows = nrows;
    }

    /// Content fingerprint over shape and codes, used as a cache key.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = FxHasher::default();
        hasher.write_usize(self.nrows);
        hasher.write_usize(self.ncols);
        hasher.write(&self.data);
        hasher.finish()
    }
}

/// All sequences obtained by concatenating `row` to either end of every row of `rows`.
///
/// The first `rows.nrows()` results are `rows[i] ++ row`, followed by `row ++ rows[i]`.
pub fn flank_all(row: &[u8], rows: &SeqMatrix) -> Result<SeqMatrix, CodecError> {
    let single = SeqMatrix::from_rows(&[row])?;
    let repeated = single.repeat_rows(rows.nrows());
    let suffixed = rows.hstack(&repeated)?;
    let prefixed = repeated.hstack(rows)?;
    suffixed.vstack(&prefixed)
}
