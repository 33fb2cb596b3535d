use super::table::EnergyTable;
use crate::core::matrix::SeqMatrix;
use tracing::instrument;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Rows handled per gather/reduce block in [`duplex_energies`].
const ROW_BLOCK: usize = 4096;

/// Nearest-neighbor energy of one code row binding its Watson-Crick complement.
#[inline]
pub fn duplex_energy(row: &[u8], table: &EnergyTable) -> f64 {
    row.windows(2)
        .map(|pair| table.pair_energy(pair[0], pair[1]))
        .sum()
}

/// Pair keys `(row[j] << 2) | row[j + 1]` for every row of a row-major block.
fn pair_keys(block: &[u8], ncols: usize) -> Vec<u8> {
    let nrows = block.len() / ncols;
    let mut keys = Vec::with_capacity(nrows * (ncols - 1));
    for row in block.chunks_exact(ncols) {
        let (left, right) = (&row[..ncols - 1], &row[1..]);
        keys.extend(left.iter().zip(right).map(|(&l, &r)| (l << 2) | r));
    }
    keys
}

/// Duplex energies of every row of `matrix`.
///
/// Builds the `(ncols - 1)`-wide pair-key matrix from shifted slices, gathers
/// all stacking energies with one table lookup per key and reduces along the
/// position axis. Each row is summed left to right, the same order as
/// [`duplex_energy`], so both agree exactly.
#[instrument(level = "debug", skip_all, fields(rows = matrix.nrows(), cols = matrix.ncols()))]
pub fn duplex_energies(matrix: &SeqMatrix, table: &EnergyTable) -> Vec<f64> {
    let ncols = matrix.ncols();
    let mut energies = vec![0.0; matrix.nrows()];
    if ncols < 2 || matrix.is_empty() {
        return energies;
    }

    let kernel = |(block, out): (&[u8], &mut [f64])| {
        let keys = pair_keys(block, ncols);
        let gathered: Vec<f64> = keys.iter().map(|&k| table.by_key(k as usize)).collect();
        for (energy, stacks) in out.iter_mut().zip(gathered.chunks_exact(ncols - 1)) {
            *energy = stacks.iter().sum();
        }
    };

    #[cfg(feature = "parallel")]
    matrix
        .as_slice()
        .par_chunks(ROW_BLOCK * ncols)
        .zip(energies.par_chunks_mut(ROW_BLOCK))
        .for_each(kernel);

    #[cfg(not(feature = "parallel"))]
    matrix
        .as_slice()
        .chunks(ROW_BLOCK * ncols)
        .zip(energies.chunks_mut(ROW_BLOCK))
        .for_each(kernel);

    energies
}

/// Reverse complement of every row, for scoring one set against the partners of another.
pub fn complement_matrix(matrix: &SeqMatrix) -> SeqMatrix {
    matrix.reverse_complement()
}

/// Bulge/internal-loop penalty for a gap of `gap_length` bases.
///
/// `temperature` is taken as given (degrees Celsius).
#[inline]
pub fn internal_loop_penalty(gap_length: usize, temperature: f64) -> f64 {
    1.5 + 2.5 * 0.002 * temperature * (1.0 + gap_length as f64).ln()
}
