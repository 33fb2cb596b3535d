use super::{MatchGrid, SubstringMatch, longest_kernel, map_rows, require_paired};
use crate::core::alphabet;
use crate::core::matrix::SeqMatrix;
use crate::engine::error::DesignError;
use tracing::instrument;

fn to_match(a: &[u8], b: &[u8]) -> SubstringMatch {
    let best = longest_kernel(a, b);
    let (a_start, b_start) = best.starts();
    SubstringMatch {
        a_start,
        b_start,
        length: best.length,
    }
}

/// Longest common substring of two rows.
///
/// Returns [`SubstringMatch::NONE`] (`-1, -1, 0`) when no symbol is shared.
pub fn longest_common_substring(a: &[u8], b: &[u8]) -> SubstringMatch {
    let found = to_match(a, b);
    if found.is_match() {
        found
    } else {
        SubstringMatch::NONE
    }
}

/// Longest common substring of `a` with every row of `b_rows`.
///
/// Rows without a match report `(0, 0, 0)`; check `length` before trusting the starts.
pub fn longest_common_substrings_singlea1(a: &[u8], b_rows: &SeqMatrix) -> Vec<SubstringMatch> {
    map_rows(b_rows.nrows(), |_| a, b_rows, to_match)
}

/// Longest common substring of `a_rows[k]` with `b_rows[k]` for every `k`.
#[instrument(level = "debug", skip_all, fields(pairs = a_rows.nrows()))]
pub fn longest_common_substrings_pairs(
    a_rows: &SeqMatrix,
    b_rows: &SeqMatrix,
) -> Result<Vec<SubstringMatch>, DesignError> {
    require_paired(a_rows, b_rows)?;
    Ok(map_rows(a_rows.nrows(), |k| a_rows.row(k), b_rows, to_match))
}

/// Longest common substring of every ordered pair `(A[i], B[j])`.
///
/// `A` is repeated row by row and `B` tiled as a whole into `p * q` paired
/// rows, matched once, and reshaped to a `p x q` grid.
#[instrument(level = "debug", skip_all, fields(p = a_rows.nrows(), q = b_rows.nrows()))]
pub fn longest_common_substrings_product(
    a_rows: &SeqMatrix,
    b_rows: &SeqMatrix,
) -> MatchGrid<SubstringMatch> {
    let (p, q) = (a_rows.nrows(), b_rows.nrows());
    let repeated = a_rows.repeat_rows(q);
    let tiled = b_rows.tile_rows(p);
    let cells = map_rows(p * q, |k| repeated.row(k), &tiled, to_match);
    MatchGrid::from_cells(p, q, cells)
}

/// Row-wise longest common substrings of two equally long string lists.
pub fn longest_common_substrings_all_pairs_strings<S: AsRef<str>>(
    seqs1: &[S],
    seqs2: &[S],
) -> Result<Vec<SubstringMatch>, DesignError> {
    let a_rows = alphabet::encode_batch(seqs1)?;
    let b_rows = alphabet::encode_batch(seqs2)?;
    longest_common_substrings_pairs(&a_rows, &b_rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::RandomSource;
    use crate::engine::matcher::reference;
    use rand::{Rng, SeedableRng};

    fn enc(s: &str) -> Vec<u8> {
        alphabet::encode(s).unwrap()
    }

    fn random_row(rng: &mut RandomSource, max_len: usize) -> Vec<u8> {
        let len = rng.gen_range(1..=max_len);
        (0..len).map(|_| rng.gen_range(0..4u8)).collect()
    }

    fn random_matrix(rng: &mut RandomSource, rows: usize, cols: usize) -> SeqMatrix {
        let data = (0..rows * cols).map(|_| rng.gen_range(0..4u8)).collect();
        SeqMatrix::from_vec(rows, cols, data).unwrap()
    }

    #[test]
    fn finds_shared_window_and_offsets() {
        let m = longest_common_substring(&enc("TTACGTA"), &enc("CACGTC"));
        assert_eq!(
            m,
            SubstringMatch {
                a_start: 2,
                b_start: 1,
                length: 4
            }
        );
    }

    #[test]
    fn single_pair_without_match_uses_negative_sentinel() {
        assert_eq!(
            longest_common_substring(&enc("AAA"), &enc("CCC")),
            SubstringMatch::NONE
        );
    }

    #[test]
    fn one_vs_many_without_match_uses_zero_sentinel() {
        let b_rows = alphabet::encode_batch(&["CCC", "CAC"]).unwrap();
        let results = longest_common_substrings_singlea1(&enc("AAA"), &b_rows);
        assert_eq!(results[0], SubstringMatch::default());
        assert_eq!(
            results[1],
            SubstringMatch {
                a_start: 0,
                b_start: 1,
                length: 1
            }
        );
    }

    #[test]
    fn agrees_with_naive_reference_on_random_pairs() {
        let mut rng = RandomSource::seed_from_u64(11);
        for _ in 0..500 {
            let a = random_row(&mut rng, 12);
            let b = random_row(&mut rng, 12);
            assert_eq!(
                longest_common_substring(&a, &b),
                reference::longest_common_substring(&a, &b),
                "a={a:?} b={b:?}"
            );
        }
    }

    #[test]
    fn product_cells_equal_single_pair_results() {
        let mut rng = RandomSource::seed_from_u64(3);
        let a_rows = random_matrix(&mut rng, 5, 7);
        let b_rows = random_matrix(&mut rng, 4, 6);

        let grid = longest_common_substrings_product(&a_rows, &b_rows);
        assert_eq!((grid.rows(), grid.cols()), (5, 4));
        for (i, j, cell) in grid.iter() {
            let single = to_match(a_rows.row(i), b_rows.row(j));
            assert_eq!(*cell, single);
            if cell.is_match() {
                assert_eq!(
                    *cell,
                    longest_common_substring(a_rows.row(i), b_rows.row(j))
                );
            }
        }
    }

    #[test]
    fn pairs_require_equal_row_counts() {
        let a_rows = alphabet::encode_batch(&["ACG", "TTT"]).unwrap();
        let b_rows = alphabet::encode_batch(&["ACG"]).unwrap();
        assert!(matches!(
            longest_common_substrings_pairs(&a_rows, &b_rows),
            Err(DesignError::RowCountMismatch { left: 2, right: 1 })
        ));
    }

    #[test]
    fn string_helper_matches_rowwise() {
        let results =
            longest_common_substrings_all_pairs_strings(&["ACGT", "GGGG"], &["CGTA", "AGGA"]).unwrap();
        assert_eq!(results[0].length, 3);
        assert_eq!(results[1].length, 2);
    }
}
