use super::{MatchGrid, StrongestMatch, map_rows, require_paired, strongest_kernel};
use crate::core::alphabet;
use crate::core::matrix::SeqMatrix;
use crate::core::thermo::model::EnergyModel;
use crate::core::thermo::table::EnergyTable;
use crate::engine::error::DesignError;
use tracing::instrument;

// Callers pass `b` already reverse-complemented so that equal codes mean
// Watson-Crick pairs. Only windows of at least two bases score; with a
// non-negated table every stack is negative and nothing beats the origin, so
// the string helpers build the negated table.

fn to_match(a: &[u8], b: &[u8], table: &EnergyTable) -> StrongestMatch {
    let best = strongest_kernel(a, b, table.values());
    let (a_start, b_start) = best.starts();
    StrongestMatch {
        a_start,
        b_start,
        length: best.length,
        energy: best.energy,
    }
}

/// Strongest window between `a` and a pre-complemented `b`.
///
/// Returns [`StrongestMatch::NONE`] when no window improves on zero energy.
pub fn strongest_common_substring(a: &[u8], b: &[u8], table: &EnergyTable) -> StrongestMatch {
    let best = strongest_kernel(a, b, table.values());
    if best.is_origin() {
        return StrongestMatch::NONE;
    }
    to_match(a, b, table)
}

/// Strongest window of `a` against every pre-complemented row of `b_rows`.
///
/// Rows without a scoring window report `(0, 0, 0, 0.0)`.
pub fn strongest_common_substrings_singlea1(
    a: &[u8],
    b_rows: &SeqMatrix,
    table: &EnergyTable,
) -> Vec<StrongestMatch> {
    map_rows(b_rows.nrows(), |_| a, b_rows, |x, y| to_match(x, y, table))
}

#[instrument(level = "debug", skip_all, fields(pairs = a_rows.nrows()))]
pub fn strongest_common_substrings_pairs(
    a_rows: &SeqMatrix,
    b_rows: &SeqMatrix,
    table: &EnergyTable,
) -> Result<Vec<StrongestMatch>, DesignError> {
    require_paired(a_rows, b_rows)?;
    Ok(map_rows(
        a_rows.nrows(),
        |k| a_rows.row(k),
        b_rows,
        |x, y| to_match(x, y, table),
    ))
}

/// Strongest window of every ordered pair `(A[i], B[j])`, as a `p x q` grid.
#[instrument(level = "debug", skip_all, fields(p = a_rows.nrows(), q = b_rows.nrows()))]
pub fn strongest_common_substrings_product(
    a_rows: &SeqMatrix,
    b_rows: &SeqMatrix,
    table: &EnergyTable,
) -> MatchGrid<StrongestMatch> {
    let (p, q) = (a_rows.nrows(), b_rows.nrows());
    let repeated = a_rows.repeat_rows(q);
    let tiled = b_rows.tile_rows(p);
    let cells = map_rows(
        p * q,
        |k| repeated.row(k),
        &tiled,
        |x, y| to_match(x, y, table),
    );
    MatchGrid::from_cells(p, q, cells)
}

/// Row-wise strongest complementary windows of two string lists.
///
/// The second list is reverse-complemented before matching, and scoring uses
/// the negated table at `temperature`, so energies come out positive.
pub fn strongest_common_substrings_all_pairs_strings<S: AsRef<str>>(
    seqs1: &[S],
    seqs2: &[S],
    model: &EnergyModel,
    temperature: f64,
) -> Result<Vec<StrongestMatch>, DesignError> {
    let a_rows = alphabet::encode_batch(seqs1)?;
    let b_rows = alphabet::encode_batch(seqs2)?.reverse_complement();
    let table = model.table(temperature, true);
    strongest_common_substrings_pairs(&a_rows, &b_rows, &table)
}

pub fn energies_strongest_common_substrings<S: AsRef<str>>(
    seqs1: &[S],
    seqs2: &[S],
    model: &EnergyModel,
    temperature: f64,
) -> Result<Vec<f64>, DesignError> {
    let matches = strongest_common_substrings_all_pairs_strings(seqs1, seqs2, model, temperature)?;
    Ok(matches.into_iter().map(|m| m.energy).collect())
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

    fn negated(model: &EnergyModel) -> std::sync::Arc<EnergyTable> {
        model.table(37.0, true)
    }

    #[test]
    fn perfect_complement_scores_its_full_duplex_energy() {
        let model = EnergyModel::default();
        let seq = "ACGTTGCA";
        let partner = alphabet::encode_batch(&["TGCAACGT"]).unwrap().reverse_complement();
        let found = strongest_common_substring(&enc(seq), partner.row(0), &negated(&model));

        assert_eq!((found.a_start, found.b_start, found.length), (0, 0, 8));
        let expected = -model.duplex_energy(&enc(seq), 37.0);
        assert!((found.energy - expected).abs() < 1e-9);
    }

    #[test]
    fn single_base_matches_do_not_score() {
        let model = EnergyModel::default();
        let found = strongest_common_substring(&enc("ACA"), &enc("GCG"), &negated(&model));
        assert_eq!(found, StrongestMatch::NONE);
    }

    #[test]
    fn agrees_with_naive_reference_on_random_pairs() {
        let model = EnergyModel::default();
        let table = negated(&model);
        let mut rng = RandomSource::seed_from_u64(19);
        for _ in 0..300 {
            let a: Vec<u8> = (0..rng.gen_range(2..=10)).map(|_| rng.gen_range(0..4u8)).collect();
            let b: Vec<u8> = (0..rng.gen_range(2..=10)).map(|_| rng.gen_range(0..4u8)).collect();
            let fast = strongest_common_substring(&a, &b, &table);
            let slow = reference::strongest_common_substring(&a, &b, &table);
            assert_eq!(
                (fast.a_start, fast.b_start, fast.length),
                (slow.a_start, slow.b_start, slow.length),
                "a={a:?} b={b:?}"
            );
            assert_eq!(fast.energy, slow.energy);
        }
    }

    #[test]
    fn product_cells_equal_pairwise_results() {
        let model = EnergyModel::default();
        let table = negated(&model);
        let a_rows = alphabet::encode_batch(&["ACGTAC", "GGCATT", "TTTTAA"]).unwrap();
        let b_rows = alphabet::encode_batch(&["GTACGT", "AATGCC"]).unwrap().reverse_complement();

        let grid = strongest_common_substrings_product(&a_rows, &b_rows, &table);
        for (i, j, cell) in grid.iter() {
            let single = strongest_common_substrings_singlea1(a_rows.row(i), &b_rows, &table);
            assert_eq!(*cell, single[j]);
        }
    }

    #[test]
    fn string_helpers_complement_the_partner_list() {
        let model = EnergyModel::default();
        let seqs1 = ["ACGTTGCA", "AAAAAAAA"];
        let seqs2 = ["TGCAACGT", "CCCCCCCC"];
        let matches =
            strongest_common_substrings_all_pairs_strings(&seqs1, &seqs2, &model, 37.0).unwrap();
        assert_eq!(matches[0].length, 8);
        assert!(matches[0].energy > 0.0);
        assert_eq!(matches[1].length, 0);

        let energies = energies_strongest_common_substrings(&seqs1, &seqs2, &model, 37.0).unwrap();
        assert_eq!(energies, vec![matches[0].energy, matches[1].energy]);
    }
}
