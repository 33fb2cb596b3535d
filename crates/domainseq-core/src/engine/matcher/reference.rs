//! Slow matchers used to cross-check the DP kernels.
//!
//! Every end cell `(i, j)` of the `(m + 1) x (n + 1)` table is visited in
//! row-major order and the run ending there is measured by scanning backward.
//! The tie-break is therefore the same first row-major maximum as the fast
//! path. Not meant for production sizes.

use super::{StrongestMatch, SubstringMatch};
use crate::core::thermo::table::EnergyTable;

/// Length of the common run ending just before `a[i]` and `b[j]`.
fn run_length(a: &[u8], b: &[u8], i: usize, j: usize) -> usize {
    (1..=i.min(j))
        .take_while(|&k| a[i - k] == b[j - k])
        .count()
}

fn end_cells(m: usize, n: usize) -> impl Iterator<Item = (usize, usize)> {
    (0..=m).flat_map(move |i| (0..=n).map(move |j| (i, j)))
}

pub fn longest_common_substring(a: &[u8], b: &[u8]) -> SubstringMatch {
    let mut best = SubstringMatch::NONE;
    for (i, j) in end_cells(a.len(), b.len()) {
        let length = run_length(a, b, i, j);
        if length > best.length {
            best = SubstringMatch {
                a_start: (i - length) as i64,
                b_start: (j - length) as i64,
                length,
            };
        }
    }
    best
}

pub fn strongest_common_substring(a: &[u8], b: &[u8], table: &EnergyTable) -> StrongestMatch {
    let mut best = StrongestMatch::NONE;
    for (i, j) in end_cells(a.len(), b.len()) {
        let length = run_length(a, b, i, j);
        let start = i - length;
        let energy = a[start..i]
            .windows(2)
            .fold(0.0, |acc, pair| acc + table.pair_energy(pair[0], pair[1]));
        if energy > best.energy {
            best = StrongestMatch {
                a_start: start as i64,
                b_start: (j - length) as i64,
                length,
                energy,
            };
        }
    }
    best
}
