use super::config::{ConfigError, RandomSource, SequenceSetConfig, SetSource};
use super::error::DesignError;
use crate::core::alphabet::{self, Alphabet};
use crate::core::io::seqlist::SeqListFile;
use crate::core::io::traits::SequenceFile;
use crate::core::matrix::SeqMatrix;
use crate::core::thermo::cache::BatchEnergyCache;
use crate::core::thermo::model::EnergyModel;
use rand::{Rng, SeedableRng};
use std::fmt;
use std::ops::Range;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Sets larger than this are abbreviated by `Display`.
const DISPLAY_LIMIT: usize = 64;

/// A mutable list of equal-length DNA sequences.
///
/// Sequences are stored as a [`SeqMatrix`] (one byte per base, codes
/// `A -> 0, C -> 1, G -> 2, T -> 3`). Row order is insertion order and is
/// meaningful; duplicates are allowed except through random sampling. Every
/// filter returns a new set, with the exception of
/// [`filter_hamming`](SequenceSet::filter_hamming), which reduces in place.
///
/// The set owns its random source exclusively. Sets produced by filters share
/// the parent's energy model and receive an independent random stream derived
/// from the parent's state.
#[derive(Debug, Clone)]
pub struct SequenceSet {
    matrix: SeqMatrix,
    rng: RandomSource,
    model: Arc<EnergyModel>,
}

impl SequenceSet {
    #[instrument(skip_all, name = "sequence_set_construction")]
    pub fn from_config(config: SequenceSetConfig) -> Result<Self, DesignError> {
        let SequenceSetConfig {
            source,
            mut random_source,
            shuffle,
            energy_model,
        } = config;

        let matrix = match source {
            SetSource::Enumerate { length, alphabet } => enumerate_all(length, &alphabet)?,
            SetSource::Sample {
                length,
                alphabet,
                count,
            } => sample_random(length, count, &alphabet, &mut random_source)?,
            SetSource::List(sequences) => {
                if sequences.is_empty() {
                    return Err(ConfigError::EmptySourceList.into());
                }
                alphabet::encode_batch(&sequences)?
            }
            SetSource::Matrix(matrix) => matrix,
            SetSource::File(path) => SeqListFile::read_from_path(&path)?,
        };

        let mut set = Self {
            matrix,
            rng: random_source,
            model: energy_model,
        };
        if shuffle {
            set.shuffle();
        }
        debug!(
            numseqs = set.numseqs(),
            seqlen = set.seqlen(),
            "Sequence set constructed."
        );
        Ok(set)
    }

    /// All sequences of `length` over the full alphabet.
    pub fn all(length: usize) -> Result<Self, DesignError> {
        let matrix = enumerate_all(length, &Alphabet::full())?;
        Ok(Self::from_matrix(matrix))
    }

    pub fn from_strings<S: AsRef<str>>(sequences: &[S]) -> Result<Self, DesignError> {
        if sequences.is_empty() {
            return Err(ConfigError::EmptySourceList.into());
        }
        Ok(Self::from_matrix(alphabet::encode_batch(sequences)?))
    }

    pub fn from_matrix(matrix: SeqMatrix) -> Self {
        Self {
            matrix,
            rng: RandomSource::from_entropy(),
            model: Arc::default(),
        }
    }

    pub fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Self, DesignError> {
        Ok(Self::from_matrix(SeqListFile::read_from_path(path)?))
    }

    pub fn write_to_path<P: AsRef<Path>>(&self, path: P) -> Result<(), DesignError> {
        SeqListFile::write_to_path(&self.matrix, path)?;
        Ok(())
    }

    /// A new set over `matrix` sharing this set's model, with a jumped copy of its random stream.
    pub(crate) fn derive(&self, matrix: SeqMatrix) -> Self {
        let mut rng = self.rng.clone();
        rng.jump();
        Self {
            matrix,
            rng,
            model: Arc::clone(&self.model),
        }
    }

    pub(crate) fn replace_matrix(&mut self, matrix: SeqMatrix) {
        self.matrix = matrix;
    }

    #[inline]
    pub fn matrix(&self) -> &SeqMatrix {
        &self.matrix
    }

    pub fn into_matrix(self) -> SeqMatrix {
        self.matrix
    }

    #[inline]
    pub fn numseqs(&self) -> usize {
        self.matrix.nrows()
    }

    #[inline]
    pub fn seqlen(&self) -> usize {
        self.matrix.ncols()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.numseqs()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.matrix.is_empty()
    }

    pub fn energy_model(&self) -> &Arc<EnergyModel> {
        &self.model
    }

    pub fn rng_mut(&mut self) -> &mut RandomSource {
        &mut self.rng
    }

    pub fn get_row(&self, index: usize) -> Result<&[u8], DesignError> {
        if index >= self.numseqs() {
            return Err(DesignError::OutOfBounds {
                index,
                len: self.numseqs(),
            });
        }
        Ok(self.matrix.row(index))
    }

    pub fn get(&self, index: usize) -> Result<String, DesignError> {
        Ok(alphabet::decode(self.get_row(index)?)?)
    }

    pub fn slice(&self, range: Range<usize>) -> Result<Vec<String>, DesignError> {
        if range.start > range.end || range.end > self.numseqs() {
            return Err(DesignError::OutOfBounds {
                index: range.end,
                len: self.numseqs(),
            });
        }
        range.map(|i| self.get(i)).collect()
    }

    pub fn to_list(&self) -> Vec<String> {
        self.matrix
            .rows()
            .map(|row| alphabet::decode(row).unwrap_or_default())
            .collect()
    }

    pub fn append(&mut self, sequence: &str) -> Result<(), DesignError> {
        let row = alphabet::encode(sequence)?;
        self.append_row(&row)
    }

    pub fn append_row(&mut self, row: &[u8]) -> Result<(), DesignError> {
        self.matrix.push_row(row)?;
        Ok(())
    }

    /// Removes and returns the last sequence.
    pub fn pop(&mut self) -> Result<String, DesignError> {
        let row = self.pop_row()?;
        Ok(alphabet::decode(&row)?)
    }

    pub fn pop_row(&mut self) -> Result<Vec<u8>, DesignError> {
        self.matrix
            .pop_row()
            .ok_or(DesignError::OutOfBounds { index: 0, len: 0 })
    }

    pub fn shuffle(&mut self) {
        self.matrix.shuffle_rows(&mut self.rng);
    }

    /// Exact membership: same length and every symbol equal.
    pub fn contains(&self, sequence: &str) -> bool {
        match alphabet::encode(sequence) {
            Ok(row) => self.matrix.contains_row(&row),
            Err(_) => false,
        }
    }

    /// Minimum Hamming distance from `row` to any member, or `None` for an empty set.
    pub fn hamming_min(&self, row: &[u8]) -> Option<usize> {
        self.matrix
            .rows()
            .map(|member| super::filters::hamming_distance(member, row))
            .min()
    }

    /// Duplex energy of every sequence with its complement.
    pub fn energies(&self, temperature: f64) -> Vec<f64> {
        self.model.duplex_energies(&self.matrix, temperature, false)
    }

    pub fn energies_cached(&self, temperature: f64, cache: &BatchEnergyCache) -> Arc<Vec<f64>> {
        self.model
            .duplex_energies_cached(&self.matrix, temperature, false, cache)
    }

    pub fn wc_energy(&self, index: usize, temperature: f64) -> Result<f64, DesignError> {
        let row = self.get_row(index)?;
        Ok(self.model.duplex_energy(row, temperature))
    }

    /// Turns an empty set into [`DesignError::EmptyResult`] carrying `context`.
    pub fn require_nonempty(self, context: impl Into<String>) -> Result<Self, DesignError> {
        if self.is_empty() {
            return Err(DesignError::EmptyResult(context.into()));
        }
        Ok(self)
    }
}

impl fmt::Display for SequenceSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.numseqs();
        let shown: Vec<String> = if n <= DISPLAY_LIMIT {
            self.to_list()
        } else {
            let head = (0..3).filter_map(|i| self.get(i).ok());
            let tail = (n - 3..n).filter_map(|i| self.get(i).ok());
            head.chain(std::iter::once("...".to_string()))
                .chain(tail)
                .collect()
        };
        write!(f, "{}", shown.join(","))
    }
}

/// Every sequence of `length` over `alphabet`, in lexicographic code order.
///
/// Filled column by column: only the output matrix and one column buffer are
/// alive at any time.
#[instrument(level = "debug", skip(alphabet), fields(alphabet = %alphabet))]
pub fn enumerate_all(length: usize, alphabet: &Alphabet) -> Result<SeqMatrix, ConfigError> {
    let codes = alphabet.codes();
    let k = codes.len();
    let too_many = ConfigError::TooManySequences {
        alphabet_size: k,
        length,
    };
    let exponent = u32::try_from(length).map_err(|_| too_many.clone())?;
    let numseqs = k.checked_pow(exponent).ok_or_else(|| too_many.clone())?;
    numseqs.checked_mul(length).ok_or(too_many)?;

    let mut matrix = SeqMatrix::zeros(numseqs, length);
    let mut column = vec![0u8; numseqs];
    for col in 0..length {
        let run = k.pow((length - 1 - col) as u32);
        for (row, slot) in column.iter_mut().enumerate() {
            *slot = codes[(row / run) % k];
        }
        matrix.set_column(col, &column);
    }

    info!(numseqs, length, "Enumerated all sequences.");
    Ok(matrix)
}

/// `count` rows drawn uniformly with replacement, then sorted and deduplicated.
///
/// The result may hold fewer than `count` rows.
pub fn sample_random<R: Rng + ?Sized>(
    length: usize,
    count: usize,
    alphabet: &Alphabet,
    rng: &mut R,
) -> Result<SeqMatrix, ConfigError> {
    let codes = alphabet.codes();
    if codes.len() < 2 {
        return Err(ConfigError::SingleSymbolAlphabet);
    }
    let cells = count
        .checked_mul(length)
        .ok_or(ConfigError::TooManySequences {
            alphabet_size: codes.len(),
            length,
        })?;

    let data: Vec<u8> = (0..cells)
        .map(|_| codes[rng.gen_range(0..codes.len())])
        .collect();
    let mut matrix = SeqMatrix::from_raw_parts(count, length, data);
    matrix.sort_dedup_rows();

    debug!(
        requested = count,
        unique = matrix.nrows(),
        "Sampled random sequences."
    );
    Ok(matrix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::SequenceSetConfigBuilder;
    use tempfile::tempdir;

    fn set_of(seqs: &[&str]) -> SequenceSet {
        SequenceSet::from_strings(seqs).unwrap()
    }

    #[test]
    fn enumeration_yields_every_sequence_in_increasing_order() {
        for (symbols, length) in [("ACGT", 3), ("AT", 4), ("CGT", 2), ("G", 3)] {
            let alphabet: Alphabet = symbols.parse().unwrap();
            let m = enumerate_all(length, &alphabet).unwrap();
            assert_eq!(m.nrows(), alphabet.len().pow(length as u32));
            assert!(m.rows().collect::<Vec<_>>().windows(2).all(|w| w[0] < w[1]));
            assert!(m.as_slice().iter().all(|&c| alphabet.contains(c)));
        }
    }

    #[test]
    fn enumeration_of_length_three_matches_index_order() {
        let set = SequenceSet::all(3).unwrap();
        assert_eq!(set.numseqs(), 64);
        for i in 0..64 {
            assert_eq!(set.get(i).unwrap(), alphabet::index_to_sequence(i as u64, 3));
        }
    }

    #[test]
    fn enumeration_rejects_overflowing_sizes() {
        let result = enumerate_all(64, &Alphabet::full());
        assert!(matches!(result, Err(ConfigError::TooManySequences { .. })));
    }

    #[test]
    fn sampling_is_sorted_unique_and_bounded_by_count() {
        let mut rng = RandomSource::seed_from_u64(9);
        let m = sample_random(3, 200, &Alphabet::full(), &mut rng).unwrap();
        assert!(m.nrows() <= 64);
        assert!(m.nrows() > 0);
        assert!(m.rows().collect::<Vec<_>>().windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn sampling_with_same_seed_is_reproducible() {
        let build = || {
            SequenceSet::from_config(
                SequenceSetConfigBuilder::new()
                    .length(8)
                    .sample_count(50)
                    .seed(123)
                    .build()
                    .unwrap(),
            )
            .unwrap()
        };
        assert_eq!(build().matrix(), build().matrix());
    }

    #[test]
    fn construction_from_file_round_trips() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("seqs.txt");
        let original = set_of(&["ACGT", "TTGA"]);
        original.write_to_path(&path).unwrap();

        let config = SequenceSetConfigBuilder::new()
            .source_file(path)
            .build()
            .unwrap();
        let loaded = SequenceSet::from_config(config).unwrap();
        assert_eq!(loaded.to_list(), vec!["ACGT", "TTGA"]);
    }

    #[test]
    fn construction_from_mismatched_list_fails() {
        let result = SequenceSet::from_strings(&["ACG", "AC"]);
        assert!(matches!(result, Err(DesignError::Codec(_))));
    }

    #[test]
    fn append_and_pop_track_numseqs() {
        let mut set = set_of(&["AAAA", "CCCC"]);
        set.append("GGGG").unwrap();
        assert_eq!(set.numseqs(), 3);
        assert_eq!(set.pop().unwrap(), "GGGG");
        assert_eq!(set.pop().unwrap(), "CCCC");
        assert_eq!(set.numseqs(), 1);
        assert!(set.append("GGG").is_err());
    }

    #[test]
    fn pop_on_empty_set_is_out_of_bounds() {
        let mut set = set_of(&["AC"]);
        set.pop().unwrap();
        assert!(matches!(set.pop(), Err(DesignError::OutOfBounds { .. })));
    }

    #[test]
    fn get_out_of_range_is_out_of_bounds() {
        let set = set_of(&["AC", "GT"]);
        assert!(matches!(
            set.get(2),
            Err(DesignError::OutOfBounds { index: 2, len: 2 })
        ));
        assert!(set.slice(1..3).is_err());
        assert_eq!(set.slice(0..2).unwrap(), vec!["AC", "GT"]);
    }

    #[test]
    fn contains_is_exact_match_only() {
        let set = set_of(&["ACGT", "TTTT"]);
        assert!(set.contains("ACGT"));
        assert!(set.contains("acgt"));
        assert!(!set.contains("CGT"));
        assert!(!set.contains("ACGTA"));
        assert!(!set.contains("ACGN"));
    }

    #[test]
    fn shuffle_keeps_the_same_members() {
        let mut set = SequenceSet::from_config(
            SequenceSetConfigBuilder::new()
                .length(3)
                .seed(5)
                .build()
                .unwrap(),
        )
        .unwrap();
        let mut before = set.to_list();
        set.shuffle();
        let mut after = set.to_list();
        assert_ne!(before, after);
        before.sort();
        after.sort();
        assert_eq!(before, after);
    }

    #[test]
    fn hamming_min_finds_closest_member() {
        let set = set_of(&["AAAA", "ACGT"]);
        assert_eq!(set.hamming_min(&alphabet::encode("ACGA").unwrap()), Some(1));
    }

    #[test]
    fn wc_energy_matches_batched_energies() {
        let set = set_of(&["ACGTAC", "GGCCAA"]);
        let energies = set.energies(37.0);
        assert_eq!(set.wc_energy(1, 37.0).unwrap(), energies[1]);
    }

    #[test]
    fn display_abbreviates_large_sets() {
        assert_eq!(set_of(&["AC", "GT"]).to_string(), "AC,GT");
        let big = SequenceSet::all(4).unwrap();
        assert_eq!(big.to_string(), "AAAA,AAAC,AAAG,...,TTTC,TTTG,TTTT");
    }

    #[test]
    fn require_nonempty_reports_context() {
        let mut set = set_of(&["AC"]);
        set.pop().unwrap();
        let err = set.require_nonempty("energy bound").unwrap_err();
        assert!(matches!(err, DesignError::EmptyResult(ref c) if c == "energy bound"));
    }
}
