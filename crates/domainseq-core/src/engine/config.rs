use crate::core::alphabet::{Alphabet, AlphabetError};
use crate::core::matrix::SeqMatrix;
use crate::core::thermo::model::EnergyModel;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Random source owned by every sequence set.
pub type RandomSource = Xoshiro256PlusPlus;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Exactly one of length, source_list, source_matrix or source_file may be specified; got {}", .0.join(", "))]
    MultipleSources(Vec<&'static str>),

    #[error("One of length, source_list, source_matrix or source_file must be specified")]
    MissingSource,

    #[error("Option '{0}' is only valid together with 'length'")]
    OptionRequiresLength(&'static str),

    #[error("Invalid alphabet: {0}")]
    Alphabet(#[from] AlphabetError),

    #[error("Random sampling requires an alphabet of at least two symbols")]
    SingleSymbolAlphabet,

    #[error("source_list must contain at least one sequence")]
    EmptySourceList,

    #[error("Enumerating all sequences of length {length} over {alphabet_size} symbols overflows memory addressing")]
    TooManySequences { alphabet_size: usize, length: usize },

    #[error("Forbidden substring list cannot be empty")]
    EmptySubstringList,

    #[error("All forbidden substrings must be equal length; found lengths {0:?}")]
    MixedSubstringLengths(Vec<usize>),

    #[error("Forbidden substrings of length {length} exceed the supported maximum of {max}")]
    SubstringTooLong { length: usize, max: usize },
}

/// Where the rows of a new set come from.
#[derive(Debug, Clone, PartialEq)]
pub enum SetSource {
    /// Every sequence of `length` over `alphabet`, in lexicographic code order.
    Enumerate { length: usize, alphabet: Alphabet },
    /// `count` uniform draws with replacement, then sorted and deduplicated.
    Sample {
        length: usize,
        alphabet: Alphabet,
        count: usize,
    },
    List(Vec<String>),
    Matrix(SeqMatrix),
    File(PathBuf),
}

#[derive(Debug, Clone)]
pub struct SequenceSetConfig {
    pub source: SetSource,
    pub random_source: RandomSource,
    pub shuffle: bool,
    pub energy_model: Arc<EnergyModel>,
}

#[derive(Default)]
pub struct SequenceSetConfigBuilder {
    length: Option<usize>,
    alphabet: Option<Alphabet>,
    sample_count: Option<usize>,
    source_list: Option<Vec<String>>,
    source_matrix: Option<SeqMatrix>,
    source_file: Option<PathBuf>,
    random_source: Option<RandomSource>,
    shuffle: bool,
    energy_model: Option<Arc<EnergyModel>>,
}

impl SequenceSetConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn length(mut self, length: usize) -> Self {
        self.length = Some(length);
        self
    }
    pub fn alphabet(mut self, alphabet: Alphabet) -> Self {
        self.alphabet = Some(alphabet);
        self
    }
    pub fn sample_count(mut self, count: usize) -> Self {
        self.sample_count = Some(count);
        self
    }
    pub fn source_list<S: Into<String>>(mut self, sequences: impl IntoIterator<Item = S>) -> Self {
        self.source_list = Some(sequences.into_iter().map(Into::into).collect());
        self
    }
    pub fn source_matrix(mut self, matrix: SeqMatrix) -> Self {
        self.source_matrix = Some(matrix);
        self
    }
    pub fn source_file(mut self, path: PathBuf) -> Self {
        self.source_file = Some(path);
        self
    }
    pub fn random_source(mut self, rng: RandomSource) -> Self {
        self.random_source = Some(rng);
        self
    }
    pub fn seed(self, seed: u64) -> Self {
        self.random_source(RandomSource::seed_from_u64(seed))
    }
    pub fn shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }
    pub fn energy_model(mut self, model: Arc<EnergyModel>) -> Self {
        self.energy_model = Some(model);
        self
    }

    pub fn build(self) -> Result<SequenceSetConfig, ConfigError> {
        let supplied: Vec<&'static str> = [
            ("length", self.length.is_some()),
            ("source_list", self.source_list.is_some()),
            ("source_matrix", self.source_matrix.is_some()),
            ("source_file", self.source_file.is_some()),
        ]
        .into_iter()
        .filter_map(|(name, present)| present.then_some(name))
        .collect();

        if supplied.len() > 1 {
            return Err(ConfigError::MultipleSources(supplied));
        }

        let source = match (
            self.length,
            self.source_list,
            self.source_matrix,
            self.source_file,
        ) {
            (Some(length), None, None, None) => {
                let alphabet = self.alphabet.unwrap_or_default();
                match self.sample_count {
                    Some(count) => {
                        if alphabet.len() < 2 {
                            return Err(ConfigError::SingleSymbolAlphabet);
                        }
                        SetSource::Sample {
                            length,
                            alphabet,
                            count,
                        }
                    }
                    None => SetSource::Enumerate { length, alphabet },
                }
            }
            (None, list, matrix, file) => {
                if self.alphabet.is_some() {
                    return Err(ConfigError::OptionRequiresLength("alphabet"));
                }
                if self.sample_count.is_some() {
                    return Err(ConfigError::OptionRequiresLength("sample_count"));
                }
                match (list, matrix, file) {
                    (Some(list), None, None) => {
                        if list.is_empty() {
                            return Err(ConfigError::EmptySourceList);
                        }
                        SetSource::List(list)
                    }
                    (None, Some(matrix), None) => SetSource::Matrix(matrix),
                    (None, None, Some(path)) => SetSource::File(path),
                    _ => return Err(ConfigError::MissingSource),
                }
            }
            _ => return Err(ConfigError::MissingSource),
        };

        Ok(SequenceSetConfig {
            source,
            random_source: self
                .random_source
                .unwrap_or_else(RandomSource::from_entropy),
            shuffle: self.shuffle,
            energy_model: self.energy_model.unwrap_or_default(),
        })
    }
}
