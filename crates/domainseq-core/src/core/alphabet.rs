use super::matrix::SeqMatrix;
use phf::phf_map;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Number of symbols in the fixed alphabet.
pub const ALPHABET_SIZE: usize = 4;

pub const CODE_A: u8 = 0b00;
pub const CODE_C: u8 = 0b01;
pub const CODE_G: u8 = 0b10;
pub const CODE_T: u8 = 0b11;

const CODE_TO_SYMBOL: [char; ALPHABET_SIZE] = ['A', 'C', 'G', 'T'];

static SYMBOL_TO_CODE: phf::Map<char, u8> = phf_map! {
    'A' => CODE_A, 'C' => CODE_C, 'G' => CODE_G, 'T' => CODE_T,
    'a' => CODE_A, 'c' => CODE_C, 'g' => CODE_G, 't' => CODE_T,
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("Invalid symbol '{0}': expected one of A, C, G, T (case-insensitive)")]
    InvalidSymbol(char),
    #[error("Invalid code {0}: codes must be in 0..=3")]
    InvalidCode(u8),
    #[error("Sequence {index} has length {found}, expected {expected} (all sequences must be equal length)")]
    LengthMismatch {
        index: usize,
        expected: usize,
        found: usize,
    },
}

#[inline]
pub fn symbol_to_code(symbol: char) -> Result<u8, CodecError> {
    SYMBOL_TO_CODE
        .get(&symbol)
        .copied()
        .ok_or(CodecError::InvalidSymbol(symbol))
}

#[inline]
pub fn code_to_symbol(code: u8) -> Result<char, CodecError> {
    CODE_TO_SYMBOL
        .get(code as usize)
        .copied()
        .ok_or(CodecError::InvalidCode(code))
}

/// Watson-Crick partner of a code (A <-> T, C <-> G).
#[inline(always)]
pub const fn complement(code: u8) -> u8 {
    (ALPHABET_SIZE as u8 - 1) - code
}

/// The two symbols that pair through three hydrogen bonds.
#[inline(always)]
pub const fn is_strong(code: u8) -> bool {
    code == CODE_C || code == CODE_G
}

/// The two symbols that pair through two hydrogen bonds.
#[inline(always)]
pub const fn is_weak(code: u8) -> bool {
    code == CODE_A || code == CODE_T
}

pub fn encode(sequence: &str) -> Result<Vec<u8>, CodecError> {
    let mut row = Vec::with_capacity(sequence.len());
    for symbol in sequence.chars() {
        row.push(symbol_to_code(symbol)?);
    }
    Ok(row)
}

pub fn decode(row: &[u8]) -> Result<String, CodecError> {
    let mut sequence = String::with_capacity(row.len());
    for &code in row {
        sequence.push(code_to_symbol(code)?);
    }
    Ok(sequence)
}

/// Encodes equal-length strings into a row-major code matrix.
///
/// An empty input yields a 0x0 matrix.
pub fn encode_batch<S: AsRef<str>>(sequences: &[S]) -> Result<SeqMatrix, CodecError> {
    let Some(first) = sequences.first() else {
        return Ok(SeqMatrix::empty(0));
    };
    let seqlen = first.as_ref().chars().count();
    let mut data = Vec::with_capacity(seqlen * sequences.len());

    for (index, sequence) in sequences.iter().enumerate() {
        let sequence = sequence.as_ref();
        let found = sequence.chars().count();
        if found != seqlen {
            return Err(CodecError::LengthMismatch {
                index,
                expected: seqlen,
                found,
            });
        }
        for symbol in sequence.chars() {
            data.push(symbol_to_code(symbol)?);
        }
    }

    Ok(SeqMatrix::from_raw_parts(sequences.len(), seqlen, data))
}

/// Returns the lexicographic `index`-th sequence of `length` over the full alphabet.
pub fn index_to_sequence(mut index: u64, length: usize) -> String {
    let mut symbols = vec!['A'; length];
    for slot in symbols.iter_mut().rev() {
        *slot = CODE_TO_SYMBOL[(index & 0b11) as usize];
        index >>= 2;
    }
    symbols.into_iter().collect()
}

/// A subset of the fixed alphabet used to restrict enumeration and sampling.
///
/// Codes are kept sorted ascending and deduplicated, so enumeration over an
/// alphabet is always in lexicographic code order regardless of how the
/// symbols were listed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Alphabet {
    codes: Vec<u8>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AlphabetError {
    #[error("Alphabet cannot be empty")]
    Empty,
    #[error("Alphabet must be a subset of {{A, C, G, T}}; '{0}' is not allowed")]
    NotSubset(char),
}

impl Alphabet {
    pub fn full() -> Self {
        Self {
            codes: vec![CODE_A, CODE_C, CODE_G, CODE_T],
        }
    }

    pub fn from_symbols<I>(symbols: I) -> Result<Self, AlphabetError>
    where
        I: IntoIterator<Item = char>,
    {
        let mut codes = Vec::with_capacity(ALPHABET_SIZE);
        for symbol in symbols {
            let code = symbol_to_code(symbol).map_err(|_| AlphabetError::NotSubset(symbol))?;
            codes.push(code);
        }
        codes.sort_unstable();
        codes.dedup();
        if codes.is_empty() {
            return Err(AlphabetError::Empty);
        }
        Ok(Self { codes })
    }

    #[inline]
    pub fn codes(&self) -> &[u8] {
        &self.codes
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn contains(&self, code: u8) -> bool {
        self.codes.contains(&code)
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self::full()
    }
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &code in &self.codes {
            write!(f, "{}", CODE_TO_SYMBOL[code as usize])?;
        }
        Ok(())
    }
}

impl std::str::FromStr for Alphabet {
    type Err = AlphabetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_symbols(s.chars())
    }
}

impl TryFrom<String> for Alphabet {
    type Error = AlphabetError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Alphabet> for String {
    fn from(value: Alphabet) -> Self {
        value.to_string()
    }
}
