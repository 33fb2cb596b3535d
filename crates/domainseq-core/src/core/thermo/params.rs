use crate::core::alphabet::{self, ALPHABET_SIZE};
use phf::phf_map;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Number of ordered dinucleotides, one per pair key `(first << 2) | second`.
pub const NUM_PAIRS: usize = ALPHABET_SIZE * ALPHABET_SIZE;

/// Enthalpy (kcal/mol) and entropy (cal/mol/K) of one nearest-neighbor stack.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct StackParam {
    pub enthalpy: f64,
    pub entropy: f64,
}

// Table 1 of SantaLucia & Hicks, Annu. Rev. Biophys. Biomol. Struct. 2004;33:415-40 (1 M Na+).
static SANTALUCIA_2004: phf::Map<&'static str, StackParam> = phf_map! {
    "AA" => StackParam { enthalpy: -7.6, entropy: -21.3 },
    "AC" => StackParam { enthalpy: -8.4, entropy: -22.4 },
    "AG" => StackParam { enthalpy: -7.8, entropy: -21.0 },
    "AT" => StackParam { enthalpy: -7.2, entropy: -20.4 },
    "CA" => StackParam { enthalpy: -8.5, entropy: -22.7 },
    "CC" => StackParam { enthalpy: -8.0, entropy: -19.9 },
    "CG" => StackParam { enthalpy: -10.6, entropy: -27.2 },
    "CT" => StackParam { enthalpy: -7.8, entropy: -21.0 },
    "GA" => StackParam { enthalpy: -8.2, entropy: -22.2 },
    "GC" => StackParam { enthalpy: -9.8, entropy: -24.4 },
    "GG" => StackParam { enthalpy: -8.0, entropy: -19.9 },
    "GT" => StackParam { enthalpy: -8.4, entropy: -22.4 },
    "TA" => StackParam { enthalpy: -7.2, entropy: -21.3 },
    "TC" => StackParam { enthalpy: -8.2, entropy: -22.2 },
    "TG" => StackParam { enthalpy: -8.5, entropy: -22.7 },
    "TT" => StackParam { enthalpy: -7.6, entropy: -21.3 },
};

#[derive(Debug, Error)]
pub enum ParamLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error("Invalid dinucleotide key '{0}' (expected two symbols from A, C, G, T)")]
    InvalidKey(String),
    #[error("Missing parameters for dinucleotide '{0}'")]
    MissingPair(String),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ParamFile {
    stacks: HashMap<String, StackParam>,
}

/// Dense nearest-neighbor stacking parameters indexed by pair key.
#[derive(Debug, Clone, PartialEq)]
pub struct NearestNeighborParams {
    stacks: [StackParam; NUM_PAIRS],
}

#[inline(always)]
pub const fn pair_key(first: u8, second: u8) -> usize {
    ((first as usize) << 2) | second as usize
}

fn pair_name(key: usize) -> String {
    let first = alphabet::code_to_symbol((key >> 2) as u8).unwrap_or('?');
    let second = alphabet::code_to_symbol((key & 0b11) as u8).unwrap_or('?');
    [first, second].iter().collect()
}

impl NearestNeighborParams {
    pub fn santalucia_2004() -> Self {
        let stacks = std::array::from_fn(|key| SANTALUCIA_2004[pair_name(key).as_str()]);
        Self { stacks }
    }

    pub fn load(path: &Path) -> Result<Self, ParamLoadError> {
        let content = std::fs::read_to_string(path).map_err(|e| ParamLoadError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        let file: ParamFile = toml::from_str(&content).map_err(|e| ParamLoadError::Toml {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        Self::from_map(&file.stacks)
    }

    fn from_map(map: &HashMap<String, StackParam>) -> Result<Self, ParamLoadError> {
        let mut stacks: [Option<StackParam>; NUM_PAIRS] = [None; NUM_PAIRS];
        for (name, param) in map {
            let codes = alphabet::encode(name).map_err(|_| ParamLoadError::InvalidKey(name.clone()))?;
            let [first, second] = codes[..] else {
                return Err(ParamLoadError::InvalidKey(name.clone()));
            };
            stacks[pair_key(first, second)] = Some(*param);
        }

        let mut dense = [StackParam {
            enthalpy: 0.0,
            entropy: 0.0,
        }; NUM_PAIRS];
        for (key, slot) in stacks.iter().enumerate() {
            dense[key] = slot.ok_or_else(|| ParamLoadError::MissingPair(pair_name(key)))?;
        }
        Ok(Self { stacks: dense })
    }

    #[inline]
    pub fn get(&self, key: usize) -> StackParam {
        self.stacks[key]
    }

    pub fn iter(&self) -> impl Iterator<Item = &StackParam> {
        self.stacks.iter()
    }
}

impl Default for NearestNeighborParams {
    fn default() -> Self {
        Self::santalucia_2004()
    }
}
