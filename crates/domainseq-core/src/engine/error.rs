use super::config::ConfigError;
use crate::core::alphabet::CodecError;
use crate::core::io::seqlist::SeqFileError;
use crate::core::thermo::params::ParamLoadError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DesignError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Sequence encoding error: {0}")]
    Codec(#[from] CodecError),

    #[error("Sequence file error: {0}")]
    File(#[from] SeqFileError),

    #[error("Parameter file error: {0}")]
    Params(#[from] ParamLoadError),

    #[error("No sequences remain: {0}")]
    EmptyResult(String),

    #[error("Index {index} is out of bounds for length {len}")]
    OutOfBounds { index: usize, len: usize },

    #[error("Paired batches must have equal row counts, found {left} and {right}")]
    RowCountMismatch { left: usize, right: usize },

    #[error("'{operation}' requires sequences of length at least {required}, found {found}")]
    SequenceTooShort {
        operation: &'static str,
        required: usize,
        found: usize,
    },
}
