//! Persistence of sequence sets.
//!
//! - [`traits`] - The [`traits::SequenceFile`] reader/writer interface
//! - [`seqlist`] - The plain-text `numseqs seqlen` list format

pub mod seqlist;
pub mod traits;
