use crate::core::matrix::SeqMatrix;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Defines the interface for persisting a set of equal-length sequences.
///
/// Implementors handle format-specific parsing and serialization of the
/// code matrix; path-based helpers are provided on top of the reader and
/// writer methods.
pub trait SequenceFile {
    /// The error type for I/O and parse failures.
    type Error: Error + From<io::Error>;

    /// Reads a code matrix from a buffered reader.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is malformed or reading fails.
    fn read_from(reader: &mut impl BufRead) -> Result<SeqMatrix, Self::Error>;

    /// Writes a code matrix to a writer.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_to(matrix: &SeqMatrix, writer: &mut impl Write) -> Result<(), Self::Error>;

    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<SeqMatrix, Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }

    fn write_to_path<P: AsRef<Path>>(matrix: &SeqMatrix, path: P) -> Result<(), Self::Error> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_to(matrix, &mut writer)?;
        writer.flush()?;
        Ok(())
    }
}
