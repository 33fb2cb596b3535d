use super::traits::SequenceFile;
use crate::core::alphabet::{self, CodecError};
use crate::core::matrix::SeqMatrix;
use std::io::{self, BufRead, Write};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SeqFileError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Invalid header on line 1: {kind}")]
    Header { kind: HeaderErrorKind },
    #[error("Parse error on line {line}: {source}")]
    Sequence {
        line: usize,
        #[source]
        source: CodecError,
    },
    #[error("Sequence on line {line} has length {found}, header declares {expected}")]
    LengthMismatch {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("Header declares {expected} sequences but {found} were found")]
    CountMismatch { expected: usize, found: usize },
    #[error("Could not encode row {row} for writing: {source}")]
    Encode {
        row: usize,
        #[source]
        source: CodecError,
    },
}

#[derive(Debug, Error)]
pub enum HeaderErrorKind {
    #[error("file is empty")]
    Missing,
    #[error("expected exactly two fields `numseqs seqlen`, found {0}")]
    FieldCount(usize),
    #[error("invalid integer '{0}'")]
    InvalidInt(String),
}

/// Plain-text sequence list.
///
/// ```text
/// numseqs seqlen
/// seq1
/// seq2
/// ...
/// ```
///
/// The header is exactly two whitespace-separated integers. Reading is strict:
/// a header with any other field count, a line of the wrong length, or a
/// sequence count that disagrees with the header is rejected. Blank lines are
/// ignored.
pub struct SeqListFile;

fn parse_header(line: &str) -> Result<(usize, usize), SeqFileError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    let [numseqs, seqlen] = fields[..] else {
        return Err(SeqFileError::Header {
            kind: HeaderErrorKind::FieldCount(fields.len()),
        });
    };
    let parse = |s: &str| {
        s.parse::<usize>().map_err(|_| SeqFileError::Header {
            kind: HeaderErrorKind::InvalidInt(s.to_string()),
        })
    };
    Ok((parse(numseqs)?, parse(seqlen)?))
}

impl SequenceFile for SeqListFile {
    type Error = SeqFileError;

    fn read_from(reader: &mut impl BufRead) -> Result<SeqMatrix, Self::Error> {
        let mut lines = reader.lines().enumerate();

        let header = loop {
            match lines.next() {
                Some((_, line)) => {
                    let line = line?;
                    if !line.trim().is_empty() {
                        break line;
                    }
                }
                None => {
                    return Err(SeqFileError::Header {
                        kind: HeaderErrorKind::Missing,
                    });
                }
            }
        };
        let (numseqs, seqlen) = parse_header(&header)?;

        let mut matrix = SeqMatrix::empty(seqlen);
        let mut found = 0;
        for (line_num, line) in lines {
            let line = line?;
            let line_num = line_num + 1;
            let sequence = line.trim();
            if sequence.is_empty() {
                continue;
            }
            found += 1;
            if found > numseqs {
                continue;
            }
            let row = alphabet::encode(sequence).map_err(|source| SeqFileError::Sequence {
                line: line_num,
                source,
            })?;
            if row.len() != seqlen {
                return Err(SeqFileError::LengthMismatch {
                    line: line_num,
                    expected: seqlen,
                    found: row.len(),
                });
            }
            matrix
                .push_row(&row)
                .map_err(|source| SeqFileError::Sequence {
                    line: line_num,
                    source,
                })?;
        }

        if found != numseqs {
            return Err(SeqFileError::CountMismatch {
                expected: numseqs,
                found,
            });
        }
        Ok(matrix)
    }

    fn write_to(matrix: &SeqMatrix, writer: &mut impl Write) -> Result<(), Self::Error> {
        writeln!(writer, "{} {}", matrix.nrows(), matrix.ncols())?;
        for (row_idx, row) in matrix.rows().enumerate() {
            let sequence = alphabet::decode(row).map_err(|source| SeqFileError::Encode {
                row: row_idx,
                source,
            })?;
            writeln!(writer, "{}", sequence)?;
        }
        Ok(())
    }
}
