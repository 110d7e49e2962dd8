//! The textual codestream: the encoded value followed by the frequency table.
//!
//! ```text
//! 0.107421875
//! 0 1
//! 1 1
//! 2 1
//! 3 1
//! ```
//!
//! The first line holds the value as a plain decimal with every digit. Each
//! following line holds `<symbol> <count>`, one per symbol of the alphabet in
//! ascending order starting at `0`, zero counts included.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use graycode_arithmetic::{EncodedValue, FrequencyError, FrequencyTable, ParseValueError};

/// Errors reading a [`Codestream`]
#[derive(Debug, thiserror::Error)]
pub enum CodestreamError {
    #[error("IO error")]
    Io(#[from] io::Error),

    #[error("codestream is empty")]
    MissingValue,

    #[error("line 1: invalid encoded value")]
    Value(#[source] ParseValueError),

    #[error("line {line}: expected `<symbol> <count>`, found `{text}`")]
    MalformedEntry { line: usize, text: String },

    #[error("line {line}: expected symbol {expected}, found {found}; symbols must be contiguous and ascending from 0")]
    UnexpectedSymbol {
        line: usize,
        expected: u64,
        found: u64,
    },

    #[error("invalid frequency table")]
    Frequency(#[from] FrequencyError),
}

/// An encoded image: the representative value and the frequency table
/// needed to decode it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Codestream {
    value: EncodedValue,
    table: FrequencyTable,
}

impl Codestream {
    pub fn new(value: EncodedValue, table: FrequencyTable) -> Self {
        Self { value, table }
    }

    pub fn value(&self) -> &EncodedValue {
        &self.value
    }

    pub fn table(&self) -> &FrequencyTable {
        &self.table
    }

    pub fn into_parts(self) -> (EncodedValue, FrequencyTable) {
        (self.value, self.table)
    }

    /// Write the codestream text.
    ///
    /// # Errors
    ///
    /// Returns any error of the writer.
    pub fn write_to<W: Write>(&self, mut writer: W) -> io::Result<()> {
        writeln!(writer, "{}", self.value)?;
        for (symbol, count) in self.table.iter() {
            writeln!(writer, "{symbol} {count}")?;
        }
        writer.flush()
    }

    /// Parse codestream text.
    ///
    /// The value may also be written in exponent notation (`1.25E-7`).
    /// Blank lines are ignored.
    ///
    /// # Errors
    ///
    /// Returns a [`CodestreamError`] if the value is not a decimal in
    /// `[0, 1)`, an entry is malformed or out of order, or the counts do not
    /// form a valid [`FrequencyTable`].
    pub fn read_from<R: BufRead>(reader: R) -> Result<Self, CodestreamError> {
        let mut lines = reader
            .lines()
            .enumerate()
            .map(|(index, line)| line.map(|text| (index + 1, text)));

        let value = loop {
            match lines.next().transpose()? {
                None => return Err(CodestreamError::MissingValue),
                Some((_, text)) if text.trim().is_empty() => continue,
                Some((_, text)) => break text.trim().parse().map_err(CodestreamError::Value)?,
            }
        };

        let mut counts = Vec::new();
        for entry in lines {
            let (line, text) = entry?;
            if text.trim().is_empty() {
                continue;
            }
            let (symbol, count) = parse_entry(&text)
                .ok_or_else(|| CodestreamError::MalformedEntry {
                    line,
                    text: text.clone(),
                })?;
            let expected = counts.len() as u64;
            if symbol != expected {
                return Err(CodestreamError::UnexpectedSymbol {
                    line,
                    expected,
                    found: symbol,
                });
            }
            counts.push(count);
        }

        let table = FrequencyTable::from_counts(counts)?;
        log::debug!(
            "read codestream of {} symbols over an alphabet of {}",
            table.total(),
            table.alphabet_size()
        );
        Ok(Self { value, table })
    }

    /// Write the codestream to a file on disk.
    ///
    /// # Errors
    ///
    /// Returns any error creating or writing the file.
    pub fn save(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let file = File::create(path)?;
        self.write_to(BufWriter::new(file))
    }

    /// Read a codestream file from disk.
    ///
    /// # Errors
    ///
    /// See [`Codestream::read_from`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CodestreamError> {
        let file = File::open(path)?;
        Self::read_from(BufReader::new(file))
    }
}

fn parse_entry(text: &str) -> Option<(u64, u64)> {
    let mut fields = text.split_whitespace();
    let symbol = fields.next()?.parse().ok()?;
    let count = fields.next()?.parse().ok()?;
    match fields.next() {
        Some(_) => None,
        None => Some((symbol, count)),
    }
}
