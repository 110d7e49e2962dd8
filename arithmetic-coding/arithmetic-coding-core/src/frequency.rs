//! Static per-sequence frequency model.

use crate::Model;

/// The largest alphabet a [`FrequencyTable`] supports; symbols are `u16`.
const MAX_ALPHABET: usize = 1 << 16;

/// Occurrence counts for every symbol of a fixed alphabet `0..alphabet_size`,
/// together with their cumulative boundaries.
///
/// The boundaries are built in ascending symbol order: symbol `s` owns
/// `cumulative[s]..cumulative[s + 1]`, `cumulative[0] == 0` and the last
/// boundary is the total count. Symbols that never occur keep a zero count
/// and an empty share.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: Vec<u64>,
    cumulative: Vec<u64>,
}

/// Errors building a [`FrequencyTable`], or looking a symbol up in one
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FrequencyError {
    /// There is nothing to count
    #[error("cannot build a frequency table from an empty sequence")]
    EmptySequence,

    /// The alphabet has no symbols
    #[error("the alphabet must hold at least one symbol")]
    EmptyAlphabet,

    /// The alphabet has more symbols than a `u16` can name
    #[error("an alphabet of {0} symbols exceeds the limit of {MAX_ALPHABET}")]
    AlphabetTooLarge(usize),

    /// A symbol is not part of the alphabet
    #[error("symbol {symbol} is outside the alphabet of {alphabet_size} symbols")]
    SymbolOutOfRange {
        /// The offending symbol
        symbol: u16,
        /// Number of symbols in the alphabet
        alphabet_size: usize,
    },

    /// Every count is zero
    #[error("every count in the frequency table is zero")]
    ZeroTotal,

    /// The counts add up to more than a `u64` holds
    #[error("the total count overflows")]
    TotalOverflow,
}

impl FrequencyTable {
    /// Count the occurrences of every symbol in `symbols`.
    ///
    /// # Errors
    ///
    /// - [`FrequencyError::EmptyAlphabet`] / [`FrequencyError::AlphabetTooLarge`]
    ///   if `alphabet_size` is not in `1..=65536`
    /// - [`FrequencyError::SymbolOutOfRange`] if a symbol is not below
    ///   `alphabet_size`
    /// - [`FrequencyError::EmptySequence`] if `symbols` is empty
    pub fn from_symbols(
        symbols: impl IntoIterator<Item = u16>,
        alphabet_size: usize,
    ) -> Result<Self, FrequencyError> {
        check_alphabet(alphabet_size)?;

        let mut counts = vec![0u64; alphabet_size];
        for symbol in symbols {
            let count = counts
                .get_mut(usize::from(symbol))
                .ok_or(FrequencyError::SymbolOutOfRange {
                    symbol,
                    alphabet_size,
                })?;
            *count += 1;
        }

        Self::from_counts(counts).map_err(|e| match e {
            FrequencyError::ZeroTotal => FrequencyError::EmptySequence,
            e => e,
        })
    }

    /// Rebuild a table from explicit counts, one per symbol in ascending
    /// order.
    ///
    /// # Errors
    ///
    /// - [`FrequencyError::EmptyAlphabet`] / [`FrequencyError::AlphabetTooLarge`]
    ///   if `counts.len()` is not in `1..=65536`
    /// - [`FrequencyError::ZeroTotal`] if all counts are zero
    /// - [`FrequencyError::TotalOverflow`] if the counts do not fit a `u64`
    pub fn from_counts(counts: Vec<u64>) -> Result<Self, FrequencyError> {
        check_alphabet(counts.len())?;

        let mut cumulative = Vec::with_capacity(counts.len() + 1);
        let mut total = 0u64;
        cumulative.push(total);
        for &count in &counts {
            total = total
                .checked_add(count)
                .ok_or(FrequencyError::TotalOverflow)?;
            cumulative.push(total);
        }
        if total == 0 {
            return Err(FrequencyError::ZeroTotal);
        }

        Ok(Self { counts, cumulative })
    }

    /// Number of symbols in the alphabet, including those that never occur.
    #[must_use]
    pub fn alphabet_size(&self) -> usize {
        self.counts.len()
    }

    /// Sum of all counts, i.e. the length of the counted sequence.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.cumulative[self.counts.len()]
    }

    /// The count of `symbol`, zero for symbols outside the alphabet.
    #[must_use]
    pub fn count(&self, symbol: u16) -> u64 {
        self.counts.get(usize::from(symbol)).copied().unwrap_or(0)
    }

    /// All counts in ascending symbol order
    #[must_use]
    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    /// The `alphabet_size + 1` cumulative boundaries
    #[must_use]
    pub fn cumulative(&self) -> &[u64] {
        &self.cumulative
    }

    /// `(symbol, count)` pairs in ascending symbol order, zero counts
    /// included.
    #[allow(clippy::cast_possible_truncation)]
    pub fn iter(&self) -> impl Iterator<Item = (u16, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .map(|(symbol, &count)| (symbol as u16, count))
    }

    /// The information content, in decimal digits, of the sequence this
    /// table was counted from: `Σ count × log10(total / count)`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn information_digits(&self) -> f64 {
        let total = self.total() as f64;
        self.counts
            .iter()
            .filter(|&&count| count > 0)
            .map(|&count| {
                let count = count as f64;
                count * (total / count).log10()
            })
            .sum()
    }
}

fn check_alphabet(alphabet_size: usize) -> Result<(), FrequencyError> {
    match alphabet_size {
        0 => Err(FrequencyError::EmptyAlphabet),
        n if n > MAX_ALPHABET => Err(FrequencyError::AlphabetTooLarge(n)),
        _ => Ok(()),
    }
}

impl Model for FrequencyTable {
    type Symbol = u16;
    type ValueError = FrequencyError;

    fn index(&self, symbol: &u16) -> Result<usize, FrequencyError> {
        let index = usize::from(*symbol);
        if index < self.counts.len() {
            Ok(index)
        } else {
            Err(FrequencyError::SymbolOutOfRange {
                symbol: *symbol,
                alphabet_size: self.counts.len(),
            })
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn symbol(&self, index: usize) -> u16 {
        index as u16
    }

    fn cut_points(&self) -> &[u64] {
        &self.cumulative
    }
}
