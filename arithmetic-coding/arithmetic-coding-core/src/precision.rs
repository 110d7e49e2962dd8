use std::fmt;

use crate::{FrequencyTable, Model};

/// Digits kept on top of the information content and the per-step
/// rounding allowance.
const GUARD_DIGITS: u32 = 2;

/// The working precision of an encoder or decoder, in significant decimal
/// digits.
///
/// After every narrowing step both interval bounds are rounded to this many
/// significant digits. An encoder and the decoder reading its output must
/// use the same [`Precision`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Precision {
    digits: u32,
}

impl Precision {
    /// The smallest usable precision, a single significant digit.
    pub const MIN: Self = Self { digits: 1 };

    /// A precision of `digits` significant digits. Zero is raised to
    /// [`Precision::MIN`].
    #[must_use]
    pub const fn new(digits: u32) -> Self {
        if digits == 0 {
            Self::MIN
        } else {
            Self { digits }
        }
    }

    /// The number of significant decimal digits.
    #[must_use]
    pub const fn digits(self) -> u32 {
        self.digits
    }

    /// The precision needed to encode a message carrying
    /// `information_digits` of information (see [`information_digits`]) in
    /// `symbol_count` steps.
    ///
    /// Each step loses at most one unit in the last place on either bound,
    /// so on top of the information content the precision carries one digit
    /// per decade of `symbol_count` plus a small guard.
    #[must_use]
    pub fn required(information_digits: f64, symbol_count: u64) -> Self {
        let guard = decimal_digits(symbol_count) + GUARD_DIGITS;
        let information = information_digits.max(0.0).ceil();
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let information = if information >= f64::from(u32::MAX) {
            u32::MAX
        } else {
            information as u32
        };
        Self::new(information.saturating_add(guard))
    }

    /// A model-independent bound: every symbol is assumed to take the
    /// smallest possible share, `1 / denominator`, of the interval.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn conservative(symbol_count: u64, denominator: u64) -> Self {
        let per_symbol = (denominator.max(1) as f64).log10();
        Self::required(symbol_count as f64 * per_symbol, symbol_count)
    }

    /// The precision needed for `symbols` under `model`.
    #[must_use]
    pub fn for_symbols<M: Model>(model: &M, symbols: &[M::Symbol]) -> Self {
        Self::required(information_digits(model, symbols), symbols.len() as u64)
    }

    /// The precision needed for the message a [`FrequencyTable`] was counted
    /// from.
    ///
    /// This depends on the table alone, so a decoder holding only the table
    /// arrives at the same precision as the encoder.
    #[must_use]
    pub fn for_table(table: &FrequencyTable) -> Self {
        Self::required(table.information_digits(), table.total())
    }

    /// Compare against a `required` precision.
    ///
    /// # Errors
    ///
    /// Returns a [`PrecisionWarning`] if `self` is smaller than `required`.
    /// The warning is advisory: encoding may still succeed.
    pub fn check(self, required: Self) -> Result<(), PrecisionWarning> {
        if self < required {
            Err(PrecisionWarning {
                available: self.digits,
                required: required.digits,
            })
        } else {
            Ok(())
        }
    }
}

/// A thousand significant digits. [`Precision::conservative`] bounds this at
/// 413 pixels of 256 gray levels, whatever their distribution.
impl Default for Precision {
    fn default() -> Self {
        Self::new(1000)
    }
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} digits", self.digits)
    }
}

/// The working precision is smaller than the sequence provably needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error(
    "working precision of {available} significant digits is below the {required} digits this \
     sequence needs; decoding is not guaranteed"
)]
pub struct PrecisionWarning {
    /// Digits the coder was configured with
    pub available: u32,
    /// Digits the sequence needs
    pub required: u32,
}

/// The information content of `symbols` under `model`, in decimal digits:
/// the sum of `log10(denominator / frequency)` over every symbol.
///
/// The exact width of the final interval is `10^-information`. Symbols
/// the model rejects or gives no share of the interval are skipped; the
/// encoder reports those itself.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn information_digits<M: Model>(model: &M, symbols: &[M::Symbol]) -> f64 {
    let denominator = model.denominator() as f64;
    symbols
        .iter()
        .filter_map(|symbol| model.probability(symbol).ok())
        .filter(|p| p.end > p.start)
        .map(|p| (denominator / (p.end - p.start) as f64).log10())
        .sum()
}

fn decimal_digits(value: u64) -> u32 {
    value.checked_ilog10().map_or(1, |log| log + 1)
}
