use std::{fmt, str::FromStr};

use crate::decimal::{self, Decimal, ParseDecimalError};

/// The representative value of an encoded sequence: a terminating decimal
/// in `[0, 1)`.
///
/// [`fmt::Display`] writes every significant digit in plain positional
/// notation, and [`FromStr`] reads it back exactly.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct EncodedValue(Decimal);

/// A string or decimal which is not a valid [`EncodedValue`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseValueError {
    /// Not a decimal literal at all
    #[error(transparent)]
    Malformed(#[from] ParseDecimalError),

    /// A decimal, but not inside `[0, 1)`
    #[error("encoded value {0} lies outside [0, 1)")]
    OutOfRange(String),
}

impl EncodedValue {
    /// Wrap a decimal, checking it lies in `[0, 1)`.
    ///
    /// # Errors
    ///
    /// Returns [`ParseValueError::OutOfRange`].
    pub fn new(value: Decimal) -> Result<Self, ParseValueError> {
        if value.is_negative() || value >= Decimal::one() {
            return Err(ParseValueError::OutOfRange(value.to_string()));
        }
        Ok(Self(value))
    }

    pub(crate) fn from_exact(value: Decimal) -> Self {
        Self(value)
    }

    /// The exact value
    #[must_use]
    pub fn as_decimal(&self) -> &Decimal {
        &self.0
    }

    /// Unwrap the exact value
    #[must_use]
    pub fn into_decimal(self) -> Decimal {
        self.0
    }

    /// The number of digits after the decimal point.
    #[must_use]
    pub fn fraction_digits(&self) -> usize {
        let text = self.to_string();
        text.split_once('.').map_or(0, |(_, fraction)| fraction.len())
    }
}

impl fmt::Display for EncodedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for EncodedValue {
    type Err = ParseValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(decimal::parse(s)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num::BigInt;

    #[test]
    fn display_and_parse() {
        let value = EncodedValue::new(Decimal::new(BigInt::from(375), -3)).unwrap();
        assert_eq!(value.to_string(), "0.375");
        assert_eq!(value.fraction_digits(), 3);
        assert_eq!("0.375".parse::<EncodedValue>().unwrap(), value);
        assert_eq!("3.75E-1".parse::<EncodedValue>().unwrap(), value);
        assert_eq!("0.37500".parse::<EncodedValue>().unwrap(), value);
        assert_eq!(EncodedValue::new(Decimal::zero()).unwrap().to_string(), "0");
    }

    #[test]
    fn rejects_values_outside_the_unit_interval() {
        assert!(matches!(
            "1".parse::<EncodedValue>(),
            Err(ParseValueError::OutOfRange(_))
        ));
        assert!(matches!(
            "10e-1".parse::<EncodedValue>(),
            Err(ParseValueError::OutOfRange(_))
        ));
        assert!(matches!(
            "-0.5".parse::<EncodedValue>(),
            Err(ParseValueError::OutOfRange(_))
        ));
        assert!(matches!(
            "zero".parse::<EncodedValue>(),
            Err(ParseValueError::Malformed(_))
        ));
    }

    #[test]
    fn tiny_values_are_cheap_to_check() {
        let value: EncodedValue = "1e-9999999".parse().unwrap();
        assert!(value > "0".parse().unwrap());
        assert!(matches!(
            "1e-4000000000".parse::<EncodedValue>(),
            Err(ParseValueError::Malformed(_))
        ));
    }
}
