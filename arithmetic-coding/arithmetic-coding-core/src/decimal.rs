//! Exact decimals stored as an integer mantissa and a power of ten, with
//! significant-digit rounding, plain positional formatting and parsing.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use num::{BigInt, BigRational, Integer, One, Signed, Zero};

/// The largest decimal exponent [`parse`] accepts, in either direction.
pub const MAX_EXPONENT: i64 = 10_000_000;

const LOG10_2: f64 = std::f64::consts::LOG10_2;

/// A string which is not a decimal literal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid decimal literal `{0}`")]
pub struct ParseDecimalError(pub String);

fn pow10(exponent: u64) -> BigInt {
    num::pow(
        BigInt::from(10u8),
        usize::try_from(exponent).unwrap_or(usize::MAX),
    )
}

/// The exact value `mantissa × 10^exponent`.
///
/// Equality and ordering compare values, so `0.5` and `0.50` are equal.
#[derive(Debug, Clone)]
pub struct Decimal {
    mantissa: BigInt,
    exponent: i64,
}

impl Decimal {
    /// `mantissa × 10^exponent`
    #[must_use]
    pub fn new(mantissa: BigInt, exponent: i64) -> Self {
        Self { mantissa, exponent }
    }

    /// `0`
    #[must_use]
    pub fn zero() -> Self {
        Self::new(BigInt::zero(), 0)
    }

    /// `1`
    #[must_use]
    pub fn one() -> Self {
        Self::new(BigInt::one(), 0)
    }

    /// The integer mantissa
    #[must_use]
    pub fn mantissa(&self) -> &BigInt {
        &self.mantissa
    }

    /// The power of ten the mantissa is scaled by
    #[must_use]
    pub fn exponent(&self) -> i64 {
        self.exponent
    }

    /// Whether the value is zero
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.mantissa.is_zero()
    }

    /// Whether the value is below zero
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.mantissa.is_negative()
    }

    /// The value as an exact rational.
    #[must_use]
    pub fn to_ratio(&self) -> BigRational {
        let scale = pow10(self.exponent.unsigned_abs());
        if self.exponent >= 0 {
            BigRational::from_integer(&self.mantissa * scale)
        } else {
            BigRational::new(self.mantissa.clone(), scale)
        }
    }

    /// Both mantissas over the smaller of the two exponents.
    ///
    /// Zero takes the other operand's exponent, so aligning with zero never
    /// builds a power of ten.
    #[must_use]
    pub fn align(&self, other: &Self) -> (BigInt, BigInt, i64) {
        if self.is_zero() {
            return (BigInt::zero(), other.mantissa.clone(), other.exponent);
        }
        if other.is_zero() {
            return (self.mantissa.clone(), BigInt::zero(), self.exponent);
        }
        match self.exponent.cmp(&other.exponent) {
            Ordering::Equal => (self.mantissa.clone(), other.mantissa.clone(), self.exponent),
            Ordering::Greater => {
                let shift = self.exponent.abs_diff(other.exponent);
                (
                    &self.mantissa * pow10(shift),
                    other.mantissa.clone(),
                    other.exponent,
                )
            }
            Ordering::Less => {
                let shift = other.exponent.abs_diff(self.exponent);
                (
                    self.mantissa.clone(),
                    &other.mantissa * pow10(shift),
                    self.exponent,
                )
            }
        }
    }

    /// `log10(|value|)` to within a third of a decade, from the bit length
    /// of the mantissa.
    #[allow(clippy::cast_precision_loss)]
    fn approximate_log10(&self) -> f64 {
        self.mantissa.bits() as f64 * LOG10_2 + self.exponent as f64
    }
}

impl PartialEq for Decimal {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Decimal {}

impl PartialOrd for Decimal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Decimal {
    fn cmp(&self, other: &Self) -> Ordering {
        let by_sign = self.mantissa.sign().cmp(&other.mantissa.sign());
        if by_sign != Ordering::Equal || self.is_zero() {
            return by_sign;
        }

        // values whose magnitudes are decades apart need no alignment
        let (a, b) = (self.approximate_log10(), other.approximate_log10());
        if (a - b).abs() > 2.0 {
            let by_magnitude = if a < b {
                Ordering::Less
            } else {
                Ordering::Greater
            };
            return if self.is_negative() {
                by_magnitude.reverse()
            } else {
                by_magnitude
            };
        }

        let (x, y, _) = self.align(other);
        x.cmp(&y)
    }
}

impl fmt::Display for Decimal {
    /// Plain positional notation without trailing zeros after the point.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return f.write_str("0");
        }
        if self.is_negative() {
            f.write_str("-")?;
        }
        let mut digits = self.mantissa.magnitude().to_str_radix(10);
        if self.exponent >= 0 {
            f.write_str(&digits)?;
            for _ in 0..self.exponent {
                f.write_str("0")?;
            }
            return Ok(());
        }

        let scale = usize::try_from(self.exponent.unsigned_abs()).map_err(|_| fmt::Error)?;
        if digits.len() <= scale {
            digits.insert_str(0, &"0".repeat(scale + 1 - digits.len()));
        }
        let (integer, fraction) = digits.split_at(digits.len() - scale);
        let fraction = fraction.trim_end_matches('0');
        if fraction.is_empty() {
            f.write_str(integer)
        } else {
            write!(f, "{integer}.{fraction}")
        }
    }
}

impl FromStr for Decimal {
    type Err = ParseDecimalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

/// Rounding to a fixed number of significant digits, half away from zero.
///
/// The powers of ten bounding a rounded mantissa are built once, so that
/// rounding a quotient costs one division by a small divisor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rounding {
    digits: u32,
    floor: BigInt,
    ceiling: BigInt,
}

impl Rounding {
    /// Round to `digits` significant digits; zero is raised to one.
    #[must_use]
    pub fn new(digits: u32) -> Self {
        let digits = digits.max(1);
        let floor = pow10(u64::from(digits - 1));
        let ceiling = &floor * 10u32;
        Self {
            digits,
            floor,
            ceiling,
        }
    }

    /// The number of significant digits kept
    #[must_use]
    pub fn digits(&self) -> u32 {
        self.digits
    }

    /// Round `value`.
    #[must_use]
    pub fn round(&self, value: &Decimal) -> Decimal {
        let rounded = self.round_quotient(&value.mantissa.abs(), 1, value.exponent);
        if value.is_negative() {
            Decimal::new(-rounded.mantissa, rounded.exponent)
        } else {
            rounded
        }
    }

    /// Round the non-negative value `numer / denom × 10^exponent`.
    ///
    /// The result has a mantissa of exactly `digits` digits, unless it is
    /// zero.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    pub fn round_quotient(&self, numer: &BigInt, denom: u64, exponent: i64) -> Decimal {
        debug_assert!(!numer.is_negative(), "rounding a negative quotient");
        if numer.is_zero() || denom == 0 {
            return Decimal::zero();
        }

        // floor(log10(numer / denom)), possibly off by one
        let magnitude =
            (numer.bits() as f64 * LOG10_2 - (denom as f64).log10()).floor() as i64;
        let mut shift = i64::from(self.digits) - 1 - magnitude;
        let denom = BigInt::from(denom);

        loop {
            // quotient = numer × 10^shift / denom
            let (scaled_numer, scaled_denom) = if shift >= 0 {
                (numer * pow10(shift.unsigned_abs()), denom.clone())
            } else {
                (numer.clone(), &denom * pow10(shift.unsigned_abs()))
            };
            let (quotient, remainder) = scaled_numer.div_rem(&scaled_denom);
            if quotient < self.floor {
                shift += 1;
                continue;
            }
            if quotient >= self.ceiling {
                shift -= 1;
                continue;
            }

            let mut mantissa = quotient;
            if remainder * 2u32 >= scaled_denom {
                mantissa += 1u32;
            }
            if mantissa == self.ceiling {
                mantissa = self.floor.clone();
                shift -= 1;
            }
            return Decimal::new(mantissa, exponent - shift);
        }
    }
}

/// Parse a decimal literal such as `0.125`, `-3`, `.5` or `1.25E-7`.
///
/// # Errors
///
/// Returns [`ParseDecimalError`] if `text` is not a decimal literal, or if
/// its exponent lies beyond [`MAX_EXPONENT`].
pub fn parse(text: &str) -> Result<Decimal, ParseDecimalError> {
    let invalid = || ParseDecimalError(text.to_owned());
    let trimmed = text.trim();

    let (negative, unsigned) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let (mantissa, exponent) = match unsigned.find(|c| c == 'e' || c == 'E') {
        Some(at) => {
            let exponent: i64 = unsigned[at + 1..].parse().map_err(|_| invalid())?;
            (&unsigned[..at], exponent)
        }
        None => (unsigned, 0),
    };
    let (integer, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    if integer.is_empty() && fraction.is_empty() {
        return Err(invalid());
    }
    if !integer
        .bytes()
        .chain(fraction.bytes())
        .all(|byte| byte.is_ascii_digit())
    {
        return Err(invalid());
    }

    let digits: BigInt = format!("{integer}{fraction}")
        .parse()
        .map_err(|_| invalid())?;
    let exponent = i64::try_from(fraction.len())
        .ok()
        .and_then(|scale| exponent.checked_sub(scale))
        .filter(|exponent| exponent.unsigned_abs() <= MAX_EXPONENT.unsigned_abs())
        .ok_or_else(invalid)?;

    Ok(Decimal::new(
        if negative { -digits } else { digits },
        exponent,
    ))
}
