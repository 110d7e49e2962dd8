use std::ops::Range;

use num::BigInt;

use crate::decimal::{Decimal, Rounding};
use crate::{EncodedValue, Precision};

/// The current coding interval `[low, high)`.
///
/// Both bounds are exact decimals holding at most [`Precision::digits`]
/// significant digits. The interval starts as `[0, 1)` and only ever
/// shrinks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interval {
    low: Decimal,
    high: Decimal,
    rounding: Rounding,
}

/// Both bounds as integers over a shared power of ten.
struct Span {
    low: BigInt,
    width: BigInt,
    exponent: i64,
}

impl Interval {
    /// The unit interval `[0, 1)`.
    #[must_use]
    pub fn new(precision: Precision) -> Self {
        Self {
            low: Decimal::zero(),
            high: Decimal::one(),
            rounding: Rounding::new(precision.digits()),
        }
    }

    /// The inclusive lower bound
    #[must_use]
    pub fn low(&self) -> &Decimal {
        &self.low
    }

    /// The exclusive upper bound
    #[must_use]
    pub fn high(&self) -> &Decimal {
        &self.high
    }

    /// `high - low`
    #[must_use]
    pub fn width(&self) -> Decimal {
        let span = self.span();
        Decimal::new(span.width, span.exponent)
    }

    /// The precision bounds are rounded to.
    #[must_use]
    pub fn precision(&self) -> Precision {
        Precision::new(self.rounding.digits())
    }

    /// Whether the interval has collapsed to a single point.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.low >= self.high
    }

    /// Whether `low <= value < high`.
    #[must_use]
    pub fn contains(&self, value: &Decimal) -> bool {
        self.low <= *value && *value < self.high
    }

    fn span(&self) -> Span {
        let (low, high, exponent) = self.low.align(&self.high);
        Span {
            width: high - &low,
            low,
            exponent,
        }
    }

    /// `low + width × cumulative / denominator`, rounded.
    fn point_in(&self, span: &Span, cumulative: u64, denominator: u64) -> Decimal {
        if cumulative == 0 {
            return self.low.clone();
        }
        if cumulative >= denominator {
            return self.high.clone();
        }
        let numer = &span.low * BigInt::from(denominator) + &span.width * BigInt::from(cumulative);
        self.rounding
            .round_quotient(&numer, denominator, span.exponent)
    }

    /// The position of the cut point `cumulative / denominator` inside the
    /// interval, rounded to the working precision.
    ///
    /// The outermost cut points map exactly onto `low` and `high`, and the
    /// result never decreases as `cumulative` grows.
    #[must_use]
    pub fn point(&self, cumulative: u64, denominator: u64) -> Decimal {
        self.point_in(&self.span(), cumulative, denominator)
    }

    /// Shrink the interval to the share `p` of `denominator`.
    ///
    /// The result may be degenerate if the share is empty or too small for
    /// the working precision; check [`Interval::is_degenerate`].
    pub fn narrow(&mut self, p: &Range<u64>, denominator: u64) {
        let span = self.span();
        let high = self.point_in(&span, p.end, denominator);
        let low = self.point_in(&span, p.start, denominator);
        self.low = low;
        self.high = high;
    }

    /// Find the symbol whose share of the interval contains `value`, given
    /// the cumulative boundaries of a model.
    ///
    /// Returns the index `s` with
    /// `point(cut_points[s]) <= value < point(cut_points[s + 1])`, or `None`
    /// if `value` lies outside the interval. `cut_points` must start at zero
    /// and never decrease.
    #[must_use]
    pub fn locate(&self, value: &Decimal, cut_points: &[u64]) -> Option<usize> {
        let denominator = *cut_points.last()?;
        if cut_points.len() < 2 || !self.contains(value) {
            return None;
        }

        let span = self.span();
        // invariant: point(below) <= value < point(above)
        let (mut below, mut above) = (0, cut_points.len() - 1);
        while above - below > 1 {
            let middle = below + (above - below) / 2;
            if self.point_in(&span, cut_points[middle], denominator) <= *value {
                below = middle;
            } else {
                above = middle;
            }
        }
        Some(below)
    }

    /// The midpoint `(low + high) / 2`, which is the value an encoder emits.
    #[must_use]
    pub fn midpoint(&self) -> EncodedValue {
        let (low, high, exponent) = self.low.align(&self.high);
        EncodedValue::from_exact(Decimal::new((low + high) * 5u32, exponent - 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decimal(text: &str) -> Decimal {
        text.parse().unwrap()
    }

    #[test]
    fn unit_interval() {
        let interval = Interval::new(Precision::new(10));
        assert_eq!(interval.low(), &decimal("0"));
        assert_eq!(interval.high(), &decimal("1"));
        assert!(!interval.is_degenerate());
        assert!(interval.contains(&decimal("0")));
        assert!(!interval.contains(&decimal("1")));
    }

    #[test]
    fn narrowing() {
        let mut interval = Interval::new(Precision::new(10));
        interval.narrow(&(1..3), 4);
        assert_eq!(interval.low(), &decimal("0.25"));
        assert_eq!(interval.high(), &decimal("0.75"));

        interval.narrow(&(0..1), 2);
        assert_eq!(interval.low(), &decimal("0.25"));
        assert_eq!(interval.high(), &decimal("0.5"));
        assert_eq!(interval.width(), decimal("0.25"));
    }

    #[test]
    fn points_are_rounded() {
        let interval = Interval::new(Precision::new(3));
        assert_eq!(interval.point(1, 3), decimal("0.333"));
        assert_eq!(interval.point(2, 3), decimal("0.667"));
        assert_eq!(interval.point(0, 3), decimal("0"));
        assert_eq!(interval.point(3, 3), decimal("1"));
    }

    #[test]
    fn bounds_keep_the_working_digits() {
        // [1/3, 2/3) repeated closes in on one half
        let mut interval = Interval::new(Precision::new(12));
        for _ in 0..20 {
            interval.narrow(&(1..2), 3);
        }
        assert_eq!(interval.low(), &decimal("0.499999999857"));
        assert_eq!(interval.high(), &decimal("0.500000000143"));
        assert_eq!(interval.low().mantissa().to_string().len(), 12);
        assert_eq!(interval.midpoint().to_string(), "0.5");

        for _ in 0..10 {
            interval.narrow(&(1..2), 3);
        }
        assert!(interval.is_degenerate());
    }

    #[test]
    fn full_share_keeps_the_interval() {
        let mut interval = Interval::new(Precision::new(5));
        interval.narrow(&(0..3), 3);
        assert_eq!(interval, Interval::new(Precision::new(5)));
    }

    #[test]
    fn empty_share_collapses() {
        let mut interval = Interval::new(Precision::new(5));
        interval.narrow(&(2..2), 4);
        assert!(interval.is_degenerate());
    }

    #[test]
    fn too_little_precision_collapses() {
        // a 1-in-1000 share cannot be told apart with 2 digits
        let mut interval = Interval::new(Precision::new(2));
        interval.narrow(&(500..501), 1000);
        assert!(interval.is_degenerate());
    }

    #[test]
    fn locating() {
        let interval = Interval::new(Precision::new(10));
        let cut_points = [0, 1, 1, 3, 4];
        assert_eq!(interval.locate(&decimal("0"), &cut_points), Some(0));
        assert_eq!(interval.locate(&decimal("0.125"), &cut_points), Some(0));
        // symbol 1 owns nothing
        assert_eq!(interval.locate(&decimal("0.25"), &cut_points), Some(2));
        assert_eq!(interval.locate(&decimal("0.625"), &cut_points), Some(2));
        assert_eq!(interval.locate(&decimal("0.75"), &cut_points), Some(3));
        assert_eq!(interval.locate(&decimal("0.99"), &cut_points), Some(3));

        assert_eq!(interval.locate(&decimal("1"), &cut_points), None);
        assert_eq!(interval.locate(&decimal("-0.5"), &cut_points), None);
        assert_eq!(interval.locate(&decimal("0.5"), &[]), None);
    }

    #[test]
    fn midpoint() {
        let mut interval = Interval::new(Precision::new(10));
        assert_eq!(interval.midpoint().to_string(), "0.5");
        interval.narrow(&(3..4), 4);
        assert_eq!(interval.midpoint().to_string(), "0.875");
    }
}
