//! Core traits and shared arithmetic for the `graycode-arithmetic` crate.
//!
//! The coder works on exact decimals ([`Decimal`], an integer mantissa over
//! a power of ten) and rounds the interval bounds to a fixed number of
//! significant digits after every step, so that an encoder and a decoder
//! configured with the same [`Precision`] walk through identical intervals.

#![deny(missing_docs, clippy::all, missing_debug_implementations)]
#![warn(clippy::pedantic)]

pub mod decimal;
pub use decimal::Decimal;

mod frequency;
pub use frequency::{FrequencyError, FrequencyTable};

mod interval;
pub use interval::Interval;

mod model;
pub use model::{validate_cut_points, Model};

mod precision;
pub use precision::{information_digits, Precision, PrecisionWarning};

mod value;
pub use value::{EncodedValue, ParseValueError};
