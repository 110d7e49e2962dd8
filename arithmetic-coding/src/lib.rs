//! Arithmetic coding with exact decimal intervals and a static model.
//!
//! An [`Encoder`] narrows the unit interval once per symbol and emits the
//! midpoint of the final interval as a single [`EncodedValue`]. A
//! [`Decoder`] holding the same [`Model`] and [`Precision`] replays the
//! narrowing to recover the sequence.
//!
//! ```
//! use graycode_arithmetic::{Decoder, Encoder, FrequencyTable, Precision};
//!
//! let input = [0u16, 1, 2, 3];
//! let table = FrequencyTable::from_symbols(input, 4)?;
//! let precision = Precision::new(20);
//!
//! let value = Encoder::new(table.clone(), precision)?.encode_all(&input)?;
//! let output = Decoder::new(table, precision, value)?.decode_all(input.len())?;
//!
//! assert_eq!(output, input);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(missing_docs, clippy::all, missing_debug_implementations)]
#![warn(clippy::pedantic)]

pub use graycode_arithmetic_core::{
    decimal, information_digits, validate_cut_points, Decimal, EncodedValue, FrequencyError,
    FrequencyTable, Interval, Model, ParseValueError, Precision, PrecisionWarning,
};

pub mod decoder;
pub mod encoder;

pub use decoder::Decoder;
pub use encoder::Encoder;

/// Errors that can occur during encoding/decoding
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Nothing was encoded
    #[error("cannot encode an empty symbol sequence")]
    EmptySequence,

    /// The interval collapsed to a single point
    #[error(
        "interval collapsed at symbol {position}; {precision} of precision cannot separate the \
         remaining symbols"
    )]
    DegenerateInterval {
        /// Index of the symbol being coded
        position: usize,
        /// The working precision
        precision: Precision,
    },

    /// No symbol owns the value, or a symbol owns no part of the interval
    #[error(
        "no symbol share matches at position {position}; the frequency table is malformed or \
         does not belong to this value"
    )]
    BoundaryMismatch {
        /// Index of the symbol being coded, `0` for a malformed model
        position: usize,
    },

    /// The model rejected a symbol
    #[error("invalid symbol at position {position}")]
    InvalidSymbol {
        /// Index of the symbol being coded
        position: usize,
        /// The model's error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}
