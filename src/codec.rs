//! Whole-image compression: PGM pixels in, [`Codestream`] out, and back.

use std::io;
use std::path::Path;

use graycode_arithmetic::{
    Decoder, Encoder, FrequencyError, FrequencyTable, Precision, PrecisionWarning,
};

use crate::codestream::{Codestream, CodestreamError};
use crate::pgm::{ImageGeometry, PgmError, PgmImage};

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("IO error")]
    IoError(#[from] io::Error),

    #[error("PGM error")]
    PgmError(#[from] PgmError),

    #[error("Codestream error")]
    CodestreamError(#[from] CodestreamError),

    #[error("Frequency table error")]
    FrequencyError(#[from] FrequencyError),

    #[error("Arithmetic coding error")]
    ArithmeticCodingError(#[from] graycode_arithmetic::Error),

    #[error("the image has {expected} pixels but the codestream encodes {found} symbols")]
    SymbolCountMismatch { expected: usize, found: u64 },

    #[error(
        "the codestream's alphabet of {table} symbols does not fit gray values up to {max_gray}"
    )]
    AlphabetMismatch { table: usize, max_gray: u16 },

    #[error("image dimensions {width}x{height} are too large")]
    DimensionsTooLarge { width: usize, height: usize },

    #[error("codestream file is empty")]
    EmptyCodestream,

    #[error("Insufficient precision")]
    InsufficientPrecision(#[from] PrecisionWarning),

    #[error("the decoded pixels do not add up to the codestream's frequency table")]
    CountsMismatch,
}

/// How the working precision of the coder is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrecisionPolicy {
    /// Derived from the frequency table, which the codestream carries, so
    /// the decoder arrives at the encoder's precision on its own.
    #[default]
    Auto,

    /// A fixed precision; the decoder must be given the same one.
    Fixed(Precision),
}

impl PrecisionPolicy {
    /// `0` selects [`PrecisionPolicy::Auto`], anything else a fixed number of
    /// significant digits.
    pub fn from_digits(digits: u32) -> Self {
        match digits {
            0 => Self::Auto,
            digits => Self::Fixed(Precision::new(digits)),
        }
    }

    pub fn resolve(self, table: &FrequencyTable) -> Precision {
        match self {
            Self::Auto => Precision::for_table(table),
            Self::Fixed(precision) => precision,
        }
    }

    /// Resolve the precision for `table`, refusing a fixed one below
    /// [`Precision::for_table`].
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InsufficientPrecision`] for a fixed precision
    /// that cannot guarantee a round trip.
    pub fn checked(self, table: &FrequencyTable) -> Result<Precision, CodecError> {
        let precision = self.resolve(table);
        precision.check(Precision::for_table(table))?;
        Ok(precision)
    }
}

/// Compress every pixel of `image` into one value, with an alphabet of
/// `max_gray + 1` gray levels.
///
/// # Errors
///
/// - [`CodecError::InsufficientPrecision`] if a fixed precision is below
///   what the image needs
/// - [`CodecError::ArithmeticCodingError`] if encoding fails
pub fn compress(image: &PgmImage, policy: PrecisionPolicy) -> Result<Codestream, CodecError> {
    let geometry = image.geometry();
    let table =
        FrequencyTable::from_symbols(image.pixels().iter().copied(), geometry.alphabet_size())?;
    let precision = policy.checked(&table)?;

    let mut encoder = Encoder::new(table, precision)?;
    let value = encoder.encode_all(image.pixels())?;
    log::info!(
        "compressed {}x{} image at {precision} into {} digits",
        geometry.width,
        geometry.height,
        value.fraction_digits()
    );

    let (table, _) = encoder.into_inner();
    Ok(Codestream::new(value, table))
}

/// Rebuild an image of the given geometry from a codestream.
///
/// # Errors
///
/// - [`CodecError::SymbolCountMismatch`] if the table does not count
///   `width × height` symbols
/// - [`CodecError::AlphabetMismatch`] if the table has more symbols than
///   `max_gray + 1`
/// - [`CodecError::InsufficientPrecision`] if a fixed precision is below
///   what the table needs
/// - [`CodecError::ArithmeticCodingError`] if decoding fails
/// - [`CodecError::CountsMismatch`] if the decoded pixels are not the ones
///   the table counted, i.e. the value does not belong to the table
pub fn decompress(
    codestream: &Codestream,
    geometry: ImageGeometry,
    policy: PrecisionPolicy,
) -> Result<PgmImage, CodecError> {
    let table = codestream.table();
    let expected = geometry
        .pixel_count()
        .ok_or(CodecError::DimensionsTooLarge {
            width: geometry.width,
            height: geometry.height,
        })?;
    if table.total() != expected as u64 {
        return Err(CodecError::SymbolCountMismatch {
            expected,
            found: table.total(),
        });
    }
    if table.alphabet_size() > geometry.alphabet_size() {
        return Err(CodecError::AlphabetMismatch {
            table: table.alphabet_size(),
            max_gray: geometry.max_gray,
        });
    }
    let precision = policy.checked(table)?;

    let mut decoder = Decoder::new(table.clone(), precision, codestream.value().clone())?;
    let pixels = decoder.decode_all(expected)?;
    if FrequencyTable::from_symbols(pixels.iter().copied(), table.alphabet_size())? != *table {
        return Err(CodecError::CountsMismatch);
    }
    log::info!(
        "decompressed {}x{} image at {precision}",
        geometry.width,
        geometry.height
    );

    Ok(PgmImage::new(geometry, pixels)?)
}

/// Compress the PGM file at `input` into a codestream file at `output`.
///
/// # Errors
///
/// See [`compress`]; also fails on unreadable input or unwritable output.
pub fn compress_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    policy: PrecisionPolicy,
) -> Result<Codestream, CodecError> {
    let image = PgmImage::open(input)?;
    let codestream = compress(&image, policy)?;
    codestream.save(output)?;
    Ok(codestream)
}

/// Decompress the codestream file at `input` into a PGM file at `output`.
///
/// # Errors
///
/// See [`decompress`]; also fails on unreadable input or unwritable output.
pub fn decompress_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    geometry: ImageGeometry,
    policy: PrecisionPolicy,
) -> Result<PgmImage, CodecError> {
    let codestream = Codestream::load(input)?;
    let image = decompress(&codestream, geometry, policy)?;
    image.save(output)?;
    Ok(image)
}

/// Size of `original` in bytes divided by the size of `codestream`.
///
/// # Errors
///
/// Fails if either file cannot be inspected or the codestream is empty.
#[allow(clippy::cast_precision_loss)]
pub fn compression_ratio(
    original: impl AsRef<Path>,
    codestream: impl AsRef<Path>,
) -> Result<f64, CodecError> {
    let original_size = original.as_ref().metadata()?.len();
    let codestream_size = codestream.as_ref().metadata()?.len();
    if codestream_size == 0 {
        return Err(CodecError::EmptyCodestream);
    }
    Ok(original_size as f64 / codestream_size as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient() -> PgmImage {
        let geometry = ImageGeometry {
            width: 4,
            height: 2,
            max_gray: 7,
        };
        PgmImage::new(geometry, vec![0, 1, 2, 3, 4, 5, 6, 7]).unwrap()
    }

    #[test]
    fn round_trip() {
        let image = gradient();
        let codestream = compress(&image, PrecisionPolicy::Auto).unwrap();
        assert_eq!(codestream.table().alphabet_size(), 8);
        assert_eq!(codestream.table().total(), 8);

        let decoded = decompress(&codestream, image.geometry(), PrecisionPolicy::Auto).unwrap();
        assert_eq!(decoded, image);
    }

    #[test]
    fn fixed_precision_round_trip() {
        let image = gradient();
        let policy = PrecisionPolicy::from_digits(40);
        let codestream = compress(&image, policy).unwrap();
        let decoded = decompress(&codestream, image.geometry(), policy).unwrap();
        assert_eq!(decoded, image);
    }

    #[test]
    fn policies() {
        let table = FrequencyTable::from_symbols([0, 1, 2, 3], 4).unwrap();
        assert_eq!(PrecisionPolicy::from_digits(0), PrecisionPolicy::Auto);
        assert_eq!(PrecisionPolicy::Auto.resolve(&table), Precision::for_table(&table));
        assert_eq!(
            PrecisionPolicy::from_digits(12).resolve(&table),
            Precision::new(12)
        );
    }

    #[test]
    fn geometry_must_match() {
        let image = gradient();
        let codestream = compress(&image, PrecisionPolicy::Auto).unwrap();

        let wrong_size = ImageGeometry {
            width: 3,
            ..image.geometry()
        };
        assert!(matches!(
            decompress(&codestream, wrong_size, PrecisionPolicy::Auto),
            Err(CodecError::SymbolCountMismatch {
                expected: 6,
                found: 8
            })
        ));

        let narrow_alphabet = ImageGeometry {
            max_gray: 5,
            ..image.geometry()
        };
        assert!(matches!(
            decompress(&codestream, narrow_alphabet, PrecisionPolicy::Auto),
            Err(CodecError::AlphabetMismatch {
                table: 8,
                max_gray: 5
            })
        ));
    }

    #[test]
    fn too_little_precision() {
        let image = gradient();
        let required = Precision::for_table(&FrequencyTable::from_symbols(0..8, 8).unwrap());
        assert!(matches!(
            compress(&image, PrecisionPolicy::from_digits(1)),
            Err(CodecError::InsufficientPrecision(PrecisionWarning { available: 1, .. }))
        ));

        let codestream = compress(&image, PrecisionPolicy::Auto).unwrap();
        let half = PrecisionPolicy::from_digits(required.digits() / 2);
        match decompress(&codestream, image.geometry(), half) {
            Err(CodecError::InsufficientPrecision(warning)) => {
                assert_eq!(warning.available, required.digits() / 2);
                assert_eq!(warning.required, required.digits());
            }
            other => panic!("expected a precision error, got {other:?}"),
        }
    }

    #[test]
    fn foreign_value_is_detected() {
        let image = gradient();
        let codestream = compress(&image, PrecisionPolicy::Auto).unwrap();
        let foreign = Codestream::new("0".parse().unwrap(), codestream.table().clone());
        assert!(matches!(
            decompress(&foreign, image.geometry(), PrecisionPolicy::Auto),
            Err(CodecError::CountsMismatch)
        ));
    }
}
