//! Lossless compression of grayscale images with a static-model arithmetic
//! coder.
//!
//! An image's pixels are counted into a [`FrequencyTable`], encoded into a
//! single exact decimal value and stored as a [`Codestream`]. Decoding needs
//! the codestream and the image geometry.
//!
//! ```
//! use graycode::{compress, decompress, ImageGeometry, PgmImage, PrecisionPolicy};
//!
//! let geometry = ImageGeometry { width: 3, height: 2, max_gray: 255 };
//! let image = PgmImage::new(geometry, vec![10, 10, 200, 10, 0, 255])?;
//!
//! let codestream = compress(&image, PrecisionPolicy::Auto)?;
//! let decoded = decompress(&codestream, geometry, PrecisionPolicy::Auto)?;
//! assert_eq!(decoded, image);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod batch;
pub mod codec;
pub mod codestream;
pub mod pgm;

pub use codec::{
    compress, compress_file, compression_ratio, decompress, decompress_file, CodecError,
    PrecisionPolicy,
};
pub use codestream::{Codestream, CodestreamError};
pub use graycode_arithmetic::{EncodedValue, FrequencyTable, Precision};
pub use pgm::{ImageGeometry, PgmError, PgmImage};
