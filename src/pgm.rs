//! Plain (ASCII, `P2`) PGM images.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use itertools::Itertools;

/// The largest `maxval` a PGM file may declare.
pub const MAX_GRAY_LIMIT: u16 = u16::MAX;

/// Errors reading or building a [`PgmImage`]
#[derive(Debug, thiserror::Error)]
pub enum PgmError {
    #[error("IO error")]
    Io(#[from] io::Error),

    #[error("not a plain PGM file (expected magic `P2`, found `{0}`)")]
    BadMagic(String),

    #[error("PGM header ended before the {0}")]
    MissingField(&'static str),

    #[error("invalid {field} `{token}`")]
    InvalidToken { field: &'static str, token: String },

    #[error("image dimensions must be non-zero (got {width}x{height})")]
    ZeroDimension { width: usize, height: usize },

    #[error("image dimensions {width}x{height} are too large")]
    DimensionsTooLarge { width: usize, height: usize },

    #[error("maximum gray value {0} is outside 1..={MAX_GRAY_LIMIT}")]
    MaxGrayOutOfRange(u64),

    #[error("pixel {index} has value {value}, above the maximum gray value {max_gray}")]
    PixelAboveMax { index: usize, value: u64, max_gray: u16 },

    #[error("expected {expected} pixels, found {found}")]
    PixelCount { expected: usize, found: usize },
}

/// The shape of an image: what a decoder must be told besides the codestream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageGeometry {
    pub width: usize,
    pub height: usize,
    pub max_gray: u16,
}

impl ImageGeometry {
    /// `width × height`, or `None` on overflow.
    #[must_use]
    pub fn pixel_count(&self) -> Option<usize> {
        self.width.checked_mul(self.height)
    }

    /// Number of distinct gray levels, `max_gray + 1`.
    #[must_use]
    pub fn alphabet_size(&self) -> usize {
        usize::from(self.max_gray) + 1
    }
}

/// A grayscale image held as row-major pixel values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PgmImage {
    geometry: ImageGeometry,
    pixels: Vec<u16>,
}

impl PgmImage {
    /// Build an image, checking the dimensions and every pixel against
    /// `max_gray`.
    ///
    /// # Errors
    ///
    /// Returns a [`PgmError`] if the dimensions are zero, `max_gray` is
    /// zero, a pixel exceeds `max_gray` or the pixel count is wrong.
    pub fn new(geometry: ImageGeometry, pixels: Vec<u16>) -> Result<Self, PgmError> {
        let ImageGeometry {
            width,
            height,
            max_gray,
        } = geometry;
        if width == 0 || height == 0 {
            return Err(PgmError::ZeroDimension { width, height });
        }
        if max_gray == 0 {
            return Err(PgmError::MaxGrayOutOfRange(0));
        }
        let expected = geometry
            .pixel_count()
            .ok_or(PgmError::DimensionsTooLarge { width, height })?;
        if pixels.len() != expected {
            return Err(PgmError::PixelCount {
                expected,
                found: pixels.len(),
            });
        }
        if let Some((index, &value)) = pixels.iter().find_position(|&&p| p > max_gray) {
            return Err(PgmError::PixelAboveMax {
                index,
                value: u64::from(value),
                max_gray,
            });
        }

        Ok(Self { geometry, pixels })
    }

    /// Parse a plain PGM file.
    ///
    /// `#` starts a comment running to the end of the line, anywhere in the
    /// file. Tokens are separated by any whitespace, so rows need not match
    /// the image width.
    ///
    /// # Errors
    ///
    /// Returns a [`PgmError`] if the data is not a well-formed `P2` image.
    pub fn read_from<R: BufRead>(reader: R) -> Result<Self, PgmError> {
        let mut tokens = Vec::new();
        for line in reader.lines() {
            let line = line?;
            let content = line.split_once('#').map_or(line.as_str(), |(data, _)| data);
            tokens.extend(content.split_whitespace().map(str::to_owned));
        }
        let mut tokens = tokens.into_iter();

        let magic = tokens.next().ok_or(PgmError::MissingField("magic number"))?;
        if magic != "P2" {
            return Err(PgmError::BadMagic(magic));
        }
        let width = header_field(&mut tokens, "width")?;
        let height = header_field(&mut tokens, "height")?;
        if width == 0 || height == 0 {
            return Err(PgmError::ZeroDimension { width, height });
        }
        let max_gray: u64 = header_field(&mut tokens, "maximum gray value")?;
        let max_gray = u16::try_from(max_gray)
            .ok()
            .filter(|&m| m > 0)
            .ok_or(PgmError::MaxGrayOutOfRange(max_gray))?;
        let geometry = ImageGeometry {
            width,
            height,
            max_gray,
        };
        let expected = geometry
            .pixel_count()
            .ok_or(PgmError::DimensionsTooLarge { width, height })?;

        let mut pixels = Vec::with_capacity(expected);
        for (index, token) in tokens.enumerate() {
            let value: u64 = token.parse().map_err(|_| PgmError::InvalidToken {
                field: "pixel value",
                token: token.clone(),
            })?;
            let pixel = u16::try_from(value)
                .ok()
                .filter(|&p| p <= max_gray)
                .ok_or(PgmError::PixelAboveMax {
                    index,
                    value,
                    max_gray,
                })?;
            pixels.push(pixel);
        }
        log::debug!("read {width}x{height} PGM image with maximum gray value {max_gray}");

        Self::new(geometry, pixels)
    }

    /// Read a plain PGM file from disk.
    ///
    /// # Errors
    ///
    /// See [`PgmImage::read_from`].
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PgmError> {
        let file = File::open(path)?;
        Self::read_from(BufReader::new(file))
    }

    /// Write the image as a plain PGM file, one text row per image row.
    ///
    /// # Errors
    ///
    /// Returns any error of the writer.
    pub fn write_to<W: Write>(&self, mut writer: W) -> io::Result<()> {
        let ImageGeometry {
            width,
            height,
            max_gray,
        } = self.geometry;
        writeln!(writer, "P2")?;
        writeln!(writer, "{width} {height}")?;
        writeln!(writer, "{max_gray}")?;
        for row in self.rows() {
            writeln!(writer, "{}", row.iter().join(" "))?;
        }
        writer.flush()
    }

    /// Write the image to a file on disk.
    ///
    /// # Errors
    ///
    /// Returns any error creating or writing the file.
    pub fn save(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let file = File::create(path)?;
        self.write_to(BufWriter::new(file))
    }

    pub fn geometry(&self) -> ImageGeometry {
        self.geometry
    }

    pub fn width(&self) -> usize {
        self.geometry.width
    }

    pub fn height(&self) -> usize {
        self.geometry.height
    }

    pub fn max_gray(&self) -> u16 {
        self.geometry.max_gray
    }

    /// Row-major pixel values
    pub fn pixels(&self) -> &[u16] {
        &self.pixels
    }

    pub fn rows(&self) -> std::slice::Chunks<'_, u16> {
        self.pixels.chunks(self.geometry.width)
    }

    pub fn into_pixels(self) -> Vec<u16> {
        self.pixels
    }
}

fn header_field<T: std::str::FromStr>(
    tokens: &mut impl Iterator<Item = String>,
    field: &'static str,
) -> Result<T, PgmError> {
    let token = tokens.next().ok_or(PgmError::MissingField(field))?;
    token
        .parse()
        .map_err(|_| PgmError::InvalidToken { field, token })
}
