//! Compress, decompress and verify a list of images in one go.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::codec::{self, CodecError, PrecisionPolicy};
use crate::pgm::PgmImage;

/// Arguments of a batch run
#[derive(clap::Args, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BatchArgs {
    /// Filename for args (optional; must be in .toml format)
    #[clap(short, long, default_value = "")]
    pub args_filename: String,

    /// Directory for codestreams and reconstructed images
    #[clap(short, long, default_value = "./output")]
    pub output_dir: PathBuf,

    /// Significant digits of the coder (0 = derive from each image)
    #[clap(short, long, default_value_t = 0)]
    pub precision: u32,

    /// Print the reports as JSON
    #[clap(long, action)]
    pub json: bool,

    /// Plain (P2) PGM images to process
    pub images: Vec<PathBuf>,
}

impl Default for BatchArgs {
    fn default() -> Self {
        Self {
            args_filename: String::new(),
            output_dir: PathBuf::from("./output"),
            precision: 0,
            json: false,
            images: Vec::new(),
        }
    }
}

impl BatchArgs {
    /// Replace these arguments with the ones in `args_filename`, if set.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or is not valid TOML for
    /// [`BatchArgs`].
    pub fn load_overrides(self) -> Result<Self, Box<dyn std::error::Error>> {
        if self.args_filename.is_empty() {
            return Ok(self);
        }
        let content = fs::read_to_string(&self.args_filename)?;
        Ok(toml::from_str(&content)?)
    }
}

/// The outcome of one image of a batch
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchReport {
    pub image: PathBuf,
    pub codestream: PathBuf,
    pub reconstruction: PathBuf,
    pub width: usize,
    pub height: usize,
    pub precision_digits: u32,
    pub original_bytes: u64,
    pub codestream_bytes: u64,
    pub compression_ratio: f64,
    pub lossless: bool,
}

/// `<output_dir>/<stem>_codestream.txt` and `<output_dir>/<stem>-rec.pgm`
pub fn output_paths(image: &Path, output_dir: &Path) -> (PathBuf, PathBuf) {
    let stem = image
        .file_stem()
        .map_or_else(|| "image".into(), |stem| stem.to_string_lossy());
    (
        output_dir.join(format!("{stem}_codestream.txt")),
        output_dir.join(format!("{stem}-rec.pgm")),
    )
}

/// Compress `image` into `output_dir`, decompress it again and compare.
///
/// # Errors
///
/// Returns the first [`CodecError`] of any step.
pub fn process_image(
    image: &Path,
    output_dir: &Path,
    policy: PrecisionPolicy,
) -> Result<BatchReport, CodecError> {
    let (codestream_path, reconstruction_path) = output_paths(image, output_dir);

    let original = PgmImage::open(image)?;
    let codestream = codec::compress(&original, policy)?;
    codestream.save(&codestream_path)?;

    let geometry = original.geometry();
    let reconstructed =
        codec::decompress_file(&codestream_path, &reconstruction_path, geometry, policy)?;
    let lossless = reconstructed == original;
    if !lossless {
        log::error!("{} did not survive the round trip", image.display());
    }

    Ok(BatchReport {
        image: image.to_path_buf(),
        codestream: codestream_path.clone(),
        reconstruction: reconstruction_path,
        width: geometry.width,
        height: geometry.height,
        precision_digits: policy.resolve(codestream.table()).digits(),
        original_bytes: image.metadata()?.len(),
        codestream_bytes: codestream_path.metadata()?.len(),
        compression_ratio: codec::compression_ratio(image, &codestream_path)?,
        lossless,
    })
}

/// Process every image of `args`, creating the output directory first.
///
/// # Errors
///
/// Stops at the first image that fails.
pub fn run(args: &BatchArgs) -> Result<Vec<BatchReport>, CodecError> {
    fs::create_dir_all(&args.output_dir)?;
    let policy = PrecisionPolicy::from_digits(args.precision);

    args.images
        .iter()
        .map(|image| process_image(image, &args.output_dir, policy))
        .collect()
}
