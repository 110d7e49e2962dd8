use std::error;
use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use graycode::batch::{self, BatchArgs};
use graycode::{compression_ratio, ImageGeometry, PrecisionPolicy};
use tracing::{info, Level};

/// Command line argument parser
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct MyArgs {
    /// More log output (-v info, -vv debug, -vvv trace)
    #[clap(short, long, action = clap::ArgAction::Count, global = true)]
    pub(crate) verbose: u8,

    #[clap(subcommand)]
    pub(crate) command: Command,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Compress a plain PGM image into a codestream
    Compress {
        /// Path to input PGM image
        #[clap(short, long)]
        input: PathBuf,

        /// Path to output codestream
        #[clap(short, long)]
        output: PathBuf,

        /// Significant digits of the coder (0 = derive from the image)
        #[clap(short, long, default_value_t = 0)]
        precision: u32,
    },

    /// Rebuild a plain PGM image from a codestream
    Decompress {
        /// Path to input codestream
        #[clap(short, long)]
        input: PathBuf,

        /// Path to output PGM image
        #[clap(short, long)]
        output: PathBuf,

        #[clap(long)]
        width: usize,

        #[clap(long)]
        height: usize,

        /// Maximum gray value written to the PGM header
        #[clap(long, default_value_t = 255)]
        max_gray: u16,

        /// Significant digits the codestream was made with (0 = derive from the table)
        #[clap(short, long, default_value_t = 0)]
        precision: u32,
    },

    /// Print the size of an image divided by the size of its codestream
    Ratio {
        original: PathBuf,
        codestream: PathBuf,
    },

    /// Compress, decompress and verify a list of images
    Batch(BatchArgs),
}

fn main() -> Result<(), Box<dyn error::Error>> {
    let args: MyArgs = MyArgs::parse();

    let level = match args.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();

    let stdout = io::stdout();
    let mut handle = io::BufWriter::new(stdout.lock());

    match args.command {
        Command::Compress {
            input,
            output,
            precision,
        } => {
            let policy = PrecisionPolicy::from_digits(precision);
            let codestream = graycode::compress_file(&input, &output, policy)?;
            info!(
                image = %input.display(),
                codestream = %output.display(),
                digits = codestream.value().fraction_digits(),
                "compressed"
            );
        }
        Command::Decompress {
            input,
            output,
            width,
            height,
            max_gray,
            precision,
        } => {
            let geometry = ImageGeometry {
                width,
                height,
                max_gray,
            };
            let policy = PrecisionPolicy::from_digits(precision);
            graycode::decompress_file(&input, &output, geometry, policy)?;
            info!(
                codestream = %input.display(),
                image = %output.display(),
                "decompressed"
            );
        }
        Command::Ratio {
            original,
            codestream,
        } => {
            let ratio = compression_ratio(&original, &codestream)?;
            writeln!(handle, "{ratio:.2}")?;
        }
        Command::Batch(batch_args) => {
            let batch_args = batch_args.load_overrides()?;
            let reports = batch::run(&batch_args)?;
            if batch_args.json {
                writeln!(handle, "{}", serde_json::to_string_pretty(&reports)?)?;
            } else {
                for report in &reports {
                    writeln!(
                        handle,
                        "Compression ratio for {}: {:.2}",
                        report.image.display(),
                        report.compression_ratio
                    )?;
                }
            }
            handle.flush()?;

            if let Some(report) = reports.iter().find(|report| !report.lossless) {
                let image = report.image.display();
                return Err(format!("{image} was not reconstructed exactly").into());
            }
        }
    }

    handle.flush()?;
    Ok(())
}
