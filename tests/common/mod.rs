use std::path::PathBuf;

use graycode::{compress, decompress, PgmImage, PrecisionPolicy};

pub fn sample(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/samples")
        .join(name)
}

pub fn round_trip(image: &PgmImage, policy: PrecisionPolicy) {
    let codestream = compress(image, policy).unwrap();
    let decoded = decompress(&codestream, image.geometry(), policy).unwrap();

    assert_eq!(image, &decoded);
}
