use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use graycode::{compress, decompress, ImageGeometry, PgmImage, PrecisionPolicy};

fn checkerboard(side: usize) -> PgmImage {
    let geometry = ImageGeometry {
        width: side,
        height: side,
        max_gray: 255,
    };
    let pixels = (0..side * side)
        .map(|i| if (i / side + i % side) % 2 == 0 { 32 } else { 224 })
        .collect();
    PgmImage::new(geometry, pixels).unwrap()
}

#[allow(clippy::missing_panics_doc)]
pub fn criterion_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("compress image");
    group.sample_size(10);
    for side in [16, 32, 64] {
        let image = checkerboard(side);
        let codestream = compress(&image, PrecisionPolicy::Auto).unwrap();

        group.bench_with_input(BenchmarkId::new("compress", side), &image, |b, image| {
            b.iter(|| compress(black_box(image), PrecisionPolicy::Auto).unwrap());
        });
        group.bench_with_input(
            BenchmarkId::new("decompress", side),
            &codestream,
            |b, codestream| {
                b.iter(|| {
                    decompress(black_box(codestream), image.geometry(), PrecisionPolicy::Auto)
                        .unwrap()
                });
            },
        );
    }
    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
