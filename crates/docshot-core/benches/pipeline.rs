//! Benchmarks for the docshot screenshot pipeline.
//!
//! Run with: cargo bench -p docshot-core

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use docshot_core::pipeline::encode::encode;
use docshot_core::pipeline::{transform, ImageDecoder};
use docshot_core::{Config, ScreenshotKind, TransformSettings};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::io::Cursor;
use std::path::Path;

/// A busy 1280x800 frame: gradients plus hard edges, roughly like a UI capture.
fn screenshot() -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(1280, 800, |x, y| {
        if (x / 40 + y / 40) % 2 == 0 {
            Rgb([(x % 256) as u8, (y % 256) as u8, 200])
        } else {
            Rgb([250, 250, 250])
        }
    }))
}

fn settings(kind: ScreenshotKind, format: &str) -> TransformSettings {
    let mut settings = TransformSettings::from_config(&Config::default()).unwrap();
    settings.kind = kind;
    settings.set_format(format).unwrap();
    settings
}

fn benchmark_decode(c: &mut Criterion) {
    let mut bytes = Vec::new();
    screenshot()
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    let decoder = ImageDecoder::new(Config::default().limits);

    c.bench_function("decode_png_1280x800", |b| {
        b.iter(|| {
            let _ = decoder.decode_from_bytes(black_box(bytes.clone()), Path::new("bench.png"));
        })
    });
}

fn benchmark_transform(c: &mut Criterion) {
    let img = screenshot();
    let default = settings(ScreenshotKind::Default, "png");
    let viz = settings(ScreenshotKind::Viz, "png");

    c.bench_function("transform_default_medium", |b| {
        b.iter(|| transform(black_box(img.clone()), &default))
    });
    c.bench_function("transform_viz_medium", |b| {
        b.iter(|| transform(black_box(img.clone()), &viz))
    });
}

fn benchmark_encode(c: &mut Criterion) {
    let png = settings(ScreenshotKind::Default, "png");
    let jpg = settings(ScreenshotKind::Default, "jpg");
    let img = transform(screenshot(), &png);

    c.bench_function("encode_png_fast", |b| {
        b.iter(|| encode(black_box(&img), &png, Path::new("bench.png")))
    });
    c.bench_function("encode_jpeg_q95", |b| {
        b.iter(|| encode(black_box(&img), &jpg, Path::new("bench.jpg")))
    });
}

criterion_group!(
    benches,
    benchmark_decode,
    benchmark_transform,
    benchmark_encode,
);
criterion_main!(benches);
