// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the bildpress-document crate: canonical PNG
// encoding and multi-page PDF export on small synthetic photos.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use image::{Rgb, RgbImage};

use bildpress_document::{ImageContent, PdfExporter};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// A 320x240 gradient, roughly the entropy of a downscaled phone photo.
fn synthetic_photo(seed: u8) -> ImageContent {
    ImageContent::from_rgb(RgbImage::from_fn(320, 240, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, seed.wrapping_add((x ^ y) as u8)])
    }))
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

fn bench_png_encoding(c: &mut Criterion) {
    let photo = synthetic_photo(0);

    c.bench_function("canonical png (320x240)", |b| {
        b.iter(|| black_box(black_box(&photo).to_png_bytes().unwrap()));
    });
}

/// Export a five-page document, the typical size of a receipt or form capture.
fn bench_export(c: &mut Criterion) {
    let photos: Vec<ImageContent> = (0..5).map(|i| synthetic_photo(i * 40)).collect();
    let pages: Vec<&ImageContent> = photos.iter().collect();
    let exporter = PdfExporter::default();

    c.bench_function("export 5 pages (320x240)", |b| {
        b.iter(|| black_box(exporter.export(black_box(&pages)).unwrap()));
    });
}

criterion_group!(benches, bench_png_encoding, bench_export);
criterion_main!(benches);
