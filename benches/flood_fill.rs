//! Criterion benchmarks for the repaint hot paths
//!
//! - Flood fill: single and multi-seed mask computation, serial vs rayon
//! - Compose: painting a selection over the working image
//! - Hues: dominant hue detection

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ndarray::Array3;
use recolor_rust::filters::hue::find_hues;
use recolor_rust::{compute_mask, FillConfig, RepaintMask, SeedCollection, SeedPoint};

// =============================================================================
// Test Data Generators
// =============================================================================

/// Smooth diagonal gradient with a few hard-edged color blocks.
fn make_photo(size: usize) -> Array3<u8> {
    Array3::from_shape_fn((size, size, 3), |(y, x, c)| {
        let block = (x / (size / 4).max(1) + y / (size / 4).max(1)) % 3;
        let base = ((x + y) * 255 / (2 * size)) as u8;
        if block == c {
            base.saturating_add(90)
        } else {
            base / 2
        }
    })
}

fn make_seeds(size: usize, count: usize) -> SeedCollection {
    (0..count)
        .map(|i| {
            let p = (i * size / count.max(1)) as f64;
            SeedPoint::new(p, size as f64 - 1.0 - p, 0.2)
        })
        .collect()
}

// =============================================================================
// Benchmarks
// =============================================================================

fn bench_flood_fill(c: &mut Criterion) {
    let mut group = c.benchmark_group("flood_fill");

    for size in [256, 1024] {
        let image = make_photo(size);
        group.throughput(Throughput::Elements((size * size) as u64));

        for seeds in [1, 8] {
            let collection = make_seeds(size, seeds);
            for parallel in [false, true] {
                let config = FillConfig::default().with_parallel(parallel);
                let id = format!("{}px_{}seeds_{}", size, seeds, if parallel { "par" } else { "seq" });
                group.bench_with_input(BenchmarkId::from_parameter(id), &collection, |b, collection| {
                    b.iter(|| compute_mask(black_box(image.view()), collection, None, &config))
                });
            }
        }
    }

    group.finish();
}

fn bench_compose(c: &mut Criterion) {
    let mut group = c.benchmark_group("compose");
    let size = 1024;
    let mut paint = RepaintMask::new(make_photo(size)).expect("bench image");
    paint.set_areas(make_seeds(size, 4)).expect("bench seeds");
    group.throughput(Throughput::Elements((size * size) as u64));

    group.bench_function("opaque", |b| {
        b.iter(|| {
            paint.set_color(black_box(0xFF3366CC));
            paint.flood_image().len()
        })
    });
    group.bench_function("translucent", |b| {
        b.iter(|| {
            paint.set_color(black_box(0x803366CC));
            paint.flood_image().len()
        })
    });

    group.finish();
}

fn bench_hues(c: &mut Criterion) {
    let image = make_photo(1024);
    c.bench_function("find_hues_1024", |b| b.iter(|| find_hues(black_box(image.view()))));
}

// =============================================================================
// Criterion Configuration
// =============================================================================

criterion_group!(benches, bench_flood_fill, bench_compose, bench_hues);
criterion_main!(benches);
