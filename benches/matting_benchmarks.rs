//! Performance benchmarks for matting-kit
//!
//! Measures the per-pixel extraction and refinement paths on synthetic
//! images of realistic sizes to track regressions.

use criterion::*;
use image::{Luma, Rgb};
use matting_kit::{
    extract_distance_matte, extract_hsv_matte, solve_triangulation, CompositeAlphaExt,
    DistanceKeyParams, HsvKeyParams, Image, PixelGrid, RefineAlphaExt,
};
use itertools::iproduct;
use std::hint::black_box;

/// Helper to create a gradient RGB grid with normalized channels.
fn create_gradient_image(width: u32, height: u32) -> PixelGrid {
    let mut image: PixelGrid = Image::new(width, height);
    iproduct!(0..height, 0..width).for_each(|(y, x)| {
        let r = x as f32 / width as f32;
        let g = y as f32 / height as f32;
        let b = (x + y) as f32 / (width + height) as f32;
        image.put_pixel(x, y, Rgb([r, g, b]));
    });
    image
}

/// Helper to create a radial alpha map.
fn create_alpha_map(width: u32, height: u32) -> Image<Luma<f32>> {
    let mut alpha: Image<Luma<f32>> = Image::new(width, height);
    let center_x = width as f32 / 2.0;
    let center_y = height as f32 / 2.0;
    let radius = center_x.min(center_y);
    iproduct!(0..height, 0..width).for_each(|(y, x)| {
        let distance = (x as f32 - center_x).hypot(y as f32 - center_y);
        alpha.put_pixel(x, y, Luma([(1.0 - distance / radius).clamp(0.0, 1.0)]));
    });
    alpha
}

fn bench_triangulation(c: &mut Criterion) {
    let mut group = c.benchmark_group("triangulation");
    for size in [128u32, 512] {
        let image_a = create_gradient_image(size, size);
        let image_b = create_gradient_image(size, size);
        let white = Rgb([1.0, 1.0, 1.0]);
        let black = Rgb([0.0, 0.0, 0.0]);

        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| {
                solve_triangulation(
                    black_box(&image_a),
                    black_box(&image_b),
                    white,
                    black,
                )
                .unwrap()
            });
        });
    }
    group.finish();
}

fn bench_distance_keying(c: &mut Criterion) {
    let mut group = c.benchmark_group("distance_keying");
    for size in [128u32, 512] {
        let image = create_gradient_image(size, size);
        let params = DistanceKeyParams::default();

        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| extract_distance_matte(black_box(&image), &params).unwrap());
        });
    }
    group.finish();
}

fn bench_hsv_keying(c: &mut Criterion) {
    let mut group = c.benchmark_group("hsv_keying");
    for size in [128u32, 512] {
        let image = create_gradient_image(size, size);
        let params = HsvKeyParams::default();

        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| extract_hsv_matte(black_box(&image), &params).unwrap());
        });
    }
    group.finish();
}

fn bench_refine_and_composite(c: &mut Criterion) {
    let mut group = c.benchmark_group("refine_and_composite");
    for size in [128u32, 512] {
        let image = create_gradient_image(size, size);
        let alpha = create_alpha_map(size, size);

        group.bench_with_input(BenchmarkId::new("smooth", size), &size, |b, _| {
            b.iter(|| black_box(alpha.clone()).smooth(1.5).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("composite", size), &size, |b, _| {
            b.iter(|| image.composite_alpha(black_box(&alpha)).unwrap());
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_triangulation,
    bench_distance_keying,
    bench_hsv_keying,
    bench_refine_and_composite
);
criterion_main!(benches);
