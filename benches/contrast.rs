//! This bench exercises the contrast mathematics: ratio computation over a
//! grid of color pairs and the inverse grayscale search.

#![allow(missing_docs)]

use criterion::{criterion_group, criterion_main, Criterion};
use lumen::domain::color::{check_contrast, find_contrasting_color, ColorValue, TextCategory};

fn contrast_grid(c: &mut Criterion) {
    let colors: Vec<ColorValue> = (0..=255u16)
        .step_by(15)
        .map(|v| {
            let v = u8::try_from(v).unwrap();
            ColorValue::gray(v)
        })
        .collect();

    c.bench_function("contrast grid", |b| {
        b.iter(|| {
            let mut worst = f64::MAX;
            for fg in &colors {
                for bg in &colors {
                    let result = check_contrast(*fg, *bg, TextCategory::Normal);
                    worst = worst.min(result.ratio);
                }
            }
            worst
        });
    });
}

fn inverse_search(c: &mut Criterion) {
    let backgrounds: Vec<ColorValue> = (0..=255u16)
        .step_by(5)
        .map(|v| ColorValue::gray(u8::try_from(v).unwrap()))
        .collect();

    c.bench_function("inverse grayscale search", |b| {
        b.iter(|| {
            backgrounds
                .iter()
                .filter_map(|bg| find_contrasting_color(*bg, 4.5))
                .count()
        });
    });
}

criterion_group!(benches, contrast_grid, inverse_search);
criterion_main!(benches);
