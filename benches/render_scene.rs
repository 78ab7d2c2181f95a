//! Benchmarks for scene construction and in-memory SVG rendering.
//!
//! Run:
//! - cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use gridfigure::config::FigureConfig;
use gridfigure::layout::{Scene, StateId};
use gridfigure::render::render_svg;

fn bench_build_scene(c: &mut Criterion) {
    c.bench_function("scene_maze", |b| {
        b.iter(|| Scene::maze(black_box(StateId::default())).unwrap())
    });
}

fn bench_render_svg(c: &mut Criterion) {
    let cfg = FigureConfig::default();
    let scene = Scene::from_config(&cfg).unwrap();
    c.bench_function("render_svg", |b| {
        b.iter(|| render_svg(black_box(&scene), &cfg).unwrap())
    });
}

criterion_group!(render_scene, bench_build_scene, bench_render_svg);
criterion_main!(render_scene);
