use std::f64::consts::TAU;

use criterion::{criterion_group, criterion_main, Criterion};

use ringcut::Triangulator;

fn star(points: usize, outer_radius: f64, inner_radius: f64) -> (Vec<f64>, Vec<usize>) {
    let mut data = Vec::with_capacity(points * 2);
    for k in 0..points {
        let theta = k as f64 * TAU / points as f64;
        let r = if k % 2 == 0 { outer_radius } else { inner_radius };
        data.push(r * theta.cos());
        data.push(r * theta.sin());
    }
    (data, Vec::new())
}

fn hole_grid(side: usize) -> (Vec<f64>, Vec<usize>) {
    let extent = 24.0 * side as f64 + 20.0;
    let mut data = vec![0.0, 0.0, extent, 0.0, extent, extent, 0.0, extent];
    let mut hole_indices = Vec::with_capacity(side * side);
    for i in 0..side {
        for j in 0..side {
            let x = 10.0 + 24.0 * i as f64;
            let y = 10.0 + 24.0 * j as f64;
            hole_indices.push(data.len() / 2);
            data.extend([x, y, x + 4.0, y, x + 4.0, y + 4.0, x, y + 4.0]);
        }
    }
    (data, hole_indices)
}

fn bench(c: &mut Criterion) {
    let mut triangulator = Triangulator::new();
    let mut triangles: Vec<u32> = Vec::new();

    c.bench_function("star-64", |b| {
        let (data, hole_indices) = star(64, 100.0, 40.0);
        b.iter(|| {
            triangulator.triangulate(&data, &hole_indices, 2, &mut triangles);
        })
    });

    c.bench_function("star-4096", |b| {
        let (data, hole_indices) = star(4096, 100.0, 40.0);
        b.iter(|| {
            triangulator.triangulate(&data, &hole_indices, 2, &mut triangles);
            assert_eq!(triangles.len(), (4096 - 2) * 3)
        })
    });

    c.bench_function("star-65536", |b| {
        let (data, hole_indices) = star(65536, 100.0, 40.0);
        b.iter(|| {
            triangulator.triangulate(&data, &hole_indices, 2, &mut triangles);
        })
    });

    c.bench_function("hole-grid-8", |b| {
        let (data, hole_indices) = hole_grid(8);
        b.iter(|| {
            triangulator.triangulate(&data, &hole_indices, 2, &mut triangles);
        })
    });

    c.bench_function("hole-grid-32", |b| {
        let (data, hole_indices) = hole_grid(32);
        b.iter(|| {
            triangulator.triangulate(&data, &hole_indices, 2, &mut triangles);
        })
    });
}

criterion_group!(benches, bench);
criterion_main!(benches);
