use ringcut::{deviation, flatten, Triangulator};
use serde::Deserialize;
use std::f64::consts::TAU;

#[derive(Deserialize)]
struct Fixture {
    name: String,
    rings: Vec<Vec<Vec<f64>>>,
    triangles: usize,
    max_deviation: f64,
}

// Small shapes with known triangle counts: a saw-tooth polygon with two
// reflex spikes, the classic self-touching hourglass, and an outer square
// carrying two hole rings that bridge through each other.
static FIXTURES: &str = r#"[
  {
    "name": "saw",
    "rings": [[[0, 0], [10, 0], [10, 6], [8, 2], [6, 6], [4, 2], [2, 6], [0, 6]]],
    "triangles": 6,
    "max_deviation": 0.0
  },
  {
    "name": "hourglass",
    "rings": [[[0, 0], [100, 0], [50, 50], [100, 100], [0, 100], [50, 50]]],
    "triangles": 2,
    "max_deviation": 0.0
  },
  {
    "name": "two_square_holes",
    "rings": [
      [[0, 0], [10, 0], [10, 10], [0, 10]],
      [[2, 2], [4, 2], [4, 4], [2, 4]],
      [[6, 6], [8, 6], [8, 8], [6, 8]]
    ],
    "triangles": 14,
    "max_deviation": 0.0
  }
]"#;

#[test]
fn fixture_shapes() {
    let fixtures: Vec<Fixture> = serde_json::from_str(FIXTURES).unwrap();
    let mut triangulator = Triangulator::new();
    let mut triangles: Vec<usize> = Vec::new();
    for fixture in &fixtures {
        let (coords, hole_indices, dim) = flatten(&fixture.rings);
        triangulator.triangulate(&coords, &hole_indices, dim, &mut triangles);
        assert_eq!(
            triangles.len(),
            fixture.triangles * 3,
            "triangle count for {}",
            fixture.name
        );
        let d = deviation(&coords, &hole_indices, dim, &triangles);
        assert!(
            d <= fixture.max_deviation,
            "deviation {} for {}",
            d,
            fixture.name
        );
    }
}

#[test]
fn bowtie_emits_one_lobe() {
    // Crossing edges leave one lobe unrecoverable; the other is clipped.
    let data = [0.0, 0.0, 4.0, 4.0, 4.0, 0.0, 0.0, 4.0];
    let mut triangles: Vec<u32> = Vec::new();
    Triangulator::new().triangulate(&data, &[], 2, &mut triangles);
    let mut sorted = triangles.clone();
    sorted.sort_unstable();
    assert_eq!(sorted, vec![1, 2, 3]);
}

fn star(points: usize, outer_radius: f64, inner_radius: f64) -> Vec<f64> {
    let mut data = Vec::with_capacity(points * 2);
    for k in 0..points {
        let theta = k as f64 * TAU / points as f64;
        let r = if k % 2 == 0 { outer_radius } else { inner_radius };
        data.push(r * theta.cos());
        data.push(r * theta.sin());
    }
    data
}

#[test]
fn large_star_uses_indexed_ear_test() {
    // 120 vertices exceeds the z-index threshold of 80 points.
    let data = star(120, 16.0, 8.0);
    let mut triangles: Vec<u32> = Vec::new();
    Triangulator::new().triangulate(&data, &[], 2, &mut triangles);
    assert_eq!(triangles.len(), (120 - 2) * 3);
    for tri in triangles.chunks(3) {
        assert!(tri[0] != tri[1] && tri[1] != tri[2] && tri[0] != tri[2]);
        assert!(tri.iter().all(|&i| (i as usize) < 120));
    }
    assert!(deviation(&data, &[], 2, &triangles) < 1e-9);
}

#[test]
fn grid_of_holes_uses_indexed_ear_test() {
    // 4 outer vertices plus 25 square holes of 4 vertices each.
    let mut rings = vec![vec![
        vec![0.0, 0.0],
        vec![130.0, 0.0],
        vec![130.0, 130.0],
        vec![0.0, 130.0],
    ]];
    for i in 0..5 {
        for j in 0..5 {
            let x = 10.0 + 24.0 * i as f64;
            let y = 10.0 + 24.0 * j as f64;
            rings.push(vec![
                vec![x, y],
                vec![x + 4.0, y],
                vec![x + 4.0, y + 4.0],
                vec![x, y + 4.0],
            ]);
        }
    }
    let (coords, hole_indices, dim) = flatten(&rings);
    assert_eq!(coords.len(), 104 * 2);
    let mut triangles: Vec<usize> = Vec::new();
    Triangulator::new().triangulate(&coords, &hole_indices, dim, &mut triangles);
    assert!(!triangles.is_empty());
    assert_eq!(triangles.len() % 3, 0);
    assert!(triangles.iter().all(|&i| (i as usize) < 104));
    assert!(deviation(&coords, &hole_indices, dim, &triangles) <= 1e-12);
}

#[test]
fn output_is_stable_across_reuse() {
    let data = star(60, 10.0, 4.0);
    let mut triangulator = Triangulator::new();
    let mut first: Vec<u32> = Vec::new();
    triangulator.triangulate(&data, &[], 2, &mut first);
    let mut second: Vec<u32> = Vec::new();
    triangulator.triangulate(&data, &[], 2, &mut second);
    assert_eq!(first, second);
}
