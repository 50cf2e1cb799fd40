use criterion::{Criterion, criterion_group, criterion_main};
use glam::Vec3;
use sonic_geode::geometry::{TorusKnotParams, TubeParams, sphere, torus_knot, tube};

/// Helix with `n` points, a stand-in for a long tentacle path.
fn helix(n: usize) -> Vec<Vec3> {
    (0..n)
        .map(|i| {
            let t = i as f32 * 0.1;
            Vec3::new(20.0 * t.cos(), 2.0 * t, 20.0 * t.sin())
        })
        .collect()
}

fn bench_tube(c: &mut Criterion) {
    let path = helix(1_000);
    let params = TubeParams {
        radius: 3.0,
        radial_segments: 16,
        ..Default::default()
    };

    c.bench_function("tube_1k_points_16_segments", |b| {
        b.iter(|| tube(&path, &params));
    });
}

fn bench_solids(c: &mut Criterion) {
    let knot = TorusKnotParams {
        tubular_segments: 512,
        radial_segments: 16,
        ..Default::default()
    };

    c.bench_function("torus_knot_512x16", |b| {
        b.iter(|| torus_knot(&knot));
    });

    c.bench_function("sphere_res_64", |b| {
        b.iter(|| sphere(10.0, 64));
    });
}

criterion_group!(benches, bench_tube, bench_solids);
criterion_main!(benches);
