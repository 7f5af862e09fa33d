use glam::Vec3;
use svo_nav_core::VolumeBounds;
use svo_nav_octree::{generate, BuildSettings};
use svo_nav_search::{find_path, PathFinderSettings};

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

/// A grid of box pillars the search has to weave through.
fn pillars(center: Vec3, half: f32) -> bool {
    let lo = center - Vec3::splat(half);
    let hi = center + Vec3::splat(half);
    // Pillars of cross-section [0, 2]² on an 8-unit grid in x/z, full height.
    let hits = |a: f32, b: f32| {
        let cell = (a / 8.0).floor() * 8.0;
        b >= cell && a <= cell + 2.0 || b >= cell + 8.0
    };
    hits(lo.x, hi.x) && hits(lo.z, hi.z)
}

fn find_path_through_pillars(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_path_through_pillars");
    for power in [3u8, 4].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(power), power, |b, &power| {
            let octree = generate(
                VolumeBounds::new(Vec3::ZERO, 32.0),
                &BuildSettings {
                    voxel_power: power,
                    clearance: 0.0,
                },
                &pillars,
            );
            let settings = PathFinderSettings::default();
            b.iter(|| {
                find_path(
                    &octree,
                    &settings,
                    black_box(Vec3::new(-28.0, -28.0, -28.0)),
                    black_box(Vec3::new(28.0, 28.0, 28.0)),
                )
            });
        });
    }
    group.finish();
}

criterion_group!(benches, find_path_through_pillars);
criterion_main!(benches);
