/*
 * Boid Flocking Benchmark
 *
 * Measures the cost of the O(n²) steering rules, the obstacle probe and
 * the full tick (parallel and sequential) for growing flock sizes.
 */

use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;

use boids::rules;
use boids::{
    spawn_flock, Boid, FlockScheduler, FlockSettings, SchedulerOptions, Snapshot, SpawnConfig,
    SphereObstacle, SphereObstacles, SphereRaySet,
};

const FLOCK_SIZES: [usize; 4] = [100, 500, 1000, 2000];

fn flock(n: usize) -> Vec<Boid> {
    let config = SpawnConfig {
        count: n,
        radius: 25.0,
        ..Default::default()
    };
    spawn_flock(&config, 4.0, 8.0, &mut StdRng::seed_from_u64(42))
}

fn obstacles() -> SphereObstacles {
    SphereObstacles::new(vec![
        SphereObstacle::new(Vec3::new(0.0, 0.0, 10.0), 6.0),
        SphereObstacle::new(Vec3::new(-15.0, 5.0, 0.0), 4.0),
        SphereObstacle::new(Vec3::new(12.0, -8.0, -6.0), 5.0),
    ])
}

// Benchmark a single neighbour-scan rule over the whole flock
fn bench_rules(c: &mut Criterion) {
    let mut group = c.benchmark_group("rules");
    let settings = FlockSettings::default();

    for &n in FLOCK_SIZES.iter() {
        let snapshot = Snapshot::from_boids(&flock(n));

        group.bench_with_input(BenchmarkId::new("separation", n), &snapshot, |b, snapshot| {
            b.iter(|| {
                for i in 0..snapshot.len() {
                    black_box(rules::separation(snapshot, &settings, i));
                }
            });
        });

        group.bench_with_input(BenchmarkId::new("cohesion", n), &snapshot, |b, snapshot| {
            b.iter(|| {
                for i in 0..snapshot.len() {
                    black_box(rules::cohesion(snapshot, &settings, i));
                }
            });
        });
    }

    group.finish();
}

// Benchmark the obstacle probe with the default ray set
fn bench_collision_avoidance(c: &mut Criterion) {
    let mut group = c.benchmark_group("collision_avoidance");
    let settings = FlockSettings {
        collision_range: 4.0,
        ..Default::default()
    };
    let rays = SphereRaySet::default();
    let world = obstacles();

    for &n in FLOCK_SIZES.iter() {
        let snapshot = Snapshot::from_boids(&flock(n));
        group.bench_with_input(BenchmarkId::from_parameter(n), &snapshot, |b, snapshot| {
            b.iter(|| {
                for i in 0..snapshot.len() {
                    black_box(rules::collision_avoidance(snapshot, &settings, &rays, &world, i));
                }
            });
        });
    }

    group.finish();
}

// Benchmark the overall tick
fn bench_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("tick");
    let settings = FlockSettings::default();

    for &n in FLOCK_SIZES.iter() {
        for parallel in [true, false] {
            let label = if parallel { "parallel" } else { "sequential" };
            group.bench_with_input(BenchmarkId::new(label, n), &n, |b, &n| {
                let mut scheduler = FlockScheduler::new(
                    obstacles(),
                    SchedulerOptions {
                        parallel,
                        ..Default::default()
                    },
                );
                let mut boids = flock(n);
                b.iter(|| black_box(scheduler.run_tick(&mut boids, &settings, 1.0 / 60.0)));
            });
        }
    }

    group.finish();
}

// Configure the benchmarks
criterion_group! {
    name = benches;
    config = Criterion::default()
        .sample_size(10)
        .measurement_time(Duration::from_secs(5))
        .warm_up_time(Duration::from_secs(1));
    targets = bench_rules, bench_collision_avoidance, bench_tick
}

criterion_main!(benches);
