//! End-to-end checks of a full tick through the scheduler.

use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;

use boids::math::clamp_magnitude;
use boids::{
    spawn_flock, Boid, FlockScheduler, FlockSettings, NoObstacles, SchedulerOptions, SpawnConfig,
    SphereObstacle, SphereObstacles, TickPhase,
};

fn assert_speeds_in_range(boids: &[Boid], settings: &FlockSettings) {
    for (i, boid) in boids.iter().enumerate() {
        let speed = boid.speed();
        assert!(
            (settings.min_speed..=settings.max_speed).contains(&speed),
            "boid {i} speed {speed} outside [{}, {}]",
            settings.min_speed,
            settings.max_speed
        );
    }
}

#[test]
fn three_in_a_line_outer_boids_push_apart() {
    let settings = FlockSettings {
        separation_range: 2.0,
        perception_range: 5.0,
        ..Default::default()
    };
    let mut boids = vec![
        Boid::new(Vec3::new(-1.0, 0.0, 0.0), Vec3::ZERO),
        Boid::new(Vec3::ZERO, Vec3::ZERO),
        Boid::new(Vec3::new(1.0, 0.0, 0.0), Vec3::ZERO),
    ];
    let mut scheduler = FlockScheduler::new(NoObstacles, SchedulerOptions::default());

    scheduler.run_tick(&mut boids, &settings, 1.0);

    // Pushes on the middle boid cancel out
    let outputs = scheduler.last_rule_outputs();
    assert!(outputs.separation[1].length() < 1.0e-5);
    assert!(outputs.separation[0].x < 0.0);
    assert!(outputs.separation[2].x > 0.0);

    // Outer boids move apart along the line
    assert!(boids[0].velocity.x < 0.0);
    assert!(boids[2].velocity.x > 0.0);
    assert!(boids[0].position.x < -1.0);
    assert!(boids[2].position.x > 1.0);
    assert!((boids[0].velocity.x + boids[2].velocity.x).abs() < 1.0e-4);

    // The middle boid had nothing to steer by and keeps its heading at min speed
    assert!(boids[1].velocity.x.abs() < 1.0e-5);
    assert!((boids[1].velocity - Vec3::Z * settings.min_speed).length() < 1.0e-4);

    assert_speeds_in_range(&boids, &settings);
}

#[test]
fn zero_dt_tick_changes_nothing() {
    let settings = FlockSettings::default();
    let config = SpawnConfig {
        count: 120,
        radius: 6.0,
        ..Default::default()
    };
    let mut boids = spawn_flock(&config, 4.5, 7.5, &mut StdRng::seed_from_u64(3));
    let before = boids.clone();
    let world = SphereObstacles::new(vec![SphereObstacle::new(Vec3::new(2.0, 0.0, 0.0), 2.0)]);
    let mut scheduler = FlockScheduler::new(world, SchedulerOptions::default());

    scheduler.run_tick(&mut boids, &settings, 0.0);

    for (after, before) in boids.iter().zip(&before) {
        assert_eq!(after.position, before.position);
        assert_eq!(after.velocity, before.velocity);
    }
}

#[test]
fn zero_dt_tick_after_clamping_tick_changes_nothing() {
    let settings = FlockSettings {
        min_speed: 3.3,
        max_speed: 7.7,
        ..Default::default()
    };
    let config = SpawnConfig {
        count: 200,
        radius: 4.0,
        ..Default::default()
    };
    // Spawn well outside the speed range so the first tick clamps nearly everyone
    let mut boids = spawn_flock(&config, 0.5, 20.0, &mut StdRng::seed_from_u64(17));
    let world = SphereObstacles::new(vec![SphereObstacle::new(Vec3::new(0.0, 0.0, 3.0), 1.5)]);
    let mut scheduler = FlockScheduler::new(world, SchedulerOptions::default());

    scheduler.run_tick(&mut boids, &settings, 0.1);
    assert_speeds_in_range(&boids, &settings);
    let clamped = boids.clone();

    scheduler.run_tick(&mut boids, &settings, 0.0);

    for (i, (after, before)) in boids.iter().zip(&clamped).enumerate() {
        assert_eq!(after.position, before.position, "boid {i} moved");
        assert_eq!(after.velocity, before.velocity, "boid {i} changed velocity");
    }
}

#[test]
fn zero_dt_tick_keeps_boids_at_the_speed_limits() {
    let settings = FlockSettings::default();
    let mut boids: Vec<Boid> = (0..40)
        .map(|i| {
            let t = i as f32 * 0.9;
            let direction = Vec3::new(t.cos(), (t * 0.5).sin(), t.sin() + 0.1);
            // Clamping from far outside lands on the min or max limit
            let raw = if i % 2 == 0 { direction * 0.01 } else { direction * 100.0 };
            let velocity = clamp_magnitude(raw, settings.min_speed, settings.max_speed);
            Boid::new(Vec3::splat(i as f32 * 0.4), velocity)
        })
        .collect();
    assert_speeds_in_range(&boids, &settings);
    let before = boids.clone();
    let mut scheduler = FlockScheduler::new(NoObstacles, SchedulerOptions::default());

    scheduler.run_tick(&mut boids, &settings, 0.0);

    for (after, before) in boids.iter().zip(&before) {
        assert_eq!(after.position, before.position);
        assert_eq!(after.velocity, before.velocity);
    }
}

#[test]
fn speeds_stay_in_range_over_many_ticks() {
    let settings = FlockSettings::default();
    let config = SpawnConfig {
        count: 150,
        radius: 8.0,
        ..Default::default()
    };
    let mut boids = spawn_flock(&config, 0.1, 20.0, &mut StdRng::seed_from_u64(11));
    let world = SphereObstacles::new(vec![
        SphereObstacle::new(Vec3::new(0.0, 0.0, 6.0), 3.0),
        SphereObstacle::new(Vec3::new(-5.0, 2.0, 0.0), 1.5),
    ]);
    let mut scheduler = FlockScheduler::new(world, SchedulerOptions::default());

    for _ in 0..30 {
        scheduler.run_tick(&mut boids, &settings, 1.0 / 30.0);
        assert_speeds_in_range(&boids, &settings);
        assert!(boids.iter().all(|b| b.position.is_finite() && b.rotation.is_finite()));
    }
    assert_eq!(scheduler.phase(), TickPhase::Idle);
}

#[test]
fn boid_heading_into_obstacle_steers_off_course() {
    let settings = FlockSettings::default();
    let world = SphereObstacles::new(vec![SphereObstacle::new(Vec3::new(0.0, 0.0, 2.5), 1.0)]);
    let mut scheduler = FlockScheduler::new(world, SchedulerOptions::default());
    let mut boids = vec![Boid::new(Vec3::ZERO, Vec3::Z * 5.0)];

    let stats = scheduler.run_tick(&mut boids, &settings, 0.1);

    assert_eq!(stats.avoiding, 1);
    let avoidance = scheduler.last_rule_outputs().avoidance[0];
    assert_ne!(avoidance, Vec3::ZERO);
    // The straight-ahead ray is blocked, so the new heading leaves the +Z axis
    assert!(boids[0].velocity.x.abs() + boids[0].velocity.y.abs() > 1.0e-3);
}

#[test]
fn far_from_obstacles_nobody_avoids() {
    let settings = FlockSettings::default();
    let world = SphereObstacles::new(vec![SphereObstacle::new(Vec3::splat(500.0), 1.0)]);
    let mut scheduler = FlockScheduler::new(world, SchedulerOptions::default());
    let mut boids = spawn_flock(&SpawnConfig::default(), 4.0, 8.0, &mut StdRng::seed_from_u64(5));

    let stats = scheduler.run_tick(&mut boids, &settings, 0.05);

    assert_eq!(stats.agent_count, boids.len());
    assert_eq!(stats.avoiding, 0);
    assert!(scheduler.last_rule_outputs().avoidance.iter().all(|a| *a == Vec3::ZERO));
}
