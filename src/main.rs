/*
 * Boid Flocking Simulation
 *
 * Headless runner for the flocking core. It plays the host's part: loads
 * the configuration, spawns the flock, builds the obstacle world and calls
 * the scheduler once per fixed time step, logging a summary of the flock
 * as it goes.
 */

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use boids::{spawn_flock, FlockScheduler, FlockSummary, SimulationConfig, SphereObstacles};

#[derive(Parser, Debug)]
#[command(name = "boids", about = "Run a headless 3D boid flocking simulation")]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of boids to spawn
    #[arg(short, long)]
    agents: Option<usize>,

    /// Number of ticks to run
    #[arg(short, long)]
    ticks: Option<u64>,

    /// Seed for the spawn generator
    #[arg(short, long)]
    seed: Option<u64>,

    /// Fixed time step in seconds
    #[arg(long)]
    dt: Option<f32>,

    /// Run the steering rules on the calling thread only
    #[arg(long)]
    sequential: bool,

    /// Log level used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    // Apply command line overrides on top of the file configuration
    fn apply(&self, config: &mut SimulationConfig) {
        if let Some(agents) = self.agents {
            config.spawn.count = agents;
        }
        if let Some(ticks) = self.ticks {
            config.run.ticks = ticks;
        }
        if let Some(seed) = self.seed {
            config.spawn.seed = seed;
        }
        if let Some(dt) = self.dt {
            config.run.dt = dt;
        }
        if self.sequential {
            config.scheduler.parallel = false;
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut config = match &args.config {
        Some(path) => SimulationConfig::load(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => SimulationConfig::default(),
    };
    args.apply(&mut config);
    config.validate().context("validating configuration")?;

    let settings = config.flock;
    let mut rng = StdRng::seed_from_u64(config.spawn.seed);
    let mut boids = spawn_flock(&config.spawn, settings.min_speed, settings.max_speed, &mut rng);

    let world = SphereObstacles::new(config.obstacles.clone());
    let mut scheduler = FlockScheduler::new(world, config.scheduler);

    info!(
        agents = boids.len(),
        obstacles = scheduler.world().len(),
        rays = scheduler.rays().len(),
        parallel = config.scheduler.parallel,
        threads = rayon::current_num_threads(),
        "starting simulation"
    );

    let started = Instant::now();
    let mut avoiding_total = 0usize;

    for tick in 1..=config.run.ticks {
        let stats = scheduler.run_tick(&mut boids, &settings, config.run.dt);
        avoiding_total += stats.avoiding;

        if config.run.report_interval > 0 && tick % config.run.report_interval == 0 {
            if let Some(summary) = FlockSummary::of(&boids) {
                info!(
                    tick,
                    centroid = %summary.centroid,
                    mean_speed = summary.mean_speed,
                    min_speed = summary.min_speed,
                    max_speed = summary.max_speed,
                    avoiding = stats.avoiding,
                    tick_ms = stats.total_elapsed().as_secs_f64() * 1000.0,
                    "flock"
                );
            }
        }
    }

    let elapsed = started.elapsed();
    let ticks_per_second = if elapsed.as_secs_f64() > 0.0 {
        config.run.ticks as f64 / elapsed.as_secs_f64()
    } else {
        0.0
    };
    info!(
        ticks = config.run.ticks,
        elapsed_ms = elapsed.as_millis() as u64,
        ticks_per_second,
        avoiding_total,
        "simulation finished"
    );

    Ok(())
}
