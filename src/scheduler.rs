/*
 * Scheduler Module
 *
 * Drives one simulation tick through four phases:
 *   Idle -> Snapshotting -> RulesRunning -> Integrating -> Idle
 *
 * - Snapshotting copies positions, velocities and rotations into a frozen
 *   buffer that every rule reads for the rest of the tick.
 * - RulesRunning forks the four rule kernels (rayon::join). Each kernel owns
 *   one output buffer and splits it into chunks across the thread pool, so
 *   nothing written during this phase is shared.
 * - Integrating starts only after the join, when every buffer is complete.
 *
 * The scheduler owns the scratch buffers and the sphere ray set so repeated
 * ticks reuse their allocations.
 */

use std::time::Instant;

use glam::Vec3;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::boid::Boid;
use crate::debug::TickStats;
use crate::params::FlockSettings;
use crate::physics::{integrate_flock, RuleBuffers};
use crate::probe::{ObstacleQuery, SphereRaySet, DEFAULT_RAY_COUNT};
use crate::rules::{self, Snapshot};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickPhase {
    Idle,
    Snapshotting,
    RulesRunning,
    Integrating,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerOptions {
    // Run kernels on the rayon pool; otherwise everything runs on the caller's thread
    pub parallel: bool,
    // Boids per parallel chunk; None sizes chunks to the thread count
    pub chunk_size: Option<usize>,
    pub ray_count: usize,
}

impl Default for SchedulerOptions {
    fn default() -> Self {
        Self {
            parallel: true,
            chunk_size: None,
            ray_count: DEFAULT_RAY_COUNT,
        }
    }
}

pub struct FlockScheduler<Q> {
    world: Q,
    rays: SphereRaySet,
    options: SchedulerOptions,
    phase: TickPhase,
    snapshot: Snapshot,
    buffers: RuleBuffers,
}

impl<Q> FlockScheduler<Q>
where
    Q: ObstacleQuery + Sync,
{
    pub fn new(world: Q, options: SchedulerOptions) -> Self {
        let rays = SphereRaySet::fibonacci(options.ray_count);
        Self::with_rays(world, rays, options)
    }

    // Use an explicit ray set instead of the Fibonacci one
    pub fn with_rays(world: Q, rays: SphereRaySet, options: SchedulerOptions) -> Self {
        Self {
            world,
            rays,
            options,
            phase: TickPhase::Idle,
            snapshot: Snapshot::default(),
            buffers: RuleBuffers::default(),
        }
    }

    pub fn phase(&self) -> TickPhase {
        self.phase
    }

    pub fn rays(&self) -> &SphereRaySet {
        &self.rays
    }

    pub fn world(&self) -> &Q {
        &self.world
    }

    pub fn options(&self) -> &SchedulerOptions {
        &self.options
    }

    // Rule outputs of the last tick, indexed like the boids slice
    pub fn last_rule_outputs(&self) -> &RuleBuffers {
        &self.buffers
    }

    /// Advance the flock by `dt`.
    ///
    /// Settings are assumed valid; see `FlockSettings::validate`.
    pub fn run_tick(&mut self, boids: &mut [Boid], settings: &FlockSettings, dt: f32) -> TickStats {
        debug_assert!(settings.validate().is_ok(), "invalid flock settings");
        debug_assert_eq!(self.phase, TickPhase::Idle);

        let mut stats = TickStats {
            agent_count: boids.len(),
            ..Default::default()
        };

        if boids.is_empty() {
            return stats;
        }

        if !dt.is_finite() {
            warn!(dt, "non-finite dt, skipping tick");
            return stats;
        }

        let chunk_size = self.chunk_size(boids.len());

        // Snapshotting
        self.set_phase(TickPhase::Snapshotting);
        self.snapshot.capture(boids);
        self.buffers.resize(boids.len());

        // RulesRunning
        self.set_phase(TickPhase::RulesRunning);
        let rules_started = Instant::now();
        self.run_rules(settings, chunk_size);
        stats.rules_elapsed = rules_started.elapsed();
        stats.record_avoidance(&self.buffers.avoidance);

        // Integrating
        self.set_phase(TickPhase::Integrating);
        let integrate_started = Instant::now();
        integrate_flock(boids, &self.buffers, settings, dt, chunk_size);
        stats.integrate_elapsed = integrate_started.elapsed();

        self.set_phase(TickPhase::Idle);

        debug!(
            agents = stats.agent_count,
            avoiding = stats.avoiding,
            rules_us = stats.rules_elapsed.as_micros() as u64,
            integrate_us = stats.integrate_elapsed.as_micros() as u64,
            "tick complete"
        );

        stats
    }

    fn set_phase(&mut self, phase: TickPhase) {
        trace!(from = ?self.phase, to = ?phase, "tick phase");
        self.phase = phase;
    }

    // None means run sequentially
    fn chunk_size(&self, len: usize) -> Option<usize> {
        if !self.options.parallel {
            return None;
        }
        let chunk_size = self
            .options
            .chunk_size
            .unwrap_or_else(|| len / rayon::current_num_threads());
        Some(chunk_size.max(1))
    }

    fn run_rules(&mut self, settings: &FlockSettings, chunk_size: Option<usize>) {
        let snapshot = &self.snapshot;
        let rays = &self.rays;
        let world = &self.world;
        let RuleBuffers {
            cohesion,
            alignment,
            separation,
            avoidance,
        } = &mut self.buffers;

        let mut cohesion_job = move || fill(cohesion, chunk_size, |i| rules::cohesion(snapshot, settings, i));
        let mut alignment_job = move || fill(alignment, chunk_size, |i| rules::alignment(snapshot, settings, i));
        let mut separation_job = move || fill(separation, chunk_size, |i| rules::separation(snapshot, settings, i));
        let mut avoidance_job = move || {
            fill(avoidance, chunk_size, |i| {
                rules::collision_avoidance(snapshot, settings, rays, world, i)
            })
        };

        if chunk_size.is_some() {
            // Both joins return only once all four kernels are done
            rayon::join(
                || rayon::join(cohesion_job, alignment_job),
                || rayon::join(separation_job, avoidance_job),
            );
        } else {
            cohesion_job();
            alignment_job();
            separation_job();
            avoidance_job();
        }
    }
}

// Evaluate a kernel for every slot of its output buffer
fn fill<F>(output: &mut [Vec3], chunk_size: Option<usize>, kernel: F)
where
    F: Fn(usize) -> Vec3 + Sync,
{
    match chunk_size {
        Some(chunk_size) => {
            output
                .par_chunks_mut(chunk_size)
                .enumerate()
                .for_each(|(chunk_idx, chunk)| {
                    for (i_in_chunk, slot) in chunk.iter_mut().enumerate() {
                        *slot = kernel(chunk_idx * chunk_size + i_in_chunk);
                    }
                });
        }
        None => {
            for (i, slot) in output.iter_mut().enumerate() {
                *slot = kernel(i);
            }
        }
    }
}
