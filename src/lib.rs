/*
 * Boid Flocking Core - Module Definitions
 *
 * This file defines the module structure of the flocking core. A tick is
 * driven by the scheduler: snapshot the flock, run the four steering rules
 * in parallel, then integrate.
 */

// Re-export key components for easier access
pub use boid::Boid;
pub use config::{RunConfig, SimulationConfig};
pub use debug::{FlockSummary, TickStats};
pub use error::{ConfigError, SettingsError};
pub use params::FlockSettings;
pub use physics::RuleBuffers;
pub use probe::{NoObstacles, ObstacleQuery, SphereObstacle, SphereObstacles, SphereRaySet};
pub use rules::{Avoidance, Rule, Snapshot};
pub use scheduler::{FlockScheduler, SchedulerOptions, TickPhase};
pub use spawn::{spawn_flock, SpawnConfig};

// Define modules
pub mod boid;
pub mod config;
pub mod debug;
pub mod error;
pub mod math;
pub mod params;
pub mod physics;
pub mod probe;
pub mod rules;
pub mod scheduler;
pub mod spawn;
