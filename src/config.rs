/*
 * Configuration Module
 *
 * Run configuration for the headless simulator, read from TOML:
 *
 *   [flock]       flock settings (speeds, ranges, weights)
 *   [spawn]       initial population
 *   [run]         tick count, time step, report interval
 *   [scheduler]   parallelism and ray count
 *   [[obstacles]] static spheres the boids avoid
 *
 * Every section is optional and falls back to its defaults. Loading
 * validates the result, so a config that loads is safe to tick with.
 */

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::params::FlockSettings;
use crate::probe::SphereObstacle;
use crate::scheduler::SchedulerOptions;
use crate::spawn::SpawnConfig;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub ticks: u64,
    pub dt: f32,
    // Log a flock summary every this many ticks (0 disables)
    pub report_interval: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            ticks: 600,
            dt: 1.0 / 60.0,
            report_interval: 60,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub flock: FlockSettings,
    pub spawn: SpawnConfig,
    pub run: RunConfig,
    pub scheduler: SchedulerOptions,
    pub obstacles: Vec<SphereObstacle>,
}

impl SimulationConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.flock.validate()?;

        if !self.run.dt.is_finite() || self.run.dt < 0.0 {
            return Err(ConfigError::InvalidRun(format!(
                "dt must be a non-negative number, got {}",
                self.run.dt
            )));
        }

        if self.scheduler.ray_count == 0 {
            return Err(ConfigError::InvalidRun("ray_count must be at least 1".into()));
        }

        if !self.spawn.radius.is_finite() || self.spawn.radius < 0.0 {
            return Err(ConfigError::InvalidRun(format!(
                "spawn radius must be a non-negative number, got {}",
                self.spawn.radius
            )));
        }

        if let Some(bad) = self
            .obstacles
            .iter()
            .find(|o| !o.radius.is_finite() || o.radius <= 0.0)
        {
            return Err(ConfigError::InvalidRun(format!(
                "obstacle at {} has invalid radius {}",
                bad.center, bad.radius
            )));
        }

        Ok(())
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
