/*
 * Flock Settings Module
 *
 * This module defines the FlockSettings struct holding the global tuning of
 * the flock: speed limits, the three perception radii and one weight per
 * steering rule. Settings are read-only for the duration of a tick and may
 * be replaced by the host between ticks.
 */

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlockSettings {
    pub max_speed: f32,
    pub min_speed: f32,

    pub perception_range: f32,
    pub separation_range: f32,
    pub collision_range: f32,

    pub alignment_weight: f32,
    pub cohesion_weight: f32,
    pub separation_weight: f32,
    pub collision_weight: f32,
}

impl Default for FlockSettings {
    fn default() -> Self {
        Self {
            max_speed: 8.0,
            min_speed: 4.0,
            perception_range: 4.0,
            separation_range: 2.0,
            collision_range: 2.0,
            alignment_weight: 2.0,
            cohesion_weight: 1.0,
            separation_weight: 3.0,
            collision_weight: 4.0,
        }
    }
}

impl FlockSettings {
    // Reject settings the tick cannot honor. Called by the host at load time.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let fields = [
            ("max_speed", self.max_speed),
            ("min_speed", self.min_speed),
            ("perception_range", self.perception_range),
            ("separation_range", self.separation_range),
            ("collision_range", self.collision_range),
            ("alignment_weight", self.alignment_weight),
            ("cohesion_weight", self.cohesion_weight),
            ("separation_weight", self.separation_weight),
            ("collision_weight", self.collision_weight),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(SettingsError::NonFinite { name });
            }
        }

        for (name, value) in [("min_speed", self.min_speed), ("max_speed", self.max_speed)] {
            if value <= 0.0 {
                return Err(SettingsError::NonPositiveSpeed { name, value });
            }
        }

        if self.min_speed > self.max_speed {
            return Err(SettingsError::MinSpeedExceedsMax {
                min: self.min_speed,
                max: self.max_speed,
            });
        }

        for (name, value) in [
            ("perception_range", self.perception_range),
            ("separation_range", self.separation_range),
            ("collision_range", self.collision_range),
        ] {
            if value < 0.0 {
                return Err(SettingsError::NegativeRange { name, value });
            }
        }

        Ok(())
    }

    #[inline]
    pub fn perception_range_squared(&self) -> f32 {
        self.perception_range * self.perception_range
    }
}
