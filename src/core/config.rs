//! Stealth configuration with documented constants
//!
//! All tuning numbers are collected here with explanations of their purpose
//! and how they interact with each other. Values are loaded from TOML and
//! clamped once at construction; nothing re-validates per tick.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::Result;
use crate::spatial::raycast::LayerMask;

/// Shared detection meter tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Value at which the meter counts as full (suspicion units)
    pub max_detection: f32,

    /// Passive drain per second on ticks where no guard contributed
    ///
    /// At the default 15/s a full meter empties in about 6.7 seconds.
    pub drain_rate: f32,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            max_detection: 100.0,
            drain_rate: 15.0,
        }
    }
}

/// Per-guard vision tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    /// Maximum sight distance (world units)
    pub vision_range: f32,

    /// Half-angle of the vision cone, in degrees from the facing direction
    pub vision_angle: f32,

    /// Upper bound of the close band
    pub close_range: f32,

    /// Upper bound of the mid band; anything beyond is far
    pub mid_range: f32,

    /// Base contribution while the player is in the close band
    pub close_contribution: f32,

    /// Base contribution while the player is in the mid band
    pub mid_contribution: f32,

    /// Base contribution while the player is in the far band
    ///
    /// Defaults slightly above mid; the bands are not required to be ordered.
    pub far_contribution: f32,

    /// Angle factor at the edge of the cone (1.0 straight ahead)
    pub edge_angle_factor: f32,

    /// Multiplier converting contribution into meter units per second
    pub detection_speed: f32,

    /// Layers that block sight
    pub obstruction_mask: LayerMask,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            vision_range: 15.0,
            vision_angle: 60.0,
            close_range: 5.0,
            mid_range: 10.0,
            close_contribution: 1.0,
            mid_contribution: 0.5,
            far_contribution: 0.6,
            edge_angle_factor: 0.3,
            detection_speed: 4.0,
            obstruction_mask: LayerMask::ALL,
        }
    }
}

/// Real-world patrol tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatrolConfig {
    /// Radius around the spawn point for patrol targets
    pub radius: f32,
    /// Walking speed (units per second)
    pub speed: f32,
    /// Pause at each patrol point (seconds)
    pub wait_time: f32,
    /// Distance at which a patrol point counts as reached
    pub arrive_distance: f32,
    /// How long a guard keeps staring after losing sight of the player
    pub los_lost_hold_time: f32,
    /// Candidate points drawn before giving up and staying in place
    pub max_point_attempts: u32,
}

impl Default for PatrolConfig {
    fn default() -> Self {
        Self {
            radius: 8.0,
            speed: 2.0,
            wait_time: 2.0,
            arrive_distance: 0.5,
            los_lost_hold_time: 2.0,
            max_point_attempts: 10,
        }
    }
}

/// Chase tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChaseConfig {
    /// Running speed (units per second)
    pub speed: f32,
    /// Distance at which the player is caught
    pub catch_distance: f32,
}

impl Default for ChaseConfig {
    fn default() -> Self {
        Self {
            speed: 5.0,
            catch_distance: 0.75,
        }
    }
}

/// Spirit-world wandering and luring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpiritConfig {
    /// Radius around the guard's current position for wander targets
    pub wander_radius: f32,
    /// Wandering speed
    pub wander_speed: f32,
    /// Speed while walking toward a lure
    pub lure_speed: f32,
    /// Distance at which a lured guard counts as arrived
    pub lure_arrive_distance: f32,
    /// Time a lured guard lingers at the lure before wandering again
    pub lure_duration: f32,
}

impl Default for SpiritConfig {
    fn default() -> Self {
        Self {
            wander_radius: 10.0,
            wander_speed: 1.5,
            lure_speed: 3.0,
            lure_arrive_distance: 1.0,
            lure_duration: 4.0,
        }
    }
}

/// Thrown/placed lure objects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LureConfig {
    /// Guards inside this radius are pulled on each pulse
    pub radius: f32,
    /// Seconds from activation until the lure is destroyed
    pub lifetime: f32,
    /// Seconds between pulses
    pub pulse_interval: f32,
    /// Seconds a spawner waits before dropping a replacement lure
    pub respawn_delay: f32,
}

impl Default for LureConfig {
    fn default() -> Self {
        Self {
            radius: 10.0,
            lifetime: 6.0,
            pulse_interval: 0.5,
            respawn_delay: 3.0,
        }
    }
}

/// Spirit-world exposure cost
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorruptionConfig {
    /// Corruption at which the mask is forced off and locked
    pub max_corruption: f32,
    /// Corruption gained per second spent in the spirit world
    ///
    /// At 5/s the spirit world can be used for 20 seconds in total.
    pub per_second: f32,
}

impl Default for CorruptionConfig {
    fn default() -> Self {
        Self {
            max_corruption: 100.0,
            per_second: 5.0,
        }
    }
}

/// Stepping and bookkeeping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StepConfig {
    /// Fixed physics step (seconds)
    pub fixed_dt: f32,
    /// Seed for patrol/wander point selection
    pub seed: u64,
    /// Cell size of the guard grid used for lure queries
    ///
    /// Roughly lure radius / 2 keeps a query to a handful of cells.
    pub grid_cell_size: f32,
}

impl Default for StepConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 0.02,
            seed: 12345,
            grid_cell_size: 5.0,
        }
    }
}

/// Complete configuration for a stealth simulation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StealthConfig {
    pub detection: DetectionConfig,
    pub sensor: SensorConfig,
    pub patrol: PatrolConfig,
    pub chase: ChaseConfig,
    pub spirit: SpiritConfig,
    pub lure: LureConfig,
    pub corruption: CorruptionConfig,
    pub simulation: StepConfig,
}

/// Smallest value accepted where a strictly positive quantity is required
const MIN_POSITIVE: f32 = 0.001;

/// Most grid cells a lure query may span along one axis, each side of the lure
const MAX_GRID_REACH: f32 = 32.0;

fn clamp_positive(value: &mut f32, fallback: f32, field: &str) {
    if !value.is_finite() || *value <= 0.0 {
        tracing::warn!("config {} = {} is not positive, using {}", field, value, fallback);
        *value = fallback;
    }
}

fn clamp_non_negative(value: &mut f32, field: &str) {
    if !value.is_finite() || *value < 0.0 {
        tracing::warn!("config {} = {} is negative, using 0", field, value);
        *value = 0.0;
    }
}

impl StealthConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.detection.max_detection <= 0.0 {
            return Err(format!(
                "max_detection ({}) must be positive",
                self.detection.max_detection
            ));
        }

        if self.sensor.close_range > self.sensor.mid_range {
            return Err(format!(
                "close_range ({}) should be <= mid_range ({})",
                self.sensor.close_range, self.sensor.mid_range
            ));
        }

        if self.sensor.vision_angle <= 0.0 || self.sensor.vision_angle > 180.0 {
            return Err(format!(
                "vision_angle ({}) must be within (0, 180]",
                self.sensor.vision_angle
            ));
        }

        if self.lure.pulse_interval <= 0.0 {
            return Err("lure pulse_interval must be positive".into());
        }

        if self.simulation.fixed_dt <= 0.0 {
            return Err("fixed_dt must be positive".into());
        }

        Ok(())
    }

    /// Clamp every value into a usable range
    ///
    /// Invalid values are corrected (and logged) rather than rejected.
    pub fn sanitized(mut self) -> Self {
        let d = &mut self.detection;
        clamp_positive(&mut d.max_detection, DetectionConfig::default().max_detection, "detection.max_detection");
        clamp_non_negative(&mut d.drain_rate, "detection.drain_rate");

        let s = &mut self.sensor;
        clamp_non_negative(&mut s.vision_range, "sensor.vision_range");
        clamp_positive(&mut s.vision_angle, SensorConfig::default().vision_angle, "sensor.vision_angle");
        if s.vision_angle > 180.0 {
            tracing::warn!("config sensor.vision_angle = {} exceeds 180, using 180", s.vision_angle);
            s.vision_angle = 180.0;
        }
        clamp_non_negative(&mut s.close_range, "sensor.close_range");
        clamp_non_negative(&mut s.mid_range, "sensor.mid_range");
        if s.close_range > s.mid_range {
            tracing::warn!(
                "config sensor.close_range ({}) exceeds mid_range ({}), raising mid_range",
                s.close_range,
                s.mid_range
            );
            s.mid_range = s.close_range;
        }
        clamp_non_negative(&mut s.close_contribution, "sensor.close_contribution");
        clamp_non_negative(&mut s.mid_contribution, "sensor.mid_contribution");
        clamp_non_negative(&mut s.far_contribution, "sensor.far_contribution");
        clamp_non_negative(&mut s.detection_speed, "sensor.detection_speed");
        if !(0.0..=1.0).contains(&s.edge_angle_factor) {
            tracing::warn!("config sensor.edge_angle_factor = {} outside [0, 1], clamping", s.edge_angle_factor);
            s.edge_angle_factor = s.edge_angle_factor.clamp(0.0, 1.0);
        }

        let p = &mut self.patrol;
        clamp_non_negative(&mut p.radius, "patrol.radius");
        clamp_non_negative(&mut p.speed, "patrol.speed");
        clamp_non_negative(&mut p.wait_time, "patrol.wait_time");
        clamp_positive(&mut p.arrive_distance, MIN_POSITIVE, "patrol.arrive_distance");
        clamp_non_negative(&mut p.los_lost_hold_time, "patrol.los_lost_hold_time");
        if p.max_point_attempts == 0 {
            tracing::warn!("config patrol.max_point_attempts = 0, using 1");
            p.max_point_attempts = 1;
        }

        let c = &mut self.chase;
        clamp_non_negative(&mut c.speed, "chase.speed");
        clamp_non_negative(&mut c.catch_distance, "chase.catch_distance");

        let sp = &mut self.spirit;
        clamp_non_negative(&mut sp.wander_radius, "spirit.wander_radius");
        clamp_non_negative(&mut sp.wander_speed, "spirit.wander_speed");
        clamp_non_negative(&mut sp.lure_speed, "spirit.lure_speed");
        clamp_positive(&mut sp.lure_arrive_distance, MIN_POSITIVE, "spirit.lure_arrive_distance");
        clamp_non_negative(&mut sp.lure_duration, "spirit.lure_duration");

        let l = &mut self.lure;
        clamp_non_negative(&mut l.radius, "lure.radius");
        clamp_non_negative(&mut l.lifetime, "lure.lifetime");
        clamp_positive(&mut l.pulse_interval, LureConfig::default().pulse_interval, "lure.pulse_interval");
        clamp_non_negative(&mut l.respawn_delay, "lure.respawn_delay");

        let k = &mut self.corruption;
        clamp_positive(&mut k.max_corruption, CorruptionConfig::default().max_corruption, "corruption.max_corruption");
        clamp_non_negative(&mut k.per_second, "corruption.per_second");

        let min_cell = (self.lure.radius / MAX_GRID_REACH).max(MIN_POSITIVE);
        let st = &mut self.simulation;
        clamp_positive(&mut st.fixed_dt, StepConfig::default().fixed_dt, "simulation.fixed_dt");
        clamp_positive(&mut st.grid_cell_size, StepConfig::default().grid_cell_size, "simulation.grid_cell_size");
        if st.grid_cell_size < min_cell {
            tracing::warn!(
                "config simulation.grid_cell_size = {} is too fine for lure radius {}, using {}",
                st.grid_cell_size,
                self.lure.radius,
                min_cell
            );
            st.grid_cell_size = min_cell;
        }

        self
    }
}

/// Parse a config from TOML text; missing sections take their defaults
pub fn parse_config(content: &str) -> Result<StealthConfig> {
    let config: StealthConfig = toml::from_str(content)?;
    Ok(config.sanitized())
}

/// Load a config from a TOML file
pub fn load_config(path: impl AsRef<Path>) -> Result<StealthConfig> {
    let contents = fs::read_to_string(path.as_ref())?;
    parse_config(&contents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(StealthConfig::default().validate().is_ok());
    }

    #[test]
    fn test_default_values_match_tuning() {
        let config = StealthConfig::default();
        assert_eq!(config.detection.max_detection, 100.0);
        assert_eq!(config.detection.drain_rate, 15.0);
        assert_eq!(config.sensor.vision_angle, 60.0);
        assert_eq!(config.sensor.edge_angle_factor, 0.3);
        assert_eq!(config.lure.pulse_interval, 0.5);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = parse_config(
            r#"
            [detection]
            drain_rate = 20.0

            [sensor]
            vision_range = 12.0
            "#,
        )
        .expect("partial config should parse");

        assert_eq!(config.detection.drain_rate, 20.0);
        assert_eq!(config.detection.max_detection, 100.0);
        assert_eq!(config.sensor.vision_range, 12.0);
        assert_eq!(config.sensor.mid_range, 10.0);
        assert_eq!(config.patrol, PatrolConfig::default());
    }

    #[test]
    fn test_non_positive_max_detection_is_clamped() {
        let mut config = StealthConfig::default();
        config.detection.max_detection = -5.0;
        assert!(config.validate().is_err());

        let config = config.sanitized();
        assert_eq!(config.detection.max_detection, 100.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_inverted_bands_are_repaired() {
        let mut config = StealthConfig::default();
        config.sensor.close_range = 12.0;
        config.sensor.mid_range = 4.0;

        let config = config.sanitized();
        assert_eq!(config.sensor.mid_range, 12.0);
    }

    #[test]
    fn test_zero_pulse_interval_is_clamped() {
        let mut config = StealthConfig::default();
        config.lure.pulse_interval = 0.0;
        config.patrol.max_point_attempts = 0;

        let config = config.sanitized();
        assert!(config.lure.pulse_interval > 0.0);
        assert_eq!(config.patrol.max_point_attempts, 1);
    }

    #[test]
    fn test_tiny_grid_cells_are_raised_relative_to_lure_radius() {
        let mut config = StealthConfig::default();
        config.simulation.grid_cell_size = 0.001;

        let config = config.sanitized();
        assert_eq!(config.simulation.grid_cell_size, config.lure.radius / MAX_GRID_REACH);
        assert!(config.lure.radius / config.simulation.grid_cell_size <= MAX_GRID_REACH);

        // Coarser cells are left alone
        let mut config = StealthConfig::default();
        config.simulation.grid_cell_size = 2.0;
        assert_eq!(config.sanitized().simulation.grid_cell_size, 2.0);
    }

    #[test]
    fn test_malformed_toml_is_an_error() {
        assert!(parse_config("[detection\nmax_detection = ").is_err());
    }
}
