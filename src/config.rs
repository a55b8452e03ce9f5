//! Arena configuration
//!
//! Every tunable of a session lives in [`ArenaConfig`]. It deserializes from
//! JSON with `#[serde(default)]`, so a file only needs the keys it overrides:
//!
//! ```json
//! { "side_count": 64, "gap_width": 0.0, "replacement_factor": 2 }
//! ```
//!
//! Speeds are in units per second and angles in radians. The defaults match
//! an arcade tuning of 2..15 px per 60 Hz frame with the ring turning
//! 0.01 rad per frame.

use std::f32::consts::{PI, TAU};
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_TICK_HZ, MIN_ENTITY_RADIUS, MIN_SIDE_COUNT};
use crate::error::{ConfigError, ConfigResult};
use crate::sim::boundary::count_gap_slots;

/// Runtime-tunable arena parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    /// RNG seed (same seed + same config = same session)
    pub seed: u64,

    // === Geometry ===
    /// Shorter side of the host viewport; ratios below are relative to it
    pub extent: f32,
    /// Arena center
    pub center: Vec2,
    /// Boundary radius as a fraction of `extent`
    pub boundary_radius_ratio: f32,
    /// Polygon side count approximating the ring
    pub side_count: u32,
    /// Radial thickness of each wall segment
    pub wall_thickness: f32,
    /// Angular width of the opening (0 = closed ring)
    pub gap_width: f32,
    /// Angle the opening is centered on, before rotation
    pub gap_center: f32,
    /// Ring spin in radians per second (0 = static)
    pub rotation_speed: f32,

    // === Entities ===
    /// Prey radius as a fraction of the boundary radius
    pub prey_radius_ratio: f32,
    /// Predator radius as a multiple of the prey radius
    pub predator_radius_ratio: f32,
    pub min_speed: f32,
    pub max_speed: f32,
    pub prey_spawn_speed: f32,
    pub predator_spawn_speed: f32,
    /// Spawns land within this fraction of the boundary radius
    pub spawn_radius_ratio: f32,
    pub initial_prey: usize,
    pub predator_count: usize,

    // === Rules ===
    /// Prey spawned for each prey consumed or escaped
    pub replacement_factor: u32,
    /// Predator radius multiplier per capture
    pub growth_factor: f32,
    /// Cumulative capture counts that fire a milestone
    pub milestones: Vec<u32>,
    /// Remove every live prey when a milestone fires
    pub purge_on_milestone: bool,
    /// Upper bound on live + pending prey
    pub population_cap: Option<usize>,
    /// Prey bounce off each other (otherwise they pass through)
    pub prey_collisions: bool,
    /// Constant acceleration applied to every entity
    pub gravity: Vec2,

    // === Clock ===
    /// Fixed ticks per virtual second
    pub tick_hz: f32,
    /// Trail length kept by the render recorder, in ticks
    pub trail_ticks: usize,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            seed: 0x5EED,

            extent: 800.0,
            center: Vec2::ZERO,
            boundary_radius_ratio: 0.5,
            side_count: 1000,
            wall_thickness: 5.0,
            gap_width: TAU * 0.1,
            gap_center: PI,
            rotation_speed: 0.6,

            prey_radius_ratio: 0.03,
            predator_radius_ratio: 2.0,
            min_speed: 120.0,
            max_speed: 900.0,
            prey_spawn_speed: 600.0,
            predator_spawn_speed: 480.0,
            spawn_radius_ratio: 0.8,
            initial_prey: 1,
            predator_count: 1,

            replacement_factor: 3,
            growth_factor: 1.01,
            milestones: vec![5, 25, 125, 625, 3125],
            purge_on_milestone: false,
            population_cap: None,
            prey_collisions: true,
            gravity: Vec2::ZERO,

            tick_hz: DEFAULT_TICK_HZ,
            trail_ticks: 18,
        }
    }
}

impl ArenaConfig {
    /// Parse a (possibly partial) JSON config and validate it
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded arena config from {}", path.display());
        Ok(config)
    }

    /// Ring radius in world units
    pub fn boundary_radius(&self) -> f32 {
        self.extent * self.boundary_radius_ratio
    }

    /// Prey radius, floored so a zero ratio still yields a usable body
    pub fn prey_radius(&self) -> f32 {
        (self.boundary_radius() * self.prey_radius_ratio).max(MIN_ENTITY_RADIUS)
    }

    /// Starting predator radius
    pub fn predator_radius(&self) -> f32 {
        (self.prey_radius() * self.predator_radius_ratio).max(MIN_ENTITY_RADIUS)
    }

    /// Fixed timestep in seconds
    pub fn dt(&self) -> f32 {
        1.0 / self.tick_hz
    }

    /// Ring rotation applied per tick
    pub fn rotation_per_tick(&self) -> f32 {
        self.rotation_speed * self.dt()
    }

    /// Whether the boundary must be rebuilt every tick
    pub fn is_rotating(&self) -> bool {
        self.rotation_speed != 0.0
    }

    /// Radius within which spawns and relocations land
    pub fn spawn_radius(&self) -> f32 {
        self.boundary_radius() * self.spawn_radius_ratio
    }

    /// Reject configurations that would start the arena in an inconsistent state
    pub fn validate(&self) -> ConfigResult<()> {
        positive("extent", self.extent)?;
        positive("boundary_radius_ratio", self.boundary_radius_ratio)?;
        positive("tick_hz", self.tick_hz)?;
        positive("wall_thickness", self.wall_thickness)?;
        non_negative("prey_radius_ratio", self.prey_radius_ratio)?;
        non_negative("predator_radius_ratio", self.predator_radius_ratio)?;
        non_negative("spawn_radius_ratio", self.spawn_radius_ratio)?;
        non_negative("prey_spawn_speed", self.prey_spawn_speed)?;
        non_negative("predator_spawn_speed", self.predator_spawn_speed)?;
        finite("gap_center", self.gap_center)?;
        finite("rotation_speed", self.rotation_speed)?;
        finite("center.x", self.center.x)?;
        finite("center.y", self.center.y)?;
        finite("gravity.x", self.gravity.x)?;
        finite("gravity.y", self.gravity.y)?;

        if self.side_count < MIN_SIDE_COUNT {
            return Err(ConfigError::SideCount {
                got: self.side_count,
                min: MIN_SIDE_COUNT,
            });
        }

        if !(0.0..TAU).contains(&self.gap_width) {
            return Err(ConfigError::GapTooWide {
                width: self.gap_width,
            });
        }
        if count_gap_slots(self.side_count, self.gap_width, self.gap_center)
            >= self.side_count as usize
        {
            return Err(ConfigError::GapSwallowsRing {
                width: self.gap_width,
                side_count: self.side_count,
            });
        }

        let band_ok = self.min_speed >= 0.0
            && self.max_speed.is_finite()
            && self.min_speed <= self.max_speed;
        if !band_ok {
            return Err(ConfigError::SpeedBand {
                min: self.min_speed,
                max: self.max_speed,
            });
        }

        if !(self.growth_factor >= 1.0) || !self.growth_factor.is_finite() {
            return Err(ConfigError::GrowthFactor {
                value: self.growth_factor,
            });
        }
        if self.replacement_factor == 0 {
            return Err(ConfigError::ReplacementFactor);
        }
        if self.predator_count == 0 {
            return Err(ConfigError::PredatorCount);
        }
        if self.milestones.contains(&0) {
            return Err(ConfigError::ZeroMilestone);
        }
        if self.population_cap == Some(0) {
            return Err(ConfigError::PopulationCap);
        }

        Ok(())
    }
}

fn positive(name: &'static str, value: f32) -> ConfigResult<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { name, value })
    }
}

fn non_negative(name: &'static str, value: f32) -> ConfigResult<()> {
    finite(name, value)?;
    if value < 0.0 {
        return Err(ConfigError::Negative { name, value });
    }
    Ok(())
}

fn finite(name: &'static str, value: f32) -> ConfigResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFinite { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ArenaConfig::default();
        config.validate().unwrap();
        assert!((config.boundary_radius() - 400.0).abs() < 1e-4);
        assert!((config.prey_radius() - 12.0).abs() < 1e-4);
        assert!((config.predator_radius() - 24.0).abs() < 1e-4);
    }

    #[test]
    fn test_partial_json_overrides_defaults() {
        let config =
            ArenaConfig::from_json_str(r#"{ "side_count": 64, "replacement_factor": 2 }"#)
                .unwrap();
        assert_eq!(config.side_count, 64);
        assert_eq!(config.replacement_factor, 2);
        assert_eq!(config.milestones, ArenaConfig::default().milestones);
    }

    #[test]
    fn test_rejects_small_side_count() {
        let config = ArenaConfig {
            side_count: 2,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::SideCount { got: 2, .. })
        ));
    }

    #[test]
    fn test_rejects_full_circle_gap() {
        let config = ArenaConfig {
            gap_width: TAU,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::GapTooWide { .. })
        ));
    }

    #[test]
    fn test_rejects_gap_covering_every_segment() {
        // Three sides, every midpoint is within 3.0 rad of the gap center
        let config = ArenaConfig {
            side_count: 3,
            gap_width: 6.2,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::GapSwallowsRing { .. })
        ));
    }

    #[test]
    fn test_rejects_inverted_speed_band() {
        let config = ArenaConfig {
            min_speed: 500.0,
            max_speed: 100.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::SpeedBand { .. })
        ));
    }

    #[test]
    fn test_rejects_shrinking_growth() {
        let config = ArenaConfig {
            growth_factor: 0.9,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::GrowthFactor { .. })
        ));
    }

    #[test]
    fn test_zero_prey_ratio_is_floored_not_rejected() {
        let config = ArenaConfig {
            prey_radius_ratio: 0.0,
            ..Default::default()
        };
        config.validate().unwrap();
        assert_eq!(config.prey_radius(), MIN_ENTITY_RADIUS);
    }

    #[test]
    fn test_parse_error_is_reported() {
        let err = ArenaConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
