//! Show configuration
//!
//! Every tunable the simulation reads lives here. Configs are plain JSON
//! (missing fields fall back to defaults) and are validated once at load time,
//! so the per-frame code can trust them.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Physics constants (pixels and seconds)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Downward acceleration (px/s²)
    pub gravity: f32,
    /// Exponential air drag (1/s, higher = more damping)
    pub air_drag: f32,
    /// Bounciness for walls and body pairs
    pub restitution: f32,
    /// Tangential damping applied on every wall contact
    pub wall_friction: f32,
    /// Floor bounces are never weaker than this (px/s)
    pub min_bounce_vy: f32,
    /// Random extra added to a rescued floor bounce
    pub min_bounce_jitter: f32,
    /// Random horizontal kick on floor hits (±)
    pub floor_kick_vx: f32,
    /// Extra upward push on floor hits
    pub floor_boost_vy: f32,
    /// Upper bound on a single frame's dt (seconds)
    pub max_dt: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 1400.0,
            air_drag: 0.01,
            restitution: 0.95,
            wall_friction: 0.9995,
            min_bounce_vy: 300.0,
            min_bounce_jitter: 180.0,
            floor_kick_vx: 80.0,
            floor_boost_vy: 120.0,
            max_dt: MAX_FRAME_DT,
        }
    }
}

/// Where new bodies enter horizontally
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SpawnPlacement {
    /// Centered over the viewport
    #[default]
    Centered,
    /// Anywhere along the top edge
    Random,
}

/// Initial state of a freshly spawned body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    /// Base horizontal speed (sign is randomized)
    pub x: f32,
    /// Base vertical speed (positive = downward)
    pub y: f32,
    pub x_jitter: f32,
    pub y_jitter: f32,
    pub placement: SpawnPlacement,
    /// Gap between the body's bottom edge and the top of the viewport
    pub lift: f32,
    /// Scale is drawn from 1 ± size_jitter
    pub size_jitter: f32,
    /// 1.0 = collide using the scaled box size
    pub collision_scale: f32,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            x: 900.0,
            y: 900.0,
            x_jitter: 220.0,
            y_jitter: 120.0,
            placement: SpawnPlacement::Centered,
            lift: 40.0,
            size_jitter: 0.25,
            collision_scale: 1.0,
        }
    }
}

/// Phase timing for the show cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShowTiming {
    pub spawn_interval_ms: f64,
    pub max_bodies: usize,
    pub play_duration_ms: f64,
    /// How far below the screen a draining body must fall before it is removed
    pub despawn_margin: f32,
}

impl Default for ShowTiming {
    fn default() -> Self {
        Self {
            spawn_interval_ms: 15_000.0,
            max_bodies: 15,
            play_duration_ms: 60_000.0,
            despawn_margin: 80.0,
        }
    }
}

/// The rare, heavy logo variant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RareConfig {
    /// Spawn probability (0-1)
    pub chance: f64,
    pub mass_multiplier: f32,
    /// Sparkle emission period for rare bodies
    pub sparkle_interval_ms: f64,
}

impl Default for RareConfig {
    fn default() -> Self {
        Self {
            chance: 0.02,
            mass_multiplier: 4.0,
            sparkle_interval_ms: 250.0,
        }
    }
}

/// Squash-and-stretch tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SquashConfig {
    /// Max compression along the impact axis (0-1)
    pub compress: f32,
    /// Max bulge across the impact axis
    pub stretch: f32,
    /// Impact speed that produces the full effect (px/s)
    pub speed_for_max_effect: f32,
    /// Exponential relaxation rate (1/s)
    pub recovery_rate: f32,
    /// Impacts slower than this are invisible
    pub min_impact_speed: f32,
}

impl Default for SquashConfig {
    fn default() -> Self {
        Self {
            compress: 0.35,
            stretch: 0.2,
            speed_for_max_effect: 1600.0,
            recovery_rate: 12.0,
            min_impact_speed: 80.0,
        }
    }
}

/// Complete show configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShowConfig {
    /// RNG seed for spawn jitter, rare rolls and floor kicks
    pub seed: u64,
    /// Unscaled logo size in pixels
    pub base_size: Vec2,
    pub physics: PhysicsConfig,
    pub spawn: SpawnConfig,
    pub show: ShowTiming,
    pub rare: RareConfig,
    pub squash: SquashConfig,
}

impl Default for ShowConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            base_size: Vec2::splat(DEFAULT_LOGO_SIZE),
            physics: PhysicsConfig::default(),
            spawn: SpawnConfig::default(),
            show: ShowTiming::default(),
            rare: RareConfig::default(),
            squash: SquashConfig::default(),
        }
    }
}

impl ShowConfig {
    /// Parse and validate a JSON config
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded show config from {}", path.display());
        Ok(config)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.physics;
        finite("physics.gravity", p.gravity)?;
        non_negative("physics.air_drag", p.air_drag)?;
        unit_range("physics.restitution", p.restitution)?;
        unit_range("physics.wall_friction", p.wall_friction)?;
        non_negative("physics.min_bounce_vy", p.min_bounce_vy)?;
        non_negative("physics.min_bounce_jitter", p.min_bounce_jitter)?;
        non_negative("physics.floor_kick_vx", p.floor_kick_vx)?;
        non_negative("physics.floor_boost_vy", p.floor_boost_vy)?;
        positive("physics.max_dt", p.max_dt)?;

        let s = &self.spawn;
        finite("spawn.x", s.x)?;
        finite("spawn.y", s.y)?;
        non_negative("spawn.x_jitter", s.x_jitter)?;
        non_negative("spawn.y_jitter", s.y_jitter)?;
        non_negative("spawn.lift", s.lift)?;
        if !(0.0..1.0).contains(&s.size_jitter) {
            return Err(ConfigError::invalid("spawn.size_jitter", "must be in [0, 1)"));
        }
        positive("spawn.collision_scale", s.collision_scale)?;

        let t = &self.show;
        if t.max_bodies == 0 {
            return Err(ConfigError::invalid("show.max_bodies", "must be at least 1"));
        }
        if !(t.spawn_interval_ms.is_finite() && t.spawn_interval_ms > 0.0) {
            return Err(ConfigError::invalid("show.spawn_interval_ms", "must be positive"));
        }
        if !(t.play_duration_ms.is_finite() && t.play_duration_ms > 0.0) {
            return Err(ConfigError::invalid("show.play_duration_ms", "must be positive"));
        }
        non_negative("show.despawn_margin", t.despawn_margin)?;

        let r = &self.rare;
        if !(0.0..=1.0).contains(&r.chance) {
            return Err(ConfigError::invalid("rare.chance", "must be in [0, 1]"));
        }
        positive("rare.mass_multiplier", r.mass_multiplier)?;
        if !(r.sparkle_interval_ms.is_finite() && r.sparkle_interval_ms > 0.0) {
            return Err(ConfigError::invalid("rare.sparkle_interval_ms", "must be positive"));
        }

        let q = &self.squash;
        if !(0.0..1.0).contains(&q.compress) {
            return Err(ConfigError::invalid("squash.compress", "must be in [0, 1)"));
        }
        non_negative("squash.stretch", q.stretch)?;
        positive("squash.speed_for_max_effect", q.speed_for_max_effect)?;
        non_negative("squash.recovery_rate", q.recovery_rate)?;
        non_negative("squash.min_impact_speed", q.min_impact_speed)?;

        positive("base_size.x", self.base_size.x)?;
        positive("base_size.y", self.base_size.y)?;
        Ok(())
    }
}

fn finite(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, "must be finite"))
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value < 0.0 {
        return Err(ConfigError::invalid(field, "must not be negative"));
    }
    Ok(())
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value <= 0.0 {
        return Err(ConfigError::invalid(field, "must be positive"));
    }
    Ok(())
}

fn unit_range(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::invalid(field, "must be in [0, 1]"));
    }
    Ok(())
}
