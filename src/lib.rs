//! Bouncy Logo - a decorative physics show for a small logo image
//!
//! Core modules:
//! - `sim`: Deterministic simulation (bodies, collisions, squash-stretch, show phases)
//! - `config`: Data-driven tuning, loaded from JSON and validated once
//! - `sparkle`: Decorative emission timers for rare bodies, driven by show events
//! - `platform`: Browser bridge for the per-frame host callback

pub mod config;
pub mod error;
pub mod platform;
pub mod sim;
pub mod sparkle;

pub use config::ShowConfig;
pub use error::ConfigError;

use glam::Vec2;
use rand::Rng;

/// Simulation constants shared by the defaults
pub mod consts {
    /// Upper bound on a single frame's dt; slower frames are slowed down, not stretched
    pub const MAX_FRAME_DT: f32 = 0.05;
    /// Headless driver frame rate
    pub const HOST_FRAME_MS: f64 = 1000.0 / 60.0;

    /// Default unscaled logo edge (pixels)
    pub const DEFAULT_LOGO_SIZE: f32 = 96.0;
    /// Default RNG seed when the host doesn't supply one
    pub const DEFAULT_SEED: u64 = 0x5EED_B0B5;

    /// Collision radius never drops below this
    pub const MIN_RADIUS: f32 = 1.0;
    /// Stand-in distance for perfectly coincident bodies
    pub const COINCIDENT_EPSILON: f32 = 0.001;
}

/// Uniform sample in [-amount, amount] (0 when amount is 0)
#[inline]
pub fn jitter<R: Rng + ?Sized>(rng: &mut R, amount: f32) -> f32 {
    if amount > 0.0 {
        rng.random_range(-amount..=amount)
    } else {
        0.0
    }
}

/// Random sign, ±1 with equal probability
#[inline]
pub fn random_sign<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    if rng.random_bool(0.5) { -1.0 } else { 1.0 }
}

/// Center of an axis-aligned box given its top-left corner
#[inline]
pub fn box_center(top_left: Vec2, size: Vec2) -> Vec2 {
    top_left + size * 0.5
}
