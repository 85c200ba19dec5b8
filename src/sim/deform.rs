//! Squash-and-stretch deformation
//!
//! Purely cosmetic: impacts flatten a body along the contact axis and bulge
//! it across, then it springs back exponentially. Nothing here feeds back
//! into mass, velocity or collision radius.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::SquashConfig;

/// Neutral transform origin (box center)
pub const NEUTRAL_ORIGIN: Vec2 = Vec2::splat(0.5);

/// Visual distortion state of one body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Deformation {
    /// Per-axis scale multipliers, neutral (1, 1)
    pub squash: Vec2,
    /// Transform origin in the body's own box, neutral (0.5, 0.5)
    pub origin: Vec2,
}

impl Default for Deformation {
    fn default() -> Self {
        Self {
            squash: Vec2::ONE,
            origin: NEUTRAL_ORIGIN,
        }
    }
}

impl Deformation {
    /// Decay toward neutral over `dt` seconds
    pub fn relax(&mut self, dt: f32, config: &SquashConfig) {
        let k = (-config.recovery_rate * dt).exp();
        self.squash = Vec2::ONE + (self.squash - Vec2::ONE) * k;
        self.origin = NEUTRAL_ORIGIN + (self.origin - NEUTRAL_ORIGIN) * k;
    }

    /// Excite from an impact
    ///
    /// `normal` points from the body toward whatever it hit; `speed` is the
    /// closing speed along that normal. Returns whether anything changed.
    pub fn impact(&mut self, normal: Vec2, speed: f32, config: &SquashConfig) -> bool {
        // Also rejects NaN and zero-speed contacts when the threshold is 0
        if !(speed > 0.0 && speed >= config.min_impact_speed) {
            return false;
        }
        let n = normal.normalize_or_zero();
        if n == Vec2::ZERO {
            return false;
        }

        let strength = (speed / config.speed_for_max_effect).min(1.0);
        let compressed = 1.0 - config.compress * strength;
        let stretched = 1.0 + config.stretch * strength;
        let edge = |c: f32| if c > 0.0 { 1.0 } else { 0.0 };

        // One-sided clamps: simultaneous impacts keep the strongest effect
        if n.x.abs() >= n.y.abs() {
            self.origin = Vec2::new(edge(n.x), 0.5);
            self.squash.x = self.squash.x.min(compressed);
            self.squash.y = self.squash.y.max(stretched);
        } else {
            self.origin = Vec2::new(0.5, edge(n.y));
            self.squash.y = self.squash.y.min(compressed);
            self.squash.x = self.squash.x.max(stretched);
        }
        true
    }

    pub fn is_neutral(&self, tolerance: f32) -> bool {
        self.squash.abs_diff_eq(Vec2::ONE, tolerance)
            && self.origin.abs_diff_eq(NEUTRAL_ORIGIN, tolerance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn config() -> SquashConfig {
        SquashConfig::default()
    }

    #[test]
    fn test_floor_impact_flattens_vertically() {
        let cfg = config();
        let mut d = Deformation::default();
        assert!(d.impact(Vec2::new(0.0, 1.0), cfg.speed_for_max_effect, &cfg));
        assert!((d.squash.y - (1.0 - cfg.compress)).abs() < 1e-6);
        assert!((d.squash.x - (1.0 + cfg.stretch)).abs() < 1e-6);
        assert_eq!(d.origin, Vec2::new(0.5, 1.0));
    }

    #[test]
    fn test_left_wall_origin() {
        let cfg = config();
        let mut d = Deformation::default();
        d.impact(Vec2::new(-1.0, 0.0), 1000.0, &cfg);
        assert_eq!(d.origin, Vec2::new(0.0, 0.5));
        assert!(d.squash.x < 1.0);
        assert!(d.squash.y > 1.0);
    }

    #[test]
    fn test_slow_impact_ignored() {
        let cfg = config();
        let mut d = Deformation::default();
        assert!(!d.impact(Vec2::Y, cfg.min_impact_speed * 0.5, &cfg));
        assert_eq!(d, Deformation::default());
    }

    #[test]
    fn test_zero_speed_ignored_without_threshold() {
        let cfg = SquashConfig {
            min_impact_speed: 0.0,
            ..config()
        };
        let mut d = Deformation::default();
        assert!(!d.impact(Vec2::X, 0.0, &cfg));
        assert!(!d.impact(Vec2::NEG_Y, -5.0, &cfg));
        assert_eq!(d, Deformation::default());
        assert!(d.impact(Vec2::X, 1.0, &cfg));
    }

    #[test]
    fn test_zero_normal_ignored() {
        let cfg = config();
        let mut d = Deformation::default();
        assert!(!d.impact(Vec2::ZERO, 1000.0, &cfg));
        assert!(!d.impact(Vec2::Y, f32::NAN, &cfg));
        assert_eq!(d, Deformation::default());
    }

    #[test]
    fn test_weaker_impact_does_not_undo_stronger() {
        let cfg = config();
        let mut d = Deformation::default();
        d.impact(Vec2::Y, cfg.speed_for_max_effect, &cfg);
        let strong = d.squash;
        d.impact(Vec2::Y, cfg.min_impact_speed, &cfg);
        assert_eq!(d.squash, strong);
    }

    #[test]
    fn test_relax_converges() {
        let cfg = config();
        let mut d = Deformation::default();
        d.impact(Vec2::new(1.0, 0.2), 5000.0, &cfg);
        for _ in 0..600 {
            d.relax(1.0 / 60.0, &cfg);
        }
        assert!(d.is_neutral(1e-4));
    }

    #[test]
    fn test_relax_zero_dt_is_noop() {
        let cfg = config();
        let mut d = Deformation::default();
        d.impact(Vec2::Y, 1000.0, &cfg);
        let before = d;
        d.relax(0.0, &cfg);
        assert_eq!(d, before);
    }

    proptest! {
        #[test]
        fn prop_squash_stays_bounded(
            hits in prop::collection::vec((-1.0f32..1.0, -1.0f32..1.0, 0.0f32..5000.0, 0.0f32..0.1), 1..40)
        ) {
            let cfg = config();
            let mut d = Deformation::default();
            for (nx, ny, speed, dt) in hits {
                d.relax(dt, &cfg);
                d.impact(Vec2::new(nx, ny), speed, &cfg);
                let lo = 1.0 - cfg.compress - 1e-5;
                let hi = 1.0 + cfg.stretch + 1e-5;
                prop_assert!(d.squash.x >= lo && d.squash.x <= hi);
                prop_assert!(d.squash.y >= lo && d.squash.y <= hi);
                prop_assert!(d.origin.x >= 0.0 && d.origin.x <= 1.0);
                prop_assert!(d.origin.y >= 0.0 && d.origin.y <= 1.0);
            }
        }
    }
}
