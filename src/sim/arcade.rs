//! Arcade mode: a single logo drifting and bouncing like an old screensaver
//!
//! No gravity, drag or squash; the logo moves at constant speed and reflects
//! off every edge of the play area.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::boundary::Viewport;
use crate::consts::MAX_FRAME_DT;
use crate::random_sign;

/// Speed ranges for the initial drift (px/s)
pub const ARCADE_SPEED_X: (f32, f32) = (220.0, 360.0);
pub const ARCADE_SPEED_Y: (f32, f32) = (160.0, 300.0);

/// Single bouncing logo
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Arcade {
    /// Top-left corner
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    #[serde(skip)]
    last_t: Option<f64>,
}

impl Arcade {
    /// Place the logo somewhere inside the viewport with a random diagonal drift
    pub fn new(seed: u64, size: Vec2, viewport: Viewport) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let max = max_pos(size, viewport);
        let pos = Vec2::new(
            rng.random_range(0.0..=max.x),
            rng.random_range(0.0..=max.y),
        );
        let vel = Vec2::new(
            rng.random_range(ARCADE_SPEED_X.0..ARCADE_SPEED_X.1) * random_sign(&mut rng),
            rng.random_range(ARCADE_SPEED_Y.0..ARCADE_SPEED_Y.1) * random_sign(&mut rng),
        );
        Self {
            pos,
            vel,
            size,
            last_t: None,
        }
    }

    /// Advance to host time `t` (ms) and return the new top-left position
    pub fn frame(&mut self, t: f64, viewport: Viewport) -> Vec2 {
        let dt = match self.last_t {
            Some(last) => ((t - last) / 1000.0).max(0.0).min(f64::from(MAX_FRAME_DT)) as f32,
            None => 0.0,
        };
        self.last_t = Some(t);
        self.pos += self.vel * dt;
        self.bounce(viewport);
        self.pos
    }

    /// Reflect off any edge the logo touches, heading back inside
    fn bounce(&mut self, viewport: Viewport) {
        let max = max_pos(self.size, viewport);
        if self.pos.x <= 0.0 {
            self.pos.x = 0.0;
            self.vel.x = self.vel.x.abs();
        } else if self.pos.x >= max.x {
            self.pos.x = max.x;
            self.vel.x = -self.vel.x.abs();
        }
        if self.pos.y <= 0.0 {
            self.pos.y = 0.0;
            self.vel.y = self.vel.y.abs();
        } else if self.pos.y >= max.y {
            self.pos.y = max.y;
            self.vel.y = -self.vel.y.abs();
        }
    }

    /// Keep the logo visible after the viewport changed
    pub fn resize(&mut self, viewport: Viewport) {
        self.pos = self.pos.clamp(Vec2::ZERO, max_pos(self.size, viewport));
    }
}

fn max_pos(size: Vec2, viewport: Viewport) -> Vec2 {
    Vec2::new(viewport.width - size.x, viewport.play_height() - size.y).max(Vec2::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_inside_with_bounded_speed() {
        let vp = Viewport::new(800.0, 600.0).with_banner(40.0);
        for seed in 0..20 {
            let a = Arcade::new(seed, Vec2::splat(100.0), vp);
            assert!(a.pos.x >= 0.0 && a.pos.x <= 700.0);
            assert!(a.pos.y >= 0.0 && a.pos.y <= 460.0);
            assert!(a.vel.x.abs() >= ARCADE_SPEED_X.0 && a.vel.x.abs() < ARCADE_SPEED_X.1);
            assert!(a.vel.y.abs() >= ARCADE_SPEED_Y.0 && a.vel.y.abs() < ARCADE_SPEED_Y.1);
        }
    }

    #[test]
    fn test_reflects_off_right_and_bottom() {
        let vp = Viewport::new(800.0, 600.0);
        let mut a = Arcade::new(1, Vec2::splat(100.0), vp);
        a.pos = Vec2::new(695.0, 495.0);
        a.vel = Vec2::new(300.0, 200.0);
        a.frame(0.0, vp);
        let pos = a.frame(50.0, vp);
        assert_eq!(pos, Vec2::new(700.0, 500.0));
        assert!(a.vel.x < 0.0 && a.vel.y < 0.0);
        assert_eq!(a.vel.length(), Vec2::new(300.0, 200.0).length());
    }

    #[test]
    fn test_stays_inside_for_a_long_time() {
        let vp = Viewport::new(640.0, 480.0);
        let mut a = Arcade::new(9, Vec2::new(120.0, 60.0), vp);
        let mut t = 0.0;
        for _ in 0..5000 {
            let pos = a.frame(t, vp);
            assert!(pos.x >= 0.0 && pos.x <= 520.0);
            assert!(pos.y >= 0.0 && pos.y <= 420.0);
            t += 16.0;
        }
    }

    #[test]
    fn test_resize_clamps() {
        let mut a = Arcade::new(3, Vec2::splat(50.0), Viewport::new(800.0, 600.0));
        a.pos = Vec2::new(700.0, 500.0);
        a.resize(Viewport::new(300.0, 200.0));
        assert_eq!(a.pos, Vec2::new(250.0, 150.0));
    }
}
