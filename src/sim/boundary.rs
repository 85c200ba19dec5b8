//! Viewport walls, ceiling and floor
//!
//! Bodies live in screen space: x grows right, y grows down, and a body's
//! position is the top-left corner of its box. The play area is the viewport
//! minus the banner strip reserved at the bottom.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::body::Body;
use super::collision::Contact;
use crate::config::{PhysicsConfig, SquashConfig};
use crate::jitter;

/// Host viewport, measured every frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    /// Reserved strip at the bottom (0 when no banner is shown)
    #[serde(default)]
    pub banner_height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            banner_height: 0.0,
        }
    }

    pub fn with_banner(mut self, banner_height: f32) -> Self {
        self.banner_height = banner_height;
        self
    }

    /// Height available to bodies
    #[inline]
    pub fn play_height(&self) -> f32 {
        (self.height - self.banner_height).max(0.0)
    }

    /// Clamp limits for a box of the given size
    pub fn bounds_for(&self, size: Vec2, despawn_margin: f32) -> PlayBounds {
        PlayBounds {
            max_x: (self.width - size.x).max(0.0),
            max_y: (self.play_height() - size.y).max(0.0),
            despawn_y: self.height + size.y + despawn_margin,
        }
    }
}

/// Position limits for one body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayBounds {
    pub max_x: f32,
    pub max_y: f32,
    /// Below this a draining body is gone for good
    pub despawn_y: f32,
}

/// How the floor behaves this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloorMode {
    /// No floor; bodies fall out of the viewport
    Open,
    /// Plain restitution bounce
    Solid,
    /// Bounce plus boost, minimum rebound and a sideways kick
    Lively,
}

/// Edge contacts from one resolution pass
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WallHits {
    pub horizontal: Option<Contact>,
    pub vertical: Option<Contact>,
}

impl WallHits {
    pub fn iter(&self) -> impl Iterator<Item = Contact> {
        self.horizontal.into_iter().chain(self.vertical)
    }

    pub fn any(&self) -> bool {
        self.horizontal.is_some() || self.vertical.is_some()
    }
}

/// Clamp a body into the play area, bouncing off whatever it crossed
///
/// The horizontal and vertical checks are independent, so a corner hit
/// reports both. Each contact also squashes the body.
pub fn resolve_walls<R: Rng + ?Sized>(
    body: &mut Body,
    bounds: &PlayBounds,
    floor: FloorMode,
    physics: &PhysicsConfig,
    squash: &SquashConfig,
    rng: &mut R,
) -> WallHits {
    let mut hits = WallHits::default();

    if body.pos.x < 0.0 || body.pos.x > bounds.max_x {
        let normal = if body.pos.x < 0.0 { Vec2::NEG_X } else { Vec2::X };
        let speed = body.vel.x.abs();
        body.pos.x = body.pos.x.clamp(0.0, bounds.max_x);
        body.vel.x = -body.vel.x * physics.restitution;
        body.vel.y *= physics.wall_friction;
        hits.horizontal = Some(Contact { normal, speed });
    }

    if body.pos.y < 0.0 && body.vel.y < 0.0 {
        let speed = -body.vel.y;
        body.pos.y = 0.0;
        body.vel.y = -body.vel.y * physics.restitution;
        body.vel.x *= physics.wall_friction;
        hits.vertical = Some(Contact {
            normal: Vec2::NEG_Y,
            speed,
        });
    } else if floor != FloorMode::Open && body.pos.y > bounds.max_y {
        let speed = body.vel.y.abs();
        body.pos.y = bounds.max_y;
        body.vel.y = -body.vel.y * physics.restitution;
        body.vel.x *= physics.wall_friction;
        if floor == FloorMode::Lively {
            body.vel.y -= physics.floor_boost_vy;
            if body.vel.y.abs() < physics.min_bounce_vy {
                let extra = if physics.min_bounce_jitter > 0.0 {
                    rng.random_range(0.0..=physics.min_bounce_jitter)
                } else {
                    0.0
                };
                body.vel.y = -(physics.min_bounce_vy + extra);
            }
            body.vel.x += jitter(rng, physics.floor_kick_vx);
        }
        hits.vertical = Some(Contact {
            normal: Vec2::Y,
            speed,
        });
    }

    for contact in hits.iter() {
        body.deform.impact(contact.normal, contact.speed, squash);
    }
    hits
}

/// Pull a body back inside after the viewport shrank
///
/// The bottom edge is only enforced while the floor exists, so draining
/// bodies keep falling.
pub fn reclamp(body: &mut Body, bounds: &PlayBounds, floor_enabled: bool) {
    body.pos.x = body.pos.x.clamp(0.0, bounds.max_x);
    if floor_enabled {
        body.pos.y = body.pos.y.min(bounds.max_y);
    }
}
