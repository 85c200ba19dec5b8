//! Simulated bodies
//!
//! A body is one copy of the logo: a box drawn at its top-left position that
//! collides as a circle inscribed in its larger edge.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::deform::Deformation;
use crate::box_center;
use crate::consts::MIN_RADIUS;

/// Stable handle for a body, allocated in increasing order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyId(pub u32);

/// Which logo a body shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Variant {
    #[default]
    Ordinary,
    /// Heavier, different asset, sparkles
    Rare,
}

/// A bouncing logo
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    pub id: BodyId,
    pub variant: Variant,
    /// Top-left corner
    pub pos: Vec2,
    pub vel: Vec2,
    /// Size multiplier picked at spawn
    pub scale: f32,
    /// Scaled box size
    pub size: Vec2,
    /// Collision radius
    pub radius: f32,
    pub mass: f32,
    pub inv_mass: f32,
    /// Extra mass factor (1 for ordinary bodies)
    pub mass_multiplier: f32,
    pub deform: Deformation,
}

impl Body {
    /// Create an unmeasured body; call [`Body::measure`] before simulating it
    pub fn new(id: BodyId, variant: Variant, scale: f32, mass_multiplier: f32) -> Self {
        Self {
            id,
            variant,
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            scale,
            size: Vec2::ZERO,
            radius: MIN_RADIUS,
            mass: 1.0,
            inv_mass: 1.0,
            mass_multiplier,
            deform: Deformation::default(),
        }
    }

    /// Recompute size, radius and mass from the unscaled logo size
    pub fn measure(&mut self, base_size: Vec2, collision_scale: f32) {
        self.size = base_size * self.scale;
        self.radius = (self.size.max_element() * 0.5 * collision_scale).max(MIN_RADIUS);
        self.mass = (self.radius * self.radius).max(1.0) * self.mass_multiplier;
        self.inv_mass = 1.0 / self.mass;
    }

    /// Center of the body's box
    #[inline]
    pub fn center(&self) -> Vec2 {
        box_center(self.pos, self.size)
    }

    pub fn is_rare(&self) -> bool {
        self.variant == Variant::Rare
    }

    /// What the renderer needs for this frame
    pub fn transform(&self) -> BodyTransform {
        BodyTransform {
            id: self.id,
            variant: self.variant,
            position: self.pos,
            scale: self.scale,
            squash: self.deform.squash,
            origin: self.deform.origin,
        }
    }
}

/// Per-frame render state for one body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyTransform {
    pub id: BodyId,
    pub variant: Variant,
    /// Top-left translation
    pub position: Vec2,
    /// Uniform size scale
    pub scale: f32,
    /// Per-axis squash-stretch on top of `scale`
    pub squash: Vec2,
    /// Transform origin, normalized to the body's box
    pub origin: Vec2,
}
