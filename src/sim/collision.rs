//! Body-vs-body collision detection and response
//!
//! Bodies collide as circles around their box centers. Overlaps are pushed
//! apart in proportion to inverse mass, then a restitution impulse is applied
//! along the contact normal if the pair is still closing.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::{Body, BodyId};
use crate::config::SquashConfig;
use crate::consts::COINCIDENT_EPSILON;

/// A single impact, as seen from the body that received it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    /// Unit vector from the body toward what it hit
    pub normal: Vec2,
    /// Closing speed along the normal (non-negative)
    pub speed: f32,
}

/// A resolved body pair (`a` precedes `b` in iteration order)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairContact {
    pub a: BodyId,
    pub b: BodyId,
    /// Unit normal from `a` toward `b`
    pub normal: Vec2,
    /// Overlap depth before correction
    pub penetration: f32,
    /// Closing speed along the normal (0 if the pair was already separating)
    pub speed: f32,
}

impl PairContact {
    /// The contact as each participant sees it
    pub fn sides(&self) -> [(BodyId, Contact); 2] {
        [
            (
                self.a,
                Contact {
                    normal: self.normal,
                    speed: self.speed,
                },
            ),
            (
                self.b,
                Contact {
                    normal: -self.normal,
                    speed: self.speed,
                },
            ),
        ]
    }
}

/// Resolve one overlapping pair in place
///
/// Returns `None` when the circles don't touch.
pub fn resolve_pair(
    a: &mut Body,
    b: &mut Body,
    restitution: f32,
    squash: &SquashConfig,
) -> Option<PairContact> {
    let delta = b.center() - a.center();
    let min_dist = a.radius + b.radius;
    let dist = delta.length();
    if dist >= min_dist {
        return None;
    }
    // Coincident centers: pick an arbitrary but stable axis
    let (normal, dist) = if dist < COINCIDENT_EPSILON {
        (Vec2::X, COINCIDENT_EPSILON)
    } else {
        (delta / dist, dist)
    };
    let penetration = min_dist - dist;

    // Lighter body moves more
    let inv_mass_sum = a.inv_mass + b.inv_mass;
    let correction = penetration / inv_mass_sum;
    a.pos -= normal * correction * a.inv_mass;
    b.pos += normal * correction * b.inv_mass;

    let vel_along_normal = (b.vel - a.vel).dot(normal);
    let mut speed = 0.0;
    if vel_along_normal <= 0.0 {
        let j = -(1.0 + restitution) * vel_along_normal / inv_mass_sum;
        let impulse = normal * j;
        a.vel -= impulse * a.inv_mass;
        b.vel += impulse * b.inv_mass;
        speed = -vel_along_normal;
    }

    let contact = PairContact {
        a: a.id,
        b: b.id,
        normal,
        penetration,
        speed,
    };
    let [(_, side_a), (_, side_b)] = contact.sides();
    a.deform.impact(side_a.normal, side_a.speed, squash);
    b.deform.impact(side_b.normal, side_b.speed, squash);
    Some(contact)
}

/// Resolve every overlapping pair, lower index first
///
/// One pass, no iteration to convergence: a body pushed into a third body
/// late in the pass is picked up next frame.
pub fn resolve_all(
    bodies: &mut [Body],
    restitution: f32,
    squash: &SquashConfig,
    contacts: &mut Vec<PairContact>,
) {
    for i in 0..bodies.len() {
        let (left, right) = bodies.split_at_mut(i + 1);
        let a = &mut left[i];
        for b in right.iter_mut() {
            if let Some(contact) = resolve_pair(a, b, restitution, squash) {
                contacts.push(contact);
            }
        }
    }
}
