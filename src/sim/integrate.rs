//! Explicit Euler step under gravity and exponential air drag

use super::body::Body;
use crate::config::PhysicsConfig;

/// Advance one body by `dt` seconds (`dt >= 0`)
#[inline]
pub fn integrate(body: &mut Body, dt: f32, physics: &PhysicsConfig) {
    body.vel.y += physics.gravity * dt;
    body.vel *= (-physics.air_drag * dt).exp();
    body.pos += body.vel * dt;
}
