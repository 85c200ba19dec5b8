//! Per-frame simulation step
//!
//! The host calls [`Show::frame`] once per animation frame. One pass runs:
//! scheduler -> spawn -> integrate + relax -> body pairs -> walls -> cull,
//! then reports transforms and events for the renderer.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::{Body, BodyId, BodyTransform, Variant};
use super::boundary::{Viewport, resolve_walls};
use super::collision::resolve_all;
use super::integrate::integrate;
use super::scheduler::Phase;
use super::state::Show;

/// Host input for one frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameInput {
    /// Monotonic host time in milliseconds
    pub timestamp_ms: f64,
    pub viewport: Viewport,
}

/// Something the renderer or a decoration may want to react to
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ShowEvent {
    /// Create a visual element for this body
    Spawned { id: BodyId, variant: Variant },
    /// Destroy this body's visual element
    Despawned { id: BodyId, variant: Variant },
    /// A body hit a wall (`other` is None) or another body
    Impact {
        id: BodyId,
        other: Option<BodyId>,
        normal: Vec2,
        speed: f32,
    },
    PhaseChanged { from: Phase, to: Phase },
}

/// Subscriber for show events (decorations, sound, analytics)
pub trait ShowObserver {
    fn on_event(&mut self, timestamp_ms: f64, event: &ShowEvent);
}

/// Result of one frame
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub timestamp_ms: f64,
    /// Clamped step actually simulated (seconds)
    pub dt: f32,
    pub phase: Phase,
    pub floor_enabled: bool,
    /// Active bodies in spawn order
    pub bodies: Vec<BodyTransform>,
    pub events: Vec<ShowEvent>,
}

impl Frame {
    pub(super) fn clear(&mut self, timestamp_ms: f64) {
        self.timestamp_ms = timestamp_ms;
        self.dt = 0.0;
        self.bodies.clear();
        self.events.clear();
    }

    /// Feed this frame's events to an observer, in order
    pub fn dispatch<O: ShowObserver + ?Sized>(&self, observer: &mut O) {
        for event in &self.events {
            observer.on_event(self.timestamp_ms, event);
        }
    }

    pub fn spawned(&self) -> impl Iterator<Item = BodyId> + '_ {
        self.events.iter().filter_map(|e| match e {
            ShowEvent::Spawned { id, .. } => Some(*id),
            _ => None,
        })
    }

    pub fn despawned(&self) -> impl Iterator<Item = BodyId> + '_ {
        self.events.iter().filter_map(|e| match e {
            ShowEvent::Despawned { id, .. } => Some(*id),
            _ => None,
        })
    }
}

impl Show {
    /// Seconds since the previous frame, clamped to `[0, max_dt]`
    fn advance_clock(&mut self, t: f64) -> f32 {
        let max_dt = f64::from(self.config.physics.max_dt);
        let dt = match self.last_t {
            // max() also maps NaN to 0
            Some(last) => ((t - last) / 1000.0).max(0.0).min(max_dt),
            None => 0.0,
        };
        self.last_t = Some(t);
        dt as f32
    }

    fn change_phase(&mut self, from: Phase, to: Phase, t: f64) {
        log::info!(
            "Show phase {} -> {} at {:.0} ms ({} bodies)",
            from.as_str(),
            to.as_str(),
            t,
            self.bodies.len()
        );
        self.frame.events.push(ShowEvent::PhaseChanged { from, to });
    }

    /// Advance the show by one host frame
    pub fn frame(&mut self, input: &FrameInput) -> &Frame {
        let t = input.timestamp_ms;
        self.frame.clear(t);
        if input.viewport != self.viewport {
            self.resize(input.viewport);
        }
        let dt = self.advance_clock(t);
        self.frame.dt = dt;

        // Scheduler decisions
        let before = self.scheduler.phase();
        let (spawns, change) =
            self.scheduler
                .begin_frame(t, self.bodies.len(), &self.config.show);
        for _ in 0..spawns {
            let id = self.spawn();
            let variant = self.bodies.last().map(|b| b.variant).unwrap_or_default();
            self.frame.events.push(ShowEvent::Spawned { id, variant });
        }
        if let Some(to) = change {
            self.change_phase(before, to, t);
        }

        // Motion
        let physics = &self.config.physics;
        let squash = &self.config.squash;
        for body in &mut self.bodies {
            integrate(body, dt, physics);
            body.deform.relax(dt, squash);
        }

        // Body pairs
        self.contacts.clear();
        resolve_all(
            &mut self.bodies,
            physics.restitution,
            squash,
            &mut self.contacts,
        );
        for contact in &self.contacts {
            if contact.speed <= 0.0 {
                continue;
            }
            for ((id, side), other) in contact.sides().into_iter().zip([contact.b, contact.a]) {
                self.frame.events.push(ShowEvent::Impact {
                    id,
                    other: Some(other),
                    normal: side.normal,
                    speed: side.speed,
                });
            }
        }

        // Walls
        let floor = self.floor_mode();
        let margin = self.config.show.despawn_margin;
        for body in &mut self.bodies {
            let bounds = self.viewport.bounds_for(body.size, margin);
            let hits = resolve_walls(body, &bounds, floor, physics, squash, &mut self.rng);
            for contact in hits.iter() {
                self.frame.events.push(ShowEvent::Impact {
                    id: body.id,
                    other: None,
                    normal: contact.normal,
                    speed: contact.speed,
                });
            }
        }

        // Cull bodies that fell out during drain
        if self.scheduler.phase() == Phase::Drain {
            let viewport = self.viewport;
            let events = &mut self.frame.events;
            self.bodies.retain(|body| {
                let gone = body.pos.y > viewport.bounds_for(body.size, margin).despawn_y;
                if gone {
                    log::debug!("Despawned body {}", body.id.0);
                    events.push(ShowEvent::Despawned {
                        id: body.id,
                        variant: body.variant,
                    });
                }
                !gone
            });
        }
        if let Some(to) = self.scheduler.end_frame(t, self.bodies.len()) {
            self.change_phase(Phase::Drain, to, t);
        }

        self.frame.phase = self.scheduler.phase();
        self.frame.floor_enabled = self.scheduler.floor_enabled();
        self.frame.bodies.extend(self.bodies.iter().map(Body::transform));
        &self.frame
    }

    /// Run one frame and notify an observer of its events
    pub fn frame_with<O: ShowObserver + ?Sized>(
        &mut self,
        input: &FrameInput,
        observer: &mut O,
    ) -> &Frame {
        self.frame(input);
        self.frame.dispatch(observer);
        &self.frame
    }
}
