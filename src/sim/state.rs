//! Show state
//!
//! Everything the simulation owns between frames lives here: the active
//! bodies, the phase scheduler, the seeded RNG and the last measured viewport.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::body::{Body, BodyId, BodyTransform, Variant};
use super::boundary::{FloorMode, Viewport, reclamp};
use super::collision::PairContact;
use super::scheduler::{Phase, Scheduler};
use super::tick::{Frame, ShowEvent};
use crate::config::{ShowConfig, SpawnPlacement};
use crate::error::ConfigError;
use crate::{jitter, random_sign};

/// A running bouncing-logo show
#[derive(Debug, Clone)]
pub struct Show {
    pub(super) config: ShowConfig,
    pub(super) rng: Pcg32,
    pub(super) scheduler: Scheduler,
    /// Active bodies in spawn order
    pub(super) bodies: Vec<Body>,
    pub(super) viewport: Viewport,
    /// Timestamp of the previous frame (ms)
    pub(super) last_t: Option<f64>,
    /// Output of the latest frame, reused between frames
    pub(super) frame: Frame,
    /// Scratch buffer for pair contacts
    pub(super) contacts: Vec<PairContact>,
    next_id: u32,
}

impl Show {
    /// Create an empty show; the first frame starts the spawning phase
    pub fn new(config: ShowConfig, viewport: Viewport) -> Result<Self, ConfigError> {
        config.validate()?;
        let max_bodies = config.show.max_bodies;
        log::info!(
            "Show ready: up to {} bodies, seed {:#x}, viewport {}x{}",
            max_bodies,
            config.seed,
            viewport.width,
            viewport.height
        );
        Ok(Self {
            rng: Pcg32::seed_from_u64(config.seed),
            config,
            scheduler: Scheduler::new(),
            bodies: Vec::with_capacity(max_bodies),
            viewport,
            last_t: None,
            frame: Frame::default(),
            contacts: Vec::new(),
            next_id: 1,
        })
    }

    pub fn config(&self) -> &ShowConfig {
        &self.config
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.iter().find(|b| b.id == id)
    }

    pub fn phase(&self) -> Phase {
        self.scheduler.phase()
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Latest frame output
    pub fn last_frame(&self) -> &Frame {
        &self.frame
    }

    /// Current render state of every body
    pub fn transforms(&self) -> Vec<BodyTransform> {
        self.bodies.iter().map(Body::transform).collect()
    }

    /// The floor is lively while enabled and open during the drain
    pub(super) fn floor_mode(&self) -> FloorMode {
        if self.scheduler.floor_enabled() {
            FloorMode::Lively
        } else {
            FloorMode::Open
        }
    }

    fn allocate_id(&mut self) -> BodyId {
        let id = BodyId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Drop a new body in above the viewport
    pub(super) fn spawn(&mut self) -> BodyId {
        let id = self.allocate_id();
        let cfg = &self.config;
        let rng = &mut self.rng;

        let variant = if rng.random_bool(cfg.rare.chance) {
            Variant::Rare
        } else {
            Variant::Ordinary
        };
        let mass_multiplier = match variant {
            Variant::Rare => cfg.rare.mass_multiplier,
            Variant::Ordinary => 1.0,
        };
        let scale = 1.0 + jitter(rng, cfg.spawn.size_jitter);

        let mut body = Body::new(id, variant, scale, mass_multiplier);
        body.measure(cfg.base_size, cfg.spawn.collision_scale);

        let max_x = self
            .viewport
            .bounds_for(body.size, cfg.show.despawn_margin)
            .max_x;
        let x = match cfg.spawn.placement {
            SpawnPlacement::Centered => (self.viewport.width / 2.0 - body.size.x / 2.0)
                .floor()
                .max(0.0),
            SpawnPlacement::Random => rng.random_range(0.0..=max_x),
        };
        body.pos = Vec2::new(x, -body.size.y - cfg.spawn.lift);
        body.vel = Vec2::new(
            (cfg.spawn.x + jitter(rng, cfg.spawn.x_jitter)) * random_sign(rng),
            cfg.spawn.y + jitter(rng, cfg.spawn.y_jitter),
        );

        log::debug!(
            "Spawned {:?} body {} at x={:.0} (scale {:.2})",
            variant,
            id.0,
            x,
            scale
        );
        self.bodies.push(body);
        id
    }

    /// The viewport changed between frames: re-measure and pull bodies back in
    pub fn resize(&mut self, viewport: Viewport) {
        log::debug!("Resize to {}x{}", viewport.width, viewport.height);
        self.viewport = viewport;
        self.remeasure();
    }

    /// The logo's unscaled size changed (e.g. image finished loading)
    pub fn set_base_size(&mut self, size: Vec2) {
        if !(size.x > 0.0 && size.y > 0.0 && size.is_finite()) {
            log::warn!("Ignoring invalid logo size {size:?}");
            return;
        }
        self.config.base_size = size;
        self.remeasure();
    }

    fn remeasure(&mut self) {
        let floor_enabled = self.scheduler.floor_enabled();
        for body in &mut self.bodies {
            body.measure(self.config.base_size, self.config.spawn.collision_scale);
            let bounds = self
                .viewport
                .bounds_for(body.size, self.config.show.despawn_margin);
            reclamp(body, &bounds, floor_enabled);
        }
    }

    /// Remove every body and restart the cycle at `t`
    pub fn reset(&mut self, t: f64) -> &Frame {
        self.frame.clear(t);
        for body in self.bodies.drain(..) {
            self.frame.events.push(ShowEvent::Despawned {
                id: body.id,
                variant: body.variant,
            });
        }
        let from = self.scheduler.phase();
        self.scheduler.reset(t);
        self.frame.events.push(ShowEvent::PhaseChanged {
            from,
            to: Phase::Spawning,
        });
        self.last_t = None;
        self.frame.phase = Phase::Spawning;
        self.frame.floor_enabled = true;
        log::info!("Show reset at {t:.0} ms");
        &self.frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn show(config: ShowConfig) -> Show {
        Show::new(config, Viewport::new(800.0, 600.0)).unwrap()
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let mut config = ShowConfig::default();
        config.show.max_bodies = 0;
        assert!(Show::new(config, Viewport::new(800.0, 600.0)).is_err());
    }

    #[test]
    fn test_spawn_centered_above_viewport() {
        let config = ShowConfig::default();
        let mut s = show(config.clone());
        let id = s.spawn();
        let body = s.body(id).unwrap();

        assert_eq!(body.pos.x, (400.0 - body.size.x / 2.0).floor());
        assert_eq!(body.pos.y, -body.size.y - config.spawn.lift);
        let sj = config.spawn.size_jitter;
        assert!(body.scale >= 1.0 - sj && body.scale <= 1.0 + sj);

        let vx = body.vel.x.abs();
        assert!(vx >= config.spawn.x - config.spawn.x_jitter);
        assert!(vx <= config.spawn.x + config.spawn.x_jitter);
        assert!(body.vel.y >= config.spawn.y - config.spawn.y_jitter);
        assert!(body.vel.y <= config.spawn.y + config.spawn.y_jitter);
    }

    #[test]
    fn test_spawn_random_placement_in_bounds() {
        let mut config = ShowConfig::default();
        config.spawn.placement = SpawnPlacement::Random;
        let mut s = show(config);
        for _ in 0..20 {
            let id = s.spawn();
            let body = s.body(id).unwrap();
            assert!(body.pos.x >= 0.0 && body.pos.x <= 800.0 - body.size.x);
        }
    }

    #[test]
    fn test_rare_variant_is_heavier() {
        let mut config = ShowConfig::default();
        config.rare.chance = 1.0;
        config.spawn.size_jitter = 0.0;
        let mut s = show(config.clone());
        let id = s.spawn();
        let body = s.body(id).unwrap();
        assert_eq!(body.variant, Variant::Rare);
        let r = config.base_size.x / 2.0;
        assert!((body.mass - r * r * config.rare.mass_multiplier).abs() < 1e-2);
    }

    #[test]
    fn test_ids_are_unique_and_ordered() {
        let mut s = show(ShowConfig::default());
        let a = s.spawn();
        let b = s.spawn();
        let c = s.spawn();
        assert!(a < b && b < c);
        assert_eq!(s.bodies().len(), 3);
    }

    #[test]
    fn test_floor_mode_follows_scheduler() {
        let mut config = ShowConfig::default();
        config.show.max_bodies = 1;
        config.show.play_duration_ms = 100.0;
        let mut s = show(config);
        assert_eq!(s.floor_mode(), FloorMode::Lively);

        let vp = s.viewport();
        let mut t = 0.0;
        while s.phase() != Phase::Drain && t < 1000.0 {
            s.frame(&crate::sim::FrameInput {
                timestamp_ms: t,
                viewport: vp,
            });
            t += 10.0;
        }
        assert_eq!(s.phase(), Phase::Drain);
        assert_eq!(s.floor_mode(), FloorMode::Open);
    }

    #[test]
    fn test_resize_reclamps_bodies() {
        let mut s = show(ShowConfig::default());
        let id = s.spawn();
        s.bodies[0].pos = Vec2::new(750.0, 550.0);
        s.resize(Viewport::new(400.0, 300.0).with_banner(20.0));
        let body = s.body(id).unwrap();
        assert_eq!(body.pos.x, 400.0 - body.size.x);
        assert_eq!(body.pos.y, 280.0 - body.size.y);
    }

    #[test]
    fn test_set_base_size_remeasures() {
        let mut config = ShowConfig::default();
        config.spawn.size_jitter = 0.0;
        let mut s = show(config);
        let id = s.spawn();
        s.set_base_size(Vec2::new(50.0, 30.0));
        let body = s.body(id).unwrap();
        assert_eq!(body.size, Vec2::new(50.0, 30.0));
        assert_eq!(body.radius, 25.0);

        s.set_base_size(Vec2::new(-1.0, 10.0));
        assert_eq!(s.config().base_size, Vec2::new(50.0, 30.0));
    }

    #[test]
    fn test_reset_despawns_everyone() {
        let mut s = show(ShowConfig::default());
        s.spawn();
        s.spawn();
        let frame = s.reset(1234.0);
        let despawned = frame
            .events
            .iter()
            .filter(|e| matches!(e, ShowEvent::Despawned { .. }))
            .count();
        assert_eq!(despawned, 2);
        assert!(s.bodies().is_empty());
        assert_eq!(s.phase(), Phase::Spawning);
    }
}
