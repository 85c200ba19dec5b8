//! Sparkle timers for rare bodies
//!
//! Decoration only. Subscribes to show events, keeps a timer per rare body,
//! and tells the renderer which bodies should emit a sparkle this frame.
//! Rare bodies also get an extra sparkle on a hard impact.

use std::collections::BTreeMap;

use crate::config::{RareConfig, SquashConfig};
use crate::sim::{BodyId, ShowEvent, ShowObserver, Variant};

/// Per-body sparkle schedule
#[derive(Debug, Clone)]
pub struct SparkleTimers {
    interval_ms: f64,
    /// Impacts at least this fast trigger a burst
    burst_speed: f32,
    next_at: BTreeMap<BodyId, f64>,
    bursts: Vec<BodyId>,
}

impl Default for SparkleTimers {
    fn default() -> Self {
        Self::new(
            RareConfig::default().sparkle_interval_ms,
            SquashConfig::default().speed_for_max_effect * 0.5,
        )
    }
}

impl SparkleTimers {
    pub fn new(interval_ms: f64, burst_speed: f32) -> Self {
        Self {
            interval_ms,
            burst_speed,
            next_at: BTreeMap::new(),
            bursts: Vec::new(),
        }
    }

    /// Number of bodies currently sparkling
    pub fn len(&self) -> usize {
        self.next_at.len()
    }

    pub fn is_empty(&self) -> bool {
        self.next_at.is_empty()
    }

    pub fn is_tracking(&self, id: BodyId) -> bool {
        self.next_at.contains_key(&id)
    }

    /// Bodies due to emit at time `t`, in id order; timers are rearmed
    pub fn due(&mut self, t: f64) -> Vec<BodyId> {
        let mut due: Vec<BodyId> = std::mem::take(&mut self.bursts);
        for (id, next) in self.next_at.iter_mut() {
            if t >= *next {
                if !due.contains(id) {
                    due.push(*id);
                }
                *next = rearm(*next, t, self.interval_ms);
            }
        }
        due.sort();
        due
    }
}

/// First period boundary strictly after `t`, skipping missed periods
///
/// A non-positive interval rearms at `t`, so the body sparkles every call.
fn rearm(next: f64, t: f64, interval: f64) -> f64 {
    if !(interval > 0.0) {
        return t;
    }
    let missed = ((t - next) / interval).floor().max(0.0);
    next + (missed + 1.0) * interval
}

impl ShowObserver for SparkleTimers {
    fn on_event(&mut self, timestamp_ms: f64, event: &ShowEvent) {
        match *event {
            ShowEvent::Spawned {
                id,
                variant: Variant::Rare,
            } => {
                log::debug!("Sparkles attached to body {}", id.0);
                self.next_at.insert(id, timestamp_ms);
            }
            ShowEvent::Despawned { id, .. } => {
                if self.next_at.remove(&id).is_some() {
                    log::debug!("Sparkles detached from body {}", id.0);
                }
                self.bursts.retain(|b| *b != id);
            }
            ShowEvent::Impact { id, speed, .. }
                if speed >= self.burst_speed && self.next_at.contains_key(&id) =>
            {
                if !self.bursts.contains(&id) {
                    self.bursts.push(id);
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn spawn(id: u32, variant: Variant) -> ShowEvent {
        ShowEvent::Spawned {
            id: BodyId(id),
            variant,
        }
    }

    #[test]
    fn test_only_rare_bodies_are_tracked() {
        let mut timers = SparkleTimers::new(100.0, 500.0);
        timers.on_event(0.0, &spawn(1, Variant::Ordinary));
        timers.on_event(0.0, &spawn(2, Variant::Rare));
        assert_eq!(timers.len(), 1);
        assert!(timers.is_tracking(BodyId(2)));
    }

    #[test]
    fn test_periodic_emission() {
        let mut timers = SparkleTimers::new(100.0, 500.0);
        timers.on_event(0.0, &spawn(7, Variant::Rare));
        assert_eq!(timers.due(0.0), vec![BodyId(7)]);
        assert!(timers.due(50.0).is_empty());
        assert_eq!(timers.due(100.0), vec![BodyId(7)]);
        // A long stall yields one sparkle, not a backlog
        assert_eq!(timers.due(1000.0), vec![BodyId(7)]);
        assert!(timers.due(1050.0).is_empty());
    }

    #[test]
    fn test_default_timers_use_configured_interval() {
        let mut timers = SparkleTimers::default();
        timers.on_event(0.0, &spawn(1, Variant::Rare));
        assert_eq!(timers.due(10.0), vec![BodyId(1)]);
        assert!(timers.due(100.0).is_empty());
        assert_eq!(timers.due(250.0), vec![BodyId(1)]);
    }

    #[test]
    fn test_rearm_is_single_step() {
        // Tiny interval after a very long stall
        let mut timers = SparkleTimers::new(1e-6, 500.0);
        timers.on_event(0.0, &spawn(2, Variant::Rare));
        assert_eq!(timers.due(1e9), vec![BodyId(2)]);

        let mut timers = SparkleTimers::new(100.0, 500.0);
        timers.on_event(0.0, &spawn(3, Variant::Rare));
        assert_eq!(timers.due(f64::INFINITY), vec![BodyId(3)]);
        assert!(timers.due(1e12).is_empty());

        let mut timers = SparkleTimers::new(0.0, 500.0);
        timers.on_event(0.0, &spawn(4, Variant::Rare));
        assert_eq!(timers.due(5.0), vec![BodyId(4)]);
        assert_eq!(timers.due(5.0), vec![BodyId(4)]);
    }

    #[test]
    fn test_rearm_boundaries() {
        assert_eq!(rearm(0.0, 0.0, 100.0), 100.0);
        assert_eq!(rearm(0.0, 99.0, 100.0), 100.0);
        assert_eq!(rearm(0.0, 100.0, 100.0), 200.0);
        assert_eq!(rearm(0.0, 1000.0, 100.0), 1100.0);
    }

    #[test]
    fn test_despawn_detaches() {
        let mut timers = SparkleTimers::new(100.0, 500.0);
        timers.on_event(0.0, &spawn(3, Variant::Rare));
        timers.on_event(
            10.0,
            &ShowEvent::Despawned {
                id: BodyId(3),
                variant: Variant::Rare,
            },
        );
        assert!(timers.is_empty());
        assert!(timers.due(500.0).is_empty());
    }

    #[test]
    fn test_hard_impact_bursts() {
        let mut timers = SparkleTimers::new(100.0, 500.0);
        timers.on_event(0.0, &spawn(4, Variant::Rare));
        timers.due(0.0);
        let hit = |speed| ShowEvent::Impact {
            id: BodyId(4),
            other: None,
            normal: Vec2::Y,
            speed,
        };
        timers.on_event(20.0, &hit(100.0));
        assert!(timers.due(20.0).is_empty());
        timers.on_event(30.0, &hit(900.0));
        assert_eq!(timers.due(30.0), vec![BodyId(4)]);
    }

    #[test]
    fn test_follows_a_running_show() {
        use crate::config::ShowConfig;
        use crate::sim::{FrameInput, Show, Viewport};

        let mut config = ShowConfig::default();
        config.rare.chance = 1.0;
        config.show.max_bodies = 2;
        config.show.spawn_interval_ms = 10.0;
        let vp = Viewport::new(800.0, 600.0);
        let mut show = Show::new(config, vp).unwrap();
        let mut timers = SparkleTimers::new(250.0, 1000.0);

        for i in 0..3 {
            let input = FrameInput {
                timestamp_ms: i as f64 * 10.0,
                viewport: vp,
            };
            show.frame_with(&input, &mut timers);
        }
        assert_eq!(timers.len(), 2);
        show.reset(40.0).dispatch(&mut timers);
        assert!(timers.is_empty());
    }
}
