//! Show phases: spawning -> play -> drain -> spawning ...
//!
//! The scheduler only decides *when*; the show owns the bodies and does the
//! actual spawning and culling. Timestamps are host milliseconds.

use serde::{Deserialize, Serialize};

use crate::config::ShowTiming;

/// Current phase of the show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Phase {
    /// Dropping in a new body every spawn interval until the show is full
    #[default]
    Spawning,
    /// Full house; everyone bounces for a while
    Play,
    /// Floor removed, bodies fall out of view and are culled
    Drain,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Spawning => "spawning",
            Phase::Play => "play",
            Phase::Drain => "drain",
        }
    }

    pub fn floor_enabled(&self) -> bool {
        !matches!(self, Phase::Drain)
    }
}

/// Phase state machine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scheduler {
    phase: Phase,
    /// None until the first frame
    phase_started_at: Option<f64>,
    next_spawn_at: Option<f64>,
    floor_enabled: bool,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            phase: Phase::Spawning,
            phase_started_at: None,
            next_spawn_at: None,
            floor_enabled: true,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn floor_enabled(&self) -> bool {
        self.floor_enabled
    }

    pub fn phase_started_at(&self) -> Option<f64> {
        self.phase_started_at
    }

    pub fn next_spawn_at(&self) -> Option<f64> {
        self.next_spawn_at
    }

    fn enter(&mut self, next: Phase, t: f64) {
        self.phase = next;
        self.phase_started_at = Some(t);
        self.floor_enabled = next.floor_enabled();
        if next == Phase::Spawning {
            self.next_spawn_at = Some(t);
        }
    }

    /// Start-of-frame decisions
    ///
    /// Returns how many bodies to spawn this frame and the phase change, if
    /// any. `active` is the current body count.
    pub fn begin_frame(
        &mut self,
        t: f64,
        active: usize,
        timing: &ShowTiming,
    ) -> (usize, Option<Phase>) {
        if self.phase_started_at.is_none() {
            self.enter(Phase::Spawning, t);
        }
        let next_spawn_at = self.next_spawn_at.get_or_insert(t);

        match self.phase {
            Phase::Spawning => {
                let mut spawns = 0;
                while active + spawns < timing.max_bodies && t >= *next_spawn_at {
                    spawns += 1;
                    *next_spawn_at += timing.spawn_interval_ms;
                }
                if active + spawns >= timing.max_bodies {
                    self.enter(Phase::Play, t);
                    return (spawns, Some(Phase::Play));
                }
                (spawns, None)
            }
            Phase::Play => {
                let started = self.phase_started_at.unwrap_or(t);
                if t - started >= timing.play_duration_ms {
                    self.enter(Phase::Drain, t);
                    return (0, Some(Phase::Drain));
                }
                (0, None)
            }
            Phase::Drain => (0, None),
        }
    }

    /// End-of-frame check, after culling
    pub fn end_frame(&mut self, t: f64, active: usize) -> Option<Phase> {
        if self.phase == Phase::Drain && active == 0 {
            self.enter(Phase::Spawning, t);
            return Some(Phase::Spawning);
        }
        None
    }

    /// Back to an empty spawning phase at `t`
    pub fn reset(&mut self, t: f64) {
        self.enter(Phase::Spawning, t);
    }
}
