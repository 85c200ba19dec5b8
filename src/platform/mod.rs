//! Platform bridge
//!
//! The host (browser page or headless driver) owns the animation loop and
//! the visual elements. It hands us a timestamp and viewport each frame and
//! gets back JSON it can apply to the DOM:
//! - `physics` mode: a full [`Frame`] (transforms + spawn/despawn/impact events)
//! - `arcade` mode: a single logo position

#[cfg(target_arch = "wasm32")]
pub mod web;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::ShowConfig;
use crate::error::ConfigError;
use crate::sim::{Arcade, BodyId, Frame, FrameInput, Show, Viewport};
use crate::sparkle::SparkleTimers;

/// Which animation the host runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Bouncing physics show with spawn / play / drain phases
    #[default]
    Physics,
    /// Single logo, constant-speed screensaver bounce
    Arcade,
}

impl Mode {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "physics" | "show" => Some(Mode::Physics),
            "arcade" => Some(Mode::Arcade),
            _ => None,
        }
    }
}

/// Wire format for arcade frames
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArcadeFrame {
    pub timestamp_ms: f64,
    pub position: Vec2,
}

#[derive(Debug, Clone)]
enum Stage {
    Physics(Box<Show>),
    Arcade(Arcade),
}

/// One running animation plus its decorations
#[derive(Debug, Clone)]
pub struct Host {
    stage: Stage,
    sparkles: SparkleTimers,
}

impl Host {
    pub fn new(mode: Mode, config: ShowConfig, viewport: Viewport) -> Result<Self, ConfigError> {
        let sparkles = SparkleTimers::new(
            config.rare.sparkle_interval_ms,
            config.squash.speed_for_max_effect * 0.5,
        );
        let stage = match mode {
            Mode::Physics => Stage::Physics(Box::new(Show::new(config, viewport)?)),
            Mode::Arcade => {
                config.validate()?;
                Stage::Arcade(Arcade::new(config.seed, config.base_size, viewport))
            }
        };
        log::info!("Host started in {mode:?} mode");
        Ok(Self { stage, sparkles })
    }

    pub fn mode(&self) -> Mode {
        match self.stage {
            Stage::Physics(_) => Mode::Physics,
            Stage::Arcade(_) => Mode::Arcade,
        }
    }

    /// The physics show, if running in physics mode
    pub fn show(&self) -> Option<&Show> {
        match &self.stage {
            Stage::Physics(show) => Some(show),
            Stage::Arcade(_) => None,
        }
    }

    /// Step one frame (physics mode), feeding the sparkle timers
    ///
    /// Returns `None` in arcade mode; use [`Host::frame_json`] for either mode.
    pub fn frame(&mut self, input: &FrameInput) -> Option<&Frame> {
        match &mut self.stage {
            Stage::Physics(show) => Some(show.frame_with(input, &mut self.sparkles)),
            Stage::Arcade(_) => None,
        }
    }

    /// Step one frame and serialize the result for the host
    pub fn frame_json(&mut self, input: &FrameInput) -> serde_json::Result<String> {
        match &mut self.stage {
            Stage::Physics(show) => {
                serde_json::to_string(show.frame_with(input, &mut self.sparkles))
            }
            Stage::Arcade(arcade) => {
                let position = arcade.frame(input.timestamp_ms, input.viewport);
                serde_json::to_string(&ArcadeFrame {
                    timestamp_ms: input.timestamp_ms,
                    position,
                })
            }
        }
    }

    /// Viewport changed between frames
    pub fn resize(&mut self, viewport: Viewport) {
        match &mut self.stage {
            Stage::Physics(show) => show.resize(viewport),
            Stage::Arcade(arcade) => arcade.resize(viewport),
        }
    }

    /// Logo image (re)measured
    pub fn set_logo_size(&mut self, size: Vec2) {
        match &mut self.stage {
            Stage::Physics(show) => show.set_base_size(size),
            Stage::Arcade(arcade) => arcade.size = size,
        }
    }

    /// Rare bodies that should emit a sparkle now
    pub fn sparkles_due(&mut self, timestamp_ms: f64) -> Vec<BodyId> {
        self.sparkles.due(timestamp_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Phase;

    fn input(t: f64) -> FrameInput {
        FrameInput {
            timestamp_ms: t,
            viewport: Viewport::new(800.0, 600.0),
        }
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!(Mode::parse("Arcade"), Some(Mode::Arcade));
        assert_eq!(Mode::parse("physics"), Some(Mode::Physics));
        assert_eq!(Mode::parse("wobble"), None);
    }

    #[test]
    fn test_physics_frame_json() {
        let mut host = Host::new(
            Mode::Physics,
            ShowConfig::default(),
            Viewport::new(800.0, 600.0),
        )
        .unwrap();
        let json = host.frame_json(&input(0.0)).unwrap();
        let frame: Frame = serde_json::from_str(&json).unwrap();
        assert_eq!(frame.phase, Phase::Spawning);
        assert_eq!(frame.bodies.len(), 1);
        assert_eq!(host.show().map(|s| s.bodies().len()), Some(1));
    }

    #[test]
    fn test_arcade_frame_json() {
        let mut host = Host::new(
            Mode::Arcade,
            ShowConfig::default(),
            Viewport::new(800.0, 600.0),
        )
        .unwrap();
        assert_eq!(host.mode(), Mode::Arcade);
        assert!(host.frame(&input(0.0)).is_none());
        let json = host.frame_json(&input(16.0)).unwrap();
        let frame: ArcadeFrame = serde_json::from_str(&json).unwrap();
        assert_eq!(frame.timestamp_ms, 16.0);
        assert!(frame.position.x >= 0.0 && frame.position.y >= 0.0);
    }

    #[test]
    fn test_rare_spawn_reaches_sparkles() {
        let mut config = ShowConfig::default();
        config.rare.chance = 1.0;
        let mut host = Host::new(Mode::Physics, config, Viewport::new(800.0, 600.0)).unwrap();
        let spawned: Vec<_> = host.frame(&input(0.0)).unwrap().spawned().collect();
        assert_eq!(host.sparkles_due(0.0), spawned);
    }

    #[test]
    fn test_invalid_config_rejected_in_both_modes() {
        let mut config = ShowConfig::default();
        config.base_size = Vec2::ZERO;
        let vp = Viewport::new(800.0, 600.0);
        assert!(Host::new(Mode::Physics, config.clone(), vp).is_err());
        assert!(Host::new(Mode::Arcade, config, vp).is_err());
    }
}
