//! Browser bindings
//!
//! The page keeps its own `requestAnimationFrame` loop and DOM elements; each
//! frame it calls [`WebShow::frame`] and applies the returned JSON.

use glam::Vec2;
use wasm_bindgen::prelude::*;

use super::{Host, Mode};
use crate::config::ShowConfig;
use crate::sim::{FrameInput, Viewport};

fn init_logging() {
    console_error_panic_hook::set_once();
    // A second show on the same page finds the logger already installed
    if console_log::init_with_level(log::Level::Info).is_err() {
        log::debug!("Console logger already initialized");
    }
}

fn to_js(err: impl std::fmt::Display) -> JsError {
    JsError::new(&err.to_string())
}

/// A running show, owned by the page
#[wasm_bindgen]
pub struct WebShow {
    host: Host,
}

#[wasm_bindgen]
impl WebShow {
    /// `mode` is `"physics"` or `"arcade"`. Without a config the show is
    /// seeded from the clock so each page load differs.
    #[wasm_bindgen(constructor)]
    pub fn new(
        mode: &str,
        config_json: Option<String>,
        logo_width: f32,
        logo_height: f32,
        width: f32,
        height: f32,
        banner_height: f32,
    ) -> Result<WebShow, JsError> {
        init_logging();

        let mode = Mode::parse(mode).ok_or_else(|| JsError::new("unknown show mode"))?;
        let mut config = match config_json.as_deref() {
            Some(json) => ShowConfig::from_json_str(json).map_err(to_js)?,
            None => ShowConfig {
                seed: js_sys::Date::now() as u64,
                ..ShowConfig::default()
            },
        };
        if logo_width > 0.0 && logo_height > 0.0 {
            config.base_size = Vec2::new(logo_width, logo_height);
        }
        log::info!("Bouncy logo starting with seed: {}", config.seed);

        let viewport = Viewport::new(width, height).with_banner(banner_height);
        let host = Host::new(mode, config, viewport).map_err(to_js)?;
        Ok(WebShow { host })
    }

    /// Advance to `timestamp_ms` and return the frame as JSON
    pub fn frame(
        &mut self,
        timestamp_ms: f64,
        width: f32,
        height: f32,
        banner_height: f32,
    ) -> Result<String, JsError> {
        let input = FrameInput {
            timestamp_ms,
            viewport: Viewport::new(width, height).with_banner(banner_height),
        };
        self.host.frame_json(&input).map_err(to_js)
    }

    pub fn resize(&mut self, width: f32, height: f32, banner_height: f32) {
        self.host
            .resize(Viewport::new(width, height).with_banner(banner_height));
    }

    /// Logo image finished loading with its natural size
    #[wasm_bindgen(js_name = setLogoSize)]
    pub fn set_logo_size(&mut self, width: f32, height: f32) {
        self.host.set_logo_size(Vec2::new(width, height));
    }

    /// Ids of rare bodies that should emit a sparkle now
    #[wasm_bindgen(js_name = sparklesDue)]
    pub fn sparkles_due(&mut self, timestamp_ms: f64) -> Vec<u32> {
        self.host
            .sparkles_due(timestamp_ms)
            .into_iter()
            .map(|id| id.0)
            .collect()
    }
}
