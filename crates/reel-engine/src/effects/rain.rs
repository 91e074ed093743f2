//! Column "digital rain" for the hero backdrop.
//!
//! The simulation is frame-based: every 16 ms of accumulated time each column
//! emits one glyph at its drop's row and the drop moves down `fall_speed`
//! rows. A drop that has left the screen only restarts at the top when a roll
//! beats `reset_probability`, which staggers the columns.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::core::time::Millis;
use crate::effects::rng::Rng;

/// Glyphs drawn by the rain when none are configured.
pub const DEFAULT_RAIN_GLYPHS: &str = "アイウエオカキクケコサシスセソタチツテトナニヌネノハヒフヘホマミムメモヤユヨラリルレロワヲンABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789@#$%^&*";

/// Rain tuning. Units are rows per frame and pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RainConfig {
    /// Cell size in pixels; one column per cell of width.
    pub font_size: f32,
    /// Rows a drop falls per frame.
    pub fall_speed: f32,
    /// Opacity of the fade pass the renderer applies each frame.
    pub trail_opacity: f32,
    /// A drop below the screen resets only when a roll exceeds this.
    pub reset_probability: f32,
    /// Simulation frame length.
    pub frame_ms: Millis,
    /// Upper bound on columns, however wide the surface.
    pub max_columns: usize,
    pub glyphs: String,
}

impl Default for RainConfig {
    fn default() -> Self {
        Self {
            font_size: 16.0,
            fall_speed: 0.6,
            trail_opacity: 0.05,
            reset_probability: 0.975,
            frame_ms: 16,
            max_columns: 512,
            glyphs: DEFAULT_RAIN_GLYPHS.to_string(),
        }
    }
}

/// One glyph drawn this frame, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RainGlyph {
    pub pos: Vec2,
    pub glyph: char,
}

#[derive(Debug, Clone)]
pub struct DigitalRain {
    config: RainConfig,
    glyphs: Vec<char>,
    /// Current row of each column's drop. Negative rows are above the screen.
    drops: Vec<f32>,
    height: f32,
    accumulator: Millis,
    frame: Vec<RainGlyph>,
    rng: Rng,
}

impl DigitalRain {
    pub fn new(config: RainConfig, seed: u64) -> Self {
        let glyphs = if config.glyphs.is_empty() {
            DEFAULT_RAIN_GLYPHS.chars().collect()
        } else {
            config.glyphs.chars().collect()
        };
        Self {
            config,
            glyphs,
            drops: Vec::new(),
            height: 0.0,
            accumulator: 0,
            frame: Vec::new(),
            rng: Rng::new(seed),
        }
    }

    pub fn config(&self) -> &RainConfig {
        &self.config
    }

    /// Reinitialize the columns for a new surface size.
    /// Non-finite sizes are ignored.
    pub fn resize(&mut self, width: f32, height: f32) {
        if !width.is_finite() || !height.is_finite() {
            log::warn!("DigitalRain: ignoring resize to {}x{}", width, height);
            return;
        }
        let size = self.config.font_size.max(1.0);
        let columns = ((width.max(0.0) / size).ceil() as usize).min(self.config.max_columns);
        self.height = height.max(0.0);
        self.drops = (0..columns).map(|_| self.rng.next_f32() * -100.0).collect();
        self.frame.clear();
        log::debug!("DigitalRain: {} columns for {}x{}", columns, width, height);
    }

    pub fn columns(&self) -> usize {
        self.drops.len()
    }

    pub fn drops(&self) -> &[f32] {
        &self.drops
    }

    /// Advance by `dt` ms, running as many whole frames as fit.
    /// Returns the number of frames run.
    pub fn advance(&mut self, dt: Millis) -> u32 {
        let frame_ms = self.config.frame_ms.max(1);
        self.accumulator += dt;
        let mut frames = 0;
        while self.accumulator >= frame_ms {
            self.accumulator -= frame_ms;
            self.step();
            frames += 1;
        }
        frames
    }

    /// Run one frame: emit a glyph per column, then move the drops.
    pub fn step(&mut self) {
        let size = self.config.font_size;
        self.frame.clear();
        for (i, drop) in self.drops.iter_mut().enumerate() {
            let glyph = self.rng.pick(&self.glyphs).copied().unwrap_or('0');
            self.frame.push(RainGlyph {
                pos: Vec2::new(i as f32 * size, *drop * size),
                glyph,
            });

            if *drop * size > self.height && self.rng.next_f32() > self.config.reset_probability {
                *drop = 0.0;
            } else {
                *drop += self.config.fall_speed;
            }
        }
    }

    /// Glyphs emitted by the latest frame.
    pub fn frame(&self) -> &[RainGlyph] {
        &self.frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resize_starts_every_drop_above_screen() {
        let mut rain = DigitalRain::new(RainConfig::default(), 1);
        rain.resize(800.0, 600.0);
        assert_eq!(rain.columns(), 50);
        assert!(rain.drops().iter().all(|&d| d <= 0.0 && d > -100.0));
    }

    #[test]
    fn bad_sizes_leave_columns_alone() {
        let mut rain = DigitalRain::new(RainConfig::default(), 3);
        rain.resize(160.0, 600.0);
        rain.resize(f32::INFINITY, 600.0);
        rain.resize(f32::NAN, 600.0);
        rain.resize(800.0, f32::NEG_INFINITY);
        assert_eq!(rain.columns(), 10);
    }

    #[test]
    fn huge_surfaces_are_capped() {
        let mut rain = DigitalRain::new(RainConfig::default(), 4);
        rain.resize(f32::MAX, 600.0);
        assert_eq!(rain.columns(), RainConfig::default().max_columns);
    }

    #[test]
    fn drops_fall_by_speed_each_frame() {
        let mut rain = DigitalRain::new(RainConfig::default(), 2);
        rain.resize(160.0, 600.0);
        let before = rain.drops().to_vec();
        rain.step();
        for (b, a) in before.iter().zip(rain.drops()) {
            assert!((a - b - 0.6).abs() < 1e-4);
        }
        assert_eq!(rain.frame().len(), 10);
    }

    #[test]
    fn frames_run_per_sixteen_ms() {
        let mut rain = DigitalRain::new(RainConfig::default(), 3);
        rain.resize(32.0, 32.0);
        assert_eq!(rain.advance(10), 0);
        assert_eq!(rain.advance(10), 1);
        assert_eq!(rain.advance(40), 2);
    }

    #[test]
    fn drops_below_screen_eventually_reset() {
        let config = RainConfig {
            fall_speed: 1.0,
            reset_probability: 0.5,
            ..RainConfig::default()
        };
        let mut rain = DigitalRain::new(config, 4);
        rain.resize(16.0, 16.0);
        // Long enough for the drop to leave the 1-row screen many times over.
        let mut reset_seen = false;
        for _ in 0..500 {
            let before = rain.drops()[0];
            rain.step();
            if before > 1.0 && rain.drops()[0] == 0.0 {
                reset_seen = true;
            }
        }
        assert!(reset_seen);
    }

    #[test]
    fn glyphs_come_from_configured_set() {
        let config = RainConfig {
            glyphs: "01".to_string(),
            ..RainConfig::default()
        };
        let mut rain = DigitalRain::new(config, 5);
        rain.resize(64.0, 64.0);
        rain.step();
        assert!(rain.frame().iter().all(|g| g.glyph == '0' || g.glyph == '1'));
    }
}
