//! Color primitives and the "lava lamp" hue animator.

use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Straight-alpha RGBA color, 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Same chroma with a replacement alpha channel.
    pub const fn with_alpha(self, alpha: u8) -> Self {
        Self { a: alpha, ..self }
    }

    pub fn luminance(self) -> f32 {
        let r = self.r as f32 / 255.0;
        let g = self.g as f32 / 255.0;
        let b = self.b as f32 / 255.0;
        0.2126 * r + 0.7152 * g + 0.0722 * b
    }

    /// Alpha-premultiplied channel values in RGBA order.
    pub fn premultiplied(self) -> [u8; 4] {
        let a = self.a as u16;
        let scale = |c: u8| ((c as u16 * a + 127) / 255) as u8;
        [scale(self.r), scale(self.g), scale(self.b), self.a]
    }
}

/// Fully saturated hue wheel sample. `turns` is the hue position in
/// revolutions; any real value is accepted and wrapped.
pub fn hue_to_rgba(turns: f32) -> Rgba {
    let h = turns.rem_euclid(1.0) * 6.0;
    let x = 1.0 - (h % 2.0 - 1.0).abs();
    let (r, g, b) = match h as u32 {
        0 => (1.0, x, 0.0),
        1 => (x, 1.0, 0.0),
        2 => (0.0, 1.0, x),
        3 => (0.0, x, 1.0),
        4 => (x, 0.0, 1.0),
        _ => (1.0, 0.0, x),
    };
    let to_u8 = |c: f32| (c * 255.0).round() as u8;
    Rgba::rgb(to_u8(r), to_u8(g), to_u8(b))
}

/// Time-driven hue animator.
///
/// Two states: idle and animating. While animating, [`ColorCycle::tick`]
/// advances the hue phase by elapsed wall time over the configured period and
/// returns the fresh color. Stopping snaps the current color back to the base
/// color, whatever the phase was.
#[derive(Debug, Clone)]
pub struct ColorCycle {
    base_color: Rgba,
    period_ms: u32,
    phase: f32,
    current: Rgba,
    last_tick: Option<Instant>,
}

impl ColorCycle {
    pub fn new(base_color: Rgba, period_ms: u32) -> Self {
        Self {
            base_color,
            period_ms: period_ms.max(1),
            phase: 0.0,
            current: base_color,
            last_tick: None,
        }
    }

    pub fn is_animating(&self) -> bool {
        self.last_tick.is_some()
    }

    pub fn current(&self) -> Rgba {
        self.current
    }

    /// Replaces base color and period. An idle cycle adopts the new base
    /// color immediately; an animating one keeps its phase.
    pub fn configure(&mut self, base_color: Rgba, period_ms: u32) {
        self.base_color = base_color;
        self.period_ms = period_ms.max(1);
        if self.last_tick.is_none() {
            self.current = base_color;
        }
    }

    /// Starts animating. A no-op when already animating.
    pub fn start(&mut self, now: Instant) {
        if self.last_tick.is_none() {
            self.last_tick = Some(now);
        }
    }

    /// Stops animating and resets the color to the base color. Safe to call
    /// repeatedly.
    pub fn stop(&mut self) {
        if self.last_tick.take().is_some() {
            self.phase = 0.0;
            self.current = self.base_color;
        }
    }

    /// Advances the hue phase and returns the new color, or `None` while
    /// idle.
    pub fn tick(&mut self, now: Instant) -> Option<Rgba> {
        let last = self.last_tick.as_mut()?;
        let elapsed_ms = now.saturating_duration_since(*last).as_secs_f32() * 1000.0;
        *last = now;
        self.phase = (self.phase + elapsed_ms / self.period_ms as f32).rem_euclid(1.0);
        self.current = hue_to_rgba(self.phase);
        Some(self.current)
    }
}
