//! Persistent-surface compositing: draw the fresh segment fan, then wash the
//! whole surface with a translucent multiply overlay so earlier strokes decay
//! exponentially into a trail.

use super::surface::Surface;
use crate::color::Rgba;
use crate::dsp::spectrum_map::LineSegment;
use tracing::debug;

/// Fixed near-white wash multiplied over the surface once per update cycle.
/// Scales every channel by roughly 200/255, so trails fade asymptotically
/// instead of being cleared.
pub const FADE_COLOR: Rgba = Rgba::rgba(255, 255, 255, 200);

/// Paint parameters for one segment fan.
#[derive(Debug, Clone, Copy)]
pub struct StrokeStyle {
    pub color: Rgba,
    pub width: f32,
    /// (painted, skipped) dash run lengths in pixels.
    pub dash: (f32, f32),
}

/// Owns the persistent off-screen surface.
///
/// A degenerate surface (zero-area resize, or never resized) is represented
/// as `None` and makes every operation a no-op until a valid resize arrives.
#[derive(Debug, Default)]
pub struct FrameCompositor {
    surface: Option<Surface>,
}

impl FrameCompositor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies a dimension change. A real change discards the old surface
    /// and allocates a blank one; matching dimensions keep the current
    /// content; a zero-area request drops the surface entirely.
    pub fn resize(&mut self, width: u32, height: u32) {
        match &self.surface {
            Some(surface) if surface.width() == width && surface.height() == height => {}
            _ => {
                self.surface = Surface::new(width, height);
                debug!(width, height, allocated = self.surface.is_some(), "surface resized");
            }
        }
    }

    /// Draws the segment fan, then applies the trail fade. The fade runs
    /// every cycle even when the fan is empty, so silence still decays
    /// whatever is on the surface.
    pub fn update(&mut self, segments: &[LineSegment], style: StrokeStyle) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        for segment in segments {
            surface.stroke_segment(segment, style.color, style.width, style.dash);
        }
        surface.multiply(FADE_COLOR);
    }

    /// The composited surface, if one is currently allocated.
    pub fn surface(&self) -> Option<&Surface> {
        self.surface.as_ref()
    }

    /// Drops the surface. Safe to call repeatedly.
    pub fn release(&mut self) {
        self.surface = None;
    }
}
