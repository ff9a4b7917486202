//! Premultiplied RGBA8 pixel surface with the primitives compositing needs:
//! dashed axis-aligned strokes, a full-surface multiply wash and raw pixel
//! access for the host blit.

use crate::color::Rgba;
use crate::dsp::spectrum_map::LineSegment;

/// Owned 2D pixel buffer. Always has a positive area; degenerate dimensions
/// are rejected at construction so every drawing call can assume a real
/// surface.
#[derive(Debug, Clone)]
pub struct Surface {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Surface {
    /// Allocates a blank surface, or `None` for a zero-area request.
    pub fn new(width: u32, height: u32) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        Some(Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * 4],
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Premultiplied RGBA8 rows, top to bottom.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Premultiplied channel values of one pixel.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let base = (y as usize * self.width as usize + x as usize) * 4;
        [
            self.pixels[base],
            self.pixels[base + 1],
            self.pixels[base + 2],
            self.pixels[base + 3],
        ]
    }

    /// Strokes one segment with the given width and (painted, skipped) dash
    /// pattern. Mapped segments are axis-aligned by construction; an oblique
    /// segment rasterizes each dash run as its bounding rectangle.
    pub fn stroke_segment(
        &mut self,
        segment: &LineSegment,
        color: Rgba,
        stroke_width: f32,
        dash: (f32, f32),
    ) {
        let dx = segment.x1 - segment.x0;
        let dy = segment.y1 - segment.y0;
        let length = (dx * dx + dy * dy).sqrt();
        if length <= f32::EPSILON {
            return;
        }

        let (filled, skipped) = dash;
        let dashed = filled > 0.0 && skipped > 0.0;
        if !dashed && filled <= 0.0 && skipped > 0.0 {
            // A pattern with no painted run draws nothing.
            return;
        }

        let src = color.premultiplied();
        let ux = dx / length;
        let uy = dy / length;
        let half = stroke_width.max(1.0) / 2.0;
        let nx = -uy * half;
        let ny = ux * half;

        let mut t = 0.0;
        while t < length {
            let run = if dashed {
                filled.min(length - t)
            } else {
                length - t
            };
            let sx = segment.x0 + ux * t;
            let sy = segment.y0 + uy * t;
            let ex = segment.x0 + ux * (t + run);
            let ey = segment.y0 + uy * (t + run);

            self.fill_rect(
                (sx + nx).min(sx - nx).min(ex + nx).min(ex - nx),
                (sy + ny).min(sy - ny).min(ey + ny).min(ey - ny),
                (sx + nx).max(sx - nx).max(ex + nx).max(ex - nx),
                (sy + ny).max(sy - ny).max(ey + ny).max(ey - ny),
                src,
            );

            if !dashed {
                break;
            }
            t += filled + skipped;
        }
    }

    /// Multiplies every pixel channel by the given color, the compositor's
    /// trail-fade wash. In premultiplied space this is a plain componentwise
    /// product, so a translucent near-white color scales everything down
    /// toward transparent without ever clearing a pixel in one step.
    pub fn multiply(&mut self, color: Rgba) {
        let src = color.premultiplied();
        for (chunk, factor) in self
            .pixels
            .iter_mut()
            .zip(src.iter().cycle())
        {
            *chunk = ((*chunk as u16 * *factor as u16) / 255) as u8;
        }
    }

    fn fill_rect(&mut self, min_x: f32, min_y: f32, max_x: f32, max_y: f32, src: [u8; 4]) {
        let w = self.width as f32;
        let h = self.height as f32;
        let x0 = min_x.round().clamp(0.0, w) as usize;
        let x1 = max_x.round().clamp(0.0, w) as usize;
        let y0 = min_y.round().clamp(0.0, h) as usize;
        let y1 = max_y.round().clamp(0.0, h) as usize;

        let stride = self.width as usize * 4;
        let inv = 255 - src[3] as u16;
        for y in y0..y1 {
            let row = &mut self.pixels[y * stride..(y + 1) * stride];
            for pixel in row[x0 * 4..x1 * 4].chunks_exact_mut(4) {
                for (dst, s) in pixel.iter_mut().zip(src.iter()) {
                    *dst = (*s as u16 + (*dst as u16 * inv + 127) / 255) as u8;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Rgba = Rgba::rgb(255, 255, 255);

    fn horizontal(y: f32, x0: f32, x1: f32) -> LineSegment {
        LineSegment { x0, y0: y, x1, y1: y }
    }

    #[test]
    fn solid_stroke_paints_the_run() {
        let mut surface = Surface::new(32, 8).unwrap();
        surface.stroke_segment(&horizontal(4.0, 0.0, 16.0), WHITE, 1.0, (0.0, 0.0));

        for x in 0..16 {
            assert_ne!(surface.pixel(x, 4)[3], 0, "x = {x}");
        }
        assert_eq!(surface.pixel(20, 4)[3], 0);
        assert_eq!(surface.pixel(2, 6)[3], 0);
    }

    #[test]
    fn dash_pattern_alternates_runs() {
        let mut surface = Surface::new(32, 8).unwrap();
        surface.stroke_segment(&horizontal(4.0, 0.0, 16.0), WHITE, 1.0, (4.0, 4.0));

        for x in [1, 2, 9, 10] {
            assert_ne!(surface.pixel(x, 4)[3], 0, "painted run at x = {x}");
        }
        for x in [5, 6, 13, 14] {
            assert_eq!(surface.pixel(x, 4)[3], 0, "skipped run at x = {x}");
        }
    }

    #[test]
    fn stroke_width_spans_the_normal() {
        let mut surface = Surface::new(32, 32).unwrap();
        let segment = LineSegment {
            x0: 16.0,
            y0: 4.0,
            x1: 16.0,
            y1: 28.0,
        };
        surface.stroke_segment(&segment, WHITE, 4.0, (0.0, 0.0));

        for x in 14..18 {
            assert_ne!(surface.pixel(x, 16)[3], 0, "x = {x}");
        }
        assert_eq!(surface.pixel(12, 16)[3], 0);
        assert_eq!(surface.pixel(19, 16)[3], 0);
    }

    #[test]
    fn stroke_clips_to_the_surface() {
        let mut surface = Surface::new(16, 16).unwrap();
        surface.stroke_segment(&horizontal(8.0, -20.0, 40.0), WHITE, 50.0, (0.0, 0.0));
        assert_ne!(surface.pixel(0, 0)[3], 0);
        assert_ne!(surface.pixel(15, 15)[3], 0);
    }

    #[test]
    fn empty_dash_pattern_paints_nothing() {
        let mut surface = Surface::new(16, 16).unwrap();
        surface.stroke_segment(&horizontal(8.0, 0.0, 16.0), WHITE, 2.0, (0.0, 4.0));
        assert!(surface.pixels().iter().all(|&c| c == 0));
    }

    #[test]
    fn multiply_scales_every_channel() {
        let mut surface = Surface::new(4, 4).unwrap();
        surface.stroke_segment(&horizontal(2.0, 0.0, 4.0), WHITE, 4.0, (0.0, 0.0));
        let before = surface.pixel(1, 2);

        surface.multiply(Rgba::rgba(255, 255, 255, 200));
        let after = surface.pixel(1, 2);
        for (b, a) in before.iter().zip(after.iter()) {
            assert!(a < b);
        }
    }

    #[test]
    fn zero_area_surface_is_rejected() {
        assert!(Surface::new(0, 10).is_none());
        assert!(Surface::new(10, 0).is_none());
    }
}
