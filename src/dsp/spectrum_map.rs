//! Spectrum-to-geometry mapping.
//!
//! One FFT frame becomes an ordered fan of axis-aligned line segments. Each
//! sampled band contributes a segment anchored at one surface edge whose
//! length follows the band's decibel deflection scaled by the configured fuzz
//! factor and offset. Orientation decides the anchor edge: landscape surfaces
//! grow bars up from the bottom, portrait surfaces grow them sideways from
//! whichever edge the alignment hint selects.

use super::{band_db, SpectrumBlock};
use crate::config::VisualizerConfig;
use serde::{Deserialize, Serialize};

/// Which way the band fan runs, derived from the surface aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// Surface dimensions plus the portrait-mode alignment hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SurfaceLayout {
    pub width: u32,
    pub height: u32,
    /// Only meaningful for [`Orientation::Vertical`]: anchors segments on the
    /// left edge instead of the right one.
    pub left_aligned: bool,
}

impl SurfaceLayout {
    pub fn new(width: u32, height: u32, left_aligned: bool) -> Self {
        Self {
            width,
            height,
            left_aligned,
        }
    }

    pub fn orientation(&self) -> Orientation {
        if self.height > self.width {
            Orientation::Vertical
        } else {
            Orientation::Horizontal
        }
    }

    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// One stroked line in surface pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LineSegment {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

/// Maps spectrum frames to segment fans, reusing its output buffer across
/// calls.
///
/// The buffer only ever grows; a smaller frame leaves stale entries behind the
/// logical length, which the returned slice excludes.
#[derive(Debug, Default)]
pub struct SpectrumMapper {
    segments: Vec<LineSegment>,
    len: usize,
}

impl SpectrumMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Segment slots currently allocated, independent of the logical length.
    pub fn capacity(&self) -> usize {
        self.segments.len()
    }

    /// Maps one frame into segments. An absent or empty frame, a zero
    /// divisions stride or a stride longer than the frame all produce an
    /// empty fan; none of them is an error.
    pub fn map(
        &mut self,
        block: Option<SpectrumBlock<'_>>,
        config: &VisualizerConfig,
        layout: SurfaceLayout,
    ) -> &[LineSegment] {
        self.len = 0;

        let bytes = match block {
            Some(block) if !block.is_empty() => block.bytes,
            _ => return self.emitted(),
        };
        let divisions = config.divisions as usize;
        if divisions == 0 {
            return self.emitted();
        }
        let band_count = bytes.len() / divisions;
        if band_count == 0 {
            return self.emitted();
        }

        let orientation = layout.orientation();
        let axis_len = match orientation {
            Orientation::Vertical => layout.height,
            Orientation::Horizontal => layout.width,
        };
        let spacing = axis_len as f32 / band_count as f32;

        if self.segments.len() < band_count {
            self.segments.resize(band_count, LineSegment::default());
        }

        let width = layout.width as f32;
        let height = layout.height as f32;
        for i in 0..band_count {
            let re = bytes[divisions * i] as i8;
            let im = bytes.get(divisions * i + 1).copied().unwrap_or(0) as i8;
            let db = band_db(re, im);
            let extent = (db * config.fuzz_factor + config.fuzz_offset).max(0) as f32;
            let band_offset = i as f32 * spacing;

            self.segments[i] = match orientation {
                Orientation::Vertical if layout.left_aligned => LineSegment {
                    x0: 0.0,
                    y0: band_offset,
                    x1: extent,
                    y1: band_offset,
                },
                Orientation::Vertical => LineSegment {
                    x0: width,
                    y0: band_offset,
                    x1: width - extent,
                    y1: band_offset,
                },
                Orientation::Horizontal => LineSegment {
                    x0: band_offset,
                    y0: height,
                    x1: band_offset,
                    y1: height - extent,
                },
            };
        }

        self.len = band_count;
        self.emitted()
    }

    fn emitted(&self) -> &[LineSegment] {
        &self.segments[..self.len]
    }
}
