//! Spectrum-frame plumbing shared by the mapping stage.

pub mod spectrum_map;

use std::time::Instant;

/// Borrowed FFT frame handed to the mapper for the duration of one call.
///
/// The payload is the analyzer's raw byte output: signed 8-bit magnitude
/// components interleaved as (real, imaginary) pairs per frequency band. The
/// frame length may differ from one update to the next.
#[derive(Debug, Clone, Copy)]
pub struct SpectrumBlock<'a> {
    pub bytes: &'a [u8],
    /// Timestamp associated with the analysis window.
    pub timestamp: Instant,
}

impl<'a> SpectrumBlock<'a> {
    pub fn new(bytes: &'a [u8], timestamp: Instant) -> Self {
        Self { bytes, timestamp }
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Decibel deflection of one band: `floor(10 * log10(re^2 + im^2))`, with a
/// silent band pinned to zero rather than negative infinity.
pub fn band_db(re: i8, im: i8) -> i32 {
    let magnitude = i32::from(re) * i32::from(re) + i32::from(im) * i32::from(im);
    if magnitude > 0 {
        (10.0 * f64::from(magnitude).log10()) as i32
    } else {
        0
    }
}
