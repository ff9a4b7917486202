//! Visualizer configuration: immutable snapshots, option lookup tables and a
//! thread-safe shared source.
//!
//! The host exposes settings as small integer option indices
//! ([`ConfigSelection`]); ordered lookup tables resolve those into the pixel
//! values the drawing path consumes ([`VisualizerConfig`]). Snapshots are
//! replaced whole, never mutated field by field: the drawing context reloads
//! the latest snapshot at the start of a frame cycle, so a settings change
//! arriving mid-frame can never tear the geometry parameters.

use crate::color::Rgba;
use crate::error::ConfigError;
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Sampling stride options. Wider strides skip more bands and thin the fan.
pub const DIVISION_OPTIONS: [u32; 23] = [
    2, 4, 6, 8, 10, 12, 14, 16, 18, 20, 22, 24, 26, 28, 30, 32, 34, 36, 38, 40, 42, 44, 46,
];
pub const DEFAULT_DIVISIONS_INDEX: usize = 7;

/// Stroke widths in pixels, one per host option slot.
pub const STROKE_WIDTH_OPTIONS: [f32; 31] = [
    1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 11.0, 12.0, 13.0, 14.0, 15.0, 16.0, 17.0,
    18.0, 19.0, 20.0, 21.0, 22.0, 23.0, 24.0, 25.0, 26.0, 27.0, 28.0, 29.0, 30.0, 31.0,
];
pub const DEFAULT_STROKE_WIDTH_INDEX: usize = 14;

/// Dash pattern options as (painted, skipped) pixel run pairs.
pub const DASH_OPTIONS: [(f32, f32); 5] =
    [(4.0, 1.0), (8.0, 2.0), (12.0, 4.0), (16.0, 8.0), (20.0, 12.0)];
pub const DEFAULT_DASH_INDEX: usize = 2;

/// Linear gain applied to the decibel value before pixel conversion.
pub const FUZZ_FACTOR_OPTIONS: [i32; 5] = [1, 2, 4, 6, 8];
pub const DEFAULT_FUZZ_FACTOR_INDEX: usize = 2;

pub const DEFAULT_FUZZ_OFFSET: i32 = 2;
pub const DEFAULT_BASE_COLOR: Rgba = Rgba::rgb(255, 255, 255);
pub const DEFAULT_LAVA_LAMP_PERIOD_MS: u32 = 10_000;

/// Hue-cycling animation settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LavaLampConfig {
    pub enabled: bool,
    pub period_ms: u32,
}

impl Default for LavaLampConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            period_ms: DEFAULT_LAVA_LAMP_PERIOD_MS,
        }
    }
}

/// Resolved parameters for one rendering epoch.
///
/// A snapshot is immutable once built; configuration changes produce a new
/// snapshot that replaces the old one wholesale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VisualizerConfig {
    /// Stride between sampled band pairs in the raw frame.
    pub divisions: u32,
    /// Painted run length of the dash pattern, in pixels.
    pub dash_filled: f32,
    /// Skipped run length of the dash pattern, in pixels.
    pub dash_empty: f32,
    pub stroke_width: f32,
    /// Linear scale applied to the decibel deflection.
    pub fuzz_factor: i32,
    /// Bias added to the scaled deflection, in pixels.
    pub fuzz_offset: i32,
    pub base_color: Rgba,
    pub lava_lamp: LavaLampConfig,
}

impl Default for VisualizerConfig {
    fn default() -> Self {
        Self {
            divisions: DIVISION_OPTIONS[DEFAULT_DIVISIONS_INDEX],
            dash_filled: DASH_OPTIONS[DEFAULT_DASH_INDEX].0,
            dash_empty: DASH_OPTIONS[DEFAULT_DASH_INDEX].1,
            stroke_width: STROKE_WIDTH_OPTIONS[DEFAULT_STROKE_WIDTH_INDEX],
            fuzz_factor: FUZZ_FACTOR_OPTIONS[DEFAULT_FUZZ_FACTOR_INDEX],
            fuzz_offset: DEFAULT_FUZZ_OFFSET,
            base_color: DEFAULT_BASE_COLOR,
            lava_lamp: LavaLampConfig::default(),
        }
    }
}

impl VisualizerConfig {
    /// Checks the invariants the drawing path relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.divisions == 0 {
            return Err(ConfigError::NonPositiveDivisions);
        }
        if !self.stroke_width.is_finite() || self.stroke_width <= 0.0 {
            return Err(ConfigError::NonPositiveStrokeWidth);
        }
        if self.lava_lamp.period_ms == 0 {
            return Err(ConfigError::ZeroPeriod);
        }
        Ok(())
    }

    /// Ensures the configuration respects runtime invariants and sane
    /// defaults.
    pub fn normalize(&mut self) {
        if self.divisions == 0 {
            self.divisions = DIVISION_OPTIONS[DEFAULT_DIVISIONS_INDEX];
        }
        if !self.stroke_width.is_finite() || self.stroke_width <= 0.0 {
            self.stroke_width = STROKE_WIDTH_OPTIONS[DEFAULT_STROKE_WIDTH_INDEX];
        }
        if !self.dash_filled.is_finite() || self.dash_filled < 0.0 {
            self.dash_filled = 0.0;
        }
        if !self.dash_empty.is_finite() || self.dash_empty < 0.0 {
            self.dash_empty = 0.0;
        }
        if self.lava_lamp.period_ms == 0 {
            self.lava_lamp.period_ms = DEFAULT_LAVA_LAMP_PERIOD_MS;
        }
    }

    /// Returns a normalized copy of this configuration.
    pub fn normalized(mut self) -> Self {
        self.normalize();
        self
    }
}

/// Enumerated option indices as exposed by the host settings surface.
///
/// Out-of-range indices clamp to the last table entry rather than failing, so
/// a settings source from a newer host revision degrades gracefully.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigSelection {
    pub divisions_index: usize,
    pub dash_index: usize,
    pub stroke_width_index: usize,
    pub fuzz_factor_index: usize,
    pub fuzz_offset: i32,
    pub base_color: Rgba,
    pub lava_lamp_enabled: bool,
    pub lava_lamp_period_ms: u32,
}

impl Default for ConfigSelection {
    fn default() -> Self {
        Self {
            divisions_index: DEFAULT_DIVISIONS_INDEX,
            dash_index: DEFAULT_DASH_INDEX,
            stroke_width_index: DEFAULT_STROKE_WIDTH_INDEX,
            fuzz_factor_index: DEFAULT_FUZZ_FACTOR_INDEX,
            fuzz_offset: DEFAULT_FUZZ_OFFSET,
            base_color: DEFAULT_BASE_COLOR,
            lava_lamp_enabled: true,
            lava_lamp_period_ms: DEFAULT_LAVA_LAMP_PERIOD_MS,
        }
    }
}

impl ConfigSelection {
    /// Resolves the option indices through the lookup tables into a concrete
    /// snapshot.
    pub fn resolve(&self) -> VisualizerConfig {
        let (dash_filled, dash_empty) = pick(&DASH_OPTIONS, self.dash_index);
        VisualizerConfig {
            divisions: pick(&DIVISION_OPTIONS, self.divisions_index),
            dash_filled,
            dash_empty,
            stroke_width: pick(&STROKE_WIDTH_OPTIONS, self.stroke_width_index),
            fuzz_factor: pick(&FUZZ_FACTOR_OPTIONS, self.fuzz_factor_index),
            fuzz_offset: self.fuzz_offset,
            base_color: self.base_color,
            lava_lamp: LavaLampConfig {
                enabled: self.lava_lamp_enabled,
                period_ms: self.lava_lamp_period_ms,
            },
        }
        .normalized()
    }
}

fn pick<T: Copy>(table: &[T], index: usize) -> T {
    table[index.min(table.len() - 1)]
}

type Subscriber = Box<dyn Fn() + Send + Sync>;

/// Opaque handle returned by [`SharedConfig::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(u64);

/// Thread-safe configuration source.
///
/// Writers swap whole snapshots; readers copy the latest one out. The
/// generation counter lets a polling reader detect changes cheaply, while
/// subscribers get a nudge from the writing thread. Callbacks must stay
/// lightweight: they run on the notifying thread, and the intended pattern is
/// to set a flag the drawing context checks at the start of its next cycle.
pub struct SharedConfig {
    snapshot: RwLock<VisualizerConfig>,
    generation: AtomicU64,
    subscribers: Mutex<Vec<(u64, Subscriber)>>,
    next_subscriber: AtomicU64,
}

impl fmt::Debug for SharedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedConfig")
            .field("snapshot", &*self.snapshot.read())
            .field("generation", &self.generation.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl Default for SharedConfig {
    fn default() -> Self {
        Self::new(VisualizerConfig::default())
    }
}

impl SharedConfig {
    pub fn new(config: VisualizerConfig) -> Self {
        Self {
            snapshot: RwLock::new(config),
            generation: AtomicU64::new(0),
            subscribers: Mutex::new(Vec::new()),
            next_subscriber: AtomicU64::new(0),
        }
    }

    /// Copy of the current snapshot.
    pub fn load(&self) -> VisualizerConfig {
        *self.snapshot.read()
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Atomically replaces the snapshot and notifies subscribers.
    pub fn store(&self, config: VisualizerConfig) {
        *self.snapshot.write() = config;
        self.generation.fetch_add(1, Ordering::Release);
        for (_, subscriber) in self.subscribers.lock().iter() {
            subscriber();
        }
    }

    pub fn subscribe(&self, callback: Subscriber) -> SubscriptionId {
        let id = self.next_subscriber.fetch_add(1, Ordering::Relaxed);
        self.subscribers.lock().push((id, callback));
        SubscriptionId(id)
    }

    /// Removes a subscriber. Unknown or already-removed ids are ignored.
    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.subscribers.lock().retain(|(sub, _)| *sub != id.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;

    #[test]
    fn default_config_is_valid() {
        assert!(VisualizerConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_flags_bad_fields() {
        let mut config = VisualizerConfig::default();
        config.divisions = 0;
        assert_eq!(config.validate(), Err(ConfigError::NonPositiveDivisions));

        let mut config = VisualizerConfig::default();
        config.stroke_width = 0.0;
        assert_eq!(config.validate(), Err(ConfigError::NonPositiveStrokeWidth));

        let mut config = VisualizerConfig::default();
        config.lava_lamp.period_ms = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroPeriod));
    }

    #[test]
    fn normalize_repairs_degenerate_fields() {
        let config = VisualizerConfig {
            divisions: 0,
            stroke_width: f32::NAN,
            dash_filled: -3.0,
            dash_empty: f32::INFINITY,
            lava_lamp: LavaLampConfig {
                enabled: true,
                period_ms: 0,
            },
            ..Default::default()
        }
        .normalized();

        assert!(config.validate().is_ok());
        assert_eq!(config.dash_filled, 0.0);
        assert_eq!(config.dash_empty, 0.0);
        assert_eq!(config.lava_lamp.period_ms, DEFAULT_LAVA_LAMP_PERIOD_MS);
    }

    #[test]
    fn selection_resolves_through_tables() {
        let selection = ConfigSelection {
            divisions_index: 0,
            dash_index: 4,
            stroke_width_index: 2,
            fuzz_factor_index: 1,
            ..Default::default()
        };
        let config = selection.resolve();
        assert_eq!(config.divisions, DIVISION_OPTIONS[0]);
        assert_eq!(config.dash_filled, DASH_OPTIONS[4].0);
        assert_eq!(config.dash_empty, DASH_OPTIONS[4].1);
        assert_eq!(config.stroke_width, STROKE_WIDTH_OPTIONS[2]);
        assert_eq!(config.fuzz_factor, FUZZ_FACTOR_OPTIONS[1]);
    }

    #[test]
    fn selection_clamps_out_of_range_indices() {
        let selection = ConfigSelection {
            divisions_index: usize::MAX,
            dash_index: 99,
            stroke_width_index: 99,
            fuzz_factor_index: 99,
            ..Default::default()
        };
        let config = selection.resolve();
        assert_eq!(config.divisions, *DIVISION_OPTIONS.last().unwrap());
        assert_eq!(config.stroke_width, *STROKE_WIDTH_OPTIONS.last().unwrap());
        assert_eq!(config.fuzz_factor, *FUZZ_FACTOR_OPTIONS.last().unwrap());
    }

    #[test]
    fn selection_round_trips_through_json() {
        let selection = ConfigSelection {
            divisions_index: 3,
            base_color: Rgba::rgb(10, 20, 30),
            lava_lamp_enabled: false,
            ..Default::default()
        };
        let json = serde_json::to_string(&selection).unwrap();
        let restored: ConfigSelection = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, selection);
    }

    #[test]
    fn shared_config_swaps_and_notifies() {
        let shared = SharedConfig::default();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        let id = shared.subscribe(Box::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        let before = shared.generation();
        let mut config = shared.load();
        config.divisions = 4;
        shared.store(config);

        assert_eq!(shared.load().divisions, 4);
        assert!(shared.generation() > before);
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        shared.unsubscribe(id);
        shared.unsubscribe(id);
        shared.store(config);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
