//! Orchestration of the visualization pipeline.
//!
//! `PulseRenderer` receives host events (spectrum frames, geometry changes,
//! stream validity) on one serialized drawing context and owns everything the
//! frame cycle mutates. Configuration changes may arrive from another thread;
//! the subscription callback only flips a dirty flag, and the fresh snapshot
//! is loaded at the start of the next frame cycle so the drawing path never
//! observes a half-applied configuration.

use crate::color::{ColorCycle, Rgba};
use crate::config::{SharedConfig, SubscriptionId, VisualizerConfig};
use crate::dsp::spectrum_map::{SpectrumMapper, SurfaceLayout};
use crate::dsp::SpectrumBlock;
use crate::render::compositor::{FrameCompositor, StrokeStyle};
use crate::render::RenderTarget;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Alpha applied over the configured or animated stroke color before
/// painting.
const PAINT_ALPHA: u8 = 188;

pub struct PulseRenderer {
    config_source: Arc<SharedConfig>,
    subscription: Option<SubscriptionId>,
    config_dirty: Arc<AtomicBool>,
    config: VisualizerConfig,
    mapper: SpectrumMapper,
    compositor: FrameCompositor,
    lava_lamp: ColorCycle,
    stroke_color: Rgba,
    layout: SurfaceLayout,
    stream_valid: bool,
    destroyed: bool,
}

impl PulseRenderer {
    pub fn new(config_source: Arc<SharedConfig>) -> Self {
        let config = load_config(&config_source);
        let config_dirty = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&config_dirty);
        let subscription = config_source.subscribe(Box::new(move || {
            flag.store(true, Ordering::Release);
        }));

        Self {
            config_source,
            subscription: Some(subscription),
            config_dirty,
            config,
            mapper: SpectrumMapper::new(),
            compositor: FrameCompositor::new(),
            lava_lamp: ColorCycle::new(config.base_color, config.lava_lamp.period_ms),
            stroke_color: config.base_color.with_alpha(PAINT_ALPHA),
            layout: SurfaceLayout::default(),
            stream_valid: false,
            destroyed: false,
        }
    }

    /// The snapshot the drawing path is currently using.
    pub fn config(&self) -> &VisualizerConfig {
        &self.config
    }

    pub fn lava_active(&self) -> bool {
        self.lava_lamp.is_animating()
    }

    /// Processes one spectrum frame, or a fade-only cycle when `frame` is
    /// absent (silence). Returns whether the host should repaint.
    pub fn on_frame(&mut self, frame: Option<&[u8]>, now: Instant) -> bool {
        if self.destroyed {
            return false;
        }
        self.apply_pending_config(now);

        if let Some(color) = self.lava_lamp.tick(now) {
            self.stroke_color = color.with_alpha(PAINT_ALPHA);
        }

        let style = StrokeStyle {
            color: self.stroke_color,
            width: self.config.stroke_width,
            dash: (self.config.dash_filled, self.config.dash_empty),
        };
        let block = frame.map(|bytes| SpectrumBlock::new(bytes, now));
        let segments = self.mapper.map(block, &self.config, self.layout);
        self.compositor.update(segments, style);
        self.compositor.surface().is_some()
    }

    /// Applies a surface dimension change and the orientation it implies.
    pub fn on_resize(&mut self, width: u32, height: u32) {
        if self.destroyed {
            return;
        }
        self.layout.width = width;
        self.layout.height = height;
        self.compositor.resize(width, height);
        debug!(width, height, orientation = ?self.layout.orientation(), "geometry changed");
    }

    /// Updates the portrait-mode anchor edge hint.
    pub fn on_orientation_hint(&mut self, left_aligned: bool) {
        if self.destroyed {
            return;
        }
        self.layout.left_aligned = left_aligned;
    }

    /// Signals whether the upstream analyzer stream is currently usable. The
    /// lava lamp only runs while the stream is valid.
    pub fn on_validity_changed(&mut self, valid: bool, now: Instant) {
        if self.destroyed {
            return;
        }
        self.stream_valid = valid;
        info!(valid, "stream validity changed");
        self.sync_lava_lamp(now);
    }

    /// Blits the composited surface onto the host display target. A no-op
    /// while no surface is allocated.
    pub fn draw(&self, target: &mut dyn RenderTarget) {
        if let Some(surface) = self.compositor.surface() {
            target.blit(surface.width(), surface.height(), surface.pixels());
        }
    }

    /// Tears the renderer down: unsubscribes from the configuration source,
    /// stops the lava lamp and releases the surface. Idempotent, and no
    /// surface mutation is possible once it returns.
    pub fn destroy(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            self.config_source.unsubscribe(subscription);
        }
        if !self.destroyed {
            self.destroyed = true;
            self.lava_lamp.stop();
            self.compositor.release();
            info!("renderer destroyed");
        }
    }

    fn apply_pending_config(&mut self, now: Instant) {
        if !self.config_dirty.swap(false, Ordering::Acquire) {
            return;
        }
        self.config = load_config(&self.config_source);
        self.lava_lamp
            .configure(self.config.base_color, self.config.lava_lamp.period_ms);
        debug!(config = ?self.config, "configuration snapshot applied");
        self.sync_lava_lamp(now);
    }

    fn sync_lava_lamp(&mut self, now: Instant) {
        if self.config.lava_lamp.enabled && self.stream_valid {
            self.lava_lamp.start(now);
        } else {
            self.lava_lamp.stop();
            self.stroke_color = self.config.base_color.with_alpha(PAINT_ALPHA);
        }
    }
}

impl Drop for PulseRenderer {
    fn drop(&mut self) {
        self.destroy();
    }
}

fn load_config(source: &SharedConfig) -> VisualizerConfig {
    let config = source.load();
    if let Err(error) = config.validate() {
        warn!(%error, "invalid configuration, falling back to normalized values");
    }
    config.normalized()
}
