//! Audio-reactive fading line visualizer core.
//!
//! The crate turns periodic FFT spectrum frames into stroked, dashed line
//! segments drawn over a persistent off-screen surface. Instead of clearing
//! between frames, the surface is washed with a translucent multiply-blend
//! overlay so older strokes decay exponentially into a trail. Audio capture,
//! FFT computation and the host display loop live outside this crate; the
//! host feeds frames and geometry events in and blits the composited surface
//! back out through [`render::RenderTarget`].

pub mod color;
pub mod config;
pub mod dsp;
pub mod error;
pub mod render;
pub mod renderer;
pub mod util;

pub use color::{ColorCycle, Rgba};
pub use config::{ConfigSelection, LavaLampConfig, SharedConfig, VisualizerConfig};
pub use dsp::spectrum_map::{LineSegment, Orientation, SpectrumMapper, SurfaceLayout};
pub use dsp::SpectrumBlock;
pub use error::ConfigError;
pub use render::compositor::{FrameCompositor, StrokeStyle};
pub use render::surface::Surface;
pub use render::RenderTarget;
pub use renderer::PulseRenderer;
