//! Error taxonomy for configuration validation.
//!
//! Nothing in this crate is fatal: invalid configuration degrades to "emit no
//! geometry this frame" and a degenerate surface makes drawing a no-op. The
//! typed errors exist so the orchestrator can log precisely what was wrong
//! before falling back to a normalized snapshot.

/// Raised by [`crate::config::VisualizerConfig::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("divisions must be greater than zero")]
    NonPositiveDivisions,
    #[error("stroke width must be greater than zero")]
    NonPositiveStrokeWidth,
    #[error("lava lamp period must be greater than zero")]
    ZeroPeriod,
}
