//! Utility functions and types for PulseLine.

pub mod telemetry;
