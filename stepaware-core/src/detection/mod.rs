//! Distance Detection Engine
//!
//! Converts raw distance samples from one sensor into a stable
//! in-range/direction signal:
//!
//! - [`window`]: median sample window and delta history
//! - [`direction`]: candidate direction with a stability gate
//! - [`approach`]: gradual vs. sudden approach classification
//! - [`detector`]: the per-cycle engine tying them together
//! - [`config`]: tuning values

pub mod approach;
pub mod config;
pub mod detector;
pub mod direction;
pub mod window;

pub use approach::{ApproachKind, ApproachTracking};
pub use config::DetectorConfig;
pub use detector::{DetectionResult, DistanceDetector};
pub use direction::DirectionTracker;
pub use window::{DeltaHistory, SampleWindow};
