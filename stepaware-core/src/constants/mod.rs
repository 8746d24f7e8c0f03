//! Constants for the StepAware perception pipeline
//!
//! Every tunable default lives here, grouped by the component that consumes
//! it. Use these instead of magic numbers; each one documents its unit and
//! where the value comes from.
//!
//! ## Organization
//!
//! - **Detection**: distance engine window, thresholds and timing
//! - **Confirmer**: dual-sensor far/near pattern timing
//! - **Fusion**: slot counts and label sizes
//! - **Sensors**: hardware limits of the supported sensor families

/// Distance-detection engine defaults and bounds.
pub mod detection;

/// Dual-sensor direction confirmation timing.
pub mod confirmer;

/// Multi-sensor fusion manager limits.
pub mod fusion;

/// Hardware characteristics of the supported sensors.
pub mod sensors;

// Re-export commonly used constants for convenience
pub use detection::{
    DEFAULT_DETECTION_THRESHOLD_MM, DEFAULT_WINDOW_SIZE, MAX_WINDOW_SIZE, MIN_WINDOW_SIZE,
    DIRECTION_STABILITY_MS, DELTA_HISTORY_SIZE,
};

pub use confirmer::{
    DEFAULT_CONFIRMATION_WINDOW_MS, DEFAULT_SIMULTANEOUS_THRESHOLD_MS, DEFAULT_PATTERN_TIMEOUT_MS,
};

pub use fusion::{MAX_SENSORS, MAX_SENSOR_NAME_LEN};
