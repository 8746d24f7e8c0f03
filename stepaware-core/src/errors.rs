//! Configuration Errors for the Perception Pipeline
//!
//! ## Design Philosophy
//!
//! Nothing in the sampling path can fail. Invalid echoes, out-of-range
//! readings and half-filled windows are "insufficient data" and produce a
//! conservative `not detected` result instead of an error. The only errors
//! are configuration mistakes, and those are reported to whoever made them:
//!
//! 1. **Small Size**: Every variant is a few bytes and `Copy`, so the fusion
//!    manager can keep the last one around for later inspection.
//!
//! 2. **No Heap Allocation**: Messages come from `Display`; there is no
//!    owned string anywhere.
//!
//! 3. **Never Fatal**: A rejected setter leaves the previous configuration
//!    in place. The sampling loop keeps running with one degraded sensor.
//!
//! ## Error Categories
//!
//! ### Detector / Confirmer Tuning
//! - `WindowSize`: window outside 3-20 samples
//! - `InvalidRange` / `ThresholdOutsideRange`: range bounds that cannot work
//! - `ConfirmationWindowTooShort` / `PatternTimeoutTooShort`: timing that
//!   makes an approach pattern impossible to recognise
//!
//! ### Slot Management
//! - `InvalidSlot`, `SlotOccupied`, `EmptySlot`
//!
//! ### Fusion Structure
//! - `MultiplePrimaries`, `NoPrimary`, `InsufficientSensors`
//!
//! ### Sensors
//! - `SensorInit`, `UnsupportedSensor`
//!
//! ## Handling Strategy
//!
//! ```rust
//! use stepaware_core::{ConfigError, FusionMode, SensorManager};
//!
//! let mut manager = SensorManager::new();
//! manager.set_fusion_mode(FusionMode::TriggerMeasure);
//!
//! match manager.validate_configuration() {
//!     Ok(()) => {}
//!     Err(ConfigError::NoPrimary { .. }) => {
//!         // Mark a trigger sensor before trusting fused output
//!     }
//!     Err(_) => {
//!         // Surface manager.last_error() to the operator
//!     }
//! }
//! ```

use thiserror_no_std::Error;

use crate::fusion::FusionMode;

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration errors - kept small and `Copy` for embedded use
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Sample window size outside the supported bounds
    #[error("Window size {requested} outside [{min}, {max}]")]
    WindowSize {
        /// Size the caller asked for
        requested: u8,
        /// Smallest supported window
        min: u8,
        /// Largest supported window
        max: u8,
    },

    /// Minimum valid distance is not below the maximum
    #[error("Invalid distance range [{min_mm}, {max_mm}] mm")]
    InvalidRange {
        /// Requested minimum (mm)
        min_mm: u32,
        /// Requested maximum (mm)
        max_mm: u32,
    },

    /// Detection threshold cannot be reached inside the valid range
    #[error("Detection threshold {threshold_mm} mm outside [{min_mm}, {max_mm}] mm")]
    ThresholdOutsideRange {
        /// Requested threshold (mm)
        threshold_mm: u32,
        /// Minimum valid distance (mm)
        min_mm: u32,
        /// Maximum valid distance (mm)
        max_mm: u32,
    },

    /// Confirmation window shorter than the simultaneous-trigger threshold
    #[error("Confirmation window {window_ms} ms shorter than simultaneous threshold {simultaneous_ms} ms")]
    ConfirmationWindowTooShort {
        /// Requested confirmation window (ms)
        window_ms: u32,
        /// Simultaneous-trigger threshold (ms)
        simultaneous_ms: u32,
    },

    /// Pattern timeout would cut a pattern off before the window closes
    #[error("Pattern timeout {timeout_ms} ms shorter than confirmation window {window_ms} ms")]
    PatternTimeoutTooShort {
        /// Requested pattern timeout (ms)
        timeout_ms: u32,
        /// Confirmation window (ms)
        window_ms: u32,
    },

    /// Slot index beyond the manager's capacity
    #[error("Invalid slot index {slot}")]
    InvalidSlot {
        /// Offending slot index
        slot: u8,
    },

    /// Slot already holds a sensor; remove it first
    #[error("Slot {slot} already occupied")]
    SlotOccupied {
        /// Occupied slot index
        slot: u8,
    },

    /// Slot holds no sensor
    #[error("No sensor in slot {slot}")]
    EmptySlot {
        /// Empty slot index
        slot: u8,
    },

    /// More than one slot flagged as primary
    #[error("Multiple primary sensors configured ({count})")]
    MultiplePrimaries {
        /// Number of primary flags found
        count: u8,
    },

    /// Fusion mode needs a primary sensor and none is enabled
    #[error("{mode} mode requires a primary sensor")]
    NoPrimary {
        /// Fusion mode that needs the primary
        mode: FusionMode,
    },

    /// Fusion mode needs more active sensors than are configured
    #[error("{mode} mode requires at least {required} sensors, have {available}")]
    InsufficientSensors {
        /// Fusion mode being validated
        mode: FusionMode,
        /// Minimum number of active sensors
        required: u8,
        /// Number of active sensors
        available: u8,
    },

    /// Sensor refused to start
    #[error("Sensor initialisation failed: {reason}")]
    SensorInit {
        /// Short description from the sensor
        reason: &'static str,
    },

    /// Configuration names a sensor type the target sensor cannot become
    #[error("Unsupported sensor type: {name}")]
    UnsupportedSensor {
        /// Short sensor type name
        name: &'static str,
    },
}

#[cfg(feature = "defmt")]
impl defmt::Format for ConfigError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::WindowSize { requested, min, max } =>
                defmt::write!(fmt, "Window {} outside [{}, {}]", requested, min, max),
            Self::InvalidRange { min_mm, max_mm } =>
                defmt::write!(fmt, "Invalid range [{}, {}] mm", min_mm, max_mm),
            Self::ThresholdOutsideRange { threshold_mm, min_mm, max_mm } =>
                defmt::write!(fmt, "Threshold {} outside [{}, {}] mm", threshold_mm, min_mm, max_mm),
            Self::ConfirmationWindowTooShort { window_ms, simultaneous_ms } =>
                defmt::write!(fmt, "Window {} ms < simultaneous {} ms", window_ms, simultaneous_ms),
            Self::PatternTimeoutTooShort { timeout_ms, window_ms } =>
                defmt::write!(fmt, "Timeout {} ms < window {} ms", timeout_ms, window_ms),
            Self::InvalidSlot { slot } =>
                defmt::write!(fmt, "Invalid slot {}", slot),
            Self::SlotOccupied { slot } =>
                defmt::write!(fmt, "Slot {} occupied", slot),
            Self::EmptySlot { slot } =>
                defmt::write!(fmt, "Slot {} empty", slot),
            Self::MultiplePrimaries { count } =>
                defmt::write!(fmt, "{} primary sensors", count),
            Self::NoPrimary { mode } =>
                defmt::write!(fmt, "{} needs a primary", mode),
            Self::InsufficientSensors { mode, required, available } =>
                defmt::write!(fmt, "{} needs {} sensors, have {}", mode, required, available),
            Self::SensorInit { reason } =>
                defmt::write!(fmt, "Sensor init: {}", reason),
            Self::UnsupportedSensor { name } =>
                defmt::write!(fmt, "Unsupported sensor: {}", name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn messages_are_readable() {
        let err = ConfigError::WindowSize { requested: 25, min: 3, max: 20 };
        assert_eq!(err.to_string(), "Window size 25 outside [3, 20]");

        let err = ConfigError::NoPrimary { mode: FusionMode::TriggerMeasure };
        assert_eq!(err.to_string(), "TRIGGER_MEASURE mode requires a primary sensor");
    }

    #[test]
    fn errors_are_small() {
        assert!(core::mem::size_of::<ConfigError>() <= 24);
    }
}
