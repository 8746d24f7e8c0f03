//! Detector configuration

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::constants::detection::{
    DEFAULT_DETECTION_THRESHOLD_MM, DEFAULT_DIRECTION_SENSITIVITY_MM, DEFAULT_MAX_DISTANCE_MM,
    DEFAULT_MIN_DISTANCE_MM, DEFAULT_SAMPLE_INTERVAL_MS, DEFAULT_WINDOW_SIZE,
    DIRECTION_STABILITY_MS, LARGE_MOVEMENT_THRESHOLD_MM, MAX_WINDOW_SIZE, MIN_WINDOW_SIZE,
    PEDESTRIAN_VELOCITY_MM_PER_MS, SUDDEN_APPEARANCE_READINGS, SUDDEN_CONFIRMATION_CYCLES,
};
use crate::errors::{ConfigError, ConfigResult};
use crate::types::DirectionTriggerMode;

/// Tuning of one [`DistanceDetector`](super::DistanceDetector)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DetectorConfig {
    /// Median distance at or below which an object is in range (mm)
    pub detection_threshold_mm: u32,
    /// Closest reading accepted into the window (mm)
    pub min_distance_mm: u32,
    /// Farthest reading accepted into the window (mm)
    pub max_distance_mm: u32,
    /// Samples in the median window (3-20)
    pub window_size: u8,
    /// Caller's sampling period (ms), scales the movement threshold
    pub sample_interval_ms: u32,
    /// Median delta needed to call a direction (mm)
    pub direction_sensitivity_mm: u32,
    /// Gate triggering on direction
    pub direction_enabled: bool,
    /// Directions that trigger when gating is on
    pub trigger_mode: DirectionTriggerMode,
    /// In-range readings without a prior trend that mean "sudden appearance"
    pub sudden_appearance_readings: u8,
    /// Cycles a sudden appearance waits for a consistent direction
    pub confirmation_cycles: u8,
    /// Time a direction candidate must hold before it is reported (ms)
    pub stability_ms: u64,
    /// Snapshot delta that counts as movement at any sampling rate (mm)
    pub large_movement_mm: u32,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            detection_threshold_mm: DEFAULT_DETECTION_THRESHOLD_MM,
            min_distance_mm: DEFAULT_MIN_DISTANCE_MM,
            max_distance_mm: DEFAULT_MAX_DISTANCE_MM,
            window_size: DEFAULT_WINDOW_SIZE,
            sample_interval_ms: DEFAULT_SAMPLE_INTERVAL_MS,
            direction_sensitivity_mm: DEFAULT_DIRECTION_SENSITIVITY_MM,
            direction_enabled: true,
            trigger_mode: DirectionTriggerMode::Approaching,
            sudden_appearance_readings: SUDDEN_APPEARANCE_READINGS,
            confirmation_cycles: SUDDEN_CONFIRMATION_CYCLES,
            stability_ms: DIRECTION_STABILITY_MS,
            large_movement_mm: LARGE_MOVEMENT_THRESHOLD_MM,
        }
    }
}

impl DetectorConfig {
    /// Builder: detection threshold
    pub fn with_threshold(mut self, threshold_mm: u32) -> Self {
        self.detection_threshold_mm = threshold_mm;
        self
    }

    /// Builder: window size
    pub fn with_window_size(mut self, size: u8) -> Self {
        self.window_size = size;
        self
    }

    /// Builder: sampling period
    pub fn with_sample_interval(mut self, interval_ms: u32) -> Self {
        self.sample_interval_ms = interval_ms;
        self
    }

    /// Builder: valid distance range
    pub fn with_range(mut self, min_mm: u32, max_mm: u32) -> Self {
        self.min_distance_mm = min_mm;
        self.max_distance_mm = max_mm;
        self
    }

    /// Builder: trigger mode
    pub fn with_trigger_mode(mut self, mode: DirectionTriggerMode) -> Self {
        self.trigger_mode = mode;
        self
    }

    /// Adaptive movement threshold (mm)
    ///
    /// Distance a pedestrian covers in one sampling period, so faster
    /// sampling gives a smaller, more sensitive threshold.
    pub fn movement_threshold_mm(&self) -> u32 {
        self.sample_interval_ms.saturating_mul(PEDESTRIAN_VELOCITY_MM_PER_MS)
    }

    /// Does a snapshot delta count as real movement?
    pub fn is_movement(&self, delta_mm: i32) -> bool {
        let magnitude = delta_mm.unsigned_abs();
        magnitude >= self.movement_threshold_mm() || magnitude >= self.large_movement_mm
    }

    /// Check every invariant
    pub fn validate(&self) -> ConfigResult<()> {
        validate_window_size(self.window_size)?;
        validate_range(self.min_distance_mm, self.max_distance_mm)?;
        validate_threshold(self.detection_threshold_mm, self.min_distance_mm, self.max_distance_mm)
    }

    /// Copy with every value forced into its supported bounds
    ///
    /// The window size is clamped, an inverted range falls back to the
    /// defaults and the threshold is clamped into the range.
    pub fn sanitized(mut self) -> Self {
        self.window_size = self.window_size.clamp(MIN_WINDOW_SIZE, MAX_WINDOW_SIZE);
        self.sudden_appearance_readings = self.sudden_appearance_readings.max(1);

        if validate_range(self.min_distance_mm, self.max_distance_mm).is_err() {
            self.min_distance_mm = DEFAULT_MIN_DISTANCE_MM;
            self.max_distance_mm = DEFAULT_MAX_DISTANCE_MM;
        }
        self.detection_threshold_mm = self
            .detection_threshold_mm
            .clamp(self.min_distance_mm, self.max_distance_mm);
        self
    }
}

pub(crate) fn validate_window_size(size: u8) -> ConfigResult<()> {
    if (MIN_WINDOW_SIZE..=MAX_WINDOW_SIZE).contains(&size) {
        Ok(())
    } else {
        Err(ConfigError::WindowSize {
            requested: size,
            min: MIN_WINDOW_SIZE,
            max: MAX_WINDOW_SIZE,
        })
    }
}

pub(crate) fn validate_range(min_mm: u32, max_mm: u32) -> ConfigResult<()> {
    if min_mm < max_mm {
        Ok(())
    } else {
        Err(ConfigError::InvalidRange { min_mm, max_mm })
    }
}

pub(crate) fn validate_threshold(threshold_mm: u32, min_mm: u32, max_mm: u32) -> ConfigResult<()> {
    if (min_mm..=max_mm).contains(&threshold_mm) {
        Ok(())
    } else {
        Err(ConfigError::ThresholdOutsideRange { threshold_mm, min_mm, max_mm })
    }
}
