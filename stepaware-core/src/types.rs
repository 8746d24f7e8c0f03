//! Shared Sensor Types
//!
//! ## Overview
//!
//! Plain data shared by every stage of the pipeline: what a sensor is, what
//! it can do, what it last reported and how it is configured. Nothing here
//! owns behaviour; the capability table is a pure function of the sensor
//! type so no mutable global state exists.
//!
//! ```text
//! SensorType ──capabilities()──→ SensorCapabilities   (constant table)
//! SensorConfig ──configure()───→ MotionSensor          (live settings)
//! MotionSensor ──status()──────→ SensorStatus          (read-only snapshot)
//! ```

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::constants::detection::DEFAULT_WINDOW_SIZE;
use crate::constants::sensors::{
    MIN_MEASUREMENT_INTERVAL_MS, PASSIVE_IR_WARMUP_MS, PIR_WARMUP_MS, ULTRASONIC_GROVE_THRESHOLD_MM,
    ULTRASONIC_MAX_RANGE_MM, ULTRASONIC_MIN_RANGE_MM, ULTRASONIC_THRESHOLD_MM,
};
use crate::time::Timestamp;

/// Direction of detected motion relative to the sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum MotionDirection {
    /// Direction cannot be determined (no data, or sensor cannot tell)
    #[default]
    Unknown = 0,
    /// Object present but not moving along the sensor axis
    Stationary = 1,
    /// Distance shrinking
    Approaching = 2,
    /// Distance growing
    Receding = 3,
}

impl MotionDirection {
    /// Human-readable name
    pub const fn name(&self) -> &'static str {
        match self {
            MotionDirection::Unknown => "unknown",
            MotionDirection::Stationary => "stationary",
            MotionDirection::Approaching => "approaching",
            MotionDirection::Receding => "receding",
        }
    }
}

impl fmt::Display for MotionDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Motion event types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum MotionEvent {
    /// No event yet
    #[default]
    None = 0,
    /// Binary sensor rising edge
    Detected,
    /// Detection ended (falling edge)
    Cleared,
    /// Distance sensor entered its detection range
    ThresholdCrossed,
    /// Triggered object reported as approaching
    Approaching,
    /// Triggered object reported as receding
    Receding,
}

/// Which directions make a distance sensor trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum DirectionTriggerMode {
    /// Only objects moving toward the sensor
    #[default]
    Approaching = 0,
    /// Only objects moving away
    Receding = 1,
    /// Either approaching or receding
    Both = 2,
}

impl DirectionTriggerMode {
    /// Does `direction` satisfy this trigger mode?
    pub const fn matches(&self, direction: MotionDirection) -> bool {
        match self {
            DirectionTriggerMode::Approaching => matches!(direction, MotionDirection::Approaching),
            DirectionTriggerMode::Receding => matches!(direction, MotionDirection::Receding),
            DirectionTriggerMode::Both => matches!(
                direction,
                MotionDirection::Approaching | MotionDirection::Receding
            ),
        }
    }
}

/// Supported sensor families
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum SensorType {
    /// Passive infrared motion sensor (AM312)
    Pir = 0,
    /// Infrared beam-break sensor
    Ir = 1,
    /// 4-pin ultrasonic distance sensor (HC-SR04)
    Ultrasonic = 2,
    /// Alternative passive IR part
    PassiveIr = 3,
    /// Single-pin ultrasonic distance sensor (Grove v2.0)
    UltrasonicGrove = 4,
}

impl SensorType {
    /// Short name
    pub const fn name(&self) -> &'static str {
        match self {
            SensorType::Pir => "PIR",
            SensorType::Ir => "IR",
            SensorType::Ultrasonic => "Ultrasonic",
            SensorType::PassiveIr => "Passive IR",
            SensorType::UltrasonicGrove => "Ultrasonic Grove",
        }
    }

    /// Does this family measure distance?
    pub const fn is_distance(&self) -> bool {
        matches!(self, SensorType::Ultrasonic | SensorType::UltrasonicGrove)
    }

    /// Default capabilities for this family
    pub const fn capabilities(&self) -> SensorCapabilities {
        match self {
            SensorType::Pir => SensorCapabilities {
                binary_detection: true,
                distance_measurement: false,
                direction_detection: false,
                requires_warmup: true,
                deep_sleep_wake: true,
                min_detection_mm: 0,
                max_detection_mm: 7000,
                detection_angle_deg: 120,
                typical_warmup_ms: PIR_WARMUP_MS,
                typical_current_ma: 1,
                type_name: "PIR Motion Sensor",
            },
            SensorType::Ir => SensorCapabilities {
                binary_detection: true,
                distance_measurement: false,
                direction_detection: false,
                requires_warmup: false,
                deep_sleep_wake: true,
                min_detection_mm: 0,
                max_detection_mm: 500,
                detection_angle_deg: 35,
                typical_warmup_ms: 0,
                typical_current_ma: 5,
                type_name: "IR Beam Sensor",
            },
            SensorType::Ultrasonic => SensorCapabilities {
                binary_detection: true,
                distance_measurement: true,
                direction_detection: true,
                requires_warmup: false,
                deep_sleep_wake: false,
                min_detection_mm: ULTRASONIC_MIN_RANGE_MM,
                max_detection_mm: ULTRASONIC_MAX_RANGE_MM,
                detection_angle_deg: 15,
                typical_warmup_ms: 0,
                typical_current_ma: 15,
                type_name: "Ultrasonic Distance Sensor",
            },
            SensorType::PassiveIr => SensorCapabilities {
                binary_detection: true,
                distance_measurement: false,
                direction_detection: false,
                requires_warmup: true,
                deep_sleep_wake: true,
                min_detection_mm: 0,
                max_detection_mm: 5000,
                detection_angle_deg: 100,
                typical_warmup_ms: PASSIVE_IR_WARMUP_MS,
                typical_current_ma: 1,
                type_name: "Passive IR Sensor",
            },
            SensorType::UltrasonicGrove => SensorCapabilities {
                binary_detection: true,
                distance_measurement: true,
                direction_detection: true,
                requires_warmup: false,
                deep_sleep_wake: false,
                min_detection_mm: ULTRASONIC_MIN_RANGE_MM,
                max_detection_mm: ULTRASONIC_MAX_RANGE_MM,
                detection_angle_deg: 15,
                typical_warmup_ms: 0,
                typical_current_ma: 8,
                type_name: "Grove Ultrasonic Sensor",
            },
        }
    }
}

impl fmt::Display for SensorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What a sensor family can do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorCapabilities {
    /// Simple yes/no motion output
    pub binary_detection: bool,
    /// Reports distance in millimetres
    pub distance_measurement: bool,
    /// Can tell approaching from receding
    pub direction_detection: bool,
    /// Output unreliable until a warm-up period has passed
    pub requires_warmup: bool,
    /// Can wake the device from deep sleep
    pub deep_sleep_wake: bool,
    /// Minimum detection range (mm), 0 if not applicable
    pub min_detection_mm: u32,
    /// Maximum detection range (mm), 0 if not applicable
    pub max_detection_mm: u32,
    /// Field of view (degrees)
    pub detection_angle_deg: u16,
    /// Typical warm-up (ms), 0 if none
    pub typical_warmup_ms: u32,
    /// Typical current draw (mA)
    pub typical_current_ma: u16,
    /// Display name
    pub type_name: &'static str,
}

/// Read-only runtime snapshot of one sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SensorStatus {
    /// Past warm-up and initialised
    pub ready: bool,
    /// Current detection verdict
    pub motion_detected: bool,
    /// When the last event happened
    pub last_event_time: Option<Timestamp>,
    /// Events since the last reset
    pub event_count: u32,
    /// Current distance (mm), 0 if none or not supported
    pub distance_mm: u32,
    /// Current direction, `Unknown` if not supported
    pub direction: MotionDirection,
    /// Most recent event
    pub last_event: MotionEvent,
}

/// Runtime-configurable sensor parameters
///
/// Zero in a numeric field means "keep the sensor's default".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SensorConfig {
    /// Sensor family
    pub sensor_type: SensorType,
    /// Detection threshold (mm), distance sensors only
    pub detection_threshold_mm: u32,
    /// Minimum interval between measurements (ms)
    pub measurement_interval_ms: u32,
    /// Warm-up override (ms)
    pub warmup_ms: u32,
    /// Sample window size, distance sensors only
    pub window_size: u8,
    /// Gate detection on direction
    pub direction_enabled: bool,
    /// Directions that trigger when direction gating is on
    pub trigger_mode: DirectionTriggerMode,
}

impl SensorConfig {
    /// Default configuration for a sensor family
    pub const fn for_type(sensor_type: SensorType) -> Self {
        let (threshold, interval, warmup, window, direction) = match sensor_type {
            SensorType::Pir => (0, 50, PIR_WARMUP_MS, 0, false),
            SensorType::PassiveIr => (0, 50, PASSIVE_IR_WARMUP_MS, 0, false),
            SensorType::Ir => (0, 50, 0, 0, false),
            SensorType::Ultrasonic => (
                ULTRASONIC_THRESHOLD_MM,
                MIN_MEASUREMENT_INTERVAL_MS,
                0,
                DEFAULT_WINDOW_SIZE,
                true,
            ),
            SensorType::UltrasonicGrove => (
                ULTRASONIC_GROVE_THRESHOLD_MM,
                MIN_MEASUREMENT_INTERVAL_MS,
                0,
                DEFAULT_WINDOW_SIZE,
                true,
            ),
        };

        Self {
            sensor_type,
            detection_threshold_mm: threshold,
            measurement_interval_ms: interval,
            warmup_ms: warmup,
            window_size: window,
            direction_enabled: direction,
            trigger_mode: DirectionTriggerMode::Approaching,
        }
    }
}
