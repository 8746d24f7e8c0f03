//! Sensor Hardware Characteristics
//!
//! Limits of the sensor families the pipeline is deployed with, taken from
//! the AM312 PIR and HC-SR04 / Grove v2.0 ultrasonic datasheets.

// ===== PIR =====

/// PIR warm-up before output is trustworthy (ms).
///
/// AM312: ~60 s after power-on.
pub const PIR_WARMUP_MS: u32 = 60_000;

/// Passive IR variant warm-up (ms).
pub const PASSIVE_IR_WARMUP_MS: u32 = 30_000;

// ===== ULTRASONIC =====

/// Minimum interval between ultrasonic pings (ms).
///
/// HC-SR04 needs ~60 ms for echoes of the previous ping to die out.
pub const MIN_MEASUREMENT_INTERVAL_MS: u32 = 60;

/// Default detection threshold for the 4-pin HC-SR04 (mm).
pub const ULTRASONIC_THRESHOLD_MM: u32 = 500;

/// Default detection threshold for the Grove single-pin sensor (mm).
pub const ULTRASONIC_GROVE_THRESHOLD_MM: u32 = 1200;

/// Ultrasonic minimum range (mm).
pub const ULTRASONIC_MIN_RANGE_MM: u32 = 20;

/// Ultrasonic maximum range (mm).
pub const ULTRASONIC_MAX_RANGE_MM: u32 = 4000;
