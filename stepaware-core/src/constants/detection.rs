//! Distance Detection Engine Parameters
//!
//! Defaults for the per-sensor engine that turns raw echoes into an
//! in-range/direction signal. Timing values assume pedestrian-scale motion
//! (roughly 1.0-1.5 m/s) sampled every 60-100 ms.

// ===== SAMPLE WINDOW =====

/// Smallest sample window (samples).
///
/// Three is the smallest count for which a median rejects one outlier.
pub const MIN_WINDOW_SIZE: u8 = 3;

/// Largest sample window (samples).
///
/// At 75 ms per sample this is 1.5 s of history, beyond which the window
/// lags a walking person by more than a metre.
pub const MAX_WINDOW_SIZE: u8 = 20;

/// Default sample window (samples).
///
/// ~600-750 ms of history at typical sampling rates.
pub const DEFAULT_WINDOW_SIZE: u8 = 10;

/// Entries kept in the snapshot delta history.
///
/// Five deltas let the median ride out two noisy ones.
pub const DELTA_HISTORY_SIZE: usize = 5;

/// Raw readings remembered for gradual-approach tracking.
pub const RAW_HISTORY_SIZE: usize = 4;

// ===== DISTANCE RANGE =====

/// Default detection threshold (mm).
///
/// Objects whose window median is at or below this distance are "in range".
pub const DEFAULT_DETECTION_THRESHOLD_MM: u32 = 1500;

/// Default minimum valid reading (mm).
///
/// HC-SR04 class sensors cannot resolve echoes closer than ~2 cm.
pub const DEFAULT_MIN_DISTANCE_MM: u32 = 20;

/// Default maximum valid reading (mm).
///
/// Beyond ~4 m ultrasonic echoes from a person are unreliable.
pub const DEFAULT_MAX_DISTANCE_MM: u32 = 4000;

// ===== MOVEMENT =====

/// Default sampling interval (ms) used to derive the movement threshold.
pub const DEFAULT_SAMPLE_INTERVAL_MS: u32 = 75;

/// Pedestrian velocity used for the adaptive movement threshold (mm/ms).
///
/// 1 mm/ms = 1 m/s = 3.6 km/h. The threshold is `interval × velocity`, so a
/// faster sampling rate gives a smaller, more sensitive threshold.
pub const PEDESTRIAN_VELOCITY_MM_PER_MS: u32 = 1;

/// Snapshot jump that always counts as movement (mm).
pub const LARGE_MOVEMENT_THRESHOLD_MM: u32 = 300;

// ===== DIRECTION =====

/// Default minimum median delta for a directional candidate (mm).
pub const DEFAULT_DIRECTION_SENSITIVITY_MM: u32 = 20;

/// Time a candidate direction must stay consistent before it is reported (ms).
pub const DIRECTION_STABILITY_MS: u64 = 225;

// ===== APPROACH CLASSIFICATION =====

/// Consecutive in-range raw readings, with no prior trend, that mark a
/// sudden appearance.
pub const SUDDEN_APPEARANCE_READINGS: u8 = 3;

/// Update cycles a sudden appearance waits for a consistent direction.
pub const SUDDEN_CONFIRMATION_CYCLES: u8 = 2;

/// Consecutive non-increasing readings outside the detection range that
/// count as a gradual approach trend.
pub const GRADUAL_TREND_READINGS: u8 = 2;
