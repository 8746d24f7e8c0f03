//! Multi-Sensor Fusion Limits

/// Number of sensor slots owned by the fusion manager.
pub const MAX_SENSORS: usize = 4;

/// Maximum stored length of a slot label (bytes).
///
/// Longer labels are truncated on a character boundary.
pub const MAX_SENSOR_NAME_LEN: usize = 32;

/// Active sensors needed for trigger/measure fusion.
pub const TRIGGER_MEASURE_MIN_SENSORS: u8 = 2;
