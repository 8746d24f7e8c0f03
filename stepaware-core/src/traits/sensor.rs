//! Polymorphic Motion Sensor Interface
//!
//! Every sensor the pipeline can combine implements [`MotionSensor`]. The
//! fusion manager owns sensors as `Box<dyn MotionSensor>` and only ever
//! talks to them through these accessors; no caller downcasts.
//!
//! Binary sensors leave the distance/direction accessors at their defaults
//! (`0` and `Unknown`), which is exactly what the capability table promises
//! for them.

use crate::errors::ConfigResult;
use crate::time::Timestamp;
use crate::types::{
    MotionDirection, MotionEvent, SensorCapabilities, SensorConfig, SensorStatus, SensorType,
};

/// Common contract of all motion sensors
///
/// ## Update Contract
///
/// `update(now)` is called once per cycle by the driver loop. All other
/// methods are read-only snapshots of the state computed by the most recent
/// `update` and stay valid until the next one.
pub trait MotionSensor {
    /// Start the sensor (warm-up clocks begin at `now`)
    fn begin(&mut self, now: Timestamp) -> ConfigResult<()>;

    /// Poll the hardware and recompute detection state
    fn update(&mut self, now: Timestamp);

    /// Current detection verdict
    fn motion_detected(&self) -> bool;

    /// Past warm-up and producing trustworthy output
    fn is_ready(&self) -> bool;

    /// Sensor family
    fn sensor_type(&self) -> SensorType;

    /// What this sensor can do
    fn capabilities(&self) -> SensorCapabilities {
        self.sensor_type().capabilities()
    }

    /// Current distance (mm), 0 when unknown or unsupported
    fn distance_mm(&self) -> u32 {
        0
    }

    /// Current direction, `Unknown` when unsupported
    fn direction(&self) -> MotionDirection {
        MotionDirection::Unknown
    }

    /// Most recent event
    fn last_event(&self) -> MotionEvent;

    /// Events since construction or the last `reset_event_count`
    fn event_count(&self) -> u32;

    /// Zero the event counter
    fn reset_event_count(&mut self);

    /// When the most recent counted event happened
    fn last_event_time(&self) -> Option<Timestamp>;

    /// Warm-up left at `now` (ms), 0 once ready
    fn warmup_remaining_ms(&self, _now: Timestamp) -> u32 {
        0
    }

    /// Apply runtime configuration
    fn configure(&mut self, config: &SensorConfig) -> ConfigResult<()>;

    /// Snapshot of every read-only accessor
    fn status(&self) -> SensorStatus {
        SensorStatus {
            ready: self.is_ready(),
            motion_detected: self.motion_detected(),
            last_event_time: self.last_event_time(),
            event_count: self.event_count(),
            distance_mm: self.distance_mm(),
            direction: self.direction(),
            last_event: self.last_event(),
        }
    }
}
